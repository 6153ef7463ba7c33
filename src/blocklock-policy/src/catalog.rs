//! Resource kinds and the catalog they are resolved against.

use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::error::PolicyError;

/// A canonical, lowercase identifier naming a class of world resource.
///
/// Holding a `ResourceKind` only proves the name is well formed. Whether the
/// host actually knows the kind is a question for a [`ResourceCatalog`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ResourceKind(String);

impl ResourceKind {
    /// Canonicalize a raw name: trim, lowercase, and check the character set.
    pub fn parse(name: &str) -> Result<Self, PolicyError> {
        let canonical = name.trim().to_ascii_lowercase();
        if canonical.is_empty()
            || !canonical
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(PolicyError::InvalidIdentifier(name.to_string()));
        }
        Ok(Self(canonical))
    }

    /// The canonical identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ResourceKind {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ResourceKind {
    type Error = PolicyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ResourceKind> for String {
    fn from(kind: ResourceKind) -> Self {
        kind.0
    }
}

/// What the host knows about a material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterialClass {
    /// Placeable in the world, therefore protectable.
    Block,
    /// Known to the host but never placed (tools, food, ...).
    Item,
}

/// Static lookup of resource kinds known to the host.
///
/// The registry only distinguishes "resolvable" from "not resolvable"; the
/// catalog owns the enumeration.
pub trait ResourceCatalog: Send + Sync {
    /// Resolve a raw name to a known kind.
    fn resolve(&self, name: &str) -> Option<ResourceKind>;

    /// Whether a resolved kind may be placed under protection.
    fn is_protectable(&self, kind: &ResourceKind) -> bool;

    /// All protectable names, sorted. Completion is built from this.
    fn protectable_names(&self) -> Vec<String>;

    /// Resolve a raw name, reporting why it failed.
    fn lookup(&self, name: &str) -> Result<ResourceKind, PolicyError> {
        let kind = ResourceKind::parse(name)?;
        self.resolve(kind.as_str())
            .ok_or_else(|| PolicyError::UnknownResource(kind.as_str().to_string()))
    }
}

/// Material registry shipped with Blocklock.
#[derive(Debug, Clone, Default)]
pub struct MaterialCatalog {
    materials: HashMap<String, MaterialClass>,
}

impl MaterialCatalog {
    /// The builtin vanilla material table.
    pub fn builtin() -> &'static MaterialCatalog {
        static BUILTIN: OnceLock<MaterialCatalog> = OnceLock::new();
        BUILTIN.get_or_init(|| {
            let blocks = BUILTIN_BLOCKS.iter().map(|n| (*n, MaterialClass::Block));
            let items = BUILTIN_ITEMS.iter().map(|n| (*n, MaterialClass::Item));
            MaterialCatalog::from_entries(blocks.chain(items))
        })
    }

    /// Build a catalog from explicit entries. Malformed names are skipped.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, MaterialClass)>,
        S: AsRef<str>,
    {
        let materials = entries
            .into_iter()
            .filter_map(|(name, class)| {
                ResourceKind::parse(name.as_ref())
                    .ok()
                    .map(|kind| (kind.0, class))
            })
            .collect();
        Self { materials }
    }

    /// The class of a material, if known.
    pub fn class_of(&self, kind: &ResourceKind) -> Option<MaterialClass> {
        self.materials.get(kind.as_str()).copied()
    }

    /// Number of known materials.
    pub fn len(&self) -> usize {
        self.materials.len()
    }

    /// Whether the catalog knows nothing.
    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}

impl ResourceCatalog for MaterialCatalog {
    fn resolve(&self, name: &str) -> Option<ResourceKind> {
        let kind = ResourceKind::parse(name).ok()?;
        self.materials.contains_key(kind.as_str()).then_some(kind)
    }

    fn is_protectable(&self, kind: &ResourceKind) -> bool {
        self.class_of(kind) == Some(MaterialClass::Block)
    }

    fn protectable_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .materials
            .iter()
            .filter(|(_, class)| **class == MaterialClass::Block)
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        names
    }
}

const BUILTIN_BLOCKS: &[&str] = &[
    "acacia_log",
    "acacia_planks",
    "amethyst_block",
    "ancient_debris",
    "andesite",
    "anvil",
    "barrel",
    "barrier",
    "beacon",
    "bedrock",
    "bell",
    "birch_log",
    "birch_planks",
    "blast_furnace",
    "bookshelf",
    "bricks",
    "cactus",
    "cartography_table",
    "chest",
    "clay",
    "coal_block",
    "coal_ore",
    "cobblestone",
    "command_block",
    "copper_block",
    "copper_ore",
    "crafting_table",
    "crying_obsidian",
    "dark_oak_log",
    "dark_oak_planks",
    "deepslate",
    "diamond_block",
    "diamond_ore",
    "diorite",
    "dirt",
    "dispenser",
    "dropper",
    "emerald_block",
    "emerald_ore",
    "enchanting_table",
    "end_portal_frame",
    "end_stone",
    "ender_chest",
    "farmland",
    "furnace",
    "glass",
    "glowstone",
    "gold_block",
    "gold_ore",
    "granite",
    "grass_block",
    "gravel",
    "hopper",
    "ice",
    "iron_block",
    "iron_ore",
    "jukebox",
    "jungle_log",
    "jungle_planks",
    "lapis_block",
    "lapis_ore",
    "lectern",
    "lodestone",
    "netherite_block",
    "netherrack",
    "note_block",
    "oak_leaves",
    "oak_log",
    "oak_planks",
    "obsidian",
    "observer",
    "packed_ice",
    "piston",
    "quartz_block",
    "red_sand",
    "redstone_block",
    "redstone_ore",
    "reinforced_deepslate",
    "respawn_anchor",
    "sand",
    "sandstone",
    "sculk",
    "sea_lantern",
    "shulker_box",
    "smithing_table",
    "smoker",
    "snow_block",
    "soul_sand",
    "spawner",
    "sponge",
    "spruce_log",
    "spruce_planks",
    "stone",
    "stone_bricks",
    "sticky_piston",
    "target",
    "terracotta",
    "tnt",
    "torch",
    "white_wool",
];

const BUILTIN_ITEMS: &[&str] = &[
    "apple",
    "arrow",
    "bow",
    "bread",
    "coal",
    "diamond",
    "diamond_pickaxe",
    "diamond_sword",
    "emerald",
    "ender_pearl",
    "gold_ingot",
    "iron_ingot",
    "iron_pickaxe",
    "netherite_ingot",
    "redstone",
    "stick",
    "string",
    "wooden_pickaxe",
];
