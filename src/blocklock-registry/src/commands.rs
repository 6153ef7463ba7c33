//! The `blocklock` admin command surface.

use std::fmt;
use std::sync::Arc;

use blocklock_policy::{AuthorizationResolver, Principal, ResourceKind};
use tracing::debug;

use crate::registry::{AddOutcome, ProtectionRegistry, RemoveOutcome};

const SET_USAGE: &str = "blocklock set <block>";
const REMOVE_USAGE: &str = "blocklock remove <block>";

/// Who issued a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandSender {
    /// The host operator. Always authorized, although in-world command
    /// handlers traditionally turn non-player senders away.
    Console,
    /// An in-world principal, authorized through the resolver.
    Principal(Principal),
}

/// Structured result of [`CommandDispatcher::dispatch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandReply {
    /// No subcommand given.
    Usage,
    /// Sender may not manage protections.
    PermissionDenied,
    /// Subcommand given without its argument.
    MissingArgument { usage: &'static str },
    UnknownSubcommand(String),
    Added { kind: ResourceKind, persisted: bool },
    AlreadyProtected(ResourceKind),
    Removed { kind: ResourceKind, persisted: bool },
    NotProtected(ResourceKind),
    /// Argument is not a valid block name.
    InvalidKind(String),
    /// Current protected set, sorted.
    Listed(Vec<ResourceKind>),
}

impl CommandReply {
    /// Whether the command did what was asked.
    ///
    /// `AlreadyProtected` and `NotProtected` count as success: the set is
    /// in the requested state. So does a mutation whose write-through failed;
    /// the in-memory set is authoritative and `persisted` reports the rest.
    pub fn is_success(&self) -> bool {
        match self {
            Self::Added { .. }
            | Self::Removed { .. }
            | Self::AlreadyProtected(_)
            | Self::NotProtected(_)
            | Self::Listed(_) => true,
            Self::Usage
            | Self::PermissionDenied
            | Self::MissingArgument { .. }
            | Self::UnknownSubcommand(_)
            | Self::InvalidKind(_) => false,
        }
    }
}

impl fmt::Display for CommandReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Usage => {
                writeln!(f, "Blocklock commands:")?;
                writeln!(f, "  {SET_USAGE} - Make a block indestructible")?;
                writeln!(f, "  {REMOVE_USAGE} - Remove block protection")?;
                write!(f, "  blocklock list - List protected blocks")
            }
            Self::PermissionDenied => write!(f, "You don't have permission to use this command."),
            Self::MissingArgument { usage } => write!(f, "Usage: {usage}"),
            Self::UnknownSubcommand(sub) => write!(f, "Unknown subcommand: {sub}"),
            Self::Added { kind, persisted } => {
                write!(f, "Added {kind} to protected blocks!")?;
                unsaved_suffix(f, *persisted)
            }
            Self::AlreadyProtected(kind) => write!(f, "{kind} is already protected!"),
            Self::Removed { kind, persisted } => {
                write!(f, "Removed {kind} from protected blocks!")?;
                unsaved_suffix(f, *persisted)
            }
            Self::NotProtected(kind) => write!(f, "{kind} is not currently protected!"),
            Self::InvalidKind(name) => write!(f, "{name} is not a valid block!"),
            Self::Listed(kinds) if kinds.is_empty() => {
                write!(f, "No blocks are currently protected.")
            }
            Self::Listed(kinds) => {
                let names: Vec<&str> = kinds.iter().map(ResourceKind::as_str).collect();
                write!(f, "Protected blocks ({}): {}", kinds.len(), names.join(", "))
            }
        }
    }
}

fn unsaved_suffix(f: &mut fmt::Formatter<'_>, persisted: bool) -> fmt::Result {
    if persisted {
        Ok(())
    } else {
        write!(f, " (warning: could not be saved to disk)")
    }
}

/// Routes command arguments to the registry.
#[derive(Debug, Clone)]
pub struct CommandDispatcher {
    registry: Arc<ProtectionRegistry>,
    resolver: AuthorizationResolver,
}

impl CommandDispatcher {
    pub fn new(registry: Arc<ProtectionRegistry>, resolver: AuthorizationResolver) -> Self {
        Self { registry, resolver }
    }

    /// Run one command. `args` excludes the command name itself.
    pub fn dispatch<S: AsRef<str>>(&self, sender: &CommandSender, args: &[S]) -> CommandReply {
        let Some((sub, rest)) = args.split_first() else {
            return CommandReply::Usage;
        };

        if !self.authorize(sender) {
            return CommandReply::PermissionDenied;
        }

        let sub = sub.as_ref().to_ascii_lowercase();
        let arg = rest.first().map(AsRef::as_ref);
        match (sub.as_str(), arg) {
            ("set", Some(name)) => self.set(name),
            ("set", None) => CommandReply::MissingArgument { usage: SET_USAGE },
            ("remove", Some(name)) => self.remove(name),
            ("remove", None) => CommandReply::MissingArgument {
                usage: REMOVE_USAGE,
            },
            ("list", _) => CommandReply::Listed(self.registry.list()),
            _ => CommandReply::UnknownSubcommand(sub),
        }
    }

    /// Whether `sender` may manage protections.
    pub fn authorize(&self, sender: &CommandSender) -> bool {
        match sender {
            CommandSender::Console => true,
            CommandSender::Principal(principal) => {
                let allowed = self.resolver.may_bypass(principal);
                if !allowed {
                    debug!(principal = %principal.id, "Command rejected, not authorized");
                }
                allowed
            }
        }
    }

    fn set(&self, name: &str) -> CommandReply {
        let mutation = self.registry.add(name);
        let persisted = mutation.persisted();
        match mutation.into_outcome() {
            AddOutcome::Added(kind) => CommandReply::Added { kind, persisted },
            AddOutcome::AlreadyProtected(kind) => CommandReply::AlreadyProtected(kind),
            AddOutcome::InvalidKind(name) => CommandReply::InvalidKind(name),
        }
    }

    fn remove(&self, name: &str) -> CommandReply {
        let mutation = self.registry.remove(name);
        let persisted = mutation.persisted();
        match mutation.into_outcome() {
            RemoveOutcome::Removed(kind) => CommandReply::Removed { kind, persisted },
            RemoveOutcome::NotProtected(kind) => CommandReply::NotProtected(kind),
            RemoveOutcome::InvalidKind(name) => CommandReply::InvalidKind(name),
        }
    }
}
