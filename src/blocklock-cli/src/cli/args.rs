//! CLI argument structures.

use std::path::PathBuf;

use blocklock_policy::{Capabilities, Principal, PrincipalId};
use clap::{Parser, Subcommand};

use crate::settings::PathFlags;

/// Log verbosity level for CLI output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogLevel {
    /// Only show errors
    Error,
    /// Show warnings and errors (default)
    #[default]
    Warn,
    /// Show informational messages, warnings, and errors
    Info,
    /// Show debug messages and above
    Debug,
    /// Show all messages including trace-level details
    Trace,
}

impl LogLevel {
    /// Convert to tracing filter string.
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Blocklock - make block kinds indestructible
#[derive(Debug, Parser)]
#[command(name = "blocklock")]
#[command(version, about = "Manage and exercise protected blocks", long_about = None)]
pub struct Cli {
    /// Settings file (default: <config dir>/Blocklock/blocklock.toml)
    #[arg(long, short = 'c', global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory holding protected_blocks.json
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Privilege list in ops.json format
    #[arg(long, global = true, value_name = "FILE")]
    pub privilege_file: Option<PathBuf>,

    /// Set log verbosity level (RUST_LOG takes precedence)
    #[arg(
        long = "log-level",
        short = 'L',
        value_enum,
        default_value = "warn",
        global = true,
        help_heading = "Logging"
    )]
    pub log_level: LogLevel,

    /// Emit logs as JSON
    #[arg(long, global = true, help_heading = "Logging")]
    pub json_logs: bool,

    #[command(flatten)]
    pub actor: ActorArgs,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Path overrides given on the command line.
    pub fn path_flags(&self) -> PathFlags {
        PathFlags {
            data_dir: self.data_dir.clone(),
            privilege_file: self.privilege_file.clone(),
        }
    }
}

/// Who the command acts as.
#[derive(Debug, Clone, Default, clap::Args)]
#[command(next_help_heading = "Acting principal")]
pub struct ActorArgs {
    /// Act as this principal instead of the console
    #[arg(long = "as", value_name = "UUID", global = true)]
    pub id: Option<PrincipalId>,

    /// Display name for the acting principal
    #[arg(long, value_name = "NAME", global = true, requires = "id")]
    pub name: Option<String>,

    /// Grant the acting principal the explicit bypass flag
    #[arg(long, global = true, requires = "id")]
    pub bypass: bool,

    /// Grant the acting principal the explicit admin flag
    #[arg(long, global = true, requires = "id")]
    pub admin: bool,
}

impl ActorArgs {
    /// The acting principal, or `None` for the console.
    pub fn principal(&self) -> Option<Principal> {
        let id = self.id?;
        let mut capabilities = Capabilities::empty();
        if self.bypass {
            capabilities |= Capabilities::BYPASS;
        }
        if self.admin {
            capabilities |= Capabilities::ADMIN;
        }

        let principal = Principal::new(id).with_capabilities(capabilities);
        Some(match &self.name {
            Some(name) => principal.with_name(name.clone()),
            None => principal,
        })
    }
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Make a block indestructible
    Set {
        /// Block name, case-insensitive
        block: String,
    },

    /// Remove block protection
    Remove {
        /// Block name, case-insensitive
        block: String,
    },

    /// List protected blocks
    List,

    /// Simulate the acting principal breaking one block (requires --as)
    Break {
        /// Block name, case-insensitive
        block: String,

        /// Block position
        #[arg(long, num_args = 3, value_names = ["X", "Y", "Z"], allow_negative_numbers = true)]
        at: Option<Vec<i32>>,
    },

    /// Simulate an explosion removing the given blocks
    Explode {
        /// Block names, one per removed block
        #[arg(required = true)]
        blocks: Vec<String>,
    },
}
