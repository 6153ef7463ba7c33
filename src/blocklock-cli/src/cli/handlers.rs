//! Command dispatch and execution handlers.
//!
//! Each handler writes its human-readable report to `out` and returns
//! whether the command succeeded. Logs go to stderr separately.

use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use blocklock_policy::{
    AuthorizationResolver, EnforcementPolicy, MaterialCatalog, Principal, ResourceKind,
};
use blocklock_registry::{
    BlockBreakEvent, BlockInstance, BlockPos, BulkRemovalEvent, CommandDispatcher, CommandSender,
    EnforcementHook, ProtectionRegistry,
};
use blocklock_storage::{BlocklockPaths, ConfigStore, PrivilegeSource};
use parking_lot::Mutex;
use tracing::info;

use super::args::{Cli, Commands};
use crate::settings::Settings;

/// Everything a handler needs, wired from settings.
struct Runtime {
    registry: Arc<ProtectionRegistry>,
    resolver: AuthorizationResolver,
    actor: Option<Principal>,
}

impl Runtime {
    fn build(cli: &Cli) -> Result<Self> {
        let settings = Settings::load(cli.config.as_deref())?;
        let paths = settings.resolve_paths(&cli.path_flags())?;
        Self::from_paths(&paths, &settings, cli.actor.principal())
    }

    fn from_paths(
        paths: &BlocklockPaths,
        settings: &Settings,
        actor: Option<Principal>,
    ) -> Result<Self> {
        paths.ensure_dirs().with_context(|| {
            format!(
                "Failed to create data directory {}",
                paths.data_dir.display()
            )
        })?;
        info!(
            data_dir = %paths.data_dir.display(),
            privilege_file = %paths.privilege_file.display(),
            "Opening registry"
        );

        let registry = Arc::new(ProtectionRegistry::open(
            ConfigStore::new(paths.protected_blocks_file.clone()),
            Arc::new(MaterialCatalog::builtin().clone()),
        ));
        let privileges = PrivilegeSource::new(paths.privilege_file.clone()).load();
        let resolver = AuthorizationResolver::with_config(Arc::new(privileges), &settings.policy);

        Ok(Self {
            registry,
            resolver,
            actor,
        })
    }

    fn sender(&self) -> CommandSender {
        match &self.actor {
            Some(principal) => CommandSender::Principal(principal.clone()),
            None => CommandSender::Console,
        }
    }

    fn resolve(&self, name: &str) -> Result<ResourceKind> {
        self.registry
            .catalog()
            .lookup(name)
            .with_context(|| format!("{name} is not a valid block"))
    }
}

/// Dispatch a CLI command to its handler.
pub fn dispatch_command(cli: Cli, out: &mut impl Write) -> Result<bool> {
    let runtime = Runtime::build(&cli)?;
    run(&runtime, cli.command, out)
}

fn run(runtime: &Runtime, command: Commands, out: &mut impl Write) -> Result<bool> {
    match command {
        Commands::Set { block } => run_admin(runtime, &["set", block.as_str()], out),
        Commands::Remove { block } => run_admin(runtime, &["remove", block.as_str()], out),
        Commands::List => run_admin(runtime, &["list"], out),
        Commands::Break { block, at } => run_break(runtime, &block, at.as_deref(), out),
        Commands::Explode { blocks } => run_explode(runtime, &blocks, out),
    }
}

fn run_admin(runtime: &Runtime, args: &[&str], out: &mut impl Write) -> Result<bool> {
    let commands = CommandDispatcher::new(runtime.registry.clone(), runtime.resolver.clone());
    let reply = commands.dispatch(&runtime.sender(), args);
    writeln!(out, "{reply}")?;
    Ok(reply.is_success())
}

fn run_break(
    runtime: &Runtime,
    block: &str,
    at: Option<&[i32]>,
    out: &mut impl Write,
) -> Result<bool> {
    let Some(actor) = runtime.actor.clone() else {
        bail!("break needs an acting principal; pass --as <UUID>");
    };
    let pos = match at {
        Some([x, y, z]) => BlockPos::new(*x, *y, *z),
        Some(other) => bail!("--at takes exactly three coordinates, got {}", other.len()),
        None => BlockPos::default(),
    };
    let kind = runtime.resolve(block)?;

    let notices = Arc::new(Mutex::new(Vec::new()));
    let hook = enforcement_hook(runtime, notices.clone());
    let mut event = BlockBreakEvent::new(BlockInstance::new(kind, pos), actor);
    hook.on_block_break(&mut event);

    for notice in notices.lock().drain(..) {
        writeln!(out, "{notice}")?;
    }
    if event.is_cancelled() {
        writeln!(out, "Break of {} at {} was vetoed", event.block.kind, pos)?;
        Ok(false)
    } else {
        writeln!(out, "Break of {} at {} allowed", event.block.kind, pos)?;
        Ok(true)
    }
}

fn run_explode(runtime: &Runtime, blocks: &[String], out: &mut impl Write) -> Result<bool> {
    let instances = blocks
        .iter()
        .zip(0..)
        .map(|(name, x)| Ok(BlockInstance::new(runtime.resolve(name)?, BlockPos::new(x, 0, 0))))
        .collect::<Result<Vec<_>>>()?;

    let hook = enforcement_hook(runtime, Arc::default());
    let mut event = BulkRemovalEvent::new(instances);
    let filtered = hook.on_bulk_removal(&mut event);

    let survivors: Vec<&str> = event.blocks.iter().map(|b| b.kind.as_str()).collect();
    writeln!(
        out,
        "{filtered} protected block(s) survived; destroyed: {}",
        if survivors.is_empty() {
            "none".to_string()
        } else {
            survivors.join(", ")
        }
    )?;
    Ok(true)
}

fn enforcement_hook(runtime: &Runtime, notices: Arc<Mutex<Vec<String>>>) -> EnforcementHook {
    EnforcementHook::new(
        runtime.registry.clone(),
        EnforcementPolicy::new(runtime.resolver.clone()),
        Arc::new(move |to: &Principal, msg: &str| {
            notices.lock().push(format!("-> {}: {msg}", to.display_name()))
        }),
    )
}

#[cfg(test)]
mod tests {
    use blocklock_policy::{Capabilities, PrincipalId};
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use super::*;

    fn runtime(dir: &std::path::Path, actor: Option<Principal>) -> Runtime {
        let paths = BlocklockPaths::from_root(dir.to_path_buf());
        Runtime::from_paths(&paths, &Settings::default(), actor).unwrap()
    }

    fn output(f: impl FnOnce(&mut Vec<u8>) -> Result<bool>) -> (bool, String) {
        let mut buf = Vec::new();
        let ok = f(&mut buf).unwrap();
        (ok, String::from_utf8(buf).unwrap())
    }

    #[test]
    fn test_break_requires_actor() {
        let dir = tempdir().unwrap();
        let rt = runtime(dir.path(), None);
        assert!(run_break(&rt, "bedrock", None, &mut Vec::new()).is_err());
    }

    #[test]
    fn test_break_reports_veto_and_notice() {
        let dir = tempdir().unwrap();
        let admin = runtime(dir.path(), None);
        assert!(admin.registry.add("bedrock").persisted());

        let actor = Principal::new(PrincipalId::random()).with_name("griefer");
        let rt = runtime(dir.path(), Some(actor));
        let (ok, text) = output(|out| run_break(&rt, "bedrock", Some(&[1, 2, 3][..]), out));

        assert!(!ok);
        assert_eq!(
            text,
            "-> griefer: This block is protected and cannot be broken!\n\
             Break of bedrock at 1,2,3 was vetoed\n"
        );
    }

    #[test]
    fn test_break_with_bypass_is_allowed() {
        let dir = tempdir().unwrap();
        let actor =
            Principal::new(PrincipalId::random()).with_capabilities(Capabilities::BYPASS);
        let rt = runtime(dir.path(), Some(actor));
        assert!(rt.registry.add("bedrock").persisted());

        let (ok, text) = output(|out| run_break(&rt, "bedrock", None, out));
        assert!(ok);
        assert_eq!(text, "Break of bedrock at 0,0,0 allowed\n");
    }

    #[test]
    fn test_explode_filters_protected_blocks() {
        let dir = tempdir().unwrap();
        let rt = runtime(dir.path(), None);
        assert!(rt.registry.add("bedrock").persisted());
        assert!(rt.registry.add("obsidian").persisted());

        let blocks: Vec<String> = ["dirt", "bedrock", "stone", "obsidian", "sand"]
            .into_iter()
            .map(String::from)
            .collect();
        let (ok, text) = output(|out| run_explode(&rt, &blocks, out));
        assert!(ok);
        assert_eq!(text, "2 protected block(s) survived; destroyed: dirt, stone, sand\n");
    }

    #[test]
    fn test_explode_rejects_unknown_blocks() {
        let dir = tempdir().unwrap();
        let rt = runtime(dir.path(), None);
        let blocks = vec!["dirt".to_string(), "unobtainium".to_string()];
        assert!(run_explode(&rt, &blocks, &mut Vec::new()).is_err());
    }
}
