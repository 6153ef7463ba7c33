//! Integration tests for the admin command dispatcher.

use std::sync::Arc;

use blocklock_policy::{
    AuthorizationResolver, Capabilities, MaterialCatalog, Principal, PrincipalId, PrivilegeTable,
    ResourceCatalog, ResourceKind,
};
use blocklock_registry::{CommandDispatcher, CommandReply, CommandSender, ProtectionRegistry};
use blocklock_storage::ConfigStore;
use tempfile::TempDir;

fn kind(name: &str) -> ResourceKind {
    MaterialCatalog::builtin().resolve(name).unwrap()
}

fn dispatcher(privileges: PrivilegeTable) -> (TempDir, CommandDispatcher) {
    let dir = tempfile::tempdir().unwrap();
    let registry = Arc::new(ProtectionRegistry::open(
        ConfigStore::new(dir.path().join("protected_blocks.json")),
        Arc::new(MaterialCatalog::builtin().clone()),
    ));
    let resolver = AuthorizationResolver::new(Arc::new(privileges));
    (dir, CommandDispatcher::new(registry, resolver))
}

fn run(commands: &CommandDispatcher, args: &[&str]) -> CommandReply {
    commands.dispatch(&CommandSender::Console, args)
}

// ============================================================================
// AUTHORIZATION
// ============================================================================

mod authorization_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_args_shows_usage_to_anyone() {
        let (_dir, commands) = dispatcher(PrivilegeTable::new());
        let nobody = CommandSender::Principal(Principal::new(PrincipalId::random()));

        let none: &[&str] = &[];
        assert_eq!(commands.dispatch(&nobody, none), CommandReply::Usage);
        assert!(!CommandReply::Usage.is_success());
    }

    #[test]
    fn test_unprivileged_principal_is_denied() {
        let (_dir, commands) = dispatcher(PrivilegeTable::new());
        let nobody = CommandSender::Principal(Principal::new(PrincipalId::random()));

        assert_eq!(
            commands.dispatch(&nobody, &["set", "bedrock"]),
            CommandReply::PermissionDenied
        );
        assert_eq!(commands.dispatch(&nobody, &["list"]), CommandReply::PermissionDenied);
        assert_eq!(run(&commands, &["list"]), CommandReply::Listed(vec![]));
    }

    #[test]
    fn test_operator_and_admin_are_allowed() {
        let op = PrincipalId::random();
        let (_dir, commands) = dispatcher([(op, 4)].into_iter().collect());

        let by_op = CommandSender::Principal(Principal::new(op));
        assert!(commands.dispatch(&by_op, &["set", "bedrock"]).is_success());

        let admin = CommandSender::Principal(
            Principal::new(PrincipalId::random()).with_capabilities(Capabilities::ADMIN),
        );
        assert_eq!(
            commands.dispatch(&admin, &["list"]),
            CommandReply::Listed(vec![kind("bedrock")])
        );
    }

    #[test]
    fn test_console_is_always_authorized() {
        let (_dir, commands) = dispatcher(PrivilegeTable::new());
        assert!(commands.authorize(&CommandSender::Console));
    }
}

// ============================================================================
// SUBCOMMANDS
// ============================================================================

mod subcommand_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_set_then_remove() {
        let (_dir, commands) = dispatcher(PrivilegeTable::new());

        assert_eq!(
            run(&commands, &["set", "Bedrock"]),
            CommandReply::Added {
                kind: kind("bedrock"),
                persisted: true
            }
        );
        assert_eq!(
            run(&commands, &["set", "bedrock"]),
            CommandReply::AlreadyProtected(kind("bedrock"))
        );
        assert_eq!(
            run(&commands, &["remove", "bedrock"]),
            CommandReply::Removed {
                kind: kind("bedrock"),
                persisted: true
            }
        );
        assert_eq!(
            run(&commands, &["remove", "bedrock"]),
            CommandReply::NotProtected(kind("bedrock"))
        );
    }

    #[test]
    fn test_subcommands_are_case_insensitive() {
        let (_dir, commands) = dispatcher(PrivilegeTable::new());

        assert!(run(&commands, &["SET", "obsidian"]).is_success());
        assert_eq!(
            run(&commands, &["List"]),
            CommandReply::Listed(vec![kind("obsidian")])
        );
    }

    #[test]
    fn test_missing_argument_reports_usage() {
        let (_dir, commands) = dispatcher(PrivilegeTable::new());

        let reply = run(&commands, &["set"]);
        assert!(matches!(reply, CommandReply::MissingArgument { .. }));
        assert_eq!(reply.to_string(), "Usage: blocklock set <block>");

        let reply = run(&commands, &["remove"]);
        assert_eq!(reply.to_string(), "Usage: blocklock remove <block>");
    }

    #[test]
    fn test_unknown_subcommand() {
        let (_dir, commands) = dispatcher(PrivilegeTable::new());
        let reply = run(&commands, &["Protect", "bedrock"]);

        assert_eq!(reply, CommandReply::UnknownSubcommand("protect".into()));
        assert_eq!(reply.to_string(), "Unknown subcommand: protect");
    }

    #[test]
    fn test_invalid_kind_changes_nothing() {
        let (_dir, commands) = dispatcher(PrivilegeTable::new());

        assert_eq!(
            run(&commands, &["set", "not_a_real_resource"]),
            CommandReply::InvalidKind("not_a_real_resource".into())
        );
        assert_eq!(
            run(&commands, &["set", "stick"]),
            CommandReply::InvalidKind("stick".into())
        );
        assert_eq!(run(&commands, &["list"]), CommandReply::Listed(vec![]));
    }

    #[test]
    fn test_list_messages() {
        let (_dir, commands) = dispatcher(PrivilegeTable::new());
        assert_eq!(
            run(&commands, &["list"]).to_string(),
            "No blocks are currently protected."
        );

        for name in ["tnt", "bedrock", "obsidian"] {
            assert!(run(&commands, &["set", name]).is_success());
        }
        assert_eq!(
            run(&commands, &["list"]).to_string(),
            "Protected blocks (3): bedrock, obsidian, tnt"
        );
    }

    #[test]
    fn test_unsaved_mutation_still_succeeds_and_is_flagged() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let registry = Arc::new(ProtectionRegistry::with_protected(
            ConfigStore::new(blocker.join("protected_blocks.json")),
            Arc::new(MaterialCatalog::builtin().clone()),
            Default::default(),
        ));
        let commands = CommandDispatcher::new(registry, AuthorizationResolver::default());

        let reply = run(&commands, &["set", "bedrock"]);
        assert_eq!(
            reply,
            CommandReply::Added {
                kind: kind("bedrock"),
                persisted: false
            }
        );
        assert!(reply.is_success());
        assert_eq!(
            reply.to_string(),
            "Added bedrock to protected blocks! (warning: could not be saved to disk)"
        );
        assert_eq!(
            run(&commands, &["list"]),
            CommandReply::Listed(vec![kind("bedrock")])
        );
    }
}
