//! Event interception: veto single removals, filter bulk removals.
//!
//! Both handlers finish their work before returning. Hosts discard
//! cancellation or filtering applied after the handler returns.

use std::sync::Arc;

use blocklock_policy::{Decision, EnforcementPolicy, Principal, ResourceKind};
use tracing::{debug, info};

use crate::registry::ProtectionRegistry;
use crate::sink::MessageSink;

/// Notice delivered to a principal whose removal was vetoed.
pub const DENIAL_NOTICE: &str = "This block is protected and cannot be broken!";

/// Integer block coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }
}

impl std::fmt::Display for BlockPos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{},{}", self.x, self.y, self.z)
    }
}

/// One resource instance in the world.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockInstance {
    pub kind: ResourceKind,
    pub pos: BlockPos,
}

impl BlockInstance {
    pub fn new(kind: ResourceKind, pos: BlockPos) -> Self {
        Self { kind, pos }
    }
}

/// A principal removing one block.
#[derive(Debug, Clone)]
pub struct BlockBreakEvent {
    pub block: BlockInstance,
    pub actor: Principal,
    cancelled: bool,
}

impl BlockBreakEvent {
    pub fn new(block: BlockInstance, actor: Principal) -> Self {
        Self {
            block,
            actor,
            cancelled: false,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn set_cancelled(&mut self, cancelled: bool) {
        self.cancelled = cancelled;
    }
}

/// A cascade removing many blocks with nobody to blame (explosions, ...).
#[derive(Debug, Clone, Default)]
pub struct BulkRemovalEvent {
    pub blocks: Vec<BlockInstance>,
    cancelled: bool,
}

impl BulkRemovalEvent {
    pub fn new(blocks: Vec<BlockInstance>) -> Self {
        Self {
            blocks,
            cancelled: false,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn set_cancelled(&mut self, cancelled: bool) {
        self.cancelled = cancelled;
    }
}

/// Applies [`EnforcementPolicy`] to intercepted events.
pub struct EnforcementHook {
    registry: Arc<ProtectionRegistry>,
    policy: EnforcementPolicy,
    sink: Arc<dyn MessageSink>,
}

impl EnforcementHook {
    pub fn new(
        registry: Arc<ProtectionRegistry>,
        policy: EnforcementPolicy,
        sink: Arc<dyn MessageSink>,
    ) -> Self {
        Self {
            registry,
            policy,
            sink,
        }
    }

    /// Registry this hook enforces.
    pub fn registry(&self) -> &Arc<ProtectionRegistry> {
        &self.registry
    }

    /// Veto the break if the block is protected and the actor may not bypass.
    ///
    /// Returns `None` when the event had already been cancelled upstream.
    pub fn on_block_break(&self, event: &mut BlockBreakEvent) -> Option<Decision> {
        if event.is_cancelled() {
            return None;
        }

        let decision = self
            .policy
            .evaluate(&*self.registry, &event.block.kind, Some(&event.actor));

        if decision.is_blocked() {
            event.set_cancelled(true);
            self.sink.deliver(&event.actor, DENIAL_NOTICE);
            info!(
                kind = %event.block.kind,
                pos = %event.block.pos,
                principal = %event.actor.id,
                "Vetoed removal of protected block"
            );
        }
        Some(decision)
    }

    /// Drop every protected block from the batch; the rest proceeds.
    ///
    /// Returns the number of blocks filtered out.
    pub fn on_bulk_removal(&self, event: &mut BulkRemovalEvent) -> usize {
        if event.is_cancelled() {
            return 0;
        }

        let before = event.blocks.len();
        self.registry.with_snapshot(|protected| {
            event
                .blocks
                .retain(|block| self.policy.evaluate(protected, &block.kind, None) == Decision::Allow);
        });

        let filtered = before - event.blocks.len();
        if filtered > 0 {
            debug!(filtered, remaining = event.blocks.len(), "Filtered protected blocks from bulk removal");
        }
        filtered
    }
}
