//! Resolution planning and execution.
//!
//! A [`Plan`] partitions the fixes for a conflict report three ways:
//!
//! - `moves`: automatic moves, applied by [`execute`].
//! - `warnings`: advisory moves that need explicit confirmation
//!   ([`confirm`]), such as breaking a dependency cycle.
//! - `manual`: conflicts with no automatic fix, passed through verbatim.
//!
//! A plan is best effort: applying it does not promise a conflict-free
//! board.

pub mod execute;
pub mod plan;

use serde::Serialize;

use crate::conflict::{Conflict, ConflictKind};

pub use execute::{confirm, execute};
pub use plan::plan;

/// Registered resolution strategies, one per resolvable conflict kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionStrategy {
    /// Move the late dependency to the bucket before the target.
    MoveDependencyEarlier,
    /// Move the early dependent to the bucket after the target.
    MoveDependentLater,
    /// Move one cycle member with a single dependency to the bucket after
    /// the target. Needs confirmation.
    BreakCycle,
}

impl ResolutionStrategy {
    #[must_use]
    pub const fn for_kind(kind: ConflictKind) -> Option<Self> {
        match kind {
            ConflictKind::DependencyAfter => Some(Self::MoveDependencyEarlier),
            ConflictKind::DependentBefore => Some(Self::MoveDependentLater),
            ConflictKind::CircularDependency => Some(Self::BreakCycle),
            ConflictKind::HeadlinerLimit | ConflictKind::BucketOverload => None,
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::MoveDependencyEarlier => "Move dependency to earlier fork",
            Self::MoveDependentLater => "Move dependent to later fork",
            Self::BreakCycle => "Break circular dependency chain",
        }
    }

    /// Whether proposals of this strategy are applied without confirmation.
    #[must_use]
    pub const fn is_automatic(self) -> bool {
        !matches!(self, Self::BreakCycle)
    }
}

/// A suggested follow-up move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProposedMove {
    pub item_id: String,
    pub item_name: String,
    pub target_bucket: String,
    pub description: String,
    pub automatic: bool,
    pub strategy: ResolutionStrategy,
}

/// A conflict the planner cannot fix by moving items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManualAction {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ConflictKind>,
    pub description: String,
}

impl ManualAction {
    #[must_use]
    pub fn from_conflict(conflict: &Conflict) -> Self {
        Self {
            kind: Some(conflict.kind),
            description: conflict.message.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Plan {
    pub moves: Vec<ProposedMove>,
    pub warnings: Vec<ProposedMove>,
    pub manual: Vec<ManualAction>,
}

impl Plan {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty() && self.warnings.is_empty() && self.manual.is_empty()
    }

    /// Advisory moves are waiting for the caller's confirmation.
    #[must_use]
    pub fn requires_confirmation(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Result of applying one proposed move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveOutcome {
    pub item_id: String,
    pub description: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
