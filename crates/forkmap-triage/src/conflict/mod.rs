//! Conflict detection for proposed moves.
//!
//! ## Submodules
//!
//! - [`detect`]: the per-move checks and [`detect::analyze`].
//! - [`cycles`]: tri-color depth-first cycle search over dependency edges.

pub mod cycles;
pub mod detect;

use std::fmt;

use serde::Serialize;

pub use detect::{analyze, analyze_current};

/// The five conflict categories a move can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictKind {
    /// A direct dependency sits in a later bucket than the target.
    DependencyAfter,
    /// A direct dependent sits in an earlier bucket than the target.
    DependentBefore,
    /// The dependency edges reachable from the moved item contain a cycle.
    CircularDependency,
    /// The target bucket already holds its headliner quota for the layer.
    HeadlinerLimit,
    /// The target bucket's summed complexity weight is over threshold.
    BucketOverload,
}

impl ConflictKind {
    #[must_use]
    pub const fn severity(self) -> Severity {
        match self {
            Self::CircularDependency => Severity::Critical,
            Self::DependencyAfter | Self::DependentBefore => Severity::High,
            Self::HeadlinerLimit => Severity::Medium,
            Self::BucketOverload => Severity::Low,
        }
    }

    /// Whether the resolution planner knows how to propose a fix.
    ///
    /// Capacity conflicts are advisory only.
    #[must_use]
    pub const fn has_strategy(self) -> bool {
        matches!(
            self,
            Self::DependencyAfter | Self::DependentBefore | Self::CircularDependency
        )
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DependencyAfter => "dependency_after",
            Self::DependentBefore => "dependent_before",
            Self::CircularDependency => "circular_dependency",
            Self::HeadlinerLimit => "headliner_limit",
            Self::BucketOverload => "bucket_overload",
        }
    }
}

impl fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Conflict severity, ordered `Low < Medium < High < Critical`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        })
    }
}

/// One detected conflict.
///
/// `item_id`/`item_name` name the offending item: the dependency or
/// dependent for ordering conflicts, the moved item for cycles. `bucket_id`
/// is that item's current bucket, or the target bucket for capacity
/// conflicts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conflict {
    pub kind: ConflictKind,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bucket_id: Option<String>,
    /// Cycle path as item ids, `[n0, .., nk, n0]`. Empty for other kinds.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cycle: Vec<String>,
    pub message: String,
}

impl Conflict {
    pub(crate) const fn new(kind: ConflictKind, message: String) -> Self {
        Self {
            kind,
            severity: kind.severity(),
            item_id: None,
            item_name: None,
            bucket_id: None,
            cycle: Vec::new(),
            message,
        }
    }

    #[must_use]
    pub(crate) fn with_item(mut self, id: &str, name: &str) -> Self {
        self.item_id = Some(id.to_string());
        self.item_name = Some(name.to_string());
        self
    }

    #[must_use]
    pub(crate) fn in_bucket(mut self, bucket_id: &str) -> Self {
        self.bucket_id = Some(bucket_id.to_string());
        self
    }
}

/// Result of analyzing one proposed move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConflictReport {
    pub has_conflicts: bool,
    pub conflicts: Vec<Conflict>,
    /// Highest severity present; `low` when there are no conflicts.
    pub severity: Severity,
    /// Every present conflict kind has a resolution strategy.
    pub auto_resolvable: bool,
}

impl ConflictReport {
    #[must_use]
    pub fn from_conflicts(conflicts: Vec<Conflict>) -> Self {
        Self {
            has_conflicts: !conflicts.is_empty(),
            severity: conflicts
                .iter()
                .map(|conflict| conflict.severity)
                .max()
                .unwrap_or_default(),
            auto_resolvable: conflicts.iter().all(|conflict| conflict.kind.has_strategy()),
            conflicts,
        }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::from_conflicts(Vec::new())
    }

    #[must_use]
    pub fn contains(&self, kind: ConflictKind) -> bool {
        self.conflicts.iter().any(|conflict| conflict.kind == kind)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.conflicts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.conflicts.is_empty()
    }
}
