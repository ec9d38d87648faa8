//! Structural integrity scan of a board.
//!
//! Findings are non-fatal: a board with dangling dependencies or committed
//! cycles keeps working, every traversal simply skips or terminates on the
//! bad edges. The scan lets a caller enumerate them on demand.
//!
//! Timeline violations (items conflicting with their own bucket) need the
//! conflict detector and are added by `forkmap_triage::integrity::scan`.

use serde::Serialize;
use tracing::{debug, instrument};

use crate::board::Board;

use super::build::DependencyGraph;

/// One finding of an integrity scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IntegrityIssue {
    /// A dependency id with no matching item.
    DanglingDependency {
        item_id: String,
        missing_id: String,
        message: String,
    },
    /// A strongly connected component of the committed graph.
    Cycle { members: Vec<String>, message: String },
    /// An item that conflicts with the bucket it currently sits in.
    TimelineViolation {
        item_id: String,
        conflicts: usize,
        message: String,
    },
}

impl IntegrityIssue {
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::DanglingDependency { message, .. }
            | Self::Cycle { message, .. }
            | Self::TimelineViolation { message, .. } => message,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntegrityReport {
    pub is_valid: bool,
    pub issues: Vec<IntegrityIssue>,
}

impl IntegrityReport {
    #[must_use]
    pub fn from_issues(issues: Vec<IntegrityIssue>) -> Self {
        Self {
            is_valid: issues.is_empty(),
            issues,
        }
    }

    /// Append more findings, keeping `is_valid` in sync.
    pub fn extend(&mut self, more: impl IntoIterator<Item = IntegrityIssue>) {
        self.issues.extend(more);
        self.is_valid = self.issues.is_empty();
    }

    pub fn dangling(&self) -> impl Iterator<Item = &IntegrityIssue> {
        self.issues
            .iter()
            .filter(|issue| matches!(issue, IntegrityIssue::DanglingDependency { .. }))
    }
}

/// Every `(item, dependency id)` pair whose dependency names no item, in
/// declaration order.
#[must_use]
pub fn dangling_dependencies(board: &Board) -> Vec<IntegrityIssue> {
    board
        .items()
        .iter()
        .flat_map(|item| {
            item.dependencies
                .iter()
                .filter(|dep| !board.contains_item(dep))
                .map(move |dep| IntegrityIssue::DanglingDependency {
                    item_id: item.id.clone(),
                    missing_id: dep.clone(),
                    message: format!("{} depends on non-existent item: {dep}", item.name),
                })
        })
        .collect()
}

/// Cycles present in the committed dependency graph.
#[must_use]
pub fn committed_cycles(board: &Board) -> Vec<IntegrityIssue> {
    DependencyGraph::from_items(board.items())
        .cycles()
        .into_iter()
        .map(|members| {
            let message = format!("dependency cycle among: {}", members.join(", "));
            IntegrityIssue::Cycle { members, message }
        })
        .collect()
}

/// Structural scan: dangling dependencies, then committed cycles.
#[must_use]
#[instrument(skip(board))]
pub fn scan(board: &Board) -> IntegrityReport {
    let mut issues = dangling_dependencies(board);
    issues.extend(committed_cycles(board));
    debug!(issues = issues.len(), "structural integrity scan");
    IntegrityReport::from_issues(issues)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Bucket, Item, Layer};

    fn board(items: Vec<Item>) -> Board {
        Board::new(
            vec![Bucket::new("b0", "B0")],
            vec![Layer::new("l", "L")],
            items,
            vec![],
        )
        .expect("board")
    }

    #[test]
    fn clean_board_is_valid() {
        let board = board(vec![
            Item::new("a", "A", "l", "b0"),
            Item::new("b", "B", "l", "b0").depends_on(["a"]),
        ]);
        let report = scan(&board);
        assert!(report.is_valid);
        assert!(report.issues.is_empty());
    }

    #[test]
    fn dangling_dependency_is_reported() {
        let board = board(vec![Item::new("a", "Alpha", "l", "b0").depends_on(["ghost"])]);
        let report = scan(&board);

        assert!(!report.is_valid);
        assert_eq!(report.dangling().count(), 1);
        assert_eq!(
            report.issues[0],
            IntegrityIssue::DanglingDependency {
                item_id: "a".into(),
                missing_id: "ghost".into(),
                message: "Alpha depends on non-existent item: ghost".into(),
            }
        );
    }

    #[test]
    fn committed_cycle_is_reported() {
        let board = board(vec![
            Item::new("a", "A", "l", "b0").depends_on(["b"]),
            Item::new("b", "B", "l", "b0").depends_on(["a"]),
        ]);
        let report = scan(&board);
        assert_eq!(report.issues.len(), 1);
        assert!(matches!(
            &report.issues[0],
            IntegrityIssue::Cycle { members, .. } if members == &vec!["a".to_string(), "b".to_string()]
        ));
    }

    #[test]
    fn extend_keeps_validity_in_sync() {
        let mut report = IntegrityReport::from_issues(Vec::new());
        assert!(report.is_valid);
        report.extend([IntegrityIssue::TimelineViolation {
            item_id: "a".into(),
            conflicts: 1,
            message: "A has 1 scheduling conflicts".into(),
        }]);
        assert!(!report.is_valid);
    }

    #[test]
    fn issues_serialize_with_type_tag() {
        let issue = IntegrityIssue::Cycle {
            members: vec!["a".into()],
            message: "m".into(),
        };
        let json = serde_json::to_value(&issue).expect("serialize");
        assert_eq!(json["type"], "cycle");
    }
}
