//! Applying a plan's moves to a board.
//!
//! Moves are applied one at a time through [`Board::move_item`]. A failed
//! move is recorded and skipped; the rest still run.

use forkmap_core::Board;
use tracing::{info, instrument, warn};

use super::{MoveOutcome, Plan, ProposedMove};

/// Apply every automatic move in `plan`, in order.
///
/// Advisory and manual entries are never applied here.
#[instrument(skip(board, plan), fields(moves = plan.moves.len()))]
pub fn execute(board: &mut Board, plan: &Plan) -> Vec<MoveOutcome> {
    apply_all(board, &plan.moves)
}

/// Apply the advisory moves in `plan` after the caller confirmed them.
#[instrument(skip(board, plan), fields(warnings = plan.warnings.len()))]
pub fn confirm(board: &mut Board, plan: &Plan) -> Vec<MoveOutcome> {
    apply_all(board, &plan.warnings)
}

fn apply_all(board: &mut Board, moves: &[ProposedMove]) -> Vec<MoveOutcome> {
    let outcomes: Vec<MoveOutcome> = moves.iter().map(|proposed| apply(board, proposed)).collect();
    let applied = outcomes.iter().filter(|outcome| outcome.success).count();
    info!(applied, failed = outcomes.len() - applied, "plan moves applied");
    outcomes
}

fn apply(board: &mut Board, proposed: &ProposedMove) -> MoveOutcome {
    match board.move_item(&proposed.item_id, &proposed.target_bucket) {
        Ok(applied) => MoveOutcome {
            item_id: proposed.item_id.clone(),
            description: proposed.description.clone(),
            success: true,
            from: Some(applied.from),
            to: Some(applied.to),
            error: None,
        },
        Err(err) => {
            warn!(
                item = %proposed.item_id,
                target = %proposed.target_bucket,
                code = %err.code(),
                error = %err,
                "planned move failed"
            );
            MoveOutcome {
                item_id: proposed.item_id.clone(),
                description: proposed.description.clone(),
                success: false,
                from: None,
                to: None,
                error: Some(err.to_string()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conflict::analyze;
    use crate::resolve::{ResolutionStrategy, plan};
    use forkmap_core::{Bucket, EngineConfig, Item, Layer};

    fn board(items: Vec<Item>) -> Board {
        Board::new(
            (0..5)
                .map(|idx| Bucket::new(format!("f{idx}"), format!("F{idx}")))
                .collect(),
            vec![Layer::new("data", "Data")],
            items,
            vec![],
        )
        .expect("board")
    }

    fn proposed(item_id: &str, target: &str) -> ProposedMove {
        ProposedMove {
            item_id: item_id.into(),
            item_name: item_id.to_uppercase(),
            target_bucket: target.into(),
            description: format!("Move {item_id} to {target}"),
            automatic: true,
            strategy: ResolutionStrategy::MoveDependencyEarlier,
        }
    }

    #[test]
    fn execute_applies_automatic_moves() {
        let mut board = board(vec![
            Item::new("d", "D", "data", "f4"),
            Item::new("x", "X", "data", "f0").depends_on(["d"]),
        ]);
        let config = EngineConfig::default();
        let report = analyze(&board, &config, "x", "f2");
        let plan = plan(&board, "x", "f2", &report.conflicts);

        let outcomes = execute(&mut board, &plan);
        assert_eq!(outcomes.len(), 1);
        assert!(outcomes[0].success);
        assert_eq!(outcomes[0].from.as_deref(), Some("f4"));
        assert_eq!(outcomes[0].to.as_deref(), Some("f1"));
        assert_eq!(board.item("d").map(|item| item.bucket.as_str()), Some("f1"));
        // The analyzed item itself is not moved by the plan.
        assert_eq!(board.item("x").map(|item| item.bucket.as_str()), Some("f0"));

        board.move_item("x", "f2").expect("move");
        assert!(!analyze(&board, &config, "x", "f2").has_conflicts);
    }

    #[test]
    fn failures_are_recorded_and_processing_continues() {
        let mut board = board(vec![Item::new("a", "A", "data", "f0"), Item::new("b", "B", "data", "f0")]);
        let plan = Plan {
            moves: vec![proposed("a", "f1"), proposed("ghost", "f1"), proposed("b", "z-star"), proposed("b", "f3")],
            ..Plan::default()
        };

        let outcomes = execute(&mut board, &plan);
        let success: Vec<bool> = outcomes.iter().map(|outcome| outcome.success).collect();
        assert_eq!(success, vec![true, false, false, true]);
        assert!(outcomes[1].error.is_some());
        assert!(outcomes[2].error.is_some());
        assert_eq!(board.item("a").map(|item| item.bucket.as_str()), Some("f1"));
        assert_eq!(board.item("b").map(|item| item.bucket.as_str()), Some("f3"));
    }

    #[test]
    fn advisory_moves_wait_for_confirmation() {
        let mut board = board(vec![Item::new("a", "A", "data", "f0")]);
        let mut warning = proposed("a", "f2");
        warning.automatic = false;
        warning.strategy = ResolutionStrategy::BreakCycle;
        let plan = Plan {
            warnings: vec![warning],
            ..Plan::default()
        };

        assert!(execute(&mut board, &plan).is_empty());
        assert_eq!(board.item("a").map(|item| item.bucket.as_str()), Some("f0"));

        let outcomes = confirm(&mut board, &plan);
        assert!(outcomes[0].success);
        assert_eq!(board.item("a").map(|item| item.bucket.as_str()), Some("f2"));
    }
}
