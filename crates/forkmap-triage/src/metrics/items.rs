//! Item criticality.
//!
//! # Score
//!
//! ```text
//! score = 10 * dependents + 20 (headliner) + complexity bonus
//!       - 2 * dependencies + 3 * (bucket count - bucket index)
//! ```
//!
//! clamped at zero. Both counts are transitive closure sizes. The bucket
//! term rewards items scheduled early and is dropped when the item's bucket
//! is unknown.

#![allow(clippy::module_name_repetitions)]

use std::collections::{HashMap, HashSet};

use forkmap_core::graph::{dependencies, dependents};
use forkmap_core::{Board, Item};
use serde::Serialize;
use tracing::{debug, instrument};

use super::count_i64;

/// Goal items needed before an item counts as a bottleneck.
const BOTTLENECK_GOALS: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemMetrics {
    pub id: String,
    pub name: String,
    pub layer: String,
    pub bucket: String,
    /// Size of the transitive dependent closure.
    pub dependent_count: usize,
    /// Size of the transitive dependency closure.
    pub dependency_count: usize,
    pub criticality_score: i64,
    /// Longest dependency chain below the item, in edges.
    pub path_length: usize,
    pub is_bottleneck: bool,
}

/// Criticality score of one item; 0 for an unknown id.
#[must_use]
pub fn criticality_score(board: &Board, item_id: &str) -> i64 {
    board.item(item_id).map_or(0, |item| {
        score(
            board,
            item,
            dependents(board, item_id).len(),
            dependencies(board, item_id).len(),
        )
    })
}

fn score(board: &Board, item: &Item, dependent_count: usize, dependency_count: usize) -> i64 {
    let mut score = 10 * count_i64(dependent_count);
    if item.is_headliner() {
        score += 20;
    }
    score += item.complexity.criticality_bonus();
    score -= 2 * count_i64(dependency_count);
    if let Some(index) = board.bucket_index(&item.bucket) {
        score += 3 * count_i64(board.bucket_count() - index);
    }
    score.max(0)
}

/// Length of the longest dependency chain starting at `item_id`, counted in
/// edges over existing items. 0 for a leaf or an unknown id.
///
/// An edge back into the chain being walked contributes nothing further, so
/// committed cycles terminate.
#[must_use]
pub fn path_length(board: &Board, item_id: &str) -> usize {
    let mut memo = HashMap::new();
    let mut in_progress = HashSet::new();
    board
        .item(item_id)
        .map_or(0, |item| chain_depth(board, item, &mut memo, &mut in_progress))
}

fn chain_depth<'a>(
    board: &'a Board,
    item: &'a Item,
    memo: &mut HashMap<&'a str, usize>,
    in_progress: &mut HashSet<&'a str>,
) -> usize {
    if let Some(&depth) = memo.get(item.id.as_str()) {
        return depth;
    }
    if !in_progress.insert(item.id.as_str()) {
        return 0;
    }

    let depth = item
        .dependencies
        .iter()
        .filter_map(|dep_id| board.item(dep_id))
        .map(|dep| 1 + chain_depth(board, dep, memo, in_progress))
        .max()
        .unwrap_or(0);

    in_progress.remove(item.id.as_str());
    memo.insert(item.id.as_str(), depth);
    depth
}

/// Whether at least two distinct goal items depend on `item_id`,
/// transitively. Goal ids that name no item are ignored.
#[must_use]
pub fn is_bottleneck(board: &Board, item_id: &str) -> bool {
    board.contains_item(item_id)
        && goal_items(board)
            .filter(|goal| dependencies(board, goal).contains(&item_id))
            .count()
            >= BOTTLENECK_GOALS
}

/// Distinct goal ids that name an item, in declaration order.
fn goal_items(board: &Board) -> impl Iterator<Item = &str> {
    let mut seen = HashSet::new();
    board
        .goals()
        .iter()
        .map(String::as_str)
        .filter(move |goal| board.contains_item(goal) && seen.insert(*goal))
}

/// item id → number of goals whose dependency closure contains it.
fn goal_coverage(board: &Board) -> HashMap<&str, usize> {
    let mut coverage: HashMap<&str, usize> = HashMap::new();
    for goal in goal_items(board) {
        for id in dependencies(board, goal) {
            *coverage.entry(id).or_default() += 1;
        }
    }
    coverage
}

/// Metrics for every item, ranked by criticality score descending. Ties keep
/// declaration order.
#[must_use]
#[instrument(skip(board), fields(items = board.items().len()))]
pub fn item_metrics(board: &Board) -> Vec<ItemMetrics> {
    let coverage = goal_coverage(board);

    let mut metrics: Vec<ItemMetrics> = board
        .items()
        .iter()
        .map(|item| {
            let dependent_count = dependents(board, &item.id).len();
            let dependency_count = dependencies(board, &item.id).len();
            ItemMetrics {
                id: item.id.clone(),
                name: item.name.clone(),
                layer: item.layer.clone(),
                bucket: item.bucket.clone(),
                dependent_count,
                dependency_count,
                criticality_score: score(board, item, dependent_count, dependency_count),
                path_length: path_length(board, &item.id),
                is_bottleneck: coverage.get(item.id.as_str()).copied().unwrap_or(0)
                    >= BOTTLENECK_GOALS,
            }
        })
        .collect();

    metrics.sort_by(|a, b| b.criticality_score.cmp(&a.criticality_score));
    debug!(
        bottlenecks = metrics.iter().filter(|m| m.is_bottleneck).count(),
        "item metrics computed"
    );
    metrics
}

/// The first `n` entries of a ranked metrics list.
#[must_use]
pub fn top_critical(metrics: &[ItemMetrics], n: usize) -> &[ItemMetrics] {
    &metrics[..n.min(metrics.len())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use forkmap_core::{Bucket, Complexity, Layer};

    fn board(items: Vec<Item>, goals: &[&str]) -> Board {
        Board::new(
            (0..4)
                .map(|idx| Bucket::new(format!("f{idx}"), format!("F{idx}")))
                .collect(),
            vec![Layer::new("l", "L")],
            items,
            goals.iter().map(ToString::to_string).collect(),
        )
        .expect("board")
    }

    #[test]
    fn score_formula() {
        // a ← b ← c
        let board = board(
            vec![
                Item::new("a", "A", "l", "f0").headliner().complexity(Complexity::High),
                Item::new("b", "B", "l", "f1").depends_on(["a"]),
                Item::new("c", "C", "l", "f3").complexity(Complexity::Low).depends_on(["b"]),
            ],
            &[],
        );

        // 10*2 + 20 + 10 - 0 + 3*(4-0)
        assert_eq!(criticality_score(&board, "a"), 62);
        // 10*1 + 5 - 2 + 3*3
        assert_eq!(criticality_score(&board, "b"), 22);
        // 0 + 0 - 4 + 3*1 clamps to 0
        assert_eq!(criticality_score(&board, "c"), 0);
        assert_eq!(criticality_score(&board, "ghost"), 0);
    }

    #[test]
    fn adding_a_dependent_never_lowers_the_score() {
        let base = board(vec![Item::new("a", "A", "l", "f2")], &[]);
        let grown = board(
            vec![
                Item::new("a", "A", "l", "f2"),
                Item::new("b", "B", "l", "f3").depends_on(["a"]),
            ],
            &[],
        );
        assert!(criticality_score(&grown, "a") >= criticality_score(&base, "a"));
    }

    #[test]
    fn path_length_is_longest_chain() {
        // d depends on c and a; c ← b ← a
        let board = board(
            vec![
                Item::new("a", "A", "l", "f0"),
                Item::new("b", "B", "l", "f0").depends_on(["a"]),
                Item::new("c", "C", "l", "f0").depends_on(["b"]),
                Item::new("d", "D", "l", "f0").depends_on(["a", "c", "ghost"]),
            ],
            &[],
        );
        assert_eq!(path_length(&board, "a"), 0);
        assert_eq!(path_length(&board, "c"), 2);
        assert_eq!(path_length(&board, "d"), 3);
        assert_eq!(path_length(&board, "ghost"), 0);
    }

    #[test]
    fn path_length_terminates_on_cycles() {
        let board = board(
            vec![
                Item::new("x", "X", "l", "f0").depends_on(["y"]),
                Item::new("y", "Y", "l", "f0").depends_on(["x"]),
                Item::new("z", "Z", "l", "f0").depends_on(["z"]),
            ],
            &[],
        );
        assert_eq!(path_length(&board, "x"), 2);
        assert_eq!(path_length(&board, "z"), 1);
    }

    #[test]
    fn bottleneck_needs_two_goals() {
        let items = vec![
            Item::new("core", "Core", "l", "f0"),
            Item::new("g1", "G1", "l", "f2").depends_on(["core"]),
            Item::new("g2", "G2", "l", "f3").depends_on(["core"]),
        ];

        let one = board(items.clone(), &["g1", "not-an-item"]);
        assert!(!is_bottleneck(&one, "core"));

        let two = board(items.clone(), &["g1", "g2"]);
        assert!(is_bottleneck(&two, "core"));
        assert!(!is_bottleneck(&two, "g1"));

        // The same goal listed twice is still one goal.
        let repeated = board(items, &["g1", "g1"]);
        assert!(!is_bottleneck(&repeated, "core"));
    }

    #[test]
    fn metrics_are_ranked_with_stable_ties() {
        let board = board(
            vec![
                Item::new("low", "Low", "l", "f3").complexity(Complexity::Low),
                Item::new("tie1", "Tie1", "l", "f1"),
                Item::new("tie2", "Tie2", "l", "f1"),
                Item::new("top", "Top", "l", "f0").headliner(),
            ],
            &[],
        );
        let ids: Vec<String> = item_metrics(&board).into_iter().map(|m| m.id).collect();
        assert_eq!(ids, vec!["top", "tie1", "tie2", "low"]);
    }

    #[test]
    fn metrics_agree_with_single_item_functions() {
        let board = board(
            vec![
                Item::new("core", "Core", "l", "f0").headliner(),
                Item::new("g1", "G1", "l", "f2").depends_on(["core"]),
                Item::new("g2", "G2", "l", "f3").depends_on(["g1", "core"]),
            ],
            &["g1", "g2"],
        );
        for metric in item_metrics(&board) {
            assert_eq!(metric.criticality_score, criticality_score(&board, &metric.id));
            assert_eq!(metric.path_length, path_length(&board, &metric.id));
            assert_eq!(metric.is_bottleneck, is_bottleneck(&board, &metric.id));
        }
    }

    #[test]
    fn top_critical_truncates() {
        let board = board(
            vec![Item::new("a", "A", "l", "f0"), Item::new("b", "B", "l", "f1")],
            &[],
        );
        let metrics = item_metrics(&board);
        assert_eq!(top_critical(&metrics, 1).len(), 1);
        assert_eq!(top_critical(&metrics, 5).len(), 2);
    }
}
