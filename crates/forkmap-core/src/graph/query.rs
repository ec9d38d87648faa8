//! Graph query service: transitive closures and bucket filters.
//!
//! # Edge Direction
//!
//! `item.dependencies` lists what an item depends on. "Dependencies of X"
//! walks those lists outward; "dependents of X" walks them in reverse.
//!
//! # Guarantees
//!
//! - Pure: nothing here mutates the board.
//! - Total: an unknown id yields an empty result, never an error.
//! - Cycle-safe: every traversal keeps a visited set seeded with the start
//!   item, so an existing cycle terminates the walk and the start item never
//!   appears in its own closure.
//! - Dangling dependency ids are skipped.
//! - Results are deduplicated and in breadth-first discovery order.
//!
//! Each closure is O(V+E).

use std::collections::{HashMap, HashSet, VecDeque};

use crate::model::Item;

use super::view::BoardView;

/// Transitive closure of the items `item_id` depends on.
#[must_use]
pub fn dependencies<'a, V: BoardView + ?Sized>(view: &'a V, item_id: &str) -> Vec<&'a str> {
    let Some(root) = view.item(item_id) else {
        return Vec::new();
    };

    let mut visited: HashSet<&str> = HashSet::from([root.id.as_str()]);
    let mut closure = Vec::new();
    let mut queue: VecDeque<&Item> = VecDeque::from([root]);

    while let Some(current) = queue.pop_front() {
        for dep_id in &current.dependencies {
            let Some(dep) = view.item(dep_id) else {
                continue;
            };
            if visited.insert(dep.id.as_str()) {
                closure.push(dep.id.as_str());
                queue.push_back(dep);
            }
        }
    }

    closure
}

/// Transitive closure of the items that depend on `item_id`.
#[must_use]
pub fn dependents<'a, V: BoardView + ?Sized>(view: &'a V, item_id: &str) -> Vec<&'a str> {
    let Some(root) = view.item(item_id) else {
        return Vec::new();
    };

    let reverse = reverse_edges(view.items());

    let mut visited: HashSet<&str> = HashSet::from([root.id.as_str()]);
    let mut closure = Vec::new();
    let mut queue: VecDeque<&str> = VecDeque::from([root.id.as_str()]);

    while let Some(current) = queue.pop_front() {
        let Some(next) = reverse.get(current) else {
            continue;
        };
        for &dependent in next {
            if visited.insert(dependent) {
                closure.push(dependent);
                queue.push_back(dependent);
            }
        }
    }

    closure
}

/// Items that list `item_id` as a direct dependency, in declaration order.
#[must_use]
pub fn direct_dependents<'a, V: BoardView + ?Sized>(view: &'a V, item_id: &str) -> Vec<&'a Item> {
    view.items()
        .iter()
        .filter(|item| item.id != item_id && item.dependencies.iter().any(|dep| dep == item_id))
        .collect()
}

/// Items currently in `bucket_id`, in declaration order.
#[must_use]
pub fn items_in_bucket<'a, V: BoardView + ?Sized>(view: &'a V, bucket_id: &str) -> Vec<&'a Item> {
    view.items()
        .iter()
        .filter(|item| view.bucket_of(&item.id) == Some(bucket_id))
        .collect()
}

/// Items currently in `bucket_id` that belong to `layer`.
#[must_use]
pub fn items_in_bucket_and_layer<'a, V: BoardView + ?Sized>(
    view: &'a V,
    bucket_id: &str,
    layer: &str,
) -> Vec<&'a Item> {
    items_in_bucket(view, bucket_id)
        .into_iter()
        .filter(|item| item.layer == layer)
        .collect()
}

/// dependency id → ids of items that depend on it. Targets keep declaration
/// order.
fn reverse_edges(items: &[Item]) -> HashMap<&str, Vec<&str>> {
    let mut reverse: HashMap<&str, Vec<&str>> = HashMap::new();
    for item in items {
        for dep in &item.dependencies {
            reverse.entry(dep.as_str()).or_default().push(item.id.as_str());
        }
    }
    reverse
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::graph::view::Overlay;
    use crate::model::{Bucket, Layer};

    fn board(items: Vec<Item>) -> Board {
        Board::new(
            vec![
                Bucket::new("b0", "B0"),
                Bucket::new("b1", "B1"),
                Bucket::new("b2", "B2"),
            ],
            vec![Layer::new("consensus", "C"), Layer::new("data", "D")],
            items,
            vec![],
        )
        .expect("board")
    }

    fn chain() -> Board {
        // a ← b ← c, and d depends on a directly
        board(vec![
            Item::new("a", "A", "consensus", "b0"),
            Item::new("b", "B", "consensus", "b1").depends_on(["a"]),
            Item::new("c", "C", "data", "b2").depends_on(["b"]),
            Item::new("d", "D", "data", "b2").depends_on(["a"]),
        ])
    }

    #[test]
    fn dependencies_are_transitive() {
        let board = chain();
        assert_eq!(dependencies(&board, "c"), vec!["b", "a"]);
        assert_eq!(dependencies(&board, "a"), Vec::<&str>::new());
    }

    #[test]
    fn dependents_are_transitive() {
        let board = chain();
        assert_eq!(dependents(&board, "a"), vec!["b", "d", "c"]);
        assert_eq!(dependents(&board, "c"), Vec::<&str>::new());
    }

    #[test]
    fn unknown_ids_yield_empty_results() {
        let board = chain();
        assert!(dependencies(&board, "ghost").is_empty());
        assert!(dependents(&board, "ghost").is_empty());
        assert!(direct_dependents(&board, "ghost").is_empty());
        assert!(items_in_bucket(&board, "nowhere").is_empty());
    }

    #[test]
    fn closures_exclude_self_under_cycle() {
        let board = board(vec![
            Item::new("x", "X", "data", "b0").depends_on(["y"]),
            Item::new("y", "Y", "data", "b0").depends_on(["z"]),
            Item::new("z", "Z", "data", "b0").depends_on(["x"]),
        ]);

        for id in ["x", "y", "z"] {
            let deps = dependencies(&board, id);
            assert_eq!(deps.len(), 2, "{id}: {deps:?}");
            assert!(!deps.contains(&id));

            let dependents = dependents(&board, id);
            assert_eq!(dependents.len(), 2, "{id}: {dependents:?}");
            assert!(!dependents.contains(&id));
        }
    }

    #[test]
    fn self_dependency_is_not_reported() {
        let board = board(vec![Item::new("x", "X", "data", "b0").depends_on(["x"])]);
        assert!(dependencies(&board, "x").is_empty());
        assert!(dependents(&board, "x").is_empty());
        assert!(direct_dependents(&board, "x").is_empty());
    }

    #[test]
    fn dangling_dependencies_are_skipped() {
        let board = board(vec![
            Item::new("x", "X", "data", "b0").depends_on(["ghost", "y"]),
            Item::new("y", "Y", "data", "b0"),
        ]);
        assert_eq!(dependencies(&board, "x"), vec!["y"]);
    }

    #[test]
    fn bucket_filters() {
        let board = chain();
        let ids: Vec<&str> = items_in_bucket(&board, "b2")
            .iter()
            .map(|item| item.id.as_str())
            .collect();
        assert_eq!(ids, vec!["c", "d"]);

        let data_only = items_in_bucket_and_layer(&board, "b1", "data");
        assert!(data_only.is_empty());
        assert_eq!(items_in_bucket_and_layer(&board, "b1", "consensus").len(), 1);
    }

    #[test]
    fn bucket_filters_see_overlay() {
        let board = chain();
        let view = Overlay::new(&board, "a", "b2");
        let ids: Vec<&str> = items_in_bucket(&view, "b2")
            .iter()
            .map(|item| item.id.as_str())
            .collect();
        assert_eq!(ids, vec!["a", "c", "d"]);
        assert!(items_in_bucket(&view, "b0").is_empty());
    }

    #[test]
    fn direct_dependents_in_declaration_order() {
        let board = chain();
        let ids: Vec<&str> = direct_dependents(&board, "a")
            .iter()
            .map(|item| item.id.as_str())
            .collect();
        assert_eq!(ids, vec!["b", "d"]);
    }
}
