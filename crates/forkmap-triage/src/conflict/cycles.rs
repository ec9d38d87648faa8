//! Cycle search over dependency edges, as seen through a [`BoardView`].
//!
//! Iterative depth-first search with tri-color marking, so deep chains never
//! touch the call stack. A dependency edge into a node that is still in
//! progress (gray) is a back edge; the cycle is read straight off the DFS
//! stack from that node to the top.

#![allow(clippy::module_name_repetitions)]

use std::collections::HashMap;

use forkmap_core::graph::BoardView;
use forkmap_core::Item;

/// DFS node state. Absent from the color map means white (unvisited).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    /// On the DFS stack.
    Gray,
    /// Fully explored.
    Black,
}

/// First cycle reachable from `start` by following dependency edges.
///
/// Returns the cycle as item ids `[n0, n1, .., nk, n0]`, where each id
/// depends on the next. The cycle need not pass through `start`. Dangling
/// dependency ids are skipped. `None` for an unknown start item or an
/// acyclic reachable subgraph.
#[must_use]
pub fn find_cycle_from<V: BoardView + ?Sized>(view: &V, start: &str) -> Option<Vec<String>> {
    let root = view.item(start)?;

    let mut color: HashMap<&str, Color> = HashMap::from([(root.id.as_str(), Color::Gray)]);
    // Frames are (item, index of the next dependency to visit).
    let mut stack: Vec<(&Item, usize)> = vec![(root, 0)];

    while let Some(frame) = stack.last_mut() {
        let (item, next) = *frame;

        let Some(dep_id) = item.dependencies.get(next) else {
            color.insert(item.id.as_str(), Color::Black);
            stack.pop();
            continue;
        };
        frame.1 += 1;

        let Some(dep) = view.item(dep_id) else {
            continue;
        };

        match color.get(dep.id.as_str()) {
            Some(Color::Gray) => {
                let from = stack
                    .iter()
                    .position(|(node, _)| node.id == dep.id)
                    .unwrap_or_default();
                let mut cycle: Vec<String> =
                    stack[from..].iter().map(|(node, _)| node.id.clone()).collect();
                cycle.push(dep.id.clone());
                return Some(cycle);
            }
            Some(Color::Black) => {}
            None => {
                color.insert(dep.id.as_str(), Color::Gray);
                stack.push((dep, 0));
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use forkmap_core::{Board, Bucket, Layer, Overlay};

    fn board(items: Vec<Item>) -> Board {
        Board::new(
            vec![Bucket::new("b0", "B0"), Bucket::new("b1", "B1")],
            vec![Layer::new("l", "L")],
            items,
            vec![],
        )
        .expect("board")
    }

    fn item(id: &str, deps: &[&str]) -> Item {
        Item::new(id, id.to_uppercase(), "l", "b0").depends_on(deps.iter().copied())
    }

    #[test]
    fn acyclic_graph_has_no_cycle() {
        let board = board(vec![item("a", &[]), item("b", &["a"]), item("c", &["b", "a"])]);
        for id in ["a", "b", "c"] {
            assert_eq!(find_cycle_from(&board, id), None);
        }
    }

    #[test]
    fn cycle_through_start_is_closed_on_start() {
        let board = board(vec![item("a", &["b"]), item("b", &["c"]), item("c", &["a"])]);
        assert_eq!(
            find_cycle_from(&board, "a"),
            Some(vec!["a".into(), "b".into(), "c".into(), "a".into()])
        );
        assert_eq!(
            find_cycle_from(&board, "b"),
            Some(vec!["b".into(), "c".into(), "a".into(), "b".into()])
        );
    }

    #[test]
    fn downstream_cycle_is_reported_without_start() {
        let board = board(vec![item("s", &["x"]), item("x", &["y"]), item("y", &["x"])]);
        assert_eq!(
            find_cycle_from(&board, "s"),
            Some(vec!["x".into(), "y".into(), "x".into()])
        );
    }

    #[test]
    fn self_dependency_is_a_cycle() {
        let board = board(vec![item("a", &["a"])]);
        assert_eq!(find_cycle_from(&board, "a"), Some(vec!["a".into(), "a".into()]));
    }

    #[test]
    fn diamond_is_not_a_cycle() {
        // d depends on b and c, both depend on a: a is reached twice.
        let board = board(vec![
            item("a", &[]),
            item("b", &["a"]),
            item("c", &["a"]),
            item("d", &["b", "c"]),
        ]);
        assert_eq!(find_cycle_from(&board, "d"), None);
    }

    #[test]
    fn dangling_and_unknown_ids_are_ignored() {
        let board = board(vec![item("a", &["ghost"])]);
        assert_eq!(find_cycle_from(&board, "a"), None);
        assert_eq!(find_cycle_from(&board, "ghost"), None);
    }

    #[test]
    fn overlay_sees_the_same_edges() {
        let board = board(vec![item("a", &["b"]), item("b", &["a"])]);
        let view = Overlay::new(&board, "a", "b1");
        assert_eq!(
            find_cycle_from(&view, "a"),
            Some(vec!["a".into(), "b".into(), "a".into()])
        );
    }

    #[test]
    fn long_chain_does_not_recurse() {
        let ids: Vec<String> = (0..5_000).map(|idx| format!("n{idx}")).collect();
        let items = ids
            .iter()
            .enumerate()
            .map(|(idx, id)| {
                let deps: Vec<&str> = ids.get(idx + 1).map(String::as_str).into_iter().collect();
                item(id, &deps)
            })
            .collect();
        let board = board(items);
        assert_eq!(find_cycle_from(&board, "n0"), None);
    }
}
