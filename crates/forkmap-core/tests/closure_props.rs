//! Property tests for the graph query service on arbitrary (possibly cyclic)
//! dependency graphs.

use std::collections::HashSet;

use proptest::prelude::*;

use forkmap_core::graph::{dependencies, dependents, direct_dependents};
use forkmap_core::{Board, Bucket, Item, Layer};

/// Up to 12 items with arbitrary edges, including self-loops, cycles, and
/// dangling ids.
fn arb_board() -> impl Strategy<Value = Board> {
    (1usize..12)
        .prop_flat_map(|n| {
            (
                Just(n),
                prop::collection::vec(prop::collection::vec(0usize..n + 2, 0..4), n),
                prop::collection::vec(0usize..3, n),
            )
        })
        .prop_map(|(n, edges, buckets)| {
            let items = (0..n)
                .map(|idx| {
                    Item::new(format!("i{idx}"), format!("Item {idx}"), "l", format!("b{}", buckets[idx]))
                        .depends_on(edges[idx].iter().map(|dep| format!("i{dep}")))
                })
                .collect();
            Board::new(
                (0..3).map(|idx| Bucket::new(format!("b{idx}"), format!("B{idx}"))).collect(),
                vec![Layer::new("l", "L")],
                items,
                vec![],
            )
            .expect("generated board is valid")
        })
}

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(256))]

    #[test]
    fn closures_never_contain_the_start_item(board in arb_board()) {
        for item in board.items() {
            let deps = dependencies(&board, &item.id);
            prop_assert!(!deps.contains(&item.id.as_str()));
            let users = dependents(&board, &item.id);
            prop_assert!(!users.contains(&item.id.as_str()));
        }
    }

    #[test]
    fn closures_are_deduplicated_and_existing(board in arb_board()) {
        for item in board.items() {
            for closure in [dependencies(&board, &item.id), dependents(&board, &item.id)] {
                let unique: HashSet<&str> = closure.iter().copied().collect();
                prop_assert_eq!(unique.len(), closure.len());
                prop_assert!(closure.iter().all(|id| board.contains_item(id)));
            }
        }
    }

    #[test]
    fn dependents_mirror_dependencies(board in arb_board()) {
        for item in board.items() {
            for dep in dependencies(&board, &item.id) {
                prop_assert!(dependents(&board, dep).contains(&item.id.as_str()));
            }
        }
    }

    #[test]
    fn direct_dependents_are_inside_the_closure(board in arb_board()) {
        for item in board.items() {
            let closure = dependents(&board, &item.id);
            for direct in direct_dependents(&board, &item.id) {
                prop_assert!(closure.contains(&direct.id.as_str()));
            }
        }
    }
}
