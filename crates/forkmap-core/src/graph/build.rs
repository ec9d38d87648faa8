//! petgraph materialization of a board's dependency edges.
//!
//! ## Edge Direction
//!
//! An edge `A → B` means "A must land no later than B": B lists A in its
//! `dependencies`. Dangling dependency ids produce no edge; they are
//! reported by [`super::integrity`].
//!
//! Used for whole-graph questions (strongly connected components, acyclicity)
//! where the per-item closures in [`super::query`] would be quadratic.

#![allow(clippy::module_name_repetitions)]

use std::collections::HashMap;

use petgraph::algo::{is_cyclic_directed, tarjan_scc};
use petgraph::graph::{DiGraph, NodeIndex};

use crate::model::Item;

#[derive(Debug)]
pub struct DependencyGraph {
    /// Directed graph: nodes = item ids, edges = dependency → dependent.
    pub graph: DiGraph<String, ()>,
    /// Mapping from item id to petgraph `NodeIndex`.
    pub node_map: HashMap<String, NodeIndex>,
}

impl DependencyGraph {
    /// Build the graph for `items`. Every item becomes a node, in order.
    #[must_use]
    pub fn from_items(items: &[Item]) -> Self {
        let mut graph = DiGraph::<String, ()>::with_capacity(items.len(), items.len());
        let mut node_map: HashMap<String, NodeIndex> = HashMap::with_capacity(items.len());

        for item in items {
            let idx = graph.add_node(item.id.clone());
            node_map.insert(item.id.clone(), idx);
        }

        for item in items {
            let dependent = node_map[&item.id];
            for dep in &item.dependencies {
                let Some(&dependency) = node_map.get(dep) else {
                    continue;
                };
                // Avoid duplicate edges (petgraph allows them by default).
                if !graph.contains_edge(dependency, dependent) {
                    graph.add_edge(dependency, dependent, ());
                }
            }
        }

        Self { graph, node_map }
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    #[must_use]
    pub fn node_index(&self, item_id: &str) -> Option<NodeIndex> {
        self.node_map.get(item_id).copied()
    }

    #[must_use]
    pub fn is_acyclic(&self) -> bool {
        !is_cyclic_directed(&self.graph)
    }

    /// Every cycle currently present, one sorted member list per strongly
    /// connected component. Self-loops are one-element cycles.
    #[must_use]
    pub fn cycles(&self) -> Vec<Vec<String>> {
        let mut cycles: Vec<Vec<String>> = tarjan_scc(&self.graph)
            .into_iter()
            .filter(|component| {
                component.len() > 1
                    || component
                        .first()
                        .is_some_and(|&node| self.graph.find_edge(node, node).is_some())
            })
            .map(|component| {
                let mut ids: Vec<String> = component
                    .into_iter()
                    .map(|idx| self.graph[idx].clone())
                    .collect();
                ids.sort_unstable();
                ids
            })
            .collect();

        cycles.sort_unstable();
        cycles
    }
}
