//! Read-only graph services over a [`crate::Board`].
//!
//! ## Submodules
//!
//! - [`query`]: transitive dependency/dependent closures and bucket filters.
//! - [`view`]: the [`view::BoardView`] trait and the single-move
//!   [`view::Overlay`] used to simulate a move without mutating the board.
//! - [`build`]: petgraph materialization of the dependency edges.
//! - [`integrity`]: structural scan for dangling dependencies and committed
//!   cycles.

pub mod build;
pub mod integrity;
pub mod query;
pub mod view;

pub use build::DependencyGraph;
pub use integrity::{IntegrityIssue, IntegrityReport};
pub use query::{dependencies, dependents, direct_dependents, items_in_bucket, items_in_bucket_and_layer};
pub use view::{BoardView, Overlay};
