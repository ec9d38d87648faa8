#![forbid(unsafe_code)]
//! forkmap-core library.
//!
//! Owns the board catalog (buckets, layers, items, goals), the only mutation
//! path for bucket assignments, the read-only graph query service, and
//! snapshot persistence.
//!
//! # Conventions
//!
//! - **Errors**: typed `thiserror` enums for catalog, move, and import
//!   failures, each mapped to a stable [`error::ErrorCode`]. Config loading
//!   uses `anyhow::Result`.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `debug!`).

pub mod board;
pub mod config;
pub mod error;
pub mod graph;
pub mod model;
pub mod snapshot;

pub use board::{AppliedMove, Board};
pub use config::EngineConfig;
pub use graph::view::{BoardView, Overlay};
pub use model::{Bucket, BucketStatus, Catalog, Complexity, Item, ItemType, Layer};
