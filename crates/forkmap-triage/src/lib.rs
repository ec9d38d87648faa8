#![forbid(unsafe_code)]
//! forkmap-triage library.
//!
//! Move analysis and scoring on top of a [`forkmap_core::Board`]:
//!
//! - [`conflict`]: what breaks if an item moves to another bucket.
//! - [`resolve`]: follow-up moves that repair those conflicts, and their
//!   execution.
//! - [`metrics`]: per-item criticality and per-bucket risk.
//! - [`recommend`], [`stats`], [`report`]: aggregate views for display.
//! - [`integrity`]: the core structural scan plus scheduling violations.
//!
//! # Conventions
//!
//! - **Errors**: analyses are total. Unknown ids produce empty or default
//!   results; only board mutation reports failures, per move.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `debug!`).

pub mod conflict;
pub mod integrity;
pub mod metrics;
pub mod recommend;
pub mod report;
pub mod resolve;
pub mod stats;

pub use conflict::{Conflict, ConflictKind, ConflictReport, Severity, analyze};
pub use resolve::{MoveOutcome, Plan, ProposedMove, plan};
