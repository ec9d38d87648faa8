//! Move-independent scoring of items and buckets.
//!
//! # Overview
//!
//! - [`items`]: criticality score, longest dependency chain, and bottleneck
//!   status for every item, ranked.
//! - [`buckets`]: per-bucket load, headliners, cross-layer edges, and risk.
//!
//! Everything here reads the committed board. Nothing is cached between
//! calls; callers that throttle recomputation can key on
//! [`forkmap_core::Board::fingerprint`].

pub mod buckets;
pub mod items;

pub use buckets::{BucketMetrics, ComplexityLevel, HeadlinerRef, bucket_metrics, risk_score};
pub use items::{
    ItemMetrics, criticality_score, is_bottleneck, item_metrics, path_length, top_critical,
};

/// Lossless-enough count conversion for integer score arithmetic.
pub(crate) fn count_i64(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

pub(crate) fn count_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}
