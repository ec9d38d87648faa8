//! Bucket load and risk.
//!
//! # Risk
//!
//! ```text
//! risk = Σ complexity risk (low 1, medium 2, high 4, very-high 6)
//!      + 3 * Σ conflicts of each item against this bucket
//!      + 2 * max(0, items - crowding baseline)
//!      + 5 * max(0, headliners - allowance)   (waived for the overflow bucket)
//! ```

#![allow(clippy::module_name_repetitions)]

use std::collections::HashSet;

use forkmap_core::graph::items_in_bucket;
use forkmap_core::{Board, Bucket, EngineConfig, Item};
use serde::Serialize;
use tracing::instrument;

use crate::conflict::analyze;

use super::count_u32;

/// Average complexity weight band of a bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComplexityLevel {
    Empty,
    Low,
    Medium,
    High,
    VeryHigh,
}

impl ComplexityLevel {
    /// Band for an average weight of `total_weight / item_count`: below 1.5
    /// is low, below 2.5 medium, below 3.5 high. Exact integer comparison.
    #[must_use]
    pub fn classify(total_weight: u32, item_count: usize) -> Self {
        if item_count == 0 {
            return Self::Empty;
        }
        let doubled = 2 * u64::from(total_weight);
        let count = u64::try_from(item_count).unwrap_or(u64::MAX);
        if doubled < 3 * count {
            Self::Low
        } else if doubled < 5 * count {
            Self::Medium
        } else if doubled < 7 * count {
            Self::High
        } else {
            Self::VeryHigh
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::VeryHigh => "very-high",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeadlinerRef {
    pub id: String,
    pub name: String,
    pub layer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BucketMetrics {
    pub bucket_id: String,
    pub bucket_name: String,
    pub index: usize,
    pub item_count: usize,
    pub total_complexity_weight: u32,
    pub headliner_count: usize,
    pub headliners: Vec<HeadlinerRef>,
    /// Dependency edges from an item in this bucket to an existing item of
    /// another layer, each distinct edge counted once.
    pub cross_layer_dependency_count: usize,
    pub risk_score: u32,
    pub complexity_level: ComplexityLevel,
}

/// Metrics for every bucket, in bucket order.
#[must_use]
#[instrument(skip(board, config), fields(buckets = board.bucket_count()))]
pub fn bucket_metrics(board: &Board, config: &EngineConfig) -> Vec<BucketMetrics> {
    board
        .buckets()
        .iter()
        .enumerate()
        .map(|(index, bucket)| metrics_for(board, config, index, bucket))
        .collect()
}

fn metrics_for(board: &Board, config: &EngineConfig, index: usize, bucket: &Bucket) -> BucketMetrics {
    let items = items_in_bucket(board, &bucket.id);
    let total_complexity_weight = items.iter().map(|item| item.complexity.weight()).sum();
    let headliners: Vec<HeadlinerRef> = items
        .iter()
        .filter(|item| item.is_headliner())
        .map(|item| HeadlinerRef {
            id: item.id.clone(),
            name: item.name.clone(),
            layer: item.layer.clone(),
        })
        .collect();

    BucketMetrics {
        bucket_id: bucket.id.clone(),
        bucket_name: bucket.name.clone(),
        index,
        item_count: items.len(),
        total_complexity_weight,
        headliner_count: headliners.len(),
        headliners,
        cross_layer_dependency_count: cross_layer_edges(board, &items),
        risk_score: risk_for(board, config, &bucket.id, &items),
        complexity_level: ComplexityLevel::classify(total_complexity_weight, items.len()),
    }
}

fn cross_layer_edges(board: &Board, items: &[&Item]) -> usize {
    items
        .iter()
        .map(|item| {
            item.dependencies
                .iter()
                .map(String::as_str)
                .collect::<HashSet<&str>>()
                .into_iter()
                .filter_map(|dep_id| board.item(dep_id))
                .filter(|dep| dep.layer != item.layer)
                .count()
        })
        .sum()
}

/// Risk score of one bucket; 0 for an unknown or empty bucket.
#[must_use]
pub fn risk_score(board: &Board, config: &EngineConfig, bucket_id: &str) -> u32 {
    risk_for(board, config, bucket_id, &items_in_bucket(board, bucket_id))
}

fn risk_for(board: &Board, config: &EngineConfig, bucket_id: &str, items: &[&Item]) -> u32 {
    let complexity: u32 = items.iter().map(|item| item.complexity.risk()).sum();

    let conflicts: usize = items
        .iter()
        .map(|item| analyze(board, config, &item.id, bucket_id).len())
        .sum();

    let crowding = items.len().saturating_sub(config.risk.crowding_baseline);

    let headliners = items.iter().filter(|item| item.is_headliner()).count();
    let headliner_excess = if config.conflicts.is_overflow_bucket(bucket_id) {
        0
    } else {
        headliners.saturating_sub(config.risk.headliner_allowance)
    };

    complexity
        .saturating_add(count_u32(conflicts).saturating_mul(3))
        .saturating_add(count_u32(crowding).saturating_mul(2))
        .saturating_add(count_u32(headliner_excess).saturating_mul(5))
}
