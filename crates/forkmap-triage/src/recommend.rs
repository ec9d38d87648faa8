//! Actionable recommendations derived from item and bucket metrics.

use forkmap_core::{Board, EngineConfig};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::conflict::{ConflictKind, analyze_current};
use crate::metrics::{BucketMetrics, ItemMetrics, bucket_metrics, item_metrics};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    HighRiskBucket,
    OverloadedBucket,
    Bottleneck,
    DependencyConflict,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub kind: RecommendationKind,
    pub priority: Priority,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bucket_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_id: Option<String>,
}

/// Recommendations for the whole board, highest priority first.
#[must_use]
#[instrument(skip(board, config))]
pub fn recommendations(board: &Board, config: &EngineConfig) -> Vec<Recommendation> {
    recommendations_from(
        board,
        config,
        &item_metrics(board),
        &bucket_metrics(board, config),
    )
}

/// Recommendations from already computed metrics.
///
/// Candidates are gathered as risky buckets, crowded buckets (both in
/// bucket order), bottlenecks (in ranked order), then items whose own
/// bucket breaks a dependency ordering (declaration order). Capacity
/// conflicts already show up in bucket risk. A stable sort by priority
/// keeps that order within each priority.
#[must_use]
pub fn recommendations_from(
    board: &Board,
    config: &EngineConfig,
    items: &[ItemMetrics],
    buckets: &[BucketMetrics],
) -> Vec<Recommendation> {
    let mut out = Vec::new();

    for bucket in buckets {
        if bucket.risk_score > config.recommend.high_risk_threshold {
            out.push(Recommendation {
                kind: RecommendationKind::HighRiskBucket,
                priority: Priority::High,
                message: format!(
                    "{} has high risk (score: {}). Consider redistributing items.",
                    bucket.bucket_name, bucket.risk_score
                ),
                bucket_id: Some(bucket.bucket_id.clone()),
                item_id: None,
            });
        }
        if bucket.item_count > config.recommend.crowded_bucket_threshold {
            out.push(Recommendation {
                kind: RecommendationKind::OverloadedBucket,
                priority: Priority::Medium,
                message: format!(
                    "{} has {} items. Consider moving some to adjacent forks.",
                    bucket.bucket_name, bucket.item_count
                ),
                bucket_id: Some(bucket.bucket_id.clone()),
                item_id: None,
            });
        }
    }

    for item in items.iter().filter(|item| item.is_bottleneck) {
        out.push(Recommendation {
            kind: RecommendationKind::Bottleneck,
            priority: Priority::High,
            message: format!(
                "{} is a bottleneck blocking multiple paths. Prioritize this item.",
                item.name
            ),
            bucket_id: None,
            item_id: Some(item.id.clone()),
        });
    }

    for item in board.items() {
        let ordering = analyze_current(board, config, &item.id)
            .conflicts
            .iter()
            .filter(|conflict| {
                matches!(
                    conflict.kind,
                    ConflictKind::DependencyAfter | ConflictKind::DependentBefore
                )
            })
            .count();
        if ordering > 0 {
            out.push(Recommendation {
                kind: RecommendationKind::DependencyConflict,
                priority: Priority::High,
                message: format!("{} has {ordering} dependency conflicts.", item.name),
                bucket_id: None,
                item_id: Some(item.id.clone()),
            });
        }
    }

    out.sort_by(|a, b| b.priority.cmp(&a.priority));
    debug!(recommendations = out.len(), "recommendations built");
    out
}
