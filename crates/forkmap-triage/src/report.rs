//! Analytics report and display state.
//!
//! [`analytics_report`] bundles the ranked item metrics, bucket metrics, and
//! a summary into one serializable record. [`display_state`] turns the two
//! display toggles into the concrete highlights a renderer needs.

use forkmap_core::{Board, EngineConfig};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::metrics::{BucketMetrics, ComplexityLevel, ItemMetrics, bucket_metrics, item_metrics, top_critical};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsReport {
    /// [`Board::fingerprint`] of the analyzed board.
    pub fingerprint: String,
    pub items: Vec<ItemMetrics>,
    pub top_critical: Vec<ItemMetrics>,
    pub buckets: Vec<BucketMetrics>,
    pub summary: ReportSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSummary {
    pub total_items: usize,
    pub total_buckets: usize,
    /// Mean criticality score over all items; 0 for an empty board.
    pub average_criticality: f64,
    /// Bucket with the highest strictly positive risk, first one on ties.
    pub highest_risk_bucket: Option<String>,
}

#[must_use]
#[instrument(skip(board, config))]
pub fn analytics_report(board: &Board, config: &EngineConfig) -> AnalyticsReport {
    let items = item_metrics(board);
    let buckets = bucket_metrics(board, config);
    let summary = summarize(board, &items, &buckets);
    debug!(
        items = items.len(),
        highest_risk = ?summary.highest_risk_bucket,
        "analytics report built"
    );

    AnalyticsReport {
        fingerprint: board.fingerprint(),
        top_critical: top_critical(&items, config.display.report_top).to_vec(),
        items,
        buckets,
        summary,
    }
}

#[allow(clippy::cast_precision_loss)]
fn summarize(board: &Board, items: &[ItemMetrics], buckets: &[BucketMetrics]) -> ReportSummary {
    let average_criticality = if items.is_empty() {
        0.0
    } else {
        items.iter().map(|item| item.criticality_score).sum::<i64>() as f64 / items.len() as f64
    };

    let mut highest: Option<&BucketMetrics> = None;
    for bucket in buckets {
        if bucket.risk_score > highest.map_or(0, |best| best.risk_score) {
            highest = Some(bucket);
        }
    }

    ReportSummary {
        total_items: board.items().len(),
        total_buckets: board.bucket_count(),
        average_criticality,
        highest_risk_bucket: highest.map(|bucket| bucket.bucket_id.clone()),
    }
}

/// The two user-facing display switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DisplayToggles {
    #[serde(default)]
    pub critical_path: bool,
    #[serde(default)]
    pub complexity: bool,
}

/// A highlighted critical item, ranked from 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CriticalHighlight {
    pub rank: usize,
    pub item_id: String,
    pub score: i64,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BucketLabel {
    pub bucket_id: String,
    pub level: ComplexityLevel,
    pub label: String,
}

/// What to draw for the current toggles. Sections for a disabled toggle are
/// empty.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct DisplayState {
    pub critical: Vec<CriticalHighlight>,
    pub bucket_labels: Vec<BucketLabel>,
}

#[must_use]
#[instrument(skip(board, config))]
pub fn display_state(board: &Board, config: &EngineConfig, toggles: DisplayToggles) -> DisplayState {
    let mut state = DisplayState::default();

    if toggles.critical_path {
        let ranked = item_metrics(board);
        state.critical = top_critical(&ranked, config.display.top_critical)
            .iter()
            .enumerate()
            .map(|(idx, item)| CriticalHighlight {
                rank: idx + 1,
                item_id: item.id.clone(),
                score: item.criticality_score,
                title: format!("Critical Path #{} (Score: {})", idx + 1, item.criticality_score),
            })
            .collect();
    }

    if toggles.complexity {
        state.bucket_labels = bucket_metrics(board, config)
            .into_iter()
            .map(|bucket| BucketLabel {
                label: format!("{} items ({})", bucket.item_count, bucket.complexity_level.as_str()),
                bucket_id: bucket.bucket_id,
                level: bucket.complexity_level,
            })
            .collect();
    }

    state
}
