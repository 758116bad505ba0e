//! Ranking of scored videos by performance score.

use serde::{Deserialize, Serialize};

use crate::metrics::{EngagementMetrics, RawMetrics};

/// A video with its raw counters, derived metrics, and the descriptive
/// fields the exporters denormalize into every row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredVideo {
    pub raw: RawMetrics,
    pub metrics: EngagementMetrics,
    pub title: String,
    pub channel_title: String,
    pub channel_id: String,
    /// ISO-8601 duration as reported by the source (e.g. `PT58S`).
    pub duration: String,
    /// Human-readable label of the search category the video came from.
    pub category: String,
    /// Human-readable label of the search ordering used.
    pub sort_method: String,
}

/// Order videos by performance score, descending.
///
/// The sort is stable: videos with equal scores keep their input order,
/// so repeated runs over the same sequence rank deterministically.
/// Scores are finite by construction, but the comparator is total anyway.
#[must_use]
pub fn rank(mut videos: Vec<ScoredVideo>) -> Vec<ScoredVideo> {
    videos.sort_by(|a, b| {
        b.metrics
            .performance_score
            .total_cmp(&a.metrics.performance_score)
    });
    videos
}
