//! Engagement metric derivation for short-form videos.
//!
//! [`compute_metrics`] is a pure, total function from raw per-video counters
//! to derived engagement figures and a weighted performance score. Degenerate
//! inputs are handled by explicit policy rather than failure: a video with
//! zero views carries no signal and scores zero across the board.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Raw counters and timestamps for one video at observation time.
///
/// Counters are `u64`, so the non-negativity invariant holds by construction.
/// `published_at <= observed_at` is a caller precondition; an `observed_at`
/// earlier than `published_at` clamps at the one-hour velocity floor rather
/// than producing an inflated score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMetrics {
    /// Opaque video identifier, unique per video.
    pub video_id: String,
    pub view_count: u64,
    pub like_count: u64,
    pub comment_count: u64,
    /// Publication timestamp (UTC).
    pub published_at: DateTime<Utc>,
    /// Timestamp at which the counters were read (UTC).
    pub observed_at: DateTime<Utc>,
}

/// Derived engagement figures for one video. Produced once per
/// [`RawMetrics`] and never mutated afterwards.
///
/// Ratio fields are percentages rounded to two decimal places for
/// presentation; the performance score is computed from unrounded
/// intermediates before its own final rounding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngagementMetrics {
    /// (likes + comments) / views × 100, or 0 when views = 0.
    pub engagement_rate: f64,
    /// likes / views × 100, or 0 when views = 0.
    pub likes_to_views_ratio: f64,
    /// comments / views × 100, or 0 when views = 0.
    pub comments_to_views_ratio: f64,
    /// views / max(hours since publish, 1), or 0 when views = 0.
    pub avg_views_per_hour: f64,
    /// likes + comments.
    pub total_engagement: u64,
    /// Weighted composite in [0, 100]. See [`ScoringWeights`].
    pub performance_score: f64,
}

impl EngagementMetrics {
    fn zero() -> Self {
        Self {
            engagement_rate: 0.0,
            likes_to_views_ratio: 0.0,
            comments_to_views_ratio: 0.0,
            avg_views_per_hour: 0.0,
            total_engagement: 0,
            performance_score: 0.0,
        }
    }
}

/// Weights and normalization caps for the performance score.
///
/// These encode tunable ranking policy, not mathematical necessity, so they
/// are grouped here rather than inlined at the use sites. The defaults:
/// view counts are log-compressed with saturation around 100M views
/// (`log10(1e8) = 8`), engagement rates above 20% and velocities above
/// 10 000 views/hour are treated as maximal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub view_weight: f64,
    pub engagement_weight: f64,
    pub velocity_weight: f64,
    /// Divisor applied to `log10(views + 1)`; views at `10^divisor`
    /// saturate the view sub-score.
    pub view_log_divisor: f64,
    /// Engagement rate (percent) at which the engagement sub-score saturates.
    pub engagement_rate_cap: f64,
    /// Views-per-hour at which the velocity sub-score saturates.
    pub velocity_cap: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            view_weight: 0.4,
            engagement_weight: 0.3,
            velocity_weight: 0.3,
            view_log_divisor: 8.0,
            engagement_rate_cap: 20.0,
            velocity_cap: 10_000.0,
        }
    }
}

/// Hours elapsed between publication and observation, floored at one hour.
///
/// The floor keeps velocity finite for videos published moments before
/// observation; `published_at == observed_at` yields exactly 1.0.
#[allow(clippy::cast_precision_loss)]
fn hours_since_publish(raw: &RawMetrics) -> f64 {
    let elapsed = raw.observed_at.signed_duration_since(raw.published_at);
    (elapsed.num_seconds() as f64 / 3600.0).max(1.0)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Derive [`EngagementMetrics`] from raw counters.
///
/// Total over its domain: the only short-circuit is `view_count == 0`, which
/// returns all-zero metrics. Every other input produces a score in
/// `[0, 100]` — each sub-score is individually capped at 1 before weighting.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn compute_metrics(raw: &RawMetrics, weights: &ScoringWeights) -> EngagementMetrics {
    if raw.view_count == 0 {
        return EngagementMetrics::zero();
    }

    let views = raw.view_count as f64;
    let hours = hours_since_publish(raw);

    let total_engagement = raw.like_count + raw.comment_count;
    let engagement_rate = (total_engagement as f64 / views) * 100.0;
    let likes_to_views_ratio = (raw.like_count as f64 / views) * 100.0;
    let comments_to_views_ratio = (raw.comment_count as f64 / views) * 100.0;
    let avg_views_per_hour = views / hours;

    let normalized_views = ((views + 1.0).log10() / weights.view_log_divisor).min(1.0);
    let normalized_engagement = (engagement_rate / weights.engagement_rate_cap).min(1.0);
    let normalized_velocity = (avg_views_per_hour / weights.velocity_cap).min(1.0);

    let performance_score = (weights.view_weight * normalized_views
        + weights.engagement_weight * normalized_engagement
        + weights.velocity_weight * normalized_velocity)
        * 100.0;

    EngagementMetrics {
        engagement_rate: round2(engagement_rate),
        likes_to_views_ratio: round2(likes_to_views_ratio),
        comments_to_views_ratio: round2(comments_to_views_ratio),
        avg_views_per_hour: round2(avg_views_per_hour),
        total_engagement,
        performance_score: round2(performance_score),
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn raw(views: u64, likes: u64, comments: u64, hours_ago: i64) -> RawMetrics {
        let observed = Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap();
        RawMetrics {
            video_id: "vid-1".to_owned(),
            view_count: views,
            like_count: likes,
            comment_count: comments,
            published_at: observed - chrono::Duration::hours(hours_ago),
            observed_at: observed,
        }
    }

    #[test]
    fn zero_views_returns_all_zero_metrics() {
        let m = compute_metrics(&raw(0, 10, 3, 48), &ScoringWeights::default());
        assert_eq!(m.engagement_rate, 0.0);
        assert_eq!(m.likes_to_views_ratio, 0.0);
        assert_eq!(m.comments_to_views_ratio, 0.0);
        assert_eq!(m.avg_views_per_hour, 0.0);
        assert_eq!(m.total_engagement, 0);
        assert_eq!(m.performance_score, 0.0);
    }

    #[test]
    fn worked_example_matches_formula() {
        // 1M views, 50k likes, 5k comments, observed 10h after publish.
        let m = compute_metrics(&raw(1_000_000, 50_000, 5_000, 10), &ScoringWeights::default());
        assert_eq!(m.engagement_rate, 5.5);
        assert_eq!(m.likes_to_views_ratio, 5.0);
        assert_eq!(m.comments_to_views_ratio, 0.5);
        assert_eq!(m.avg_views_per_hour, 100_000.0);
        assert_eq!(m.total_engagement, 55_000);
        // views: log10(1_000_001)/8 ≈ 0.75 → 0.4 × 0.75 = 0.30
        // engagement: 5.5/20 = 0.275 → 0.3 × 0.275 = 0.0825
        // velocity: capped at 1.0 → 0.3
        assert_eq!(m.performance_score, 68.25);
    }

    #[test]
    fn score_stays_within_bounds_for_extreme_inputs() {
        let m = compute_metrics(
            &raw(u64::MAX / 2, u64::MAX / 4, u64::MAX / 4, 1),
            &ScoringWeights::default(),
        );
        assert!(m.performance_score >= 0.0);
        assert!(m.performance_score <= 100.0);
    }

    #[test]
    fn all_sub_scores_saturated_gives_score_of_100() {
        // 100M+ views in one hour with >20% engagement caps every sub-score.
        let m = compute_metrics(
            &raw(200_000_000, 50_000_000, 10_000_000, 1),
            &ScoringWeights::default(),
        );
        assert_eq!(m.performance_score, 100.0);
    }

    #[test]
    fn more_views_never_lowers_the_score() {
        let weights = ScoringWeights::default();
        // Likes/comments fixed at zero isolates the view sub-score.
        let mut previous = 0.0;
        for views in [1, 10, 1_000, 100_000, 10_000_000] {
            let m = compute_metrics(&raw(views, 0, 0, 1000), &weights);
            assert!(
                m.performance_score >= previous,
                "score decreased at views={views}: {} < {previous}",
                m.performance_score
            );
            previous = m.performance_score;
        }
    }

    #[test]
    fn hour_floor_applies_within_first_hour() {
        // Published 20 minutes before observation: velocity = views / 1.
        let observed = Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap();
        let m = compute_metrics(
            &RawMetrics {
                video_id: "vid-2".to_owned(),
                view_count: 4_200,
                like_count: 0,
                comment_count: 0,
                published_at: observed - chrono::Duration::minutes(20),
                observed_at: observed,
            },
            &ScoringWeights::default(),
        );
        assert_eq!(m.avg_views_per_hour, 4_200.0);
    }

    #[test]
    fn publish_equal_to_observation_floors_at_one_hour() {
        let m = compute_metrics(&raw(1_000, 10, 5, 0), &ScoringWeights::default());
        assert_eq!(m.avg_views_per_hour, 1_000.0);
    }

    #[test]
    fn ratios_are_rounded_to_two_decimals() {
        // 1/3 views-to-likes produces a repeating decimal.
        let m = compute_metrics(&raw(3, 1, 0, 5), &ScoringWeights::default());
        assert_eq!(m.likes_to_views_ratio, 33.33);
        assert_eq!(m.engagement_rate, 33.33);
    }

    #[test]
    fn custom_weights_are_honored() {
        let weights = ScoringWeights {
            view_weight: 1.0,
            engagement_weight: 0.0,
            velocity_weight: 0.0,
            ..ScoringWeights::default()
        };
        // 10^8 - 1 views saturates the view sub-score almost exactly.
        let m = compute_metrics(&raw(99_999_999, 0, 0, 1000), &weights);
        assert_eq!(m.performance_score, 100.0);
    }
}
