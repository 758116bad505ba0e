//! CSV and HTML exporters for ranked analysis results.
//!
//! Presentation only: column ordering, serialization, escaping, and the
//! summary statistics shown at the end of a run. Scoring and ordering are
//! settled before records reach this module.

use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, SecondsFormat, Utc};

use shortscope_core::ScoredVideo;

/// Exported CSV column order: identity first, then the ranking score,
/// raw counters, derived ratios, and the descriptive tail.
const CSV_COLUMNS: [&str; 17] = [
    "video_id",
    "title",
    "channel_title",
    "channel_id",
    "performance_score",
    "view_count",
    "like_count",
    "comment_count",
    "engagement_rate",
    "likes_to_views_ratio",
    "comments_to_views_ratio",
    "avg_views_per_hour",
    "total_engagement",
    "published_at",
    "duration",
    "category",
    "sort_method",
];

/// How many rows the HTML report's top-performers table shows.
const TOP_TABLE_ROWS: usize = 10;

/// Run-level aggregates reported alongside the exports.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Summary {
    pub video_count: usize,
    pub mean_performance_score: f64,
    pub mean_engagement_rate: f64,
    pub total_views: u64,
}

impl Summary {
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub(crate) fn compute(videos: &[ScoredVideo]) -> Self {
        if videos.is_empty() {
            return Self {
                video_count: 0,
                mean_performance_score: 0.0,
                mean_engagement_rate: 0.0,
                total_views: 0,
            };
        }
        let n = videos.len() as f64;
        let score_sum: f64 = videos.iter().map(|v| v.metrics.performance_score).sum();
        let rate_sum: f64 = videos.iter().map(|v| v.metrics.engagement_rate).sum();
        let total_views = videos.iter().map(|v| v.raw.view_count).sum();
        Self {
            video_count: videos.len(),
            mean_performance_score: score_sum / n,
            mean_engagement_rate: rate_sum / n,
            total_views,
        }
    }
}

/// Write the CSV and HTML artifacts into `output_dir`, creating it if
/// needed. Returns the two file paths.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or either file
/// cannot be written.
pub(crate) fn write_reports(
    output_dir: &Path,
    videos: &[ScoredVideo],
    summary: &Summary,
    generated_at: DateTime<Utc>,
) -> anyhow::Result<(PathBuf, PathBuf)> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("creating output directory {}", output_dir.display()))?;

    let stamp = generated_at.format("%Y%m%d_%H%M%S");
    let csv_path = output_dir.join(format!("shorts_analysis_{stamp}.csv"));
    let html_path = output_dir.join(format!("shorts_analysis_{stamp}_report.html"));

    std::fs::write(&csv_path, render_csv(videos))
        .with_context(|| format!("writing {}", csv_path.display()))?;
    std::fs::write(&html_path, render_html(videos, summary, generated_at))
        .with_context(|| format!("writing {}", html_path.display()))?;

    Ok((csv_path, html_path))
}

/// Render all videos as CSV in [`CSV_COLUMNS`] order.
#[must_use]
pub(crate) fn render_csv(videos: &[ScoredVideo]) -> String {
    let mut out = String::new();
    out.push_str(&CSV_COLUMNS.join(","));
    out.push('\n');

    for v in videos {
        let row = [
            csv_field(&v.raw.video_id),
            csv_field(&v.title),
            csv_field(&v.channel_title),
            csv_field(&v.channel_id),
            format!("{:.2}", v.metrics.performance_score),
            v.raw.view_count.to_string(),
            v.raw.like_count.to_string(),
            v.raw.comment_count.to_string(),
            format!("{:.2}", v.metrics.engagement_rate),
            format!("{:.2}", v.metrics.likes_to_views_ratio),
            format!("{:.2}", v.metrics.comments_to_views_ratio),
            format!("{:.2}", v.metrics.avg_views_per_hour),
            v.metrics.total_engagement.to_string(),
            v.raw
                .published_at
                .to_rfc3339_opts(SecondsFormat::Secs, true),
            csv_field(&v.duration),
            csv_field(&v.category),
            csv_field(&v.sort_method),
        ];
        out.push_str(&row.join(","));
        out.push('\n');
    }

    out
}

/// RFC-4180-style quoting: wrap in quotes when the field contains a comma,
/// quote, or line break; double any embedded quotes.
fn csv_field(raw: &str) -> String {
    if raw.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", raw.replace('"', "\"\""))
    } else {
        raw.to_owned()
    }
}

/// Render the standalone HTML report: a summary block plus a table of the
/// top performers. `videos` must already be ranked.
#[must_use]
pub(crate) fn render_html(
    videos: &[ScoredVideo],
    summary: &Summary,
    generated_at: DateTime<Utc>,
) -> String {
    let mut rows = String::new();
    for v in videos.iter().take(TOP_TABLE_ROWS) {
        rows.push_str(&format!(
            "      <tr><td>{}</td><td>{}</td><td>{:.2}</td><td>{}</td><td>{:.2}%</td></tr>\n",
            html_escape(&v.title),
            html_escape(&v.channel_title),
            v.metrics.performance_score,
            v.raw.view_count,
            v.metrics.engagement_rate,
        ));
    }

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <title>Shorts Analysis Report</title>
  <style>
    body {{ font-family: Arial, sans-serif; margin: 20px; }}
    .summary {{ background-color: #f5f5f5; padding: 20px; border-radius: 5px; }}
    table {{ border-collapse: collapse; width: 100%; margin-top: 20px; }}
    th, td {{ border: 1px solid #ddd; padding: 8px; text-align: left; }}
    th {{ background-color: #4CAF50; color: white; }}
    tr:nth-child(even) {{ background-color: #f2f2f2; }}
  </style>
</head>
<body>
  <h1>Shorts Analysis Report</h1>
  <div class="summary">
    <h2>Summary</h2>
    <p>Generated: {generated}</p>
    <p>Videos analyzed: {count}</p>
    <p>Average performance score: {mean_score:.2}</p>
    <p>Average engagement rate: {mean_rate:.2}%</p>
    <p>Total views: {total_views}</p>
  </div>
  <h2>Top {top_n} performing shorts</h2>
  <table>
    <thead>
      <tr><th>Title</th><th>Channel</th><th>Score</th><th>Views</th><th>Engagement</th></tr>
    </thead>
    <tbody>
{rows}    </tbody>
  </table>
</body>
</html>
"#,
        generated = generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
        count = summary.video_count,
        mean_score = summary.mean_performance_score,
        mean_rate = summary.mean_engagement_rate,
        total_views = summary.total_views,
        top_n = TOP_TABLE_ROWS,
        rows = rows,
    )
}

fn html_escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use shortscope_core::{compute_metrics, RawMetrics, ScoringWeights};

    use super::*;

    fn scored(video_id: &str, title: &str, views: u64) -> ScoredVideo {
        let observed = Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap();
        let raw = RawMetrics {
            video_id: video_id.to_owned(),
            view_count: views,
            like_count: views / 20,
            comment_count: views / 100,
            published_at: observed - chrono::Duration::hours(10),
            observed_at: observed,
        };
        let metrics = compute_metrics(&raw, &ScoringWeights::default());
        ScoredVideo {
            raw,
            metrics,
            title: title.to_owned(),
            channel_title: "Channel".to_owned(),
            channel_id: "UC-1".to_owned(),
            duration: "PT45S".to_owned(),
            category: "trending shorts".to_owned(),
            sort_method: "viewCount".to_owned(),
        }
    }

    #[test]
    fn csv_header_matches_column_order() {
        let csv = render_csv(&[]);
        assert_eq!(
            csv.lines().next().unwrap(),
            "video_id,title,channel_title,channel_id,performance_score,view_count,like_count,\
             comment_count,engagement_rate,likes_to_views_ratio,comments_to_views_ratio,\
             avg_views_per_hour,total_engagement,published_at,duration,category,sort_method"
        );
    }

    #[test]
    fn csv_has_one_row_per_video() {
        let csv = render_csv(&[scored("a", "first", 1_000), scored("b", "second", 2_000)]);
        assert_eq!(csv.lines().count(), 3);
    }

    #[test]
    fn csv_quotes_fields_with_commas_and_quotes() {
        let csv = render_csv(&[scored("a", r#"hello, "world""#, 1_000)]);
        assert!(
            csv.contains(r#""hello, ""world""""#),
            "expected quoted field, got: {csv}"
        );
    }

    #[test]
    fn csv_row_contains_counters_and_timestamps() {
        let csv = render_csv(&[scored("vid-1", "plain title", 1_000)]);
        let row = csv.lines().nth(1).unwrap();
        assert!(row.starts_with("vid-1,plain title,Channel,UC-1,"));
        assert!(row.contains(",1000,50,10,"));
        assert!(row.contains("2025-06-15T02:00:00Z"));
    }

    #[test]
    fn summary_aggregates_scores_and_views() {
        let videos = [scored("a", "first", 1_000), scored("b", "second", 3_000)];
        let summary = Summary::compute(&videos);
        assert_eq!(summary.video_count, 2);
        assert_eq!(summary.total_views, 4_000);
        let expected_score = (videos[0].metrics.performance_score
            + videos[1].metrics.performance_score)
            / 2.0;
        assert!((summary.mean_performance_score - expected_score).abs() < 1e-9);
    }

    #[test]
    fn summary_of_empty_input_is_all_zero() {
        let summary = Summary::compute(&[]);
        assert_eq!(summary.video_count, 0);
        assert_eq!(summary.mean_performance_score, 0.0);
        assert_eq!(summary.mean_engagement_rate, 0.0);
        assert_eq!(summary.total_views, 0);
    }

    #[test]
    fn html_escapes_markup_in_titles() {
        let videos = [scored("a", r#"<script>alert("x")</script> & more"#, 1_000)];
        let summary = Summary::compute(&videos);
        let html = render_html(&videos, &summary, Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap());
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;alert(&quot;x&quot;)&lt;/script&gt; &amp; more"));
    }

    #[test]
    fn html_table_is_capped_at_top_rows() {
        let videos: Vec<ScoredVideo> = (0..15u64)
            .map(|i| scored(&format!("vid-{i}"), &format!("title {i}"), 1_000 + i))
            .collect();
        let summary = Summary::compute(&videos);
        let html = render_html(&videos, &summary, Utc::now());
        assert_eq!(html.matches("<tr><td>").count(), TOP_TABLE_ROWS);
    }

    #[test]
    fn html_summary_shows_run_aggregates() {
        let videos = [scored("a", "first", 1_000)];
        let summary = Summary::compute(&videos);
        let html = render_html(
            &videos,
            &summary,
            Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap(),
        );
        assert!(html.contains("Generated: 2025-06-15 12:00:00 UTC"));
        assert!(html.contains("Videos analyzed: 1"));
        assert!(html.contains("Total views: 1000"));
    }
}
