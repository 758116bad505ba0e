//! The `analyze` command: search, dedup by channel, fetch statistics,
//! score, rank, export.
//!
//! Per-video failures are logged and skipped rather than propagated so a
//! single bad video does not abort the full run. Budget exhaustion stops
//! collection early and exports whatever was gathered.

use std::collections::HashSet;

use anyhow::Context;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use clap::{Args, ValueEnum};

use shortscope_core::{
    compute_metrics, rank, AppConfig, RawMetrics, ScoredVideo, ScoringWeights,
};
use shortscope_youtube::{SearchHit, SearchParams, VideoDetails, YouTubeClient, YouTubeError};

use crate::report;

/// Search category presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ShortsCategory {
    Trending,
    Gaming,
    Music,
    Comedy,
    Dance,
    Tutorial,
    Challenge,
    Viral,
}

impl ShortsCategory {
    /// The search query sent to the API, doubling as the category label on
    /// every exported row.
    fn query(self) -> &'static str {
        match self {
            ShortsCategory::Trending => "trending shorts",
            ShortsCategory::Gaming => "gaming shorts",
            ShortsCategory::Music => "music shorts",
            ShortsCategory::Comedy => "comedy shorts",
            ShortsCategory::Dance => "dance shorts",
            ShortsCategory::Tutorial => "tutorial shorts",
            ShortsCategory::Challenge => "challenge shorts",
            ShortsCategory::Viral => "viral shorts",
        }
    }
}

/// Result orderings accepted by the API's `order` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortMethod {
    ViewCount,
    Rating,
    Relevance,
    Date,
}

impl SortMethod {
    fn api_value(self) -> &'static str {
        match self {
            SortMethod::ViewCount => "viewCount",
            SortMethod::Rating => "rating",
            SortMethod::Relevance => "relevance",
            SortMethod::Date => "date",
        }
    }
}

/// Arguments for the `analyze` subcommand.
#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    /// YouTube API key (overrides YOUTUBE_API_KEY from the environment)
    #[arg(long)]
    api_key: Option<String>,

    /// Search category preset
    #[arg(long, value_enum, default_value_t = ShortsCategory::Trending)]
    category: ShortsCategory,

    /// Search result ordering
    #[arg(long, value_enum, default_value_t = SortMethod::ViewCount)]
    sort: SortMethod,

    /// How many videos to analyze
    #[arg(long, default_value_t = 25, value_parser = clap::value_parser!(u8).range(1..=50))]
    max_results: u8,

    /// Earliest publish date to include (YYYY-MM-DD, default seven days ago)
    #[arg(long)]
    published_after: Option<NaiveDate>,

    /// Latest publish date to include (YYYY-MM-DD, default now)
    #[arg(long)]
    published_before: Option<NaiveDate>,

    /// Keep more than one video per channel instead of first-hit-wins
    #[arg(long)]
    keep_duplicate_channels: bool,

    /// Print the search parameters without calling the API
    #[arg(long)]
    dry_run: bool,
}

/// Run the full analysis pipeline and write the CSV and HTML reports.
///
/// # Errors
///
/// Returns an error if no API key is available, the date window is invalid,
/// the search call itself fails, or the reports cannot be written.
/// Per-video detail failures are logged and skipped, not propagated.
pub(crate) async fn run_analyze(config: &AppConfig, args: AnalyzeArgs) -> anyhow::Result<()> {
    let api_key = args
        .api_key
        .clone()
        .or_else(|| config.api_key.clone())
        .context("YouTube API key not found; set YOUTUBE_API_KEY or pass --api-key")?;

    let now = Utc::now();
    let (window_start, window_end) =
        resolve_window(args.published_after, args.published_before, now)?;

    if args.dry_run {
        println!(
            "dry-run: would search '{}' ordered by {} ({} results, {} to {})",
            args.category.query(),
            args.sort.api_value(),
            args.max_results,
            window_start.format("%Y-%m-%d"),
            window_end.format("%Y-%m-%d"),
        );
        return Ok(());
    }

    let client = YouTubeClient::new(
        &api_key,
        config.request_timeout_secs,
        &config.user_agent,
        config.max_retries,
        config.retry_backoff_base_ms,
        config.quota_budget,
    )?;

    let params = SearchParams {
        query: args.category.query().to_owned(),
        order: args.sort.api_value().to_owned(),
        max_results: args.max_results,
        published_after: window_start,
        published_before: window_end,
    };

    tracing::info!(
        category = %params.query,
        order = %params.order,
        max_results = params.max_results,
        "starting shorts analysis"
    );

    let hits = client.search_shorts(&params).await?;
    tracing::info!(count = hits.len(), "search returned hits");

    let hits = if args.keep_duplicate_channels {
        hits
    } else {
        dedup_by_channel(hits)
    };

    let videos =
        collect_details(&client, &hits, args.category.query(), args.sort.api_value()).await;

    let ranked = rank(videos);
    if ranked.is_empty() {
        println!("no shorts collected; nothing to export");
        return Ok(());
    }

    let summary = report::Summary::compute(&ranked);
    let generated_at = Utc::now();
    let (csv_path, html_path) =
        report::write_reports(&config.output_dir, &ranked, &summary, generated_at)?;

    tracing::info!(
        videos = ranked.len(),
        mean_performance_score = summary.mean_performance_score,
        mean_engagement_rate = summary.mean_engagement_rate,
        total_views = summary.total_views,
        quota_used = client.quota_used(),
        "analysis complete"
    );
    println!("data saved to: {}", csv_path.display());
    println!("report saved to: {}", html_path.display());

    Ok(())
}

/// Resolve the publish-date window, defaulting to the last seven days.
///
/// Dates are taken as UTC midnight. The window must not be inverted and
/// must not end in the future.
fn resolve_window(
    after: Option<NaiveDate>,
    before: Option<NaiveDate>,
    now: DateTime<Utc>,
) -> anyhow::Result<(DateTime<Utc>, DateTime<Utc>)> {
    let end = match before {
        Some(d) => d.and_time(NaiveTime::MIN).and_utc(),
        None => now,
    };
    let start = match after {
        Some(d) => d.and_time(NaiveTime::MIN).and_utc(),
        None => end - chrono::Duration::days(7),
    };
    if start > end {
        anyhow::bail!("--published-after must not be later than --published-before");
    }
    if end > now {
        anyhow::bail!("--published-before cannot be in the future");
    }
    Ok((start, end))
}

/// First hit per channel wins; later hits from the same channel are dropped.
/// Preserves input order among the survivors.
fn dedup_by_channel(mut hits: Vec<SearchHit>) -> Vec<SearchHit> {
    let mut seen: HashSet<String> = HashSet::new();
    hits.retain(|hit| {
        if seen.insert(hit.snippet.channel_id.clone()) {
            true
        } else {
            tracing::debug!(channel_id = %hit.snippet.channel_id, "skipping duplicate channel");
            false
        }
    });
    hits
}

/// Fetch details for each search hit and assemble scored records.
///
/// A single `observed_at` is stamped for the whole run so velocities are
/// comparable across records.
async fn collect_details(
    client: &YouTubeClient,
    hits: &[SearchHit],
    category: &str,
    sort_method: &str,
) -> Vec<ScoredVideo> {
    let weights = ScoringWeights::default();
    let observed_at = Utc::now();
    let mut videos = Vec::with_capacity(hits.len());

    for hit in hits {
        let Some(video_id) = hit.id.video_id.as_deref() else {
            continue;
        };
        match client.video_details(video_id).await {
            Ok(Some(details)) => {
                if let Some(video) =
                    build_scored_video(&details, observed_at, category, sort_method, &weights)
                {
                    videos.push(video);
                }
            }
            Ok(None) => {
                tracing::warn!(video_id, "video missing from details response, skipping");
            }
            Err(YouTubeError::BudgetExceeded { used, limit }) => {
                tracing::warn!(used, limit, "quota budget exhausted, stopping collection early");
                break;
            }
            Err(e) => {
                tracing::warn!(video_id, error = %e, "failed to fetch video details, skipping");
            }
        }
    }

    videos
}

/// Assemble one scored record. Returns `None` when the publish timestamp
/// does not parse — a record with a fabricated timestamp would score
/// nonsense velocity.
fn build_scored_video(
    details: &VideoDetails,
    observed_at: DateTime<Utc>,
    category: &str,
    sort_method: &str,
    weights: &ScoringWeights,
) -> Option<ScoredVideo> {
    let published_at = match DateTime::parse_from_rfc3339(&details.snippet.published_at) {
        Ok(ts) => ts.with_timezone(&Utc),
        Err(e) => {
            tracing::warn!(
                video_id = %details.id,
                raw = %details.snippet.published_at,
                error = %e,
                "unparseable publish timestamp, skipping video"
            );
            return None;
        }
    };

    let raw = RawMetrics {
        video_id: details.id.clone(),
        view_count: details.statistics.views(),
        like_count: details.statistics.likes(),
        comment_count: details.statistics.comments(),
        published_at,
        observed_at,
    };
    let metrics = compute_metrics(&raw, weights);

    Some(ScoredVideo {
        raw,
        metrics,
        title: details.snippet.title.clone(),
        channel_title: details.snippet.channel_title.clone(),
        channel_id: details.snippet.channel_id.clone(),
        duration: details.content_details.duration.clone(),
        category: category.to_owned(),
        sort_method: sort_method.to_owned(),
    })
}
