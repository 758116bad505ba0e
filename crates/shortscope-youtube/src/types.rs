//! `YouTube` Data API v3 response types.
//!
//! All types model the JSON structures returned by the API. Statistics
//! counters arrive as JSON *strings* (`"viewCount": "12345"`), and any
//! counter may be absent when the uploader has hidden it — both quirks are
//! absorbed here so callers only ever see `u64` values with 0 defaults.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Parameters for a `search.list` call scoped to short-form video.
#[derive(Debug, Clone)]
pub struct SearchParams {
    /// Free-text search query (the category label, e.g. `"gaming shorts"`).
    pub query: String,
    /// API ordering value: `viewCount`, `rating`, `relevance`, or `date`.
    pub order: String,
    /// Number of results to request, 1–50.
    pub max_results: u8,
    pub published_after: DateTime<Utc>,
    pub published_before: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// search.list
// ---------------------------------------------------------------------------

/// Top-level envelope for `search.list`.
#[derive(Debug, Deserialize)]
pub struct SearchListResponse {
    #[serde(default)]
    pub items: Vec<SearchHit>,
}

/// A single search result.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchHit {
    pub id: SearchHitId,
    pub snippet: SearchSnippet,
}

/// Identifier wrapper for a search result.
///
/// `video_id` is present for `type=video` searches; other result kinds
/// (channels, playlists) omit it and are skipped by callers.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHitId {
    #[serde(default)]
    pub video_id: Option<String>,
}

/// Descriptive fields from a search result snippet.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchSnippet {
    pub channel_id: String,
    pub title: String,
    pub channel_title: String,
}

// ---------------------------------------------------------------------------
// videos.list
// ---------------------------------------------------------------------------

/// Top-level envelope for `videos.list`.
#[derive(Debug, Deserialize)]
pub struct VideoListResponse {
    #[serde(default)]
    pub items: Vec<VideoDetails>,
}

/// Full detail for a single video: snippet, statistics, content details.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoDetails {
    pub id: String,
    pub snippet: VideoSnippet,
    /// Absent entirely when the uploader hides all statistics.
    #[serde(default)]
    pub statistics: VideoStatistics,
    pub content_details: ContentDetails,
}

/// Descriptive fields for a video.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSnippet {
    pub title: String,
    pub channel_id: String,
    pub channel_title: String,
    /// Publication timestamp in RFC 3339 (`2024-03-20T11:03:12Z`). Kept as
    /// a `String` to match the wire format; callers parse it at the
    /// pipeline boundary.
    pub published_at: String,
}

/// Per-video counters as returned on the wire: strings, individually
/// optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoStatistics {
    #[serde(default)]
    pub view_count: Option<String>,
    #[serde(default)]
    pub like_count: Option<String>,
    #[serde(default)]
    pub comment_count: Option<String>,
}

impl VideoStatistics {
    /// View count with absent or malformed values defaulting to 0.
    #[must_use]
    pub fn views(&self) -> u64 {
        parse_count(self.view_count.as_deref())
    }

    /// Like count with absent or malformed values defaulting to 0.
    #[must_use]
    pub fn likes(&self) -> u64 {
        parse_count(self.like_count.as_deref())
    }

    /// Comment count with absent or malformed values defaulting to 0.
    #[must_use]
    pub fn comments(&self) -> u64 {
        parse_count(self.comment_count.as_deref())
    }
}

fn parse_count(raw: Option<&str>) -> u64 {
    raw.and_then(|s| s.parse().ok()).unwrap_or(0)
}

/// Content metadata for a video.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentDetails {
    /// ISO-8601 duration (e.g. `PT58S`).
    pub duration: String,
}

// ---------------------------------------------------------------------------
// error envelope
// ---------------------------------------------------------------------------

/// The `{"error": {...}}` envelope the API wraps failures in.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorEnvelope {
    pub error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub code: i64,
    pub message: String,
    #[serde(default)]
    pub errors: Vec<ApiErrorDetail>,
}

/// One entry of the envelope's `errors` array; `reason` distinguishes quota
/// exhaustion (`quotaExceeded`, `dailyLimitExceeded`) from other failures.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorDetail {
    #[serde(default)]
    pub reason: Option<String>,
}
