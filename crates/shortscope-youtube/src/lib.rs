//! HTTP client for the `YouTube` Data API v3.
//!
//! Wraps `reqwest` with typed responses, typed errors, retry-with-backoff
//! for transient failures, and a quota ledger that charges each operation's
//! unit cost against a per-run budget.

mod client;
mod error;
mod quota;
mod retry;
mod types;

pub use client::YouTubeClient;
pub use error::YouTubeError;
pub use quota::{QuotaLedger, DEFAULT_DAILY_BUDGET, SEARCH_COST, VIDEO_DETAILS_COST};
pub use types::{
    ContentDetails, SearchHit, SearchHitId, SearchListResponse, SearchParams, SearchSnippet,
    VideoDetails, VideoListResponse, VideoSnippet, VideoStatistics,
};
