//! HTTP client for the `YouTube` Data API v3.
//!
//! Wraps `reqwest` with API key management, typed response deserialization,
//! retry-with-backoff for transient failures, and quota accounting: every
//! operation charges its unit cost to the [`QuotaLedger`] before the request
//! is sent, mirroring how the API bills failed calls too.

use std::time::Duration;

use chrono::SecondsFormat;
use reqwest::{Client, StatusCode, Url};

use crate::error::YouTubeError;
use crate::quota::{QuotaLedger, SEARCH_COST, VIDEO_DETAILS_COST};
use crate::retry::retry_with_backoff;
use crate::types::{
    ApiErrorEnvelope, SearchHit, SearchListResponse, SearchParams, VideoDetails, VideoListResponse,
};

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3/";

/// Searches are pinned to one region and language, matching the analyzer's
/// single-market scope.
const REGION_CODE: &str = "US";
const RELEVANCE_LANGUAGE: &str = "en";

/// Client for the `YouTube` Data API v3.
///
/// Use [`YouTubeClient::new`] for production or
/// [`YouTubeClient::with_base_url`] to point at a mock server in tests.
/// The API key is an explicit constructor argument, never ambient state.
pub struct YouTubeClient {
    client: Client,
    api_key: String,
    search_url: Url,
    videos_url: Url,
    quota: QuotaLedger,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl YouTubeClient {
    /// Creates a new client pointed at the production API.
    ///
    /// `max_retries` is the number of additional attempts after the first
    /// failure for transient errors; set to `0` to disable retries.
    ///
    /// # Errors
    ///
    /// Returns [`YouTubeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        api_key: &str,
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_ms: u64,
        quota_budget: u64,
    ) -> Result<Self, YouTubeError> {
        Self::with_base_url(
            api_key,
            timeout_secs,
            user_agent,
            max_retries,
            backoff_base_ms,
            quota_budget,
            DEFAULT_BASE_URL,
        )
    }

    /// Creates a new client with a custom base URL (for testing with
    /// wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`YouTubeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`YouTubeError::InvalidBaseUrl`] if
    /// `base_url` is not a valid URL.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_ms: u64,
        quota_budget: u64,
        base_url: &str,
    ) -> Result<Self, YouTubeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Normalise: ensure the base URL ends with exactly one slash so that
        // join() appends the endpoint instead of replacing the last path
        // segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base = Url::parse(&normalised)
            .map_err(|e| YouTubeError::InvalidBaseUrl(format!("'{base_url}': {e}")))?;
        let search_url = base
            .join("search")
            .map_err(|e| YouTubeError::InvalidBaseUrl(format!("'{base_url}': {e}")))?;
        let videos_url = base
            .join("videos")
            .map_err(|e| YouTubeError::InvalidBaseUrl(format!("'{base_url}': {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            search_url,
            videos_url,
            quota: QuotaLedger::new(quota_budget),
            max_retries,
            backoff_base_ms,
        })
    }

    /// Searches for short-form videos matching `params`.
    ///
    /// Calls `search.list` with `type=video` and `videoDuration=short`.
    /// Charges [`SEARCH_COST`] quota units before the request is sent.
    ///
    /// # Errors
    ///
    /// - [`YouTubeError::BudgetExceeded`] if the per-run budget is spent.
    /// - [`YouTubeError::QuotaExceeded`] if the API's own quota is spent.
    /// - [`YouTubeError::Api`] on other API-level failures.
    /// - [`YouTubeError::Http`] on network failure.
    /// - [`YouTubeError::Deserialize`] if the response shape is unexpected.
    pub async fn search_shorts(
        &self,
        params: &SearchParams,
    ) -> Result<Vec<SearchHit>, YouTubeError> {
        self.quota.charge(SEARCH_COST)?;

        let max_results = params.max_results.to_string();
        let published_after = params
            .published_after
            .to_rfc3339_opts(SecondsFormat::Secs, true);
        let published_before = params
            .published_before
            .to_rfc3339_opts(SecondsFormat::Secs, true);

        let url = self.build_url(
            &self.search_url,
            &[
                ("part", "id,snippet"),
                ("type", "video"),
                ("videoDuration", "short"),
                ("q", &params.query),
                ("order", &params.order),
                ("maxResults", &max_results),
                ("publishedAfter", &published_after),
                ("publishedBefore", &published_before),
                ("regionCode", REGION_CODE),
                ("relevanceLanguage", RELEVANCE_LANGUAGE),
            ],
        );

        let body = self.request_json(&url).await?;
        let envelope: SearchListResponse =
            serde_json::from_value(body).map_err(|e| YouTubeError::Deserialize {
                context: format!("search(q={})", params.query),
                source: e,
            })?;
        Ok(envelope.items)
    }

    /// Fetches snippet, statistics, and content details for one video.
    ///
    /// Charges [`VIDEO_DETAILS_COST`] quota units before the request is
    /// sent. A video the API no longer knows (empty `items`) is `None`,
    /// not an error — deleted or privated videos show up this way.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`YouTubeClient::search_shorts`].
    pub async fn video_details(
        &self,
        video_id: &str,
    ) -> Result<Option<VideoDetails>, YouTubeError> {
        self.quota.charge(VIDEO_DETAILS_COST)?;

        let url = self.build_url(
            &self.videos_url,
            &[("part", "snippet,statistics,contentDetails"), ("id", video_id)],
        );

        let body = self.request_json(&url).await?;
        let envelope: VideoListResponse =
            serde_json::from_value(body).map_err(|e| YouTubeError::Deserialize {
                context: format!("videos(id={video_id})"),
                source: e,
            })?;
        Ok(envelope.items.into_iter().next())
    }

    /// Quota units charged so far in this run.
    #[must_use]
    pub fn quota_used(&self) -> u64 {
        self.quota.used()
    }

    /// Quota units still available in this run.
    #[must_use]
    pub fn quota_remaining(&self) -> u64 {
        self.quota.remaining()
    }

    /// Builds the full request URL with percent-encoded query parameters,
    /// appending the API key last.
    fn build_url(&self, endpoint: &Url, params: &[(&str, &str)]) -> Url {
        let mut url = endpoint.clone();
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
            pairs.append_pair("key", &self.api_key);
        }
        url
    }

    /// Sends a GET request with retry on transient failures and parses the
    /// response body as JSON.
    async fn request_json(&self, url: &Url) -> Result<serde_json::Value, YouTubeError> {
        retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            self.fetch_json(url)
        })
        .await
    }

    async fn fetch_json(&self, url: &Url) -> Result<serde_json::Value, YouTubeError> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(Self::classify_failure(status, url, &body));
        }

        serde_json::from_str(&body).map_err(|e| YouTubeError::Deserialize {
            context: endpoint_of(url),
            source: e,
        })
    }

    /// Maps a non-2xx response to a typed error.
    ///
    /// The API wraps failures in an `{"error": {...}}` envelope whose
    /// `reason` entries distinguish quota exhaustion from other failures;
    /// bodies that don't parse as the envelope fall back to
    /// [`YouTubeError::UnexpectedStatus`].
    fn classify_failure(status: StatusCode, url: &Url, body: &str) -> YouTubeError {
        if let Ok(envelope) = serde_json::from_str::<ApiErrorEnvelope>(body) {
            let quota_spent = envelope.error.errors.iter().any(|d| {
                matches!(
                    d.reason.as_deref(),
                    Some("quotaExceeded" | "dailyLimitExceeded")
                )
            });
            if quota_spent {
                return YouTubeError::QuotaExceeded(envelope.error.message);
            }
            return YouTubeError::Api {
                code: envelope.error.code,
                message: envelope.error.message,
            };
        }
        YouTubeError::UnexpectedStatus {
            status: status.as_u16(),
            url: endpoint_of(url),
        }
    }
}

/// Scheme + host + path of a request URL. The API key travels in the query
/// string, so full URLs stay out of error text and logs.
fn endpoint_of(url: &Url) -> String {
    let mut out = format!("{}://", url.scheme());
    if let Some(host) = url.host_str() {
        out.push_str(host);
    }
    out.push_str(url.path());
    out
}
