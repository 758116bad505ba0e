use thiserror::Error;

/// Errors returned by the `YouTube` Data API client.
#[derive(Debug, Error)]
pub enum YouTubeError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API returned an error envelope with a code and message.
    #[error("YouTube API error {code}: {message}")]
    Api { code: i64, message: String },

    /// The API rejected the request because its own daily quota is spent.
    #[error("YouTube API quota exhausted: {0}")]
    QuotaExceeded(String),

    /// The local per-run unit budget would be crossed; stop collecting.
    #[error("session quota budget exceeded: {used}/{limit} units used")]
    BudgetExceeded { used: u64, limit: u64 },

    /// A non-2xx response whose body was not a parseable error envelope.
    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// The configured base URL does not parse.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}
