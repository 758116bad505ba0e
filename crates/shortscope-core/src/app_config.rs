use std::path::PathBuf;

/// Application configuration, loaded from the environment by
/// [`crate::load_app_config`].
///
/// The API key is an explicit value handed to the client constructor —
/// never ambient process state. It is optional here because the CLI may
/// supply it as a flag instead.
#[derive(Clone)]
pub struct AppConfig {
    pub api_key: Option<String>,
    pub log_level: String,
    pub output_dir: PathBuf,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Per-run budget of chargeable API units. The YouTube Data API
    /// allows 10 000 units per day by default.
    pub quota_budget: u64,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[redacted]"))
            .field("log_level", &self.log_level)
            .field("output_dir", &self.output_dir)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("quota_budget", &self.quota_budget)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_ms", &self.retry_backoff_base_ms)
            .finish()
    }
}
