use std::net::SocketAddr;

use rust_decimal::Decimal;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// SEC requires every request to identify the requester by contact
    /// email. This is a required setting: without it a run must not start.
    pub sec_user_agent: String,
    pub subreddit: String,
    /// Minimum qualifying transaction value in whole currency units.
    pub min_transaction_value: Decimal,
    pub max_filings_per_run: usize,
    /// Pacing delay between successive per-filing fetches, keeping the
    /// aggregate request rate under the documented ~10 req/s SEC limit.
    pub inter_request_delay_ms: u64,
    /// Wall-clock budget for one sync run; past it no new requests are
    /// issued and partial results are returned.
    pub run_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub max_retries: u32,
    pub retry_backoff_base_secs: u64,
    pub cik_map_ttl_secs: u64,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("database_url", &"[redacted]")
            .field("sec_user_agent", &self.sec_user_agent)
            .field("subreddit", &self.subreddit)
            .field("min_transaction_value", &self.min_transaction_value)
            .field("max_filings_per_run", &self.max_filings_per_run)
            .field("inter_request_delay_ms", &self.inter_request_delay_ms)
            .field("run_timeout_secs", &self.run_timeout_secs)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_secs", &self.retry_backoff_base_secs)
            .field("cik_map_ttl_secs", &self.cik_map_ttl_secs)
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .finish()
    }
}
