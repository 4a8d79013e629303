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

/// Which fact-matcher implementation a run uses.
///
/// Both variants satisfy the same contract; the AI matcher covers address,
/// hours, and phone, while the text matcher checks the address only and
/// leaves the other facts unattempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatcherChoice {
    Ai,
    Text,
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub log_level: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub probe_timeout_secs: u64,
    pub fetch_timeout_secs: u64,
    pub user_agent: String,
    pub chunk_size: usize,
    pub inter_chunk_delay_ms: u64,
    pub update_chunk_size: usize,
    pub matcher: MatcherChoice,
    pub matcher_api_key: Option<String>,
    pub matcher_base_url: String,
    pub matcher_model: String,
    pub matcher_timeout_secs: u64,
    pub matcher_max_retries: u32,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("database_url", &"[redacted]")
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("probe_timeout_secs", &self.probe_timeout_secs)
            .field("fetch_timeout_secs", &self.fetch_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("chunk_size", &self.chunk_size)
            .field("inter_chunk_delay_ms", &self.inter_chunk_delay_ms)
            .field("update_chunk_size", &self.update_chunk_size)
            .field("matcher", &self.matcher)
            .field(
                "matcher_api_key",
                &self.matcher_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("matcher_base_url", &self.matcher_base_url)
            .field("matcher_model", &self.matcher_model)
            .field("matcher_timeout_secs", &self.matcher_timeout_secs)
            .field("matcher_max_retries", &self.matcher_max_retries)
            .finish()
    }
}
