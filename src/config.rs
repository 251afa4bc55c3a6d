use url::Url;

pub const DEFAULT_USER_AGENT: &str = "Gosub/1.0 (X11; Linux x86_64) Gecko/20250802 GosubFetcher/1.0";

/// Storage key under which the bearer token is kept
pub const DEFAULT_CREDENTIAL_KEY: &str = "token";

/// Fetcher configuration
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// User agent string sent by the HTTP client
    pub user_agent: String,
    /// Key used to look up the bearer token in local storage
    pub credential_key: String,
    /// Base URL used to resolve relative request URLs. Without it, only absolute URLs can be fetched.
    pub base_url: Option<Url>,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            credential_key: DEFAULT_CREDENTIAL_KEY.to_string(),
            base_url: None,
        }
    }
}

impl FetcherConfig {
    /// Resolves `url` against the base URL (if any).
    pub fn resolve_url(&self, url: &str) -> Result<Url, url::ParseError> {
        match &self.base_url {
            Some(base) => base.join(url),
            None => Url::parse(url),
        }
    }
}
