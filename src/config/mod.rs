//! Configuration handling for the application.
//!
//! Everything is read from environment variables with development defaults,
//! so both binaries and the tests can construct a `Config` without any files
//! on disk. `Config::from_env` validates the numeric and enum-like values.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

/// Environment variable names. Public so tests and the CLI can refer to them.
pub const ENV_BIND_ADDR: &str = "BIND_ADDR";
pub const ENV_GRAPH_API_URL: &str = "GRAPH_API_URL";
pub const ENV_GRAPH_API_TOKEN: &str = "GRAPH_API_TOKEN";
pub const ENV_FETCH_TIMEOUT_SECS: &str = "FETCH_TIMEOUT_SECS";
pub const ENV_FETCH_USER_AGENT: &str = "FETCH_USER_AGENT";
pub const ENV_CONTENT_STRATEGY: &str = "CONTENT_STRATEGY";

/// Default development values used when environment variables are absent.
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_GRAPH_API_URL: &str = "https://dapp.golden.xyz/graphql";
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 3;
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 12.0; rv:94.0) Gecko/20100101 Firefox/94.0";

/// Which main-content heuristic the boilerplate remover runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ContentStrategy {
    /// Block classifier tuned for densely linked pages.
    #[default]
    Canola,
    /// Readability scoring, better on long single-article pages.
    Readability,
}

impl ContentStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Canola => "canola",
            Self::Readability => "readability",
        }
    }
}

impl std::fmt::Display for ContentStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentStrategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "canola" => Ok(Self::Canola),
            "readability" => Ok(Self::Readability),
            other => Err(ConfigError::InvalidValue {
                field: ENV_CONTENT_STRATEGY,
                reason: format!("unknown strategy '{other}'"),
            }),
        }
    }
}

/// Application runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    bind_addr: String,
    graph_api_url: String,
    graph_api_token: Option<String>,
    fetch_timeout: Duration,
    user_agent: String,
    content_strategy: ContentStrategy,
}

impl Config {
    /// Load from environment variables, falling back to development defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let bind_addr = env::var(ENV_BIND_ADDR).unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
        let graph_api_url =
            env::var(ENV_GRAPH_API_URL).unwrap_or_else(|_| DEFAULT_GRAPH_API_URL.to_string());
        url::Url::parse(&graph_api_url).map_err(|e| ConfigError::InvalidValue {
            field: ENV_GRAPH_API_URL,
            reason: e.to_string(),
        })?;
        let graph_api_token = env::var(ENV_GRAPH_API_TOKEN)
            .ok()
            .filter(|token| !token.trim().is_empty());

        let fetch_timeout = match env::var(ENV_FETCH_TIMEOUT_SECS) {
            Ok(raw) => parse_timeout(&raw)?,
            Err(_) => Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
        };

        let user_agent =
            env::var(ENV_FETCH_USER_AGENT).unwrap_or_else(|_| DEFAULT_USER_AGENT.to_string());

        let content_strategy = match env::var(ENV_CONTENT_STRATEGY) {
            Ok(raw) => raw.parse()?,
            Err(_) => ContentStrategy::default(),
        };

        Ok(Self {
            bind_addr,
            graph_api_url,
            graph_api_token,
            fetch_timeout,
            user_agent,
            content_strategy,
        })
    }

    /// TCP bind address (host:port) for the HTTP server.
    pub fn bind_addr(&self) -> &str {
        &self.bind_addr
    }
    /// GraphQL endpoint of the knowledge-graph protocol.
    pub fn graph_api_url(&self) -> &str {
        &self.graph_api_url
    }
    /// Token used when a request carries no bearer token of its own.
    pub fn graph_api_token(&self) -> Option<&str> {
        self.graph_api_token.as_deref()
    }
    pub fn fetch_timeout(&self) -> Duration {
        self.fetch_timeout
    }
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
    pub fn content_strategy(&self) -> ContentStrategy {
        self.content_strategy
    }

    /// Override the graph endpoint, mostly useful in tests.
    pub fn with_graph_api_url(mut self, url: impl Into<String>) -> Self {
        self.graph_api_url = url.into();
        self
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    pub fn with_content_strategy(mut self, strategy: ContentStrategy) -> Self {
        self.content_strategy = strategy;
        self
    }
}

impl Default for Config {
    /// Development defaults (mirrors `from_env` with no env overrides).
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            graph_api_url: DEFAULT_GRAPH_API_URL.to_string(),
            graph_api_token: None,
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            content_strategy: ContentStrategy::default(),
        }
    }
}

fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    let secs: u64 = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        field: ENV_FETCH_TIMEOUT_SECS,
        reason: format!("'{raw}' is not a whole number of seconds"),
    })?;
    if secs == 0 {
        return Err(ConfigError::InvalidValue {
            field: ENV_FETCH_TIMEOUT_SECS,
            reason: "timeout must be greater than zero".to_string(),
        });
    }
    Ok(Duration::from_secs(secs))
}

/// Errors that can occur while building a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Ensure environment-variable manipulating tests run serially.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn clear_env() {
        for key in [
            ENV_BIND_ADDR,
            ENV_GRAPH_API_URL,
            ENV_GRAPH_API_TOKEN,
            ENV_FETCH_TIMEOUT_SECS,
            ENV_FETCH_USER_AGENT,
            ENV_CONTENT_STRATEGY,
        ] {
            unsafe {
                env::remove_var(key);
            }
        }
    }

    #[test]
    fn defaults_when_env_missing() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let cfg = Config::from_env().unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.fetch_timeout(), Duration::from_secs(3));
        assert_eq!(cfg.user_agent(), DEFAULT_USER_AGENT);
        assert_eq!(cfg.graph_api_token(), None);
        assert_eq!(cfg.content_strategy(), ContentStrategy::Canola);
    }

    #[test]
    fn overrides_when_env_present() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        unsafe {
            env::set_var(ENV_BIND_ADDR, "0.0.0.0:9000");
            env::set_var(ENV_GRAPH_API_URL, "http://localhost:4000/graphql");
            env::set_var(ENV_GRAPH_API_TOKEN, "jwt-token");
            env::set_var(ENV_FETCH_TIMEOUT_SECS, "5");
            env::set_var(ENV_CONTENT_STRATEGY, "Readability");
        }
        let cfg = Config::from_env().unwrap();
        assert_eq!(cfg.bind_addr(), "0.0.0.0:9000");
        assert_eq!(cfg.graph_api_url(), "http://localhost:4000/graphql");
        assert_eq!(cfg.graph_api_token(), Some("jwt-token"));
        assert_eq!(cfg.fetch_timeout(), Duration::from_secs(5));
        assert_eq!(cfg.content_strategy(), ContentStrategy::Readability);
        clear_env();
    }

    #[test]
    fn rejects_zero_timeout() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        unsafe {
            env::set_var(ENV_FETCH_TIMEOUT_SECS, "0");
        }
        let err = Config::from_env().unwrap_err();
        assert!(err.to_string().contains(ENV_FETCH_TIMEOUT_SECS));
        clear_env();
    }

    #[test]
    fn rejects_unknown_strategy() {
        assert!("boilerpipe".parse::<ContentStrategy>().is_err());
        assert_eq!(
            " canola ".parse::<ContentStrategy>().unwrap(),
            ContentStrategy::Canola
        );
    }
}
