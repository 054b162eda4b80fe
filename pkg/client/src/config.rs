use pkg_constants::network::{DEFAULT_API_ADDR, DEFAULT_REQUEST_TIMEOUT_SECS};
use pkg_types::config::ClientConfigFile;
use std::time::Duration;

/// Connection settings for the HTTP transport.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the API server, e.g. `http://127.0.0.1:6443`.
    pub server: String,
    /// Bearer token sent with every request.
    pub token: Option<String>,
    /// Deadline for single-shot calls. Watches are never cut off by it.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server: DEFAULT_API_ADDR.to_string(),
            token: None,
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    pub fn new(server: impl Into<String>) -> Self {
        Self {
            server: server.into(),
            ..Default::default()
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Fill every field the file leaves unset from the defaults.
    pub fn from_file(file: &ClientConfigFile) -> Self {
        let defaults = Self::default();
        Self {
            server: file.server.clone().unwrap_or(defaults.server),
            token: file.token.clone(),
            timeout: file
                .timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
        }
    }
}
