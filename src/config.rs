use crate::error::TransitError;

pub const DEFAULT_BASE_URL: &str = "https://www.mvg.de/api/bgw-pt/v3";
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7)";

/// Settings for the MVG HTTP client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), TransitError> {
        if self.base_url.is_empty() {
            return Err(TransitError::Config("base_url must not be empty".to_string()));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(TransitError::Config(format!(
                "base_url must be an http(s) URL, got {}",
                self.base_url
            )));
        }

        if self.timeout_secs == 0 {
            return Err(TransitError::Config("timeout_secs must be greater than 0".to_string()));
        }

        Ok(())
    }
}
