//! Client configuration.

use std::time::Duration;

use url::Url;

use crate::error::ClientError;

pub const DEFAULT_GATEWAY_URL: &str = "ws://localhost:8081/ws";

/// Seconds between reconnect attempts after a dropped connection.
pub const DEFAULT_RECONNECT_DELAY_SECS: u64 = 2;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub gateway_url: Url,
    pub reconnect_delay: Duration,
    /// Preferred language, sent as `set_language` after identity assignment
    /// when set.
    pub language: Option<String>,
}

impl ClientConfig {
    pub fn new(gateway_url: &str) -> Result<Self, ClientError> {
        Ok(Self {
            gateway_url: Url::parse(gateway_url)?,
            reconnect_delay: Duration::from_secs(DEFAULT_RECONNECT_DELAY_SECS),
            language: None,
        })
    }

    /// Load from the environment, falling back to defaults:
    /// `WORDSPLAT_GATEWAY_URL`, `WORDSPLAT_RECONNECT_DELAY_SECS`,
    /// `WORDSPLAT_LANGUAGE`.
    pub fn from_env() -> Result<Self, ClientError> {
        let url = std::env::var("WORDSPLAT_GATEWAY_URL")
            .unwrap_or_else(|_| DEFAULT_GATEWAY_URL.to_string());
        let mut config = Self::new(&url)?;
        if let Some(secs) = std::env::var("WORDSPLAT_RECONNECT_DELAY_SECS")
            .ok()
            .and_then(|raw| raw.parse::<u64>().ok())
        {
            config.reconnect_delay = Duration::from_secs(secs);
        }
        config.language = std::env::var("WORDSPLAT_LANGUAGE").ok();
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_parse() {
        let config = ClientConfig::new(DEFAULT_GATEWAY_URL).expect("default url");
        assert_eq!(config.gateway_url.scheme(), "ws");
        assert_eq!(
            config.reconnect_delay,
            Duration::from_secs(DEFAULT_RECONNECT_DELAY_SECS)
        );
    }

    #[test]
    fn bad_url_is_an_error() {
        assert!(ClientConfig::new("not a url").is_err());
    }
}
