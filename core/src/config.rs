//! Transport configuration fixed when a dispatcher is built.

use std::time::Duration;

use serde::Deserialize;

const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Timeout and TLS settings shared by every request a dispatcher sends.
///
/// Deserializes from a host's own config file; missing fields fall back to
/// the defaults (10 s timeout, certificate verification disabled).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    pub timeout_ms: u64,
    pub insecure_skip_verify: bool,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            insecure_skip_verify: true,
        }
    }
}

impl TransportConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn with_tls_verification(mut self, verify: bool) -> Self {
        self.insecure_skip_verify = !verify;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_skip_verification_with_ten_second_timeout() {
        let config = TransportConfig::default();
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert!(config.insecure_skip_verify);
    }

    #[test]
    fn builders_override_defaults() {
        let config = TransportConfig::default()
            .with_timeout(Duration::from_millis(250))
            .with_tls_verification(true);
        assert_eq!(config.timeout_ms, 250);
        assert!(!config.insecure_skip_verify);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let config: TransportConfig = serde_json::from_str(r#"{"timeout_ms":500}"#).unwrap();
        assert_eq!(config.timeout(), Duration::from_millis(500));
        assert!(config.insecure_skip_verify);

        let config: TransportConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, TransportConfig::default());
    }
}
