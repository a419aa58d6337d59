// ── Runtime connection configuration ──
//
// These types describe *where* the backend lives and how to talk to it.
// They never touch disk: the CLI/TUI resolves a profile and hands a
// `ConsoleConfig` in.

use std::path::PathBuf;
use std::time::Duration;

use enerctl_api::{TlsMode, TransportConfig};
use url::Url;

/// Backend address used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:8080";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed development backends).
    DangerAcceptInvalid,
}

/// Configuration for one backend.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// Base URL the collection paths are joined onto.
    pub base_url: Url,
    pub tls: TlsVerification,
    /// Upper bound on every request.
    pub timeout: Duration,
}

impl ConsoleConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            tls: TlsVerification::default(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub(crate) fn transport(&self) -> TransportConfig {
        let tls = match &self.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        };
        TransportConfig {
            tls,
            timeout: self.timeout,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn transport_mirrors_tls_choice() {
        let mut config = ConsoleConfig::new(Url::parse(DEFAULT_API_URL).unwrap());
        config.tls = TlsVerification::DangerAcceptInvalid;
        config.timeout = Duration::from_secs(5);

        let transport = config.transport();
        assert!(matches!(transport.tls, TlsMode::DangerAcceptInvalid));
        assert_eq!(transport.timeout, Duration::from_secs(5));
    }

    #[test]
    fn new_uses_strict_tls_and_default_timeout() {
        let config = ConsoleConfig::new(Url::parse("http://10.0.0.5:9000").unwrap());
        assert_eq!(config.tls, TlsVerification::SystemDefaults);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
    }
}
