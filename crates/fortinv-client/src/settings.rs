//! Connection settings for the controller client

use std::fmt;
use std::time::Duration;

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for a FortiGate controller
#[derive(Clone)]
pub struct ClientSettings {
    /// Controller host, optionally with a port (`fortigate.example.net:8443`)
    pub api_host: String,
    /// REST API token, sent as the `access_token` query parameter
    pub token: String,
    /// Verify the controller's TLS certificate
    pub validate_certs: bool,
    /// Per-request timeout
    pub timeout: Duration,
}

impl ClientSettings {
    /// Create settings with certificate validation on and the default timeout
    pub fn new(api_host: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            api_host: api_host.into(),
            token: token.into(),
            validate_certs: true,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Enable or disable TLS certificate validation
    #[must_use]
    pub fn with_validate_certs(mut self, validate_certs: bool) -> Self {
        self.validate_certs = validate_certs;
        self
    }

    /// Set request timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Base URL of the controller, always `https://{host}/`
    ///
    /// Any scheme (`http://` included) and trailing slash in `api_host` is
    /// stripped; the controller is always reached over HTTPS.
    pub(crate) fn base_url(&self) -> String {
        let host = self.api_host.trim();
        let host = host.split_once("://").map_or(host, |(_, rest)| rest);
        format!("https://{}/", host.trim_end_matches('/'))
    }
}

impl fmt::Debug for ClientSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientSettings")
            .field("api_host", &self.api_host)
            .field("token", &"<redacted>")
            .field("validate_certs", &self.validate_certs)
            .field("timeout", &self.timeout)
            .finish()
    }
}
