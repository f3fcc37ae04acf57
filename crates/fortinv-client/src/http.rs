//! HTTP client for the FortiGate monitor API

use async_trait::async_trait;
use fortinv_api::{DeviceRecord, Endpoint, MonitorResponse};
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::Client;
use tracing::{debug, instrument};
use url::Url;

use crate::error::{ClientError, Result};
use crate::settings::ClientSettings;
use crate::traits::DeviceSource;

/// `User-Agent` sent with every request
pub const USER_AGENT: &str = concat!("fortinv ", env!("CARGO_PKG_VERSION"), " Rust");

/// HTTP client for a single FortiGate controller
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    base_url: Url,
    token: String,
}

impl HttpClient {
    /// Create a new HTTP client from connection settings
    ///
    /// # Errors
    /// Returns an error if the controller host does not form a valid URL or the
    /// underlying client cannot be built.
    pub fn new(settings: &ClientSettings) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if !settings.validate_certs {
            debug!(api_host = %settings.api_host, "TLS certificate validation disabled");
        }

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .danger_accept_invalid_certs(!settings.validate_certs)
            .timeout(settings.timeout)
            .build()?;

        Self::with_client(settings, client)
    }

    /// Create a new HTTP client with custom `reqwest::Client`
    ///
    /// # Errors
    /// Returns an error if the controller host does not form a valid URL.
    pub fn with_client(settings: &ClientSettings, client: Client) -> Result<Self> {
        let base_url = Url::parse(&settings.base_url())?;
        Ok(Self {
            client,
            base_url,
            token: settings.token.clone(),
        })
    }

    /// Build the full URL of an endpoint, token included
    fn url(&self, endpoint: Endpoint) -> Result<Url> {
        let mut url = self.base_url.join(endpoint.path())?;
        url.query_pairs_mut().append_pair("access_token", &self.token);
        Ok(url)
    }

    /// GET an endpoint and decode the monitor envelope
    async fn get(&self, endpoint: Endpoint) -> Result<MonitorResponse<DeviceRecord>> {
        let url = self.url(endpoint)?;
        // the URL carries the token, keep it out of error messages
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(ClientError::Api { status, message });
        }

        let body = response.text().await.map_err(reqwest::Error::without_url)?;
        parse_monitor_response(&body)
    }

    /// Fetch a device list, filling in the subsystem path on each record
    #[instrument(skip(self), fields(host = %self.base_url.host_str().unwrap_or_default()))]
    async fn devices(&self, endpoint: Endpoint) -> Result<Vec<DeviceRecord>> {
        debug!(path = endpoint.path(), "requesting devices");

        let devices = into_devices(self.get(endpoint).await?);
        debug!(count = devices.len(), "received devices");
        Ok(devices)
    }
}

#[async_trait]
impl DeviceSource for HttpClient {
    async fn fetch(&self, endpoint: Endpoint) -> Result<Vec<DeviceRecord>> {
        self.devices(endpoint).await
    }

    fn source_type(&self) -> &'static str {
        "fortigate"
    }
}

/// Decode a monitor response body
fn parse_monitor_response(body: &str) -> Result<MonitorResponse<DeviceRecord>> {
    let value: serde_json::Value = serde_json::from_str(body)?;
    if value.get("results").is_none() {
        return Err(ClientError::InvalidResponse(
            "missing `results` in monitor response".to_string(),
        ));
    }
    Ok(serde_json::from_value(value)?)
}

/// Unwrap the device list, copying the envelope `path` onto records that lack one
fn into_devices(response: MonitorResponse<DeviceRecord>) -> Vec<DeviceRecord> {
    let mut devices = response.results;
    if let Some(path) = response.path {
        for device in &mut devices {
            device.path.get_or_insert_with(|| path.clone());
        }
    }
    devices
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> HttpClient {
        HttpClient::new(&ClientSettings::new("fgt.local", "s3cr3t")).unwrap()
    }

    #[test]
    fn test_client_creation() {
        let settings = ClientSettings::new("fgt.local", "token").with_validate_certs(false);
        assert!(HttpClient::new(&settings).is_ok());
    }

    #[test]
    fn test_invalid_host() {
        let client = HttpClient::new(&ClientSettings::new("not a host", "token"));
        assert!(matches!(client, Err(ClientError::Url(_))));
    }

    #[test]
    fn test_switch_url() {
        let url = client().url(Endpoint::Switches).unwrap();
        assert_eq!(
            url.as_str(),
            "https://fgt.local/api/v2/monitor/switch-controller/managed-switch/status?access_token=s3cr3t"
        );
    }

    #[test]
    fn test_access_point_url() {
        let url = client().url(Endpoint::AccessPoints).unwrap();
        assert_eq!(
            url.as_str(),
            "https://fgt.local/api/v2/monitor/wifi/managed_ap?access_token=s3cr3t"
        );
    }

    #[test]
    fn test_token_is_query_encoded() {
        let client = HttpClient::new(&ClientSettings::new("fgt.local", "a&b=c")).unwrap();
        let url = client.url(Endpoint::Switches).unwrap();
        assert!(url.as_str().ends_with("?access_token=a%26b%3Dc"));
    }

    #[test]
    fn test_user_agent() {
        assert!(USER_AGENT.starts_with("fortinv "));
        assert!(USER_AGENT.ends_with(" Rust"));
    }

    #[test]
    fn test_parse_results() {
        let response =
            parse_monitor_response(r#"{"results": [{"name": "SW1"}], "path": "switch-controller"}"#)
                .unwrap();
        assert_eq!(response.results[0].name, "SW1");
    }

    #[test]
    fn test_envelope_path_fills_missing() {
        let response = parse_monitor_response(
            r#"{"path": "switch-controller", "results": [{"name": "SW1"}, {"name": "SW2", "path": "wifi"}]}"#,
        )
        .unwrap();
        let devices = into_devices(response);
        assert_eq!(devices[0].path.as_deref(), Some("switch-controller"));
        assert_eq!(devices[1].path.as_deref(), Some("wifi"));
    }

    #[test]
    fn test_envelope_without_path() {
        let response = parse_monitor_response(r#"{"results": [{"name": "SW1"}]}"#).unwrap();
        let devices = into_devices(response);
        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].path, None);
    }

    #[test]
    fn test_parse_missing_results() {
        let err = parse_monitor_response(r#"{"status": "error"}"#).unwrap_err();
        assert!(matches!(err, ClientError::InvalidResponse(_)));
    }

    #[test]
    fn test_parse_non_json() {
        let err = parse_monitor_response("<html>login</html>").unwrap_err();
        assert!(matches!(err, ClientError::Json(_)));
    }
}
