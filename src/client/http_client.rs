//! HTTP client implementation for the Nature Remo cloud API
//!
//! Bearer-token authenticated REST calls against `api.nature.global`.
//! Mutations are posted as `application/x-www-form-urlencoded` forms.

use crate::client::{AirconSettings, Appliance, Device, RemoClient};
use crate::config::RemoConfig;
use crate::error::{RemoError, Result};
use async_trait::async_trait;
use reqwest::{header, Client, ClientBuilder, Method, Response};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

/// HTTP client for the Nature Remo API
pub struct RemoHttpClient {
    /// HTTP client instance
    client: Client,

    /// Base URL, without trailing slash
    base_url: String,
}

impl RemoHttpClient {
    /// Create a new HTTP client
    pub fn new(config: &RemoConfig, access_token: &str) -> Result<Self> {
        let mut default_headers = header::HeaderMap::new();
        let mut auth_value = header::HeaderValue::from_str(&format!("Bearer {access_token}"))
            .map_err(|e| RemoError::config(format!("Invalid access token: {e}")))?;
        auth_value.set_sensitive(true);
        default_headers.insert(header::AUTHORIZATION, auth_value);
        default_headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let client = ClientBuilder::new()
            .timeout(config.timeout)
            .user_agent(format!("nature-remo-mcp/{}", env!("CARGO_PKG_VERSION")))
            .default_headers(default_headers)
            .build()
            .map_err(|e| RemoError::config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.api_base_url.as_str().trim_end_matches('/').to_string(),
        })
    }

    /// Build URL for an API path made of literal parts and encoded segments
    fn build_url(&self, segments: &[Segment<'_>]) -> Result<Url> {
        let mut url = self.base_url.clone();
        for segment in segments {
            url.push('/');
            match segment {
                Segment::Literal(part) => url.push_str(part),
                Segment::Param(value) => url.push_str(&urlencoding::encode(value)),
            }
        }
        Url::parse(&url).map_err(|e| RemoError::config(format!("Invalid API URL {url}: {e}")))
    }

    /// Execute a request and map non-success statuses to [`RemoError::Api`]
    async fn execute(
        &self,
        method: Method,
        url: Url,
        form: Option<&[(&str, String)]>,
    ) -> Result<Response> {
        debug!("Nature Remo {method} {}", url.path());

        let mut request = self.client.request(method, url);
        if let Some(form) = form {
            request = request.form(form);
        }

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            debug!("Nature Remo request successful: {status}");
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        debug!("Nature Remo request failed: {status}");
        Err(RemoError::api(status.as_u16(), body))
    }

    /// GET a JSON list; an empty or `null` body decodes to an empty list
    async fn get_list<T: DeserializeOwned>(&self, segments: &[Segment<'_>]) -> Result<Vec<T>> {
        let url = self.build_url(segments)?;
        let body = self.execute(Method::GET, url, None).await?.text().await?;
        if body.trim().is_empty() {
            return Ok(Vec::new());
        }
        let items: Option<Vec<T>> = serde_json::from_str(&body)?;
        Ok(items.unwrap_or_default())
    }

    /// POST a form and discard the response body
    async fn post_form(&self, segments: &[Segment<'_>], form: &[(&str, String)]) -> Result<()> {
        let url = self.build_url(segments)?;
        self.execute(Method::POST, url, Some(form)).await?;
        Ok(())
    }
}

/// One component of an API path
enum Segment<'a> {
    Literal(&'a str),
    Param(&'a str),
}

#[async_trait]
impl RemoClient for RemoHttpClient {
    async fn get_devices(&self) -> Result<Vec<Device>> {
        self.get_list(&[Segment::Literal("1"), Segment::Literal("devices")])
            .await
    }

    async fn get_appliances(&self) -> Result<Vec<Appliance>> {
        self.get_list(&[Segment::Literal("1"), Segment::Literal("appliances")])
            .await
    }

    async fn send_signal(&self, signal_id: &str) -> Result<()> {
        self.post_form(
            &[
                Segment::Literal("1"),
                Segment::Literal("signals"),
                Segment::Param(signal_id),
                Segment::Literal("send"),
            ],
            &[],
        )
        .await
    }

    async fn control_tv(&self, appliance_id: &str, button: &str) -> Result<()> {
        self.post_form(
            &[
                Segment::Literal("1"),
                Segment::Literal("appliances"),
                Segment::Param(appliance_id),
                Segment::Literal("tv"),
            ],
            &[("button", button.to_string())],
        )
        .await
    }

    async fn control_light(&self, appliance_id: &str, button: &str) -> Result<()> {
        self.post_form(
            &[
                Segment::Literal("1"),
                Segment::Literal("appliances"),
                Segment::Param(appliance_id),
                Segment::Literal("light"),
            ],
            &[("button", button.to_string())],
        )
        .await
    }

    async fn control_aircon(&self, appliance_id: &str, settings: &AirconSettings) -> Result<()> {
        self.post_form(
            &[
                Segment::Literal("1"),
                Segment::Literal("appliances"),
                Segment::Param(appliance_id),
                Segment::Literal("aircon_settings"),
            ],
            &settings.to_form(),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> RemoHttpClient {
        RemoHttpClient::new(&RemoConfig::default(), "token-123").unwrap()
    }

    #[test]
    fn test_build_url_encodes_parameters() {
        let url = client()
            .build_url(&[
                Segment::Literal("1"),
                Segment::Literal("signals"),
                Segment::Param("signal/with/slash"),
                Segment::Literal("send"),
            ])
            .unwrap();

        assert_eq!(
            url.as_str(),
            "https://api.nature.global/1/signals/signal%2Fwith%2Fslash/send"
        );
    }

    #[test]
    fn test_rejects_token_with_control_characters() {
        let result = RemoHttpClient::new(&RemoConfig::default(), "bad\ntoken");
        assert!(matches!(result, Err(RemoError::Config(_))));
    }
}
