//! HTTP transport backed by `reqwest`.

use url::Url;

use crate::error::{PluginResult, ScanError};
use crate::scan::{AttendanceRequest, Transport};

/// [`Transport`] for the native CLI.
///
/// Relative API paths are resolved against the page URL, like `fetch` does
/// in the WebView; that only works when the page was served over http(s).
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    page_url: Option<Url>,
}

impl HttpTransport {
    pub fn new(page_url: Option<Url>) -> Self {
        Self {
            client: reqwest::Client::new(),
            page_url,
        }
    }

    /// Turn an API URL (absolute or origin-relative) into a request URL.
    pub fn resolve_url(&self, url: &str) -> PluginResult<Url> {
        match Url::parse(url) {
            Ok(absolute) => Ok(absolute),
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                let page = self
                    .page_url
                    .as_ref()
                    .filter(|p| matches!(p.scheme(), "http" | "https"))
                    .ok_or_else(|| {
                        ScanError::Network(format!(
                            "No server configured for relative URL {}",
                            url
                        ))
                    })?;
                page.join(url)
                    .map_err(|e| ScanError::Network(format!("Invalid URL {}: {}", url, e)))
            }
            Err(e) => Err(ScanError::Network(format!("Invalid URL {}: {}", url, e))),
        }
    }
}

impl Transport for HttpTransport {
    async fn post_json(&self, url: &str, body: &AttendanceRequest) -> PluginResult<String> {
        let url = self.resolve_url(url)?;
        log::debug!("POST {}", url);

        let response = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| ScanError::Network(e.to_string()))?;

        let status = response.status();
        log::debug!("Response status: {}", status);

        response
            .text()
            .await
            .map_err(|e| ScanError::Network(e.to_string()))
    }
}
