use bytes::Bytes;
use reqwest::{Client, Response};
use tracing::debug;

use crate::errors::MarketDataError;

/// Issues GET requests on behalf of one provider.
///
/// Any network failure or non-success status surfaces as
/// [`MarketDataError::Contact`] tagged with the provider's display name.
#[derive(Clone, Debug)]
pub struct HttpFetcher {
    client: Client,
    provider: &'static str,
}

impl HttpFetcher {
    /// A fetcher whose errors name `provider` as the remote party.
    pub fn new(provider: &'static str) -> Self {
        Self {
            client: Client::new(),
            provider,
        }
    }

    /// Display name used in error messages.
    pub fn provider(&self) -> &'static str {
        self.provider
    }

    /// Performs the GET and returns the response with the body still unread,
    /// so callers can inspect headers before deciding whether to download it.
    pub async fn send(&self, url: &str) -> Result<Response, MarketDataError> {
        debug!("request: {url}");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| MarketDataError::contact(self.provider, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MarketDataError::contact(
                self.provider,
                format!(
                    "server error (HTTP {}: {})",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("unknown status")
                ),
            ));
        }

        Ok(response)
    }

    /// Performs the GET and buffers the entire body.
    pub async fn fetch(&self, url: &str) -> Result<Bytes, MarketDataError> {
        let response = self.send(url).await?;
        response
            .bytes()
            .await
            .map_err(|e| MarketDataError::contact(self.provider, e))
    }
}
