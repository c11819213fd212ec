use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::config::ExtractorConfig;
use crate::error::ExtractError;

/// Fetches a small UTF-8 text body, i.e. a media playlist.
#[async_trait]
pub trait ManifestFetcher: Send + Sync {
    async fn fetch_text(&self, url: &Url) -> Result<String, ExtractError>;
}

/// HTTP fetcher with a browser user agent. Origin servers routinely reject
/// default library agents.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &ExtractorConfig) -> Result<Self, ExtractError> {
        let client = Client::builder().user_agent(&config.user_agent).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ManifestFetcher for HttpFetcher {
    async fn fetch_text(&self, url: &Url) -> Result<String, ExtractError> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ExtractError::http_status(status, url.as_str()));
        }
        Ok(response.text().await?)
    }
}
