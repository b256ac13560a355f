use super::ComicsSource;
use super::types::{SourceComic, XkcdInfo};
use crate::error::{Error, Result};

use async_trait::async_trait;
use std::time::Duration;

const INFO_PATH: &str = "info.0.json";

/// HTTP client for the XKCD JSON API.
pub struct XkcdClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl XkcdClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/');
        if base_url.is_empty() {
            return Err(Error::InvalidConfig("empty source base url".to_string()));
        }

        let http_client = reqwest::Client::builder().timeout(timeout).build()?;
        tracing::debug!("XKCD client for {} (timeout {:?})", base_url, timeout);

        Ok(Self {
            http_client,
            base_url: base_url.to_string(),
        })
    }

    async fn fetch(&self, url: String) -> Result<SourceComic> {
        tracing::trace!("GET {}", url);

        let response = self.http_client.get(&url).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::NotFound);
        }
        if !response.status().is_success() {
            return Err(Error::Source(format!(
                "GET {} failed: {}",
                url,
                response.status()
            )));
        }

        let info: XkcdInfo = response.json().await?;
        Ok(info.into())
    }
}

#[async_trait]
impl ComicsSource for XkcdClient {
    async fn latest(&self) -> Result<SourceComic> {
        self.fetch(format!("{}/{}", self.base_url, INFO_PATH)).await
    }

    async fn get(&self, id: u32) -> Result<SourceComic> {
        self.fetch(format!("{}/{}/{}", self.base_url, id, INFO_PATH))
            .await
    }
}
