// src/services/fetcher.rs

//! Static HTML page fetcher.

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{CrawlerConfig, PageResult};
use crate::services::{ExtractedPage, PageFetcher, extract_page};
use crate::utils::http;

/// Fetches pages with a plain HTTP GET and extracts text from the HTML.
///
/// No JavaScript is executed, so client-rendered sites yield little text.
pub struct HttpPageFetcher {
    client: Client,
}

impl HttpPageFetcher {
    /// Create a fetcher with the given client settings.
    pub fn new(config: &CrawlerConfig) -> Result<Self> {
        Ok(Self {
            client: http::create_async_client(config)?,
        })
    }

    /// Fetch and extract a page, returning the URL it was served from.
    async fn try_fetch(&self, url: &str) -> Result<(Url, ExtractedPage)> {
        let requested = Url::parse(url)?;
        let response = self.client.get(requested.clone()).send().await?.error_for_status()?;

        let landed = response.url().clone();
        if landed.host_str() != requested.host_str() {
            return Err(AppError::validation(format!(
                "redirected to foreign host {landed}"
            )));
        }

        if let Some(content_type) = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
        {
            if !content_type.contains("html") {
                return Err(AppError::validation(format!(
                    "unsupported content type '{content_type}'"
                )));
            }
        }

        let body = response.text().await?;
        Ok((landed, extract_page(&body)?))
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, url: &str) -> PageResult {
        match self.try_fetch(url).await {
            Ok((landed, page)) => PageResult::fetched(landed, page.content, page.links),
            Err(error) => {
                log::debug!("Fetch failed for {}: {}", url, error);
                PageResult::failed(url)
            }
        }
    }
}
