//! HTTPS access to the dbGaP study tree
//!
//! Bodies are decoded strictly: a response that is not valid UTF-8 is a
//! [`DbgapError::Parse`] error, matching the FTP transport.

use super::{join_path, StudyDownloader};
use crate::config::DbgapConfig;
use async_trait::async_trait;
use dbgap_common::{DbgapError, Result};
use reqwest::Client;
use scraper::{Html, Selector};
use std::time::Duration;
use tracing::{debug, info};

/// HTTP downloader for the dbGaP archive
pub struct HttpDownloader {
    client: Client,
    base_url: String,
}

impl HttpDownloader {
    pub fn from_config(config: &DbgapConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connection_timeout_secs))
            .timeout(Duration::from_secs(config.read_timeout_secs))
            .user_agent(concat!("dbgap-ingest/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(DbgapError::network)?;

        Ok(Self {
            client,
            base_url: config.http_base_url.clone(),
        })
    }

    async fn get_text(&self, path: &str) -> Result<String> {
        let url = join_path(&self.base_url, path);
        debug!("GET {}", url);

        let response = self.client.get(&url).send().await.map_err(DbgapError::network)?;

        let status = response.status();
        if !status.is_success() {
            return Err(DbgapError::network(format!("GET {} returned {}", url, status)));
        }

        let body = response.bytes().await.map_err(DbgapError::network)?;
        String::from_utf8(body.to_vec())
            .map_err(|e| DbgapError::Parse(format!("{} is not valid UTF-8: {}", url, e)))
    }
}

#[async_trait]
impl StudyDownloader for HttpDownloader {
    async fn download(&self, path: &str) -> Result<String> {
        let text = self.get_text(path).await?;
        info!("Downloaded {} ({} bytes)", path, text.len());
        Ok(text)
    }

    /// Directory listings are the server's HTML index pages
    async fn list_files(&self, path: &str) -> Result<Vec<String>> {
        let dir = format!("{}/", path.trim_end_matches('/'));
        let html = self.get_text(&dir).await?;
        let files = parse_index_page(&html)?;
        info!("Listed {} ({} files)", path, files.len());
        Ok(files)
    }

    fn location(&self) -> String {
        self.base_url.trim_end_matches('/').to_string()
    }
}

/// Extract file names from an Apache style index page.
///
/// Sub-directories (trailing slash), parent links and sort links are skipped.
fn parse_index_page(html: &str) -> Result<Vec<String>> {
    let document = Html::parse_document(html);
    let link_selector =
        Selector::parse("a").map_err(|e| DbgapError::Parse(format!("Bad selector: {:?}", e)))?;

    let files = document
        .select(&link_selector)
        .filter_map(|element| element.value().attr("href"))
        .filter(|href| {
            !href.ends_with('/') && !href.starts_with('?') && !href.contains("://")
        })
        .map(|href| href.rsplit('/').next().unwrap_or(href).to_string())
        .filter(|name| !name.is_empty())
        .collect();

    Ok(files)
}
