use std::path::Path;

use crate::prelude::*;
use solarsite_core::query::build_url;
use solarsite_core::sites::{MessageResponse, Site, SiteWithScores, Statistics, WeightRequest};

pub const SITES_PATH: &str = "/sites/";
pub const STATISTICS_PATH: &str = "/sites/statistics/";
pub const EXPORT_PATH: &str = "/sites/export/";
pub const ANALYZE_PATH: &str = "/sites/analyze/";

/// Multipart field the backend reads the uploaded CSV from
pub const UPLOAD_FIELD: &str = "site_file";

pub fn site_detail_path(site_id: u64) -> String {
    format!("/sites/{site_id}/")
}

/// Sites backend configuration from environment variables
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
}

impl ApiConfig {
    /// Default backend base URL for local development
    pub const DEFAULT_BASE_URL: &'static str = "http://localhost:8000/api";

    /// Load configuration from environment variables
    /// Uses SOLARSITE_API_URL with default fallback
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("SOLARSITE_API_URL")
                .unwrap_or_else(|_| Self::DEFAULT_BASE_URL.to_string()),
        }
    }

    /// Apply CLI overrides to the configuration
    pub fn with_overrides(mut self, base_url: Option<String>) -> Self {
        if let Some(url) = base_url {
            self.base_url = url;
        }
        self
    }
}

/// Typed wrappers over the sites endpoints
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| eyre!("Failed to build HTTP client: {}", e))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str, query: &str) -> String {
        build_url(&self.base_url, path, query)
    }

    /// List sites matching a serialized filter query
    pub async fn get_sites(&self, query: &str) -> Result<Vec<SiteWithScores>> {
        let url = self.url(SITES_PATH, query);
        log::debug!("GET {url}");

        let response = send(self.client.get(&url), &url).await?;
        let response = check_response(response, "Failed to fetch sites").await?;
        decode(response).await
    }

    /// Fetch a single site with its analysis history
    pub async fn get_site(&self, site_id: u64) -> Result<Site> {
        let url = self.url(&site_detail_path(site_id), "");
        log::debug!("GET {url}");

        let response = send(self.client.get(&url), &url).await?;
        let response = check_response(response, &format!("Failed to fetch site {site_id}")).await?;
        decode(response).await
    }

    /// Upload a CSV of site records; the backend upserts and rescores them
    pub async fn upload_site_file(&self, path: &Path) -> Result<MessageResponse> {
        let filename = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| eyre!("Failed to read {}: {e}", path.display()))?;

        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(filename)
            .mime_str("text/csv")
            .map_err(|e| eyre!("Invalid MIME type: {e}"))?;
        let form = reqwest::multipart::Form::new().part(UPLOAD_FIELD, part);

        let url = self.url(SITES_PATH, "");
        log::debug!("POST {url} ({})", path.display());

        let response = send(self.client.post(&url).multipart(form), &url).await?;
        let response = check_response(response, "Failed to upload site file").await?;
        decode(response).await
    }

    /// Download the scored sites as CSV bytes
    pub async fn export_sites_csv(&self, query: &str) -> Result<Vec<u8>> {
        let url = self.url(EXPORT_PATH, query);
        log::debug!("GET {url}");

        let response = send(self.client.get(&url), &url).await?;
        let response = check_response(response, "Failed to export sites").await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::Decode(e.to_string()))?;

        Ok(bytes.to_vec())
    }

    /// Store new factor weights and rescore every site
    pub async fn recalculate_weights(&self, payload: &WeightRequest) -> Result<MessageResponse> {
        let url = self.url(ANALYZE_PATH, "");
        log::debug!("POST {url}");

        let response = send(self.client.post(&url).json(payload), &url).await?;
        let response = check_response(response, "Failed to recalculate weights").await?;
        decode(response).await
    }

    /// Dashboard aggregates for the sites matching a serialized filter query
    pub async fn fetch_statistics(&self, query: &str) -> Result<Statistics> {
        let url = self.url(STATISTICS_PATH, query);
        log::debug!("GET {url}");

        let response = send(self.client.get(&url), &url).await?;
        let response = check_response(response, "Failed to fetch statistics").await?;
        decode(response).await
    }
}

async fn send(request: reqwest::RequestBuilder, url: &str) -> Result<reqwest::Response> {
    request
        .send()
        .await
        .map_err(|e| Error::Network(format!("{url}: {e}")).into())
}

/// Check that an HTTP response was successful, returning a descriptive error otherwise.
async fn check_response(response: reqwest::Response, context: &str) -> Result<reqwest::Response> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    Err(Error::HttpStatus {
        context: context.to_string(),
        status,
        body,
    }
    .into())
}

async fn decode<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    response
        .json::<T>()
        .await
        .map_err(|e| Error::Decode(e.to_string()).into())
}
