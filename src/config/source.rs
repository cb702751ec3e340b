use crate::core::DocumentSource;
use crate::utils::error::{Result, TopTimesError};
use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DocumentSource for FileSource {
    async fn fetch(&self) -> Result<Vec<u8>> {
        let data = tokio::fs::read(&self.path).await?;
        Ok(data)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

#[derive(Debug, Clone)]
pub struct HttpSource {
    url: String,
    client: Client,
    headers: HashMap<String, String>,
    timeout: Option<Duration>,
}

impl HttpSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: Client::new(),
            headers: HashMap::new(),
            timeout: None,
        }
    }

    pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl DocumentSource for HttpSource {
    async fn fetch(&self) -> Result<Vec<u8>> {
        let mut request = self.client.get(&self.url);

        for (key, value) in &self.headers {
            request = request.header(key, value);
        }

        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        tracing::debug!("Making HTTP request to: {}", self.url);
        let response = request.send().await?;
        tracing::debug!("HTTP response status: {}", response.status());

        if !response.status().is_success() {
            return Err(TopTimesError::HttpStatusError {
                url: self.url.clone(),
                status: response.status().as_u16(),
            });
        }

        Ok(response.bytes().await?.to_vec())
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Any source the CLI can point at.
#[derive(Debug, Clone)]
pub enum AnySource {
    File(FileSource),
    Http(HttpSource),
}

impl AnySource {
    /// `http://` and `https://` locations are fetched over HTTP, anything else
    /// is read from disk.
    pub fn from_location(location: &str, timeout: Option<Duration>) -> Self {
        if is_http_location(location) {
            AnySource::Http(HttpSource::new(location).with_timeout(timeout))
        } else {
            AnySource::File(FileSource::new(location))
        }
    }
}

pub fn is_http_location(location: &str) -> bool {
    let lower = location.trim().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

#[async_trait]
impl DocumentSource for AnySource {
    async fn fetch(&self) -> Result<Vec<u8>> {
        match self {
            AnySource::File(source) => source.fetch().await,
            AnySource::Http(source) => source.fetch().await,
        }
    }

    fn describe(&self) -> String {
        match self {
            AnySource::File(source) => source.describe(),
            AnySource::Http(source) => source.describe(),
        }
    }
}
