//! Rate document sources
//!
//! The rate table normally comes from the bank's website. A saved copy of
//! the page can be read from disk instead.

use crate::error::{Result, VestError};
use reqwest::blocking::Client;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default rate table: 77 Bank's published USD/JPY TTM rates for 2024
pub const DEFAULT_RATE_URL: &str = "https://www.77bank.co.jp/kawase/usd2024.html";

/// Where a rate document comes from
pub trait RateSource: Send + Sync {
    /// URL or path of the document; the table year is derived from it
    fn location(&self) -> &str;

    /// Retrieve the raw HTML document
    fn fetch(&self) -> Result<String>;
}

/// Fetches the rate document over HTTP
pub struct HttpRateSource {
    url: String,
    client: Client,
}

impl HttpRateSource {
    /// Create a source for `url` with a bounded request timeout
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("vest-valuator/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| VestError::FetchError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            url: url.into(),
            client,
        })
    }
}

impl RateSource for HttpRateSource {
    fn location(&self) -> &str {
        &self.url
    }

    fn fetch(&self) -> Result<String> {
        log::info!("Getting rate html from {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .send()
            .map_err(|e| VestError::FetchError(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(VestError::FetchError(format!(
                "{} returned error: {}",
                self.url,
                response.status()
            )));
        }

        // Labels may be Shift_JIS; only the ASCII digits are read
        let body = response
            .bytes()
            .map_err(|e| VestError::FetchError(format!("Failed to read response: {}", e)))?;

        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}

/// Reads a saved copy of the rate page from disk
pub struct FileRateSource {
    path: PathBuf,
    location: String,
}

impl FileRateSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let location = path.display().to_string();
        Self { path, location }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RateSource for FileRateSource {
    fn location(&self) -> &str {
        &self.location
    }

    fn fetch(&self) -> Result<String> {
        log::info!("Reading rate html from {}", self.location);

        let bytes = std::fs::read(&self.path).map_err(|e| {
            VestError::FetchError(format!("Failed to read {}: {}", self.location, e))
        })?;

        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}
