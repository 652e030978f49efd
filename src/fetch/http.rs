//! HTTP page source.
//!
//! Fetch locations are site-relative; they are joined onto the configured
//! base URL (`http://localhost:5173` + `/about.html`).

use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::Url;

use super::{FetchError, FetchLocation, PageSource};

pub struct HttpPageSource {
    base_url: Url,
    client: reqwest::Client,
}

impl HttpPageSource {
    pub fn new(base_url: &str) -> Result<Self, FetchError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| FetchError::InvalidLocation(format!("{base_url}: {e}")))?;
        Ok(Self {
            base_url,
            client: reqwest::Client::new(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url_for(&self, location: &FetchLocation) -> Result<Url, FetchError> {
        self.base_url
            .join(location.as_str())
            .map_err(|e| FetchError::InvalidLocation(format!("{location}: {e}")))
    }
}

#[async_trait]
impl PageSource for HttpPageSource {
    async fn fetch(&self, location: &FetchLocation) -> Result<String, FetchError> {
        let url = self.url_for(location)?;
        info!("Fetching page markup: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        debug!("Page response status: {}", response.status());

        if !response.status().is_success() {
            let status = response.status().as_u16();
            warn!("Page fetch failed: {} - {}", status, location);
            return Err(FetchError::Status {
                status,
                location: location.to_string(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Body(e.to_string()))?;
        debug!("Received {} bytes for {}", body.len(), location);
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_unparseable_base_url() {
        assert!(matches!(
            HttpPageSource::new("not a url"),
            Err(FetchError::InvalidLocation(_))
        ));
    }

    #[test]
    fn test_joins_rooted_and_relative_locations() {
        let source = HttpPageSource::new("http://localhost:5173/site/").unwrap();

        let rooted = source
            .url_for(&FetchLocation("/about.html".to_string()))
            .unwrap();
        assert_eq!(rooted.as_str(), "http://localhost:5173/about.html");

        let relative = source
            .url_for(&FetchLocation("contact.html".to_string()))
            .unwrap();
        assert_eq!(relative.as_str(), "http://localhost:5173/site/contact.html");
    }
}
