//! Download of generated image bytes.

use tracing::{debug, error, instrument};

use crate::config::Config;
use crate::error::{Error, Service};

/// Fetches raw image bytes from an arbitrary URL with a size cap.
pub struct ImageFetcher {
    client: reqwest::Client,
    max_bytes: usize,
}

impl ImageFetcher {
    /// Create a fetcher sharing the given HTTP client.
    pub fn new(config: &Config, client: reqwest::Client) -> Self {
        Self {
            client,
            max_bytes: config.image_max_bytes,
        }
    }

    /// Download the full body at `url`.
    ///
    /// # Errors
    /// - `Error::ExternalService` on a non-success status or transport failure
    /// - `Error::InvalidResponse` if the body exceeds the configured cap
    #[instrument(level = "debug", name = "fetch_image", skip(self))]
    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>, Error> {
        let result = self.fetch_inner(url).await;
        if let Err(e) = &result {
            error!(error = %e, "Error downloading image");
        }
        result
    }

    async fn fetch_inner(&self, url: &str) -> Result<Vec<u8>, Error> {
        let mut response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::transport(Service::Download, &e))?;

        let status = response.status();
        if !status.is_success() {
            let status_text = status.canonical_reason().unwrap_or("Unknown Status");
            return Err(Error::external(
                Service::Download,
                status.as_u16(),
                status_text,
                format!("Failed to download image: {}", status_text),
            ));
        }

        if let Some(declared) = response.content_length() {
            if declared > self.max_bytes as u64 {
                return Err(self.too_large());
            }
        }

        let mut data = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| Error::transport(Service::Download, &e))?
        {
            if data.len() + chunk.len() > self.max_bytes {
                return Err(self.too_large());
            }
            data.extend_from_slice(&chunk);
        }

        debug!(bytes = data.len(), "Downloaded image");
        Ok(data)
    }

    fn too_large(&self) -> Error {
        Error::invalid_response(
            Service::Download,
            format!("Image exceeds the {} byte download limit", self.max_bytes),
        )
    }
}
