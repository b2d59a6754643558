//! ImageKit upload client.

use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::{debug, error, info, instrument};

use crate::auth::imagekit_authorization;
use crate::config::Config;
use crate::error::{Error, Service};
use crate::models::HostedImage;

/// MIME type declared for every uploaded file.
pub const UPLOAD_CONTENT_TYPE: &str = "image/png";

#[derive(Debug, Deserialize)]
struct UploadResponse {
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UploadErrorBody {
    message: Option<String>,
}

/// Client for the ImageKit upload API.
pub struct ImageKitClient {
    client: reqwest::Client,
    config: Config,
}

impl ImageKitClient {
    /// Create a client sharing the given HTTP client.
    pub fn new(config: &Config, client: reqwest::Client) -> Self {
        Self {
            client,
            config: config.clone(),
        }
    }

    /// Upload image bytes under `file_name`.
    ///
    /// The hosting service is asked to uniquify the stored name, so repeated
    /// names do not collide.
    ///
    /// # Errors
    /// - `Error::Config` if either ImageKit key is missing (no request is sent)
    /// - `Error::ExternalService` on a non-success status or transport failure
    /// - `Error::InvalidResponse` if the success body has no URL
    #[instrument(level = "info", name = "imagekit_upload", skip(self, data), fields(bytes = data.len()))]
    pub async fn upload(&self, data: Vec<u8>, file_name: &str) -> Result<HostedImage, Error> {
        let result = self.upload_inner(data, file_name).await;
        if let Err(e) = &result {
            error!(error = %e, "Error uploading to ImageKit");
        }
        result
    }

    async fn upload_inner(&self, data: Vec<u8>, file_name: &str) -> Result<HostedImage, Error> {
        let credentials = self.config.require_imagekit_credentials()?;
        let endpoint = &self.config.imagekit_upload_url;

        let file_part = Part::bytes(data)
            .file_name(file_name.to_string())
            .mime_str(UPLOAD_CONTENT_TYPE)
            .map_err(|e| Error::internal(format!("Invalid upload content type: {}", e)))?;

        let form = Form::new()
            .part("file", file_part)
            .text("fileName", file_name.to_string())
            .text("publicKey", credentials.public_key.to_string())
            .text("useUniqueFileName", "true");

        debug!(endpoint = %endpoint, file_name, "Calling ImageKit upload API");

        let response = self
            .client
            .post(endpoint)
            .header("Authorization", imagekit_authorization(credentials.private_key))
            .multipart(form)
            .send()
            .await
            .map_err(|e| Error::transport(Service::ImageKit, &e))?;

        let status = response.status();
        if !status.is_success() {
            let status_text = status.canonical_reason().unwrap_or("Unknown Status");
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<UploadErrorBody>(&body)
                .ok()
                .and_then(|b| b.message)
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| status_text.to_string());
            return Err(Error::external(
                Service::ImageKit,
                status.as_u16(),
                status_text,
                format!("ImageKit upload failed: {}", message),
            ));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::transport(Service::ImageKit, &e))?;
        let parsed: UploadResponse = serde_json::from_str(&body).map_err(|e| {
            Error::invalid_response(Service::ImageKit, format!("Failed to parse response: {}", e))
        })?;

        let url = parsed
            .url
            .filter(|u| !u.is_empty())
            .ok_or_else(|| Error::invalid_response(Service::ImageKit, "Response has no url"))?;

        info!(url = %url, "Uploaded image to ImageKit");
        Ok(HostedImage { url })
    }
}
