//! Generation pipeline: fal.ai → download → ImageKit.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use imagegen_mcp_common::config::Config;
use imagegen_mcp_common::error::Error;
use imagegen_mcp_common::fetch::ImageFetcher;
use imagegen_mcp_common::imagekit::ImageKitClient;
use imagegen_mcp_common::models::{GenerationRequest, Resolution, UploadedImage};
use tracing::{debug, info, instrument};

use crate::fal::FalClient;

/// File name for an upload made at `millis` since the Unix epoch.
///
/// ```
/// use imagegen_mcp_server::handler::upload_file_name;
///
/// assert_eq!(upload_file_name(1700000000000), "generated-1700000000000.png");
/// ```
pub fn upload_file_name(millis: u128) -> String {
    format!("generated-{}.png", millis)
}

fn now_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}

/// Runs the three pipeline stages in order over one shared HTTP client.
pub struct ImageHandler {
    fal: FalClient,
    fetcher: ImageFetcher,
    imagekit: ImageKitClient,
}

impl ImageHandler {
    /// Build the shared HTTP client and every stage client from `config`.
    pub fn new(config: &Config) -> Result<Self, Error> {
        debug!(timeout_secs = config.http_timeout_secs, "Initializing ImageHandler");

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()
            .map_err(|e| Error::internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self::with_client(config, http))
    }

    /// Build the stage clients around an existing HTTP client.
    pub fn with_client(config: &Config, http: reqwest::Client) -> Self {
        Self {
            fal: FalClient::new(config, http.clone()),
            fetcher: ImageFetcher::new(config, http.clone()),
            imagekit: ImageKitClient::new(config, http),
        }
    }

    /// Generate an image, download it, and upload it to ImageKit.
    ///
    /// The first failing stage ends the run; later stages never start.
    #[instrument(level = "info", name = "generate_and_upload", skip_all)]
    pub async fn run(
        &self,
        prompt: &str,
        negative_prompt: Option<String>,
        resolution: Option<Resolution>,
    ) -> Result<UploadedImage, Error> {
        let request = GenerationRequest::new(prompt, negative_prompt, resolution.unwrap_or_default());

        info!(resolution = %request.resolution, "Generating image with fal.ai");
        let generated = self.fal.generate(&request).await?;

        info!(url = %generated.image_url, "Downloading generated image");
        let data = self.fetcher.fetch(&generated.image_url).await?;

        info!(bytes = data.len(), "Uploading to ImageKit");
        let hosted = self
            .imagekit
            .upload(data, &upload_file_name(now_millis()))
            .await?;

        info!(url = %hosted.url, seed = generated.seed, "Image generated and uploaded");
        Ok(UploadedImage {
            imagekit_url: hosted.url,
            fal_image_url: generated.image_url,
            seed: generated.seed,
        })
    }
}
