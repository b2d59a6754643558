//! fal.ai Imagen4 generation client.

use imagegen_mcp_common::auth::fal_authorization;
use imagegen_mcp_common::config::Config;
use imagegen_mcp_common::error::{Error, Service};
use imagegen_mcp_common::models::{GenerationRequest, GenerationResult, NUM_IMAGES, Resolution};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument};

/// Request body for the fal.ai Imagen4 endpoint.
#[derive(Debug, Serialize)]
struct FalRequest<'a> {
    prompt: &'a str,
    aspect_ratio: &'a str,
    resolution: Resolution,
    num_images: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    negative_prompt: Option<&'a str>,
}

impl<'a> From<&'a GenerationRequest> for FalRequest<'a> {
    fn from(request: &'a GenerationRequest) -> Self {
        Self {
            prompt: &request.prompt,
            aspect_ratio: request.aspect_ratio,
            resolution: request.resolution,
            num_images: NUM_IMAGES,
            negative_prompt: request.negative_prompt.as_deref(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct FalResponse {
    #[serde(default)]
    images: Vec<FalImage>,
    seed: Option<serde_json::Number>,
}

#[derive(Debug, Deserialize)]
struct FalImage {
    url: Option<String>,
}

/// Client for the fal.ai text-to-image API.
pub struct FalClient {
    client: reqwest::Client,
    config: Config,
}

impl FalClient {
    /// Create a client sharing the given HTTP client.
    pub fn new(config: &Config, client: reqwest::Client) -> Self {
        Self {
            client,
            config: config.clone(),
        }
    }

    /// Generate one image and return its URL and seed.
    ///
    /// # Errors
    /// - `Error::Config` if `FAL_KEY` is not set (no request is sent)
    /// - `Error::ExternalService` on a non-success status or transport failure
    /// - `Error::InvalidResponse` if the body has no image URL or no seed
    #[instrument(level = "info", name = "fal_generate", skip(self, request), fields(resolution = %request.resolution))]
    pub async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult, Error> {
        let result = self.generate_inner(request).await;
        if let Err(e) = &result {
            error!(error = %e, "Error generating image with fal.ai");
        }
        result
    }

    async fn generate_inner(&self, request: &GenerationRequest) -> Result<GenerationResult, Error> {
        let key = self.config.require_fal_key()?;
        let endpoint = &self.config.fal_api_url;

        debug!(endpoint = %endpoint, "Calling fal.ai API");

        let response = self
            .client
            .post(endpoint)
            .header("Authorization", fal_authorization(key))
            .header("Content-Type", "application/json")
            .json(&FalRequest::from(request))
            .send()
            .await
            .map_err(|e| Error::transport(Service::Fal, &e))?;

        let status = response.status();
        if !status.is_success() {
            let status_text = status.canonical_reason().unwrap_or("Unknown Status");
            let body = response.text().await.unwrap_or_default();
            return Err(Error::external(Service::Fal, status.as_u16(), status_text, body));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::transport(Service::Fal, &e))?;
        let result = parse_response(&body)?;

        info!(seed = result.seed, "Received image from fal.ai");
        Ok(result)
    }
}

fn parse_response(body: &str) -> Result<GenerationResult, Error> {
    let parsed: FalResponse = serde_json::from_str(body).map_err(|e| {
        Error::invalid_response(Service::Fal, format!("Failed to parse response: {}", e))
    })?;

    let first = parsed
        .images
        .into_iter()
        .next()
        .ok_or_else(|| Error::invalid_response(Service::Fal, "No images returned from fal.ai"))?;

    let image_url = first
        .url
        .filter(|u| !u.is_empty())
        .ok_or_else(|| Error::invalid_response(Service::Fal, "First image has no url"))?;

    let seed = parsed
        .seed
        .ok_or_else(|| Error::invalid_response(Service::Fal, "Response has no seed"))?;
    let seed = integral_seed(&seed).ok_or_else(|| {
        Error::invalid_response(Service::Fal, format!("Seed {} is not an integer", seed))
    })?;

    Ok(GenerationResult { image_url, seed })
}

/// Seeds are integers, but a whole-valued float such as `42.0` is accepted too.
fn integral_seed(seed: &serde_json::Number) -> Option<i64> {
    if let Some(n) = seed.as_i64() {
        return Some(n);
    }
    seed.as_f64()
        .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
        .map(|f| f as i64)
}
