//! Request and result value types for the generation pipeline.
//!
//! Every value here lives for a single tool invocation.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Aspect ratio used for every generation.
pub const ASPECT_RATIO: &str = "4:3";

/// Number of images requested per generation.
pub const NUM_IMAGES: u8 = 1;

/// Output resolution accepted by the generation API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub enum Resolution {
    #[default]
    #[serde(rename = "1K")]
    OneK,
    #[serde(rename = "2K")]
    TwoK,
}

impl Resolution {
    /// All accepted resolutions, in schema order.
    pub const ALL: [Resolution; 2] = [Resolution::OneK, Resolution::TwoK];

    pub fn as_str(&self) -> &'static str {
        match self {
            Resolution::OneK => "1K",
            Resolution::TwoK => "2K",
        }
    }
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A prompt ready to send to the generation API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub negative_prompt: Option<String>,
    pub aspect_ratio: &'static str,
    pub resolution: Resolution,
}

impl GenerationRequest {
    /// Build a request with the fixed aspect ratio.
    ///
    /// A blank negative prompt is dropped so it is never sent upstream.
    pub fn new(
        prompt: impl Into<String>,
        negative_prompt: Option<String>,
        resolution: Resolution,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            negative_prompt: negative_prompt.filter(|np| !np.trim().is_empty()),
            aspect_ratio: ASPECT_RATIO,
            resolution,
        }
    }
}

/// Outcome of a successful generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResult {
    /// URL of the first generated image
    pub image_url: String,
    /// Seed reported by the generation API
    pub seed: i64,
}

/// An image stored on the hosting service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostedImage {
    pub url: String,
}

/// Everything the pipeline hands back on success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedImage {
    pub imagekit_url: String,
    pub fal_image_url: String,
    pub seed: i64,
}
