//! MCP Server implementation for the image generation server.
//!
//! Exposes a single tool, `generate_and_upload_image`, which runs the
//! fal.ai → download → ImageKit pipeline and answers with the hosted URL.

use std::borrow::Cow;
use std::sync::Arc;

use imagegen_mcp_common::config::Config;
use imagegen_mcp_common::error::Error;
use imagegen_mcp_common::models::{Resolution, UploadedImage};
use rmcp::model::{CallToolResult, Content, JsonObject, ServerCapabilities, ServerInfo, Tool};
use rmcp::{ErrorData as McpError, ServerHandler};
use schemars::JsonSchema;
use schemars::r#gen::SchemaSettings;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::handler::ImageHandler;

/// Name of the only registered tool.
pub const TOOL_NAME: &str = "generate_and_upload_image";

const TOOL_DESCRIPTION: &str = "Generates an image using fal.ai's Imagen4 model with a 4:3 aspect ratio \
     and uploads it to ImageKit. Returns the ImageKit URL, original fal.ai URL, \
     and the seed used for generation.";

const INVALID_PROMPT: &str = "Invalid or missing 'prompt' parameter";

const SUCCESS_MESSAGE: &str = "Image generated and uploaded successfully!";

/// Tool parameters for generate_and_upload_image.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct GenerateAndUploadParams {
    /// The text prompt describing the image you want to generate (must not be blank)
    pub prompt: String,
    /// Optional: Description of what to discourage in the generated image
    #[serde(default)]
    pub negative_prompt: Option<String>,
    /// Image resolution: '1K' or '2K' (default: '1K')
    #[serde(default)]
    pub resolution: Option<Resolution>,
}

#[derive(Serialize)]
struct ToolSuccess<'a> {
    success: bool,
    #[serde(flatten)]
    image: &'a UploadedImage,
    message: &'static str,
}

/// JSON schema for [`GenerateAndUploadParams`] with every subschema inlined.
pub fn input_schema() -> JsonObject {
    let schema = SchemaSettings::draft07()
        .with(|s| {
            s.inline_subschemas = true;
            s.option_add_null_type = false;
        })
        .into_generator()
        .into_root_schema_for::<GenerateAndUploadParams>();
    schema_object(serde_json::to_value(&schema))
}

fn schema_object(value: serde_json::Result<serde_json::Value>) -> JsonObject {
    match value {
        Ok(serde_json::Value::Object(map)) => map,
        Ok(other) => {
            error!(schema = %other, "Tool input schema is not a JSON object");
            JsonObject::new()
        }
        Err(e) => {
            error!(error = %e, "Failed to serialize tool input schema");
            JsonObject::new()
        }
    }
}

/// Descriptor for the generate_and_upload_image tool.
pub fn tool_descriptor() -> Tool {
    Tool {
        name: Cow::Borrowed(TOOL_NAME),
        description: Some(Cow::Borrowed(TOOL_DESCRIPTION)),
        input_schema: Arc::new(input_schema()),
        annotations: None,
        icons: None,
        meta: None,
        output_schema: None,
        title: None,
    }
}

/// Render the success payload returned to the caller.
pub fn success_payload(image: &UploadedImage) -> Result<String, Error> {
    let payload = ToolSuccess {
        success: true,
        image,
        message: SUCCESS_MESSAGE,
    };
    serde_json::to_string_pretty(&payload)
        .map_err(|e| Error::internal(format!("Failed to serialize result: {}", e)))
}

fn parse_params(arguments: Option<JsonObject>) -> Result<GenerateAndUploadParams, Error> {
    let arguments = arguments.ok_or_else(|| Error::invalid_params(INVALID_PROMPT))?;

    let prompt_ok = arguments
        .get("prompt")
        .and_then(|p| p.as_str())
        .is_some_and(|p| !p.trim().is_empty());
    if !prompt_ok {
        return Err(Error::invalid_params(INVALID_PROMPT));
    }

    serde_json::from_value(serde_json::Value::Object(arguments))
        .map_err(|e| Error::invalid_params(e.to_string()))
}

/// MCP Server for image generation and hosting.
#[derive(Clone)]
pub struct ImageServer {
    handler: Arc<ImageHandler>,
}

impl ImageServer {
    /// Create a new ImageServer with the given configuration.
    pub fn new(config: &Config) -> Result<Self, Error> {
        Ok(Self::with_handler(ImageHandler::new(config)?))
    }

    /// Create a server around an already built handler.
    pub fn with_handler(handler: ImageHandler) -> Self {
        Self {
            handler: Arc::new(handler),
        }
    }

    /// Every tool this server registers.
    pub fn tool_descriptors(&self) -> Vec<Tool> {
        vec![tool_descriptor()]
    }

    /// Route a tool call by name.
    ///
    /// Validation happens before any network activity; a failure at any
    /// pipeline stage is returned as the matching MCP error.
    pub async fn dispatch(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
    ) -> Result<CallToolResult, McpError> {
        if name != TOOL_NAME {
            return Err(Error::method_not_found(name).into());
        }

        let params = parse_params(arguments)?;
        self.generate_and_upload(params).await.map_err(McpError::from)
    }

    async fn generate_and_upload(
        &self,
        params: GenerateAndUploadParams,
    ) -> Result<CallToolResult, Error> {
        info!(prompt = %params.prompt, "Generating and uploading image");

        let uploaded = self
            .handler
            .run(&params.prompt, params.negative_prompt, params.resolution)
            .await?;

        let text = success_payload(&uploaded)?;
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }
}

impl ServerHandler for ImageServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Image generation server backed by fal.ai Imagen4 with ImageKit hosting. \
                 Use generate_and_upload_image to create a 4:3 image from a text prompt \
                 and get back its hosted ImageKit URL."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    fn list_tools(
        &self,
        _params: Option<rmcp::model::PaginatedRequestParam>,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<rmcp::model::ListToolsResult, McpError>> + Send + '_ {
        async move {
            debug!("Listing tools");
            Ok(rmcp::model::ListToolsResult {
                tools: self.tool_descriptors(),
                next_cursor: None,
                meta: None,
            })
        }
    }

    fn call_tool(
        &self,
        params: rmcp::model::CallToolRequestParam,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<CallToolResult, McpError>> + Send + '_ {
        async move { self.dispatch(&params.name, params.arguments).await }
    }
}
