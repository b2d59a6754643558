//! Image generation MCP server library.
//!
//! Generates images with fal.ai's Imagen4 model and hosts them on ImageKit.

pub mod fal;
pub mod handler;
pub mod server;

pub use fal::FalClient;
pub use handler::ImageHandler;
pub use server::{GenerateAndUploadParams, ImageServer, TOOL_NAME};
