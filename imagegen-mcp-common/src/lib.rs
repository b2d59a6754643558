//! Image generation MCP common library
//!
//! Shared configuration, error taxonomy, upstream clients (image download and
//! ImageKit hosting), value types, tracing and transport setup for the
//! image generation MCP server.

pub mod auth;
pub mod config;
pub mod error;
pub mod fetch;
pub mod imagekit;
pub mod models;
pub mod server;
pub mod tracing;
pub mod transport;


pub use config::Config;
pub use error::{ConfigError, Error, ErrorKind, Result, Service};
pub use fetch::ImageFetcher;
pub use imagekit::ImageKitClient;
pub use models::{GenerationRequest, GenerationResult, HostedImage, Resolution, UploadedImage};
pub use server::{McpServerBuilder, ServerError, shutdown_channel};
pub use transport::{Transport, TransportArgs, TransportMode};
