//! Transport selection for the MCP server.
//!
//! Stdio is the default and is what desktop agents expect when they spawn
//! the server as a subprocess. `--transport http` serves the same tool over
//! rmcp's streamable HTTP at `/mcp` on `--port` (or `PORT`).

use clap::{Args, ValueEnum};
use std::fmt;

/// Where the server reads requests from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Transport {
    #[default]
    Stdio,
    Http { port: u16 },
}

impl Transport {
    pub fn stdio() -> Self {
        Transport::Stdio
    }

    pub fn http(port: u16) -> Self {
        Transport::Http { port }
    }

    /// Listening port, `None` for stdio.
    pub fn port(&self) -> Option<u16> {
        match *self {
            Transport::Stdio => None,
            Transport::Http { port } => Some(port),
        }
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.port() {
            None => f.write_str("stdio"),
            Some(port) => write!(f, "http (port {})", port),
        }
    }
}

/// Value of `--transport`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum TransportMode {
    #[default]
    Stdio,
    Http,
}

/// Transport flags, meant to be `#[command(flatten)]`ed into a binary's args.
#[derive(Args, Debug, Clone)]
pub struct TransportArgs {
    /// Transport mode
    #[arg(long, value_enum, ignore_case = true, default_value_t = TransportMode::Stdio)]
    pub transport: TransportMode,

    /// Port for the HTTP transport
    #[arg(long, env = "PORT", default_value_t = 8080)]
    pub port: u16,
}

impl TransportArgs {
    /// Resolve the flags; `--port` only matters for HTTP.
    pub fn into_transport(self) -> Transport {
        match self.transport {
            TransportMode::Stdio => Transport::stdio(),
            TransportMode::Http => Transport::http(self.port),
        }
    }
}
