//! Server startup integration tests.
//!
//! The server must come up without credentials; missing keys only fail the
//! first tool call that needs them.

use imagegen_mcp_common::Config;

/// Configuration with nothing set, as on a fresh machine.
pub fn empty_config() -> Config {
    Config::from_lookup(|_| None).unwrap_or_else(|e| panic!("default config: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use imagegen_mcp_common::{McpServerBuilder, Transport, shutdown_channel};
    use imagegen_mcp_server::ImageServer;
    use rmcp::ServerHandler;
    use std::time::Duration;

    #[test]
    fn server_starts_without_credentials() {
        let config = empty_config();
        assert_eq!(config.missing_credentials().len(), 3);

        let server = ImageServer::new(&config).unwrap();
        let info = server.get_info();
        let instructions = info.instructions.as_ref().unwrap().to_lowercase();
        assert!(
            instructions.contains("image"),
            "Server instructions should mention 'image'"
        );
    }

    #[test]
    fn server_advertises_tools_only() {
        let server = ImageServer::new(&empty_config()).unwrap();
        let info = server.get_info();
        assert!(info.capabilities.tools.is_some());
        assert!(info.capabilities.resources.is_none());
        assert!(info.capabilities.prompts.is_none());
    }

    #[test]
    fn server_clones_share_tool_list() {
        let server = ImageServer::new(&empty_config()).unwrap();
        let cloned = server.clone();
        let names = |s: &ImageServer| {
            s.tool_descriptors()
                .into_iter()
                .map(|t| t.name.to_string())
                .collect::<Vec<_>>()
        };
        assert_eq!(names(&server), names(&cloned));
    }

    #[tokio::test]
    async fn http_transport_serves_until_shutdown() {
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let server = ImageServer::new(&empty_config()).unwrap();
        let (tx, rx) = shutdown_channel();

        let run = McpServerBuilder::new(server)
            .with_transport(Transport::http(port))
            .with_shutdown(rx)
            .run();
        let connect_then_stop = async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            let connected = tokio::net::TcpStream::connect(("127.0.0.1", port))
                .await
                .is_ok();
            let _ = tx.send(());
            connected
        };

        let (result, connected) = tokio::time::timeout(Duration::from_secs(5), async {
            tokio::join!(run, connect_then_stop)
        })
        .await
        .unwrap();
        assert!(connected, "HTTP transport should accept connections");
        assert!(result.is_ok());
    }
}
