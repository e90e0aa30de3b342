//! MCP server surface
//!
//! Wires [`WeatherToolHandler`] into rmcp's `ServerHandler` and serves it on
//! any transport rmcp accepts (stdio in production).

use rmcp::model::{Implementation, ProtocolVersion, ServerCapabilities, ServerInfo};
use rmcp::service::QuitReason;
use rmcp::transport::IntoTransport;
use rmcp::{RoleServer, ServerHandler, ServiceExt, tool_handler};
use thiserror::Error;
use tracing::info;

use crate::tool::WeatherToolHandler;

/// Server name reported in `initialize`
pub const SERVER_NAME: &str = "wttr-mcp";

/// Server version reported in `initialize`
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

const INSTRUCTIONS: &str = "Weather from wttr.in. Call get_current_weather with a \
                            location_name: a city, an airport code, ~landmark or lat,lon.";

/// Failures that end an MCP session
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Failed to start MCP session: {0}")]
    Initialize(String),

    #[error("MCP session task failed: {0}")]
    Session(#[from] tokio::task::JoinError),
}

#[tool_handler]
impl ServerHandler for WeatherToolHandler {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: SERVER_NAME.to_string(),
                version: SERVER_VERSION.to_string(),
                ..Implementation::from_build_env()
            },
            instructions: Some(INSTRUCTIONS.to_string()),
        }
    }
}

/// Serve one MCP session on `transport` until the peer disconnects
pub async fn serve<T, E, A>(
    handler: WeatherToolHandler,
    transport: T,
) -> Result<QuitReason, ServerError>
where
    T: IntoTransport<RoleServer, E, A>,
    E: std::error::Error + Send + Sync + 'static,
{
    info!(name = SERVER_NAME, version = SERVER_VERSION, "MCP server started");

    let service = handler
        .serve(transport)
        .await
        .map_err(|e| ServerError::Initialize(e.to_string()))?;
    let reason = service.waiting().await?;

    info!(reason = ?reason, "MCP server stopped");
    Ok(reason)
}

/// Serve requests from stdin, answering on stdout
pub async fn serve_stdio(handler: WeatherToolHandler) -> Result<QuitReason, ServerError> {
    serve(handler, rmcp::transport::stdio()).await
}
