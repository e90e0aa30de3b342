//! wttr-mcp server
//!
//! Exposes a single `get_current_weather` tool to MCP clients over stdio,
//! backed by the wttr.in integration.

pub mod config;
pub mod server;
pub mod telemetry;
pub mod tool;

pub use config::{AppConfig, LogFormat, LoggingConfig};
pub use server::{SERVER_NAME, ServerError, serve, serve_stdio};
pub use tool::{TOOL_NAME, ToolError, WeatherReport, WeatherRequest, WeatherToolHandler};
