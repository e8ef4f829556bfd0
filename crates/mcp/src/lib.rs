// MCP (Model Context Protocol) server exposing the tool dispatcher and resources

pub mod protocol;
pub mod server;

pub use server::McpServer;
