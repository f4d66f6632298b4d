//! MCP (Model Context Protocol) server implementation
//!
//! JSON-RPC over stdio for AI tool integration.

pub mod handler;
pub mod protocol;
pub mod tools;

pub use handler::WikipediaHandler;
pub use protocol::{
    methods, InitializeResult, McpHandler, McpRequest, McpResponse, McpServer, ToolCallResult,
    ToolContent,
};
pub use tools::{find_tool, get_tool_definitions, ToolSpec, TOOL_DEFINITIONS};
