//! MCP tool definitions for the Wikipedia server

use serde_json::json;

use super::protocol::ToolDefinition;

/// A registered tool: name, description shown to the agent, label used in
/// error messages (`"<label> error: ..."`), and JSON input schema
#[derive(Debug, Clone, Copy)]
pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub error_label: &'static str,
    pub schema: &'static str,
}

const fn page_tool(
    name: &'static str,
    description: &'static str,
    error_label: &'static str,
) -> ToolSpec {
    ToolSpec {
        name,
        description,
        error_label,
        schema: PAGE_SCHEMA,
    }
}

const PAGE_SCHEMA: &str = r#"{
    "type": "object",
    "properties": {
        "page": {"type": "string", "description": "The title of the Wikipedia page to retrieve."},
        "language": {"type": "string", "description": "Language code for this call only (defaults to the language chosen with set_language)"}
    },
    "required": ["page"]
}"#;

/// All tool definitions
pub const TOOL_DEFINITIONS: &[ToolSpec] = &[
    // Page facets
    page_tool(
        "get_summary",
        "Retrieve the summary of a given Wikipedia page.",
        "Summary",
    ),
    page_tool(
        "get_content",
        "Retrieve the full plain text content of a Wikipedia page.",
        "Content",
    ),
    page_tool(
        "get_html",
        "Retrieve the rendered HTML of a Wikipedia page.",
        "HTML",
    ),
    page_tool(
        "get_images",
        "Retrieve a list of image URLs from a Wikipedia page.",
        "Images",
    ),
    page_tool(
        "get_links",
        "Retrieve a list of internal Wikipedia links from a page.",
        "Links",
    ),
    page_tool(
        "get_references",
        "Retrieve external reference URLs cited on a Wikipedia page.",
        "References",
    ),
    page_tool(
        "get_categories",
        "Retrieve the list of categories for a Wikipedia page.",
        "Categories",
    ),
    page_tool(
        "get_url",
        "Retrieve the canonical URL of a Wikipedia page.",
        "URL",
    ),
    page_tool(
        "get_title",
        "Retrieve the title of a Wikipedia page after normalization.",
        "Title",
    ),
    page_tool(
        "get_page_id",
        "Retrieve the internal Wikipedia page ID.",
        "Page ID",
    ),
    // Search
    ToolSpec {
        name: "search_pages",
        description: "Search Wikipedia for pages matching a query term.",
        error_label: "Search",
        schema: r#"{
            "type": "object",
            "properties": {
                "query": {"type": "string", "description": "Search term to find Wikipedia pages."},
                "limit": {"type": "integer", "minimum": 1, "maximum": 500, "default": 10, "description": "Maximum number of results"},
                "language": {"type": "string", "description": "Language code for this call only"}
            },
            "required": ["query"]
        }"#,
    },
    // Classification
    ToolSpec {
        name: "check_page_exists",
        description: "Check whether a Wikipedia page exists.",
        error_label: "Existence check",
        schema: r#"{
            "type": "object",
            "properties": {
                "page": {"type": "string", "description": "The title of the Wikipedia page to check."},
                "language": {"type": "string", "description": "Language code for this call only"}
            },
            "required": ["page"]
        }"#,
    },
    ToolSpec {
        name: "disambiguation_options",
        description: "Get disambiguation options for an ambiguous Wikipedia page.",
        error_label: "Disambiguation check",
        schema: r#"{
            "type": "object",
            "properties": {
                "page": {"type": "string", "description": "The title of the Wikipedia page to check for disambiguation."},
                "language": {"type": "string", "description": "Language code for this call only"}
            },
            "required": ["page"]
        }"#,
    },
    // Feeds
    ToolSpec {
        name: "on_this_day",
        description: "Get events that happened on this day in history.",
        error_label: "On This Day",
        schema: r#"{
            "type": "object",
            "properties": {
                "type": {"type": "string", "description": "Type of event (events, births, deaths, holidays, selected)"},
                "month": {"type": "string", "description": "Month (1-12)"},
                "day": {"type": "string", "description": "Day (1-31)"},
                "language": {"type": "string", "description": "Language code for this call only"}
            }
        }"#,
    },
    // Settings
    ToolSpec {
        name: "set_language",
        description: "Set the language for Wikipedia requests.",
        error_label: "Language setting",
        schema: r#"{
            "type": "object",
            "properties": {
                "language": {"type": "string", "description": "Language code (e.g., \"en\", \"fr\", \"es\")"}
            },
            "required": ["language"]
        }"#,
    },
];

/// Look up a tool by name
pub fn find_tool(name: &str) -> Option<&'static ToolSpec> {
    TOOL_DEFINITIONS.iter().find(|t| t.name == name)
}

/// Get all tool definitions as ToolDefinition structs
pub fn get_tool_definitions() -> Vec<ToolDefinition> {
    TOOL_DEFINITIONS
        .iter()
        .map(|spec| ToolDefinition {
            name: spec.name.to_string(),
            description: spec.description.to_string(),
            input_schema: serde_json::from_str(spec.schema).unwrap_or(json!({})),
        })
        .collect()
}
