//! Tool dispatcher
//!
//! Every tool catches its own failures: the caller always gets a text
//! result, formatted as `"<label> error: <message>"` on failure. Failed
//! calls are also flagged with `isError` unless the legacy envelope is
//! configured.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Value};

use super::protocol::{
    methods, InitializeResult, McpHandler, McpRequest, McpResponse, ToolCallResult,
};
use super::tools::{find_tool, get_tool_definitions, ToolSpec};
use crate::error::{Result, WikiError};
use crate::wiki::{
    classify_disambiguation, classify_existence, normalize_language, LanguageState,
    OnThisDayOptions, PageInfo, WikiSource, DEFAULT_SEARCH_LIMIT, MAX_SEARCH_LIMIT,
};

/// MCP request handler backed by a [`WikiSource`]
pub struct WikipediaHandler {
    source: Arc<dyn WikiSource>,
    language: LanguageState,
    legacy_error_envelope: bool,
}

impl WikipediaHandler {
    pub fn new(source: Arc<dyn WikiSource>, language: LanguageState) -> Self {
        Self {
            source,
            language,
            legacy_error_envelope: false,
        }
    }

    /// Report failures as plain text without `isError`
    pub fn with_legacy_error_envelope(mut self, legacy: bool) -> Self {
        self.legacy_error_envelope = legacy;
        self
    }

    pub fn language(&self) -> &LanguageState {
        &self.language
    }

    /// Run a tool. Returns `None` if no tool has that name.
    pub async fn call_tool(&self, name: &str, arguments: Value) -> Option<ToolCallResult> {
        let spec = find_tool(name)?;
        Some(self.run_tool(spec, &arguments).await)
    }

    async fn run_tool(&self, spec: &ToolSpec, args: &Value) -> ToolCallResult {
        tracing::debug!(tool = spec.name, "Tool call");

        match self.dispatch(spec.name, args).await {
            Ok(text) => ToolCallResult::text(text),
            Err(e) => {
                tracing::warn!(
                    tool = spec.name,
                    error = %e,
                    retryable = e.is_retryable(),
                    "Tool call failed"
                );
                let message = format!("{} error: {}", spec.error_label, describe(&e));
                if self.legacy_error_envelope {
                    ToolCallResult::text(message)
                } else {
                    ToolCallResult::error(message)
                }
            }
        }
    }

    async fn dispatch(&self, name: &str, args: &Value) -> Result<String> {
        match name {
            "get_summary" => {
                let lang = self.call_language(args)?;
                let page = required_str(args, "page")?;
                to_json(&self.source.summary(&lang, page).await?)
            }
            "get_content" => {
                let (lang, page) = self.resolve_page(args).await?;
                self.source.content(&lang, &page.title).await
            }
            "get_html" => {
                let (lang, page) = self.resolve_page(args).await?;
                self.source.html(&lang, &page.title).await
            }
            "get_images" => {
                let (lang, page) = self.resolve_page(args).await?;
                to_json(&self.source.images(&lang, &page.title).await?)
            }
            "get_links" => {
                let (lang, page) = self.resolve_page(args).await?;
                to_json(&self.source.links(&lang, &page.title).await?)
            }
            "get_references" => {
                let (lang, page) = self.resolve_page(args).await?;
                to_json(&self.source.references(&lang, &page.title).await?)
            }
            "get_categories" => {
                let (lang, page) = self.resolve_page(args).await?;
                to_json(&self.source.categories(&lang, &page.title).await?)
            }
            "get_url" => Ok(self.resolve_page(args).await?.1.fullurl),
            "get_title" => Ok(self.resolve_page(args).await?.1.title),
            "get_page_id" => Ok(self.resolve_page(args).await?.1.pageid.to_string()),
            "search_pages" => {
                let lang = self.call_language(args)?;
                let query = required_str(args, "query")?;
                let limit = optional_limit(args)?
                    .map(|l| l.clamp(1, MAX_SEARCH_LIMIT as u64) as u32)
                    .unwrap_or(DEFAULT_SEARCH_LIMIT);
                to_json(&self.source.search(&lang, query, limit).await?)
            }
            "check_page_exists" => {
                let lang = self.call_language(args)?;
                let page = required_str(args, "page")?;
                let existence = classify_existence(self.source.page(&lang, page).await)?;
                Ok(existence.as_str().to_string())
            }
            "disambiguation_options" => {
                let lang = self.call_language(args)?;
                let page = required_str(args, "page")?;
                let report = classify_disambiguation(self.source.page(&lang, page).await)?;
                to_json(&report)
            }
            "on_this_day" => {
                let lang = self.call_language(args)?;
                let options = OnThisDayOptions {
                    event_type: optional_str(args, "type")?.map(String::from),
                    month: optional_date_part(args, "month")?,
                    day: optional_date_part(args, "day")?,
                };
                to_json(&self.source.on_this_day(&lang, &options).await?)
            }
            "set_language" => {
                let requested = required_str(args, "language")?;
                let code = normalize_language(requested)
                    .map_err(|e| WikiError::InvalidInput(e.to_string()))?;
                let endpoint = self.source.endpoint(&code);
                let previous = self
                    .language
                    .set(&code)
                    .map_err(|e| WikiError::InvalidInput(e.to_string()))?;
                tracing::info!(from = %previous, to = %code, "Default language changed");
                Ok(format!(
                    "Language set to \"{}\". New API URL: {}",
                    code, endpoint
                ))
            }
            other => Err(WikiError::Internal(format!("no dispatcher for tool {}", other))),
        }
    }

    /// Language for this call: the `language` argument, else the default
    fn call_language(&self, args: &Value) -> Result<String> {
        self.language
            .resolve(optional_str(args, "language")?)
            .map_err(|e| WikiError::InvalidInput(e.to_string()))
    }

    async fn resolve_page(&self, args: &Value) -> Result<(String, PageInfo)> {
        let lang = self.call_language(args)?;
        let page = self.source.page(&lang, required_str(args, "page")?).await?;
        Ok((lang, page))
    }
}

#[async_trait]
impl McpHandler for WikipediaHandler {
    async fn handle_request(&self, request: McpRequest) -> McpResponse {
        match request.method.as_str() {
            methods::INITIALIZE => {
                let result = InitializeResult::default();
                McpResponse::success(request.id, json!(result))
            }
            methods::INITIALIZED | methods::PING => McpResponse::success(request.id, json!({})),
            methods::LIST_TOOLS => {
                let tools = get_tool_definitions();
                McpResponse::success(request.id, json!({"tools": tools}))
            }
            methods::CALL_TOOL => {
                let name = match request.params.get("name").and_then(|v| v.as_str()) {
                    Some(name) => name,
                    None => {
                        let err = WikiError::InvalidInput("missing tool name".to_string());
                        return McpResponse::from_error(request.id, err);
                    }
                };
                let arguments = request
                    .params
                    .get("arguments")
                    .cloned()
                    .unwrap_or(json!({}));

                match self.call_tool(name, arguments).await {
                    Some(result) => McpResponse::success(request.id, json!(result)),
                    None => {
                        let err = WikiError::InvalidInput(format!("Unknown tool: {}", name));
                        McpResponse::from_error(request.id, err)
                    }
                }
            }
            _ => McpResponse::error(
                request.id,
                -32601,
                format!("Method not found: {}", request.method),
            ),
        }
    }
}

fn required_str<'a>(args: &'a Value, key: &str) -> Result<&'a str> {
    optional_str(args, key)?
        .ok_or_else(|| WikiError::InvalidInput(format!("missing required argument '{}'", key)))
}

/// A string argument. Missing, null and blank values are absent; any other
/// non-string value is rejected.
fn optional_str<'a>(args: &'a Value, key: &str) -> Result<Option<&'a str>> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(_) => Err(WikiError::InvalidInput(format!(
            "argument '{}' must be a string",
            key
        ))),
    }
}

/// Month or day, given either as a string or as a non-negative integer
fn optional_date_part(args: &Value, key: &str) -> Result<Option<String>> {
    match args.get(key) {
        Some(Value::Number(n)) => n.as_u64().map(|n| Some(n.to_string())).ok_or_else(|| {
            WikiError::InvalidInput(format!("argument '{}' must be a positive integer", key))
        }),
        _ => Ok(optional_str(args, key)?.map(String::from)),
    }
}

fn optional_limit(args: &Value) -> Result<Option<u64>> {
    match args.get("limit") {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value.as_u64().map(Some).ok_or_else(|| {
            WikiError::InvalidInput("argument 'limit' must be a positive integer".to_string())
        }),
    }
}

fn to_json(value: &impl Serialize) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Error message, or its debug form if the message is empty
fn describe(err: &WikiError) -> String {
    let message = err.to_string();
    if message.trim().is_empty() {
        format!("{:?}", err)
    } else {
        message
    }
}
