//! Wikipedia API client
//!
//! Page lookups go through the MediaWiki Action API (`/w/api.php`,
//! `formatversion=2`); summaries, rendered HTML and the "on this day" feed
//! come from the Wikimedia REST API (`/api/rest_v1`).

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{StatusCode, Url};
use serde_json::Value;

use super::types::{OnThisDayOptions, PageInfo, PageSummary, SearchResult, MAX_SEARCH_LIMIT};
use crate::config::ServerConfig;
use crate::error::{Result, WikiError};

/// Source of Wikipedia data.
///
/// Every call names its language explicitly; implementations must not keep
/// a language of their own.
#[async_trait]
pub trait WikiSource: Send + Sync {
    /// Resolve a title (following redirects) to a page
    ///
    /// Fails with [`WikiError::NotFound`] for missing pages and
    /// [`WikiError::Disambiguation`] for disambiguation pages.
    async fn page(&self, lang: &str, title: &str) -> Result<PageInfo>;

    async fn summary(&self, lang: &str, title: &str) -> Result<PageSummary>;

    /// Plain-text content
    async fn content(&self, lang: &str, title: &str) -> Result<String>;

    /// Rendered HTML
    async fn html(&self, lang: &str, title: &str) -> Result<String>;

    /// URLs of images used on the page
    async fn images(&self, lang: &str, title: &str) -> Result<Vec<String>>;

    /// Titles of article pages linked from the page
    async fn links(&self, lang: &str, title: &str) -> Result<Vec<String>>;

    /// External URLs cited on the page
    async fn references(&self, lang: &str, title: &str) -> Result<Vec<String>>;

    async fn categories(&self, lang: &str, title: &str) -> Result<Vec<String>>;

    async fn search(&self, lang: &str, query: &str, limit: u32) -> Result<Vec<SearchResult>>;

    /// Historical events feed; only the supplied option fields are set
    async fn on_this_day(&self, lang: &str, options: &OnThisDayOptions) -> Result<Value>;

    /// Action API endpoint for a language
    fn endpoint(&self, lang: &str) -> String;
}

/// reqwest-backed [`WikiSource`]
pub struct HttpWikiClient {
    client: reqwest::Client,
    config: ServerConfig,
}

impl HttpWikiClient {
    /// Create a new client, validating the configuration first
    pub fn new(config: ServerConfig) -> Result<Self> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout())
            .build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// REST API URL with each segment percent-encoded (`/` in titles included)
    fn rest_url(&self, lang: &str, segments: &[&str]) -> Result<Url> {
        let base = format!("{}/api/rest_v1/", self.config.host_for(lang));
        let mut url =
            Url::parse(&base).map_err(|e| WikiError::Config(format!("{}: {}", base, e)))?;
        url.path_segments_mut()
            .map_err(|_| WikiError::Config(format!("{} cannot be a base URL", base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn action_query(&self, lang: &str, params: &[(String, String)]) -> Result<Value> {
        let response = self
            .client
            .get(self.endpoint(lang))
            .query(&[
                ("action", "query"),
                ("format", "json"),
                ("formatversion", "2"),
            ])
            .query(params)
            .send()
            .await?;

        let body: Value = check_status(response, "Action API").await?.json().await?;

        if let Some(error) = body.get("error") {
            let code = error.get("code").and_then(Value::as_str).unwrap_or("unknown");
            let info = error.get("info").and_then(Value::as_str).unwrap_or("");
            return Err(WikiError::Api(format!("{}: {}", code, info)));
        }

        Ok(body)
    }

    /// Run a query, following `continue` tokens up to `max_continuations` times.
    /// Returns every response body in order.
    async fn query_all(&self, lang: &str, params: &[(&str, &str)]) -> Result<Vec<Value>> {
        let base: Vec<(String, String)> = params
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        let mut bodies = Vec::new();
        let mut continuation: Vec<(String, String)> = Vec::new();

        for round in 0..=self.config.max_continuations {
            let mut request = base.clone();
            request.extend(continuation.iter().cloned());

            let body = self.action_query(lang, &request).await?;
            let next = continuation_params(&body);
            bodies.push(body);

            match next {
                Some(next) => {
                    if round == self.config.max_continuations {
                        tracing::debug!(
                            "Stopping after {} continuations, results truncated",
                            round
                        );
                    }
                    continuation = next;
                }
                None => break,
            }
        }

        Ok(bodies)
    }

    /// Query a single title and collect `field` out of each entry of the
    /// page's `list`, across all continuation rounds
    async fn page_list(
        &self,
        lang: &str,
        title: &str,
        params: &[(&str, &str)],
        list: &str,
        field: &str,
    ) -> Result<Vec<String>> {
        let mut request = vec![("titles", title)];
        request.extend_from_slice(params);

        let mut values = Vec::new();
        for body in self.query_all(lang, &request).await? {
            let page = first_page(&body, title)?;
            values.extend(string_list(page, list, field));
        }
        Ok(values)
    }

    async fn rest_get(&self, url: Url, title: &str) -> Result<reqwest::Response> {
        let response = self.client.get(url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(WikiError::NotFound(title.to_string()));
        }
        check_status(response, "REST API").await
    }
}

#[async_trait]
impl WikiSource for HttpWikiClient {
    async fn page(&self, lang: &str, title: &str) -> Result<PageInfo> {
        let title = require_title(title)?;
        tracing::debug!(lang, title, "Resolving page");

        let params = [
            ("titles".to_string(), title.to_string()),
            ("prop".to_string(), "info|pageprops".to_string()),
            ("inprop".to_string(), "url".to_string()),
            ("ppprop".to_string(), "disambiguation".to_string()),
            ("redirects".to_string(), "1".to_string()),
        ];
        let body = self.action_query(lang, &params).await?;
        let page = first_page(&body, title)?;
        let info = parse_page_info(page)?;

        if is_disambiguation(page) {
            let options = self.links(lang, &info.title).await?;
            return Err(WikiError::Disambiguation {
                title: info.title,
                options,
            });
        }

        Ok(info)
    }

    async fn summary(&self, lang: &str, title: &str) -> Result<PageSummary> {
        let title = require_title(title)?;
        tracing::debug!(lang, title, "Fetching summary");

        let url = self.rest_url(lang, &["page", "summary", &rest_title(title)])?;
        let summary = self.rest_get(url, title).await?.json().await?;
        Ok(summary)
    }

    async fn content(&self, lang: &str, title: &str) -> Result<String> {
        let title = require_title(title)?;
        let params = [
            ("titles".to_string(), title.to_string()),
            ("prop".to_string(), "extracts".to_string()),
            ("explaintext".to_string(), "1".to_string()),
            ("redirects".to_string(), "1".to_string()),
        ];
        let body = self.action_query(lang, &params).await?;
        let page = first_page(&body, title)?;

        Ok(page
            .get("extract")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string())
    }

    async fn html(&self, lang: &str, title: &str) -> Result<String> {
        let title = require_title(title)?;
        let url = self.rest_url(lang, &["page", "html", &rest_title(title)])?;
        Ok(self.rest_get(url, title).await?.text().await?)
    }

    async fn images(&self, lang: &str, title: &str) -> Result<Vec<String>> {
        let title = require_title(title)?;
        let params = [
            ("titles", title),
            ("generator", "images"),
            ("gimlimit", "max"),
            ("prop", "imageinfo"),
            ("iiprop", "url"),
            ("redirects", "1"),
        ];

        let mut urls = Vec::new();
        for body in self.query_all(lang, &params).await? {
            let pages = body
                .pointer("/query/pages")
                .and_then(Value::as_array)
                .map(Vec::as_slice)
                .unwrap_or_default();
            for file in pages {
                urls.extend(string_list(file, "imageinfo", "url"));
            }
        }
        Ok(urls)
    }

    async fn links(&self, lang: &str, title: &str) -> Result<Vec<String>> {
        let title = require_title(title)?;
        self.page_list(
            lang,
            title,
            &[
                ("prop", "links"),
                ("plnamespace", "0"),
                ("pllimit", "max"),
                ("redirects", "1"),
            ],
            "links",
            "title",
        )
        .await
    }

    async fn references(&self, lang: &str, title: &str) -> Result<Vec<String>> {
        let title = require_title(title)?;
        self.page_list(
            lang,
            title,
            &[("prop", "extlinks"), ("ellimit", "max"), ("redirects", "1")],
            "extlinks",
            "url",
        )
        .await
    }

    async fn categories(&self, lang: &str, title: &str) -> Result<Vec<String>> {
        let title = require_title(title)?;
        self.page_list(
            lang,
            title,
            &[("prop", "categories"), ("cllimit", "max"), ("redirects", "1")],
            "categories",
            "title",
        )
        .await
    }

    async fn search(&self, lang: &str, query: &str, limit: u32) -> Result<Vec<SearchResult>> {
        if query.trim().is_empty() {
            return Err(WikiError::InvalidInput("query cannot be empty".to_string()));
        }
        tracing::debug!(lang, query, limit, "Searching");

        let params = [
            ("list".to_string(), "search".to_string()),
            ("srsearch".to_string(), query.to_string()),
            (
                "srlimit".to_string(),
                limit.clamp(1, MAX_SEARCH_LIMIT).to_string(),
            ),
            (
                "srprop".to_string(),
                "snippet|wordcount|timestamp".to_string(),
            ),
        ];
        let body = self.action_query(lang, &params).await?;

        match body.pointer("/query/search") {
            Some(hits) => Ok(serde_json::from_value(hits.clone())?),
            None => Ok(Vec::new()),
        }
    }

    async fn on_this_day(&self, lang: &str, options: &OnThisDayOptions) -> Result<Value> {
        let query = options.resolve(Utc::now().date_naive())?;
        tracing::debug!(lang, path = %query.path(), "Fetching on-this-day feed");

        let month = format!("{:02}", query.month);
        let day = format!("{:02}", query.day);
        let url = self.rest_url(
            lang,
            &["feed", "onthisday", query.event_type.as_str(), &month, &day],
        )?;

        let response = self.client.get(url).send().await?;
        let events = check_status(response, "On this day feed").await?.json().await?;
        Ok(events)
    }

    fn endpoint(&self, lang: &str) -> String {
        format!("{}/w/api.php", self.config.host_for(lang))
    }
}

async fn check_status(response: reqwest::Response, what: &str) -> Result<reqwest::Response> {
    let status = response.status();

    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(WikiError::RateLimited);
    }

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(WikiError::Api(format!("{} status {}: {}", what, status, body)));
    }

    Ok(response)
}

fn require_title(title: &str) -> Result<&str> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(WikiError::InvalidInput("page title cannot be empty".to_string()));
    }
    Ok(trimmed)
}

/// REST endpoints address pages by their DB key (spaces as underscores)
fn rest_title(title: &str) -> String {
    title.replace(' ', "_")
}

/// First page of a `formatversion=2` response, or `NotFound` if missing
fn first_page<'a>(body: &'a Value, title: &str) -> Result<&'a Value> {
    let page = body
        .pointer("/query/pages/0")
        .ok_or_else(|| WikiError::NotFound(title.to_string()))?;

    let flagged = |key: &str| page.get(key).and_then(Value::as_bool).unwrap_or(false);
    if flagged("missing") || flagged("invalid") {
        return Err(WikiError::NotFound(title.to_string()));
    }

    Ok(page)
}

fn parse_page_info(page: &Value) -> Result<PageInfo> {
    let pageid = page
        .get("pageid")
        .and_then(Value::as_u64)
        .ok_or_else(|| WikiError::Api("page has no pageid".to_string()))?;
    let title = page
        .get("title")
        .and_then(Value::as_str)
        .ok_or_else(|| WikiError::Api("page has no title".to_string()))?;

    Ok(PageInfo {
        pageid,
        title: title.to_string(),
        fullurl: page
            .get("fullurl")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        ns: page.get("ns").and_then(Value::as_i64).unwrap_or(0),
    })
}

fn is_disambiguation(page: &Value) -> bool {
    page.pointer("/pageprops/disambiguation").is_some()
}

fn string_list(page: &Value, list: &str, field: &str) -> Vec<String> {
    page.get(list)
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(|e| e.get(field).and_then(Value::as_str).map(String::from))
                .collect()
        })
        .unwrap_or_default()
}

/// Parameters to send with the next request, if the response was truncated
fn continuation_params(body: &Value) -> Option<Vec<(String, String)>> {
    let next = body.get("continue")?.as_object()?;
    Some(
        next.iter()
            .map(|(k, v)| {
                let value = match v {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (k.clone(), value)
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client() -> HttpWikiClient {
        HttpWikiClient::new(ServerConfig::default()).unwrap()
    }

    #[test]
    fn test_endpoint_per_language() {
        let client = client();
        assert_eq!(client.endpoint("en"), "https://en.wikipedia.org/w/api.php");
        assert_eq!(client.endpoint("fr"), "https://fr.wikipedia.org/w/api.php");
    }

    #[test]
    fn test_rest_url_encodes_titles() {
        let client = client();
        let url = client
            .rest_url("en", &["page", "summary", &rest_title("AC/DC")])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://en.wikipedia.org/api/rest_v1/page/summary/AC%2FDC"
        );

        let url = client
            .rest_url("de", &["page", "html", &rest_title("Albert Einstein")])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://de.wikipedia.org/api/rest_v1/page/html/Albert_Einstein"
        );
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = ServerConfig {
            api_host: "ftp://{lang}.example.org".to_string(),
            ..Default::default()
        };
        assert!(matches!(HttpWikiClient::new(config), Err(WikiError::Config(_))));
    }

    #[test]
    fn test_first_page_missing() {
        let body = json!({"query": {"pages": [{"ns": 0, "title": "Xyzzy", "missing": true}]}});
        let err = first_page(&body, "Xyzzy").unwrap_err();
        assert!(matches!(err, WikiError::NotFound(ref t) if t == "Xyzzy"));

        let body = json!({"query": {"pages": [{"title": "<", "invalid": true}]}});
        assert!(matches!(first_page(&body, "<"), Err(WikiError::NotFound(_))));

        assert!(matches!(
            first_page(&json!({"batchcomplete": true}), "x"),
            Err(WikiError::NotFound(_))
        ));
    }

    #[test]
    fn test_parse_page_info_and_disambiguation() {
        let body = json!({"query": {"pages": [{
            "pageid": 19694,
            "ns": 0,
            "title": "Mercury",
            "fullurl": "https://en.wikipedia.org/wiki/Mercury",
            "pageprops": {"disambiguation": ""}
        }]}});
        let page = first_page(&body, "mercury").unwrap();
        let info = parse_page_info(page).unwrap();
        assert_eq!(info.pageid, 19694);
        assert_eq!(info.title, "Mercury");
        assert_eq!(info.fullurl, "https://en.wikipedia.org/wiki/Mercury");
        assert!(is_disambiguation(page));

        let plain = json!({"pageid": 1, "title": "A"});
        assert!(!is_disambiguation(&plain));
    }

    #[test]
    fn test_string_list() {
        let page = json!({
            "title": "Rust",
            "links": [{"ns": 0, "title": "Mozilla"}, {"ns": 0, "title": "LLVM"}],
            "extlinks": [{"url": "https://www.rust-lang.org/"}]
        });
        assert_eq!(string_list(&page, "links", "title"), vec!["Mozilla", "LLVM"]);
        assert_eq!(
            string_list(&page, "extlinks", "url"),
            vec!["https://www.rust-lang.org/"]
        );
        assert!(string_list(&page, "categories", "title").is_empty());
    }

    #[test]
    fn test_continuation_params() {
        let body = json!({"continue": {"plcontinue": "736|0|Foo", "continue": "||"}});
        let mut params = continuation_params(&body).unwrap();
        params.sort();
        assert_eq!(
            params,
            vec![
                ("continue".to_string(), "||".to_string()),
                ("plcontinue".to_string(), "736|0|Foo".to_string()),
            ]
        );
        assert!(continuation_params(&json!({"batchcomplete": true})).is_none());
    }

    #[test]
    fn test_require_title() {
        assert_eq!(require_title("  Rust ").unwrap(), "Rust");
        assert!(matches!(require_title("   "), Err(WikiError::InvalidInput(_))));
    }
}
