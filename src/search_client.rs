//! Gemini-backed stock search client.
//!
//! One logical call: free-text query in, `SearchResult` out. The request uses
//! the `generateContent` endpoint with the `google_search` tool enabled so the
//! model grounds its answer; citations are lifted from the grounding metadata.

use async_trait::async_trait;
use regex::Regex;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, warn};

use crate::models::{SearchResult, SourceRef, StockData};

pub const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Failure reasons at the client seam. The UI collapses all of these into one
/// fixed message; the variant only reaches the log.
#[derive(Debug, Clone)]
pub enum SearchError {
    EmptyQuery,
    RequestFailed(String),
    RateLimited,
    ApiError { status: u16, message: String },
    MalformedResponse(String),
}

impl std::fmt::Display for SearchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchError::EmptyQuery => write!(f, "Search query cannot be empty"),
            SearchError::RequestFailed(msg) => write!(f, "Request failed: {}", msg),
            SearchError::RateLimited => write!(f, "Rate limited by the API"),
            SearchError::ApiError { status, message } => {
                write!(f, "API error ({}): {}", status, message)
            }
            SearchError::MalformedResponse(msg) => write!(f, "Malformed response: {}", msg),
        }
    }
}

impl std::error::Error for SearchError {}

/// The one outbound integration point. Behind a trait so the view controller
/// can be driven by a stub in tests.
#[async_trait]
pub trait StockSearch: Send + Sync {
    async fn search(&self, query: &str) -> Result<SearchResult, SearchError>;
}

#[derive(Clone)]
pub struct GeminiSearchClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiSearchClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            client,
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: BASE_URL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        if let Ok(client) = reqwest::Client::builder().timeout(timeout).build() {
            self.client = client;
        }
        self
    }

    async fn perform_search(&self, query: &str) -> Result<SearchResult, SearchError> {
        let url = format!(
            "{}/{model}:generateContent?key={api_key}",
            self.base_url,
            model = self.model,
            api_key = self.api_key
        );

        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: build_prompt(query),
                }],
            }],
            tools: vec![Tool::default()],
        };

        debug!(target: "search_client", "Querying model {} for: {}", self.model, query);

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|err| SearchError::RequestFailed(err.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            return Err(map_http_error(status, body));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|err| SearchError::MalformedResponse(err.to_string()))?;

        let result = map_response(query, &payload)?;
        debug!(
            target: "search_client",
            "Result for '{}': data={}, {} sources",
            query,
            result.data.is_some(),
            result.sources.len()
        );
        Ok(result)
    }
}

#[async_trait]
impl StockSearch for GeminiSearchClient {
    async fn search(&self, query: &str) -> Result<SearchResult, SearchError> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Err(SearchError::EmptyQuery);
        }
        self.perform_search(trimmed).await
    }
}

// ============================================
// Request types
// ============================================

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    tools: Vec<Tool>,
}

#[derive(Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize, Default)]
struct Tool {
    #[serde(rename = "google_search")]
    google_search: GoogleSearchConfig,
}

#[derive(Serialize, Default)]
struct GoogleSearchConfig {}

/// The JSON document the prompt asks the model to emit.
#[derive(Deserialize)]
struct AiPayload {
    #[serde(default)]
    data: Option<StockData>,
    #[serde(default)]
    analysis: String,
}

// ============================================
// Mapping helpers
// ============================================

fn build_prompt(query: &str) -> String {
    format!(
        "You are a US stock market research assistant. Use Google Search to look up \
         current information about the following stock ticker or company name: \"{}\".\n\
         \n\
         Respond with a single JSON object and nothing else, shaped exactly like this:\n\
         {{\n\
           \"data\": {{\n\
             \"symbol\": \"...\", \"name\": \"...\", \"price\": \"...\", \"change\": \"...\",\n\
             \"changePercent\": \"...\", \"marketCap\": \"...\", \"peRatio\": \"...\",\n\
             \"description\": \"...\", \"sector\": \"...\", \"high52\": \"...\", \"low52\": \"...\",\n\
             \"chartData\": [{{\"time\": \"YYYY-MM-DD\", \"value\": 123.45}}]\n\
           }},\n\
           \"analysis\": \"...\"\n\
         }}\n\
         \n\
         All fields except chartData values are display-ready strings. chartData holds \
         roughly the last 30 trading days in ascending date order. If the query does not \
         resolve to one concrete listed security, set \"data\" to null and explain why in \
         \"analysis\". Write the analysis as a few short paragraphs for a retail investor.",
        query
    )
}

fn map_response(query: &str, root: &Value) -> Result<SearchResult, SearchError> {
    let text = extract_text(root).ok_or_else(|| {
        SearchError::MalformedResponse("response contained no text parts".to_string())
    })?;

    let payload: AiPayload = serde_json::from_str(strip_code_fence(&text))
        .map_err(|err| SearchError::MalformedResponse(format!("payload not valid JSON: {}", err)))?;

    if payload.data.is_none() {
        warn!(target: "search_client", "No concrete instrument for query: {}", query);
    }

    Ok(SearchResult {
        data: payload.data,
        analysis: payload.analysis,
        sources: extract_sources(root),
    })
}

/// Concatenate every non-empty text part across candidates.
fn extract_text(root: &Value) -> Option<String> {
    let candidates = root.get("candidates")?.as_array()?;

    let mut collected = Vec::new();
    for candidate in candidates {
        if let Some(parts) = candidate
            .get("content")
            .and_then(|content| content.get("parts"))
            .and_then(|parts| parts.as_array())
        {
            for part in parts {
                if let Some(text) = part.get("text").and_then(|t| t.as_str()) {
                    let trimmed = text.trim();
                    if !trimmed.is_empty() {
                        collected.push(trimmed.to_string());
                    }
                }
            }
        }
    }

    if collected.is_empty() {
        None
    } else {
        Some(collected.join("\n"))
    }
}

/// The model wraps its JSON in a Markdown fence more often than not.
fn strip_code_fence(text: &str) -> &str {
    static FENCE: std::sync::OnceLock<Regex> = std::sync::OnceLock::new();
    let fence = FENCE.get_or_init(|| Regex::new(r"^```(?:json)?\s*").expect("valid fence regex"));

    let trimmed = text.trim();
    if let Some(m) = fence.find(trimmed) {
        let inner = &trimmed[m.end()..];
        return inner.trim_end_matches("```").trim();
    }
    trimmed
}

/// Map grounding chunks to (uri, title) citations, first occurrence wins.
fn extract_sources(root: &Value) -> Vec<SourceRef> {
    let mut seen = HashSet::new();
    let mut sources = Vec::new();

    let candidates = match root.get("candidates").and_then(|c| c.as_array()) {
        Some(list) => list,
        None => return sources,
    };

    for candidate in candidates {
        let chunks = match candidate
            .get("groundingMetadata")
            .and_then(|m| m.get("groundingChunks"))
            .and_then(|chunks| chunks.as_array())
        {
            Some(list) => list,
            None => continue,
        };

        for chunk in chunks {
            let Some(web) = chunk.get("web") else {
                continue;
            };
            let Some(uri) = web.get("uri").and_then(|v| v.as_str()) else {
                continue;
            };
            if !seen.insert(uri.to_string()) {
                continue;
            }
            let title = web
                .get("title")
                .and_then(|v| v.as_str())
                .map(|s| s.to_string())
                .unwrap_or_else(|| uri.to_string());

            sources.push(SourceRef {
                uri: uri.to_string(),
                title,
            });
        }
    }

    sources
}

fn map_http_error(status: StatusCode, body: String) -> SearchError {
    let message = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|json| {
            json.get("error")
                .and_then(|err| err.get("message"))
                .and_then(|msg| msg.as_str())
                .map(|msg| msg.to_string())
        })
        .unwrap_or(body);

    if status == StatusCode::TOO_MANY_REQUESTS {
        return SearchError::RateLimited;
    }

    SearchError::ApiError {
        status: status.as_u16(),
        message,
    }
}
