use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::debug;
use url::form_urlencoded;

use delve_core::{DelveError, Tool};

const DEFAULT_BASE_URL: &str = "https://s.jina.ai";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// One hit from the search reader.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct SearchResult {
    pub url: String,
    pub title: String,
    // Some providers omit the snippet; an empty description beats losing
    // the whole result set.
    #[serde(default)]
    pub description: String,
}

#[derive(Deserialize)]
struct SearchResponse {
    data: Vec<SearchResult>,
}

/// Broad web search against a Jina-style search reader. Pure
/// request/response: a non-success status is a hard failure and retries are
/// the caller's decision.
pub struct SearchTool {
    http: Client,
    base_url: String,
    api_key: Option<SecretString>,
}

pub struct SearchToolBuilder {
    base_url: String,
    api_key: Option<SecretString>,
    timeout: Duration,
}

impl SearchToolBuilder {
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(SecretString::new(api_key.into()));
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> Result<SearchTool, DelveError> {
        let http = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|err| DelveError::InvalidConfig(err.to_string()))?;
        Ok(SearchTool {
            http,
            base_url: self.base_url,
            api_key: self.api_key,
        })
    }
}

impl SearchTool {
    pub fn builder() -> SearchToolBuilder {
        SearchToolBuilder {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Builds a search tool with defaults, picking up `JINA_API_KEY` when
    /// set. The reader answers unauthenticated requests at a lower rate
    /// limit, so the key is optional.
    pub fn from_env() -> Result<Self, DelveError> {
        let mut builder = Self::builder();
        if let Ok(api_key) = std::env::var("JINA_API_KEY") {
            builder = builder.api_key(api_key);
        }
        builder.build()
    }

    pub async fn search(&self, query: &str) -> Result<Vec<SearchResult>, DelveError> {
        let encoded: String = form_urlencoded::byte_serialize(query.as_bytes()).collect();
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), encoded);
        debug!(%url, "fetching search results");

        let mut request = self
            .http
            .get(&url)
            .header("Accept", "application/json")
            .header("X-Retain-Images", "none")
            .header("X-No-Cache", "true");
        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key.expose_secret());
        }
        let response = request
            .send()
            .await
            .map_err(|err| self.failure(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(self.failure(format!("failed to fetch {url}: status {status}")));
        }

        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|err| self.failure(err.to_string()))?;
        Ok(parsed.data)
    }

    fn failure(&self, reason: String) -> DelveError {
        DelveError::ToolCallFailed {
            tool_name: "search".to_string(),
            reason,
        }
    }

    fn format_results(results: &[SearchResult]) -> String {
        let mut lines = Vec::new();
        for result in results {
            lines.push(format!("Title: {}", result.title));
            lines.push(format!("URL Source: {}", result.url));
            lines.push(format!("Description: {}", result.description));
            lines.push(String::new());
        }
        lines.join("\n").trim_end().to_string()
    }
}

#[async_trait]
impl Tool for SearchTool {
    fn name(&self) -> &str {
        "search"
    }

    fn description(&self) -> &str {
        "Broad web search returning titles, URLs and snippets"
    }

    async fn call(&self, input: &str, _context: Option<&str>) -> Result<String, DelveError> {
        let results = self.search(input).await?;
        Ok(Self::format_results(&results))
    }
}
