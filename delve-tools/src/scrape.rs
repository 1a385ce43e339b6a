use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use delve_core::{DelveError, Tool};
use delve_retrieval::JinaReranker;

const DEFAULT_BASE_URL: &str = "https://r.jina.ai";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Page extraction through a Jina-style reader. The reader is asked to drop
/// images and append a link summary. When a task context is supplied, the
/// extracted text is compressed through the reranker against that context so
/// a single scrape cannot flood the agent's prompt.
pub struct ScrapeTool {
    http: Client,
    base_url: String,
    api_key: Option<SecretString>,
    reranker: Option<JinaReranker>,
    links_summary: bool,
}

pub struct ScrapeToolBuilder {
    base_url: String,
    api_key: Option<SecretString>,
    reranker: Option<JinaReranker>,
    links_summary: bool,
    timeout: Duration,
}

impl ScrapeToolBuilder {
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(SecretString::new(api_key.into()));
        self
    }

    /// Rerank scrape output against the caller-provided context. Without a
    /// reranker the tool returns raw extracted text.
    pub fn reranker(mut self, reranker: JinaReranker) -> Self {
        self.reranker = Some(reranker);
        self
    }

    pub fn links_summary(mut self, links_summary: bool) -> Self {
        self.links_summary = links_summary;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> Result<ScrapeTool, DelveError> {
        let http = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|err| DelveError::InvalidConfig(err.to_string()))?;
        Ok(ScrapeTool {
            http,
            base_url: self.base_url,
            api_key: self.api_key,
            reranker: self.reranker,
            links_summary: self.links_summary,
        })
    }
}

impl ScrapeTool {
    pub fn builder() -> ScrapeToolBuilder {
        ScrapeToolBuilder {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            reranker: None,
            links_summary: true,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Builds a scrape tool with defaults and a default reranker, picking up
    /// `JINA_API_KEY` for both when set.
    pub fn from_env() -> Result<Self, DelveError> {
        let reranker = JinaReranker::from_env().map_err(DelveError::from)?;
        let mut builder = Self::builder().reranker(reranker);
        if let Ok(api_key) = std::env::var("JINA_API_KEY") {
            builder = builder.api_key(api_key);
        }
        builder.build()
    }

    pub async fn scrape(
        &self,
        target: &str,
        context: Option<&str>,
    ) -> Result<String, DelveError> {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), target);
        debug!(%url, "fetching page text");

        let mut request = self.http.get(&url).header("X-Retain-Images", "none");
        if self.links_summary {
            request = request.header("X-With-Links-Summary", "true");
        }
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
        let text = response
            .text()
            .await
            .map_err(|err| self.failure(err.to_string()))?;

        match (&self.reranker, context) {
            (Some(reranker), Some(context)) => reranker
                .rerank(&text, context)
                .await
                .map_err(|err| self.failure(err.to_string())),
            _ => Ok(text),
        }
    }

    fn failure(&self, reason: String) -> DelveError {
        DelveError::ToolCallFailed {
            tool_name: "scrape".to_string(),
            reason,
        }
    }
}

#[async_trait]
impl Tool for ScrapeTool {
    fn name(&self) -> &str {
        "scrape"
    }

    fn description(&self) -> &str {
        "Extracts the text of a web page, compressed against the task context"
    }

    async fn call(&self, input: &str, context: Option<&str>) -> Result<String, DelveError> {
        self.scrape(input, context).await
    }
}
