use std::time::Duration;

use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{RecursiveCharacterTextSplitter, RerankError};

const DEFAULT_BASE_URL: &str = "https://api.jina.ai";
const DEFAULT_MODEL: &str = "jina-reranker-v2-base-multilingual";
const DEFAULT_TOP_DOCS: usize = 5;

#[derive(Serialize)]
struct RerankRequest<'a> {
    model: &'a str,
    query: &'a str,
    top_n: usize,
    documents: &'a [String],
}

#[derive(Deserialize)]
struct RerankResponse {
    results: Vec<RerankResult>,
}

#[derive(Deserialize)]
struct RerankResult {
    document: RerankDocument,
}

#[derive(Deserialize)]
struct RerankDocument {
    text: String,
}

/// Client for a Jina-style rerank endpoint. Splits long text with the
/// configured splitter, submits the chunks against a query and merges the
/// top-ranked chunks back into one block.
#[derive(Clone)]
pub struct JinaReranker {
    http: Client,
    base_url: String,
    api_key: Option<SecretString>,
    model: String,
    top_docs: usize,
    splitter: RecursiveCharacterTextSplitter,
}

pub struct JinaRerankerBuilder {
    base_url: String,
    api_key: Option<SecretString>,
    model: String,
    top_docs: usize,
    timeout: Duration,
    splitter: RecursiveCharacterTextSplitter,
}

impl JinaRerankerBuilder {
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(SecretString::new(api_key.into()));
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn top_docs(mut self, top_docs: usize) -> Self {
        self.top_docs = top_docs;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn splitter(mut self, splitter: RecursiveCharacterTextSplitter) -> Self {
        self.splitter = splitter;
        self
    }

    pub fn build(self) -> Result<JinaReranker, RerankError> {
        let http = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|err| RerankError::InvalidConfig(err.to_string()))?;
        Ok(JinaReranker {
            http,
            base_url: self.base_url,
            api_key: self.api_key,
            model: self.model,
            top_docs: self.top_docs,
            splitter: self.splitter,
        })
    }
}

impl JinaReranker {
    pub fn builder() -> JinaRerankerBuilder {
        JinaRerankerBuilder {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            top_docs: DEFAULT_TOP_DOCS,
            timeout: Duration::from_secs(60),
            splitter: RecursiveCharacterTextSplitter::default(),
        }
    }

    /// Builds a reranker with defaults, picking up `JINA_API_KEY` when set.
    /// The endpoint also answers unauthenticated requests at a lower rate
    /// limit, so a missing key is not a configuration failure here.
    pub fn from_env() -> Result<Self, RerankError> {
        let mut builder = Self::builder();
        if let Ok(api_key) = std::env::var("JINA_API_KEY") {
            builder = builder.api_key(api_key);
        }
        builder.build()
    }

    /// Splits `text`, ranks the chunks against `query` and returns the top
    /// chunks newline-joined in descending relevance order.
    pub async fn rerank(&self, text: &str, query: &str) -> Result<String, RerankError> {
        let chunks = self.splitter.split_text(text);
        let ranked = self.rerank_chunks(query, &chunks).await?;
        Ok(ranked.join("\n"))
    }

    /// Ranks pre-split chunks against `query`. Callers that need a custom
    /// split or merge compose this with their own splitter and joiner.
    pub async fn rerank_chunks(
        &self,
        query: &str,
        chunks: &[String],
    ) -> Result<Vec<String>, RerankError> {
        let request = RerankRequest {
            model: &self.model,
            query,
            top_n: self.top_docs,
            documents: chunks,
        };
        let url = format!("{}/v1/rerank", self.base_url.trim_end_matches('/'));
        debug!(%url, chunks = chunks.len(), "submitting rerank request");

        let mut builder = self.http.post(&url).json(&request);
        if let Some(api_key) = &self.api_key {
            builder = builder.bearer_auth(api_key.expose_secret());
        }
        let response = builder
            .send()
            .await
            .map_err(|err| RerankError::Transport(err.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| RerankError::Transport(err.to_string()))?;
        if !status.is_success() {
            return Err(RerankError::Provider {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: RerankResponse = serde_json::from_str(&body)
            .map_err(|err| RerankError::InvalidResponse(err.to_string()))?;
        Ok(parsed
            .results
            .into_iter()
            .take(self.top_docs)
            .map(|result| result.document.text)
            .collect())
    }
}
