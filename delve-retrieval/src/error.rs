use delve_core::DelveError;
use thiserror::Error;

/// Failures from the external ranking capability. All are hard failures:
/// this layer never retries, the caller decides what a failed rerank means.
#[derive(Debug, Error)]
pub enum RerankError {
    #[error("rerank request failed with status {status}: {body}")]
    Provider { status: u16, body: String },
    #[error("rerank transport failed: {0}")]
    Transport(String),
    #[error("invalid rerank response: {0}")]
    InvalidResponse(String),
    #[error("invalid reranker configuration: {0}")]
    InvalidConfig(String),
}

impl From<RerankError> for DelveError {
    fn from(err: RerankError) -> Self {
        DelveError::Custom(err.to_string())
    }
}
