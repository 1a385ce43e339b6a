mod error;
mod reranker;
mod splitter;

pub use error::RerankError;
pub use reranker::{JinaReranker, JinaRerankerBuilder};
pub use splitter::{RecursiveCharacterTextSplitter, SplitterBuilder, SplitterConfigError};
