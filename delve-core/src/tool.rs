use async_trait::async_trait;

use crate::DelveError;

/// A web capability the agent can dispatch. `context` carries the agent's
/// task text so scrape-style tools can compress their output against it;
/// tools that have no use for it ignore it.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    async fn call(&self, input: &str, context: Option<&str>) -> Result<String, DelveError>;
}
