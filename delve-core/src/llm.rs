use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::DelveError;

/// Reasoning-effort level requested from the model endpoint.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReasoningEffort {
    #[default]
    Low,
    Medium,
    High,
}

impl FromStr for ReasoningEffort {
    type Err = DelveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(DelveError::InvalidConfig(format!(
                "unknown reasoning effort '{other}'"
            ))),
        }
    }
}

/// A reasoning-capable model consumed as a single-shot text oracle. Each call
/// is stateless; all memory lives in the agent's workspace and is re-supplied
/// through the prompt every round.
#[async_trait]
pub trait ReasoningModel: Send + Sync {
    async fn generate(
        &self,
        prompt: &str,
        effort: ReasoningEffort,
    ) -> Result<String, DelveError>;
}
