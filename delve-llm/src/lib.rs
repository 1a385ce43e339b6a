mod openrouter;

pub use delve_core::{ReasoningEffort, ReasoningModel};
pub use openrouter::{OpenRouterBuilder, OpenRouterClient};
