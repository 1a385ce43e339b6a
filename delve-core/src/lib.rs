mod directive;
mod error;
mod json;
mod llm;
mod think;
mod tool;

pub use directive::{BlockOp, Directive, ToolCall, ToolRecord};
pub use error::DelveError;
pub use json::{extract_json_values, extract_largest_json};
pub use llm::{ReasoningEffort, ReasoningModel};
pub use think::strip_reasoning_markup;
pub use tool::Tool;
