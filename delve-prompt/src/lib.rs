mod investigation;
mod template;

pub use investigation::{format_tool_records, investigation_template, render_round_prompt};
pub use template::PromptTemplate;
