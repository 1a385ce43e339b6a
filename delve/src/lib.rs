//! Facade crate: one dependency line pulls in the pieces of a deep-search
//! agent. Feature-gate what you do not need.

pub use delve_core::{
    extract_json_values, extract_largest_json, strip_reasoning_markup, BlockOp, DelveError,
    Directive, ReasoningEffort, ReasoningModel, Tool, ToolCall, ToolRecord,
};
pub use delve_prompt::{
    format_tool_records, investigation_template, render_round_prompt, PromptTemplate,
};

#[cfg(feature = "agent")]
pub use delve_agent::{
    Agent, AgentConfig, AgentEvent, EventSink, RunOptions, RunReport, StopReason, ToolRegistry,
    Workspace,
};

#[cfg(feature = "llm")]
pub use delve_llm::OpenRouterClient;

#[cfg(feature = "retrieval")]
pub use delve_retrieval::{JinaReranker, RecursiveCharacterTextSplitter};

#[cfg(feature = "tools")]
pub use delve_tools::{ScrapeTool, SearchTool};
