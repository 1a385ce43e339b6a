mod agent;
mod event;
mod registry;
mod workspace;

pub use agent::{Agent, AgentConfig, RunOptions, RunReport, StopReason};
pub use event::{AgentEvent, EventSink};
pub use registry::ToolRegistry;
pub use workspace::Workspace;
