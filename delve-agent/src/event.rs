use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use delve_core::ToolRecord;

use crate::{StopReason, Workspace};

/// Round-by-round observability for collaborators: each successfully applied
/// round emits a snapshot they can persist as an iteration record (round
/// number, timestamp, workspace, tool calls and outputs) or use to
/// reconstruct a continuation.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(tag = "type", content = "data")]
pub enum AgentEvent {
    RoundCompleted {
        round: u32,
        timestamp: DateTime<Utc>,
        workspace: Workspace,
        records: Vec<ToolRecord>,
    },
    RoundFailed {
        round: u32,
        attempt: u32,
        error: String,
    },
    Finished {
        stop: StopReason,
        rounds: u32,
        answer: Option<String>,
    },
}

/// Receives agent events. The loop is single-threaded between suspension
/// points, so a synchronous sink is enough.
pub trait EventSink: Send + Sync {
    fn on_event(&self, event: &AgentEvent);
}

impl<F> EventSink for F
where
    F: Fn(&AgentEvent) + Send + Sync,
{
    fn on_event(&self, event: &AgentEvent) {
        self(event)
    }
}
