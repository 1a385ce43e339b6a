use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tokio::time::sleep;
use tracing::{debug, info, warn};

use delve_core::{
    extract_largest_json, strip_reasoning_markup, DelveError, Directive, ReasoningEffort,
    ReasoningModel, ToolCall, ToolRecord,
};
use delve_prompt::{investigation_template, render_round_prompt, PromptTemplate};

use crate::{AgentEvent, EventSink, ToolRegistry, Workspace};

/// Knobs for the loop's pacing and resilience.
#[derive(Clone, Debug)]
pub struct AgentConfig {
    /// Wait before every round, to respect provider rate limits.
    pub round_delay: Duration,
    /// Backoff after a failed round before the same round is retried.
    pub failure_backoff: Duration,
    /// Bound on consecutive failed attempts of one round. `None` retries
    /// forever; setting a bound makes a persistently broken model endpoint
    /// a terminal condition instead of an infinite retry.
    pub max_round_failures: Option<u32>,
    pub reasoning_effort: ReasoningEffort,
    /// Date stamped into every prompt.
    pub current_date: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            round_delay: Duration::from_secs(20),
            failure_backoff: Duration::from_secs(10),
            max_round_failures: None,
            reasoning_effort: ReasoningEffort::Low,
            current_date: Utc::now().format("%Y-%m-%d").to_string(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct RunOptions {
    /// `false` runs exactly one round regardless of status.
    pub single_round: bool,
    pub max_rounds: Option<u32>,
}

impl RunOptions {
    /// Loop until the workspace reports done or `max_rounds` is reached.
    pub fn looping(max_rounds: Option<u32>) -> Self {
        Self {
            single_round: false,
            max_rounds,
        }
    }

    /// Run one round and stop, whatever the resulting status.
    pub fn once() -> Self {
        Self {
            single_round: true,
            max_rounds: None,
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub enum StopReason {
    Done,
    RoundLimitReached,
    NonLooping,
    FailureLimitReached,
}

/// What the loop produced: why it stopped, how many rounds were applied, and
/// the answer when the task finished.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct RunReport {
    pub stop: StopReason,
    pub rounds: u32,
    pub answer: Option<String>,
}

/// The deep-search control loop. Each round renders a prompt from the task,
/// the workspace text and the previous round's tool records, asks the model
/// for a directive, applies memory mutations, then fans the requested tool
/// calls out concurrently. Tool records live exactly one round: whatever the
/// model wants to keep it must copy into a memory block.
pub struct Agent<M> {
    task: String,
    template: PromptTemplate,
    model: M,
    tools: ToolRegistry,
    config: AgentConfig,
    workspace: Workspace,
    tool_records: Vec<ToolRecord>,
    round: u32,
    sink: Option<Arc<dyn EventSink>>,
}

impl<M: ReasoningModel> Agent<M> {
    pub fn new(task: impl Into<String>, model: M, tools: ToolRegistry) -> Self {
        Self {
            task: task.into(),
            template: investigation_template(),
            model,
            tools,
            config: AgentConfig::default(),
            workspace: Workspace::new(),
            tool_records: Vec::new(),
            round: 0,
            sink: None,
        }
    }

    pub fn with_template(mut self, template: PromptTemplate) -> Self {
        self.template = template;
        self
    }

    pub fn with_config(mut self, config: AgentConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Seeds the workspace before the first round, e.g. from a persisted
    /// summary when continuing an earlier search.
    pub fn with_seeded_workspace(mut self, workspace: Workspace) -> Self {
        self.workspace = workspace;
        self
    }

    pub fn task(&self) -> &str {
        &self.task
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn tool_records(&self) -> &[ToolRecord] {
        &self.tool_records
    }

    pub fn rounds(&self) -> u32 {
        self.round
    }

    /// Runs the loop to one of its terminal states. Transient failures in
    /// prompt rendering, model invocation or parsing abort only the current
    /// attempt: the workspace and the previous round's records are left
    /// untouched and the same round is retried after a backoff.
    pub async fn run(&mut self, options: RunOptions) -> RunReport {
        let mut failed_attempts: u32 = 0;

        loop {
            sleep(self.config.round_delay).await;

            match self.attempt_round().await {
                Ok(records) => {
                    failed_attempts = 0;
                    self.tool_records = records;
                    self.round += 1;
                    info!(round = self.round, status = %self.workspace.status(), "round applied");
                    self.emit(AgentEvent::RoundCompleted {
                        round: self.round,
                        timestamp: Utc::now(),
                        workspace: self.workspace.clone(),
                        records: self.tool_records.clone(),
                    });
                }
                Err(err) => {
                    failed_attempts += 1;
                    warn!(round = self.round + 1, attempt = failed_attempts, error = %err, "round failed");
                    self.emit(AgentEvent::RoundFailed {
                        round: self.round + 1,
                        attempt: failed_attempts,
                        error: err.to_string(),
                    });
                    if let Some(max) = self.config.max_round_failures {
                        if failed_attempts >= max {
                            return self.finish(StopReason::FailureLimitReached);
                        }
                    }
                    sleep(self.config.failure_backoff).await;
                    continue;
                }
            }

            if let Some(max) = options.max_rounds {
                if self.round >= max {
                    return self.finish(StopReason::RoundLimitReached);
                }
            }
            if options.single_round {
                return self.finish(StopReason::NonLooping);
            }
            if self.workspace.is_done() {
                return self.finish(StopReason::Done);
            }
        }
    }

    /// One round attempt, through tool dispatch. Memory mutations are
    /// applied before any tool runs, so a tool failure cannot lose them;
    /// everything before the mutation step fails the attempt as a whole.
    async fn attempt_round(&mut self) -> Result<Vec<ToolRecord>, DelveError> {
        let prompt = render_round_prompt(
            &self.template,
            &self.config.current_date,
            &self.task,
            &self.workspace.to_text(),
            &self.tool_records,
        )?;
        debug!(prompt_chars = prompt.len(), "rendered round prompt");

        let response = self
            .model
            .generate(&prompt, self.config.reasoning_effort)
            .await?;
        let cleaned = strip_reasoning_markup(&response);
        let Directive {
            status_update,
            memory_updates,
            tool_calls,
            answer,
        } = Directive::from_json(extract_largest_json(&cleaned)?)?;

        self.workspace.update(
            status_update.as_deref(),
            &memory_updates.unwrap_or_default(),
            answer.as_deref(),
        );

        Ok(self.dispatch(tool_calls).await)
    }

    /// Fans the round's tool calls out concurrently and waits for all of
    /// them. A failing call becomes that call's output text rather than an
    /// error, so the model sees the failure next round and can react; the
    /// siblings are unaffected.
    async fn dispatch(&self, calls: Vec<ToolCall>) -> Vec<ToolRecord> {
        let executions = calls.into_iter().map(|call| async move {
            let output = self.run_tool(&call).await;
            ToolRecord::from_call(call, output)
        });
        join_all(executions).await
    }

    async fn run_tool(&self, call: &ToolCall) -> String {
        let Some(tool) = self.tools.get(&call.tool) else {
            warn!(tool = %call.tool, "model requested an unknown tool");
            return format!("Tool execution failed: illegal tool: {}", call.tool);
        };
        match tool.call(&call.input, Some(&self.task)).await {
            Ok(output) => output,
            Err(err) => {
                warn!(tool = %call.tool, error = %err, "tool call failed");
                format!("Tool execution failed: {err}")
            }
        }
    }

    fn finish(&self, stop: StopReason) -> RunReport {
        let answer = if self.workspace.is_done() {
            self.workspace.answer().map(str::to_string)
        } else {
            None
        };
        let report = RunReport {
            stop,
            rounds: self.round,
            answer,
        };
        self.emit(AgentEvent::Finished {
            stop: report.stop,
            rounds: report.rounds,
            answer: report.answer.clone(),
        });
        report
    }

    fn emit(&self, event: AgentEvent) {
        if let Some(sink) = &self.sink {
            sink.on_event(&event);
        }
    }
}
