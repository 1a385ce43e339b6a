use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use delve_core::BlockOp;

pub const IN_PROGRESS: &str = "IN_PROGRESS";

/// The agent's bounded, mutable knowledge store: a status line, an unordered
/// collection of uniquely-keyed memory blocks and the answer once one
/// exists. Serializable so collaborators can persist a snapshot and seed a
/// later agent from it.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Workspace {
    status: String,
    blocks: BTreeMap<String, String>,
    answer: Option<String>,
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new()
    }
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            status: IN_PROGRESS.to_string(),
            blocks: BTreeMap::new(),
            answer: None,
        }
    }

    /// Renders the workspace in the exact shape embedded in the prompt. This
    /// is the model's only view of its own memory; the ids printed here are
    /// the ids it will reference in delete operations, so the format must
    /// stay stable across rounds.
    pub fn to_text(&self) -> String {
        let mut text = format!("Status: {}\nMemory: \n", self.status);
        if self.blocks.is_empty() {
            text.push_str("... no memory blocks ...\n");
        } else {
            for (id, content) in &self.blocks {
                text.push_str(&format!("<{id}>{content}</{id}>\n"));
            }
        }
        text
    }

    /// Applies one round's mutations: the status update (defaulting to
    /// IN_PROGRESS when the model omitted it), the block operations in
    /// order, and the answer when one was supplied. Deleting an unknown id
    /// is a no-op; unrecognized operations are skipped.
    pub fn update(&mut self, status: Option<&str>, ops: &[BlockOp], answer: Option<&str>) {
        self.status = status.unwrap_or(IN_PROGRESS).to_string();

        for op in ops {
            match op.operation.as_str() {
                "add" => {
                    let id = self.generate_block_id();
                    self.blocks
                        .insert(id, op.content.clone().unwrap_or_default());
                }
                "delete" => {
                    if let Some(id) = &op.id {
                        self.blocks.remove(id);
                    }
                }
                _ => {}
            }
        }

        if let Some(answer) = answer {
            self.answer = Some(answer.to_string());
        }
    }

    /// Anything other than IN_PROGRESS counts as done. Permissive on
    /// purpose: a model that reports `COMPLETE` (or typos the status) ends
    /// the loop instead of spinning forever, and the verbatim status stays
    /// visible to collaborators.
    pub fn is_done(&self) -> bool {
        self.status != IN_PROGRESS
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn answer(&self) -> Option<&str> {
        self.answer.as_deref()
    }

    pub fn blocks(&self) -> &BTreeMap<String, String> {
        &self.blocks
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Inserts a block under a caller-chosen id, replacing any existing
    /// content. Used to re-hydrate a workspace from a persisted snapshot.
    pub fn restore_block(&mut self, id: impl Into<String>, content: impl Into<String>) {
        self.blocks.insert(id.into(), content.into());
    }

    /// Generates a fresh `abc-123`-style id, unique within this workspace.
    fn generate_block_id(&self) -> String {
        let mut rng = rand::thread_rng();
        loop {
            let letters: String = (0..3).map(|_| rng.gen_range(b'a'..=b'z') as char).collect();
            let digits: String = (0..3).map(|_| rng.gen_range(b'0'..=b'9') as char).collect();
            let id = format!("{letters}-{digits}");
            if !self.blocks.contains_key(&id) {
                return id;
            }
        }
    }
}
