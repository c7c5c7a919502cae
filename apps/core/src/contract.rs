use serde::{Deserialize, Serialize};

use crate::model::Word;

/// What a renderer is shown after every key event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RenderSnapshot {
    pub buffer: String,
    pub candidates: Vec<Word>,
    pub selected_index: usize,
}

impl RenderSnapshot {
    pub fn selected(&self) -> Option<&Word> {
        self.candidates.get(self.selected_index)
    }
}

/// How a session ended, for the JSON front end.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SessionOutcome {
    Launched { program: Word },
    CommittedEmpty,
    Cancelled,
    InputClosed,
}
