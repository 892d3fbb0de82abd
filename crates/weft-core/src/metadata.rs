use serde::{Deserialize, Serialize};

/// Advisory flags attached to a loop's back edge.
///
/// Later passes read these to leave the loop alone; nothing in this crate acts on them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct LoopHints {
    pub prevent_unrolling: bool,
    pub prevent_vectorization: bool,
}

impl LoopHints {
    pub fn new(prevent_unrolling: bool, prevent_vectorization: bool) -> Self {
        Self {
            prevent_unrolling,
            prevent_vectorization,
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.prevent_unrolling && !self.prevent_vectorization
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
