use serde::{Deserialize, Serialize};

use crate::undo::DEFAULT_MAX_ITEMS;

/// Settings for an [`EditorClient`](crate::EditorClient).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorClientConfig {
    /// Entries kept on each undo stack.
    pub max_undo_items: usize,
}

impl Default for EditorClientConfig {
    fn default() -> Self {
        Self {
            max_undo_items: DEFAULT_MAX_ITEMS,
        }
    }
}
