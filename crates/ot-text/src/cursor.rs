//! Cursor and selection positions.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::OtError;
use crate::operation::TextOperation;
use crate::text_op::TextOp;

/// A caret with an optional selection, as zero-based char indexes.
///
/// `position` is the end that moves on an arrow key press; `selection_end`
/// is the other end and equals `position` when nothing is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cursor {
    pub position: usize,
    pub selection_end: usize,
}

impl Cursor {
    pub fn new(position: usize, selection_end: usize) -> Self {
        Self {
            position,
            selection_end,
        }
    }

    /// A cursor without selection.
    pub fn caret(position: usize) -> Self {
        Self::new(position, position)
    }

    pub fn has_selection(&self) -> bool {
        self.position != self.selection_end
    }

    /// Of two cursor updates, the later one wins.
    pub fn compose(&self, other: &Cursor) -> Cursor {
        *other
    }

    /// Moves the cursor through `operation`.
    pub fn transform(&self, operation: &TextOperation) -> Cursor {
        let position = transform_index(self.position, operation);
        if !self.has_selection() {
            return Cursor::caret(position);
        }
        Cursor::new(position, transform_index(self.selection_end, operation))
    }

    pub fn from_json(value: &Value) -> Result<Self, OtError> {
        Ok(serde_json::from_value(value.clone())?)
    }

    pub fn to_json(&self) -> Value {
        serde_json::json!({
            "position": self.position,
            "selectionEnd": self.selection_end,
        })
    }
}

fn transform_index(index: usize, operation: &TextOperation) -> usize {
    let mut budget = index as isize;
    let mut new_index = index as isize;
    for op in operation.ops() {
        match op {
            TextOp::Retain(n, _) => budget -= *n as isize,
            TextOp::Insert(..) => new_index += op.dst_len() as isize,
            TextOp::Delete(n) => {
                new_index -= budget.min(*n as isize);
                budget -= *n as isize;
            }
        }
        if budget < 0 {
            break;
        }
    }
    new_index.max(0) as usize
}
