//! Metadata carried alongside an operation.
//!
//! Each capability is optional. A metadata type that does not implement one
//! keeps the default: inverting and transforming leave it untouched, composing
//! keeps the newer value.

use ot_text::{Cursor, TextOperation};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ClientError;

pub trait Meta: Clone {
    /// Metadata for the inverse operation. `None` keeps `self`.
    fn invert(&self) -> Option<Self> {
        None
    }

    /// Metadata for `self` followed by `next`. `None` keeps `next`.
    fn compose(&self, _next: &Self) -> Option<Self> {
        None
    }

    /// Metadata moved through a concurrent operation. `None` keeps `self`.
    fn transform(&self, _operation: &TextOperation) -> Option<Self> {
        None
    }
}

impl Meta for () {}

/// Plain records: composing merges the keys of both, the newer value winning.
impl Meta for Value {
    fn compose(&self, next: &Self) -> Option<Self> {
        let mut merged = self.as_object()?.clone();
        if let Value::Object(next) = next {
            for (key, value) in next {
                merged.insert(key.clone(), value.clone());
            }
        }
        Some(Value::Object(merged))
    }
}

impl Meta for Cursor {
    fn compose(&self, next: &Self) -> Option<Self> {
        Some(Cursor::compose(self, next))
    }

    fn transform(&self, operation: &TextOperation) -> Option<Self> {
        Some(Cursor::transform(self, operation))
    }
}

// ── SelfMeta ──────────────────────────────────────────────────────────────

/// Local cursor before and after one of our own edits. Stored with every
/// undo entry so undo and redo can restore the selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelfMeta {
    pub cursor_before: Option<Cursor>,
    pub cursor_after: Option<Cursor>,
}

impl SelfMeta {
    pub fn new(cursor_before: Option<Cursor>, cursor_after: Option<Cursor>) -> Self {
        Self {
            cursor_before,
            cursor_after,
        }
    }
}

impl Meta for SelfMeta {
    fn invert(&self) -> Option<Self> {
        Some(SelfMeta::new(self.cursor_after, self.cursor_before))
    }

    fn compose(&self, next: &Self) -> Option<Self> {
        Some(SelfMeta::new(self.cursor_before, next.cursor_after))
    }

    fn transform(&self, operation: &TextOperation) -> Option<Self> {
        Some(SelfMeta::new(
            self.cursor_before.map(|c| c.transform(operation)),
            self.cursor_after.map(|c| c.transform(operation)),
        ))
    }
}

// ── OtherMeta ─────────────────────────────────────────────────────────────

/// Author and cursor attached to an operation from another client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OtherMeta {
    pub client_id: String,
    #[serde(default)]
    pub cursor: Option<Cursor>,
}

impl OtherMeta {
    pub fn new(client_id: impl Into<String>, cursor: Option<Cursor>) -> Self {
        Self {
            client_id: client_id.into(),
            cursor,
        }
    }

    pub fn from_json(value: &Value) -> Result<Self, ClientError> {
        serde_json::from_value(value.clone()).map_err(|e| ClientError::Operation(e.into()))
    }
}

impl Meta for OtherMeta {
    fn transform(&self, operation: &TextOperation) -> Option<Self> {
        Some(OtherMeta::new(
            self.client_id.clone(),
            self.cursor.map(|c| c.transform(operation)),
        ))
    }
}
