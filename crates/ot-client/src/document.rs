//! In-memory [`DocumentAdapter`].

use indexmap::IndexMap;
use ot_text::{Attributes, Cursor, TextOperation};

use crate::adapter::DocumentAdapter;
use crate::editor::EditorEvent;
use crate::error::ClientError;

/// A remote cursor as displayed in a [`TextDocument`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtherCursor {
    pub cursor: Cursor,
    pub color: String,
}

/// Plain text with per-char formatting, a local cursor and the cursors of
/// other participants. Remote operations move the local cursor along.
#[derive(Debug, Clone, PartialEq)]
pub struct TextDocument {
    text: String,
    attributes: Vec<Attributes>,
    cursor: Cursor,
    others: IndexMap<String, OtherCursor>,
}

impl TextDocument {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let attributes = vec![Attributes::new(); text.chars().count()];
        Self {
            text,
            attributes,
            cursor: Cursor::caret(0),
            others: IndexMap::new(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn attributes(&self) -> &[Attributes] {
        &self.attributes
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Remote cursors in the order they were first shown.
    pub fn other_cursors(&self) -> &IndexMap<String, OtherCursor> {
        &self.others
    }

    /// Performs a local edit and returns the change event to hand to the
    /// editor client. The local cursor is set to `cursor`.
    pub fn edit(&mut self, operation: TextOperation, cursor: Cursor) -> Result<EditorEvent, ClientError> {
        let old_value = self.text.clone();
        self.apply(&operation)?;
        self.cursor = cursor;
        Ok(EditorEvent::Change {
            old_value,
            operation,
        })
    }

    fn apply(&mut self, operation: &TextOperation) -> Result<(), ClientError> {
        let (text, attributes) = operation.apply_with_attributes(&self.text, &self.attributes)?;
        self.text = text;
        self.attributes = attributes;
        Ok(())
    }
}

impl DocumentAdapter for TextDocument {
    fn apply_operation(&mut self, operation: &TextOperation) -> Result<(), ClientError> {
        self.apply(operation)?;
        self.cursor = self.cursor.transform(operation);
        for other in self.others.values_mut() {
            other.cursor = other.cursor.transform(operation);
        }
        Ok(())
    }

    fn get_value(&self) -> String {
        self.text.clone()
    }

    fn get_cursor(&self) -> Cursor {
        self.cursor
    }

    fn set_cursor(&mut self, cursor: Cursor) {
        self.cursor = cursor;
    }

    fn set_other_cursor(&mut self, client_id: &str, cursor: Cursor, color: &str) {
        self.others.insert(
            client_id.to_string(),
            OtherCursor {
                cursor,
                color: color.to_string(),
            },
        );
    }

    fn remove_other_cursor(&mut self, client_id: &str) {
        self.others.shift_remove(client_id);
    }
}
