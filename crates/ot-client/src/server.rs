//! Authoritative document and operation history.
//!
//! Clients submit operations against the revision they last saw. The server
//! transforms each one past everything that was accepted since, applies it,
//! and appends it to the history, which defines the total order all clients
//! converge on.

use ot_text::{Attributes, Cursor, TextOperation};
use tracing::debug;

use crate::client::Revision;
use crate::error::ClientError;

#[derive(Debug, Clone, Default)]
pub struct Server {
    document: String,
    attributes: Vec<Attributes>,
    operations: Vec<TextOperation>,
}

impl Server {
    pub fn new(document: impl Into<String>) -> Self {
        let document = document.into();
        let attributes = vec![Attributes::new(); document.chars().count()];
        Self {
            document,
            attributes,
            operations: Vec::new(),
        }
    }

    pub fn document(&self) -> &str {
        &self.document
    }

    /// Formatting of each char of the document.
    pub fn attributes(&self) -> &[Attributes] {
        &self.attributes
    }

    /// Accepted operations, oldest first.
    pub fn operations(&self) -> &[TextOperation] {
        &self.operations
    }

    /// Number of accepted operations.
    pub fn revision(&self) -> Revision {
        self.operations.len()
    }

    /// Accepts `operation` made on top of `revision` and returns it as
    /// applied to the current document, ready to broadcast.
    pub fn receive_operation(
        &mut self,
        revision: Revision,
        operation: TextOperation,
    ) -> Result<TextOperation, ClientError> {
        let concurrent = self.since(revision)?;
        let mut operation = operation;
        for other in concurrent {
            operation = TextOperation::transform(&operation, other)?.0;
        }
        let (document, attributes) =
            operation.apply_with_attributes(&self.document, &self.attributes)?;
        self.document = document;
        self.attributes = attributes;
        self.operations.push(operation.clone());
        debug!(
            base = revision,
            revision = self.revision(),
            concurrent = self.revision() - 1 - revision,
            "accepted operation"
        );
        Ok(operation)
    }

    /// Maps a cursor reported at `revision` into the current document.
    pub fn transform_cursor(&self, revision: Revision, cursor: Cursor) -> Result<Cursor, ClientError> {
        Ok(self
            .since(revision)?
            .iter()
            .fold(cursor, |cursor, operation| cursor.transform(operation)))
    }

    fn since(&self, revision: Revision) -> Result<&[TextOperation], ClientError> {
        self.operations
            .get(revision..)
            .ok_or(ClientError::RevisionMismatch {
                expected: self.revision(),
                actual: revision,
            })
    }
}
