//! Boundaries to the editor widget and to the network transport.

use ot_text::{Cursor, TextOperation};

use crate::client::Revision;
use crate::error::ClientError;

/// The live document an [`EditorClient`](crate::EditorClient) keeps in sync.
pub trait DocumentAdapter {
    /// Applies a remote or undo/redo operation to the document.
    fn apply_operation(&mut self, operation: &TextOperation) -> Result<(), ClientError>;

    fn get_value(&self) -> String;

    fn get_cursor(&self) -> Cursor;

    fn set_cursor(&mut self, cursor: Cursor);

    /// Shows the cursor of another participant, replacing any previous one
    /// for `client_id`. `color` is a `#rrggbb` string.
    fn set_other_cursor(&mut self, client_id: &str, cursor: Cursor, color: &str);

    fn remove_other_cursor(&mut self, client_id: &str);
}

/// Outgoing half of the transport.
pub trait ServerAdapter {
    fn send_operation(&mut self, revision: Revision, operation: &TextOperation, cursor: Option<Cursor>);

    /// `None` tells the others that this client lost focus.
    fn send_cursor(&mut self, cursor: Option<Cursor>);
}
