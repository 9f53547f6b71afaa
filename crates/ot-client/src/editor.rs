//! Editor integration: ties a [`Client`], an undo manager and the two
//! adapters together.
//!
//! The host forwards everything that happens in the editor as an
//! [`EditorEvent`] and everything that arrives from the network as a
//! [`ServerEvent`]. The editor client keeps the undo history in step with
//! remote edits, restores the cursor on undo and redo, and tracks the cursors
//! of the other participants.

use indexmap::IndexMap;
use ot_text::{Cursor, TextOperation};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::adapter::{DocumentAdapter, ServerAdapter};
use crate::client::{Client, ClientState, Command, Revision};
use crate::config::EditorClientConfig;
use crate::error::ClientError;
use crate::meta::SelfMeta;
use crate::remote::OtherClient;
use crate::undo::UndoManager;
use crate::wrapped::WrappedOperation;

// ── Events ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    /// The user edited the document. `old_value` is the text before the edit.
    Change {
        old_value: String,
        operation: TextOperation,
    },
    CursorActivity,
    Blur,
    Undo,
    Redo,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ServerEvent {
    /// Another client's operation, in wire format.
    Operation(Value),
    /// Our outstanding operation was accepted.
    Ack,
    /// Another client moved its cursor. `None` when it lost focus.
    Cursor {
        client_id: String,
        cursor: Option<Value>,
    },
    ClientLeft(String),
    SetName {
        client_id: String,
        name: String,
    },
    Reconnect,
}

/// A participant already present when the session starts.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ClientInfo {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub cursor: Option<Cursor>,
}

// ── EditorClient ──────────────────────────────────────────────────────────

pub struct EditorClient<D, S> {
    client: Client,
    undo_manager: UndoManager<SelfMeta>,
    adapters: Adapters<D, S>,
    clients: IndexMap<String, OtherClient>,
}

struct Adapters<D, S> {
    document: D,
    server: S,
    cursor: Option<Cursor>,
}

impl<D: DocumentAdapter, S: ServerAdapter> EditorClient<D, S> {
    pub fn new(
        revision: Revision,
        clients: IndexMap<String, ClientInfo>,
        server: S,
        document: D,
        config: EditorClientConfig,
    ) -> Self {
        let mut adapters = Adapters {
            document,
            server,
            cursor: None,
        };
        let clients = clients
            .into_iter()
            .map(|(id, info)| {
                let mut other = OtherClient::new(id.clone(), info.name);
                if let Some(cursor) = info.cursor {
                    other.update_cursor(cursor, &mut adapters.document);
                }
                (id, other)
            })
            .collect();
        Self {
            client: Client::new(revision),
            undo_manager: UndoManager::new(config.max_undo_items),
            adapters,
            clients,
        }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn undo_manager(&self) -> &UndoManager<SelfMeta> {
        &self.undo_manager
    }

    pub fn document(&self) -> &D {
        &self.adapters.document
    }

    /// For local edits. Report them through [`EditorEvent::Change`].
    pub fn document_mut(&mut self) -> &mut D {
        &mut self.adapters.document
    }

    pub fn server(&self) -> &S {
        &self.adapters.server
    }

    pub fn server_mut(&mut self) -> &mut S {
        &mut self.adapters.server
    }

    /// Last known local cursor. `None` while the editor is not focused.
    pub fn cursor(&self) -> Option<Cursor> {
        self.adapters.cursor
    }

    /// Other participants in join order.
    pub fn clients(&self) -> &IndexMap<String, OtherClient> {
        &self.clients
    }

    pub fn handle_editor_event(&mut self, event: EditorEvent) -> Result<(), ClientError> {
        match event {
            EditorEvent::Change {
                old_value,
                operation,
            } => self.on_change(&old_value, operation),
            EditorEvent::CursorActivity => {
                self.on_cursor_activity();
                Ok(())
            }
            EditorEvent::Blur => {
                self.adapters.cursor = None;
                self.send_cursor(None);
                Ok(())
            }
            EditorEvent::Undo => self.undo(),
            EditorEvent::Redo => self.redo(),
        }
    }

    pub fn handle_server_event(&mut self, event: ServerEvent) -> Result<(), ClientError> {
        match event {
            ServerEvent::Operation(value) => {
                let operation = TextOperation::from_json(&value).map_err(|error| {
                    warn!(%error, "discarding malformed operation from server");
                    error
                })?;
                let Self {
                    client,
                    undo_manager,
                    adapters,
                    ..
                } = self;
                client.apply_server_with(operation, |command| adapters.execute(command, undo_manager))
            }
            ServerEvent::Ack => match self.client.server_ack()? {
                Some(command) => self.adapters.execute(command, &mut self.undo_manager),
                None => Ok(()),
            },
            ServerEvent::Cursor { client_id, cursor } => self.on_remote_cursor(client_id, cursor),
            ServerEvent::ClientLeft(client_id) => {
                debug!(%client_id, "client left");
                if let Some(mut other) = self.clients.shift_remove(&client_id) {
                    other.remove_cursor(&mut self.adapters.document);
                }
                Ok(())
            }
            ServerEvent::SetName { client_id, name } => {
                let other = client_object(&mut self.clients, client_id);
                other.set_name(name);
                if let Some(cursor) = other.cursor {
                    other.update_cursor(cursor, &mut self.adapters.document);
                }
                Ok(())
            }
            ServerEvent::Reconnect => match self.client.resend() {
                Some(command) => self.adapters.execute(command, &mut self.undo_manager),
                None => Ok(()),
            },
        }
    }

    /// Reverts the latest local edit group. Does nothing if there is none.
    pub fn undo(&mut self) -> Result<(), ClientError> {
        if !self.undo_manager.can_undo() {
            return Ok(());
        }
        let Self {
            client,
            undo_manager,
            adapters,
            ..
        } = self;
        undo_manager.perform_undo(|undo, operation| adapters.apply_unredo(client, undo, operation))
    }

    pub fn redo(&mut self) -> Result<(), ClientError> {
        if !self.undo_manager.can_redo() {
            return Ok(());
        }
        let Self {
            client,
            undo_manager,
            adapters,
            ..
        } = self;
        undo_manager.perform_redo(|undo, operation| adapters.apply_unredo(client, undo, operation))
    }

    fn on_change(&mut self, old_value: &str, operation: TextOperation) -> Result<(), ClientError> {
        let cursor_before = self.adapters.cursor;
        self.adapters.update_cursor();
        let meta = SelfMeta::new(cursor_before, self.adapters.cursor);
        // Typing runs and backspace runs collapse into a single undo step.
        let compose = match self.undo_manager.last_undo() {
            Some(last) if !self.undo_manager.dont_compose() => last
                .wrapped
                .invert(old_value)?
                .should_be_composed_with(&operation),
            _ => false,
        };
        let inverse = WrappedOperation::new(operation.clone(), meta).invert(old_value)?;
        self.undo_manager.add(inverse, compose)?;
        if let Some(command) = self.client.apply_client(operation)? {
            self.adapters.execute(command, &mut self.undo_manager)?;
        }
        Ok(())
    }

    fn on_cursor_activity(&mut self) {
        let old_cursor = self.adapters.cursor;
        self.adapters.update_cursor();
        if old_cursor.is_some() && old_cursor == self.adapters.cursor {
            return;
        }
        self.send_cursor(self.adapters.cursor);
    }

    fn on_remote_cursor(&mut self, client_id: String, cursor: Option<Value>) -> Result<(), ClientError> {
        let cursor = cursor
            .map(|value| Cursor::from_json(&value))
            .transpose()
            .map_err(|error| {
                warn!(%client_id, %error, "discarding malformed cursor");
                error
            })?;
        let other = client_object(&mut self.clients, client_id);
        match cursor {
            Some(cursor) => {
                let cursor = self.client.transform_cursor(cursor);
                other.update_cursor(cursor, &mut self.adapters.document);
            }
            None => other.remove_cursor(&mut self.adapters.document),
        }
        Ok(())
    }

    // Held back while a buffer is pending: the position would refer to edits
    // the server has not seen yet.
    fn send_cursor(&mut self, cursor: Option<Cursor>) {
        if matches!(self.client.state(), ClientState::AwaitingWithBuffer { .. }) {
            return;
        }
        self.adapters.server.send_cursor(cursor);
    }
}

fn client_object(clients: &mut IndexMap<String, OtherClient>, client_id: String) -> &mut OtherClient {
    clients.entry(client_id).or_insert_with_key(|id| {
        debug!(client_id = %id, "client joined");
        OtherClient::new(id.clone(), None)
    })
}

impl<D: DocumentAdapter, S: ServerAdapter> Adapters<D, S> {
    fn update_cursor(&mut self) {
        self.cursor = Some(self.document.get_cursor());
    }

    fn execute(&mut self, command: Command, undo: &mut UndoManager<SelfMeta>) -> Result<(), ClientError> {
        match command {
            Command::Send {
                revision,
                operation,
            } => {
                self.server.send_operation(revision, &operation, self.cursor);
                Ok(())
            }
            Command::Apply(operation) => {
                self.document.apply_operation(&operation)?;
                self.update_cursor();
                undo.transform(&operation)
            }
        }
    }

    fn apply_unredo(
        &mut self,
        client: &mut Client,
        undo: &mut UndoManager<SelfMeta>,
        operation: WrappedOperation<SelfMeta>,
    ) -> Result<(), ClientError> {
        undo.add(operation.invert(&self.document.get_value())?, false)?;
        self.document.apply_operation(&operation.wrapped)?;
        self.cursor = operation.meta.cursor_after;
        if let Some(cursor) = self.cursor {
            self.document.set_cursor(cursor);
        }
        match client.apply_client(operation.wrapped)? {
            Some(command) => self.execute(command, undo),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::TextDocument;
    use serde_json::json;
    use tracing_test::traced_test;

    #[derive(Default)]
    struct NullServer {
        sent: usize,
    }

    impl ServerAdapter for NullServer {
        fn send_operation(&mut self, _: Revision, _: &TextOperation, _: Option<Cursor>) {
            self.sent += 1;
        }

        fn send_cursor(&mut self, _: Option<Cursor>) {}
    }

    fn editor(text: &str) -> EditorClient<TextDocument, NullServer> {
        EditorClient::new(
            0,
            IndexMap::new(),
            NullServer::default(),
            TextDocument::new(text),
            EditorClientConfig::default(),
        )
    }

    #[test]
    #[traced_test]
    fn malformed_operation_is_logged_and_rejected() {
        let mut ed = editor("abc");
        let result = ed.handle_server_event(ServerEvent::Operation(json!([1, {"bold": true}])));
        assert!(matches!(result, Err(ClientError::Operation(_))));
        assert_eq!(ed.client().revision(), 0);
        assert!(logs_contain("discarding malformed operation"));
    }

    #[test]
    #[traced_test]
    fn malformed_cursor_is_logged_and_rejected() {
        let mut ed = editor("abc");
        let result = ed.handle_server_event(ServerEvent::Cursor {
            client_id: "7".into(),
            cursor: Some(json!({"position": "x"})),
        });
        assert!(result.is_err());
        assert!(ed.clients().is_empty());
        assert!(logs_contain("discarding malformed cursor"));
    }

    #[test]
    #[traced_test]
    fn state_changes_are_logged() {
        let mut ed = editor("");
        let event = ed
            .document_mut()
            .edit(TextOperation::new().insert("a"), Cursor::caret(1))
            .unwrap();
        ed.handle_editor_event(event).unwrap();
        ed.handle_server_event(ServerEvent::Ack).unwrap();
        assert_eq!(ed.server().sent, 1);
        assert!(logs_contain("client state change"));
        assert!(logs_contain("server acknowledged operation"));
    }

    #[test]
    fn rejected_remote_operation_keeps_revision() {
        let mut ed = editor("abc");
        // The document changes behind the client's back, so the next remote
        // operation no longer fits it.
        ed.document_mut()
            .edit(TextOperation::new().retain(3).insert("d"), Cursor::caret(4))
            .unwrap();
        let result = ed.handle_server_event(ServerEvent::Operation(json!([3, "x"])));
        assert!(matches!(result, Err(ClientError::Operation(_))));
        assert_eq!(ed.client().revision(), 0);
        assert_eq!(ed.client().state(), &ClientState::Synchronized);
        assert_eq!(ed.document().text(), "abcd");
    }

    #[test]
    fn undo_without_history_is_a_noop() {
        let mut ed = editor("abc");
        ed.handle_editor_event(EditorEvent::Undo).unwrap();
        ed.handle_editor_event(EditorEvent::Redo).unwrap();
        assert_eq!(ed.document().text(), "abc");
        assert_eq!(ed.server().sent, 0);
    }
}
