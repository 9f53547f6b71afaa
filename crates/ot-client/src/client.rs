//! Client side of the synchronization protocol.
//!
//! A client has at most one operation in flight to the server (the
//! outstanding operation) and composes further local edits into a buffer
//! until that one is acknowledged. Operations arriving from the server are
//! transformed past both so they can be applied to the local document.
//!
//! State changes are computed by [`ClientState`] as pure functions that
//! return the next state plus the [`Command`] the caller has to carry out.
//! [`Client`] adds the revision bookkeeping on top.

use ot_text::{Cursor, TextOperation};
use tracing::debug;

use crate::error::ClientError;

/// Server-assigned position of an operation in the document history.
pub type Revision = usize;

/// Side effect requested by a state transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Transmit `operation` to the server, based on `revision`.
    Send {
        revision: Revision,
        operation: TextOperation,
    },
    /// Apply a transformed remote operation to the local document.
    Apply(TextOperation),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum ClientState {
    /// Nothing in flight.
    #[default]
    Synchronized,
    /// One operation sent, not yet acknowledged.
    AwaitingConfirm { outstanding: TextOperation },
    /// One operation in flight, later local edits held back.
    AwaitingWithBuffer {
        outstanding: TextOperation,
        buffer: TextOperation,
    },
}

impl ClientState {
    pub fn name(&self) -> &'static str {
        match self {
            ClientState::Synchronized => "synchronized",
            ClientState::AwaitingConfirm { .. } => "awaiting_confirm",
            ClientState::AwaitingWithBuffer { .. } => "awaiting_with_buffer",
        }
    }

    pub fn outstanding(&self) -> Option<&TextOperation> {
        match self {
            ClientState::Synchronized => None,
            ClientState::AwaitingConfirm { outstanding }
            | ClientState::AwaitingWithBuffer { outstanding, .. } => Some(outstanding),
        }
    }

    pub fn buffer(&self) -> Option<&TextOperation> {
        match self {
            ClientState::AwaitingWithBuffer { buffer, .. } => Some(buffer),
            _ => None,
        }
    }

    /// A local edit was made on top of `revision`.
    pub fn apply_client(
        &self,
        revision: Revision,
        operation: TextOperation,
    ) -> Result<(ClientState, Option<Command>), ClientError> {
        Ok(match self {
            ClientState::Synchronized => (
                ClientState::AwaitingConfirm {
                    outstanding: operation.clone(),
                },
                Some(Command::Send {
                    revision,
                    operation,
                }),
            ),
            ClientState::AwaitingConfirm { outstanding } => (
                ClientState::AwaitingWithBuffer {
                    outstanding: outstanding.clone(),
                    buffer: operation,
                },
                None,
            ),
            ClientState::AwaitingWithBuffer {
                outstanding,
                buffer,
            } => (
                ClientState::AwaitingWithBuffer {
                    outstanding: outstanding.clone(),
                    buffer: buffer.compose(&operation)?,
                },
                None,
            ),
        })
    }

    /// An operation from another client arrived.
    pub fn apply_server(
        &self,
        operation: TextOperation,
    ) -> Result<(ClientState, Command), ClientError> {
        Ok(match self {
            ClientState::Synchronized => (ClientState::Synchronized, Command::Apply(operation)),
            ClientState::AwaitingConfirm { outstanding } => {
                let (outstanding, applied) = TextOperation::transform(outstanding, &operation)?;
                (
                    ClientState::AwaitingConfirm { outstanding },
                    Command::Apply(applied),
                )
            }
            ClientState::AwaitingWithBuffer {
                outstanding,
                buffer,
            } => {
                let (outstanding, remote) = TextOperation::transform(outstanding, &operation)?;
                let (buffer, applied) = TextOperation::transform(buffer, &remote)?;
                (
                    ClientState::AwaitingWithBuffer {
                        outstanding,
                        buffer,
                    },
                    Command::Apply(applied),
                )
            }
        })
    }

    /// The server acknowledged the outstanding operation. `revision` is the
    /// revision after the acknowledged operation.
    pub fn server_ack(
        &self,
        revision: Revision,
    ) -> Result<(ClientState, Option<Command>), ClientError> {
        match self {
            ClientState::Synchronized => Err(ClientError::NoOutstandingOperation),
            ClientState::AwaitingConfirm { .. } => Ok((ClientState::Synchronized, None)),
            ClientState::AwaitingWithBuffer { buffer, .. } => Ok((
                ClientState::AwaitingConfirm {
                    outstanding: buffer.clone(),
                },
                Some(Command::Send {
                    revision,
                    operation: buffer.clone(),
                }),
            )),
        }
    }

    /// After a reconnect the outstanding operation is sent again.
    pub fn resend(&self, revision: Revision) -> Option<Command> {
        self.outstanding().map(|outstanding| Command::Send {
            revision,
            operation: outstanding.clone(),
        })
    }

    /// Maps a cursor from the latest server revision into the local
    /// document, which has the pending local edits on top.
    pub fn transform_cursor(&self, cursor: Cursor) -> Cursor {
        match self {
            ClientState::Synchronized => cursor,
            ClientState::AwaitingConfirm { outstanding } => cursor.transform(outstanding),
            ClientState::AwaitingWithBuffer {
                outstanding,
                buffer,
            } => cursor.transform(outstanding).transform(buffer),
        }
    }
}

// ── Client ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Client {
    revision: Revision,
    state: ClientState,
}

impl Client {
    /// A synchronized client whose document is at `revision`.
    pub fn new(revision: Revision) -> Self {
        Self {
            revision,
            state: ClientState::Synchronized,
        }
    }

    /// Next revision expected from the server.
    pub fn revision(&self) -> Revision {
        self.revision
    }

    pub fn state(&self) -> &ClientState {
        &self.state
    }

    pub fn apply_client(&mut self, operation: TextOperation) -> Result<Option<Command>, ClientError> {
        let (state, command) = self.state.apply_client(self.revision, operation)?;
        self.transition(state, "local operation");
        Ok(command)
    }

    pub fn apply_server(&mut self, operation: TextOperation) -> Result<Command, ClientError> {
        let (state, command) = self.state.apply_server(operation)?;
        self.revision += 1;
        self.transition(state, "remote operation");
        Ok(command)
    }

    /// Like [`Client::apply_server`], but the revision and state only advance
    /// once `execute` has carried out the resulting command. If it fails the
    /// client is left as it was.
    pub fn apply_server_with<F>(&mut self, operation: TextOperation, execute: F) -> Result<(), ClientError>
    where
        F: FnOnce(Command) -> Result<(), ClientError>,
    {
        let (state, command) = self.state.apply_server(operation)?;
        execute(command)?;
        self.revision += 1;
        self.transition(state, "remote operation");
        Ok(())
    }

    pub fn server_ack(&mut self) -> Result<Option<Command>, ClientError> {
        let (state, command) = self.state.server_ack(self.revision + 1)?;
        self.revision += 1;
        debug!(revision = self.revision, "server acknowledged operation");
        self.transition(state, "ack");
        Ok(command)
    }

    pub fn resend(&self) -> Option<Command> {
        let command = self.state.resend(self.revision);
        if command.is_some() {
            debug!(revision = self.revision, "resending outstanding operation");
        }
        command
    }

    pub fn transform_cursor(&self, cursor: Cursor) -> Cursor {
        self.state.transform_cursor(cursor)
    }

    fn transition(&mut self, state: ClientState, event: &'static str) {
        if state.name() != self.state.name() {
            debug!(
                revision = self.revision,
                from = self.state.name(),
                to = state.name(),
                event,
                "client state change"
            );
        }
        self.state = state;
    }
}
