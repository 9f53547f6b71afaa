//! Errors raised by the client side of the protocol.

use ot_text::OtError;
use thiserror::Error;

use crate::client::Revision;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Operation(#[from] OtError),
    #[error("there is no pending operation")]
    NoOutstandingOperation,
    #[error("nothing to {0}")]
    EmptyStack(StackKind),
    #[error("revision {actual} is not known to the server (latest is {expected})")]
    RevisionMismatch { expected: Revision, actual: Revision },
}

/// Which undo manager stack a failed pop was aimed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackKind {
    Undo,
    Redo,
}

impl std::fmt::Display for StackKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StackKind::Undo => f.write_str("undo"),
            StackKind::Redo => f.write_str("redo"),
        }
    }
}
