//! Collaborative editing on top of [`ot_text`].
//!
//! - [`Client`] tracks the operation in flight to the server and the local
//!   edits buffered behind it.
//! - [`UndoManager`] keeps undo and redo history that survives concurrent
//!   remote edits.
//! - [`WrappedOperation`] carries [`Meta`]data such as cursors alongside an
//!   operation.
//! - [`Server`] is the sequencer that puts all operations in one order.
//! - [`EditorClient`] wires these to a [`DocumentAdapter`] and a
//!   [`ServerAdapter`].
//!
//! ```rust
//! use ot_client::{Client, Command};
//! use ot_text::TextOperation;
//!
//! let mut client = Client::new(0);
//! let edit = TextOperation::new().insert("hi");
//! assert_eq!(
//!     client.apply_client(edit.clone()).unwrap(),
//!     Some(Command::Send { revision: 0, operation: edit }),
//! );
//! // A second edit waits for the first to be acknowledged.
//! assert_eq!(client.apply_client(TextOperation::new().retain(2).insert("!")).unwrap(), None);
//! ```

pub mod adapter;
pub mod client;
pub mod config;
pub mod document;
pub mod editor;
pub mod error;
pub mod meta;
pub mod remote;
pub mod server;
pub mod undo;
pub mod wrapped;

pub use adapter::{DocumentAdapter, ServerAdapter};
pub use client::{Client, ClientState, Command, Revision};
pub use config::EditorClientConfig;
pub use document::TextDocument;
pub use editor::{ClientInfo, EditorClient, EditorEvent, ServerEvent};
pub use error::{ClientError, StackKind};
pub use meta::{Meta, OtherMeta, SelfMeta};
pub use remote::OtherClient;
pub use server::Server;
pub use undo::{UndoManager, UndoState};
pub use wrapped::WrappedOperation;
