//! Operational transformation for plain and rich text.
//!
//! A [`TextOperation`] is a list of retain/insert/delete units that turns one
//! revision of a document into the next. Operations support the four OT
//! algorithms:
//!
//! - [`TextOperation::apply`] / [`TextOperation::apply_with_attributes`]
//! - [`TextOperation::invert`]
//! - [`TextOperation::compose`]
//! - [`TextOperation::transform`]
//!
//! Retain and insert units carry per-character formatting [`Attributes`].
//! Lengths and positions count Unicode scalar values.
//!
//! ```rust
//! use ot_text::TextOperation;
//!
//! let op = TextOperation::new().retain(1).delete(1).insert("B").retain(1);
//! assert_eq!(op.apply("abc").unwrap(), "aBc");
//! ```

pub mod attributes;
mod codec;
pub mod cursor;
pub mod error;
pub mod operation;
pub mod random;
pub mod text_op;

pub use attributes::Attributes;
pub use cursor::Cursor;
pub use error::OtError;
pub use operation::TextOperation;
pub use text_op::TextOp;
