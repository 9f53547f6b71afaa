//! Error type shared by every text operation algorithm.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OtError {
    #[error("the operation's base length ({expected}) must equal the string's length ({actual})")]
    LengthMismatch { expected: usize, actual: usize },
    #[error("operation can't retain more characters than are left in the string")]
    RetainOverflow,
    #[error(
        "the base length of the second operation ({base}) has to be the target length of the first operation ({target})"
    )]
    IncompatibleLengths { target: usize, base: usize },
    #[error("both operations have to have the same base length ({left} != {right})")]
    IncompatibleBaseLength { left: usize, right: usize },
    #[error("the two operations aren't compatible")]
    Incompatible,
    #[error("first operation is too short")]
    SourceTooShort,
    #[error("first operation is too long")]
    SourceTooLong,
    #[error("invalid serialized operation: {0}")]
    InvalidSerializedOperation(String),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
