//! A single retain/insert/delete unit of a [`TextOperation`](crate::TextOperation).

use crate::attributes::Attributes;

#[derive(Debug, Clone, PartialEq)]
pub enum TextOp {
    /// Skip `n` characters, applying attribute overrides to them.
    Retain(usize, Attributes),
    /// Insert text carrying the given attributes.
    Insert(String, Attributes),
    /// Remove the next `n` characters.
    Delete(usize),
}

impl TextOp {
    pub fn is_retain(&self) -> bool {
        matches!(self, TextOp::Retain(..))
    }

    pub fn is_insert(&self) -> bool {
        matches!(self, TextOp::Insert(..))
    }

    pub fn is_delete(&self) -> bool {
        matches!(self, TextOp::Delete(_))
    }

    /// Length of this unit (in chars) on the *source* string.
    pub fn src_len(&self) -> usize {
        match self {
            TextOp::Retain(n, _) => *n,
            TextOp::Insert(..) => 0,
            TextOp::Delete(n) => *n,
        }
    }

    /// Length of this unit (in chars) on the *destination* string.
    pub fn dst_len(&self) -> usize {
        match self {
            TextOp::Retain(n, _) => *n,
            TextOp::Insert(text, _) => char_len(text),
            TextOp::Delete(_) => 0,
        }
    }

    /// Attributes of a retain or insert; deletes carry none.
    pub fn attributes(&self) -> Option<&Attributes> {
        match self {
            TextOp::Retain(_, attributes) | TextOp::Insert(_, attributes) => Some(attributes),
            TextOp::Delete(_) => None,
        }
    }

    pub fn has_empty_attributes(&self) -> bool {
        self.attributes().map_or(true, Attributes::is_empty)
    }
}

pub(crate) fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Splits `s` after its first `n` chars.
pub(crate) fn split_chars(s: &str, n: usize) -> (String, String) {
    let at = s.char_indices().nth(n).map_or(s.len(), |(i, _)| i);
    (s[..at].to_string(), s[at..].to_string())
}
