//! Composition of consecutive operations.

use std::cmp::Ordering;

use super::TextOperation;
use crate::attributes::compose_attributes;
use crate::error::OtError;
use crate::text_op::{split_chars, TextOp};

impl TextOperation {
    /// Merges this operation and `other`, applied after it, into one.
    ///
    /// For every string `s` the result satisfies
    /// `apply(apply(s, self), other) == apply(s, self.compose(other))`.
    pub fn compose(&self, other: &TextOperation) -> Result<TextOperation, OtError> {
        if self.target_length != other.base_length {
            return Err(OtError::IncompatibleLengths {
                target: self.target_length,
                base: other.base_length,
            });
        }

        let mut result = TextOperation::new();
        let mut iter1 = self.ops.iter().cloned();
        let mut iter2 = other.ops.iter().cloned();
        let mut op1 = iter1.next();
        let mut op2 = iter2.next();

        loop {
            let (c1, c2) = match (op1.take(), op2.take()) {
                (None, None) => break,
                // Deletes of the first operation don't interact with the second.
                (Some(TextOp::Delete(n)), c2) => {
                    result.push_delete(n);
                    op1 = iter1.next();
                    op2 = c2;
                    continue;
                }
                // Inserts of the second operation don't care what came before.
                (c1, Some(TextOp::Insert(text, attributes))) => {
                    result.push_insert(&text, attributes);
                    op1 = c1;
                    op2 = iter2.next();
                    continue;
                }
                (None, Some(_)) => return Err(OtError::SourceTooShort),
                (Some(_), None) => return Err(OtError::SourceTooLong),
                (Some(c1), Some(c2)) => (c1, c2),
            };

            match (c1, c2) {
                (TextOp::Retain(n, a1), TextOp::Retain(m, a2)) => {
                    let attributes = compose_attributes(&a1, &a2, false);
                    match n.cmp(&m) {
                        Ordering::Greater => {
                            result.push_retain(m, attributes);
                            op1 = Some(TextOp::Retain(n - m, a1));
                            op2 = iter2.next();
                        }
                        Ordering::Equal => {
                            result.push_retain(n, attributes);
                            op1 = iter1.next();
                            op2 = iter2.next();
                        }
                        Ordering::Less => {
                            result.push_retain(n, attributes);
                            op1 = iter1.next();
                            op2 = Some(TextOp::Retain(m - n, a2));
                        }
                    }
                }
                // Inserted and then deleted: nothing survives.
                (TextOp::Insert(text, a1), TextOp::Delete(m)) => {
                    let len = text.chars().count();
                    match len.cmp(&m) {
                        Ordering::Greater => {
                            let (_, rest) = split_chars(&text, m);
                            op1 = Some(TextOp::Insert(rest, a1));
                            op2 = iter2.next();
                        }
                        Ordering::Equal => {
                            op1 = iter1.next();
                            op2 = iter2.next();
                        }
                        Ordering::Less => {
                            op1 = iter1.next();
                            op2 = Some(TextOp::Delete(m - len));
                        }
                    }
                }
                (TextOp::Insert(text, a1), TextOp::Retain(m, a2)) => {
                    let attributes = compose_attributes(&a1, &a2, true);
                    let len = text.chars().count();
                    match len.cmp(&m) {
                        Ordering::Greater => {
                            let (head, rest) = split_chars(&text, m);
                            result.push_insert(&head, attributes);
                            op1 = Some(TextOp::Insert(rest, a1));
                            op2 = iter2.next();
                        }
                        Ordering::Equal => {
                            result.push_insert(&text, attributes);
                            op1 = iter1.next();
                            op2 = iter2.next();
                        }
                        Ordering::Less => {
                            result.push_insert(&text, attributes);
                            op1 = iter1.next();
                            op2 = Some(TextOp::Retain(m - len, a2));
                        }
                    }
                }
                (TextOp::Retain(n, a1), TextOp::Delete(m)) => match n.cmp(&m) {
                    Ordering::Greater => {
                        result.push_delete(m);
                        op1 = Some(TextOp::Retain(n - m, a1));
                        op2 = iter2.next();
                    }
                    Ordering::Equal => {
                        result.push_delete(m);
                        op1 = iter1.next();
                        op2 = iter2.next();
                    }
                    Ordering::Less => {
                        result.push_delete(n);
                        op1 = iter1.next();
                        op2 = Some(TextOp::Delete(m - n));
                    }
                },
                _ => return Err(OtError::Incompatible),
            }
        }
        Ok(result)
    }
}
