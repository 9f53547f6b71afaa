//! Transformation of concurrent operations: the heart of OT.

use std::cmp::Ordering;

use super::TextOperation;
use crate::attributes::{transform_attributes, Attributes};
use crate::error::OtError;
use crate::text_op::{char_len, TextOp};

impl TextOperation {
    /// Transforms two concurrent operations `a` and `b` over the same base.
    ///
    /// Returns `(a', b')` such that `a.compose(b') == b.compose(a')`. When
    /// both sides insert at the same position, `a`'s insert goes first. When
    /// both sides set the same attribute to different values, `a`'s value
    /// wins.
    pub fn transform(
        a: &TextOperation,
        b: &TextOperation,
    ) -> Result<(TextOperation, TextOperation), OtError> {
        if a.base_length != b.base_length {
            return Err(OtError::IncompatibleBaseLength {
                left: a.base_length,
                right: b.base_length,
            });
        }

        let mut a_prime = TextOperation::new();
        let mut b_prime = TextOperation::new();
        let mut iter1 = a.ops.iter().cloned();
        let mut iter2 = b.ops.iter().cloned();
        let mut op1 = iter1.next();
        let mut op2 = iter2.next();

        loop {
            // Both imaginary cursors sit at the same position of the input here.
            let (c1, c2) = match (op1.take(), op2.take()) {
                (None, None) => break,
                (Some(TextOp::Insert(text, attributes)), c2) => {
                    b_prime.push_retain(char_len(&text), Attributes::new());
                    a_prime.push_insert(&text, attributes);
                    op1 = iter1.next();
                    op2 = c2;
                    continue;
                }
                (c1, Some(TextOp::Insert(text, attributes))) => {
                    a_prime.push_retain(char_len(&text), Attributes::new());
                    b_prime.push_insert(&text, attributes);
                    op1 = c1;
                    op2 = iter2.next();
                    continue;
                }
                (None, Some(_)) => return Err(OtError::SourceTooShort),
                (Some(_), None) => return Err(OtError::SourceTooLong),
                (Some(c1), Some(c2)) => (c1, c2),
            };

            let (n, m) = (c1.src_len(), c2.src_len());
            let min = n.min(m);
            match (&c1, &c2) {
                (TextOp::Retain(_, a1), TextOp::Retain(_, a2)) => {
                    let (p1, p2) = transform_attributes(a1, a2);
                    a_prime.push_retain(min, p1);
                    b_prime.push_retain(min, p2);
                }
                // Both deleted the same span: nothing left to do on either side.
                (TextOp::Delete(_), TextOp::Delete(_)) => {}
                (TextOp::Delete(_), TextOp::Retain(..)) => a_prime.push_delete(min),
                (TextOp::Retain(..), TextOp::Delete(_)) => b_prime.push_delete(min),
                _ => return Err(OtError::Incompatible),
            }

            match n.cmp(&m) {
                Ordering::Greater => {
                    op1 = Some(shorten(c1, min));
                    op2 = iter2.next();
                }
                Ordering::Equal => {
                    op1 = iter1.next();
                    op2 = iter2.next();
                }
                Ordering::Less => {
                    op1 = iter1.next();
                    op2 = Some(shorten(c2, min));
                }
            }
        }
        Ok((a_prime, b_prime))
    }
}

/// Drops the first `by` source chars of a retain or delete.
fn shorten(op: TextOp, by: usize) -> TextOp {
    match op {
        TextOp::Retain(n, attributes) => TextOp::Retain(n - by, attributes),
        TextOp::Delete(n) => TextOp::Delete(n - by),
        insert @ TextOp::Insert(..) => insert,
    }
}
