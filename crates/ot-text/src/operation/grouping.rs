//! Undo grouping heuristic.
//!
//! Ctrl-Z should not undo single keystrokes but the last sentence typed at a
//! stretch, or the text removed by holding backspace down. Composing entries
//! on the undo stack implements that; [`TextOperation::should_be_composed_with`]
//! decides when two edits belong together.

use super::TextOperation;
use crate::text_op::TextOp;

impl TextOperation {
    /// Returns `true` if `self` and the following edit `other` are consecutive
    /// inserts, or both delete text at the same position (backspace or
    /// forward delete). No-ops compose with anything.
    pub fn should_be_composed_with(&self, other: &TextOperation) -> bool {
        if self.is_noop() || other.is_noop() {
            return true;
        }

        let (start_a, start_b) = (start_index(self), start_index(other));
        let (Some(simple_a), Some(simple_b)) = (simple_op(self), simple_op(other)) else {
            return false;
        };

        match (simple_a, simple_b) {
            (TextOp::Insert(..), TextOp::Insert(..)) => start_a + simple_a.dst_len() == start_b,
            (TextOp::Delete(_), TextOp::Delete(n)) => start_b + n == start_a || start_a == start_b,
            _ => false,
        }
    }
}

/// The single interesting unit, ignoring one leading and one trailing retain.
fn simple_op(operation: &TextOperation) -> Option<&TextOp> {
    match operation.ops() {
        [op] => Some(op),
        [first, second] => {
            if first.is_retain() {
                Some(second)
            } else if second.is_retain() {
                Some(first)
            } else {
                None
            }
        }
        [first, middle, last] if first.is_retain() && last.is_retain() => Some(middle),
        _ => None,
    }
}

fn start_index(operation: &TextOperation) -> usize {
    match operation.ops().first() {
        Some(TextOp::Retain(n, _)) => *n,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_composes_with_anything() {
        let a = TextOperation::new().retain(3);
        let b = TextOperation::new().retain(1).insert("tag").retain(2);
        assert!(a.should_be_composed_with(&b));
        assert!(b.should_be_composed_with(&a));
    }

    #[test]
    fn consecutive_inserts() {
        let a = TextOperation::new().retain(1).insert("a").retain(2);
        let b = TextOperation::new().retain(2).insert("b").retain(2);
        assert!(a.should_be_composed_with(&b));
        let a = a.delete(3);
        assert!(!a.should_be_composed_with(&b));
    }

    #[test]
    fn insert_before_previous_insert() {
        let a = TextOperation::new().retain(1).insert("b").retain(2);
        let b = TextOperation::new().retain(1).insert("a").retain(3);
        assert!(!a.should_be_composed_with(&b));
    }

    #[test]
    fn backspace_and_forward_delete() {
        let a = TextOperation::new().retain(4).delete(3).retain(10);
        let b = TextOperation::new().retain(2).delete(2).retain(10);
        assert!(a.should_be_composed_with(&b));
        let b = TextOperation::new().retain(4).delete(7).retain(3);
        assert!(a.should_be_composed_with(&b));
        let b = TextOperation::new().retain(2).delete(9).retain(3);
        assert!(!a.should_be_composed_with(&b));
    }

    #[test]
    fn delete_then_insert_elsewhere() {
        let a = TextOperation::new().retain(2).delete(1).retain(3);
        let b = TextOperation::new().retain(4).insert("x").retain(1);
        assert!(!a.should_be_composed_with(&b));
    }
}
