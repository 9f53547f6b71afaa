//! Text operations.
//!
//! When an operation is applied to an input string, an imaginary cursor runs
//! over the whole string, skipping (retaining), deleting and inserting text
//! along the way. The units of an operation record those actions in order.
//!
//! # Invariants
//!
//! - `base_length` is the sum of retain and delete counts: the exact length
//!   of every string the operation can be applied to.
//! - `target_length` is the sum of retain counts and insert lengths: the
//!   length of the result.
//! - Two adjacent units never have the same kind and equal attributes.
//! - An insert and a delete at the same position are stored insert first, so
//!   operations with the same effect compare equal.
//!
//! The builder methods are the only way units get added; the algorithms in
//! the submodules build fresh operations and never touch their inputs.

mod apply;
mod compose;
mod grouping;
mod transform;

use std::fmt;

use crate::attributes::Attributes;
use crate::text_op::{char_len, TextOp};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextOperation {
    ops: Vec<TextOp>,
    base_length: usize,
    target_length: usize,
}

impl TextOperation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[TextOp] {
        &self.ops
    }

    pub fn base_length(&self) -> usize {
        self.base_length
    }

    pub fn target_length(&self) -> usize {
        self.target_length
    }

    // ── Chaining builders ───────────────────────────────────────────────

    /// Skip over `n` characters.
    pub fn retain(mut self, n: usize) -> Self {
        self.push_retain(n, Attributes::new());
        self
    }

    /// Skip over `n` characters, applying attribute overrides to them.
    pub fn retain_with(mut self, n: usize, attributes: Attributes) -> Self {
        self.push_retain(n, attributes);
        self
    }

    /// Insert `text` at the current position.
    pub fn insert(mut self, text: &str) -> Self {
        self.push_insert(text, Attributes::new());
        self
    }

    /// Insert `text` carrying `attributes` at the current position.
    pub fn insert_with(mut self, text: &str, attributes: Attributes) -> Self {
        self.push_insert(text, attributes);
        self
    }

    /// Delete the next `n` characters.
    pub fn delete(mut self, n: usize) -> Self {
        self.push_delete(n);
        self
    }

    // ── In-place builders ───────────────────────────────────────────────

    pub fn push_retain(&mut self, n: usize, attributes: Attributes) {
        if n == 0 {
            return;
        }
        self.base_length += n;
        self.target_length += n;
        if let Some(TextOp::Retain(chars, last)) = self.ops.last_mut() {
            if *last == attributes {
                *chars += n;
                return;
            }
        }
        self.ops.push(TextOp::Retain(n, attributes));
    }

    pub fn push_insert(&mut self, text: &str, attributes: Attributes) {
        if text.is_empty() {
            return;
        }
        self.target_length += char_len(text);
        if let Some(TextOp::Insert(prev, last)) = self.ops.last_mut() {
            if *last == attributes {
                prev.push_str(text);
                return;
            }
        }
        let len = self.ops.len();
        if matches!(self.ops.last(), Some(TextOp::Delete(_))) {
            // Keep inserts in front of deletes at the same position.
            if let Some(TextOp::Insert(prev, prev_attributes)) =
                len.checked_sub(2).and_then(|i| self.ops.get_mut(i))
            {
                if *prev_attributes == attributes {
                    prev.push_str(text);
                    return;
                }
            }
            self.ops
                .insert(len - 1, TextOp::Insert(text.to_string(), attributes));
            return;
        }
        self.ops.push(TextOp::Insert(text.to_string(), attributes));
    }

    pub fn push_delete(&mut self, n: usize) {
        if n == 0 {
            return;
        }
        self.base_length += n;
        if let Some(TextOp::Delete(chars)) = self.ops.last_mut() {
            *chars += n;
            return;
        }
        self.ops.push(TextOp::Delete(n));
    }

    /// Appends a unit through the merging builders.
    pub fn push(&mut self, op: TextOp) {
        match op {
            TextOp::Retain(n, attributes) => self.push_retain(n, attributes),
            TextOp::Insert(text, attributes) => self.push_insert(&text, attributes),
            TextOp::Delete(n) => self.push_delete(n),
        }
    }

    /// Tests whether this operation has no effect.
    pub fn is_noop(&self) -> bool {
        match self.ops.as_slice() {
            [] => true,
            [op @ TextOp::Retain(..)] => op.has_empty_attributes(),
            _ => false,
        }
    }
}

impl FromIterator<TextOp> for TextOperation {
    fn from_iter<I: IntoIterator<Item = TextOp>>(iter: I) -> Self {
        let mut operation = TextOperation::new();
        for op in iter {
            operation.push(op);
        }
        operation
    }
}

impl fmt::Display for TextOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, op) in self.ops.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match op {
                TextOp::Retain(n, _) => write!(f, "retain {n}")?,
                TextOp::Insert(text, _) => write!(f, "insert '{text}'")?,
                TextOp::Delete(n) => write!(f, "delete {n}")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn attrs(pairs: &[(&str, serde_json::Value)]) -> Attributes {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    // ── lengths ─────────────────────────────────────────────────────────

    #[test]
    fn lengths_track_builders() {
        let mut o = TextOperation::new();
        assert_eq!((o.base_length(), o.target_length()), (0, 0));
        o.push_retain(5, Attributes::new());
        assert_eq!((o.base_length(), o.target_length()), (5, 5));
        o.push_insert("abc", Attributes::new());
        assert_eq!((o.base_length(), o.target_length()), (5, 8));
        o.push_retain(2, Attributes::new());
        assert_eq!((o.base_length(), o.target_length()), (7, 10));
        o.push_delete(2);
        assert_eq!((o.base_length(), o.target_length()), (9, 10));
    }

    #[test]
    fn chaining_skips_empty_units() {
        let o = TextOperation::new()
            .retain(5)
            .retain(0)
            .insert("lorem")
            .insert("")
            .delete(3)
            .delete(3)
            .delete(0);
        assert_eq!(o.ops().len(), 3);
    }

    #[test]
    fn chaining_with_different_attributes() {
        let o = TextOperation::new()
            .retain(5)
            .retain_with(3, attrs(&[("a", json!(1))]))
            .retain_with(0, attrs(&[("b", json!(2))]))
            .insert_with("lorem", attrs(&[("c", json!(3))]))
            .insert_with("ipsum", attrs(&[("d", json!(4))]))
            .insert_with("", attrs(&[("e", json!(5))]))
            .delete(3)
            .delete(3)
            .delete(0);
        assert_eq!(o.ops().len(), 5);
    }

    #[test]
    fn empty_units_are_dropped() {
        let mut o = TextOperation::new();
        o.push_retain(0, Attributes::new());
        o.push_insert("", Attributes::new());
        o.push_delete(0);
        assert!(o.ops().is_empty());
    }

    // ── merging ─────────────────────────────────────────────────────────

    #[test]
    fn adjacent_units_merge() {
        let mut o = TextOperation::new();
        o.push_retain(2, Attributes::new());
        o.push_retain(3, Attributes::new());
        assert_eq!(o.ops(), &[TextOp::Retain(5, Attributes::new())]);
        o.push_insert("abc", Attributes::new());
        o.push_insert("xyz", Attributes::new());
        assert_eq!(o.ops().len(), 2);
        assert_eq!(o.ops()[1], TextOp::Insert("abcxyz".into(), Attributes::new()));
        o.push_delete(1);
        o.push_delete(1);
        assert_eq!(o.ops().len(), 3);
        assert_eq!(o.ops()[2], TextOp::Delete(2));
    }

    #[test]
    fn merging_respects_attributes() {
        let a1 = attrs(&[("a", json!(1))]);
        let a1b2 = attrs(&[("a", json!(1)), ("b", json!(2))]);
        let b1 = attrs(&[("b", json!(1))]);
        let o = TextOperation::new()
            .retain(2)
            .retain(3)
            .retain_with(4, a1.clone())
            .retain_with(1, a1.clone())
            .retain_with(2, a1b2.clone())
            .insert("abc")
            .insert("xyz")
            .insert_with("def", b1.clone())
            .insert_with("ghi", b1.clone())
            .delete(1)
            .delete(1);
        assert_eq!(
            o.ops(),
            &[
                TextOp::Retain(5, Attributes::new()),
                TextOp::Retain(5, a1),
                TextOp::Retain(2, a1b2),
                TextOp::Insert("abcxyz".into(), Attributes::new()),
                TextOp::Insert("defghi".into(), b1),
                TextOp::Delete(2),
            ]
        );
    }

    #[test]
    fn insert_after_delete_moves_in_front() {
        let o = TextOperation::new().retain(1).delete(1).insert("B").retain(1);
        assert_eq!(
            o.ops(),
            &[
                TextOp::Retain(1, Attributes::new()),
                TextOp::Insert("B".into(), Attributes::new()),
                TextOp::Delete(1),
                TextOp::Retain(1, Attributes::new()),
            ]
        );
    }

    // ── equality ────────────────────────────────────────────────────────

    #[test]
    fn equal_effect_means_equal_value() {
        let mut op1 = TextOperation::new().delete(1).insert("lo").retain(2).retain(3);
        let mut op2 = TextOperation::new().delete(1).insert("l").insert("o").retain(5);
        assert_eq!(op1, op2);
        op1.push_delete(1);
        op2.push_retain(1, Attributes::new());
        assert_ne!(op1, op2);
    }

    #[test]
    fn equal_effect_with_attributes() {
        let a1 = attrs(&[("a", json!(1))]);
        let b2 = attrs(&[("b", json!(2))]);
        let op1 = TextOperation::new()
            .delete(1)
            .insert_with("lo", a1.clone())
            .insert_with("ab", a1.clone())
            .insert("cd")
            .retain_with(2, b2.clone())
            .retain_with(3, b2.clone())
            .retain(3);
        let op2 = TextOperation::new()
            .delete(1)
            .insert_with("loab", a1)
            .insert("cd")
            .retain_with(5, b2)
            .retain(3);
        assert_eq!(op1, op2);
    }

    // ── is_noop ─────────────────────────────────────────────────────────

    #[test]
    fn noop_detection() {
        let o = TextOperation::new();
        assert!(o.is_noop());
        let o = o.retain(5);
        assert!(o.is_noop());
        let o = o.retain(3);
        assert!(o.is_noop());
        assert!(!o.clone().insert("lorem").is_noop());
        assert!(!o.retain_with(3, attrs(&[("a", json!(1))])).is_noop());
    }

    // ── Display ─────────────────────────────────────────────────────────

    #[test]
    fn display_lists_units() {
        let o = TextOperation::new().retain(2).insert("lorem").delete(5).retain(5);
        assert_eq!(o.to_string(), "retain 2, insert 'lorem', delete 5, retain 5");
    }

    #[test]
    fn from_iter_merges() {
        let o: TextOperation = vec![
            TextOp::Retain(1, Attributes::new()),
            TextOp::Retain(1, Attributes::new()),
            TextOp::Delete(2),
        ]
        .into_iter()
        .collect();
        assert_eq!(o, TextOperation::new().retain(2).delete(2));
    }
}
