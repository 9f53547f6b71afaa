//! Applying and inverting operations.

use super::TextOperation;
use crate::attributes::{apply_attributes, Attributes};
use crate::error::OtError;
use crate::text_op::TextOp;

impl TextOperation {
    /// Apply the operation to `s`, returning the new string.
    pub fn apply(&self, s: &str) -> Result<String, OtError> {
        self.walk(s, None).map(|(out, _)| out)
    }

    /// Apply the operation to `s` while tracking per-character attributes.
    ///
    /// `attributes[i]` holds the attributes of the `i`-th char of `s`; missing
    /// entries count as empty. The returned vector has one entry per char of
    /// the result.
    pub fn apply_with_attributes(
        &self,
        s: &str,
        attributes: &[Attributes],
    ) -> Result<(String, Vec<Attributes>), OtError> {
        self.walk(s, Some(attributes))
            .map(|(out, new_attributes)| (out, new_attributes.unwrap_or_default()))
    }

    fn walk(
        &self,
        s: &str,
        old_attributes: Option<&[Attributes]>,
    ) -> Result<(String, Option<Vec<Attributes>>), OtError> {
        let chars: Vec<char> = s.chars().collect();
        if chars.len() != self.base_length {
            return Err(OtError::LengthMismatch {
                expected: self.base_length,
                actual: chars.len(),
            });
        }
        let mut out = String::with_capacity(s.len());
        let mut new_attributes = old_attributes.map(|_| Vec::with_capacity(self.target_length));
        let mut idx = 0usize;

        for op in &self.ops {
            match op {
                TextOp::Retain(n, overrides) => {
                    let end = idx + n;
                    if end > chars.len() {
                        return Err(OtError::RetainOverflow);
                    }
                    out.extend(&chars[idx..end]);
                    if let (Some(old), Some(new)) = (old_attributes, new_attributes.as_mut()) {
                        let empty = Attributes::new();
                        for k in idx..end {
                            let current = old.get(k).unwrap_or(&empty);
                            new.push(apply_attributes(current, overrides));
                        }
                    }
                    idx = end;
                }
                TextOp::Insert(text, inserted) => {
                    out.push_str(text);
                    if let Some(new) = new_attributes.as_mut() {
                        new.extend(text.chars().map(|_| inserted.clone()));
                    }
                }
                TextOp::Delete(n) => {
                    idx += n;
                }
            }
        }
        if idx != chars.len() {
            return Err(OtError::LengthMismatch {
                expected: idx,
                actual: chars.len(),
            });
        }
        Ok((out, new_attributes))
    }

    /// Computes the operation that reverts this one.
    ///
    /// `s` is the string the operation was applied to. Attribute changes made
    /// by retains are not recoverable from the text alone, so the inverse
    /// retains carry no attributes.
    pub fn invert(&self, s: &str) -> Result<TextOperation, OtError> {
        let chars: Vec<char> = s.chars().collect();
        if chars.len() != self.base_length {
            return Err(OtError::LengthMismatch {
                expected: self.base_length,
                actual: chars.len(),
            });
        }
        let mut inverse = TextOperation::new();
        let mut idx = 0usize;
        for op in &self.ops {
            match op {
                TextOp::Retain(n, _) => {
                    inverse.push_retain(*n, Attributes::new());
                    idx += n;
                }
                TextOp::Insert(..) => {
                    inverse.push_delete(op.dst_len());
                }
                TextOp::Delete(n) => {
                    let deleted: String = chars[idx..idx + n].iter().collect();
                    inverse.push_insert(&deleted, Attributes::new());
                    idx += n;
                }
            }
        }
        Ok(inverse)
    }
}
