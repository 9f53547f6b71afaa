//! An operation bundled with metadata that follows it through every algorithm.

use ot_text::{OtError, TextOperation};

use crate::meta::Meta;

#[derive(Debug, Clone, PartialEq)]
pub struct WrappedOperation<M> {
    pub wrapped: TextOperation,
    pub meta: M,
}

impl<M: Meta> WrappedOperation<M> {
    pub fn new(wrapped: TextOperation, meta: M) -> Self {
        Self { wrapped, meta }
    }

    pub fn apply(&self, s: &str) -> Result<String, OtError> {
        self.wrapped.apply(s)
    }

    pub fn invert(&self, s: &str) -> Result<Self, OtError> {
        Ok(Self::new(
            self.wrapped.invert(s)?,
            self.meta.invert().unwrap_or_else(|| self.meta.clone()),
        ))
    }

    pub fn compose(&self, other: &Self) -> Result<Self, OtError> {
        Ok(Self::new(
            self.wrapped.compose(&other.wrapped)?,
            self.meta
                .compose(&other.meta)
                .unwrap_or_else(|| other.meta.clone()),
        ))
    }

    /// Transforms two concurrent wrapped operations. Each side's metadata
    /// moves through the other side's original operation.
    pub fn transform(a: &Self, b: &Self) -> Result<(Self, Self), OtError> {
        let (a_prime, b_prime) = TextOperation::transform(&a.wrapped, &b.wrapped)?;
        Ok((
            Self::new(a_prime, transform_meta(&a.meta, &b.wrapped)),
            Self::new(b_prime, transform_meta(&b.meta, &a.wrapped)),
        ))
    }

    /// Transforms against a bare operation. Returns the transformed `self`
    /// and `operation` moved past `self`.
    pub fn transform_against(
        &self,
        operation: &TextOperation,
    ) -> Result<(Self, TextOperation), OtError> {
        let (self_prime, operation_prime) = TextOperation::transform(&self.wrapped, operation)?;
        Ok((
            Self::new(self_prime, transform_meta(&self.meta, operation)),
            operation_prime,
        ))
    }
}

fn transform_meta<M: Meta>(meta: &M, operation: &TextOperation) -> M {
    meta.transform(operation).unwrap_or_else(|| meta.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meta::SelfMeta;
    use ot_text::Cursor;
    use serde_json::json;

    fn caret(n: usize) -> Option<Cursor> {
        Some(Cursor::caret(n))
    }

    #[test]
    fn apply_delegates() {
        let w = WrappedOperation::new(TextOperation::new().retain(2).insert("!"), ());
        assert_eq!(w.apply("hi").unwrap(), "hi!");
    }

    #[test]
    fn invert_inverts_meta() {
        let w = WrappedOperation::new(
            TextOperation::new().retain(2).insert("!"),
            SelfMeta::new(caret(2), caret(3)),
        );
        let inverse = w.invert("hi").unwrap();
        assert_eq!(inverse.wrapped, TextOperation::new().retain(2).delete(1));
        assert_eq!(inverse.meta, SelfMeta::new(caret(3), caret(2)));
    }

    #[test]
    fn invert_keeps_plain_meta() {
        let w = WrappedOperation::new(TextOperation::new().insert("a"), json!({"user": 1}));
        assert_eq!(w.invert("").unwrap().meta, json!({"user": 1}));
    }

    #[test]
    fn compose_merges_record_meta() {
        let a = WrappedOperation::new(TextOperation::new().insert("a"), json!({"x": 1, "y": 1}));
        let b = WrappedOperation::new(TextOperation::new().retain(1).insert("b"), json!({"y": 2}));
        let ab = a.compose(&b).unwrap();
        assert_eq!(ab.wrapped, TextOperation::new().insert("ab"));
        assert_eq!(ab.meta, json!({"x": 1, "y": 2}));
    }

    #[test]
    fn compose_takes_newer_scalar_meta() {
        let a = WrappedOperation::new(TextOperation::new().insert("a"), json!("first"));
        let b = WrappedOperation::new(TextOperation::new().retain(1), json!("second"));
        assert_eq!(a.compose(&b).unwrap().meta, json!("second"));
    }

    #[test]
    fn compose_length_error_propagates() {
        let a = WrappedOperation::new(TextOperation::new().insert("a"), ());
        let b = WrappedOperation::new(TextOperation::new().retain(3), ());
        assert!(matches!(a.compose(&b), Err(OtError::IncompatibleLengths { .. })));
    }

    #[test]
    fn transform_moves_meta_through_other_side() {
        let a = WrappedOperation::new(
            TextOperation::new().insert("abc").retain(2),
            SelfMeta::new(caret(0), caret(1)),
        );
        let b = WrappedOperation::new(
            TextOperation::new().retain(2).insert("z"),
            SelfMeta::new(caret(2), caret(3)),
        );
        let (a_prime, b_prime) = WrappedOperation::transform(&a, &b).unwrap();
        assert_eq!(a_prime.wrapped, TextOperation::new().insert("abc").retain(3));
        assert_eq!(b_prime.wrapped, TextOperation::new().retain(5).insert("z"));
        assert_eq!(a_prime.meta, SelfMeta::new(caret(0), caret(1)));
        assert_eq!(b_prime.meta, SelfMeta::new(caret(5), caret(6)));
    }

    #[test]
    fn transform_against_bare_operation() {
        let w = WrappedOperation::new(
            TextOperation::new().retain(1).delete(1),
            SelfMeta::new(caret(2), caret(1)),
        );
        let remote = TextOperation::new().insert("xx").retain(2);
        let (w_prime, remote_prime) = w.transform_against(&remote).unwrap();
        assert_eq!(w_prime.wrapped, TextOperation::new().retain(3).delete(1));
        assert_eq!(w_prime.meta, SelfMeta::new(caret(4), caret(3)));
        assert_eq!(remote_prime, TextOperation::new().insert("xx").retain(1));
    }
}
