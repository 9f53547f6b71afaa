//! JSON wire format for text operations.
//!
//! An operation serializes to a flat array. Each unit contributes an
//! attribute object (only when its attributes are non-empty) immediately
//! followed by its value: a positive integer for a retain, a negative integer
//! for a delete, a string for an insert. Deletes never carry attributes. An
//! operation without units becomes `[0]`, since some transports treat an
//! empty array as null.
//!
//! ```text
//! [2, {"bold": true}, 3, -1, "abc"]
//! ```

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::error::OtError;
use crate::operation::TextOperation;
use crate::text_op::TextOp;

impl TextOperation {
    /// Serialize to the wire format.
    pub fn to_json(&self) -> Value {
        let mut out = Vec::with_capacity(self.ops().len());
        for op in self.ops() {
            if let Some(attributes) = op.attributes().filter(|a| !a.is_empty()) {
                out.push(Value::Object(attributes.clone()));
            }
            match op {
                TextOp::Retain(n, _) => out.push(Value::from(*n)),
                TextOp::Insert(text, _) => out.push(Value::String(text.clone())),
                TextOp::Delete(n) => out.push(Value::from(-(*n as i64))),
            }
        }
        if out.is_empty() {
            out.push(Value::from(0));
        }
        Value::Array(out)
    }

    /// Parse and validate the wire format.
    pub fn from_json(value: &Value) -> Result<Self, OtError> {
        let elements = value
            .as_array()
            .ok_or_else(|| invalid("operation must be an array"))?;
        let mut operation = TextOperation::new();
        let mut iter = elements.iter().enumerate();
        while let Some((i, element)) = iter.next() {
            let (attributes, element) = match element {
                Value::Object(attributes) => {
                    let (_, next) = iter
                        .next()
                        .ok_or_else(|| invalid(format!("missing unit after attributes at {i}")))?;
                    (Some(attributes.clone()), next)
                }
                other => (None, other),
            };
            match element {
                Value::Number(n) => {
                    let n = n
                        .as_i64()
                        .ok_or_else(|| invalid(format!("non-integer length {n}")))?;
                    if n > 0 {
                        operation.push_retain(n as usize, attributes.unwrap_or_default());
                    } else if attributes.is_some() {
                        // Only retains and inserts carry attributes.
                        return Err(invalid(format!("attributes before delete at {i}")));
                    } else {
                        operation.push_delete(n.unsigned_abs() as usize);
                    }
                }
                Value::String(text) => operation.push_insert(text, attributes.unwrap_or_default()),
                other => return Err(invalid(format!("unexpected element {other}"))),
            }
        }
        Ok(operation)
    }
}

fn invalid(msg: impl Into<String>) -> OtError {
    OtError::InvalidSerializedOperation(msg.into())
}

impl Serialize for TextOperation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for TextOperation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        TextOperation::from_json(&value).map_err(D::Error::custom)
    }
}
