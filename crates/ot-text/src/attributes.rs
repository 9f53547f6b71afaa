//! Per-character formatting attributes.
//!
//! Attributes are a JSON object mapping names to arbitrary values. On a retain
//! unit the value `false` is a removal marker: applying the retain deletes the
//! attribute from every retained character. Insert attributes are always
//! additive.

use serde_json::{Map, Value};

pub type Attributes = Map<String, Value>;

/// Returns `true` if `value` is the removal marker.
pub fn is_removal(value: &Value) -> bool {
    matches!(value, Value::Bool(false))
}

/// Applies a retain unit's attribute overrides to one character's attributes.
pub fn apply_attributes(current: &Attributes, overrides: &Attributes) -> Attributes {
    let mut updated = current.clone();
    for (name, value) in overrides {
        if is_removal(value) {
            updated.remove(name);
        } else {
            updated.insert(name.clone(), value.clone());
        }
    }
    updated
}

/// Merges the attributes of two consecutive units.
///
/// `second` overrides `first`. When `first` belongs to an insert the
/// characters do not exist in the base string yet, so a removal marker in
/// `second` drops the key instead of being carried along.
pub fn compose_attributes(first: &Attributes, second: &Attributes, first_is_insert: bool) -> Attributes {
    let mut merged = first.clone();
    for (name, value) in second {
        if first_is_insert && is_removal(value) {
            merged.remove(name);
        } else {
            merged.insert(name.clone(), value.clone());
        }
    }
    merged
}

/// Resolves concurrent attribute changes on the same retained span.
///
/// Keys touched by one side only pass through to that side's prime. Keys set
/// to the same value by both sides vanish from both primes. On a conflict the
/// first operand's value is kept in the first prime and the key is dropped
/// from the second.
pub fn transform_attributes(first: &Attributes, second: &Attributes) -> (Attributes, Attributes) {
    let mut first_prime = Attributes::new();
    let mut second_prime = Attributes::new();

    let names = first.keys().chain(second.keys().filter(|k| !first.contains_key(*k)));
    for name in names {
        match (first.get(name), second.get(name)) {
            (None, Some(b)) => {
                second_prime.insert(name.clone(), b.clone());
            }
            (Some(a), None) => {
                first_prime.insert(name.clone(), a.clone());
            }
            (Some(a), Some(b)) if a == b => {}
            (Some(a), Some(_)) => {
                first_prime.insert(name.clone(), a.clone());
            }
            (None, None) => {}
        }
    }
    (first_prime, second_prime)
}
