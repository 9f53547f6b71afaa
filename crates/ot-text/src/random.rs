//! Random strings, attributes and operations for property testing.
//!
//! Every generator takes the RNG explicitly so tests can run from a fixed
//! seed and reproduce failures.

use rand::Rng;
use serde_json::{json, Value};

use crate::attributes::Attributes;
use crate::operation::TextOperation;

const ATTRIBUTE_NAMES: [&str; 7] = ["a", "b", "c", "d", "e", "f", "g"];

fn attribute_values() -> [Value; 12] {
    [
        json!(-4),
        json!(0),
        json!(10),
        json!(50),
        json!("0"),
        json!("10"),
        json!("a"),
        json!("b"),
        json!("c"),
        json!(true),
        json!(null),
        // Removal marker, last so it can be excluded.
        json!(false),
    ]
}

/// A string of `n` random lowercase ASCII letters.
pub fn random_string<R: Rng + ?Sized>(rng: &mut R, n: usize) -> String {
    (0..n).map(|_| rng.gen_range(b'a'..=b'z') as char).collect()
}

/// Up to two random attributes. The removal marker only shows up when
/// `allow_removal` is set, as it is only meaningful on retains.
pub fn random_attributes<R: Rng + ?Sized>(rng: &mut R, allow_removal: bool) -> Attributes {
    let values = attribute_values();
    let usable = if allow_removal {
        values.len()
    } else {
        values.len() - 1
    };
    let mut attributes = Attributes::new();
    for _ in 0..rng.gen_range(0..3) {
        let name = ATTRIBUTE_NAMES[rng.gen_range(0..ATTRIBUTE_NAMES.len())];
        let value = values[rng.gen_range(0..usable)].clone();
        attributes.insert(name.to_string(), value);
    }
    attributes
}

/// Random per-character attributes for a document of `n` chars.
pub fn random_attributes_vec<R: Rng + ?Sized>(rng: &mut R, n: usize) -> Vec<Attributes> {
    (0..n).map(|_| random_attributes(rng, false)).collect()
}

/// A random operation applicable to `s`.
pub fn random_operation<R: Rng + ?Sized>(rng: &mut R, s: &str, use_attributes: bool) -> TextOperation {
    let len = s.chars().count();
    let mut operation = TextOperation::new();
    loop {
        let left = len - operation.base_length();
        if left == 0 {
            break;
        }
        let r: f64 = rng.gen();
        let l = 1 + rng.gen_range(0..left.min(20));
        if r < 0.2 {
            let attributes = if use_attributes {
                random_attributes(rng, false)
            } else {
                Attributes::new()
            };
            let text = random_string(rng, l);
            operation.push_insert(&text, attributes);
        } else if r < 0.4 {
            operation.push_delete(l);
        } else {
            let attributes = if use_attributes {
                random_attributes(rng, true)
            } else {
                Attributes::new()
            };
            operation.push_retain(l, attributes);
        }
    }
    if rng.gen_bool(0.3) {
        let text = format!("1{}", random_string(rng, 10));
        operation.push_insert(&text, Attributes::new());
    }
    operation
}
