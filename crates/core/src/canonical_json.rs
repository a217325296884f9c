// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stable-ordered equality over `serde_json::Value` trees.
//!
//! Used to decide whether a freshly-fetched [`crate::Issue`] differs from
//! the one already on disk, so a [`crate::ResourceChangeEvent`] is only
//! emitted on a genuine change. Object key order never matters; array order
//! always does; an absent object key is equal to that key being present
//! with value `null`.

use serde_json::Value;

/// True if `a` and `b` are equal once object keys are compared
/// order-independently and absent-key-equals-null is applied.
pub fn canonically_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Object(lhs), Value::Object(rhs)) => {
            let mut keys: Vec<&String> = lhs.keys().chain(rhs.keys()).collect();
            keys.sort_unstable();
            keys.dedup();
            keys.into_iter().all(|key| {
                let left = lhs.get(key).unwrap_or(&Value::Null);
                let right = rhs.get(key).unwrap_or(&Value::Null);
                canonically_equal(left, right)
            })
        }
        (Value::Array(lhs), Value::Array(rhs)) => {
            lhs.len() == rhs.len() && lhs.iter().zip(rhs.iter()).all(|(l, r)| canonically_equal(l, r))
        }
        (Value::Null, Value::Null) => true,
        _ => a == b,
    }
}

#[cfg(test)]
#[path = "canonical_json_tests.rs"]
mod tests;
