// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde_json::json;

#[test]
fn object_key_order_does_not_matter() {
    let a = json!({"title": "bug", "number": 26});
    let b = json!({"number": 26, "title": "bug"});
    assert!(canonically_equal(&a, &b));
}

#[test]
fn array_order_matters() {
    let a = json!({"labels": ["a", "b"]});
    let b = json!({"labels": ["b", "a"]});
    assert!(!canonically_equal(&a, &b));
}

#[test]
fn absent_key_equals_explicit_null() {
    let a = json!({"title": "bug"});
    let b = json!({"title": "bug", "body": null});
    assert!(canonically_equal(&a, &b));
}

#[test]
fn differing_scalar_values_are_not_equal() {
    let a = json!({"number": 26});
    let b = json!({"number": 27});
    assert!(!canonically_equal(&a, &b));
}

#[test]
fn nested_objects_are_compared_order_independently() {
    let a = json!({"issue": {"title": "bug", "closed": false}});
    let b = json!({"issue": {"closed": false, "title": "bug"}});
    assert!(canonically_equal(&a, &b));
}
