//! Tests for the node arena

use super::*;
use crate::error::Error;
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn test_render_nested_nodes() {
    let mut arena = SchemaArena::new();
    let name = arena.alloc(object_from_json(json!({"type": "string"})));

    let mut properties = SchemaObject::new();
    properties.insert("name".to_string(), SchemaValue::Node(name));

    let root = arena.alloc(object_from_json(json!({"type": "object"})));
    arena.insert(root, "properties", SchemaValue::Map(properties));

    assert_eq!(
        arena.render(root).unwrap(),
        json!({"type": "object", "properties": {"name": {"type": "string"}}})
    );
}

#[test]
fn test_render_preserves_insertion_order() {
    let mut arena = SchemaArena::new();
    let root = arena.alloc_empty();
    arena.insert(root, "zeta", json!(1));
    arena.insert(root, "alpha", json!(2));

    let rendered = arena.render(root).unwrap();
    let keys: Vec<_> = rendered.as_object().unwrap().keys().cloned().collect();
    assert_eq!(keys, vec!["zeta", "alpha"]);
}

#[test]
fn test_shared_node_renders_twice() {
    let mut arena = SchemaArena::new();
    let shared = arena.alloc(object_from_json(json!({"type": "integer"})));
    let root = arena.alloc_empty();
    arena.insert(
        root,
        "anyOf",
        vec![SchemaValue::Node(shared), SchemaValue::Node(shared)],
    );

    assert_eq!(
        arena.render(root).unwrap(),
        json!({"anyOf": [{"type": "integer"}, {"type": "integer"}]})
    );
}

#[test]
fn test_self_containing_node_fails() {
    let mut arena = SchemaArena::new();
    let root = arena.alloc_empty();
    arena.insert(root, "items", SchemaValue::Node(root));

    let err = arena.render(root).unwrap_err();
    assert!(matches!(err, Error::CircularInline { .. }));
}

#[test]
fn test_set_all_overwrites_merge_missing_keeps() {
    let mut arena = SchemaArena::new();
    let id = arena.alloc(object_from_json(json!({"type": "string", "title": "a"})));

    arena.merge_missing(id, &object_from_json(json!({"title": "b", "minLength": 1})));
    assert_eq!(
        arena.render(id).unwrap(),
        json!({"type": "string", "title": "a", "minLength": 1})
    );

    arena.set_all(id, object_from_json(json!({"title": "c"})));
    assert_eq!(
        arena.render(id).unwrap(),
        json!({"type": "string", "title": "c", "minLength": 1})
    );
}

#[test]
fn test_take_and_put() {
    let mut arena = SchemaArena::new();
    let id = arena.alloc(object_from_json(json!({"type": "string"})));

    let mut content = arena.take(id);
    assert!(arena.get(id).is_empty());
    content.insert("format".to_string(), "email".into());
    arena.put(id, content);

    assert_eq!(arena.get(id).get("format").and_then(SchemaValue::as_str), Some("email"));
    assert_eq!(arena.len(), 1);
}

#[test]
fn test_object_from_json_ignores_non_objects() {
    assert!(object_from_json(json!(true)).is_empty());
    assert_eq!(object_from_json(json!({"a": 1})).len(), 1);
}
