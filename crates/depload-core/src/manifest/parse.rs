//! Lenient JSON (de)serialization of manifests.
//!
//! Only a broken document (invalid JSON, or a top level that is not an array)
//! is an error. Entries with the wrong shape are skipped, and missing string
//! fields default to empty.

use serde_json::{Map, Value};
use std::io::{Read, Write};

use super::{Coordinate, DependencyNode};
use crate::error::LoadError;

/// Reads a manifest document (JSON array of dependency trees).
pub fn parse_manifest<R: Read>(reader: R) -> Result<Vec<DependencyNode>, LoadError> {
    let value: Value =
        serde_json::from_reader(reader).map_err(|e| LoadError::ManifestParse(e.to_string()))?;
    match value {
        Value::Array(items) => Ok(nodes_from_values(&items)),
        other => Err(LoadError::ManifestParse(format!(
            "expected a top-level array, found {}",
            value_kind(&other)
        ))),
    }
}

fn nodes_from_values(items: &[Value]) -> Vec<DependencyNode> {
    items
        .iter()
        .filter_map(Value::as_object)
        .map(node_from_object)
        .collect()
}

fn node_from_object(obj: &Map<String, Value>) -> DependencyNode {
    let string_field = |key: &str| {
        obj.get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };
    let repository = obj.get("repo").and_then(Value::as_str).map(str::to_string);
    let children = match obj.get("dependencies") {
        Some(Value::Array(items)) => nodes_from_values(items),
        _ => Vec::new(),
    };
    DependencyNode {
        coordinate: Coordinate::new(
            string_field("group"),
            string_field("name"),
            string_field("version"),
        ),
        repository,
        children,
    }
}

fn value_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Serializes a forest back to the manifest document shape.
pub fn to_json(forest: &[DependencyNode]) -> Value {
    Value::Array(forest.iter().map(node_to_value).collect())
}

fn node_to_value(node: &DependencyNode) -> Value {
    let mut obj = Map::new();
    obj.insert("group".into(), Value::String(node.coordinate.group.clone()));
    obj.insert("name".into(), Value::String(node.coordinate.name.clone()));
    obj.insert(
        "version".into(),
        Value::String(node.coordinate.version.clone()),
    );
    if let Some(repo) = &node.repository {
        obj.insert("repo".into(), Value::String(repo.clone()));
    }
    obj.insert(
        "dependencies".into(),
        Value::Array(node.children.iter().map(node_to_value).collect()),
    );
    Value::Object(obj)
}

/// Writes the forest as pretty-printed JSON.
pub fn write_manifest<W: Write>(writer: W, forest: &[DependencyNode]) -> serde_json::Result<()> {
    serde_json::to_writer_pretty(writer, &to_json(forest))
}
