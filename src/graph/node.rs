//! Graph container and nodes.
//!
//! A node is an `@id`, one or more `@type` tags and a bag of properties.
//! Reading helpers are lenient about shape (single value or array, reference
//! object or bare id string); writing helpers always emit one shape.

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use super::vocab::EntityKind;
use crate::canonical::canonical_hash_hex;
use crate::error::DecodeError;

/// Build a `{"@id": id}` reference.
pub fn reference(id: &str) -> Value {
    json!({ "@id": id })
}

/// Extract the target id from a reference-ish value.
///
/// Accepts `{"@id": ..}` objects (inline nodes included) and bare strings.
fn ref_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Object(obj) => obj.get("@id").and_then(Value::as_str).map(str::to_string),
        _ => None,
    }
}

/// One addressable record in the graph.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Node {
    /// Node id, unique within one graph.
    pub id: String,
    /// Type tags.
    pub types: Vec<String>,
    /// Remaining properties.
    pub properties: Map<String, Value>,
}

impl Node {
    /// Create a node with the given type tags.
    pub fn new(id: impl Into<String>, types: &[&str]) -> Self {
        Self {
            id: id.into(),
            types: types.iter().map(|t| t.to_string()).collect(),
            properties: Map::new(),
        }
    }

    /// Create a node tagged with the primary spelling of `kind`.
    pub fn of_kind(id: impl Into<String>, kind: EntityKind) -> Self {
        Self::new(id, &[kind.primary()])
    }

    /// Whether any type tag is an alias of `kind`.
    pub fn is(&self, kind: EntityKind) -> bool {
        kind.matches(&self.types)
    }

    /// Raw property.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// Whether the property is present and not null.
    pub fn has(&self, key: &str) -> bool {
        self.get(key).map_or(false, |v| !v.is_null())
    }

    /// String property.
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// First string property present among `keys`, in priority order.
    pub fn first_str(&self, keys: &[&str]) -> Option<&str> {
        keys.iter().find_map(|k| self.str_field(k))
    }

    /// Numeric property; numeric strings are accepted.
    pub fn number_field(&self, key: &str) -> Option<f64> {
        match self.get(key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Boolean property; `"true"`/`"false"` strings are accepted.
    pub fn bool_field(&self, key: &str) -> Option<bool> {
        match self.get(key)? {
            Value::Bool(b) => Some(*b),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// String-list property. A single string yields a one-element list.
    pub fn strings(&self, key: &str) -> Vec<String> {
        match self.get(key) {
            Some(Value::String(s)) => vec![s.clone()],
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Reference targets of a property, always as a list.
    pub fn refs(&self, key: &str) -> Vec<String> {
        match self.get(key) {
            Some(Value::Array(items)) => items.iter().filter_map(ref_id).collect(),
            Some(v) => ref_id(v).into_iter().collect(),
            None => Vec::new(),
        }
    }

    /// References of the first key present among `keys`.
    pub fn first_refs(&self, keys: &[&str]) -> Vec<String> {
        keys.iter()
            .find(|k| self.has(k))
            .map(|k| self.refs(k))
            .unwrap_or_default()
    }

    /// Set a property.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.properties.insert(key.to_string(), value.into());
    }

    /// Set a property when a value is present.
    pub fn set_opt<T: Into<Value>>(&mut self, key: &str, value: Option<T>) {
        if let Some(v) = value {
            self.set(key, v);
        }
    }

    /// Set a string-list property; empty lists are not written.
    pub fn set_strings(&mut self, key: &str, values: &[String]) {
        if !values.is_empty() {
            self.set(key, values.to_vec());
        }
    }

    /// Set a single reference.
    pub fn set_ref(&mut self, key: &str, id: &str) {
        self.set(key, reference(id));
    }

    /// Set a single-or-many reference property.
    ///
    /// Zero targets: not written. One: a reference object. More: an array.
    pub fn set_refs(&mut self, key: &str, ids: &[String]) {
        match ids {
            [] => {
                self.properties.remove(key);
            }
            [one] => self.set_ref(key, one),
            many => self.set(key, many.iter().map(|id| reference(id)).collect::<Vec<_>>()),
        }
    }

    /// Append a reference, re-normalizing the property's shape.
    pub fn push_ref(&mut self, key: &str, id: &str) {
        let mut ids = self.refs(key);
        ids.push(id.to_string());
        self.set_refs(key, &ids);
    }

    /// JSON form of the node.
    pub fn to_value(&self) -> Value {
        let mut obj = Map::new();
        obj.insert("@id".into(), json!(self.id));
        match self.types.as_slice() {
            [] => {}
            [one] => {
                obj.insert("@type".into(), json!(one));
            }
            many => {
                obj.insert("@type".into(), json!(many));
            }
        }
        for (k, v) in &self.properties {
            obj.insert(k.clone(), v.clone());
        }
        Value::Object(obj)
    }

    /// Read a node from JSON. Returns `None` for anything without a string `@id`.
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let id = obj.get("@id")?.as_str()?.to_string();
        let types = match obj.get("@type") {
            Some(Value::String(s)) => vec![s.clone()],
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|t| t.as_str().map(str::to_string))
                .collect(),
            _ => Vec::new(),
        };
        let properties = obj
            .iter()
            .filter(|(k, _)| k.as_str() != "@id" && k.as_str() != "@type")
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Some(Self { id, types, properties })
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Node::from_value(&value).ok_or_else(|| de::Error::custom("node without string @id"))
    }
}

/// A graph container: context declaration plus flat node list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphContainer {
    /// Context declaration (string, array or object).
    pub context: Value,
    /// Nodes in emission order.
    pub nodes: Vec<Node>,
}

impl GraphContainer {
    /// Create an empty container with a context.
    pub fn new(context: Value) -> Self {
        Self {
            context,
            nodes: Vec::new(),
        }
    }

    /// Read a container from parsed JSON.
    ///
    /// `@context`/`context` and `@graph`/`nodes` are the only load-bearing
    /// keys. Graph entries that are not nodes are dropped.
    pub fn from_value(value: &Value) -> Result<Self, DecodeError> {
        let obj = value
            .as_object()
            .ok_or_else(|| DecodeError::MalformedGraph("top level is not an object".into()))?;

        let context = ["@context", "context"]
            .iter()
            .find_map(|k| obj.get(*k).filter(|v| !v.is_null()))
            .ok_or(DecodeError::MissingContext)?
            .clone();

        let graph = ["@graph", "nodes"]
            .iter()
            .find_map(|k| obj.get(*k).filter(|v| !v.is_null()))
            .ok_or(DecodeError::MissingGraph)?;
        let entries = graph
            .as_array()
            .ok_or_else(|| DecodeError::MalformedGraph("@graph is not an array".into()))?;

        let mut nodes = Vec::with_capacity(entries.len());
        for (index, entry) in entries.iter().enumerate() {
            match Node::from_value(entry) {
                Some(node) => nodes.push(node),
                None => tracing::debug!(index, "Ignoring graph entry without @id"),
            }
        }

        Ok(Self { context, nodes })
    }

    /// Parse a container from JSON text.
    pub fn from_json(text: &str) -> Result<Self, DecodeError> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(&value)
    }

    /// JSON form with `@context` and `@graph`.
    pub fn to_value(&self) -> Value {
        json!({
            "@context": self.context,
            "@graph": self.nodes.iter().map(Node::to_value).collect::<Vec<_>>(),
        })
    }

    /// Pretty-printed JSON text.
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(&self.to_value()).unwrap_or_default()
    }

    /// Find a node by id.
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Nodes of a logical kind, in graph order.
    pub fn nodes_of(&self, kind: EntityKind) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(move |n| n.is(kind))
    }

    /// Stable fingerprint of the whole container.
    pub fn fingerprint(&self) -> String {
        canonical_hash_hex(&self.to_value())
    }
}

impl Serialize for GraphContainer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for GraphContainer {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        GraphContainer::from_value(&value).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_refs_shape() {
        let mut node = Node::new("#a", &["Thing"]);
        node.set_refs("x", &[]);
        assert!(node.get("x").is_none());

        node.set_refs("x", &["#b".to_string()]);
        assert_eq!(node.get("x"), Some(&json!({"@id": "#b"})));

        node.push_ref("x", "#c");
        assert_eq!(node.get("x"), Some(&json!([{"@id": "#b"}, {"@id": "#c"}])));
    }

    #[test]
    fn test_refs_accept_any_shape() {
        let node = Node::from_value(&json!({
            "@id": "#a",
            "one": {"@id": "#b"},
            "many": [{"@id": "#c"}, "#d", 7],
            "bare": "#e"
        }))
        .unwrap();
        assert_eq!(node.refs("one"), vec!["#b"]);
        assert_eq!(node.refs("many"), vec!["#c", "#d"]);
        assert_eq!(node.refs("bare"), vec!["#e"]);
        assert!(node.refs("absent").is_empty());
    }

    #[test]
    fn test_single_type_serializes_as_string() {
        let node = Node::new("#a", &["schema:Person"]);
        assert_eq!(node.to_value()["@type"], "schema:Person");

        let node = Node::new("#a", &["schema:Dataset", "dcat:Dataset"]);
        assert_eq!(node.to_value()["@type"], json!(["schema:Dataset", "dcat:Dataset"]));
    }

    #[test]
    fn test_container_structural_errors() {
        assert!(matches!(
            GraphContainer::from_value(&json!({"@graph": []})),
            Err(DecodeError::MissingContext)
        ));
        assert!(matches!(
            GraphContainer::from_value(&json!({"@context": "x"})),
            Err(DecodeError::MissingGraph)
        ));
        assert!(matches!(
            GraphContainer::from_value(&json!({"@context": "x", "@graph": {}})),
            Err(DecodeError::MalformedGraph(_))
        ));
    }

    #[test]
    fn test_container_aliases_and_skips() {
        let c = GraphContainer::from_value(&json!({
            "context": "https://w3id.org/ro/crate/1.1/context",
            "nodes": [{"@id": "./", "@type": "Dataset"}, {"name": "anonymous"}]
        }))
        .unwrap();
        assert_eq!(c.nodes.len(), 1);
        assert!(c.nodes[0].is(EntityKind::Dataset));
    }
}
