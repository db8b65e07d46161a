//! Parsed JSON response bodies.
//!
//! # Design
//! `Entity` is a transparent wrapper over `serde_json::Value`. Indexing and
//! `get` hand out `&Entity` for nested values, so map-style access chains
//! all the way down (`entity["user"]["name"]`) and arrays of objects get the
//! same treatment element-wise. For named-field access, `decode` turns the
//! entity into any `Deserialize` type.

use std::ops::{Deref, Index};

use ref_cast::RefCast;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A JSON value returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, RefCast)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Entity(Value);

static NULL: Entity = Entity(Value::Null);

impl Entity {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Field `key` of an object. `None` for missing keys and non-objects.
    pub fn get(&self, key: &str) -> Option<&Entity> {
        self.0.get(key).map(Entity::ref_cast)
    }

    /// Element `index` of an array.
    pub fn at(&self, index: usize) -> Option<&Entity> {
        self.0.get(index).map(Entity::ref_cast)
    }

    /// Elements of an array; empty for anything else.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.0
            .as_array()
            .into_iter()
            .flatten()
            .map(Entity::ref_cast)
    }

    /// Object keys in document order; empty for anything else.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0
            .as_object()
            .into_iter()
            .flat_map(|map| map.keys().map(String::as_str))
    }

    /// Deserialize into a typed value, giving named-field access.
    pub fn decode<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        T::deserialize(&self.0)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

impl Deref for Entity {
    type Target = Value;

    fn deref(&self) -> &Value {
        &self.0
    }
}

/// Missing keys index to `null`, mirroring `serde_json::Value`.
impl Index<&str> for Entity {
    type Output = Entity;

    fn index(&self, key: &str) -> &Entity {
        self.get(key).unwrap_or(&NULL)
    }
}

impl Index<usize> for Entity {
    type Output = Entity;

    fn index(&self, index: usize) -> &Entity {
        self.at(index).unwrap_or(&NULL)
    }
}

impl From<Value> for Entity {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl PartialEq<Value> for Entity {
    fn eq(&self, other: &Value) -> bool {
        self.0 == *other
    }
}

impl PartialEq<str> for Entity {
    fn eq(&self, other: &str) -> bool {
        self.0.as_str() == Some(other)
    }
}

impl PartialEq<&str> for Entity {
    fn eq(&self, other: &&str) -> bool {
        self.0.as_str() == Some(*other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn conversation() -> Entity {
        Entity::new(json!({
            "id": "CON-1",
            "name": "support",
            "members": [
                {"id": "MEM-1", "user": {"name": "alice"}},
                {"id": "MEM-2", "user": {"name": "bob"}}
            ]
        }))
    }

    #[test]
    fn index_and_get_agree() {
        let entity = conversation();
        assert_eq!(entity["id"], "CON-1");
        assert_eq!(entity.get("id").and_then(|id| id.as_str()), Some("CON-1"));
    }

    #[test]
    fn nested_access_chains() {
        let entity = conversation();
        assert_eq!(entity["members"][1]["user"]["name"], "bob");
        assert_eq!(
            entity.get("members").and_then(|m| m.at(0)).and_then(|m| m.get("id")),
            Some(&Entity::new(json!("MEM-1")))
        );
    }

    #[test]
    fn nested_entities_borrow_from_the_parent() {
        let entity = conversation();
        let inner = entity.as_value().get("members").unwrap();
        assert!(std::ptr::eq(entity.get("members").unwrap().as_value(), inner));
        assert!(std::ptr::eq(entity["members"].at(1).unwrap().as_value(), &inner[1]));
    }

    #[test]
    fn arrays_iterate_as_entities() {
        let entity = conversation();
        let names: Vec<&str> = entity["members"]
            .iter()
            .filter_map(|member| member["user"]["name"].as_str())
            .collect();
        assert_eq!(names, ["alice", "bob"]);
    }

    #[test]
    fn missing_keys_index_to_null() {
        let entity = conversation();
        assert!(entity["nope"]["deeper"].is_null());
        assert!(entity.get("nope").is_none());
        assert!(entity["id"].get("x").is_none());
    }

    #[test]
    fn keys_follow_document_order() {
        let entity = conversation();
        assert_eq!(entity.keys().collect::<Vec<_>>(), ["id", "name", "members"]);
    }

    #[test]
    fn decode_gives_named_fields() {
        #[derive(Deserialize)]
        struct Conversation {
            id: String,
            name: String,
        }

        let conv: Conversation = conversation().decode().unwrap();
        assert_eq!(conv.id, "CON-1");
        assert_eq!(conv.name, "support");
    }
}
