//! Test data builders
//!
//! Builds catalog JSON entries with sensible defaults.

use serde_json::{json, Map, Value};

/// Builder for one `data` entry of a catalog response
#[derive(Debug, Clone)]
pub struct ResourceJson {
    id: String,
    kind: String,
    href: Option<String>,
    attributes: Option<Map<String, Value>>,
    relationships: Map<String, Value>,
}

impl ResourceJson {
    /// Creates an entry with an empty attributes bag
    pub fn new(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            href: None,
            attributes: Some(Map::new()),
            relationships: Map::new(),
        }
    }

    /// Sets one attribute
    pub fn attr(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.attributes
            .get_or_insert_with(Map::new)
            .insert(key.to_string(), value.into());
        self
    }

    /// Sets the href
    pub fn href(mut self, href: impl Into<String>) -> Self {
        self.href = Some(href.into());
        self
    }

    /// Drops the attributes bag, as related entries often do
    pub fn without_attributes(mut self) -> Self {
        self.attributes = None;
        self
    }

    /// Adds a relationship with the given entries
    pub fn related(mut self, name: &str, data: Vec<Value>) -> Self {
        self.relationships
            .insert(name.to_string(), json!({ "data": data }));
        self
    }

    pub fn build(self) -> Value {
        let mut entry = Map::new();
        entry.insert("id".to_string(), Value::String(self.id));
        entry.insert("type".to_string(), Value::String(self.kind));
        if let Some(href) = self.href {
            entry.insert("href".to_string(), Value::String(href));
        }
        if let Some(attributes) = self.attributes {
            entry.insert("attributes".to_string(), Value::Object(attributes));
        }
        if !self.relationships.is_empty() {
            entry.insert("relationships".to_string(), Value::Object(self.relationships));
        }
        Value::Object(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_entry_with_relationships() {
        let entry = ResourceJson::new("artists", "1")
            .attr("name", "Drake")
            .href("/v1/catalog/us/artists/1")
            .related("albums", vec![ResourceJson::new("albums", "2").without_attributes().build()])
            .build();

        assert_eq!(entry["attributes"]["name"], "Drake");
        assert_eq!(entry["relationships"]["albums"]["data"][0]["id"], "2");
        assert!(entry["relationships"]["albums"]["data"][0].get("attributes").is_none());
    }

    #[test]
    fn omits_empty_relationships() {
        let entry = ResourceJson::new("genres", "18").build();
        assert!(entry.get("relationships").is_none());
        assert!(entry.get("href").is_none());
    }
}
