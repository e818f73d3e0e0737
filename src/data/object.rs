//! The data object model: tagged objects with ordered, keyed nodes.

/// A value inside a [`DataObject`].
#[derive(Debug, Clone, PartialEq)]
pub enum DataValue {
    Text(String),
    Object(DataObject),
    Array(Vec<DataValue>),
}

impl DataValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            DataValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&DataObject> {
        match self {
            DataValue::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[DataValue]> {
        match self {
            DataValue::Array(items) => Some(items),
            _ => None,
        }
    }
}

impl From<&str> for DataValue {
    fn from(text: &str) -> Self {
        DataValue::Text(text.to_owned())
    }
}

impl From<String> for DataValue {
    fn from(text: String) -> Self {
        DataValue::Text(text)
    }
}

impl From<DataObject> for DataValue {
    fn from(object: DataObject) -> Self {
        DataValue::Object(object)
    }
}

/// One `key = value` entry of a [`DataObject`].
#[derive(Debug, Clone, PartialEq)]
pub struct DataNode {
    pub tag: String,
    pub value: DataValue,
}

/// A tagged object: `tag { key = value, ... }`.
///
/// Nodes keep their insertion order; keys are unique.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DataObject {
    tag: String,
    nodes: Vec<DataNode>,
}

impl DataObject {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            nodes: Vec::new(),
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn set_tag(&mut self, tag: impl Into<String>) {
        self.tag = tag.into();
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn property_count(&self) -> usize {
        self.nodes.len()
    }

    /// Positional access.
    pub fn property(&self, index: usize) -> Option<&DataNode> {
        self.nodes.get(index)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &DataNode> {
        self.nodes.iter()
    }

    pub fn get(&self, key: &str) -> Option<&DataValue> {
        self.nodes
            .iter()
            .find(|node| node.tag == key)
            .map(|node| &node.value)
    }

    /// Text value of `key`, if it is a text node.
    pub fn property_value(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(DataValue::as_text)
    }

    pub fn property_object(&self, key: &str) -> Option<&DataObject> {
        self.get(key).and_then(DataValue::as_object)
    }

    pub fn property_array(&self, key: &str) -> Option<&[DataValue]> {
        self.get(key).and_then(DataValue::as_array)
    }

    /// `true`/`1` and `false`/`0` text values.
    pub fn property_bool(&self, key: &str) -> Option<bool> {
        match self.property_value(key)?.trim() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        }
    }

    pub fn property_int(&self, key: &str) -> Option<i64> {
        self.property_value(key)?.trim().parse().ok()
    }

    pub fn property_float(&self, key: &str) -> Option<f64> {
        self.property_value(key)?.trim().parse().ok()
    }

    /// Set `key`, replacing an existing node in place.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<DataValue>) {
        let key = key.into();
        let value = value.into();
        match self.nodes.iter_mut().find(|node| node.tag == key) {
            Some(node) => node.value = value,
            None => self.nodes.push(DataNode { tag: key, value }),
        }
    }

    /// Builder form of [`DataObject::set`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<DataValue>) -> Self {
        self.set(key, value);
        self
    }

    pub fn remove(&mut self, key: &str) -> Option<DataValue> {
        let index = self.nodes.iter().position(|node| node.tag == key)?;
        Some(self.nodes.remove(index).value)
    }
}
