//! The property container contract and its order-preserving storage.

use std::fmt;

use crate::data::DataObject;
use crate::error::{self, Error, Result};
use crate::property::{Kind, Schema, Value};
use crate::theme::Constants;
use crate::units::{AngleUnit, Color, Range, SizeValue};

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

/// Insertion-ordered `tag → value` storage with unique tags.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Properties {
    entries: Vec<(String, Value)>,
}

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, tag: &str) -> Option<&Value> {
        self.entries.iter().find(|(t, _)| t == tag).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, tag: &str) -> Option<&mut Value> {
        self.entries.iter_mut().find(|(t, _)| t == tag).map(|(_, v)| v)
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.get(tag).is_some()
    }

    /// Insert or replace in place (the original position is kept).
    pub fn insert(&mut self, tag: &str, value: Value) {
        match self.get_mut(tag) {
            Some(slot) => *slot = value,
            None => self.entries.push((tag.to_owned(), value)),
        }
    }

    pub fn remove(&mut self, tag: &str) -> Option<Value> {
        let index = self.entries.iter().position(|(t, _)| t == tag)?;
        Some(self.entries.remove(index).1)
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(t, _)| t.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(t, v)| (t.as_str(), v))
    }

    /// Copy every entry of `other` over `self`.
    pub fn merge(&mut self, other: &Properties) {
        for (tag, value) in other.iter() {
            self.insert(tag, value.clone());
        }
    }
}

// ---------------------------------------------------------------------------
// PropertyContainer
// ---------------------------------------------------------------------------

/// A typed, order-preserving `tag → value` map with per-tag coercion.
///
/// Implementors supply the schema and the storage; everything else has a
/// default that composites override where their semantics differ.
pub trait PropertyContainer: fmt::Debug {
    fn schema(&self) -> &'static Schema;

    fn properties(&self) -> &Properties;

    fn properties_mut(&mut self) -> &mut Properties;

    /// Tag used when the container is written as a data object.
    fn object_tag(&self) -> &str {
        "_"
    }

    /// Coerce and store `value` (`None` removes). Errors are returned, not reported.
    fn try_set(&mut self, tag: &str, value: Option<Value>) -> Result<()> {
        set_in(self, tag, value)
    }

    /// Set or remove, reporting a rejected value. Returns whether it was accepted.
    fn set_value(&mut self, tag: &str, value: Option<Value>) -> bool {
        match self.try_set(tag, value) {
            Ok(()) => true,
            Err(err) => {
                error::report(err);
                false
            }
        }
    }

    fn set(&mut self, tag: &str, value: impl Into<Value>) -> bool
    where
        Self: Sized,
    {
        self.set_value(tag, Some(value.into()))
    }

    fn remove(&mut self, tag: &str) {
        self.set_value(tag, None);
    }

    fn get(&self, tag: &str) -> Option<Value> {
        get_in(self, tag)
    }

    /// Stored value under an exact canonical tag.
    fn get_raw(&self, tag: &str) -> Option<&Value> {
        self.properties().get(tag)
    }

    /// Store without coercion.
    fn set_raw(&mut self, tag: &str, value: Value) {
        self.properties_mut().insert(tag, value);
    }

    fn all_tags(&self) -> Vec<String> {
        self.properties().tags().map(str::to_owned).collect()
    }

    fn is_empty(&self) -> bool {
        self.properties().is_empty()
    }

    fn to_data_object(&self) -> DataObject {
        let mut object = DataObject::new(self.object_tag());
        for (tag, value) in self.properties().iter() {
            object.set(tag, value.to_data_value());
        }
        object
    }

    // ── Typed access with constant resolution ────────────────────────

    fn size(&self, tag: &str, constants: &dyn Constants) -> Option<SizeValue> {
        match self.get(tag)? {
            Value::Size(unit) => Some(SizeValue::Unit(unit)),
            Value::SizeFunc(func) => Some(SizeValue::Func(func)),
            Value::Ref(name) => parse_resolved(&name, constants, SizeValue::parse),
            _ => None,
        }
    }

    fn color(&self, tag: &str, constants: &dyn Constants) -> Option<Color> {
        match self.get(tag)? {
            Value::Color(color) => Some(color),
            Value::Ref(name) => parse_resolved(&name, constants, Color::parse),
            _ => None,
        }
    }

    fn bool_value(&self, tag: &str, constants: &dyn Constants) -> Option<bool> {
        match self.get(tag)? {
            Value::Bool(value) => Some(value),
            Value::Ref(name) => parse_resolved(&name, constants, |text| {
                match text.trim() {
                    "true" | "1" => Ok(true),
                    "false" | "0" => Ok(false),
                    other => Err(Error::invalid("bool", other)),
                }
            }),
            _ => None,
        }
    }

    fn int(&self, tag: &str, constants: &dyn Constants) -> Option<i64> {
        match self.get(tag)? {
            Value::Int(value) => Some(value),
            Value::Ref(name) => parse_resolved(&name, constants, |text| {
                text.trim().parse().map_err(|_| Error::invalid("int", text))
            }),
            _ => None,
        }
    }

    fn float(&self, tag: &str, constants: &dyn Constants) -> Option<f64> {
        match self.get(tag)? {
            Value::Float(value) => Some(value),
            Value::Int(value) => Some(value as f64),
            Value::Ref(name) => parse_resolved(&name, constants, |text| {
                text.trim().parse().map_err(|_| Error::invalid("float", text))
            }),
            _ => None,
        }
    }

    /// Index of an enum property; a reference resolves to a name or an index.
    fn enum_index(&self, tag: &str, constants: &dyn Constants) -> Option<usize> {
        match self.get(tag)? {
            Value::Int(index) => usize::try_from(index).ok(),
            Value::Ref(name) => {
                let canonical = self.schema().canonical(tag)?;
                let kind = self.schema().kind(canonical)?;
                let text = resolve_reference(&name, constants)?;
                match kind.coerce(canonical, Value::Text(text)) {
                    Ok(Value::Int(index)) => usize::try_from(index).ok(),
                    Ok(_) => None,
                    Err(err) => {
                        error::report(err);
                        None
                    }
                }
            }
            _ => None,
        }
    }

    fn text(&self, tag: &str, constants: &dyn Constants) -> Option<String> {
        match self.get(tag)? {
            Value::Text(text) => Some(text),
            Value::Ref(name) => resolve_reference(&name, constants),
            _ => None,
        }
    }

    fn angle(&self, tag: &str, constants: &dyn Constants) -> Option<AngleUnit> {
        match self.get(tag)? {
            Value::Angle(angle) => Some(angle),
            Value::Ref(name) => parse_resolved(&name, constants, AngleUnit::parse),
            _ => None,
        }
    }

    fn range(&self, tag: &str, constants: &dyn Constants) -> Option<Range> {
        match self.get(tag)? {
            Value::Range(range) => Some(range),
            Value::Ref(name) => parse_resolved(&name, constants, Range::parse),
            _ => None,
        }
    }
}

fn resolve_reference(name: &str, constants: &dyn Constants) -> Option<String> {
    constants.resolve_constants(&format!("@{name}"))
}

fn parse_resolved<T>(
    name: &str,
    constants: &dyn Constants,
    parse: impl FnOnce(&str) -> Result<T>,
) -> Option<T> {
    let text = resolve_reference(name, constants)?;
    match parse(&text) {
        Ok(value) => Some(value),
        Err(err) => {
            error::report(err);
            None
        }
    }
}

/// Default [`PropertyContainer::try_set`]: canonical tags, then sub-property routes.
pub(crate) fn set_in<C>(container: &mut C, tag: &str, value: Option<Value>) -> Result<()>
where
    C: PropertyContainer + ?Sized,
{
    let schema = container.schema();

    if let Some(canonical) = schema.canonical(tag) {
        match value {
            None => {
                container.properties_mut().remove(canonical);
            }
            Some(value) => {
                let kind = schema
                    .kind(canonical)
                    .ok_or_else(|| Error::UnknownProperty(tag.to_owned()))?;
                let stored = kind.coerce(canonical, value)?;
                container.properties_mut().insert(canonical, stored);
            }
        }
        return Ok(());
    }

    let Some((parent, sub)) = schema.route(tag) else {
        return Err(Error::UnknownProperty(tag.to_owned()));
    };
    let kind: Kind = schema
        .kind(parent)
        .ok_or_else(|| Error::UnknownProperty(tag.to_owned()))?;

    let mut composite = match container.properties().get(parent) {
        Some(existing) => existing.clone(),
        None if value.is_none() => return Ok(()),
        None => kind
            .empty_composite()
            .ok_or_else(|| Error::UnknownProperty(tag.to_owned()))?,
    };
    let inner = composite
        .as_container_mut()
        .ok_or_else(|| Error::UnknownProperty(tag.to_owned()))?;
    inner.try_set(&sub, value)?;
    let empty = inner.is_empty();

    if empty {
        container.properties_mut().remove(parent);
    } else {
        container.properties_mut().insert(parent, composite);
    }
    Ok(())
}

/// Default [`PropertyContainer::get`].
pub(crate) fn get_in<C>(container: &C, tag: &str) -> Option<Value>
where
    C: PropertyContainer + ?Sized,
{
    let schema = container.schema();
    if let Some(canonical) = schema.canonical(tag) {
        return container.properties().get(canonical).cloned();
    }
    let (parent, sub) = schema.route(tag)?;
    container
        .properties()
        .get(parent)?
        .as_container()?
        .get(&sub)
}

/// Set every node of `object` on `container`, stopping at the first rejection.
pub fn fill_from_object<C>(container: &mut C, object: &DataObject) -> Result<()>
where
    C: PropertyContainer + ?Sized,
{
    for node in object.nodes() {
        container.try_set(&node.tag, Some(Value::from(node.value.clone())))?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// PropertyObject
// ---------------------------------------------------------------------------

/// A free-standing container over any schema (theme style rules, tests).
#[derive(Debug, Clone)]
pub struct PropertyObject {
    schema: &'static Schema,
    properties: Properties,
}

impl PropertyObject {
    pub fn new(schema: &'static Schema) -> Self {
        Self {
            schema,
            properties: Properties::new(),
        }
    }

    pub fn from_object(schema: &'static Schema, object: &DataObject) -> Result<Self> {
        let mut this = Self::new(schema);
        fill_from_object(&mut this, object)?;
        Ok(this)
    }

    /// Copy every entry of `other` over `self`.
    pub fn merge(&mut self, other: &PropertyObject) {
        self.properties.merge(&other.properties);
    }
}

impl PartialEq for PropertyObject {
    fn eq(&self, other: &Self) -> bool {
        self.schema.name() == other.schema.name() && self.properties == other.properties
    }
}

impl PropertyContainer for PropertyObject {
    fn schema(&self) -> &'static Schema {
        self.schema
    }

    fn properties(&self) -> &Properties {
        &self.properties
    }

    fn properties_mut(&mut self) -> &mut Properties {
        &mut self.properties
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use once_cell::sync::Lazy;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::property::enums;
    use crate::units::SizeUnit;

    static SCHEMA: Lazy<Schema> = Lazy::new(|| {
        Schema::new(
            "test",
            &[
                ("width", Kind::Size),
                ("color", Kind::Color),
                ("wrap", Kind::Enum(enums::LIST_WRAP)),
                ("margin", Kind::Bounds),
            ],
        )
        .with_aliases(&[("w", "width")])
        .with_routes(&[("margin", "margin")])
    });

    fn object() -> PropertyObject {
        PropertyObject::new(&SCHEMA)
    }

    #[test]
    fn set_get_remove() {
        let mut props = object();
        assert!(props.set("w", 10));
        assert_eq!(props.get("width"), Some(Value::Size(SizeUnit::px(10.0))));
        props.remove("width");
        assert_eq!(props.get("width"), None);
    }

    #[test]
    fn rejected_value_keeps_state() {
        let mut props = object();
        props.set("color", "red");
        let (accepted, errors) = error::capture(|| props.set("color", true));
        assert!(!accepted);
        assert_eq!(errors.len(), 1);
        assert_eq!(props.get("color"), Some(Value::Color(Color::RED)));
    }

    #[test]
    fn unknown_property() {
        let mut props = object();
        let (accepted, errors) = error::capture(|| props.set("nope", 1));
        assert!(!accepted);
        assert_eq!(errors, vec![Error::UnknownProperty("nope".into())]);
    }

    #[test]
    fn null_removes() {
        let mut props = object();
        props.set("width", 4);
        assert!(props.set_value("width", None));
        assert!(props.is_empty());
    }

    #[test]
    fn all_tags_keep_order() {
        let mut props = object();
        props.set("wrap", "on");
        props.set("width", 1);
        props.set("wrap", "off");
        assert_eq!(props.all_tags(), vec!["wrap".to_owned(), "width".to_owned()]);
    }

    #[test]
    fn routed_sub_property() {
        let mut props = object();
        assert!(props.set("margin-top", 4));
        assert_eq!(props.get("margin-top"), Some(Value::Size(SizeUnit::px(4.0))));
        assert!(matches!(props.get_raw("margin"), Some(Value::Bounds(_))));
        props.remove("margin-top");
        assert!(props.get_raw("margin").is_none());
    }

    #[test]
    fn typed_access_resolves_references() {
        let constants: HashMap<String, String> = HashMap::from([
            ("w".to_owned(), "12pt".to_owned()),
            ("c".to_owned(), "#ff2196f3".to_owned()),
            ("mode".to_owned(), "reverse".to_owned()),
        ]);
        let mut props = object();
        props.set("width", "@w");
        props.set("color", "@c");
        props.set("wrap", "@mode");
        assert_eq!(
            props.size("width", &constants),
            Some(SizeValue::Unit(SizeUnit::pt(12.0)))
        );
        assert_eq!(props.color("color", &constants), Some(Color(0xff2196f3)));
        assert_eq!(props.enum_index("wrap", &constants), Some(enums::WRAP_REVERSE));
    }
}
