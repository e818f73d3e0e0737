//! Keyframe animations and property transitions.

use std::sync::atomic::{AtomicU64, Ordering};

use once_cell::sync::Lazy;

use crate::data::{DataObject, DataValue};
use crate::error::{Error, Result};
use crate::property::{enums, set_in, Kind, Properties, PropertyContainer, Schema, Value};
use crate::theme::Constants;
use crate::units::fmt_number;

pub const ID: &str = "id";
pub const DURATION: &str = "duration";
pub const DELAY: &str = "delay";
pub const TIMING_FUNCTION: &str = "timing-function";
pub const ITERATION_COUNT: &str = "iteration-count";
pub const DIRECTION: &str = "direction";
pub const PROPERTY: &str = "property";

pub const EASE: &str = "ease";
pub const EASE_IN: &str = "ease-in";
pub const EASE_OUT: &str = "ease-out";
pub const EASE_IN_OUT: &str = "ease-in-out";
pub const LINEAR: &str = "linear";

static SCHEMA: Lazy<Schema> = Lazy::new(|| {
    Schema::new(
        "animation",
        &[
            (ID, Kind::Text),
            (DURATION, Kind::Float(Some((0.0, f64::MAX)))),
            (DELAY, Kind::Float(None)),
            (TIMING_FUNCTION, Kind::Text),
            (ITERATION_COUNT, Kind::Int),
            (DIRECTION, Kind::Enum(enums::ANIMATION_DIRECTION)),
        ],
    )
    .with_aliases(&[("timing", TIMING_FUNCTION), ("iterations", ITERATION_COUNT)])
});

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

fn generated_id() -> String {
    format!("ruiAnimation{}", NEXT_ID.fetch_add(1, Ordering::Relaxed))
}

/// Whether `text` is a timing function the browser understands.
fn valid_timing_function(text: &str) -> bool {
    let text = text.trim();
    if [EASE, EASE_IN, EASE_OUT, EASE_IN_OUT, LINEAR].contains(&text) {
        return true;
    }
    let args = |name: &str| {
        text.strip_prefix(name)
            .and_then(|rest| rest.strip_prefix('('))
            .and_then(|rest| rest.strip_suffix(')'))
            .map(|args| args.split(',').map(str::trim).collect::<Vec<_>>())
    };
    if let Some(args) = args("steps") {
        return args.len() == 1 && args[0].parse::<u32>().is_ok_and(|n| n > 0);
    }
    if let Some(args) = args("cubic-bezier") {
        return args.len() == 4 && args.iter().all(|arg| arg.parse::<f64>().is_ok());
    }
    false
}

/// One animated property: start and end values plus intermediate frames.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimatedProperty {
    pub tag: String,
    pub from: Value,
    pub to: Value,
    /// `(percent, value)` frames strictly between 0 and 100.
    pub key_frames: Vec<(u32, Value)>,
}

impl AnimatedProperty {
    pub fn new(tag: impl Into<String>, from: impl Into<Value>, to: impl Into<Value>) -> Self {
        Self {
            tag: tag.into(),
            from: from.into(),
            to: to.into(),
            key_frames: Vec::new(),
        }
    }

    pub fn with_frame(mut self, percent: u32, value: impl Into<Value>) -> Self {
        self.key_frames.push((percent, value.into()));
        self.key_frames.sort_by_key(|(percent, _)| *percent);
        self
    }

    fn from_object(object: &DataObject) -> Result<Self> {
        let required = |key: &str| {
            object.get(key).cloned().ok_or_else(|| Error::MissingKey {
                tag: PROPERTY.to_owned(),
                key: key.to_owned(),
            })
        };
        let tag = match required("tag")? {
            DataValue::Text(tag) => tag,
            _ => return Err(Error::invalid("animated property", object.to_string())),
        };
        let mut property = Self::new(tag, Value::from(required("from")?), Value::from(required("to")?));

        let frames = object.get("key-frames").or_else(|| object.get("keyframes"));
        if let Some(DataValue::Object(frames)) = frames {
            for node in frames.nodes() {
                let percent: u32 = node
                    .tag
                    .trim()
                    .trim_end_matches('%')
                    .parse()
                    .map_err(|_| Error::invalid("key frame", node.tag.as_str()))?;
                if !(1..100).contains(&percent) {
                    return Err(Error::invalid("key frame", node.tag.as_str()));
                }
                property = property.with_frame(percent, Value::from(node.value.clone()));
            }
        }
        Ok(property)
    }

    fn to_data_object(&self) -> DataObject {
        let mut object = DataObject::new("_")
            .with("tag", self.tag.as_str())
            .with("from", self.from.to_data_value())
            .with("to", self.to.to_data_value());
        if !self.key_frames.is_empty() {
            let mut frames = DataObject::new("_");
            for (percent, value) in &self.key_frames {
                frames.set(percent.to_string(), value.to_data_value());
            }
            object.set("key-frames", frames);
        }
        object
    }
}

/// An animation (`@keyframes` plus the `animation` shorthand) or, without
/// animated properties, a transition.
#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    properties: Properties,
    animated: Vec<AnimatedProperty>,
}

impl Default for Animation {
    fn default() -> Self {
        Self::new()
    }
}

impl Animation {
    /// An empty animation with a generated id.
    pub fn new() -> Self {
        let mut properties = Properties::new();
        properties.insert(ID, Value::Text(generated_id()));
        Self {
            properties,
            animated: Vec::new(),
        }
    }

    /// A transition: `duration` seconds with a timing function.
    pub fn transition(duration: f64, timing_function: &str) -> Result<Self> {
        let mut animation = Self::new();
        animation.try_set(DURATION, Some(Value::Float(duration)))?;
        animation.try_set(TIMING_FUNCTION, Some(timing_function.into()))?;
        Ok(animation)
    }

    pub fn from_object(object: &DataObject) -> Result<Self> {
        let mut animation = Self::new();
        for node in object.nodes() {
            if node.tag == PROPERTY {
                match &node.value {
                    DataValue::Object(property) => {
                        animation.animated.push(AnimatedProperty::from_object(property)?);
                    }
                    DataValue::Array(items) => {
                        for item in items {
                            let property = item.as_object().ok_or_else(|| {
                                Error::invalid("animated property", item.to_string())
                            })?;
                            animation.animated.push(AnimatedProperty::from_object(property)?);
                        }
                    }
                    DataValue::Text(text) => {
                        return Err(Error::invalid("animated property", text.as_str()));
                    }
                }
            } else {
                animation.try_set(&node.tag, Some(Value::from(node.value.clone())))?;
            }
        }
        Ok(animation)
    }

    pub fn with_property(mut self, property: AnimatedProperty) -> Self {
        self.animated.push(property);
        self
    }

    pub fn animated_properties(&self) -> &[AnimatedProperty] {
        &self.animated
    }

    pub fn id(&self) -> &str {
        match self.properties.get(ID) {
            Some(Value::Text(id)) => id,
            _ => "",
        }
    }

    fn seconds(&self, tag: &str, constants: &dyn Constants) -> f64 {
        self.float(tag, constants).unwrap_or(0.0)
    }

    fn timing(&self, constants: &dyn Constants) -> String {
        self.text(TIMING_FUNCTION, constants)
            .filter(|text| valid_timing_function(text))
            .unwrap_or_else(|| EASE.to_owned())
    }

    /// `tag duration timing[ delay]` for one entry of `transition`.
    pub fn transition_css(&self, tag: &str, constants: &dyn Constants) -> String {
        let mut css = format!(
            "{tag} {}s {}",
            fmt_number(self.seconds(DURATION, constants)),
            self.timing(constants)
        );
        let delay = self.seconds(DELAY, constants);
        if delay != 0.0 {
            css.push_str(&format!(" {}s", fmt_number(delay)));
        }
        css
    }

    /// The `animation` shorthand: `id duration timing delay count direction`.
    pub fn animation_css(&self, constants: &dyn Constants) -> String {
        let iterations = match self.int(ITERATION_COUNT, constants) {
            Some(count) if count <= 0 => "infinite".to_owned(),
            Some(count) => count.to_string(),
            None => "1".to_owned(),
        };
        let direction = self
            .enum_index(DIRECTION, constants)
            .and_then(|index| enums::ANIMATION_DIRECTION.get(index))
            .copied()
            .unwrap_or("normal");
        format!(
            "{} {}s {} {}s {} {}",
            self.id(),
            fmt_number(self.seconds(DURATION, constants)),
            self.timing(constants),
            fmt_number(self.seconds(DELAY, constants)),
            iterations,
            direction
        )
    }

    /// Frames as `(percent, [(tag, value)])`, ascending, for `@keyframes`.
    pub fn frames(&self) -> Vec<(u32, Vec<(&str, &Value)>)> {
        fn add<'a>(
            frames: &mut Vec<(u32, Vec<(&'a str, &'a Value)>)>,
            percent: u32,
            tag: &'a str,
            value: &'a Value,
        ) {
            match frames.iter_mut().find(|(p, _)| *p == percent) {
                Some((_, entries)) => entries.push((tag, value)),
                None => frames.push((percent, vec![(tag, value)])),
            }
        }

        let mut frames = Vec::new();
        for property in &self.animated {
            add(&mut frames, 0, &property.tag, &property.from);
            for (percent, value) in &property.key_frames {
                add(&mut frames, *percent, &property.tag, value);
            }
            add(&mut frames, 100, &property.tag, &property.to);
        }
        frames.sort_by_key(|(percent, _)| *percent);
        frames
    }
}

impl PropertyContainer for Animation {
    fn schema(&self) -> &'static Schema {
        &SCHEMA
    }

    fn properties(&self) -> &Properties {
        &self.properties
    }

    fn properties_mut(&mut self) -> &mut Properties {
        &mut self.properties
    }

    /// Timing functions are checked; removing the id generates a new one.
    fn try_set(&mut self, tag: &str, value: Option<Value>) -> Result<()> {
        let canonical = SCHEMA.canonical(tag);
        if canonical == Some(TIMING_FUNCTION) {
            if let Some(Value::Text(text)) = &value {
                if !text.starts_with('@') && !valid_timing_function(text) {
                    return Err(Error::InvalidPropertyValue {
                        tag: TIMING_FUNCTION.to_owned(),
                        value: text.clone(),
                    });
                }
            }
        }
        set_in(self, tag, value)?;
        if canonical == Some(ID) && !self.properties.contains(ID) {
            self.properties.insert(ID, Value::Text(generated_id()));
        }
        Ok(())
    }

    fn to_data_object(&self) -> DataObject {
        let mut object = DataObject::new("_");
        for (tag, value) in self.properties.iter() {
            object.set(tag, value.to_data_value());
        }
        if !self.animated.is_empty() {
            let items = self
                .animated
                .iter()
                .map(|property| DataValue::Object(property.to_data_object()))
                .collect();
            object.set(PROPERTY, DataValue::Array(items));
        }
        object
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::parse_data_text;

    #[test]
    fn timing_functions() {
        assert!(valid_timing_function("ease-in-out"));
        assert!(valid_timing_function("steps(4)"));
        assert!(valid_timing_function("cubic-bezier(0.1, 0.7, 1.0, 0.1)"));
        assert!(!valid_timing_function("steps(0)"));
        assert!(!valid_timing_function("bounce"));

        let mut animation = Animation::new();
        assert!(!animation.set(TIMING_FUNCTION, "bounce"));
    }

    #[test]
    fn transition_css() {
        let mut transition = Animation::transition(0.5, LINEAR).unwrap();
        assert_eq!(transition.transition_css("width", &()), "width 0.5s linear");
        transition.set(DELAY, 1);
        assert_eq!(transition.transition_css("width", &()), "width 0.5s linear 1s");
    }

    #[test]
    fn animation_shorthand() {
        let mut animation = Animation::new();
        animation.set(ID, "spin");
        animation.set(DURATION, 2);
        animation.set(ITERATION_COUNT, -1);
        animation.set(DIRECTION, "alternate");
        assert_eq!(animation.animation_css(&()), "spin 2s ease 0s infinite alternate");
    }

    #[test]
    fn generated_ids_are_unique() {
        let a = Animation::new();
        let b = Animation::new();
        assert_ne!(a.id(), b.id());
        assert!(a.id().starts_with("ruiAnimation"));
    }

    #[test]
    fn frames_from_object() {
        let object = parse_data_text(
            "_ { id = grow, duration = 1, property = _ { tag = width, from = 10px, to = 30px, key-frames = _ { 50 = 25px } } }",
        )
        .unwrap();
        let animation = Animation::from_object(&object).unwrap();
        assert_eq!(animation.id(), "grow");
        let frames = animation.frames();
        assert_eq!(frames.iter().map(|(p, _)| *p).collect::<Vec<_>>(), vec![0, 50, 100]);
        assert_eq!(frames[1].1, vec![("width", &Value::Text("25px".into()))]);

        let written = animation.to_data_object();
        let reparsed = Animation::from_object(&written).unwrap();
        assert_eq!(reparsed, animation);
    }

    #[test]
    fn builder_frames() {
        let animation = Animation::new().with_property(
            AnimatedProperty::new("opacity", 0.0, 1.0).with_frame(30, 0.8),
        );
        let frames = animation.frames();
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[2].1, vec![("opacity", &Value::Float(1.0))]);
    }
}
