//! Per-side sizes (margin, padding): [`BoundsProperty`] and the resolved [`Bounds`].

use std::fmt;

use once_cell::sync::Lazy;

use crate::data::DataObject;
use crate::error::{Error, Result};
use crate::property::kind::container_from_value;
use crate::property::{fill_from_object, Kind, Properties, PropertyContainer, Schema, Value};
use crate::theme::Constants;
use crate::units::SizeValue;

pub const TOP: &str = "top";
pub const RIGHT: &str = "right";
pub const BOTTOM: &str = "bottom";
pub const LEFT: &str = "left";

/// CSS order.
const SIDES: [&str; 4] = [TOP, RIGHT, BOTTOM, LEFT];

static SCHEMA: Lazy<Schema> = Lazy::new(|| {
    Schema::new(
        "bounds",
        &[
            (TOP, Kind::Size),
            (RIGHT, Kind::Size),
            (BOTTOM, Kind::Size),
            (LEFT, Kind::Size),
        ],
    )
});

/// A container of up to four side sizes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundsProperty {
    properties: Properties,
}

impl BoundsProperty {
    pub fn new() -> Self {
        Self::default()
    }

    /// The same size on every side.
    pub fn uniform(size: impl Into<Value>) -> Result<Self> {
        let size = size.into();
        let mut bounds = Self::new();
        for side in SIDES {
            bounds.try_set(side, Some(size.clone()))?;
        }
        Ok(bounds)
    }

    pub fn from_sides(
        top: impl Into<Value>,
        right: impl Into<Value>,
        bottom: impl Into<Value>,
        left: impl Into<Value>,
    ) -> Result<Self> {
        let mut bounds = Self::new();
        bounds.try_set(TOP, Some(top.into()))?;
        bounds.try_set(RIGHT, Some(right.into()))?;
        bounds.try_set(BOTTOM, Some(bottom.into()))?;
        bounds.try_set(LEFT, Some(left.into()))?;
        Ok(bounds)
    }

    pub fn from_object(object: &DataObject) -> Result<Self> {
        let mut bounds = Self::new();
        fill_from_object(&mut bounds, object)?;
        Ok(bounds)
    }

    /// Accepts bounds, one size for all sides, `"t,r,b,l"` text, or an object.
    pub(crate) fn try_from_value(tag: &str, value: Value) -> Result<Self> {
        match value {
            Value::Size(_) | Value::SizeFunc(_) | Value::Int(_) | Value::Float(_) | Value::Ref(_) => {
                Self::uniform(value)
            }
            Value::Text(ref text) if !text.trim_start().starts_with('_') => {
                let parts = split_sides(text);
                match parts.as_slice() {
                    [all] => Self::uniform(*all),
                    [top, right, bottom, left] => Self::from_sides(*top, *right, *bottom, *left),
                    _ => Err(Error::InvalidPropertyValue {
                        tag: tag.to_owned(),
                        value: text.clone(),
                    }),
                }
            }
            other => container_from_value(
                tag,
                other,
                |value| match value {
                    Value::Bounds(bounds) => Ok(bounds),
                    other => Err(other),
                },
                Self::from_object,
            ),
        }
    }

    /// Resolve every side; missing sides are `auto`.
    pub fn bounds(&self, constants: &dyn Constants) -> Bounds {
        let side = |tag| self.size(tag, constants).unwrap_or_default();
        Bounds {
            top: side(TOP),
            right: side(RIGHT),
            bottom: side(BOTTOM),
            left: side(LEFT),
        }
    }
}

/// Split on top-level commas, leaving expressions such as `min(1px, 2%)` whole.
pub(crate) fn split_sides(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (index, ch) in text.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => depth -= 1,
            ',' if depth == 0 => {
                parts.push(text[start..index].trim());
                start = index + 1;
            }
            _ => {}
        }
    }
    parts.push(text[start..].trim());
    parts
}

impl PropertyContainer for BoundsProperty {
    fn schema(&self) -> &'static Schema {
        &SCHEMA
    }

    fn properties(&self) -> &Properties {
        &self.properties
    }

    fn properties_mut(&mut self) -> &mut Properties {
        &mut self.properties
    }
}

impl fmt::Display for BoundsProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let terms: Vec<String> = SIDES
            .iter()
            .map(|side| {
                self.properties
                    .get(side)
                    .map(Value::to_string)
                    .unwrap_or_else(|| "auto".to_owned())
            })
            .collect();
        write_terms(f, &terms)
    }
}

fn write_terms(f: &mut fmt::Formatter<'_>, terms: &[String]) -> fmt::Result {
    if terms.iter().all(|term| *term == terms[0]) {
        f.write_str(&terms[0])
    } else {
        f.write_str(&terms.join(","))
    }
}

// ---------------------------------------------------------------------------
// Bounds
// ---------------------------------------------------------------------------

/// Resolved per-side sizes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bounds {
    pub top: SizeValue,
    pub right: SizeValue,
    pub bottom: SizeValue,
    pub left: SizeValue,
}

impl Bounds {
    pub fn all_equal(&self) -> bool {
        self.top == self.right && self.top == self.bottom && self.top == self.left
    }

    pub fn is_all_auto(&self) -> bool {
        [&self.top, &self.right, &self.bottom, &self.left]
            .iter()
            .all(|side| side.is_auto())
    }

    /// CSS value: one term when every side matches, otherwise four in CSS order.
    pub fn css_string(&self, auto_text: &str, constants: &dyn Constants) -> String {
        if self.all_equal() {
            return self.top.css_string(auto_text, constants);
        }
        [&self.top, &self.right, &self.bottom, &self.left]
            .iter()
            .map(|side| side.css_string(auto_text, constants))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let terms: Vec<String> = [&self.top, &self.right, &self.bottom, &self.left]
            .iter()
            .map(|side| side.to_string())
            .collect();
        write_terms(f, &terms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::SizeUnit;

    #[test]
    fn display_prunes_equal_sides() {
        let uniform = BoundsProperty::uniform(SizeUnit::px(4.0)).unwrap();
        assert_eq!(uniform.to_string(), "4px");
        assert_eq!(uniform.bounds(&()).to_string(), "4px");

        let mixed = BoundsProperty::from_sides(
            SizeUnit::px(4.0),
            SizeUnit::px(8.0),
            SizeUnit::px(4.0),
            SizeUnit::px(8.0),
        )
        .unwrap();
        assert_eq!(mixed.to_string(), "4px,8px,4px,8px");
        assert_eq!(mixed.bounds(&()).to_string(), "4px,8px,4px,8px");
    }

    #[test]
    fn css_keeps_four_distinct_terms() {
        let bounds = BoundsProperty::from_sides(4, 8, 4, 8).unwrap().bounds(&());
        assert_eq!(bounds.css_string("0", &()), "4px 8px 4px 8px");
    }

    #[test]
    fn text_forms() {
        let one = BoundsProperty::try_from_value("margin", "2em".into()).unwrap();
        assert!(one.bounds(&()).all_equal());

        let four = BoundsProperty::try_from_value("margin", "1px, 2px, 3px, min(4px, 1%)".into()).unwrap();
        assert!(matches!(four.bounds(&()).left, SizeValue::Func(_)));

        assert!(BoundsProperty::try_from_value("margin", "1px, 2px".into()).is_err());
    }

    #[test]
    fn object_form() {
        let object = DataObject::new("_").with("top", "1px").with("left", "@gap");
        let bounds = BoundsProperty::try_from_value("padding", Value::Object(object)).unwrap();
        assert_eq!(bounds.get("left"), Some(Value::Ref("gap".into())));
        assert_eq!(bounds.bounds(&()).right, SizeValue::Unit(SizeUnit::auto()));
    }

    #[test]
    fn text_round_trip() {
        let bounds = BoundsProperty::from_sides(1, 2, 3, 4).unwrap();
        let parsed = BoundsProperty::try_from_value("margin", bounds.to_string().into()).unwrap();
        assert_eq!(parsed, bounds);
    }
}
