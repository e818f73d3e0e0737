//! Single-line composites: [`OutlineProperty`] and [`ColumnSeparatorProperty`].
//!
//! Both carry `style`, `width` and `color` and resolve to a [`ViewBorder`].

use std::fmt;

use once_cell::sync::Lazy;

use super::border::{parse_line_text, write_line_text, ViewBorder, COLOR, STYLE, WIDTH};
use crate::data::DataObject;
use crate::error::Result;
use crate::property::kind::container_from_value;
use crate::property::{enums, fill_from_object, Kind, Properties, PropertyContainer, Schema, Value};
use crate::theme::Constants;
use crate::units::Color;

fn line_schema(name: &'static str) -> Schema {
    Schema::new(
        name,
        &[
            (STYLE, Kind::Enum(enums::BORDER_STYLE)),
            (WIDTH, Kind::Size),
            (COLOR, Kind::Color),
        ],
    )
}

static OUTLINE_SCHEMA: Lazy<Schema> = Lazy::new(|| line_schema("outline"));
static COLUMN_SEPARATOR_SCHEMA: Lazy<Schema> = Lazy::new(|| line_schema("column-separator"));

macro_rules! line_property {
    ($(#[$meta:meta])* $name:ident, $schema:ident, $variant:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq)]
        pub struct $name {
            properties: Properties,
        }

        impl $name {
            pub fn new() -> Self {
                Self::default()
            }

            pub fn line(
                style: usize,
                width: impl Into<Value>,
                color: impl Into<Value>,
            ) -> Result<Self> {
                let mut line = Self::new();
                line.try_set(STYLE, Some(Value::from(style)))?;
                line.try_set(WIDTH, Some(width.into()))?;
                line.try_set(COLOR, Some(color.into()))?;
                Ok(line)
            }

            pub fn from_object(object: &DataObject) -> Result<Self> {
                let mut line = Self::new();
                fill_from_object(&mut line, object)?;
                Ok(line)
            }

            /// Accepts the composite, `"1px solid red"` text, or an object.
            pub(crate) fn try_from_value(tag: &str, value: Value) -> Result<Self> {
                match value {
                    Value::Text(ref text) if !text.trim_start().starts_with('_') => {
                        let mut line = Self::new();
                        for (knob, value) in parse_line_text(tag, text)? {
                            line.try_set(knob, Some(value))?;
                        }
                        Ok(line)
                    }
                    other => container_from_value(
                        tag,
                        other,
                        |value| match value {
                            Value::$variant(line) => Ok(line),
                            other => Err(other),
                        },
                        Self::from_object,
                    ),
                }
            }

            pub fn view_line(&self, constants: &dyn Constants) -> ViewBorder {
                ViewBorder {
                    style: self.enum_index(STYLE, constants).unwrap_or(enums::NONE_LINE),
                    width: self.size(WIDTH, constants).unwrap_or_default(),
                    color: self.color(COLOR, constants).unwrap_or(Color::TRANSPARENT),
                }
            }
        }

        impl PropertyContainer for $name {
            fn schema(&self) -> &'static Schema {
                &$schema
            }

            fn properties(&self) -> &Properties {
                &self.properties
            }

            fn properties_mut(&mut self) -> &mut Properties {
                &mut self.properties
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write_line_text(f, &self.properties)
            }
        }
    };
}

line_property!(
    /// The `outline` of a view (`outline-offset` is a separate view property).
    OutlineProperty,
    OUTLINE_SCHEMA,
    Outline
);

line_property!(
    /// The rule drawn between columns of a column layout (`column-rule`).
    ColumnSeparatorProperty,
    COLUMN_SEPARATOR_SCHEMA,
    ColumnSeparator
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn outline_css() {
        let outline = OutlineProperty::line(enums::SOLID_LINE, 2, "red").unwrap();
        assert_eq!(outline.view_line(&()).css_string(&()), "2px solid rgb(255,0,0)");
        assert_eq!(outline.to_string(), "2px solid #ffff0000");
    }

    #[test]
    fn separator_from_text_and_object() {
        let text = ColumnSeparatorProperty::try_from_value("column-separator", "dotted 1px".into())
            .unwrap();
        assert_eq!(text.view_line(&()).style, 3);

        let object = DataObject::new("_").with("style", "double").with("color", "@line");
        let parsed =
            ColumnSeparatorProperty::try_from_value("column-separator", Value::Object(object))
                .unwrap();
        assert_eq!(parsed.get(COLOR), Some(Value::Ref("line".into())));
    }

    #[test]
    fn unknown_knob() {
        let mut outline = OutlineProperty::new();
        assert_eq!(
            outline.try_set("offset", Some(Value::Int(1))),
            Err(Error::UnknownProperty("offset".into()))
        );
    }
}
