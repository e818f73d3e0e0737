//! Borders: the per-side [`BorderProperty`] and its resolved [`ViewBorders`].

use std::fmt;

use once_cell::sync::Lazy;

use super::bounds::{BOTTOM, LEFT, RIGHT, TOP};
use crate::data::DataObject;
use crate::error::{Error, Result};
use crate::property::kind::container_from_value;
use crate::property::{
    enums, fill_from_object, set_in, Kind, Properties, PropertyContainer, Schema, Value,
};
use crate::theme::Constants;
use crate::units::{Color, SizeUnit, SizeValue};

pub const STYLE: &str = "style";
pub const WIDTH: &str = "width";
pub const COLOR: &str = "color";

const SIDES: [&str; 4] = [TOP, RIGHT, BOTTOM, LEFT];
const KNOBS: [&str; 3] = [STYLE, WIDTH, COLOR];

fn knob_kind(knob: &str) -> Kind {
    match knob {
        STYLE => Kind::Enum(enums::BORDER_STYLE),
        WIDTH => Kind::Size,
        _ => Kind::Color,
    }
}

static SCHEMA: Lazy<Schema> = Lazy::new(|| {
    let side_tags = [
        "top-style",
        "top-width",
        "top-color",
        "right-style",
        "right-width",
        "right-color",
        "bottom-style",
        "bottom-width",
        "bottom-color",
        "left-style",
        "left-width",
        "left-color",
    ];
    let mut kinds: Vec<(&'static str, Kind)> =
        KNOBS.iter().map(|knob| (*knob, knob_kind(knob))).collect();
    for tag in side_tags {
        let knob = tag.rsplit('-').next().unwrap_or(tag);
        kinds.push((tag, knob_kind(knob)));
    }
    Schema::new("border", &kinds).with_aliases(&[
        ("style-top", "top-style"),
        ("style-right", "right-style"),
        ("style-bottom", "bottom-style"),
        ("style-left", "left-style"),
        ("width-top", "top-width"),
        ("width-right", "right-width"),
        ("width-bottom", "bottom-width"),
        ("width-left", "left-width"),
        ("color-top", "top-color"),
        ("color-right", "right-color"),
        ("color-bottom", "bottom-color"),
        ("color-left", "left-color"),
    ])
});

/// Split `"1px solid red"` into `(knob, value)` pairs.
///
/// Each word is tried as a line style, then a color, then a size.
pub(crate) fn parse_line_text(tag: &str, text: &str) -> Result<Vec<(&'static str, Value)>> {
    let mut knobs = Vec::new();
    for word in text.split_whitespace() {
        let knob = if let Some(name) = word.strip_prefix('@') {
            // References are read as widths.
            knobs.push((WIDTH, Value::Ref(name.to_owned())));
            continue;
        } else if enums::index_of(enums::BORDER_STYLE, word).is_some() {
            STYLE
        } else if Color::parse(word).is_ok() {
            COLOR
        } else if SizeUnit::parse(word).is_ok() {
            WIDTH
        } else {
            return Err(Error::InvalidPropertyValue {
                tag: tag.to_owned(),
                value: text.to_owned(),
            });
        };
        knobs.push((knob, Value::from(word)));
    }
    if knobs.is_empty() {
        return Err(Error::InvalidPropertyValue {
            tag: tag.to_owned(),
            value: text.to_owned(),
        });
    }
    Ok(knobs)
}

/// Write `width style color` for whichever of the three uniform knobs are set.
pub(crate) fn write_line_text(
    f: &mut fmt::Formatter<'_>,
    properties: &Properties,
) -> fmt::Result {
    let mut words = Vec::new();
    if let Some(width) = properties.get(WIDTH) {
        words.push(width.to_string());
    }
    if let Some(style) = properties.get(STYLE) {
        words.push(match style {
            Value::Int(index) => enums::BORDER_STYLE
                .get(*index as usize)
                .map(|name| name.to_string())
                .unwrap_or_else(|| style.to_string()),
            other => other.to_string(),
        });
    }
    if let Some(color) = properties.get(COLOR) {
        words.push(color.to_string());
    }
    f.write_str(&words.join(" "))
}

/// Border lines for the four sides.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BorderProperty {
    properties: Properties,
}

impl BorderProperty {
    pub fn new() -> Self {
        Self::default()
    }

    /// The same line on every side.
    pub fn line(style: usize, width: impl Into<Value>, color: impl Into<Value>) -> Result<Self> {
        let mut border = Self::new();
        border.try_set(STYLE, Some(Value::from(style)))?;
        border.try_set(WIDTH, Some(width.into()))?;
        border.try_set(COLOR, Some(color.into()))?;
        Ok(border)
    }

    pub fn from_object(object: &DataObject) -> Result<Self> {
        let mut border = Self::new();
        fill_from_object(&mut border, object)?;
        Ok(border)
    }

    /// Accepts a border, `"1px solid red"` text, or an object.
    pub(crate) fn try_from_value(tag: &str, value: Value) -> Result<Self> {
        match value {
            Value::Text(ref text) if !text.trim_start().starts_with('_') => {
                let mut border = Self::new();
                for (knob, value) in parse_line_text(tag, text)? {
                    border.try_set(knob, Some(value))?;
                }
                Ok(border)
            }
            other => container_from_value(
                tag,
                other,
                |value| match value {
                    Value::Border(border) => Ok(border),
                    other => Err(other),
                },
                Self::from_object,
            ),
        }
    }

    /// Resolve all four sides; a side knob falls back to the uniform one.
    pub fn view_borders(&self, constants: &dyn Constants) -> ViewBorders {
        let side = |side: &str| {
            let tag = |knob: &str| {
                let specific = format!("{side}-{knob}");
                if self.properties.contains(&specific) {
                    specific
                } else {
                    knob.to_owned()
                }
            };
            ViewBorder {
                style: self.enum_index(&tag(STYLE), constants).unwrap_or(enums::NONE_LINE),
                width: self.size(&tag(WIDTH), constants).unwrap_or_default(),
                color: self.color(&tag(COLOR), constants).unwrap_or(Color::TRANSPARENT),
            }
        };
        ViewBorders {
            top: side(TOP),
            right: side(RIGHT),
            bottom: side(BOTTOM),
            left: side(LEFT),
        }
    }
}

impl PropertyContainer for BorderProperty {
    fn schema(&self) -> &'static Schema {
        &SCHEMA
    }

    fn properties(&self) -> &Properties {
        &self.properties
    }

    fn properties_mut(&mut self) -> &mut Properties {
        &mut self.properties
    }

    /// Setting a uniform knob drops the per-side values of that knob.
    fn try_set(&mut self, tag: &str, value: Option<Value>) -> Result<()> {
        let canonical = SCHEMA.canonical(tag);
        set_in(self, tag, value)?;
        if let Some(knob) = canonical.filter(|tag| KNOBS.contains(tag)) {
            for side in SIDES {
                self.properties.remove(&format!("{side}-{knob}"));
            }
        }
        Ok(())
    }
}

impl fmt::Display for BorderProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.properties.tags().all(|tag| KNOBS.contains(&tag)) && !self.properties.is_empty() {
            write_line_text(f, &self.properties)
        } else {
            self.to_data_object().fmt(f)
        }
    }
}

// ---------------------------------------------------------------------------
// Resolved borders
// ---------------------------------------------------------------------------

/// One resolved border line.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewBorder {
    /// Index into [`enums::BORDER_STYLE`].
    pub style: usize,
    pub width: SizeValue,
    pub color: Color,
}

impl Default for ViewBorder {
    fn default() -> Self {
        Self {
            style: enums::NONE_LINE,
            width: SizeValue::default(),
            color: Color::TRANSPARENT,
        }
    }
}

impl ViewBorder {
    pub fn style_name(&self) -> &'static str {
        enums::BORDER_STYLE
            .get(self.style)
            .copied()
            .unwrap_or("none")
    }

    /// `width style color`, the `outline`/`column-rule` shorthand.
    pub fn css_string(&self, constants: &dyn Constants) -> String {
        if self.style == enums::NONE_LINE {
            return "none".to_owned();
        }
        let mut words = Vec::with_capacity(3);
        if !self.width.is_auto() {
            words.push(self.width.css_string("0", constants));
        }
        words.push(self.style_name().to_owned());
        if self.color.alpha() != 0 {
            words.push(self.color.css_string());
        }
        words.join(" ")
    }
}

/// The four resolved border lines.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewBorders {
    pub top: ViewBorder,
    pub right: ViewBorder,
    pub bottom: ViewBorder,
    pub left: ViewBorder,
}

impl ViewBorders {
    fn sides(&self) -> [&ViewBorder; 4] {
        [&self.top, &self.right, &self.bottom, &self.left]
    }

    /// One value when all sides agree, otherwise four in CSS order.
    fn collapse(values: [String; 4]) -> String {
        if values.iter().all(|value| *value == values[0]) {
            values[0].clone()
        } else {
            values.join(" ")
        }
    }

    pub fn all_none(&self) -> bool {
        self.sides().iter().all(|side| side.style == enums::NONE_LINE)
    }

    pub fn css_style(&self) -> String {
        Self::collapse(self.sides().map(|side| side.style_name().to_owned()))
    }

    /// `None` when no side has a width.
    pub fn css_width(&self, constants: &dyn Constants) -> Option<String> {
        if self.sides().iter().all(|side| side.width.is_auto()) {
            return None;
        }
        Some(Self::collapse(
            self.sides().map(|side| side.width.css_string("0", constants)),
        ))
    }

    /// `None` when every side is transparent.
    pub fn css_color(&self) -> Option<String> {
        if self.sides().iter().all(|side| side.color.alpha() == 0) {
            return None;
        }
        Some(Self::collapse(self.sides().map(|side| side.color.css_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_knob_clears_sides() {
        let mut border = BorderProperty::new();
        border.set("left-color", "red");
        border.set("top-width", 2);
        border.set(COLOR, "blue");
        assert_eq!(
            border.all_tags(),
            vec!["top-width".to_owned(), COLOR.to_owned()]
        );
    }

    #[test]
    fn side_overrides_uniform() {
        let mut border = BorderProperty::line(enums::SOLID_LINE, 1, "black").unwrap();
        border.set("left-style", "dashed");
        border.set("left-width", 3);
        let borders = border.view_borders(&());
        assert_eq!(borders.css_style(), "solid solid solid dashed");
        assert_eq!(borders.css_width(&()).as_deref(), Some("1px 1px 1px 3px"));
        assert_eq!(borders.css_color().as_deref(), Some("rgb(0,0,0)"));
    }

    #[test]
    fn text_form() {
        let border = BorderProperty::try_from_value("border", "1px solid red".into()).unwrap();
        let borders = border.view_borders(&());
        assert_eq!(borders.top.style, enums::SOLID_LINE);
        assert_eq!(borders.left.color, Color::RED);
        assert_eq!(border.to_string(), "1px solid #ffff0000");
        assert!(BorderProperty::try_from_value("border", "1px wobbly".into()).is_err());
    }

    #[test]
    fn empty_border_resolves_to_none() {
        let borders = BorderProperty::new().view_borders(&());
        assert!(borders.all_none());
        assert_eq!(borders.css_width(&()), None);
        assert_eq!(borders.css_color(), None);
    }

    #[test]
    fn line_shorthand() {
        let line = ViewBorder {
            style: enums::SOLID_LINE,
            width: SizeValue::Unit(SizeUnit::px(2.0)),
            color: Color::BLUE,
        };
        assert_eq!(line.css_string(&()), "2px solid rgb(0,0,255)");
        assert_eq!(ViewBorder::default().css_string(&()), "none");
    }
}
