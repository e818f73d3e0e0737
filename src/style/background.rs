//! Background layers: images and linear, radial and conic gradients.

use std::fmt;

use once_cell::sync::Lazy;

use super::bounds::split_sides;
use crate::data::{DataObject, DataValue};
use crate::error::{self, Error, Result};
use crate::property::{
    enums, fill_from_object, set_in, Kind, Properties, PropertyContainer, Schema, Value,
};
use crate::theme::Constants;
use crate::units::{AngleUnit, Color, SizeValue};

pub const SRC: &str = "src";
pub const FIT: &str = "fit";
pub const WIDTH: &str = "width";
pub const HEIGHT: &str = "height";
pub const REPEAT: &str = "repeat";
pub const ATTACHMENT: &str = "attachment";
pub const X: &str = "x";
pub const Y: &str = "y";
pub const DIRECTION: &str = "direction";
pub const REPEATING: &str = "repeating";
pub const GRADIENT: &str = "gradient";
pub const SHAPE: &str = "shape";
pub const RADIUS: &str = "radius";
pub const CENTER_X: &str = "center-x";
pub const CENTER_Y: &str = "center-y";
pub const FROM: &str = "from";

static IMAGE_SCHEMA: Lazy<Schema> = Lazy::new(|| {
    Schema::new(
        "image",
        &[
            (SRC, Kind::Text),
            (FIT, Kind::Enum(enums::BACKGROUND_FIT)),
            (WIDTH, Kind::Size),
            (HEIGHT, Kind::Size),
            (REPEAT, Kind::Enum(enums::BACKGROUND_REPEAT)),
            (ATTACHMENT, Kind::Enum(enums::BACKGROUND_ATTACHMENT)),
            (X, Kind::Size),
            (Y, Kind::Size),
        ],
    )
    .with_aliases(&[("image", SRC), ("url", SRC)])
});

static LINEAR_SCHEMA: Lazy<Schema> = Lazy::new(|| {
    Schema::new(
        "linear-gradient",
        &[
            (DIRECTION, Kind::Angle),
            (REPEATING, Kind::Bool),
            (GRADIENT, Kind::Gradient),
        ],
    )
});

static RADIAL_SCHEMA: Lazy<Schema> = Lazy::new(|| {
    Schema::new(
        "radial-gradient",
        &[
            (SHAPE, Kind::Enum(enums::RADIAL_SHAPE)),
            (RADIUS, Kind::Size),
            (CENTER_X, Kind::Size),
            (CENTER_Y, Kind::Size),
            (REPEATING, Kind::Bool),
            (GRADIENT, Kind::Gradient),
        ],
    )
});

static CONIC_SCHEMA: Lazy<Schema> = Lazy::new(|| {
    Schema::new(
        "conic-gradient",
        &[
            (FROM, Kind::Angle),
            (CENTER_X, Kind::Size),
            (CENTER_Y, Kind::Size),
            (REPEATING, Kind::Bool),
            (GRADIENT, Kind::Gradient),
        ],
    )
});

// ---------------------------------------------------------------------------
// GradientPoint
// ---------------------------------------------------------------------------

/// One color stop: a color (or `@name`) and an optional position.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientPoint {
    pub color: Value,
    /// A size, an angle (conic gradients), or a reference.
    pub pos: Option<Value>,
}

impl GradientPoint {
    pub fn new(color: impl Into<Value>) -> Self {
        Self {
            color: color.into(),
            pos: None,
        }
    }

    pub fn at(color: impl Into<Value>, pos: impl Into<Value>) -> Self {
        Self {
            color: color.into(),
            pos: Some(pos.into()),
        }
    }

    fn parse_color(text: &str) -> Result<Value> {
        match text.trim().strip_prefix('@') {
            Some(name) => Ok(Value::Ref(name.to_owned())),
            None => Color::parse(text).map(Value::Color),
        }
    }

    fn parse_pos(text: &str) -> Result<Value> {
        let text = text.trim();
        if let Some(name) = text.strip_prefix('@') {
            return Ok(Value::Ref(name.to_owned()));
        }
        let lower = text.to_ascii_lowercase();
        if ["deg", "rad", "turn", "°", "π"].iter().any(|suffix| lower.ends_with(suffix)) {
            return AngleUnit::parse(text).map(Value::Angle);
        }
        SizeValue::parse(text).map(Value::from)
    }

    /// `"red"`, `"#ff0000ff 50%"`, `"@accent 10px"`.
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim();
        if let Some((head, tail)) = text.rsplit_once(char::is_whitespace) {
            if let (Ok(color), Ok(pos)) = (Self::parse_color(head), Self::parse_pos(tail)) {
                return Ok(Self {
                    color,
                    pos: Some(pos),
                });
            }
        }
        Ok(Self::new(Self::parse_color(text)?))
    }

    /// Parse a textual color or position given to [`GradientPoint::new`] or [`GradientPoint::at`].
    fn normalized(self) -> Result<Self> {
        let color = match self.color {
            Value::Text(text) => Self::parse_color(&text)?,
            color => color,
        };
        let pos = match self.pos {
            Some(Value::Text(text)) => Some(Self::parse_pos(&text)?),
            Some(Value::Int(v)) => Some(Value::Size(crate::units::SizeUnit::px(v as f64))),
            pos => pos,
        };
        Ok(Self { color, pos })
    }

    fn from_value(tag: &str, value: Value) -> Result<Self> {
        match value {
            Value::Color(_) | Value::Ref(_) => Ok(Self::new(value)),
            Value::Int(v) if (0..=u32::MAX as i64).contains(&v) => Ok(Self::new(Color(v as u32))),
            Value::Text(text) => Self::parse(&text),
            Value::Object(object) => {
                let color = object
                    .property_value("color")
                    .ok_or_else(|| Error::MissingKey {
                        tag: tag.to_owned(),
                        key: "color".to_owned(),
                    })?;
                let mut point = Self::new(Self::parse_color(color)?);
                if let Some(pos) = object.property_value("pos") {
                    point.pos = Some(Self::parse_pos(pos)?);
                }
                Ok(point)
            }
            other => Err(Error::NotCompatibleType {
                tag: tag.to_owned(),
                found: other.type_name(),
            }),
        }
    }

    /// Accepts stops, a list of colors/stop text/objects, or `"red, blue 50%"` text.
    pub(crate) fn list_from_value(tag: &str, value: Value) -> Result<Vec<GradientPoint>> {
        let points = match value {
            Value::Gradient(points) => points
                .into_iter()
                .map(GradientPoint::normalized)
                .collect::<Result<Vec<_>>>()?,
            Value::List(items) => items
                .into_iter()
                .map(|item| Self::from_value(tag, item))
                .collect::<Result<Vec<_>>>()?,
            Value::Text(text) => split_sides(&text)
                .into_iter()
                .map(Self::parse)
                .collect::<Result<Vec<_>>>()?,
            other => vec![Self::from_value(tag, other)?],
        };
        if points.len() < 2 {
            return Err(Error::InvalidPropertyValue {
                tag: tag.to_owned(),
                value: "a gradient needs at least two colors".to_owned(),
            });
        }
        Ok(points)
    }

    /// `color[ pos]` in CSS; `None` if the color does not resolve.
    pub fn css_string(&self, constants: &dyn Constants) -> Option<String> {
        let color = match &self.color {
            Value::Color(color) => *color,
            Value::Ref(name) => {
                let text = constants.resolve_constants(&format!("@{name}"))?;
                match Color::parse(&text) {
                    Ok(color) => color,
                    Err(err) => {
                        error::report(err);
                        return None;
                    }
                }
            }
            _ => return None,
        };
        let mut css = color.css_string();
        let pos = match &self.pos {
            None => None,
            Some(Value::Angle(angle)) => Some(angle.css_string()),
            Some(Value::Ref(name)) => constants.resolve_constants(&format!("@{name}")),
            Some(size) => size.size_value(constants).map(|size| size.css_string("0", constants)),
        };
        if let Some(pos) = pos {
            css.push(' ');
            css.push_str(&pos);
        }
        Some(css)
    }
}

impl fmt::Display for GradientPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.pos {
            Some(pos) => write!(f, "{} {}", self.color, pos),
            None => self.color.fmt(f),
        }
    }
}

// ---------------------------------------------------------------------------
// BackgroundElement
// ---------------------------------------------------------------------------

/// What a [`BackgroundElement`] draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackgroundKind {
    Image,
    LinearGradient,
    RadialGradient,
    ConicGradient,
}

impl BackgroundKind {
    pub fn name(self) -> &'static str {
        match self {
            BackgroundKind::Image => "image",
            BackgroundKind::LinearGradient => "linear-gradient",
            BackgroundKind::RadialGradient => "radial-gradient",
            BackgroundKind::ConicGradient => "conic-gradient",
        }
    }

    fn schema(self) -> &'static Schema {
        match self {
            BackgroundKind::Image => &IMAGE_SCHEMA,
            BackgroundKind::LinearGradient => &LINEAR_SCHEMA,
            BackgroundKind::RadialGradient => &RADIAL_SCHEMA,
            BackgroundKind::ConicGradient => &CONIC_SCHEMA,
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "image" => Some(BackgroundKind::Image),
            "linear-gradient" | "linear" => Some(BackgroundKind::LinearGradient),
            "radial-gradient" | "radial" => Some(BackgroundKind::RadialGradient),
            "conic-gradient" | "conic" => Some(BackgroundKind::ConicGradient),
            _ => None,
        }
    }
}

/// One layer of the `background` property.
#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundElement {
    kind: BackgroundKind,
    properties: Properties,
}

impl BackgroundElement {
    pub fn empty(kind: BackgroundKind) -> Self {
        Self {
            kind,
            properties: Properties::new(),
        }
    }

    pub fn image(src: impl Into<String>) -> Self {
        let mut image = Self::empty(BackgroundKind::Image);
        image.properties.insert(SRC, Value::Text(src.into()));
        image
    }

    /// `direction` is an [`AngleUnit`] or a compass name such as `to-right`.
    pub fn linear_gradient(
        direction: impl Into<Value>,
        gradient: Vec<GradientPoint>,
        repeating: bool,
    ) -> Result<Self> {
        let mut element = Self::empty(BackgroundKind::LinearGradient);
        element.try_set(DIRECTION, Some(direction.into()))?;
        element.try_set(GRADIENT, Some(Value::Gradient(gradient)))?;
        if repeating {
            element.try_set(REPEATING, Some(Value::Bool(true)))?;
        }
        Ok(element)
    }

    pub fn radial_gradient(gradient: Vec<GradientPoint>, repeating: bool) -> Result<Self> {
        let mut element = Self::empty(BackgroundKind::RadialGradient);
        element.try_set(GRADIENT, Some(Value::Gradient(gradient)))?;
        if repeating {
            element.try_set(REPEATING, Some(Value::Bool(true)))?;
        }
        Ok(element)
    }

    pub fn conic_gradient(
        from: impl Into<Value>,
        gradient: Vec<GradientPoint>,
        repeating: bool,
    ) -> Result<Self> {
        let mut element = Self::empty(BackgroundKind::ConicGradient);
        element.try_set(FROM, Some(from.into()))?;
        element.try_set(GRADIENT, Some(Value::Gradient(gradient)))?;
        if repeating {
            element.try_set(REPEATING, Some(Value::Bool(true)))?;
        }
        Ok(element)
    }

    /// The object tag picks the element kind.
    pub fn from_object(object: &DataObject) -> Result<Self> {
        let kind = BackgroundKind::from_name(object.tag()).ok_or_else(|| {
            Error::InvalidPropertyValue {
                tag: "background".to_owned(),
                value: object.tag().to_owned(),
            }
        })?;
        let mut element = Self::empty(kind);
        fill_from_object(&mut element, object)?;
        Ok(element)
    }

    pub fn kind(&self) -> BackgroundKind {
        self.kind
    }

    fn stops(&self, constants: &dyn Constants) -> Option<String> {
        let Some(Value::Gradient(points)) = self.properties.get(GRADIENT) else {
            return None;
        };
        let stops: Vec<String> = points
            .iter()
            .filter_map(|point| point.css_string(constants))
            .collect();
        (stops.len() >= 2).then(|| stops.join(", "))
    }

    fn function(&self, name: &str, header: Vec<String>, constants: &dyn Constants) -> Option<String> {
        let stops = self.stops(constants)?;
        let repeating = self.bool_value(REPEATING, constants).unwrap_or(false);
        let prefix = if repeating { "repeating-" } else { "" };
        let header = header.join(" ");
        if header.is_empty() {
            Some(format!("{prefix}{name}({stops})"))
        } else {
            Some(format!("{prefix}{name}({header}, {stops})"))
        }
    }

    /// `at X Y` when either centre coordinate is set.
    fn centre(&self, constants: &dyn Constants) -> Option<String> {
        let x = self.size(CENTER_X, constants).unwrap_or_default();
        let y = self.size(CENTER_Y, constants).unwrap_or_default();
        if x.is_auto() && y.is_auto() {
            return None;
        }
        Some(format!(
            "at {} {}",
            x.css_string("50%", constants),
            y.css_string("50%", constants)
        ))
    }

    /// The CSS of this layer, or `None` if it has nothing to draw.
    pub fn css_string(&self, constants: &dyn Constants) -> Option<String> {
        match self.kind {
            BackgroundKind::Image => self.image_css(constants),
            BackgroundKind::LinearGradient => {
                let mut header = Vec::new();
                match self.properties.get(DIRECTION) {
                    Some(Value::Int(index)) => {
                        if let Some(name) = enums::GRADIENT_DIRECTION.get(*index as usize) {
                            header.push(name.replace('-', " "));
                        }
                    }
                    Some(_) => {
                        if let Some(angle) = self.angle(DIRECTION, constants) {
                            header.push(angle.css_string());
                        }
                    }
                    None => {}
                }
                self.function("linear-gradient", header, constants)
            }
            BackgroundKind::RadialGradient => {
                let mut header = Vec::new();
                if let Some(shape) = self.enum_index(SHAPE, constants) {
                    header.push(enums::RADIAL_SHAPE[shape.min(1)].to_owned());
                }
                match self.properties.get(RADIUS) {
                    Some(Value::Int(index)) => {
                        if let Some(name) = enums::RADIAL_EXTENT.get(*index as usize) {
                            header.push((*name).to_owned());
                        }
                    }
                    Some(_) => {
                        if let Some(size) = self.size(RADIUS, constants).filter(|s| !s.is_auto()) {
                            header.push(size.css_string("", constants));
                        }
                    }
                    None => {}
                }
                header.extend(self.centre(constants));
                self.function("radial-gradient", header, constants)
            }
            BackgroundKind::ConicGradient => {
                let mut header = Vec::new();
                if let Some(from) = self.angle(FROM, constants).filter(|a| !a.is_zero()) {
                    header.push(format!("from {}", from.css_string()));
                }
                header.extend(self.centre(constants));
                self.function("conic-gradient", header, constants)
            }
        }
    }

    fn image_css(&self, constants: &dyn Constants) -> Option<String> {
        let src = self.text(SRC, constants)?;
        if src.is_empty() {
            return None;
        }
        let mut css = format!("url({src})");

        let x = self.size(X, constants).unwrap_or_default();
        let y = self.size(Y, constants).unwrap_or_default();
        let fit = self.enum_index(FIT, constants).unwrap_or(0);
        let width = self.size(WIDTH, constants).unwrap_or_default();
        let height = self.size(HEIGHT, constants).unwrap_or_default();
        let sized = fit != 0 || !width.is_auto() || !height.is_auto();

        if sized || !x.is_auto() || !y.is_auto() {
            css.push_str(&format!(
                " {} {}",
                x.css_string("left", constants),
                y.css_string("top", constants)
            ));
        }
        if fit != 0 {
            css.push_str(" / ");
            css.push_str(enums::BACKGROUND_FIT[fit.min(2)]);
        } else if sized {
            css.push_str(&format!(
                " / {} {}",
                width.css_string("auto", constants),
                height.css_string("auto", constants)
            ));
        }
        if let Some(repeat) = self.enum_index(REPEAT, constants) {
            if let Some(name) = enums::BACKGROUND_REPEAT.get(repeat) {
                css.push(' ');
                css.push_str(name);
            }
        }
        if let Some(attachment) = self.enum_index(ATTACHMENT, constants) {
            if let Some(name) = enums::BACKGROUND_ATTACHMENT.get(attachment) {
                css.push(' ');
                css.push_str(name);
            }
        }
        Some(css)
    }
}

impl PropertyContainer for BackgroundElement {
    fn schema(&self) -> &'static Schema {
        self.kind.schema()
    }

    fn properties(&self) -> &Properties {
        &self.properties
    }

    fn properties_mut(&mut self) -> &mut Properties {
        &mut self.properties
    }

    fn object_tag(&self) -> &str {
        self.kind.name()
    }

    /// A linear direction may be a compass name or an angle; a radial radius
    /// may be an extent name or a size.
    fn try_set(&mut self, tag: &str, value: Option<Value>) -> Result<()> {
        let canonical = self.schema().canonical(tag);
        let names = match (self.kind, canonical) {
            (BackgroundKind::LinearGradient, Some(DIRECTION)) => enums::GRADIENT_DIRECTION,
            (BackgroundKind::RadialGradient, Some(RADIUS)) => enums::RADIAL_EXTENT,
            _ => return set_in(self, tag, value),
        };
        let Some(value) = value else {
            return set_in(self, tag, None);
        };
        let by_name = match &value {
            Value::Text(text) => Kind::Enum(names).coerce(tag, Value::Text(text.clone())).ok(),
            _ => None,
        };
        match by_name {
            Some(index) => {
                let canonical = canonical.unwrap_or(DIRECTION);
                self.properties.insert(canonical, index);
                Ok(())
            }
            None => set_in(self, tag, Some(value)),
        }
    }
}

impl fmt::Display for BackgroundElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.to_data_object().fmt(f)
    }
}

/// Data form of a stop list.
pub(crate) fn gradient_data(points: &[GradientPoint]) -> DataValue {
    DataValue::Array(points.iter().map(|p| DataValue::Text(p.to_string())).collect())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::units::SizeUnit;

    fn rgb_stops() -> Vec<GradientPoint> {
        vec![
            GradientPoint::new(Color::RED),
            GradientPoint::at(Color::BLUE, SizeUnit::percent(50.0)),
            GradientPoint::new(Color::GREEN),
        ]
    }

    #[test]
    fn linear_with_angle() {
        let element = BackgroundElement::linear_gradient(AngleUnit::deg(45.0), rgb_stops(), false).unwrap();
        assert_eq!(
            element.css_string(&()).as_deref(),
            Some("linear-gradient(45deg, rgb(255,0,0), rgb(0,0,255) 50%, rgb(0,128,0))")
        );
    }

    #[test]
    fn linear_with_compass_direction() {
        let element = BackgroundElement::linear_gradient("to-right-top", rgb_stops(), true).unwrap();
        assert_eq!(
            element.css_string(&()).as_deref(),
            Some("repeating-linear-gradient(to right top, rgb(255,0,0), rgb(0,0,255) 50%, rgb(0,128,0))")
        );
    }

    #[test]
    fn stops_from_text() {
        let points = GradientPoint::list_from_value("gradient", "red, @accent 20%, rgb(0, 0, 255) 1em".into()).unwrap();
        assert_eq!(points.len(), 3);
        assert_eq!(points[1].color, Value::Ref("accent".into()));
        assert_eq!(points[2].color, Value::Color(Color::BLUE));
        assert_eq!(points[2].pos, Some(Value::Size(SizeUnit::em(1.0))));
        assert!(GradientPoint::list_from_value("gradient", "red".into()).is_err());
    }

    #[test]
    fn radial_and_conic() {
        let mut radial = BackgroundElement::radial_gradient(rgb_stops(), false).unwrap();
        radial.set(SHAPE, "circle");
        radial.set(RADIUS, "closest-side");
        radial.set(CENTER_X, "25%");
        assert_eq!(
            radial.css_string(&()).as_deref(),
            Some("radial-gradient(circle closest-side at 25% 50%, rgb(255,0,0), rgb(0,0,255) 50%, rgb(0,128,0))")
        );

        let conic = BackgroundElement::conic_gradient(
            AngleUnit::turn(0.25),
            vec![GradientPoint::new("red"), GradientPoint::at("blue", AngleUnit::deg(90.0))],
            false,
        )
        .unwrap();
        assert_eq!(
            conic.css_string(&()).as_deref(),
            Some("conic-gradient(from 0.25turn, rgb(255,0,0), rgb(0,0,255) 90deg)")
        );
    }

    #[test]
    fn image_layer() {
        let images: HashMap<String, String> = HashMap::new();
        let mut image = BackgroundElement::image("img/bg.png");
        assert_eq!(image.css_string(&images).as_deref(), Some("url(img/bg.png)"));
        image.set(FIT, "cover");
        image.set(REPEAT, "no-repeat");
        assert_eq!(
            image.css_string(&images).as_deref(),
            Some("url(img/bg.png) left top / cover no-repeat")
        );
    }

    #[test]
    fn from_object_picks_kind() {
        let object = DataObject::new("linear")
            .with("direction", "to-bottom")
            .with("gradient", "white, black");
        let element = BackgroundElement::from_object(&object).unwrap();
        assert_eq!(element.kind(), BackgroundKind::LinearGradient);
        assert_eq!(
            element.css_string(&()).as_deref(),
            Some("linear-gradient(to bottom, rgb(255,255,255), rgb(0,0,0))")
        );
    }
}
