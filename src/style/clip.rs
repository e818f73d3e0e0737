//! Clip shapes for `clip` and `shape-outside`.

use once_cell::sync::Lazy;

use crate::data::DataObject;
use crate::error::{Error, Result};
use crate::property::{fill_from_object, Kind, Properties, PropertyContainer, Schema, Value};
use crate::style::RadiusProperty;
use crate::theme::Constants;
use crate::units::SizeValue;

pub const TOP: &str = "top";
pub const RIGHT: &str = "right";
pub const BOTTOM: &str = "bottom";
pub const LEFT: &str = "left";
pub const RADIUS: &str = "radius";
pub const X: &str = "x";
pub const Y: &str = "y";
pub const RADIUS_X: &str = "radius-x";
pub const RADIUS_Y: &str = "radius-y";
pub const POINTS: &str = "points";

static INSET_SCHEMA: Lazy<Schema> = Lazy::new(|| {
    Schema::new(
        "inset",
        &[
            (TOP, Kind::Size),
            (RIGHT, Kind::Size),
            (BOTTOM, Kind::Size),
            (LEFT, Kind::Size),
            (RADIUS, Kind::Radius),
        ],
    )
});

static CIRCLE_SCHEMA: Lazy<Schema> = Lazy::new(|| {
    Schema::new("circle", &[(X, Kind::Size), (Y, Kind::Size), (RADIUS, Kind::Size)])
});

static ELLIPSE_SCHEMA: Lazy<Schema> = Lazy::new(|| {
    Schema::new(
        "ellipse",
        &[
            (X, Kind::Size),
            (Y, Kind::Size),
            (RADIUS_X, Kind::Size),
            (RADIUS_Y, Kind::Size),
        ],
    )
});

static POLYGON_SCHEMA: Lazy<Schema> =
    Lazy::new(|| Schema::new("polygon", &[(POINTS, Kind::SizeList)]));

/// Which basic shape a [`ClipShape`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Inset,
    Circle,
    Ellipse,
    Polygon,
}

impl ShapeKind {
    pub fn name(self) -> &'static str {
        match self {
            ShapeKind::Inset => "inset",
            ShapeKind::Circle => "circle",
            ShapeKind::Ellipse => "ellipse",
            ShapeKind::Polygon => "polygon",
        }
    }

    fn schema(self) -> &'static Schema {
        match self {
            ShapeKind::Inset => &INSET_SCHEMA,
            ShapeKind::Circle => &CIRCLE_SCHEMA,
            ShapeKind::Ellipse => &ELLIPSE_SCHEMA,
            ShapeKind::Polygon => &POLYGON_SCHEMA,
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "inset" => Some(ShapeKind::Inset),
            "circle" => Some(ShapeKind::Circle),
            "ellipse" => Some(ShapeKind::Ellipse),
            "polygon" => Some(ShapeKind::Polygon),
            _ => None,
        }
    }
}

/// A CSS basic shape: `inset`, `circle`, `ellipse` or `polygon`.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipShape {
    shape: ShapeKind,
    properties: Properties,
}

impl ClipShape {
    fn empty(shape: ShapeKind) -> Self {
        Self {
            shape,
            properties: Properties::new(),
        }
    }

    pub fn inset(
        top: impl Into<Value>,
        right: impl Into<Value>,
        bottom: impl Into<Value>,
        left: impl Into<Value>,
        radius: Option<RadiusProperty>,
    ) -> Result<Self> {
        let mut clip = Self::empty(ShapeKind::Inset);
        clip.try_set(TOP, Some(top.into()))?;
        clip.try_set(RIGHT, Some(right.into()))?;
        clip.try_set(BOTTOM, Some(bottom.into()))?;
        clip.try_set(LEFT, Some(left.into()))?;
        if let Some(radius) = radius {
            clip.try_set(RADIUS, Some(Value::Radius(radius)))?;
        }
        Ok(clip)
    }

    pub fn circle(x: impl Into<Value>, y: impl Into<Value>, radius: impl Into<Value>) -> Result<Self> {
        let mut clip = Self::empty(ShapeKind::Circle);
        clip.try_set(X, Some(x.into()))?;
        clip.try_set(Y, Some(y.into()))?;
        clip.try_set(RADIUS, Some(radius.into()))?;
        Ok(clip)
    }

    pub fn ellipse(
        x: impl Into<Value>,
        y: impl Into<Value>,
        radius_x: impl Into<Value>,
        radius_y: impl Into<Value>,
    ) -> Result<Self> {
        let mut clip = Self::empty(ShapeKind::Ellipse);
        clip.try_set(X, Some(x.into()))?;
        clip.try_set(Y, Some(y.into()))?;
        clip.try_set(RADIUS_X, Some(radius_x.into()))?;
        clip.try_set(RADIUS_Y, Some(radius_y.into()))?;
        Ok(clip)
    }

    /// A polygon from alternating x and y coordinates.
    pub fn polygon<I, V>(points: I) -> Result<Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let mut clip = Self::empty(ShapeKind::Polygon);
        let points: Vec<Value> = points.into_iter().map(Into::into).collect();
        clip.try_set(POINTS, Some(Value::List(points)))?;
        Ok(clip)
    }

    /// The object tag picks the shape.
    pub fn from_object(object: &DataObject) -> Result<Self> {
        let shape = ShapeKind::from_name(object.tag()).ok_or_else(|| Error::InvalidPropertyValue {
            tag: "clip".to_owned(),
            value: object.tag().to_owned(),
        })?;
        let mut clip = Self::empty(shape);
        fill_from_object(&mut clip, object)?;
        Ok(clip)
    }

    pub fn shape(&self) -> ShapeKind {
        self.shape
    }

    fn resolved(&self, tag: &str, constants: &dyn Constants) -> SizeValue {
        self.size(tag, constants).unwrap_or_default()
    }

    fn points(&self, constants: &dyn Constants) -> Vec<SizeValue> {
        match self.properties.get(POINTS) {
            Some(Value::List(items)) => items
                .iter()
                .map(|item| item.size_value(constants).unwrap_or_default())
                .collect(),
            _ => Vec::new(),
        }
    }

    fn radius(&self) -> Option<&RadiusProperty> {
        match self.properties.get(RADIUS) {
            Some(Value::Radius(radius)) => Some(radius),
            _ => None,
        }
    }

    /// Whether the shape clips anything at all.
    pub fn valid(&self, constants: &dyn Constants) -> bool {
        let non_zero = |size: SizeValue| !size.is_zero();
        match self.shape {
            ShapeKind::Inset => {
                [TOP, RIGHT, BOTTOM, LEFT].into_iter().any(|side| {
                    let size = self.resolved(side, constants);
                    !size.is_auto() && !size.is_zero()
                }) || self
                    .radius()
                    .is_some_and(|radius| radius.box_radius(constants).any_non_zero())
            }
            ShapeKind::Circle => non_zero(self.resolved(RADIUS, constants)),
            ShapeKind::Ellipse => {
                non_zero(self.resolved(RADIUS_X, constants))
                    && non_zero(self.resolved(RADIUS_Y, constants))
            }
            ShapeKind::Polygon => self.points(constants).len() >= 2,
        }
    }

    /// The CSS basic-shape function; `None` when the shape is not valid.
    pub fn css_string(&self, constants: &dyn Constants) -> Option<String> {
        if !self.valid(constants) {
            return None;
        }
        let offset = |tag| self.resolved(tag, constants).css_string("0px", constants);
        let centre = |tag| self.resolved(tag, constants).css_string("50%", constants);

        let css = match self.shape {
            ShapeKind::Inset => {
                let mut css = format!(
                    "inset({} {} {} {}",
                    offset(TOP),
                    offset(RIGHT),
                    offset(BOTTOM),
                    offset(LEFT)
                );
                if let Some(radius) = self.radius() {
                    let radius = radius.box_radius(constants);
                    if radius.any_non_zero() {
                        css.push_str(" round ");
                        css.push_str(&radius.css_string(constants));
                    }
                }
                css.push(')');
                css
            }
            ShapeKind::Circle => {
                format!("circle({} at {} {})", centre(RADIUS), centre(X), centre(Y))
            }
            ShapeKind::Ellipse => format!(
                "ellipse({} {} at {} {})",
                centre(RADIUS_X),
                centre(RADIUS_Y),
                centre(X),
                centre(Y)
            ),
            ShapeKind::Polygon => {
                let points: Vec<String> = self
                    .points(constants)
                    .chunks_exact(2)
                    .map(|pair| {
                        format!(
                            "{} {}",
                            pair[0].css_string("0px", constants),
                            pair[1].css_string("0px", constants)
                        )
                    })
                    .collect();
                format!("polygon({})", points.join(", "))
            }
        };
        Some(css)
    }
}

impl PropertyContainer for ClipShape {
    fn schema(&self) -> &'static Schema {
        self.shape.schema()
    }

    fn properties(&self) -> &Properties {
        &self.properties
    }

    fn properties_mut(&mut self) -> &mut Properties {
        &mut self.properties
    }

    fn object_tag(&self) -> &str {
        self.shape.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::SizeUnit;

    #[test]
    fn inset_with_radius() {
        let clip = ClipShape::inset(10, "5%", 10, "5%", Some(RadiusProperty::uniform(4).unwrap())).unwrap();
        assert_eq!(
            clip.css_string(&()).as_deref(),
            Some("inset(10px 5% 10px 5% round 4px)")
        );
    }

    #[test]
    fn all_auto_inset_is_invalid() {
        let clip = ClipShape::inset("auto", "auto", "auto", "auto", None).unwrap();
        assert!(!clip.valid(&()));
        assert_eq!(clip.css_string(&()), None);
    }

    #[test]
    fn circle_defaults_centre() {
        let clip = ClipShape::circle("auto", "auto", SizeUnit::px(20.0)).unwrap();
        assert_eq!(clip.css_string(&()).as_deref(), Some("circle(20px at 50% 50%)"));
        let flat = ClipShape::circle(0, 0, 0).unwrap();
        assert!(!flat.valid(&()));
    }

    #[test]
    fn ellipse() {
        let clip = ClipShape::ellipse("25%", 0, 10, 20).unwrap();
        assert_eq!(
            clip.css_string(&()).as_deref(),
            Some("ellipse(10px 20px at 25% 0)")
        );
    }

    #[test]
    fn polygon_needs_two_points() {
        let single = ClipShape::polygon(["10px"]).unwrap();
        assert_eq!(single.css_string(&()), None);

        let triangle = ClipShape::polygon(["50%", "0", "100%", "100%", "0", "100%"]).unwrap();
        assert_eq!(
            triangle.css_string(&()).as_deref(),
            Some("polygon(50% 0, 100% 100%, 0 100%)")
        );
    }

    #[test]
    fn from_object_uses_tag() {
        let object = DataObject::new("circle").with("radius", "3em");
        let clip = ClipShape::from_object(&object).unwrap();
        assert_eq!(clip.shape(), ShapeKind::Circle);
        assert_eq!(clip.to_data_object().tag(), "circle");
        assert!(ClipShape::from_object(&DataObject::new("star")).is_err());
    }
}
