//! Corner radii: the canonicalising [`RadiusProperty`] and the resolved [`BoxRadius`].
//!
//! Fourteen knobs: uniform `x` and `y`, a symmetric value per corner
//! (`top-left`, ...) and a per-axis value per corner (`top-left-x`, ...).
//! Assignments keep the set minimal: a symmetric corner never coexists with
//! its per-axis values, and a matching `-x`/`-y` pair collapses into the
//! symmetric form.

use std::fmt;

use once_cell::sync::Lazy;

use crate::data::DataObject;
use crate::error::{Error, Result};
use crate::property::kind::container_from_value;
use crate::property::{fill_from_object, Kind, Properties, PropertyContainer, Schema, Value};
use crate::theme::Constants;
use crate::units::SizeValue;

pub const X: &str = "x";
pub const Y: &str = "y";
pub const TOP_LEFT: &str = "top-left";
pub const TOP_RIGHT: &str = "top-right";
pub const BOTTOM_RIGHT: &str = "bottom-right";
pub const BOTTOM_LEFT: &str = "bottom-left";

/// CSS order.
const CORNERS: [&str; 4] = [TOP_LEFT, TOP_RIGHT, BOTTOM_RIGHT, BOTTOM_LEFT];

static SCHEMA: Lazy<Schema> = Lazy::new(|| {
    let mut kinds = vec![(X, Kind::Size), (Y, Kind::Size)];
    for corner in CORNERS {
        kinds.push((corner, Kind::Size));
    }
    let axis_tags: Vec<(&'static str, Kind)> = [
        "top-left-x",
        "top-left-y",
        "top-right-x",
        "top-right-y",
        "bottom-right-x",
        "bottom-right-y",
        "bottom-left-x",
        "bottom-left-y",
    ]
    .into_iter()
    .map(|tag| (tag, Kind::Size))
    .collect();
    kinds.extend(axis_tags);
    Schema::new("radius", &kinds)
});

fn axis_tag(corner: &str, axis: &str) -> String {
    format!("{corner}-{axis}")
}

fn other_axis(axis: &str) -> &'static str {
    if axis == X {
        Y
    } else {
        X
    }
}

/// Split `top-left-x` into (`top-left`, `x`).
fn split_axis(tag: &str) -> Option<(&'static str, &'static str)> {
    CORNERS.into_iter().find_map(|corner| {
        let rest = tag.strip_prefix(corner)?.strip_prefix('-')?;
        match rest {
            "x" => Some((corner, X)),
            "y" => Some((corner, Y)),
            _ => None,
        }
    })
}

/// Corner radii with canonicalising assignment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RadiusProperty {
    properties: Properties,
}

impl RadiusProperty {
    pub fn new() -> Self {
        Self::default()
    }

    /// The same radius on every corner and axis.
    pub fn uniform(size: impl Into<Value>) -> Result<Self> {
        let size = size.into();
        let mut radius = Self::new();
        radius.try_set(X, Some(size.clone()))?;
        radius.try_set(Y, Some(size))?;
        Ok(radius)
    }

    pub fn from_object(object: &DataObject) -> Result<Self> {
        let mut radius = Self::new();
        fill_from_object(&mut radius, object)?;
        Ok(radius)
    }

    /// Accepts a radius, a size, `"x/y"` text, or an object.
    pub(crate) fn try_from_value(tag: &str, value: Value) -> Result<Self> {
        match value {
            Value::Size(_) | Value::SizeFunc(_) | Value::Int(_) | Value::Float(_) | Value::Ref(_) => {
                Self::uniform(value)
            }
            Value::Text(ref text) if text.trim().starts_with('@') => Self::uniform(value),
            Value::Text(ref text) if !text.trim_start().starts_with('_') => {
                match text.split_once('/') {
                    Some((x, y)) => {
                        let mut radius = Self::new();
                        radius.try_set(X, Some(x.trim().into()))?;
                        radius.try_set(Y, Some(y.trim().into()))?;
                        Ok(radius)
                    }
                    None => Self::uniform(text.as_str()),
                }
            }
            other => container_from_value(
                tag,
                other,
                |value| match value {
                    Value::Radius(radius) => Ok(radius),
                    other => Err(other),
                },
                Self::from_object,
            ),
        }
    }

    /// Set a uniform axis: per-corner values on that axis go, symmetric
    /// corners keep only their other axis.
    fn set_axis(&mut self, axis: &'static str, value: Value) {
        let keep = other_axis(axis);
        for corner in CORNERS {
            self.properties.remove(&axis_tag(corner, axis));
            if let Some(symmetric) = self.properties.remove(corner) {
                self.properties.insert(&axis_tag(corner, keep), symmetric);
            }
        }
        self.properties.insert(axis, value);
    }

    fn set_corner(&mut self, corner: &'static str, value: Value) {
        self.properties.remove(&axis_tag(corner, X));
        self.properties.remove(&axis_tag(corner, Y));
        self.properties.insert(corner, value);
    }

    fn set_corner_axis(&mut self, corner: &'static str, axis: &'static str, value: Value) {
        let keep = axis_tag(corner, other_axis(axis));
        if let Some(symmetric) = self.properties.remove(corner) {
            self.properties.insert(&keep, symmetric);
        }
        if self.properties.get(&keep) == Some(&value) {
            self.properties.remove(&keep);
            self.properties.insert(corner, value);
        } else {
            self.properties.insert(&axis_tag(corner, axis), value);
        }
    }

    /// Effective value of one corner axis before resolution.
    fn raw_axis(&self, corner: &str, axis: &str) -> Option<&Value> {
        self.properties
            .get(&axis_tag(corner, axis))
            .or_else(|| self.properties.get(corner))
            .or_else(|| self.properties.get(axis))
    }

    /// Materialise the eight-field record, resolving `@name` references.
    /// A missing `y` falls back to the corner's `x`; a missing `x` is zero.
    pub fn box_radius(&self, constants: &dyn Constants) -> BoxRadius {
        let resolve = |value: Option<&Value>| -> Option<SizeValue> {
            let value = value?;
            let mut probe = RadiusProperty::new();
            probe.properties.insert(X, value.clone());
            probe.size(X, constants)
        };
        let corner = |corner: &str| {
            let x = resolve(self.raw_axis(corner, X)).unwrap_or_else(zero);
            let y = resolve(self.raw_axis(corner, Y)).unwrap_or_else(|| x.clone());
            (x, y)
        };
        let (top_left_x, top_left_y) = corner(TOP_LEFT);
        let (top_right_x, top_right_y) = corner(TOP_RIGHT);
        let (bottom_right_x, bottom_right_y) = corner(BOTTOM_RIGHT);
        let (bottom_left_x, bottom_left_y) = corner(BOTTOM_LEFT);
        BoxRadius {
            top_left_x,
            top_left_y,
            top_right_x,
            top_right_y,
            bottom_right_x,
            bottom_right_y,
            bottom_left_x,
            bottom_left_y,
        }
    }
}

fn zero() -> SizeValue {
    SizeValue::Unit(crate::units::SizeUnit::px(0.0))
}

impl PropertyContainer for RadiusProperty {
    fn schema(&self) -> &'static Schema {
        &SCHEMA
    }

    fn properties(&self) -> &Properties {
        &self.properties
    }

    fn properties_mut(&mut self) -> &mut Properties {
        &mut self.properties
    }

    fn try_set(&mut self, tag: &str, value: Option<Value>) -> Result<()> {
        let canonical = SCHEMA
            .canonical(tag)
            .ok_or_else(|| Error::UnknownProperty(tag.to_owned()))?;
        let Some(value) = value else {
            self.properties.remove(canonical);
            return Ok(());
        };
        let value = Kind::Size.coerce(canonical, value)?;

        if canonical == X || canonical == Y {
            self.set_axis(if canonical == X { X } else { Y }, value);
        } else if let Some((corner, axis)) = split_axis(canonical) {
            self.set_corner_axis(corner, axis, value);
        } else {
            self.set_corner(canonical, value);
        }
        Ok(())
    }

    /// A symmetric corner that is not stored is derived from the effective
    /// `x` and `y` when they agree.
    fn get(&self, tag: &str) -> Option<Value> {
        let canonical = SCHEMA.canonical(tag)?;
        if let Some(value) = self.properties.get(canonical) {
            return Some(value.clone());
        }
        if !CORNERS.contains(&canonical) {
            return None;
        }
        let x = self
            .properties
            .get(&axis_tag(canonical, X))
            .or_else(|| self.properties.get(X))?;
        let y = self
            .properties
            .get(&axis_tag(canonical, Y))
            .or_else(|| self.properties.get(Y))
            .unwrap_or(x);
        (x == y).then(|| x.clone())
    }
}

impl From<BoxRadius> for RadiusProperty {
    fn from(radius: BoxRadius) -> Self {
        let mut property = RadiusProperty::new();
        let pairs = [
            (TOP_LEFT, radius.top_left_x, radius.top_left_y),
            (TOP_RIGHT, radius.top_right_x, radius.top_right_y),
            (BOTTOM_RIGHT, radius.bottom_right_x, radius.bottom_right_y),
            (BOTTOM_LEFT, radius.bottom_left_x, radius.bottom_left_y),
        ];
        for (corner, x, y) in pairs {
            property.set_corner_axis(corner, X, Value::from(x));
            property.set_corner_axis(corner, Y, Value::from(y));
        }
        property
    }
}

impl fmt::Display for RadiusProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let only_uniform = self.properties.tags().all(|tag| tag == X || tag == Y);
        match (only_uniform, self.properties.get(X), self.properties.get(Y)) {
            (true, Some(x), Some(y)) if x == y => write!(f, "{x}"),
            (true, Some(x), Some(y)) => write!(f, "{x}/{y}"),
            (true, Some(x), None) => write!(f, "{x}"),
            _ => self.to_data_object().fmt(f),
        }
    }
}

// ---------------------------------------------------------------------------
// BoxRadius
// ---------------------------------------------------------------------------

/// The eight resolved corner radii.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoxRadius {
    pub top_left_x: SizeValue,
    pub top_left_y: SizeValue,
    pub top_right_x: SizeValue,
    pub top_right_y: SizeValue,
    pub bottom_right_x: SizeValue,
    pub bottom_right_y: SizeValue,
    pub bottom_left_x: SizeValue,
    pub bottom_left_y: SizeValue,
}

impl BoxRadius {
    pub fn uniform(x: SizeValue, y: SizeValue) -> Self {
        Self {
            top_left_x: x.clone(),
            top_left_y: y.clone(),
            top_right_x: x.clone(),
            top_right_y: y.clone(),
            bottom_right_x: x.clone(),
            bottom_right_y: y.clone(),
            bottom_left_x: x,
            bottom_left_y: y,
        }
    }

    fn xs(&self) -> [&SizeValue; 4] {
        [
            &self.top_left_x,
            &self.top_right_x,
            &self.bottom_right_x,
            &self.bottom_left_x,
        ]
    }

    fn ys(&self) -> [&SizeValue; 4] {
        [
            &self.top_left_y,
            &self.top_right_y,
            &self.bottom_right_y,
            &self.bottom_left_y,
        ]
    }

    /// `true` if any corner is rounded.
    pub fn any_non_zero(&self) -> bool {
        self.xs()
            .into_iter()
            .chain(self.ys())
            .any(|v| !v.is_zero() && !v.is_auto())
    }

    /// CSS `border-radius` value.
    pub fn css_string(&self, constants: &dyn Constants) -> String {
        let css = |v: &SizeValue| v.css_string("0", constants);
        let xs = self.xs();
        let ys = self.ys();
        let uniform_x = xs.iter().all(|v| *v == xs[0]);
        let uniform_y = ys.iter().all(|v| *v == ys[0]);

        if uniform_x && uniform_y {
            return if xs[0] == ys[0] {
                css(xs[0])
            } else {
                format!("{} / {}", css(xs[0]), css(ys[0]))
            };
        }

        let join = |values: [&SizeValue; 4]| {
            values.iter().map(|v| css(v)).collect::<Vec<_>>().join(" ")
        };
        if xs == ys {
            join(xs)
        } else {
            format!("{} / {}", join(xs), join(ys))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::SizeUnit;

    fn px(v: f64) -> Value {
        Value::Size(SizeUnit::px(v))
    }

    #[test]
    fn uniform_axes_derive_corner() {
        let mut radius = RadiusProperty::new();
        radius.set(X, SizeUnit::px(5.0));
        radius.set(Y, SizeUnit::px(5.0));
        assert_eq!(radius.get(TOP_LEFT), Some(px(5.0)));
        assert_eq!(radius.get("top-left-x"), None);
    }

    #[test]
    fn setting_axis_promotes_symmetric_corners() {
        let mut radius = RadiusProperty::new();
        radius.set(TOP_LEFT, 3);
        radius.set(X, 7);
        assert_eq!(radius.get_raw(TOP_LEFT), None);
        assert_eq!(radius.get("top-left-y"), Some(px(3.0)));
        assert_eq!(radius.get(X), Some(px(7.0)));
    }

    #[test]
    fn setting_corner_removes_axis_values() {
        let mut radius = RadiusProperty::new();
        radius.set("top-left-x", 1);
        radius.set("top-left-y", 2);
        radius.set(TOP_LEFT, 4);
        assert_eq!(radius.all_tags(), vec![TOP_LEFT.to_owned()]);
    }

    #[test]
    fn matching_axis_pair_collapses() {
        let mut radius = RadiusProperty::new();
        radius.set("bottom-right-x", 6);
        radius.set("bottom-right-y", 6);
        assert_eq!(radius.all_tags(), vec![BOTTOM_RIGHT.to_owned()]);
        assert_eq!(radius.get(BOTTOM_RIGHT), Some(px(6.0)));
    }

    #[test]
    fn axis_on_symmetric_corner_splits_it() {
        let mut radius = RadiusProperty::new();
        radius.set(TOP_RIGHT, 2);
        radius.set("top-right-x", 9);
        assert_eq!(radius.get("top-right-y"), Some(px(2.0)));
        assert_eq!(radius.get("top-right-x"), Some(px(9.0)));
        assert_eq!(radius.get_raw(TOP_RIGHT), None);
    }

    #[test]
    fn css_x_slash_y() {
        let mut radius = RadiusProperty::new();
        radius.set(X, SizeUnit::px(10.0));
        radius.set(Y, SizeUnit::px(20.0));
        assert_eq!(radius.box_radius(&()).css_string(&()), "10px / 20px");
    }

    #[test]
    fn css_per_corner() {
        let mut radius = RadiusProperty::uniform(4).unwrap();
        radius.set(TOP_LEFT, 8);
        assert_eq!(radius.box_radius(&()).css_string(&()), "8px 4px 4px 4px");
        radius.set("bottom-left-y", 1);
        assert_eq!(
            radius.box_radius(&()).css_string(&()),
            "8px 4px 4px 4px / 8px 4px 4px 1px"
        );
    }

    #[test]
    fn missing_y_falls_back_to_x() {
        let mut radius = RadiusProperty::new();
        radius.set(X, 3);
        let box_radius = radius.box_radius(&());
        assert_eq!(box_radius.top_left_y, SizeValue::Unit(SizeUnit::px(3.0)));
        assert!(box_radius.any_non_zero());
        assert!(!RadiusProperty::new().box_radius(&()).any_non_zero());
    }

    #[test]
    fn text_forms() {
        let radius = RadiusProperty::try_from_value("radius", "4px/8px".into()).unwrap();
        assert_eq!(radius.to_string(), "4px/8px");
        let uniform = RadiusProperty::try_from_value("radius", "6px".into()).unwrap();
        assert_eq!(uniform.to_string(), "6px");
    }

    #[test]
    fn from_box_radius_collapses() {
        let box_radius = BoxRadius::uniform(
            SizeValue::Unit(SizeUnit::px(2.0)),
            SizeValue::Unit(SizeUnit::px(2.0)),
        );
        let radius = RadiusProperty::from(box_radius.clone());
        assert_eq!(radius.all_tags().len(), 4);
        assert_eq!(radius.box_radius(&()), box_radius);
    }
}
