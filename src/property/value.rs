//! The [`Value`] sum type stored in property containers.

use std::fmt;

use crate::data::{DataObject, DataValue};
use crate::error;
use crate::property::PropertyContainer;
use crate::style::background::gradient_data;
use crate::style::{
    Animation, BackgroundElement, BorderProperty, BoundsProperty, BoxRadius, ClipShape,
    ColumnSeparatorProperty, FilterProperty, GradientPoint, OutlineProperty, RadiusProperty,
    ShadowProperty,
};
use crate::theme::Constants;
use crate::units::{fmt_number, AngleUnit, Color, Range, SizeFunc, SizeUnit, SizeValue};

/// A property value, either as given by the caller or after coercion.
///
/// Coercion narrows the input variants (`Text`, `List`, `Object`, numbers)
/// to the storage variant of the property's kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    /// A `@name` constant reference, stored without the `@`.
    Ref(String),
    Size(SizeUnit),
    SizeFunc(SizeFunc),
    Angle(AngleUnit),
    Color(Color),
    Range(Range),
    Strings(Vec<String>),
    List(Vec<Value>),
    Object(DataObject),
    Bounds(BoundsProperty),
    Radius(RadiusProperty),
    Border(BorderProperty),
    Outline(OutlineProperty),
    ColumnSeparator(ColumnSeparatorProperty),
    Shadows(Vec<ShadowProperty>),
    Filter(FilterProperty),
    Clip(ClipShape),
    Background(Vec<BackgroundElement>),
    /// Gradient color stops.
    Gradient(Vec<GradientPoint>),
    Animations(Vec<Animation>),
    /// Per-property transitions, in insertion order.
    Transitions(Vec<(String, Animation)>),
}

impl Value {
    /// Name of the variant, for "not compatible" errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
            Value::Ref(_) => "constant",
            Value::Size(_) => "SizeUnit",
            Value::SizeFunc(_) => "SizeFunc",
            Value::Angle(_) => "AngleUnit",
            Value::Color(_) => "Color",
            Value::Range(_) => "Range",
            Value::Strings(_) => "strings",
            Value::List(_) => "list",
            Value::Object(_) => "DataObject",
            Value::Bounds(_) => "Bounds",
            Value::Radius(_) => "Radius",
            Value::Border(_) => "Border",
            Value::Outline(_) => "Outline",
            Value::ColumnSeparator(_) => "ColumnSeparator",
            Value::Shadows(_) => "Shadow",
            Value::Filter(_) => "Filter",
            Value::Clip(_) => "ClipShape",
            Value::Background(_) => "Background",
            Value::Gradient(_) => "Gradient",
            Value::Animations(_) => "Animation",
            Value::Transitions(_) => "Transitions",
        }
    }

    /// `Text("@name")` as a reference name.
    pub(crate) fn reference(&self) -> Option<&str> {
        match self {
            Value::Ref(name) => Some(name),
            Value::Text(text) => text.trim().strip_prefix('@'),
            _ => None,
        }
    }

    /// A size, resolving a reference through `constants`.
    pub fn size_value(&self, constants: &dyn Constants) -> Option<SizeValue> {
        match self {
            Value::Size(unit) => Some(SizeValue::Unit(*unit)),
            Value::SizeFunc(func) => Some(SizeValue::Func(func.clone())),
            Value::Ref(name) => {
                let text = constants.resolve_constants(&format!("@{name}"))?;
                match SizeValue::parse(&text) {
                    Ok(size) => Some(size),
                    Err(err) => {
                        error::report(err);
                        None
                    }
                }
            }
            _ => None,
        }
    }

    /// The nested container of a composite value.
    pub fn as_container(&self) -> Option<&dyn PropertyContainer> {
        match self {
            Value::Bounds(v) => Some(v),
            Value::Radius(v) => Some(v),
            Value::Border(v) => Some(v),
            Value::Outline(v) => Some(v),
            Value::ColumnSeparator(v) => Some(v),
            Value::Filter(v) => Some(v),
            Value::Clip(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_container_mut(&mut self) -> Option<&mut dyn PropertyContainer> {
        match self {
            Value::Bounds(v) => Some(v),
            Value::Radius(v) => Some(v),
            Value::Border(v) => Some(v),
            Value::Outline(v) => Some(v),
            Value::ColumnSeparator(v) => Some(v),
            Value::Filter(v) => Some(v),
            Value::Clip(v) => Some(v),
            _ => None,
        }
    }

    /// Serialisable form for the data text format.
    pub fn to_data_value(&self) -> DataValue {
        let objects = |items: Vec<DataObject>| {
            DataValue::Array(items.into_iter().map(DataValue::Object).collect())
        };
        match self {
            Value::Strings(items) => {
                DataValue::Array(items.iter().map(|s| DataValue::Text(s.clone())).collect())
            }
            Value::List(items) => DataValue::Array(items.iter().map(Value::to_data_value).collect()),
            Value::Object(object) => DataValue::Object(object.clone()),
            Value::Shadows(items) => objects(items.iter().map(|s| s.to_data_object()).collect()),
            Value::Background(items) => {
                objects(items.iter().map(|b| b.to_data_object()).collect())
            }
            Value::Gradient(points) => gradient_data(points),
            Value::Animations(items) => objects(items.iter().map(|a| a.to_data_object()).collect()),
            Value::Transitions(items) => {
                let mut object = DataObject::new("_");
                for (tag, animation) in items {
                    object.set(tag.clone(), animation.to_data_object());
                }
                DataValue::Object(object)
            }
            other => match other.as_container() {
                Some(container) => DataValue::Object(container.to_data_object()),
                None => DataValue::Text(other.scalar_text()),
            },
        }
    }

    fn scalar_text(&self) -> String {
        match self {
            Value::Bool(v) => v.to_string(),
            Value::Int(v) => v.to_string(),
            Value::Float(v) => fmt_number(*v),
            Value::Text(v) => v.clone(),
            Value::Ref(name) => format!("@{name}"),
            Value::Size(v) => v.to_string(),
            Value::SizeFunc(v) => v.to_string(),
            Value::Angle(v) => v.to_string(),
            Value::Color(v) => v.to_string(),
            Value::Range(v) => v.to_string(),
            other => other.to_data_value().to_string(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_data_value() {
            DataValue::Text(text) => f.write_str(&text),
            other => other.fmt(f),
        }
    }
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

macro_rules! value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

value_from! {
    bool => Bool,
    i64 => Int,
    f64 => Float,
    String => Text,
    SizeUnit => Size,
    SizeFunc => SizeFunc,
    AngleUnit => Angle,
    Color => Color,
    Range => Range,
    Vec<String> => Strings,
    Vec<Value> => List,
    DataObject => Object,
    BoundsProperty => Bounds,
    RadiusProperty => Radius,
    BorderProperty => Border,
    OutlineProperty => Outline,
    ColumnSeparatorProperty => ColumnSeparator,
    Vec<ShadowProperty> => Shadows,
    FilterProperty => Filter,
    ClipShape => Clip,
    Vec<BackgroundElement> => Background,
    Vec<GradientPoint> => Gradient,
    Vec<Animation> => Animations,
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<usize> for Value {
    fn from(v: usize) -> Self {
        Value::Int(v as i64)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v as f64)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_owned())
    }
}

impl From<Vec<&str>> for Value {
    fn from(v: Vec<&str>) -> Self {
        Value::Strings(v.into_iter().map(str::to_owned).collect())
    }
}

impl From<SizeValue> for Value {
    fn from(v: SizeValue) -> Self {
        match v {
            SizeValue::Unit(unit) => Value::Size(unit),
            SizeValue::Func(func) => Value::SizeFunc(func),
        }
    }
}

impl From<BoxRadius> for Value {
    fn from(v: BoxRadius) -> Self {
        Value::Radius(RadiusProperty::from(v))
    }
}

impl From<ShadowProperty> for Value {
    fn from(v: ShadowProperty) -> Self {
        Value::Shadows(vec![v])
    }
}

impl From<BackgroundElement> for Value {
    fn from(v: BackgroundElement) -> Self {
        Value::Background(vec![v])
    }
}

impl From<Animation> for Value {
    fn from(v: Animation) -> Self {
        Value::Animations(vec![v])
    }
}

impl From<DataValue> for Value {
    fn from(v: DataValue) -> Self {
        match v {
            DataValue::Text(text) => Value::Text(text),
            DataValue::Object(object) => Value::Object(object),
            DataValue::Array(items) => Value::List(items.into_iter().map(Value::from).collect()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_detection() {
        assert_eq!(Value::from("@accent").reference(), Some("accent"));
        assert_eq!(Value::Ref("a".into()).reference(), Some("a"));
        assert_eq!(Value::from("accent").reference(), None);
    }

    #[test]
    fn scalar_display() {
        assert_eq!(Value::from(SizeUnit::px(4.0)).to_string(), "4px");
        assert_eq!(Value::Ref("a1".into()).to_string(), "@a1");
        assert_eq!(Value::from(Color::RED).to_string(), "#ffff0000");
        assert_eq!(Value::from(vec!["a", "b c"]).to_string(), "[a, \"b c\"]");
    }

    #[test]
    fn data_value_conversion() {
        let value = Value::from(DataValue::Array(vec!["x".into()]));
        assert_eq!(value, Value::List(vec![Value::Text("x".into())]));
    }
}
