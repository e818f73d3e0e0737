//! Per-property coercion: turn a caller-supplied [`Value`] into the storage
//! form of a property's [`Kind`], or reject it.

use crate::data::parse_data_objects;
use crate::error::{Error, Result};
use crate::property::{enums, PropertyContainer, Value};
use crate::style::{
    Animation, BackgroundElement, BorderProperty, BoundsProperty, ClipShape,
    ColumnSeparatorProperty, FilterProperty, GradientPoint, OutlineProperty, RadiusProperty,
    ShadowProperty,
};
use crate::units::{AngleUnit, Color, Range, SizeValue};

/// What a property accepts and how it is stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Kind {
    Bool,
    Int,
    /// A float, optionally restricted to an inclusive range.
    Float(Option<(f64, f64)>),
    Text,
    Size,
    Angle,
    Color,
    Enum(&'static [&'static str]),
    Range,
    /// A list of strings (`items`, data lists).
    Strings,
    /// A list of sizes (`cell-width`, `cell-height`).
    SizeList,
    Bounds,
    Radius,
    Border,
    Outline,
    ColumnSeparator,
    Shadows,
    Filter,
    Clip,
    Background,
    /// Gradient color stops.
    Gradient,
    Animations,
    Transitions,
}

fn incompatible(tag: &str, value: &Value) -> Error {
    Error::NotCompatibleType {
        tag: tag.to_owned(),
        found: value.type_name(),
    }
}

fn invalid(tag: &str, value: impl ToString) -> Error {
    Error::InvalidPropertyValue {
        tag: tag.to_owned(),
        value: value.to_string(),
    }
}

impl Kind {
    /// Whether the kind stores a `@name` reference as-is.
    fn accepts_reference(self) -> bool {
        matches!(
            self,
            Kind::Bool
                | Kind::Int
                | Kind::Float(_)
                | Kind::Text
                | Kind::Size
                | Kind::Angle
                | Kind::Color
                | Kind::Enum(_)
                | Kind::Range
        )
    }

    /// A fresh empty composite, for routing sub-properties into it.
    pub fn empty_composite(self) -> Option<Value> {
        match self {
            Kind::Bounds => Some(Value::Bounds(BoundsProperty::default())),
            Kind::Radius => Some(Value::Radius(RadiusProperty::default())),
            Kind::Border => Some(Value::Border(BorderProperty::default())),
            Kind::Outline => Some(Value::Outline(OutlineProperty::default())),
            Kind::ColumnSeparator => Some(Value::ColumnSeparator(ColumnSeparatorProperty::default())),
            Kind::Filter => Some(Value::Filter(FilterProperty::default())),
            _ => None,
        }
    }

    /// Coerce `value` for property `tag`.
    pub fn coerce(self, tag: &str, value: Value) -> Result<Value> {
        if self.accepts_reference() {
            if let Some(name) = value.reference() {
                if name.is_empty() {
                    return Err(invalid(tag, "@"));
                }
                return Ok(Value::Ref(name.to_owned()));
            }
        }

        match self {
            Kind::Bool => coerce_bool(tag, value),
            Kind::Int => coerce_int(tag, value),
            Kind::Float(range) => coerce_float(tag, value, range),
            Kind::Text => match value {
                Value::Text(_) => Ok(value),
                Value::Bool(_) | Value::Int(_) | Value::Float(_) | Value::Color(_) => {
                    Ok(Value::Text(value.to_string()))
                }
                other => Err(incompatible(tag, &other)),
            },
            Kind::Size => coerce_size(tag, value),
            Kind::Angle => match value {
                Value::Angle(_) => Ok(value),
                Value::Float(v) => Ok(Value::Angle(AngleUnit::rad(v))),
                Value::Int(v) => Ok(Value::Angle(AngleUnit::rad(v as f64))),
                Value::Text(text) => AngleUnit::parse(&text).map(Value::Angle),
                other => Err(incompatible(tag, &other)),
            },
            Kind::Color => match value {
                Value::Color(_) => Ok(value),
                Value::Int(v) if (0..=u32::MAX as i64).contains(&v) => Ok(Value::Color(Color(v as u32))),
                Value::Text(text) => Color::parse(&text).map(Value::Color),
                other => Err(incompatible(tag, &other)),
            },
            Kind::Enum(names) => coerce_enum(tag, value, names),
            Kind::Range => match value {
                Value::Range(_) => Ok(value),
                Value::Int(v) => i32::try_from(v)
                    .map(|v| Value::Range(Range::single(v)))
                    .map_err(|_| invalid(tag, v)),
                Value::Text(text) => Range::parse(&text).map(Value::Range),
                other => Err(incompatible(tag, &other)),
            },
            Kind::Strings => coerce_strings(tag, value),
            Kind::SizeList => coerce_size_list(tag, value),
            Kind::Bounds => BoundsProperty::try_from_value(tag, value).map(Value::Bounds),
            Kind::Radius => RadiusProperty::try_from_value(tag, value).map(Value::Radius),
            Kind::Border => BorderProperty::try_from_value(tag, value).map(Value::Border),
            Kind::Outline => OutlineProperty::try_from_value(tag, value).map(Value::Outline),
            Kind::ColumnSeparator => {
                ColumnSeparatorProperty::try_from_value(tag, value).map(Value::ColumnSeparator)
            }
            Kind::Filter => match value {
                Value::Filter(_) => Ok(value),
                Value::Object(object) => FilterProperty::from_object(&object).map(Value::Filter),
                Value::Text(text) => {
                    let object = single_object(tag, &text)?;
                    FilterProperty::from_object(&object).map(Value::Filter)
                }
                other => Err(incompatible(tag, &other)),
            },
            Kind::Clip => match value {
                Value::Clip(_) => Ok(value),
                Value::Object(object) => ClipShape::from_object(&object).map(Value::Clip),
                Value::Text(text) => {
                    let object = single_object(tag, &text)?;
                    ClipShape::from_object(&object).map(Value::Clip)
                }
                other => Err(incompatible(tag, &other)),
            },
            Kind::Shadows => {
                let shadows = coerce_list(tag, value, |value| match value {
                    Value::Shadows(items) => Ok(items),
                    Value::Object(object) => Ok(vec![ShadowProperty::from_object(&object)?]),
                    other => Err(incompatible(tag, &other)),
                })?;
                Ok(Value::Shadows(shadows))
            }
            Kind::Background => {
                let elements = coerce_list(tag, value, |value| match value {
                    Value::Background(items) => Ok(items),
                    Value::Object(object) => Ok(vec![BackgroundElement::from_object(&object)?]),
                    other => Err(incompatible(tag, &other)),
                })?;
                Ok(Value::Background(elements))
            }
            Kind::Gradient => GradientPoint::list_from_value(tag, value).map(Value::Gradient),
            Kind::Animations => {
                let animations = coerce_list(tag, value, |value| match value {
                    Value::Animations(items) => Ok(items),
                    Value::Object(object) => Ok(vec![Animation::from_object(&object)?]),
                    other => Err(incompatible(tag, &other)),
                })?;
                Ok(Value::Animations(animations))
            }
            Kind::Transitions => coerce_transitions(tag, value),
        }
    }
}

fn coerce_bool(tag: &str, value: Value) -> Result<Value> {
    match value {
        Value::Bool(_) => Ok(value),
        Value::Int(0) => Ok(Value::Bool(false)),
        Value::Int(1) => Ok(Value::Bool(true)),
        Value::Text(ref text) => match text.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Ok(Value::Bool(true)),
            "false" | "0" => Ok(Value::Bool(false)),
            _ => Err(invalid(tag, text)),
        },
        Value::Int(v) => Err(invalid(tag, v)),
        other => Err(incompatible(tag, &other)),
    }
}

fn coerce_int(tag: &str, value: Value) -> Result<Value> {
    match value {
        Value::Int(_) => Ok(value),
        Value::Float(v) if v.fract() == 0.0 => Ok(Value::Int(v as i64)),
        Value::Float(v) => Err(invalid(tag, v)),
        Value::Text(ref text) => text
            .trim()
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| invalid(tag, text)),
        other => Err(incompatible(tag, &other)),
    }
}

fn coerce_float(tag: &str, value: Value, range: Option<(f64, f64)>) -> Result<Value> {
    let number = match value {
        Value::Float(v) => v,
        Value::Int(v) => v as f64,
        Value::Text(ref text) => text.trim().parse::<f64>().map_err(|_| invalid(tag, text))?,
        other => return Err(incompatible(tag, &other)),
    };
    if let Some((min, max)) = range {
        if !(min..=max).contains(&number) {
            return Err(invalid(tag, number));
        }
    }
    Ok(Value::Float(number))
}

fn coerce_size(tag: &str, value: Value) -> Result<Value> {
    match value {
        Value::Size(_) | Value::SizeFunc(_) => Ok(value),
        Value::Float(v) => Ok(Value::Size(crate::units::SizeUnit::px(v))),
        Value::Int(v) => Ok(Value::Size(crate::units::SizeUnit::px(v as f64))),
        Value::Text(text) => SizeValue::parse(&text).map(Value::from),
        other => Err(incompatible(tag, &other)),
    }
}

fn coerce_enum(tag: &str, value: Value, names: &[&str]) -> Result<Value> {
    match value {
        Value::Int(v) if (0..names.len() as i64).contains(&v) => Ok(value),
        Value::Int(v) => Err(invalid(tag, v)),
        Value::Text(ref text) => {
            if let Some(index) = enums::index_of(names, text) {
                return Ok(Value::Int(index as i64));
            }
            match text.trim().parse::<i64>() {
                Ok(v) if (0..names.len() as i64).contains(&v) => Ok(Value::Int(v)),
                _ => Err(invalid(tag, text)),
            }
        }
        other => Err(incompatible(tag, &other)),
    }
}

fn list_item_text(tag: &str, value: Value) -> Result<String> {
    match value {
        Value::Text(text) => Ok(text),
        Value::Bool(_)
        | Value::Int(_)
        | Value::Float(_)
        | Value::Color(_)
        | Value::Size(_)
        | Value::SizeFunc(_)
        | Value::Angle(_)
        | Value::Range(_) => Ok(value.to_string()),
        other => Err(incompatible(tag, &other)),
    }
}

fn coerce_strings(tag: &str, value: Value) -> Result<Value> {
    match value {
        Value::Strings(_) => Ok(value),
        Value::List(items) => items
            .into_iter()
            .map(|item| list_item_text(tag, item))
            .collect::<Result<Vec<_>>>()
            .map(Value::Strings),
        other => list_item_text(tag, other).map(|text| Value::Strings(vec![text])),
    }
}

fn size_item(tag: &str, value: Value) -> Result<Value> {
    if let Some(name) = value.reference() {
        return Ok(Value::Ref(name.to_owned()));
    }
    coerce_size(tag, value)
}

fn coerce_size_list(tag: &str, value: Value) -> Result<Value> {
    let items = match value {
        Value::List(items) => items,
        Value::Text(text) if text.contains(',') && !text.contains('(') => text
            .split(',')
            .map(|part| Value::Text(part.trim().to_owned()))
            .collect(),
        other => vec![other],
    };
    items
        .into_iter()
        .map(|item| size_item(tag, item))
        .collect::<Result<Vec<_>>>()
        .map(Value::List)
}

/// Parse text holding exactly one data object.
fn single_object(tag: &str, text: &str) -> Result<crate::data::DataObject> {
    let mut objects = parse_data_objects(text)?;
    if objects.len() != 1 {
        return Err(invalid(tag, text));
    }
    Ok(objects.remove(0))
}

/// Accept one element, a list of elements, or text holding data objects.
fn coerce_list<T>(
    tag: &str,
    value: Value,
    one: impl Fn(Value) -> Result<Vec<T>>,
) -> Result<Vec<T>> {
    match value {
        Value::List(items) => {
            let mut out = Vec::new();
            for item in items {
                out.extend(one(item)?);
            }
            Ok(out)
        }
        Value::Text(text) => {
            let mut out = Vec::new();
            for object in parse_data_objects(&text)? {
                out.extend(one(Value::Object(object))?);
            }
            if out.is_empty() {
                return Err(invalid(tag, text));
            }
            Ok(out)
        }
        other => one(other),
    }
}

fn coerce_transitions(tag: &str, value: Value) -> Result<Value> {
    match value {
        Value::Transitions(_) => Ok(value),
        Value::Object(object) => {
            let mut transitions = Vec::new();
            for node in object.nodes() {
                let animation = match &node.value {
                    crate::data::DataValue::Object(inner) => Animation::from_object(inner)?,
                    _ => return Err(invalid(tag, &node.tag)),
                };
                transitions.push((node.tag.clone(), animation));
            }
            Ok(Value::Transitions(transitions))
        }
        Value::Text(text) => coerce_transitions(tag, Value::Object(single_object(tag, &text)?)),
        other => Err(incompatible(tag, &other)),
    }
}

/// Shared `try_from_value` for the composites that wrap a container.
pub(crate) fn container_from_value<C>(
    tag: &str,
    value: Value,
    extract: impl FnOnce(Value) -> std::result::Result<C, Value>,
    from_object: impl FnOnce(&crate::data::DataObject) -> Result<C>,
) -> Result<C>
where
    C: PropertyContainer,
{
    match extract(value) {
        Ok(container) => Ok(container),
        Err(Value::Object(object)) => from_object(&object),
        Err(Value::Text(text)) if text.trim_start().starts_with('_') => {
            from_object(&single_object(tag, &text)?)
        }
        Err(other) => Err(incompatible(tag, &other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::SizeUnit;

    #[test]
    fn range_from_int_must_fit() {
        assert_eq!(
            Kind::Range.coerce("row", Value::Int(3)).unwrap(),
            Value::Range(Range::single(3))
        );
        assert_eq!(
            Kind::Range.coerce("row", Value::Int(i64::from(i32::MAX) + 1)).unwrap_err(),
            Error::InvalidPropertyValue {
                tag: "row".into(),
                value: "2147483648".into()
            }
        );
    }

    #[test]
    fn size_coercion() {
        assert_eq!(
            Kind::Size.coerce("width", Value::Int(10)).unwrap(),
            Value::Size(SizeUnit::px(10.0))
        );
        assert_eq!(
            Kind::Size.coerce("width", "2em".into()).unwrap(),
            Value::Size(SizeUnit::em(2.0))
        );
        assert!(matches!(
            Kind::Size.coerce("width", "min(1px, 50%)".into()).unwrap(),
            Value::SizeFunc(_)
        ));
        assert_eq!(
            Kind::Size.coerce("width", "@w".into()).unwrap(),
            Value::Ref("w".into())
        );
        assert!(matches!(
            Kind::Size.coerce("width", Value::Bool(true)),
            Err(Error::NotCompatibleType { .. })
        ));
    }

    #[test]
    fn bool_coercion() {
        assert_eq!(Kind::Bool.coerce("italic", "1".into()).unwrap(), Value::Bool(true));
        assert_eq!(Kind::Bool.coerce("italic", Value::Int(0)).unwrap(), Value::Bool(false));
        assert!(Kind::Bool.coerce("italic", Value::Int(2)).is_err());
        assert!(Kind::Bool.coerce("italic", "maybe".into()).is_err());
    }

    #[test]
    fn enum_coercion() {
        let kind = Kind::Enum(enums::LIST_WRAP);
        assert_eq!(kind.coerce("list-wrap", "reverse".into()).unwrap(), Value::Int(2));
        assert_eq!(kind.coerce("list-wrap", Value::Int(1)).unwrap(), Value::Int(1));
        assert_eq!(kind.coerce("list-wrap", "1".into()).unwrap(), Value::Int(1));
        assert!(kind.coerce("list-wrap", Value::Int(3)).is_err());
    }

    #[test]
    fn color_coercion() {
        assert_eq!(
            Kind::Color.coerce("text-color", "red".into()).unwrap(),
            Value::Color(Color::RED)
        );
        assert!(Kind::Color.coerce("text-color", "rgb(300,0,0)".into()).is_err());
    }

    #[test]
    fn strings_coercion() {
        let value = Value::List(vec!["a".into(), Value::Int(2), Value::Bool(true)]);
        assert_eq!(
            Kind::Strings.coerce("items", value).unwrap(),
            Value::Strings(vec!["a".into(), "2".into(), "true".into()])
        );
        assert_eq!(
            Kind::Strings.coerce("items", "one".into()).unwrap(),
            Value::Strings(vec!["one".into()])
        );
    }

    #[test]
    fn size_list_coercion() {
        let value = Kind::SizeList.coerce("cell-width", "1fr, auto, @w".into()).unwrap();
        assert_eq!(
            value,
            Value::List(vec![
                Value::Size(SizeUnit::fr(1.0)),
                Value::Size(SizeUnit::auto()),
                Value::Ref("w".into()),
            ])
        );
    }

    #[test]
    fn float_range() {
        let kind = Kind::Float(Some((0.0, 100.0)));
        assert!(kind.coerce("sepia", Value::Int(50)).is_ok());
        assert!(kind.coerce("sepia", Value::Float(120.0)).is_err());
    }
}
