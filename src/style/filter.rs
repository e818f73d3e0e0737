//! Graphic filters for the `filter` and `backdrop-filter` view properties.

use once_cell::sync::Lazy;

use crate::data::DataObject;
use crate::error::Result;
use crate::property::{fill_from_object, Kind, Properties, PropertyContainer, Schema, Value};
use crate::theme::Constants;
use crate::units::fmt_number;

pub const BLUR: &str = "blur";
pub const BRIGHTNESS: &str = "brightness";
pub const CONTRAST: &str = "contrast";
pub const SATURATE: &str = "saturate";
pub const GRAYSCALE: &str = "grayscale";
pub const INVERT: &str = "invert";
pub const OPACITY: &str = "opacity";
pub const SEPIA: &str = "sepia";
pub const HUE_ROTATE: &str = "hue-rotate";
pub const DROP_SHADOW: &str = "drop-shadow";

const PERCENT: Kind = Kind::Float(Some((0.0, 100.0)));
const AMPLIFY: Kind = Kind::Float(Some((0.0, 10000.0)));

static SCHEMA: Lazy<Schema> = Lazy::new(|| {
    Schema::new(
        "filter",
        &[
            (BLUR, Kind::Float(Some((0.0, f64::MAX)))),
            (BRIGHTNESS, AMPLIFY),
            (CONTRAST, AMPLIFY),
            (SATURATE, AMPLIFY),
            (GRAYSCALE, PERCENT),
            (INVERT, PERCENT),
            (OPACITY, PERCENT),
            (SEPIA, PERCENT),
            (HUE_ROTATE, Kind::Angle),
            (DROP_SHADOW, Kind::Shadows),
        ],
    )
    .with_aliases(&[("hue", HUE_ROTATE), ("shadow", DROP_SHADOW)])
});

/// A set of CSS filter functions, emitted in a fixed order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterProperty {
    properties: Properties,
}

impl FilterProperty {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_object(object: &DataObject) -> Result<Self> {
        let mut filter = Self::new();
        fill_from_object(&mut filter, object)?;
        Ok(filter)
    }

    /// The CSS `filter` value; `None` when no function is set.
    pub fn css_string(&self, constants: &dyn Constants) -> Option<String> {
        let mut functions = Vec::new();

        if let Some(blur) = self.float(BLUR, constants) {
            functions.push(format!("blur({}px)", fmt_number(blur)));
        }
        for tag in [BRIGHTNESS, CONTRAST, SATURATE, GRAYSCALE, INVERT, OPACITY, SEPIA] {
            if let Some(value) = self.float(tag, constants) {
                functions.push(format!("{tag}({}%)", fmt_number(value)));
            }
        }
        if let Some(angle) = self.angle(HUE_ROTATE, constants) {
            functions.push(format!("hue-rotate({})", angle.css_string()));
        }
        if let Some(Value::Shadows(shadows)) = self.get(DROP_SHADOW) {
            for shadow in shadows {
                let shadow = shadow.view_shadow(constants);
                if shadow.visible() {
                    functions.push(format!("drop-shadow({})", shadow.text_css(constants)));
                }
            }
        }

        (!functions.is_empty()).then(|| functions.join(" "))
    }
}

impl PropertyContainer for FilterProperty {
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

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::error::{self, Error};
    use crate::style::ShadowProperty;
    use crate::units::AngleUnit;

    #[test]
    fn fixed_order() {
        let mut filter = FilterProperty::new();
        filter.set(HUE_ROTATE, AngleUnit::deg(90.0));
        filter.set(SEPIA, 40);
        filter.set(BLUR, 2.5);
        filter.set(BRIGHTNESS, 120);
        assert_eq!(
            filter.css_string(&()).as_deref(),
            Some("blur(2.5px) brightness(120%) sepia(40%) hue-rotate(90deg)")
        );
    }

    #[test]
    fn ranges_are_enforced() {
        let mut filter = FilterProperty::new();
        let (accepted, errors) = error::capture(|| filter.set(SEPIA, 101));
        assert!(!accepted);
        assert!(matches!(errors[0], Error::InvalidPropertyValue { .. }));
        assert!(filter.set(SATURATE, 5000));
        assert!(!filter.is_empty());
    }

    #[test]
    fn drop_shadow_and_references() {
        let constants: HashMap<String, String> = HashMap::from([("amount".to_owned(), "30".to_owned())]);
        let mut filter = FilterProperty::new();
        filter.set(GRAYSCALE, "@amount");
        filter.set(DROP_SHADOW, ShadowProperty::text(2, 2, 1, "black").unwrap());
        assert_eq!(
            filter.css_string(&constants).as_deref(),
            Some("grayscale(30%) drop-shadow(2px 2px 1px rgb(0,0,0))")
        );
    }

    #[test]
    fn empty_filter() {
        assert_eq!(FilterProperty::new().css_string(&()), None);
    }
}
