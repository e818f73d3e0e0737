//! Box and text shadows.

use once_cell::sync::Lazy;

use crate::data::DataObject;
use crate::error::Result;
use crate::property::{fill_from_object, Kind, Properties, PropertyContainer, Schema, Value};
use crate::theme::Constants;
use crate::units::{Color, SizeValue};

pub const COLOR: &str = "color";
pub const INSET: &str = "inset";
pub const X_OFFSET: &str = "x-offset";
pub const Y_OFFSET: &str = "y-offset";
pub const BLUR: &str = "blur";
pub const SPREAD_RADIUS: &str = "spread-radius";

static SCHEMA: Lazy<Schema> = Lazy::new(|| {
    Schema::new(
        "shadow",
        &[
            (COLOR, Kind::Color),
            (INSET, Kind::Bool),
            (X_OFFSET, Kind::Size),
            (Y_OFFSET, Kind::Size),
            (BLUR, Kind::Size),
            (SPREAD_RADIUS, Kind::Size),
        ],
    )
    .with_aliases(&[
        ("blur-radius", BLUR),
        ("spread", SPREAD_RADIUS),
        ("x", X_OFFSET),
        ("y", Y_OFFSET),
    ])
});

/// One shadow of a `shadow`, `text-shadow` or `drop-shadow` list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShadowProperty {
    properties: Properties,
}

impl ShadowProperty {
    pub fn new() -> Self {
        Self::default()
    }

    /// A box shadow.
    pub fn shadow(
        x_offset: impl Into<Value>,
        y_offset: impl Into<Value>,
        blur: impl Into<Value>,
        spread_radius: impl Into<Value>,
        color: impl Into<Value>,
    ) -> Result<Self> {
        let mut shadow = Self::new();
        shadow.try_set(X_OFFSET, Some(x_offset.into()))?;
        shadow.try_set(Y_OFFSET, Some(y_offset.into()))?;
        shadow.try_set(BLUR, Some(blur.into()))?;
        shadow.try_set(SPREAD_RADIUS, Some(spread_radius.into()))?;
        shadow.try_set(COLOR, Some(color.into()))?;
        Ok(shadow)
    }

    /// An inner box shadow.
    pub fn inset(
        x_offset: impl Into<Value>,
        y_offset: impl Into<Value>,
        blur: impl Into<Value>,
        spread_radius: impl Into<Value>,
        color: impl Into<Value>,
    ) -> Result<Self> {
        let mut shadow = Self::shadow(x_offset, y_offset, blur, spread_radius, color)?;
        shadow.try_set(INSET, Some(Value::Bool(true)))?;
        Ok(shadow)
    }

    /// A text shadow (no spread, never inset).
    pub fn text(
        x_offset: impl Into<Value>,
        y_offset: impl Into<Value>,
        blur: impl Into<Value>,
        color: impl Into<Value>,
    ) -> Result<Self> {
        let mut shadow = Self::new();
        shadow.try_set(X_OFFSET, Some(x_offset.into()))?;
        shadow.try_set(Y_OFFSET, Some(y_offset.into()))?;
        shadow.try_set(BLUR, Some(blur.into()))?;
        shadow.try_set(COLOR, Some(color.into()))?;
        Ok(shadow)
    }

    pub fn from_object(object: &DataObject) -> Result<Self> {
        let mut shadow = Self::new();
        fill_from_object(&mut shadow, object)?;
        Ok(shadow)
    }

    pub fn view_shadow(&self, constants: &dyn Constants) -> ViewShadow {
        let size = |tag| self.size(tag, constants).unwrap_or_default();
        ViewShadow {
            color: self.color(COLOR, constants).unwrap_or(Color::BLACK),
            inset: self.bool_value(INSET, constants).unwrap_or(false),
            x_offset: size(X_OFFSET),
            y_offset: size(Y_OFFSET),
            blur: size(BLUR),
            spread_radius: size(SPREAD_RADIUS),
        }
    }
}

impl PropertyContainer for ShadowProperty {
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

/// A shadow with every reference resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewShadow {
    pub color: Color,
    pub inset: bool,
    pub x_offset: SizeValue,
    pub y_offset: SizeValue,
    pub blur: SizeValue,
    pub spread_radius: SizeValue,
}

impl ViewShadow {
    /// Drawn only with a non-transparent color and some extent.
    pub fn visible(&self) -> bool {
        let extent = |size: &SizeValue| !size.is_auto() && !size.is_zero();
        self.color.alpha() != 0
            && (extent(&self.x_offset)
                || extent(&self.y_offset)
                || extent(&self.blur)
                || extent(&self.spread_radius))
    }

    /// `[inset ]X Y BLUR SPREAD COLOR`.
    pub fn box_css(&self, constants: &dyn Constants) -> String {
        let size = |size: &SizeValue| size.css_string("0", constants);
        let prefix = if self.inset { "inset " } else { "" };
        format!(
            "{prefix}{} {} {} {} {}",
            size(&self.x_offset),
            size(&self.y_offset),
            size(&self.blur),
            size(&self.spread_radius),
            self.color.css_string()
        )
    }

    /// `X Y BLUR COLOR`.
    pub fn text_css(&self, constants: &dyn Constants) -> String {
        let size = |size: &SizeValue| size.css_string("0", constants);
        format!(
            "{} {} {} {}",
            size(&self.x_offset),
            size(&self.y_offset),
            size(&self.blur),
            self.color.css_string()
        )
    }
}

/// Visible shadows joined with `, `; `None` when nothing is visible.
pub fn shadows_css(shadows: &[ShadowProperty], text: bool, constants: &dyn Constants) -> Option<String> {
    let items: Vec<String> = shadows
        .iter()
        .map(|shadow| shadow.view_shadow(constants))
        .filter(ViewShadow::visible)
        .map(|shadow| {
            if text {
                shadow.text_css(constants)
            } else {
                shadow.box_css(constants)
            }
        })
        .collect();
    (!items.is_empty()).then(|| items.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box_shadow_css() {
        let shadow = ShadowProperty::shadow(1, 2, 3, 0, "black").unwrap();
        assert_eq!(
            shadows_css(&[shadow], false, &()).as_deref(),
            Some("1px 2px 3px 0 rgb(0,0,0)")
        );
    }

    #[test]
    fn inset_and_text() {
        let inset = ShadowProperty::inset(0, 0, 4, 1, "red").unwrap();
        let view = inset.view_shadow(&());
        assert_eq!(view.box_css(&()), "inset 0 0 4px 1px rgb(255,0,0)");
        assert_eq!(view.text_css(&()), "0 0 4px rgb(255,0,0)");
    }

    #[test]
    fn transparent_shadow_is_dropped() {
        let hidden = ShadowProperty::shadow(5, 5, 0, 0, "transparent").unwrap();
        let shown = ShadowProperty::text(1, 1, 0, "#80000000").unwrap();
        assert_eq!(
            shadows_css(&[hidden.clone(), shown], true, &()).as_deref(),
            Some("1px 1px 0 rgba(0,0,0,0.50)")
        );
        assert_eq!(shadows_css(&[hidden], false, &()), None);
    }

    #[test]
    fn shadow_without_extent_is_invisible() {
        let flat = ShadowProperty::shadow(0, 0, 0, 0, "black").unwrap();
        assert!(!flat.view_shadow(&()).visible());
    }

    #[test]
    fn from_object_with_aliases() {
        let object = DataObject::new("_")
            .with("x", "2px")
            .with("blur-radius", "@blur")
            .with("color", "blue");
        let shadow = ShadowProperty::from_object(&object).unwrap();
        assert_eq!(
            shadow.all_tags(),
            vec![X_OFFSET.to_owned(), BLUR.to_owned(), COLOR.to_owned()]
        );
    }
}
