//! Composition of the `transform` value.
//!
//! Parts are always written as `skew translate scale rotate`, so partial
//! updates of one part never reorder the others. The 3D forms are used only
//! when the view has a non-zero `perspective`.

use crate::property::PropertyContainer;
use crate::theme::Constants;
use crate::units::{fmt_number, AngleUnit};
use crate::view::schema::{
    PERSPECTIVE, ROTATE, ROTATE_X, ROTATE_Y, ROTATE_Z, SCALE_X, SCALE_Y, SCALE_Z, SKEW_X, SKEW_Y,
    TRANSLATE_X, TRANSLATE_Y, TRANSLATE_Z,
};

/// Whether `style` has a perspective that switches transforms to 3D.
pub fn has_perspective(style: &dyn PropertyContainer, constants: &dyn Constants) -> bool {
    style
        .size(PERSPECTIVE, constants)
        .is_some_and(|size| !size.is_auto() && !size.is_zero())
}

/// The `transform` value, or `None` when every part is the identity.
pub fn transform_css(style: &dyn PropertyContainer, constants: &dyn Constants) -> Option<String> {
    let three_d = has_perspective(style, constants);
    let mut parts: Vec<String> = Vec::new();

    let angle = |tag| style.angle(tag, constants).unwrap_or(AngleUnit::deg(0.0));
    let skew_x = angle(SKEW_X);
    let skew_y = angle(SKEW_Y);
    if !skew_x.is_zero() || !skew_y.is_zero() {
        parts.push(format!("skew({},{})", skew_x.css_string(), skew_y.css_string()));
    }

    let offset = |tag| style.size(tag, constants).filter(|size| !size.is_auto() && !size.is_zero());
    let (x, y) = (offset(TRANSLATE_X), offset(TRANSLATE_Y));
    let z = if three_d { offset(TRANSLATE_Z) } else { None };
    if x.is_some() || y.is_some() || z.is_some() {
        let css = |size: Option<crate::units::SizeValue>| match size {
            Some(size) => size.css_string("0", constants),
            None => "0".to_owned(),
        };
        if three_d {
            parts.push(format!("translate3d({},{},{})", css(x), css(y), css(z)));
        } else {
            parts.push(format!("translate({},{})", css(x), css(y)));
        }
    }

    let factor = |tag| style.float(tag, constants).unwrap_or(1.0);
    let (sx, sy) = (factor(SCALE_X), factor(SCALE_Y));
    let sz = if three_d { factor(SCALE_Z) } else { 1.0 };
    if sx != 1.0 || sy != 1.0 || sz != 1.0 {
        if three_d {
            parts.push(format!(
                "scale3d({},{},{})",
                fmt_number(sx),
                fmt_number(sy),
                fmt_number(sz)
            ));
        } else {
            parts.push(format!("scale({},{})", fmt_number(sx), fmt_number(sy)));
        }
    }

    let rotate = angle(ROTATE);
    if !rotate.is_zero() {
        if three_d {
            let axis = |tag, default| style.float(tag, constants).unwrap_or(default);
            let (ax, ay, az) = (axis(ROTATE_X, 0.0), axis(ROTATE_Y, 0.0), axis(ROTATE_Z, 1.0));
            if ax != 0.0 || ay != 0.0 || az != 0.0 {
                parts.push(format!(
                    "rotate3d({},{},{},{})",
                    fmt_number(ax),
                    fmt_number(ay),
                    fmt_number(az),
                    rotate.css_string()
                ));
            }
        } else {
            parts.push(format!("rotate({})", rotate.css_string()));
        }
    }

    (!parts.is_empty()).then(|| parts.join(" "))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::property::PropertyObject;
    use crate::units::SizeUnit;
    use crate::view::VIEW_SCHEMA;

    fn style() -> PropertyObject {
        PropertyObject::new(&VIEW_SCHEMA)
    }

    #[test]
    fn identity_is_omitted() {
        let mut style = style();
        style.set(SCALE_X, 1.0);
        style.set(ROTATE, AngleUnit::deg(0.0));
        assert_eq!(transform_css(&style, &()), None);
    }

    #[test]
    fn two_d_order() {
        let mut style = style();
        style.set(ROTATE, AngleUnit::deg(30.0));
        style.set(SCALE_X, 1.5);
        style.set(TRANSLATE_Z, SizeUnit::px(5.0));
        assert_eq!(transform_css(&style, &()).as_deref(), Some("scale(1.5,1) rotate(30deg)"));

        style.set(SKEW_X, AngleUnit::deg(10.0));
        style.set(TRANSLATE_X, SizeUnit::px(4.0));
        assert_eq!(
            transform_css(&style, &()).as_deref(),
            Some("skew(10deg,0deg) translate(4px,0) scale(1.5,1) rotate(30deg)")
        );
    }

    #[test]
    fn perspective_switches_to_3d() {
        let mut style = style();
        style.set(PERSPECTIVE, SizeUnit::px(400.0));
        style.set(TRANSLATE_Z, SizeUnit::px(5.0));
        style.set(ROTATE, AngleUnit::deg(45.0));
        style.set(ROTATE_X, 1);
        style.set(ROTATE_Z, 0);
        assert_eq!(
            transform_css(&style, &()).as_deref(),
            Some("translate3d(0,0,5px) rotate3d(1,0,0,45deg)")
        );

        style.set(ROTATE_X, 0);
        assert_eq!(transform_css(&style, &()).as_deref(), Some("translate3d(0,0,5px)"));
    }
}
