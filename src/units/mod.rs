//! Unit algebra: sizes, angles, colors, ranges, and symbolic size expressions.

pub mod angle;
pub mod color;
mod color_names;
pub mod range;
pub mod size;
pub mod size_func;

pub use angle::{AngleUnit, AngleUnitType};
pub use color::Color;
pub use range::Range;
pub use size::{SizeUnit, SizeUnitType, SizeValue};
pub use size_func::{SizeArg, SizeFunc, SizeFuncOp};

/// Format a number the way CSS wants it: no trailing `.0`, no `-0`.
pub(crate) fn fmt_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_owned();
    }
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}
