//! Symbolic size expressions rendered as browser math functions.
//!
//! A [`SizeFunc`] is never evaluated on the server. It renders to `calc(...)`,
//! `min(...)`, `max(...)`, `clamp(...)`, `mod(...)`, `rem(...)` or
//! `round(mode, ...)`, eliding brackets when an operand sits inside a math
//! context that already groups it.

use std::fmt::{self, Write};

use super::fmt_number;
use super::size::{SizeUnit, SizeValue};
use crate::error::{self, Error, Result};
use crate::theme::Constants;

/// The operator of a [`SizeFunc`] node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SizeFuncOp {
    Sum,
    Sub,
    Mul,
    Div,
    Mod,
    Rem,
    Min,
    Max,
    Clamp,
    Round,
    RoundUp,
    RoundDown,
    RoundToZero,
}

impl SizeFuncOp {
    const ALL: [SizeFuncOp; 13] = [
        SizeFuncOp::Sum,
        SizeFuncOp::Sub,
        SizeFuncOp::Mul,
        SizeFuncOp::Div,
        SizeFuncOp::Mod,
        SizeFuncOp::Rem,
        SizeFuncOp::Min,
        SizeFuncOp::Max,
        SizeFuncOp::Clamp,
        SizeFuncOp::Round,
        SizeFuncOp::RoundUp,
        SizeFuncOp::RoundDown,
        SizeFuncOp::RoundToZero,
    ];

    /// Name used in the text form.
    pub fn name(self) -> &'static str {
        match self {
            SizeFuncOp::Sum => "sum",
            SizeFuncOp::Sub => "sub",
            SizeFuncOp::Mul => "mul",
            SizeFuncOp::Div => "div",
            SizeFuncOp::Mod => "mod",
            SizeFuncOp::Rem => "rem",
            SizeFuncOp::Min => "min",
            SizeFuncOp::Max => "max",
            SizeFuncOp::Clamp => "clamp",
            SizeFuncOp::Round => "round",
            SizeFuncOp::RoundUp => "roundUp",
            SizeFuncOp::RoundDown => "roundDown",
            SizeFuncOp::RoundToZero => "roundToZero",
        }
    }

    /// Case-insensitive lookup by text-form name.
    pub fn from_name(name: &str) -> Option<SizeFuncOp> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|op| op.name().eq_ignore_ascii_case(name))
    }

    /// `(min, max)` number of arguments.
    fn arity(self) -> (usize, Option<usize>) {
        match self {
            SizeFuncOp::Clamp => (3, Some(3)),
            SizeFuncOp::Sum | SizeFuncOp::Min | SizeFuncOp::Max => (1, None),
            _ => (2, Some(2)),
        }
    }

    /// Whether the second argument may be a plain number.
    fn accepts_number(self) -> bool {
        matches!(
            self,
            SizeFuncOp::Mul
                | SizeFuncOp::Div
                | SizeFuncOp::Mod
                | SizeFuncOp::Rem
                | SizeFuncOp::Round
                | SizeFuncOp::RoundUp
                | SizeFuncOp::RoundDown
                | SizeFuncOp::RoundToZero
        )
    }

    /// Whether a zero second argument is rejected.
    fn rejects_zero(self) -> bool {
        self.accepts_number() && self != SizeFuncOp::Mul
    }

    fn infix(self) -> Option<&'static str> {
        match self {
            SizeFuncOp::Sum => Some(" + "),
            SizeFuncOp::Sub => Some(" - "),
            SizeFuncOp::Mul => Some(" * "),
            SizeFuncOp::Div => Some(" / "),
            _ => None,
        }
    }

    fn round_strategy(self) -> Option<&'static str> {
        match self {
            SizeFuncOp::Round => Some("nearest"),
            SizeFuncOp::RoundUp => Some("up"),
            SizeFuncOp::RoundDown => Some("down"),
            SizeFuncOp::RoundToZero => Some("to-zero"),
            _ => None,
        }
    }
}

/// One operand of a [`SizeFunc`].
#[derive(Debug, Clone, PartialEq)]
pub enum SizeArg {
    Size(SizeUnit),
    /// `@name` constant reference, stored without the `@`.
    Const(String),
    Func(SizeFunc),
    Number(f64),
}

impl SizeArg {
    pub fn constant(name: impl Into<String>) -> Self {
        let name = name.into();
        match name.strip_prefix('@') {
            Some(stripped) => SizeArg::Const(stripped.to_owned()),
            None => SizeArg::Const(name),
        }
    }

    /// Parse one operand: `@name`, a nested expression, a plain number, or a size.
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim();
        if let Some(name) = text.strip_prefix('@') {
            return Ok(SizeArg::Const(name.to_owned()));
        }
        if text.contains('(') {
            return SizeFunc::parse(text).map(SizeArg::Func);
        }
        if let Ok(number) = text.parse::<f64>() {
            return Ok(SizeArg::Number(number));
        }
        SizeUnit::parse(text).map(SizeArg::Size)
    }
}

impl From<SizeUnit> for SizeArg {
    fn from(unit: SizeUnit) -> Self {
        SizeArg::Size(unit)
    }
}

impl From<SizeFunc> for SizeArg {
    fn from(func: SizeFunc) -> Self {
        SizeArg::Func(func)
    }
}

impl From<f64> for SizeArg {
    fn from(number: f64) -> Self {
        SizeArg::Number(number)
    }
}

impl From<i32> for SizeArg {
    fn from(number: i32) -> Self {
        SizeArg::Number(number as f64)
    }
}

impl fmt::Display for SizeArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SizeArg::Size(unit) => unit.fmt(f),
            SizeArg::Const(name) => write!(f, "@{name}"),
            SizeArg::Func(func) => func.fmt(f),
            SizeArg::Number(number) => f.write_str(&fmt_number(*number)),
        }
    }
}

/// An expression node `(op, args)`.
#[derive(Debug, Clone, PartialEq)]
pub struct SizeFunc {
    op: SizeFuncOp,
    args: Vec<SizeArg>,
}

impl SizeFunc {
    /// Build a node, checking arity and operand kinds.
    pub fn new(op: SizeFuncOp, args: Vec<SizeArg>) -> Result<Self> {
        let fail = |message: String| Error::SizeFunc {
            func: op.name().to_owned(),
            message,
        };

        let (min, max) = op.arity();
        if args.len() < min || max.is_some_and(|max| args.len() > max) {
            let expected = match max {
                Some(max) if max == min => format!("{min}"),
                _ => format!("at least {min}"),
            };
            return Err(fail(format!(
                "expected {expected} arguments, got {}",
                args.len()
            )));
        }

        for (index, arg) in args.iter().enumerate() {
            if let SizeArg::Number(number) = arg {
                if index != 1 || !op.accepts_number() {
                    return Err(fail(format!(
                        "argument {} must be a size, got the number {}",
                        index + 1,
                        fmt_number(*number)
                    )));
                }
                if *number == 0.0 && op.rejects_zero() {
                    return Err(fail("the second argument is zero".to_owned()));
                }
            }
        }

        Ok(Self { op, args })
    }

    pub fn op(&self) -> SizeFuncOp {
        self.op
    }

    pub fn args(&self) -> &[SizeArg] {
        &self.args
    }

    pub fn sum(args: impl IntoIterator<Item = SizeArg>) -> Result<Self> {
        Self::new(SizeFuncOp::Sum, args.into_iter().collect())
    }

    pub fn min(args: impl IntoIterator<Item = SizeArg>) -> Result<Self> {
        Self::new(SizeFuncOp::Min, args.into_iter().collect())
    }

    pub fn max(args: impl IntoIterator<Item = SizeArg>) -> Result<Self> {
        Self::new(SizeFuncOp::Max, args.into_iter().collect())
    }

    pub fn sub(a: impl Into<SizeArg>, b: impl Into<SizeArg>) -> Result<Self> {
        Self::new(SizeFuncOp::Sub, vec![a.into(), b.into()])
    }

    pub fn mul(a: impl Into<SizeArg>, b: impl Into<SizeArg>) -> Result<Self> {
        Self::new(SizeFuncOp::Mul, vec![a.into(), b.into()])
    }

    pub fn div(a: impl Into<SizeArg>, b: impl Into<SizeArg>) -> Result<Self> {
        Self::new(SizeFuncOp::Div, vec![a.into(), b.into()])
    }

    pub fn modulo(a: impl Into<SizeArg>, b: impl Into<SizeArg>) -> Result<Self> {
        Self::new(SizeFuncOp::Mod, vec![a.into(), b.into()])
    }

    pub fn rem(a: impl Into<SizeArg>, b: impl Into<SizeArg>) -> Result<Self> {
        Self::new(SizeFuncOp::Rem, vec![a.into(), b.into()])
    }

    pub fn clamp(
        min: impl Into<SizeArg>,
        value: impl Into<SizeArg>,
        max: impl Into<SizeArg>,
    ) -> Result<Self> {
        Self::new(SizeFuncOp::Clamp, vec![min.into(), value.into(), max.into()])
    }

    pub fn round(value: impl Into<SizeArg>, step: impl Into<SizeArg>) -> Result<Self> {
        Self::new(SizeFuncOp::Round, vec![value.into(), step.into()])
    }

    pub fn round_up(value: impl Into<SizeArg>, step: impl Into<SizeArg>) -> Result<Self> {
        Self::new(SizeFuncOp::RoundUp, vec![value.into(), step.into()])
    }

    pub fn round_down(value: impl Into<SizeArg>, step: impl Into<SizeArg>) -> Result<Self> {
        Self::new(SizeFuncOp::RoundDown, vec![value.into(), step.into()])
    }

    pub fn round_to_zero(value: impl Into<SizeArg>, step: impl Into<SizeArg>) -> Result<Self> {
        Self::new(SizeFuncOp::RoundToZero, vec![value.into(), step.into()])
    }

    /// Parse the text form, e.g. `sub(100%, @a1)` or `max(10px, mul(2em, 3))`.
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim();
        let invalid = || Error::invalid("size function", text);

        let open = text.find('(').ok_or_else(invalid)?;
        let inner = text[open + 1..].strip_suffix(')').ok_or_else(invalid)?;
        let op = SizeFuncOp::from_name(&text[..open]).ok_or_else(invalid)?;

        let args = split_top_level(inner)
            .ok_or_else(invalid)?
            .into_iter()
            .map(SizeArg::parse)
            .collect::<Result<Vec<_>>>()?;
        Self::new(op, args)
    }

    /// Render as a CSS math function, resolving `@name` operands.
    pub fn css_string(&self, constants: &dyn Constants) -> String {
        let mut out = String::new();
        self.write_css(&mut out, None, constants);
        out
    }

    fn write_css(&self, out: &mut String, enclosing: Option<SizeFuncOp>, constants: &dyn Constants) {
        if let Some(separator) = self.op.infix() {
            let (open, close) = match enclosing {
                None => ("calc(", ")"),
                Some(outer) if outer.infix().is_none() => ("", ""),
                Some(outer) if outer == self.op && matches!(outer, SizeFuncOp::Sum | SizeFuncOp::Mul) => {
                    ("", "")
                }
                Some(_) => ("(", ")"),
            };
            out.push_str(open);
            for (index, arg) in self.args.iter().enumerate() {
                if index > 0 {
                    out.push_str(separator);
                }
                write_arg(arg, out, self.op, constants);
            }
            out.push_str(close);
            return;
        }

        match self.op.round_strategy() {
            Some(strategy) => {
                let _ = write!(out, "round({strategy}, ");
            }
            None => {
                out.push_str(self.op.name());
                out.push('(');
            }
        }
        for (index, arg) in self.args.iter().enumerate() {
            if index > 0 {
                out.push_str(", ");
            }
            write_arg(arg, out, self.op, constants);
        }
        out.push(')');
    }
}

fn write_unit(unit: &SizeUnit, out: &mut String) {
    if unit.is_auto() {
        out.push_str("auto");
    } else if unit.value == 0.0 {
        out.push_str("0px");
    } else {
        out.push_str(&unit.css_string("auto"));
    }
}

fn write_arg(arg: &SizeArg, out: &mut String, op: SizeFuncOp, constants: &dyn Constants) {
    match arg {
        SizeArg::Size(unit) => write_unit(unit, out),
        SizeArg::Number(number) => out.push_str(&fmt_number(*number)),
        SizeArg::Func(func) => func.write_css(out, Some(op), constants),
        SizeArg::Const(name) => {
            let resolved = constants
                .resolve_constants(&format!("@{name}"))
                .map(|text| SizeValue::parse(&text));
            match resolved {
                Some(Ok(SizeValue::Unit(unit))) => write_unit(&unit, out),
                Some(Ok(SizeValue::Func(func))) => func.write_css(out, Some(op), constants),
                Some(Err(err)) => {
                    error::report(err);
                    out.push('0');
                }
                None => out.push('0'),
            }
        }
    }
}

/// Split on commas that are not nested inside parentheses.
fn split_top_level(text: &str) -> Option<Vec<&str>> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (index, ch) in text.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.checked_sub(1)?,
            ',' if depth == 0 => {
                parts.push(text[start..index].trim());
                start = index + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return None;
    }
    let last = text[start..].trim();
    if !last.is_empty() || !parts.is_empty() {
        parts.push(last);
    }
    Some(parts)
}

impl fmt::Display for SizeFunc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.op.name())?;
        for (index, arg) in self.args.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            arg.fmt(f)?;
        }
        f.write_str(")")
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn constants() -> HashMap<String, String> {
        HashMap::from([("a1".to_owned(), "120px".to_owned())])
    }

    #[test]
    fn min_renders_as_function() {
        let func = SizeFunc::min([SizeUnit::percent(100.0).into(), SizeUnit::px(10.0).into()]).unwrap();
        assert_eq!(func.css_string(&()), "min(100%, 10px)");
    }

    #[test]
    fn sub_resolves_constant() {
        let func = SizeFunc::sub(SizeUnit::percent(100.0), SizeArg::constant("@a1")).unwrap();
        assert_eq!(func.css_string(&constants()), "calc(100% - 120px)");
    }

    #[test]
    fn nested_brackets() {
        let left = SizeFunc::sub(SizeUnit::percent(100.0), SizeArg::constant("a1")).unwrap();
        let inner = SizeFunc::mul(SizeArg::constant("a1"), 3).unwrap();
        let right = SizeFunc::div(inner, 2).unwrap();
        let func = SizeFunc::mul(left, right).unwrap();
        assert_eq!(
            func.css_string(&constants()),
            "calc((100% - 120px) * ((120px * 3) / 2))"
        );
    }

    #[test]
    fn same_op_nesting_elides_brackets() {
        let inner = SizeFunc::sum([SizeUnit::px(1.0).into(), SizeUnit::em(2.0).into()]).unwrap();
        let outer = SizeFunc::sum([inner.into(), SizeUnit::percent(5.0).into()]).unwrap();
        assert_eq!(outer.css_string(&()), "calc(1px + 2rem + 5%)");
    }

    #[test]
    fn infix_inside_function_has_no_calc() {
        let diff = SizeFunc::sub(SizeUnit::percent(100.0), SizeUnit::px(20.0)).unwrap();
        let func = SizeFunc::max([diff.into(), SizeUnit::px(100.0).into()]).unwrap();
        assert_eq!(func.css_string(&()), "max(100% - 20px, 100px)");
    }

    #[test]
    fn round_strategies() {
        let up = SizeFunc::round_up(SizeUnit::percent(33.0), SizeUnit::px(10.0)).unwrap();
        assert_eq!(up.css_string(&()), "round(up, 33%, 10px)");
        let nearest = SizeFunc::round(SizeUnit::px(15.0), 4).unwrap();
        assert_eq!(nearest.css_string(&()), "round(nearest, 15px, 4)");
    }

    #[test]
    fn arity_is_checked() {
        assert!(SizeFunc::new(SizeFuncOp::Clamp, vec![SizeUnit::px(1.0).into()]).is_err());
        assert!(SizeFunc::new(SizeFuncOp::Sub, vec![SizeUnit::px(1.0).into()]).is_err());
        assert!(SizeFunc::min([]).is_err());
    }

    #[test]
    fn division_by_zero_is_rejected() {
        assert!(SizeFunc::div(SizeUnit::px(10.0), 0).is_err());
        assert!(SizeFunc::round_down(SizeUnit::px(10.0), 0).is_err());
        assert!(SizeFunc::mul(SizeUnit::px(10.0), 0).is_ok());
    }

    #[test]
    fn numbers_only_in_second_position() {
        assert!(SizeFunc::mul(2, SizeUnit::px(10.0)).is_err());
        assert!(SizeFunc::min([SizeUnit::px(1.0).into(), SizeArg::Number(2.0)]).is_err());
    }

    #[test]
    fn parse_text_form() {
        let func = SizeFunc::parse("sub(100%, @a1)").unwrap();
        assert_eq!(func.op(), SizeFuncOp::Sub);
        assert_eq!(func.to_string(), "sub(100%, @a1)");

        let nested = SizeFunc::parse("max(10px, mul(2em, 3))").unwrap();
        assert_eq!(nested.to_string(), "max(10px, mul(2em, 3))");
        assert_eq!(nested.css_string(&()), "max(10px, 2rem * 3)");

        let rounded = SizeFunc::parse("roundToZero(7px, 2)").unwrap();
        assert_eq!(rounded.op(), SizeFuncOp::RoundToZero);
    }

    #[test]
    fn parse_rejects_malformed() {
        assert!(SizeFunc::parse("foo(1px)").is_err());
        assert!(SizeFunc::parse("min(1px").is_err());
        assert!(SizeFunc::parse("min(1px, (2px)").is_err());
    }

    #[test]
    fn unknown_constant_renders_zero() {
        let func = SizeFunc::sum([SizeUnit::px(5.0).into(), SizeArg::constant("missing")]).unwrap();
        let (css, errors) = error::capture(|| func.css_string(&()));
        assert_eq!(css, "calc(5px + 0)");
        assert_eq!(errors, vec![Error::UnknownConstant("missing".into())]);
    }
}
