//! Lengths: [`SizeUnit`] and the resolved [`SizeValue`] (unit or expression).

use std::fmt;
use std::str::FromStr;

use super::fmt_number;
use super::size_func::SizeFunc;
use crate::error::{Error, Result};
use crate::theme::Constants;

/// The unit of a [`SizeUnit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SizeUnitType {
    /// Computed by the browser.
    #[default]
    Auto,
    Pixel,
    Em,
    Ex,
    Percent,
    Pt,
    Pc,
    Inch,
    Mm,
    Cm,
    /// Grid fraction (`fr`).
    Fraction,
}

impl SizeUnitType {
    /// Textual suffix written after the number.
    pub fn suffix(self) -> &'static str {
        match self {
            SizeUnitType::Auto => "",
            SizeUnitType::Pixel => "px",
            SizeUnitType::Em => "em",
            SizeUnitType::Ex => "ex",
            SizeUnitType::Percent => "%",
            SizeUnitType::Pt => "pt",
            SizeUnitType::Pc => "pc",
            SizeUnitType::Inch => "in",
            SizeUnitType::Mm => "mm",
            SizeUnitType::Cm => "cm",
            SizeUnitType::Fraction => "fr",
        }
    }
}

/// Suffix lookup table; every suffix is tried, the longest match wins.
const SUFFIXES: &[(&str, SizeUnitType)] = &[
    ("px", SizeUnitType::Pixel),
    ("em", SizeUnitType::Em),
    ("ex", SizeUnitType::Ex),
    ("%", SizeUnitType::Percent),
    ("pt", SizeUnitType::Pt),
    ("pc", SizeUnitType::Pc),
    ("in", SizeUnitType::Inch),
    ("mm", SizeUnitType::Mm),
    ("cm", SizeUnitType::Cm),
    ("fr", SizeUnitType::Fraction),
];

/// A length with a unit, e.g. `10px`, `1.5em`, `50%`, `auto`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SizeUnit {
    pub unit: SizeUnitType,
    pub value: f64,
}

impl PartialEq for SizeUnit {
    fn eq(&self, other: &Self) -> bool {
        self.unit == other.unit && (self.unit == SizeUnitType::Auto || self.value == other.value)
    }
}

impl SizeUnit {
    fn new(unit: SizeUnitType, value: f64) -> Self {
        Self { unit, value }
    }

    /// The `auto` size.
    pub fn auto() -> Self {
        Self::new(SizeUnitType::Auto, 0.0)
    }

    pub fn px(value: f64) -> Self {
        Self::new(SizeUnitType::Pixel, value)
    }

    pub fn em(value: f64) -> Self {
        Self::new(SizeUnitType::Em, value)
    }

    pub fn ex(value: f64) -> Self {
        Self::new(SizeUnitType::Ex, value)
    }

    pub fn percent(value: f64) -> Self {
        Self::new(SizeUnitType::Percent, value)
    }

    pub fn pt(value: f64) -> Self {
        Self::new(SizeUnitType::Pt, value)
    }

    pub fn pc(value: f64) -> Self {
        Self::new(SizeUnitType::Pc, value)
    }

    pub fn inch(value: f64) -> Self {
        Self::new(SizeUnitType::Inch, value)
    }

    pub fn mm(value: f64) -> Self {
        Self::new(SizeUnitType::Mm, value)
    }

    pub fn cm(value: f64) -> Self {
        Self::new(SizeUnitType::Cm, value)
    }

    pub fn fr(value: f64) -> Self {
        Self::new(SizeUnitType::Fraction, value)
    }

    pub fn is_auto(&self) -> bool {
        self.unit == SizeUnitType::Auto
    }

    /// `true` for a concrete zero length (not `auto`).
    pub fn is_zero(&self) -> bool {
        !self.is_auto() && self.value == 0.0
    }

    /// Parse the textual form: a number with a unit suffix, `auto`, `none`, or `0`.
    ///
    /// A bare number is read as pixels.
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim().to_ascii_lowercase();
        match text.as_str() {
            "" | "auto" | "none" => return Ok(Self::auto()),
            "0" => return Ok(Self::px(0.0)),
            _ => {}
        }

        let matched = SUFFIXES
            .iter()
            .filter(|(suffix, _)| text.ends_with(suffix))
            .max_by_key(|(suffix, _)| suffix.len());

        let (number, unit) = match matched {
            Some((suffix, unit)) => (&text[..text.len() - suffix.len()], *unit),
            None => (text.as_str(), SizeUnitType::Pixel),
        };

        number
            .trim()
            .parse::<f64>()
            .map(|value| Self::new(unit, value))
            .map_err(|_| Error::invalid("size", text.as_str()))
    }

    /// CSS form: `auto_text` for auto, `rem` for em, a unitless `0` for zero.
    pub fn css_string(&self, auto_text: &str) -> String {
        match self.unit {
            SizeUnitType::Auto => auto_text.to_owned(),
            _ if self.value == 0.0 => "0".to_owned(),
            SizeUnitType::Em => format!("{}rem", fmt_number(self.value)),
            _ => self.to_string(),
        }
    }
}

impl fmt::Display for SizeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.unit {
            SizeUnitType::Auto => write!(f, "auto"),
            unit => write!(f, "{}{}", fmt_number(self.value), unit.suffix()),
        }
    }
}

impl FromStr for SizeUnit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

// ---------------------------------------------------------------------------
// SizeValue
// ---------------------------------------------------------------------------

/// A length after constant resolution: a plain unit or a symbolic expression.
#[derive(Debug, Clone, PartialEq)]
pub enum SizeValue {
    Unit(SizeUnit),
    Func(SizeFunc),
}

impl Default for SizeValue {
    fn default() -> Self {
        SizeValue::Unit(SizeUnit::auto())
    }
}

impl SizeValue {
    /// Parse either a unit (`10px`) or an expression (`min(100%, 10px)`).
    pub fn parse(text: &str) -> Result<Self> {
        if text.contains('(') {
            SizeFunc::parse(text).map(SizeValue::Func)
        } else {
            SizeUnit::parse(text).map(SizeValue::Unit)
        }
    }

    pub fn is_auto(&self) -> bool {
        matches!(self, SizeValue::Unit(unit) if unit.is_auto())
    }

    /// `true` for a concrete zero length.
    pub fn is_zero(&self) -> bool {
        matches!(self, SizeValue::Unit(unit) if unit.is_zero())
    }

    /// The plain unit, if this is not an expression.
    pub fn unit(&self) -> Option<SizeUnit> {
        match self {
            SizeValue::Unit(unit) => Some(*unit),
            SizeValue::Func(_) => None,
        }
    }

    pub fn css_string(&self, auto_text: &str, constants: &dyn Constants) -> String {
        match self {
            SizeValue::Unit(unit) => unit.css_string(auto_text),
            SizeValue::Func(func) => func.css_string(constants),
        }
    }
}

impl From<SizeUnit> for SizeValue {
    fn from(unit: SizeUnit) -> Self {
        SizeValue::Unit(unit)
    }
}

impl From<SizeFunc> for SizeValue {
    fn from(func: SizeFunc) -> Self {
        SizeValue::Func(func)
    }
}

impl fmt::Display for SizeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SizeValue::Unit(unit) => unit.fmt(f),
            SizeValue::Func(func) => func.fmt(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_pt() {
        let size = SizeUnit::parse("12.5pt").unwrap();
        assert_eq!(size, SizeUnit::pt(12.5));
        assert_eq!(size.to_string(), "12.5pt");
        assert_eq!(size.css_string(""), "12.5pt");
    }

    #[test]
    fn parse_auto_forms() {
        assert!(SizeUnit::parse("auto").unwrap().is_auto());
        assert!(SizeUnit::parse(" NONE ").unwrap().is_auto());
        assert!(SizeUnit::parse("").unwrap().is_auto());
        assert_eq!(SizeUnit::auto().to_string(), "auto");
    }

    #[test]
    fn parse_zero_is_pixel() {
        assert_eq!(SizeUnit::parse("0").unwrap(), SizeUnit::px(0.0));
    }

    #[test]
    fn parse_bare_number_is_pixel() {
        assert_eq!(SizeUnit::parse("16").unwrap(), SizeUnit::px(16.0));
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(SizeUnit::parse("2EM").unwrap(), SizeUnit::em(2.0));
        assert_eq!(SizeUnit::parse("1.5Fr").unwrap(), SizeUnit::fr(1.5));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(SizeUnit::parse("10rem").is_err());
        assert!(SizeUnit::parse("px").is_err());
        assert!(SizeUnit::parse("ten px").is_err());
    }

    #[test]
    fn round_trip_every_unit() {
        let sizes = [
            SizeUnit::px(10.0),
            SizeUnit::em(1.25),
            SizeUnit::ex(2.0),
            SizeUnit::percent(33.5),
            SizeUnit::pt(12.0),
            SizeUnit::pc(3.0),
            SizeUnit::inch(1.0),
            SizeUnit::mm(20.0),
            SizeUnit::cm(-2.5),
            SizeUnit::fr(1.0),
            SizeUnit::px(0.0),
        ];
        for size in sizes {
            assert_eq!(SizeUnit::parse(&size.to_string()).unwrap(), size, "{size}");
        }
        assert_eq!(SizeUnit::parse("auto").unwrap(), SizeUnit::auto());
    }

    #[test]
    fn auto_equality_ignores_value() {
        let a = SizeUnit {
            unit: SizeUnitType::Auto,
            value: 3.0,
        };
        assert_eq!(a, SizeUnit::auto());
        assert_ne!(SizeUnit::px(1.0), SizeUnit::em(1.0));
    }

    #[test]
    fn css_string_rules() {
        assert_eq!(SizeUnit::auto().css_string("50%"), "50%");
        assert_eq!(SizeUnit::em(1.5).css_string(""), "1.5rem");
        assert_eq!(SizeUnit::px(0.0).css_string(""), "0");
        assert_eq!(SizeUnit::percent(0.0).css_string(""), "0");
        assert_eq!(SizeUnit::px(4.0).css_string(""), "4px");
    }

    #[test]
    fn size_value_parse() {
        assert_eq!(
            SizeValue::parse("4px").unwrap(),
            SizeValue::Unit(SizeUnit::px(4.0))
        );
        assert!(matches!(
            SizeValue::parse("min(100%, 10px)").unwrap(),
            SizeValue::Func(_)
        ));
        assert!(SizeValue::default().is_auto());
    }
}
