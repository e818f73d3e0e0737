//! Angles: [`AngleUnit`] with exact conversions between units.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use super::fmt_number;
use crate::error::{Error, Result};

/// The unit of an [`AngleUnit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AngleUnitType {
    #[default]
    Radian,
    /// Multiples of π radians.
    PiRadian,
    Degree,
    /// 400 gradians per turn.
    Gradian,
    Turn,
}

impl AngleUnitType {
    pub fn suffix(self) -> &'static str {
        match self {
            AngleUnitType::Radian => "rad",
            AngleUnitType::PiRadian => "π",
            AngleUnitType::Degree => "deg",
            AngleUnitType::Gradian => "grad",
            AngleUnitType::Turn => "turn",
        }
    }

    /// How many radians one unit of this type is.
    fn radians_per_unit(self) -> f64 {
        match self {
            AngleUnitType::Radian => 1.0,
            AngleUnitType::PiRadian => PI,
            AngleUnitType::Degree => PI / 180.0,
            AngleUnitType::Gradian => PI / 200.0,
            AngleUnitType::Turn => 2.0 * PI,
        }
    }
}

// "grad" must be tried before "rad".
const SUFFIXES: &[(&str, AngleUnitType)] = &[
    ("deg", AngleUnitType::Degree),
    ("°", AngleUnitType::Degree),
    ("grad", AngleUnitType::Gradian),
    ("rad", AngleUnitType::Radian),
    ("turn", AngleUnitType::Turn),
    ("pi", AngleUnitType::PiRadian),
    ("π", AngleUnitType::PiRadian),
];

/// An angle with a unit, e.g. `30deg`, `0.5turn`, `2π`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AngleUnit {
    pub unit: AngleUnitType,
    pub value: f64,
}

impl AngleUnit {
    fn new(unit: AngleUnitType, value: f64) -> Self {
        Self { unit, value }
    }

    pub fn rad(value: f64) -> Self {
        Self::new(AngleUnitType::Radian, value)
    }

    pub fn pi_rad(value: f64) -> Self {
        Self::new(AngleUnitType::PiRadian, value)
    }

    pub fn deg(value: f64) -> Self {
        Self::new(AngleUnitType::Degree, value)
    }

    pub fn grad(value: f64) -> Self {
        Self::new(AngleUnitType::Gradian, value)
    }

    pub fn turn(value: f64) -> Self {
        Self::new(AngleUnitType::Turn, value)
    }

    /// Convert to another unit.
    pub fn convert(&self, unit: AngleUnitType) -> Self {
        if unit == self.unit {
            return *self;
        }
        let radians = self.value * self.unit.radians_per_unit();
        Self::new(unit, radians / unit.radians_per_unit())
    }

    pub fn to_radian(&self) -> Self {
        self.convert(AngleUnitType::Radian)
    }

    pub fn to_pi_radian(&self) -> Self {
        self.convert(AngleUnitType::PiRadian)
    }

    pub fn to_degree(&self) -> Self {
        self.convert(AngleUnitType::Degree)
    }

    pub fn to_gradian(&self) -> Self {
        self.convert(AngleUnitType::Gradian)
    }

    pub fn to_turn(&self) -> Self {
        self.convert(AngleUnitType::Turn)
    }

    pub fn is_zero(&self) -> bool {
        self.value == 0.0
    }

    /// Parse the textual form. Unsuffixed numbers are radians.
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim().to_lowercase();
        let (number, unit) = SUFFIXES
            .iter()
            .find(|(suffix, _)| text.ends_with(suffix))
            .map(|(suffix, unit)| (&text[..text.len() - suffix.len()], *unit))
            .unwrap_or((text.as_str(), AngleUnitType::Radian));

        number
            .trim()
            .parse::<f64>()
            .map(|value| Self::new(unit, value))
            .map_err(|_| Error::invalid("angle", text.as_str()))
    }

    /// CSS form. π-radians have no CSS unit and are written as radians.
    pub fn css_string(&self) -> String {
        match self.unit {
            AngleUnitType::PiRadian => format!("{}rad", fmt_number(self.value * PI)),
            _ => self.to_string(),
        }
    }
}

impl fmt::Display for AngleUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", fmt_number(self.value), self.unit.suffix())
    }
}

impl FromStr for AngleUnit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn all_types() -> [AngleUnitType; 5] {
        [
            AngleUnitType::Radian,
            AngleUnitType::PiRadian,
            AngleUnitType::Degree,
            AngleUnitType::Gradian,
            AngleUnitType::Turn,
        ]
    }

    #[test]
    fn degree_to_radian() {
        assert!((AngleUnit::deg(180.0).to_radian().value - PI).abs() < EPSILON);
    }

    #[test]
    fn known_conversions() {
        assert!((AngleUnit::turn(1.0).to_degree().value - 360.0).abs() < EPSILON);
        assert!((AngleUnit::turn(1.0).to_gradian().value - 400.0).abs() < EPSILON);
        assert!((AngleUnit::pi_rad(1.0).to_degree().value - 180.0).abs() < EPSILON);
        assert!((AngleUnit::grad(100.0).to_degree().value - 90.0).abs() < EPSILON);
    }

    #[test]
    fn conversions_are_consistent() {
        let angles = [
            AngleUnit::deg(30.0),
            AngleUnit::rad(1.2),
            AngleUnit::pi_rad(0.75),
            AngleUnit::grad(50.0),
            AngleUnit::turn(0.3),
        ];
        for angle in angles {
            let direct = angle.to_radian().value;
            for target in all_types() {
                let via = angle.convert(target).to_radian().value;
                assert!((via - direct).abs() < EPSILON, "{angle} via {target:?}");
            }
        }
    }

    #[test]
    fn parse_suffixes() {
        assert_eq!(AngleUnit::parse("30deg").unwrap(), AngleUnit::deg(30.0));
        assert_eq!(AngleUnit::parse("45°").unwrap(), AngleUnit::deg(45.0));
        assert_eq!(AngleUnit::parse("100grad").unwrap(), AngleUnit::grad(100.0));
        assert_eq!(AngleUnit::parse("1.5rad").unwrap(), AngleUnit::rad(1.5));
        assert_eq!(AngleUnit::parse("0.5turn").unwrap(), AngleUnit::turn(0.5));
        assert_eq!(AngleUnit::parse("2pi").unwrap(), AngleUnit::pi_rad(2.0));
        assert_eq!(AngleUnit::parse("2π").unwrap(), AngleUnit::pi_rad(2.0));
    }

    #[test]
    fn unsuffixed_is_radian() {
        assert_eq!(AngleUnit::parse("0.25").unwrap(), AngleUnit::rad(0.25));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(AngleUnit::parse("deg").is_err());
        assert!(AngleUnit::parse("abc").is_err());
    }

    #[test]
    fn css_string_for_pi_radians() {
        assert_eq!(AngleUnit::deg(30.0).css_string(), "30deg");
        assert_eq!(AngleUnit::pi_rad(1.0).css_string(), format!("{}rad", PI));
    }
}
