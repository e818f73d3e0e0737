//! 32-bit ARGB [`Color`] with hex, `rgb()/rgba()`, `hsl()/hsla()` and named forms.

use std::fmt;
use std::str::FromStr;

use super::color_names;
use crate::error::{Error, Result};

/// An ARGB color packed into a `u32` (`0xAARRGGBB`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color(pub u32);

impl Color {
    pub const TRANSPARENT: Color = Color(0x0000_0000);
    pub const BLACK: Color = Color(0xff00_0000);
    pub const WHITE: Color = Color(0xffff_ffff);
    pub const RED: Color = Color(0xffff_0000);
    pub const GREEN: Color = Color(0xff00_8000);
    pub const BLUE: Color = Color(0xff00_00ff);
    pub const GRAY: Color = Color(0xff80_8080);

    pub const fn argb(alpha: u8, red: u8, green: u8, blue: u8) -> Self {
        Color(((alpha as u32) << 24) | ((red as u32) << 16) | ((green as u32) << 8) | blue as u32)
    }

    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self::argb(0xff, red, green, blue)
    }

    pub fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub fn red(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub fn green(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub fn blue(self) -> u8 {
        self.0 as u8
    }

    /// Look a color up in the CSS named-color table.
    pub fn named(name: &str) -> Option<Color> {
        color_names::lookup(&name.trim().to_ascii_lowercase()).map(Color)
    }

    /// Parse a color from hex, functional, or named notation.
    pub fn parse(text: &str) -> Result<Color> {
        let text = text.trim();
        let lower = text.to_ascii_lowercase();

        if let Some(hex) = lower.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(|| Error::invalid("color", text));
        }
        if let Some(args) = function_args(&lower, "rgba").or_else(|| function_args(&lower, "rgb")) {
            return parse_rgb(args, text);
        }
        if let Some(args) = function_args(&lower, "hsla").or_else(|| function_args(&lower, "hsl")) {
            return parse_hsl(args, text);
        }
        Color::named(&lower).ok_or_else(|| Error::invalid("color", text))
    }

    /// CSS form: `rgb(r,g,b)` when opaque, `rgba(r,g,b,a)` with a two-digit alpha otherwise.
    pub fn css_string(self) -> String {
        if self.alpha() == 0xff {
            format!("rgb({},{},{})", self.red(), self.green(), self.blue())
        } else {
            format!(
                "rgba({},{},{},{:.2})",
                self.red(),
                self.green(),
                self.blue(),
                self.alpha() as f64 / 255.0
            )
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:08x}", self.0)
    }
}

impl FromStr for Color {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<u32> for Color {
    fn from(argb: u32) -> Self {
        Color(argb)
    }
}

// ---------------------------------------------------------------------------
// Parsing helpers
// ---------------------------------------------------------------------------

fn function_args<'a>(text: &'a str, name: &str) -> Option<&'a str> {
    text.strip_prefix(name)?
        .trim_start()
        .strip_prefix('(')?
        .trim_end()
        .strip_suffix(')')
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|n| n * 17);
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();

    match hex.len() {
        3 => Some(Color::rgb(nibble(0)?, nibble(1)?, nibble(2)?)),
        4 => Some(Color::argb(nibble(0)?, nibble(1)?, nibble(2)?, nibble(3)?)),
        6 => Some(Color::rgb(byte(0)?, byte(2)?, byte(4)?)),
        8 => Some(Color::argb(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
        _ => None,
    }
}

fn split_args(args: &str) -> Vec<&str> {
    if args.contains(',') {
        args.split(',').map(str::trim).collect()
    } else {
        args.split_whitespace().filter(|s| *s != "/").collect()
    }
}

/// A color channel: `0..255`, a percentage, or a `0..1` fraction.
fn parse_channel(text: &str, source: &str) -> Result<u8> {
    let value = if let Some(percent) = text.strip_suffix('%') {
        let percent: f64 = percent
            .trim()
            .parse()
            .map_err(|_| Error::invalid("color", source))?;
        if !(0.0..=100.0).contains(&percent) {
            return Err(Error::ColorChannel(source.to_owned()));
        }
        percent * 255.0 / 100.0
    } else if text.contains('.') {
        let fraction: f64 = text.parse().map_err(|_| Error::invalid("color", source))?;
        if !(0.0..=1.0).contains(&fraction) {
            return Err(Error::ColorChannel(source.to_owned()));
        }
        fraction * 255.0
    } else {
        let value: i64 = text.parse().map_err(|_| Error::invalid("color", source))?;
        if !(0..=255).contains(&value) {
            return Err(Error::ColorChannel(source.to_owned()));
        }
        value as f64
    };
    Ok(value.round() as u8)
}

/// An alpha channel: a `0..1` fraction or a percentage.
fn parse_alpha(text: &str, source: &str) -> Result<u8> {
    let fraction = if let Some(percent) = text.strip_suffix('%') {
        percent
            .trim()
            .parse::<f64>()
            .map_err(|_| Error::invalid("color", source))?
            / 100.0
    } else {
        text.parse::<f64>()
            .map_err(|_| Error::invalid("color", source))?
    };
    if !(0.0..=1.0).contains(&fraction) {
        return Err(Error::ColorChannel(source.to_owned()));
    }
    Ok((fraction * 255.0).round() as u8)
}

fn parse_rgb(args: &str, source: &str) -> Result<Color> {
    let parts = split_args(args);
    let alpha = match parts.len() {
        3 => 0xff,
        4 => parse_alpha(parts[3], source)?,
        _ => return Err(Error::invalid("color", source)),
    };
    Ok(Color::argb(
        alpha,
        parse_channel(parts[0], source)?,
        parse_channel(parts[1], source)?,
        parse_channel(parts[2], source)?,
    ))
}

fn parse_percent(text: &str, source: &str) -> Result<f64> {
    let value: f64 = text
        .trim_end_matches('%')
        .trim()
        .parse()
        .map_err(|_| Error::invalid("color", source))?;
    if !(0.0..=100.0).contains(&value) {
        return Err(Error::ColorChannel(source.to_owned()));
    }
    Ok(value / 100.0)
}

fn parse_hsl(args: &str, source: &str) -> Result<Color> {
    let parts = split_args(args);
    let alpha = match parts.len() {
        3 => 0xff,
        4 => parse_alpha(parts[3], source)?,
        _ => return Err(Error::invalid("color", source)),
    };
    let hue: f64 = parts[0]
        .trim_end_matches("deg")
        .trim()
        .parse()
        .map_err(|_| Error::invalid("color", source))?;
    let saturation = parse_percent(parts[1], source)?;
    let lightness = parse_percent(parts[2], source)?;

    let hue = hue.rem_euclid(360.0) / 60.0;
    let chroma = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let x = chroma * (1.0 - (hue % 2.0 - 1.0).abs());
    let (r, g, b) = match hue as u32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };
    let m = lightness - chroma / 2.0;
    let channel = |v: f64| ((v + m) * 255.0).round() as u8;
    Ok(Color::argb(alpha, channel(r), channel(g), channel(b)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors() {
        let c = Color(0x80112233);
        assert_eq!(c.alpha(), 0x80);
        assert_eq!(c.red(), 0x11);
        assert_eq!(c.green(), 0x22);
        assert_eq!(c.blue(), 0x33);
    }

    #[test]
    fn parse_hex_forms() {
        assert_eq!(Color::parse("#f00").unwrap(), Color(0xffff0000));
        assert_eq!(Color::parse("#8f00").unwrap(), Color(0x88ff0000));
        assert_eq!(Color::parse("#2196F3").unwrap(), Color(0xff2196f3));
        assert_eq!(Color::parse("#802196f3").unwrap(), Color(0x802196f3));
    }

    #[test]
    fn rrggbb_is_opaque() {
        assert_eq!(Color::parse("#123456").unwrap().alpha(), 0xff);
    }

    #[test]
    fn parse_rgb_forms() {
        assert_eq!(Color::parse("rgb(255,0,0)").unwrap(), Color::RED);
        assert_eq!(Color::parse("rgb(100%, 0%, 0%)").unwrap(), Color::RED);
        assert_eq!(Color::parse("rgb(1.0, 0.0, 0.0)").unwrap(), Color::RED);
        assert_eq!(Color::parse("RGBA(0, 0, 255, 1)").unwrap(), Color::BLUE);
        assert_eq!(Color::parse("rgba(0,0,0,50%)").unwrap().alpha(), 128);
    }

    #[test]
    fn channel_out_of_range() {
        assert!(matches!(
            Color::parse("rgb(256,0,0)"),
            Err(Error::ColorChannel(_))
        ));
        assert!(matches!(
            Color::parse("rgba(0,0,0,1.5)"),
            Err(Error::ColorChannel(_))
        ));
    }

    #[test]
    fn parse_named() {
        assert_eq!(Color::parse("red").unwrap(), Color::RED);
        assert_eq!(Color::parse("Green").unwrap(), Color::GREEN);
        assert_eq!(Color::parse("transparent").unwrap(), Color::TRANSPARENT);
        assert!(Color::parse("notacolor").is_err());
    }

    #[test]
    fn parse_hsl_forms() {
        assert_eq!(Color::parse("hsl(0, 100%, 50%)").unwrap(), Color::RED);
        assert_eq!(Color::parse("hsl(240, 100%, 50%)").unwrap(), Color::BLUE);
        assert_eq!(Color::parse("hsla(0, 0%, 100%, 1)").unwrap(), Color::WHITE);
    }

    #[test]
    fn css_string_alpha() {
        assert_eq!(Color::rgb(33, 150, 243).css_string(), "rgb(33,150,243)");
        let half = Color::parse("rgba(10,20,30,.5)").unwrap();
        assert_eq!(half.css_string(), "rgba(10,20,30,0.50)");
    }

    #[test]
    fn display_is_hex() {
        assert_eq!(Color(0xff2196f3).to_string(), "#ff2196f3");
        assert_eq!(Color::parse(&Color(0x102196f3).to_string()).unwrap(), Color(0x102196f3));
    }

    #[test]
    fn named_table_is_large() {
        assert!(color_names::NAMED_COLORS.len() >= 140);
    }
}
