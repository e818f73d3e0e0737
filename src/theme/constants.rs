//! Named constant lookup and `@name` reference resolution.

use std::collections::HashMap;

use crate::error::{self, Error};
use crate::units::Color;

/// Something that can resolve `@name` references: a theme context, a
/// session, or a plain map in tests.
pub trait Constants {
    /// Raw text of a named constant.
    fn constant(&self, name: &str) -> Option<String>;

    /// Raw text of a named color.
    fn color_text(&self, _name: &str) -> Option<String> {
        None
    }

    /// Raw text of a named image.
    fn image_text(&self, _name: &str) -> Option<String> {
        None
    }

    /// Look `name` up in constants, then colors, then images.
    fn lookup(&self, name: &str) -> Option<String> {
        self.constant(name)
            .or_else(|| self.color_text(name))
            .or_else(|| self.image_text(name))
    }

    /// A named color, with references inside its text resolved.
    fn color(&self, name: &str) -> Option<Color> {
        let text = self.color_text(name)?;
        let text = self.resolve_constants(&text)?;
        match Color::parse(&text) {
            Ok(color) => Some(color),
            Err(err) => {
                error::report(err);
                None
            }
        }
    }

    /// A named image path, with references resolved.
    fn image_constant(&self, name: &str) -> Option<String> {
        let text = self.image_text(name)?;
        self.resolve_constants(&text)
    }

    /// Replace every `@name` token in `text` by its value, recursively.
    ///
    /// Returns `None` (after reporting) on an unknown name or a cycle.
    fn resolve_constants(&self, text: &str) -> Option<String> {
        let mut visited = Vec::new();
        resolve(self, text, &mut visited)
    }
}

fn is_separator(ch: char) -> bool {
    matches!(ch, ',' | ':' | ';' | '|' | '/' | ' ')
}

fn resolve<C: Constants + ?Sized>(
    constants: &C,
    text: &str,
    visited: &mut Vec<String>,
) -> Option<String> {
    if let Some(index) = text.find(is_separator) {
        let separator = &text[index..index + 1];
        let head = resolve(constants, &text[..index], visited)?;
        let tail = resolve(constants, &text[index + 1..], visited)?;
        return Some(format!("{head}{separator}{tail}"));
    }

    let Some(name) = text.strip_prefix('@') else {
        return Some(text.to_owned());
    };

    if visited.iter().any(|seen| seen == name) {
        error::report(Error::ConstantCycle(name.to_owned()));
        return None;
    }
    let Some(value) = constants.lookup(name) else {
        error::report(Error::UnknownConstant(name.to_owned()));
        return None;
    };

    visited.push(name.to_owned());
    let resolved = resolve(constants, &value, visited);
    visited.pop();
    resolved
}

/// No constants at all.
impl Constants for () {
    fn constant(&self, _name: &str) -> Option<String> {
        None
    }
}

impl Constants for HashMap<String, String> {
    fn constant(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl<C: Constants + ?Sized> Constants for &C {
    fn constant(&self, name: &str) -> Option<String> {
        (**self).constant(name)
    }

    fn color_text(&self, name: &str) -> Option<String> {
        (**self).color_text(name)
    }

    fn image_text(&self, name: &str) -> Option<String> {
        (**self).image_text(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn chained_reference() {
        let constants = map(&[("a1", "20mm"), ("a2", "@a1")]);
        assert_eq!(constants.resolve_constants("@a2").as_deref(), Some("20mm"));
    }

    #[test]
    fn self_cycle_reports_once() {
        let constants = map(&[("b", "@b")]);
        let (resolved, errors) = error::capture(|| constants.resolve_constants("@b"));
        assert_eq!(resolved, None);
        assert_eq!(errors, vec![Error::ConstantCycle("b".into())]);
    }

    #[test]
    fn separators_are_kept() {
        let constants = map(&[("w", "1px"), ("c", "red")]);
        assert_eq!(
            constants.resolve_constants("@w solid @c").as_deref(),
            Some("1px solid red")
        );
        assert_eq!(
            constants.resolve_constants("@w/@w,x").as_deref(),
            Some("1px/1px,x")
        );
    }

    #[test]
    fn text_without_references_is_unchanged() {
        assert_eq!(().resolve_constants("10px").as_deref(), Some("10px"));
    }

    #[test]
    fn unknown_constant_fails() {
        let (resolved, errors) = error::capture(|| ().resolve_constants("@nope"));
        assert_eq!(resolved, None);
        assert_eq!(errors, vec![Error::UnknownConstant("nope".into())]);
    }
}
