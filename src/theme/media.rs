//! Media conditions of theme style rules.

use std::fmt;

use crate::error::{Error, Result};
use crate::property::PropertyObject;

/// Screen orientation a media rule applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Orientation {
    #[default]
    Default,
    Portrait,
    Landscape,
}

/// When a set of style rules applies: orientation plus optional maximum
/// width and height in pixels (`0` means unbounded).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MediaCondition {
    pub orientation: Orientation,
    pub max_width: u32,
    pub max_height: u32,
}

impl MediaCondition {
    pub fn new(orientation: Orientation, max_width: u32, max_height: u32) -> Self {
        Self {
            orientation,
            max_width,
            max_height,
        }
    }

    /// Sort key: the narrowest width, then the lowest height, then
    /// orientation-specific before [`Orientation::Default`].
    ///
    /// Media rules are applied from the last to the first, so at equal
    /// limits an orientation-specific rule overrides an unoriented one.
    pub fn sort_key(&self) -> (u32, u32, bool) {
        let bound = |value: u32| if value == 0 { u32::MAX } else { value };
        (
            bound(self.max_width),
            bound(self.max_height),
            self.orientation == Orientation::Default,
        )
    }

    /// Parse the suffix of a `styles:portrait:width800` key.
    ///
    /// Each `:`-separated token is `portrait`, `landscape`, `widthN` or `heightN`;
    /// repeating a kind is an error.
    pub fn parse(key: &str) -> Result<Self> {
        let mut condition = MediaCondition::default();
        let mut seen_orientation = false;
        let mut seen_width = false;
        let mut seen_height = false;
        let error = |message: String| Error::Theme(format!("\"{key}\": {message}"));

        for token in key.split(':').map(str::trim).filter(|t| !t.is_empty()) {
            let lower = token.to_ascii_lowercase();
            match lower.as_str() {
                "portrait" | "landscape" => {
                    if seen_orientation {
                        return Err(error("orientation given twice".into()));
                    }
                    seen_orientation = true;
                    condition.orientation = if lower == "portrait" {
                        Orientation::Portrait
                    } else {
                        Orientation::Landscape
                    };
                }
                _ => {
                    let (slot, seen, number) = if let Some(n) = lower.strip_prefix("width") {
                        (&mut condition.max_width, &mut seen_width, n)
                    } else if let Some(n) = lower.strip_prefix("height") {
                        (&mut condition.max_height, &mut seen_height, n)
                    } else {
                        return Err(error(format!("unknown media token \"{token}\"")));
                    };
                    if *seen {
                        return Err(error(format!("\"{token}\" repeats a size limit")));
                    }
                    *seen = true;
                    *slot = number
                        .parse()
                        .map_err(|_| error(format!("invalid size in \"{token}\"")))?;
                }
            }
        }
        Ok(condition)
    }

    /// Whether a screen of `width`×`height` pixels satisfies the condition.
    pub fn matches(&self, width: u32, height: u32) -> bool {
        let orientation_ok = match self.orientation {
            Orientation::Default => true,
            Orientation::Portrait => height > width,
            Orientation::Landscape => height <= width,
        };
        orientation_ok
            && (self.max_width == 0 || width <= self.max_width)
            && (self.max_height == 0 || height <= self.max_height)
    }

    /// The CSS `@media` prelude, e.g. `@media screen and (orientation: portrait) and (max-width: 800px)`.
    pub fn css_prelude(&self) -> String {
        let mut prelude = String::from("@media screen");
        match self.orientation {
            Orientation::Default => {}
            Orientation::Portrait => prelude.push_str(" and (orientation: portrait)"),
            Orientation::Landscape => prelude.push_str(" and (orientation: landscape)"),
        }
        if self.max_width > 0 {
            prelude.push_str(&format!(" and (max-width: {}px)", self.max_width));
        }
        if self.max_height > 0 {
            prelude.push_str(&format!(" and (max-height: {}px)", self.max_height));
        }
        prelude
    }
}

/// The `styles:…` key suffix, the inverse of [`MediaCondition::parse`].
impl fmt::Display for MediaCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.orientation {
            Orientation::Default => {}
            Orientation::Portrait => f.write_str(":portrait")?,
            Orientation::Landscape => f.write_str(":landscape")?,
        }
        if self.max_width > 0 {
            write!(f, ":width{}", self.max_width)?;
        }
        if self.max_height > 0 {
            write!(f, ":height{}", self.max_height)?;
        }
        Ok(())
    }
}

/// Style rules scoped to a media condition.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaStyle {
    pub condition: MediaCondition,
    pub styles: Vec<(String, PropertyObject)>,
}

impl MediaStyle {
    pub fn new(condition: MediaCondition) -> Self {
        Self {
            condition,
            styles: Vec::new(),
        }
    }

    pub fn style(&self, tag: &str) -> Option<&PropertyObject> {
        self.styles.iter().find(|(t, _)| t == tag).map(|(_, style)| style)
    }

    /// Insert or replace the rule for `tag`.
    pub fn set_style(&mut self, tag: &str, style: PropertyObject) {
        match self.styles.iter_mut().find(|(t, _)| t == tag) {
            Some((_, slot)) => *slot = style,
            None => self.styles.push((tag.to_owned(), style)),
        }
    }
}
