//! CSS builders: inline `style=""` text, single composite values, and whole
//! stylesheets with `@media` and `@keyframes` framing.

use std::fmt::Write as _;

use crate::pool::{alloc_string_builder, finish_string_builder};

/// Common sink for the property-to-CSS mapping.
pub trait CssBuilder {
    fn add(&mut self, key: &str, value: &str);

    /// Add `values` joined by `separator`; nothing when every value is empty.
    fn add_values(&mut self, key: &str, separator: &str, values: &[String]) {
        let values: Vec<&str> = values
            .iter()
            .map(String::as_str)
            .filter(|value| !value.is_empty())
            .collect();
        if !values.is_empty() {
            self.add(key, &values.join(separator));
        }
    }
}

// ---------------------------------------------------------------------------
// ViewCssBuilder
// ---------------------------------------------------------------------------

/// Collects `key: value;` pairs for an inline style attribute.
///
/// Adding a key twice keeps its first position and the last value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewCssBuilder {
    entries: Vec<(String, String)>,
}

impl ViewCssBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<(String, String)> {
        self.entries
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn remove(&mut self, key: &str) {
        self.entries.retain(|(k, _)| k != key);
    }

    /// `key: value;` pairs separated by a single space.
    pub fn finish(&self) -> String {
        let mut buffer = alloc_string_builder();
        for (key, value) in &self.entries {
            if !buffer.is_empty() {
                buffer.push(' ');
            }
            let _ = write!(buffer, "{key}: {value};");
        }
        finish_string_builder(buffer)
    }
}

impl CssBuilder for ViewCssBuilder {
    fn add(&mut self, key: &str, value: &str) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, slot)) => *slot = value.to_owned(),
            None => self.entries.push((key.to_owned(), value.to_owned())),
        }
    }
}

// ---------------------------------------------------------------------------
// CssValueBuilder
// ---------------------------------------------------------------------------

/// Concatenates values only; keys are ignored.
#[derive(Debug, Default)]
pub struct CssValueBuilder {
    buffer: String,
}

impl CssValueBuilder {
    pub fn new() -> Self {
        Self {
            buffer: alloc_string_builder(),
        }
    }

    pub fn finish(self) -> String {
        finish_string_builder(self.buffer)
    }
}

impl CssBuilder for CssValueBuilder {
    fn add(&mut self, _key: &str, value: &str) {
        self.buffer.push_str(value);
    }
}

// ---------------------------------------------------------------------------
// CssStyleBuilder
// ---------------------------------------------------------------------------

/// Class names that are styled by the start page itself and never emitted.
pub const DISABLED_CLASSES: &[&str] = &[
    "ruiRoot",
    "ruiPopupLayer",
    "ruiTooltipLayer",
    "ruiAbsoluteLayout",
    "ruiDownloader",
];

/// Style names emitted as element selectors instead of classes.
pub const ELEMENT_STYLES: &[(&str, &str)] = &[
    ("ruiApp", "body"),
    ("ruiArticle", "article"),
    ("ruiSection", "section"),
    ("ruiAside", "aside"),
    ("ruiHeader", "header"),
    ("ruiMain", "main"),
    ("ruiFooter", "footer"),
    ("ruiNavigation", "nav"),
    ("ruiFigure", "figure"),
    ("ruiFigureCaption", "figcaption"),
    ("ruiParagraph", "p"),
    ("ruiH1", "h1"),
    ("ruiH2", "h2"),
    ("ruiH3", "h3"),
    ("ruiH4", "h4"),
    ("ruiH5", "h5"),
    ("ruiH6", "h6"),
    ("ruiBlockquote", "blockquote"),
    ("ruiCode", "code"),
];

/// Selector for a theme style name, or `None` when the name is disabled.
pub fn style_selector(name: &str) -> Option<String> {
    if DISABLED_CLASSES.contains(&name) {
        return None;
    }
    let selector = ELEMENT_STYLES
        .iter()
        .find(|(style, _)| *style == name)
        .map(|(_, element)| (*element).to_owned())
        .unwrap_or_else(|| format!(".{name}"));
    Some(selector)
}

/// Writes a complete stylesheet.
///
/// Blocks nest (`@media` around rules); declarations added while a disabled
/// rule is open are dropped.
#[derive(Debug)]
pub struct CssStyleBuilder {
    buffer: String,
    depth: usize,
    /// Depth at which a disabled rule was opened.
    skipping: Option<usize>,
}

impl Default for CssStyleBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CssStyleBuilder {
    pub fn new() -> Self {
        Self {
            buffer: alloc_string_builder(),
            depth: 0,
            skipping: None,
        }
    }

    fn indent(&mut self) {
        for _ in 0..self.depth {
            self.buffer.push_str("  ");
        }
    }

    fn open(&mut self, prelude: &str) {
        self.indent();
        self.buffer.push_str(prelude);
        self.buffer.push_str(" {\n");
        self.depth += 1;
    }

    /// Open a rule for the style `name`.
    pub fn start_style(&mut self, name: &str) {
        if self.skipping.is_some() {
            self.depth += 1;
            return;
        }
        match style_selector(name) {
            Some(selector) => self.open(&selector),
            None => {
                self.skipping = Some(self.depth);
                self.depth += 1;
            }
        }
    }

    /// Open an `@media` block with a prelude such as `@media screen and (…)`.
    pub fn start_media(&mut self, prelude: &str) {
        self.open(prelude);
    }

    /// Open an `@keyframes` block.
    pub fn start_keyframes(&mut self, name: &str) {
        self.open(&format!("@keyframes {name}"));
    }

    /// Open one frame of the current `@keyframes` block.
    pub fn start_frame(&mut self, percent: u32) {
        self.open(&format!("{percent}%"));
    }

    /// Close the innermost open block.
    pub fn end_block(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        if let Some(depth) = self.skipping {
            if depth == self.depth {
                self.skipping = None;
            }
            return;
        }
        self.indent();
        self.buffer.push_str("}\n");
    }

    pub fn finish(self) -> String {
        finish_string_builder(self.buffer)
    }
}

impl CssBuilder for CssStyleBuilder {
    fn add(&mut self, key: &str, value: &str) {
        if self.skipping.is_some() {
            return;
        }
        self.indent();
        let _ = writeln!(self.buffer, "{key}: {value};");
    }
}
