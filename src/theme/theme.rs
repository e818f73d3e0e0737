//! [`Theme`]: constants, colors, images and style rules, with text I/O.

use std::collections::BTreeMap;
use std::fmt;

use crate::data::{parse_data_text, DataObject, DataValue};
use crate::error::{Error, Result};
use crate::property::{PropertyContainer, PropertyObject};
use crate::view::VIEW_SCHEMA;

use super::media::{MediaCondition, MediaStyle};

/// A named bundle of constants, colors, images and style rules.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Theme {
    name: String,
    constants: BTreeMap<String, String>,
    touch_constants: BTreeMap<String, String>,
    colors: BTreeMap<String, String>,
    dark_colors: BTreeMap<String, String>,
    images: BTreeMap<String, String>,
    styles: Vec<(String, PropertyObject)>,
    /// Kept sorted by [`MediaCondition::sort_key`].
    media_styles: Vec<MediaStyle>,
}

impl Theme {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    // ── Constants, colors, images ────────────────────────────────────

    pub fn constant(&self, name: &str, touch: bool) -> Option<&str> {
        let table = if touch { &self.touch_constants } else { &self.constants };
        table.get(name).map(String::as_str)
    }

    /// Set (or with `None`, remove) a constant.
    pub fn set_constant(&mut self, name: &str, value: Option<&str>, touch: bool) {
        let table = if touch {
            &mut self.touch_constants
        } else {
            &mut self.constants
        };
        match value {
            Some(value) => table.insert(name.to_owned(), value.to_owned()),
            None => table.remove(name),
        };
    }

    pub fn constant_names(&self) -> impl Iterator<Item = &str> {
        self.constants
            .keys()
            .chain(self.touch_constants.keys().filter(|k| !self.constants.contains_key(*k)))
            .map(String::as_str)
    }

    pub fn color(&self, name: &str, dark: bool) -> Option<&str> {
        let table = if dark { &self.dark_colors } else { &self.colors };
        table.get(name).map(String::as_str)
    }

    pub fn set_color(&mut self, name: &str, value: Option<&str>, dark: bool) {
        let table = if dark {
            &mut self.dark_colors
        } else {
            &mut self.colors
        };
        match value {
            Some(value) => table.insert(name.to_owned(), value.to_owned()),
            None => table.remove(name),
        };
    }

    pub fn color_names(&self) -> impl Iterator<Item = &str> {
        self.colors
            .keys()
            .chain(self.dark_colors.keys().filter(|k| !self.colors.contains_key(*k)))
            .map(String::as_str)
    }

    pub fn image(&self, name: &str) -> Option<&str> {
        self.images.get(name).map(String::as_str)
    }

    pub fn set_image(&mut self, name: &str, value: Option<&str>) {
        match value {
            Some(value) => self.images.insert(name.to_owned(), value.to_owned()),
            None => self.images.remove(name),
        };
    }

    // ── Style rules ──────────────────────────────────────────────────

    pub fn style(&self, tag: &str) -> Option<&PropertyObject> {
        self.styles.iter().find(|(t, _)| t == tag).map(|(_, style)| style)
    }

    pub fn styles(&self) -> &[(String, PropertyObject)] {
        &self.styles
    }

    /// Insert or replace the rule for `tag`.
    pub fn set_style(&mut self, tag: &str, style: PropertyObject) {
        match self.styles.iter_mut().find(|(t, _)| t == tag) {
            Some((_, slot)) => *slot = style,
            None => self.styles.push((tag.to_owned(), style)),
        }
    }

    pub fn remove_style(&mut self, tag: &str) {
        self.styles.retain(|(t, _)| t != tag);
    }

    pub fn media_styles(&self) -> &[MediaStyle] {
        &self.media_styles
    }

    pub fn media_style(&self, condition: MediaCondition, tag: &str) -> Option<&PropertyObject> {
        self.media_styles
            .iter()
            .find(|media| media.condition == condition)
            .and_then(|media| media.style(tag))
    }

    pub fn set_media_style(&mut self, condition: MediaCondition, tag: &str, style: PropertyObject) {
        match self.media_styles.iter_mut().find(|m| m.condition == condition) {
            Some(media) => media.set_style(tag, style),
            None => {
                let mut media = MediaStyle::new(condition);
                media.set_style(tag, style);
                self.media_styles.push(media);
                self.sort_media_styles();
            }
        }
    }

    fn sort_media_styles(&mut self) {
        self.media_styles.sort_by_key(|media| media.condition.sort_key());
    }

    /// The effective rule for `tag` on a `width`×`height` screen: the base
    /// rule overlaid with every matching media rule, widest first so that
    /// narrower rules win.
    pub fn effective_style(&self, tag: &str, width: u32, height: u32) -> Option<PropertyObject> {
        let mut result: Option<PropertyObject> = self.style(tag).cloned();
        for media in self.media_styles.iter().rev() {
            if !media.condition.matches(width, height) {
                continue;
            }
            if let Some(style) = media.style(tag) {
                match &mut result {
                    Some(merged) => merged.merge(style),
                    None => result = Some(style.clone()),
                }
            }
        }
        result
    }

    // ── Composition ──────────────────────────────────────────────────

    /// Overlay `other` on this theme: its entries override ours, media rule
    /// sets with the same condition are merged, the rest are appended.
    pub fn concat(&mut self, other: &Theme) {
        if self.name.is_empty() {
            self.name = other.name.clone();
        }
        let overlay = |into: &mut BTreeMap<String, String>, from: &BTreeMap<String, String>| {
            into.extend(from.iter().map(|(k, v)| (k.clone(), v.clone())));
        };
        overlay(&mut self.constants, &other.constants);
        overlay(&mut self.touch_constants, &other.touch_constants);
        overlay(&mut self.colors, &other.colors);
        overlay(&mut self.dark_colors, &other.dark_colors);
        overlay(&mut self.images, &other.images);

        for (tag, style) in &other.styles {
            self.set_style(tag, style.clone());
        }
        for media in &other.media_styles {
            match self.media_styles.iter_mut().find(|m| m.condition == media.condition) {
                Some(existing) => {
                    for (tag, style) in &media.styles {
                        existing.set_style(tag, style.clone());
                    }
                }
                None => self.media_styles.push(media.clone()),
            }
        }
        self.sort_media_styles();
    }

    // ── Text form ────────────────────────────────────────────────────

    /// Parse the `theme { … }` text form.
    pub fn parse(text: &str) -> Result<Theme> {
        Theme::from_object(&parse_data_text(text)?)
    }

    pub fn from_object(object: &DataObject) -> Result<Theme> {
        if object.tag() != "theme" {
            return Err(Error::Theme(format!(
                "expected a \"theme\" object, got \"{}\"",
                object.tag()
            )));
        }
        let mut theme = Theme::default();

        for node in object.nodes() {
            let (key, suffix) = match node.tag.split_once(':') {
                Some((key, suffix)) => (key, Some(suffix)),
                None => (node.tag.as_str(), None),
            };
            match (key, suffix) {
                ("name", None) => match &node.value {
                    DataValue::Text(name) => theme.name = name.clone(),
                    _ => return Err(Error::Theme("\"name\" must be text".into())),
                },
                ("constants", None) => read_table(&mut theme.constants, &node.value, &node.tag)?,
                ("constants", Some("touch")) => {
                    read_table(&mut theme.touch_constants, &node.value, &node.tag)?
                }
                ("colors", None) => read_table(&mut theme.colors, &node.value, &node.tag)?,
                ("colors", Some("dark")) => read_table(&mut theme.dark_colors, &node.value, &node.tag)?,
                ("images", None) => read_table(&mut theme.images, &node.value, &node.tag)?,
                ("styles", None) => {
                    for (tag, style) in read_styles(&node.value, &node.tag)? {
                        theme.set_style(&tag, style);
                    }
                }
                ("styles", Some(suffix)) => {
                    let condition = MediaCondition::parse(suffix)?;
                    for (tag, style) in read_styles(&node.value, &node.tag)? {
                        theme.set_media_style(condition, &tag, style);
                    }
                }
                _ => {
                    return Err(Error::Theme(format!("unknown theme key \"{}\"", node.tag)));
                }
            }
        }
        Ok(theme)
    }

    pub fn to_data_object(&self) -> DataObject {
        let mut object = DataObject::new("theme");
        if !self.name.is_empty() {
            object.set("name", self.name.as_str());
        }
        let mut table = |key: &str, map: &BTreeMap<String, String>| {
            if !map.is_empty() {
                let mut inner = DataObject::new("_");
                for (name, value) in map {
                    inner.set(name.clone(), value.as_str());
                }
                object.set(key, inner);
            }
        };
        table("constants", &self.constants);
        table("constants:touch", &self.touch_constants);
        table("colors", &self.colors);
        table("colors:dark", &self.dark_colors);
        table("images", &self.images);

        if !self.styles.is_empty() {
            object.set("styles", write_styles(&self.styles));
        }
        for media in &self.media_styles {
            if !media.styles.is_empty() {
                object.set(format!("styles{}", media.condition), write_styles(&media.styles));
            }
        }
        object
    }
}

fn read_table(table: &mut BTreeMap<String, String>, value: &DataValue, key: &str) -> Result<()> {
    let DataValue::Object(object) = value else {
        return Err(Error::Theme(format!("\"{key}\" must be an object")));
    };
    for node in object.nodes() {
        match &node.value {
            DataValue::Text(text) => {
                table.insert(node.tag.clone(), text.clone());
            }
            _ => {
                return Err(Error::Theme(format!(
                    "\"{key}.{}\" must be text",
                    node.tag
                )))
            }
        }
    }
    Ok(())
}

fn read_styles(value: &DataValue, key: &str) -> Result<Vec<(String, PropertyObject)>> {
    let objects: Vec<&DataObject> = match value {
        DataValue::Array(items) => items
            .iter()
            .map(|item| {
                item.as_object()
                    .ok_or_else(|| Error::Theme(format!("\"{key}\" items must be objects")))
            })
            .collect::<Result<_>>()?,
        DataValue::Object(object) => vec![object],
        DataValue::Text(_) => return Err(Error::Theme(format!("\"{key}\" must be a list"))),
    };
    objects
        .into_iter()
        .map(|object| {
            let style = PropertyObject::from_object(&VIEW_SCHEMA, object)?;
            Ok((object.tag().to_owned(), style))
        })
        .collect()
}

fn write_styles(styles: &[(String, PropertyObject)]) -> DataValue {
    DataValue::Array(
        styles
            .iter()
            .map(|(tag, style)| {
                let mut object = style.to_data_object();
                object.set_tag(tag.as_str());
                DataValue::Object(object)
            })
            .collect(),
    )
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.to_data_object().fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::property::Value;
    use crate::theme::media::Orientation;
    use crate::units::SizeUnit;

    const TEXT: &str = r#"
        theme {
            name = Demo,
            constants = _ { gap = 8px, accent-size = "@gap" },
            constants:touch = _ { gap = 12px },
            colors = _ { accent = #FF2196F3 },
            colors:dark = _ { accent = #FF90CAF9 },
            styles = [
                ruiButton { padding = "@gap", text-color = "@accent" },
            ],
            styles:portrait:width800 = [
                ruiButton { padding = 2px },
            ],
        }
    "#;

    #[test]
    fn parse_theme_text() {
        let theme = Theme::parse(TEXT).unwrap();
        assert_eq!(theme.name(), "Demo");
        assert_eq!(theme.constant("gap", false), Some("8px"));
        assert_eq!(theme.constant("gap", true), Some("12px"));
        assert_eq!(theme.color("accent", true), Some("#FF90CAF9"));
        assert!(theme.style("ruiButton").is_some());
        assert_eq!(theme.media_styles().len(), 1);
        assert_eq!(
            theme.media_styles()[0].condition,
            MediaCondition::new(Orientation::Portrait, 800, 0)
        );
    }

    #[test]
    fn text_round_trip() {
        let theme = Theme::parse(TEXT).unwrap();
        let again = Theme::parse(&theme.to_string()).unwrap();
        assert_eq!(again, theme);
    }

    #[test]
    fn unknown_key_and_bad_media() {
        assert!(matches!(Theme::parse("theme { fonts = _ {} }"), Err(Error::Theme(_))));
        assert!(Theme::parse("theme { styles:portrait:landscape = [] }").is_err());
        assert!(Theme::parse("style { }").is_err());
    }

    #[test]
    fn effective_style_prefers_narrow_media() {
        let theme = Theme::parse(TEXT).unwrap();
        let wide = theme.effective_style("ruiButton", 1024, 768).unwrap();
        assert_eq!(wide.get("padding-top"), Some(Value::Ref("gap".into())));
        let narrow = theme.effective_style("ruiButton", 400, 900).unwrap();
        assert_eq!(narrow.get("padding-top"), Some(Value::Size(SizeUnit::px(2.0))));
        assert!(theme.effective_style("ruiMissing", 400, 900).is_none());
    }

    #[test]
    fn oriented_media_beats_unoriented_at_equal_width() {
        let theme = Theme::parse(
            r#"theme {
                styles:portrait:width800 = [ ruiCard { width = 2px } ],
                styles:width800 = [ ruiCard { width = 1px } ],
            }"#,
        )
        .unwrap();
        let portrait = theme.effective_style("ruiCard", 400, 900).unwrap();
        assert_eq!(portrait.get("width"), Some(Value::Size(SizeUnit::px(2.0))));
        let landscape = theme.effective_style("ruiCard", 700, 500).unwrap();
        assert_eq!(landscape.get("width"), Some(Value::Size(SizeUnit::px(1.0))));
    }

    #[test]
    fn concat_overlays_and_merges_media() {
        let mut base = Theme::parse(TEXT).unwrap();
        let overlay = Theme::parse(
            r#"theme {
                constants = _ { gap = 4px },
                styles:portrait:width800 = [ ruiLabel { italic = true } ],
                styles:width400 = [ ruiLabel { italic = false } ],
            }"#,
        )
        .unwrap();
        base.concat(&overlay);
        assert_eq!(base.constant("gap", false), Some("4px"));
        assert_eq!(base.media_styles().len(), 2);
        assert_eq!(base.media_styles()[0].condition.max_width, 400);
        let portrait = MediaCondition::new(Orientation::Portrait, 800, 0);
        assert!(base.media_style(portrait, "ruiButton").is_some());
        assert!(base.media_style(portrait, "ruiLabel").is_some());
    }
}
