//! What the browser reports about itself when a session starts.

use crate::data::DataObject;

/// Text direction reported by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextDirection {
    #[default]
    SystemDefault,
    LeftToRight,
    RightToLeft,
}

impl TextDirection {
    fn parse(text: &str) -> Self {
        match text.trim().to_ascii_lowercase().as_str() {
            "ltr" | "left-to-right" => TextDirection::LeftToRight,
            "rtl" | "right-to-left" => TextDirection::RightToLeft,
            _ => TextDirection::SystemDefault,
        }
    }
}

/// Screen and environment of one client.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientInfo {
    /// Root view size in CSS pixels, used for media-rule resolution.
    pub width: u32,
    pub height: u32,
    pub pixel_ratio: f64,
    pub dark: bool,
    pub touch: bool,
    pub language: String,
    pub text_direction: TextDirection,
    pub user_agent: String,
}

impl Default for ClientInfo {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            pixel_ratio: 1.0,
            dark: false,
            touch: false,
            language: String::new(),
            text_direction: TextDirection::SystemDefault,
            user_agent: String::new(),
        }
    }
}

fn dimension(object: &DataObject, key: &str) -> Option<u32> {
    object
        .property_float(key)
        .filter(|value| value.is_finite() && *value >= 0.0)
        .map(|value| value.round() as u32)
}

impl ClientInfo {
    /// Read a `startSession`/`reconnect` message; missing keys keep defaults.
    pub fn from_object(object: &DataObject) -> Self {
        let mut info = Self::default();
        info.update_size(object);
        if let Some(ratio) = object.property_float("pixelRatio").filter(|r| *r > 0.0) {
            info.pixel_ratio = ratio;
        }
        info.dark = object.property_bool("dark").unwrap_or(false);
        info.touch = object.property_bool("touch").unwrap_or(false);
        if let Some(language) = object.property_value("language") {
            info.language = language.to_owned();
        }
        if let Some(direction) = object.property_value("direction") {
            info.text_direction = TextDirection::parse(direction);
        }
        if let Some(agent) = object.property_value("userAgent") {
            info.user_agent = agent.to_owned();
        }
        info
    }

    /// Apply the `width`/`height` of a `root-size` event. Returns whether it changed.
    pub fn update_size(&mut self, object: &DataObject) -> bool {
        let width = dimension(object, "width").unwrap_or(self.width);
        let height = dimension(object, "height").unwrap_or(self.height);
        let changed = (width, height) != (self.width, self.height);
        self.width = width;
        self.height = height;
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::parse_data_text;

    #[test]
    fn start_session_fields() {
        let object = parse_data_text(
            r#"startSession { width = 1280, height = 720.4, pixelRatio = 2, dark = 1, touch = false, language = en-US, direction = rtl, userAgent = "Mozilla/5.0 (X11)" }"#,
        )
        .unwrap();
        let info = ClientInfo::from_object(&object);
        assert_eq!((info.width, info.height), (1280, 720));
        assert_eq!(info.pixel_ratio, 2.0);
        assert!(info.dark);
        assert!(!info.touch);
        assert_eq!(info.language, "en-US");
        assert_eq!(info.text_direction, TextDirection::RightToLeft);
        assert_eq!(info.user_agent, "Mozilla/5.0 (X11)");
    }

    #[test]
    fn root_size_updates() {
        let mut info = ClientInfo::default();
        let size = parse_data_text("root-size { width = 500 }").unwrap();
        assert!(info.update_size(&size));
        assert!(!info.update_size(&size));
        assert_eq!((info.width, info.height), (500, 0));
    }
}
