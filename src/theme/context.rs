//! [`ThemeContext`]: constant lookup against the active theme and client mode.

use std::sync::Arc;

use super::{default_theme, Constants, Theme};

/// The active theme as seen by one session: touch and dark flags select the
/// variant tables, and the built-in theme answers whatever the active one
/// does not define.
#[derive(Debug, Clone)]
pub struct ThemeContext {
    theme: Arc<Theme>,
    base: Arc<Theme>,
    pub touch_screen: bool,
    pub dark: bool,
}

impl Default for ThemeContext {
    fn default() -> Self {
        Self::new(default_theme())
    }
}

impl ThemeContext {
    /// A context over `theme`, falling back to the built-in theme.
    pub fn new(theme: Arc<Theme>) -> Self {
        Self {
            theme,
            base: default_theme(),
            touch_screen: false,
            dark: false,
        }
    }

    /// Replace the fallback theme.
    pub fn with_base(mut self, base: Arc<Theme>) -> Self {
        self.base = base;
        self
    }

    pub fn theme(&self) -> &Arc<Theme> {
        &self.theme
    }

    pub fn set_theme(&mut self, theme: Arc<Theme>) {
        self.theme = theme;
    }

    fn constant_in(&self, theme: &Theme, name: &str) -> Option<String> {
        let touch = self
            .touch_screen
            .then(|| theme.constant(name, true))
            .flatten();
        touch.or_else(|| theme.constant(name, false)).map(str::to_owned)
    }

    fn color_in(&self, theme: &Theme, name: &str) -> Option<String> {
        let dark = self.dark.then(|| theme.color(name, true)).flatten();
        dark.or_else(|| theme.color(name, false)).map(str::to_owned)
    }
}

impl Constants for ThemeContext {
    fn constant(&self, name: &str) -> Option<String> {
        self.constant_in(&self.theme, name)
            .or_else(|| self.constant_in(&self.base, name))
    }

    fn color_text(&self, name: &str) -> Option<String> {
        self.color_in(&self.theme, name)
            .or_else(|| self.color_in(&self.base, name))
    }

    fn image_text(&self, name: &str) -> Option<String> {
        self.theme
            .image(name)
            .or_else(|| self.base.image(name))
            .map(str::to_owned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::Color;

    fn custom() -> Arc<Theme> {
        let mut theme = Theme::new("custom");
        theme.set_constant("gap", Some("8px"), false);
        theme.set_constant("gap", Some("12px"), true);
        theme.set_color("accent", Some("#FF2196F3"), false);
        theme.set_color("accent", Some("#FF90CAF9"), true);
        theme.set_color("link", Some("@accent"), false);
        Arc::new(theme)
    }

    fn base() -> Arc<Theme> {
        let mut theme = Theme::new("base");
        theme.set_constant("gap", Some("1px"), false);
        theme.set_constant("border", Some("2px"), false);
        theme.set_image("logo", Some("logo.png"));
        Arc::new(theme)
    }

    #[test]
    fn touch_then_default_then_base() {
        let mut context = ThemeContext::new(custom()).with_base(base());
        assert_eq!(context.constant("gap").as_deref(), Some("8px"));
        context.touch_screen = true;
        assert_eq!(context.constant("gap").as_deref(), Some("12px"));
        assert_eq!(context.constant("border").as_deref(), Some("2px"));
        assert_eq!(context.constant("missing"), None);
    }

    #[test]
    fn dark_colors_fall_back_to_light() {
        let mut context = ThemeContext::new(custom()).with_base(base());
        assert_eq!(context.color("accent"), Some(Color(0xff2196f3)));
        context.dark = true;
        assert_eq!(context.color("accent"), Some(Color(0xff90caf9)));
        assert_eq!(context.color("link"), Some(Color(0xff90caf9)));
    }

    #[test]
    fn images_and_references() {
        let context = ThemeContext::new(custom()).with_base(base());
        assert_eq!(context.image_constant("logo").as_deref(), Some("logo.png"));
        assert_eq!(context.resolve_constants("@accent").as_deref(), Some("#FF2196F3"));
    }
}
