//! The built-in theme every session falls back to.

use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::error;

use super::Theme;

/// Text of the built-in theme.
pub const DEFAULT_THEME_TEXT: &str = r#"
theme {
    name = Default,
    colors = _ {
        ruiBackgroundColor = #FFFFFFFF,
        ruiTextColor = #FF000000,
        ruiDisabledTextColor = #FF808080,
        ruiHighlightColor = #FF1A74E8,
        ruiHighlightTextColor = #FFFFFFFF,
        ruiButtonColor = #FFE0E0E0,
        ruiButtonTextColor = #FF000000,
        ruiButtonDisabledColor = #FFE0E0E0,
        ruiSelectedColor = #FFE2E2E2,
        ruiSelectedTextColor = #FF000000,
        ruiPopupBackgroundColor = #FFFFFFFF,
        ruiPopupShadowColor = #80000000,
        ruiTooltipBackground = #FFFFFFFF,
        ruiTooltipTextColor = #FF000000,
        ruiTooltipShadowColor = #FF808080,
    },
    colors:dark = _ {
        ruiBackgroundColor = #FF080808,
        ruiTextColor = #FFF0F0F0,
        ruiDisabledTextColor = #FF808080,
        ruiHighlightColor = #FF1A74E8,
        ruiHighlightTextColor = #FFFFFFFF,
        ruiButtonColor = #FF404040,
        ruiButtonTextColor = #FFF0F0F0,
        ruiButtonDisabledColor = #FF404040,
        ruiSelectedColor = #FF404040,
        ruiSelectedTextColor = #FFF0F0F0,
        ruiPopupBackgroundColor = #FF202020,
        ruiPopupShadowColor = #80FFFFFF,
        ruiTooltipBackground = #FF303030,
        ruiTooltipTextColor = #FFF0F0F0,
        ruiTooltipShadowColor = #FF808080,
    },
    constants = _ {
        ruiFontName = "Arial, Helvetica, sans-serif",
        ruiTextSize = 1em,
        ruiButtonHorizontalPadding = 16px,
        ruiButtonVerticalPadding = 8px,
        ruiButtonMargin = 4px,
        ruiButtonRadius = 4px,
        ruiCheckboxGap = 4px,
        ruiListItemHorizontalPadding = 4px,
        ruiListItemVerticalPadding = 4px,
        ruiPopupRadius = 4px,
    },
    constants:touch = _ {
        ruiButtonHorizontalPadding = 20px,
        ruiButtonVerticalPadding = 16px,
        ruiListItemHorizontalPadding = 16px,
        ruiListItemVerticalPadding = 12px,
    },
    styles = [
        ruiApp {
            font-name = "@ruiFontName",
            text-size = "@ruiTextSize",
            text-color = "@ruiTextColor",
            background-color = "@ruiBackgroundColor",
        },
        ruiView {
        },
        ruiButton {
            padding = "@ruiButtonVerticalPadding, @ruiButtonHorizontalPadding, @ruiButtonVerticalPadding, @ruiButtonHorizontalPadding",
            margin = "@ruiButtonMargin",
            radius = "@ruiButtonRadius",
            background-color = "@ruiButtonColor",
            text-color = "@ruiButtonTextColor",
            shadow = "_{ spread-radius = 1px, blur = 2px, color = @ruiPopupShadowColor }",
            cursor = pointer,
        },
        ruiDisabledButton {
            padding = "@ruiButtonVerticalPadding, @ruiButtonHorizontalPadding, @ruiButtonVerticalPadding, @ruiButtonHorizontalPadding",
            margin = "@ruiButtonMargin",
            radius = "@ruiButtonRadius",
            background-color = "@ruiButtonDisabledColor",
            text-color = "@ruiDisabledTextColor",
        },
        ruiTextView {
        },
        ruiCheckbox {
            cursor = pointer,
        },
        ruiListLayout {
        },
        ruiGridLayout {
        },
        ruiColumnLayout {
        },
        ruiStackLayout {
        },
        ruiListView {
        },
        ruiListItem {
            padding = "@ruiListItemVerticalPadding, @ruiListItemHorizontalPadding, @ruiListItemVerticalPadding, @ruiListItemHorizontalPadding",
        },
        ruiListItemSelected {
            padding = "@ruiListItemVerticalPadding, @ruiListItemHorizontalPadding, @ruiListItemVerticalPadding, @ruiListItemHorizontalPadding",
            background-color = "@ruiSelectedColor",
            text-color = "@ruiSelectedTextColor",
        },
        ruiDropDownList {
            radius = "@ruiButtonRadius",
            cursor = pointer,
        },
        ruiPopup {
            radius = "@ruiPopupRadius",
            background-color = "@ruiPopupBackgroundColor",
            shadow = "_{ spread-radius = 4px, blur = 16px, color = @ruiPopupShadowColor }",
        },
        ruiTooltip {
            radius = 4px,
            padding = 4px,
            background-color = "@ruiTooltipBackground",
            text-color = "@ruiTooltipTextColor",
            shadow = "_{ blur = 6px, color = @ruiTooltipShadowColor }",
        },
    ],
    styles:portrait:width600 = [
        ruiButton {
            padding = "@ruiButtonVerticalPadding",
        },
    ],
}
"#;

static DEFAULT_THEME: Lazy<Arc<Theme>> = Lazy::new(|| {
    Arc::new(Theme::parse(DEFAULT_THEME_TEXT).unwrap_or_else(|err| {
        error::report(err);
        Theme::new("Default")
    }))
});

/// The built-in theme.
pub fn default_theme() -> Arc<Theme> {
    Arc::clone(&DEFAULT_THEME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::{Constants, ThemeContext};
    use crate::units::Color;

    #[test]
    fn parses_and_is_complete() {
        let theme = Theme::parse(DEFAULT_THEME_TEXT).unwrap();
        assert_eq!(theme.name(), "Default");
        for tag in ["ruiApp", "ruiView", "ruiButton", "ruiListLayout", "ruiListView", "ruiPopup"] {
            assert!(theme.style(tag).is_some(), "{tag}");
        }
        assert_eq!(theme.media_styles().len(), 1);
    }

    #[test]
    fn dark_and_touch_variants() {
        let mut context = ThemeContext::new(default_theme());
        assert_eq!(context.color("ruiTextColor"), Some(Color::BLACK));
        context.dark = true;
        assert_eq!(context.color("ruiTextColor"), Some(Color(0xfff0f0f0)));
        context.touch_screen = true;
        assert_eq!(context.constant("ruiButtonVerticalPadding").as_deref(), Some("16px"));
    }
}
