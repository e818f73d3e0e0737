//! Themes: named constants, light/dark colors, images and style rules with
//! media-scoped overrides, plus the `@name` resolver every style goes through.

pub mod constants;
pub mod context;
pub mod default;
pub mod media;
#[allow(clippy::module_inception)]
pub mod theme;

pub use constants::Constants;
pub use context::ThemeContext;
pub use default::{default_theme, DEFAULT_THEME_TEXT};
pub use media::{MediaCondition, MediaStyle, Orientation};
pub use theme::Theme;
