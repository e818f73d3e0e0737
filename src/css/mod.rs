//! CSS emission: property containers to inline styles, theme stylesheets and
//! keyframes.

pub mod builder;
pub mod stylesheet;
pub mod transform;
pub mod view_style;

pub use builder::{CssBuilder, CssStyleBuilder, CssValueBuilder, ViewCssBuilder};
pub use stylesheet::{animations_stylesheet, theme_animations, theme_stylesheet};
pub use transform::transform_css;
pub use view_style::{css_property_name, css_view_style, view_css};
