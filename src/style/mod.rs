//! Composite property values.
//!
//! Each composite is itself a [`PropertyContainer`](crate::property::PropertyContainer)
//! with its own schema, and resolves to a plain record (`Bounds`, `BoxRadius`,
//! `ViewBorders`, ...) once every `@name` reference has been looked up.

pub mod animation;
pub mod background;
pub mod border;
pub mod bounds;
pub mod clip;
pub mod filter;
pub mod line;
pub mod radius;
pub mod shadow;

pub use animation::{AnimatedProperty, Animation};
pub use background::{BackgroundElement, BackgroundKind, GradientPoint};
pub use border::{BorderProperty, ViewBorder, ViewBorders};
pub use bounds::{Bounds, BoundsProperty};
pub use clip::{ClipShape, ShapeKind};
pub use filter::FilterProperty;
pub use line::{ColumnSeparatorProperty, OutlineProperty};
pub use radius::{BoxRadius, RadiusProperty};
pub use shadow::{shadows_css, ShadowProperty, ViewShadow};
