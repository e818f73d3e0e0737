//! # rui
//!
//! A server-driven web UI toolkit. The view tree lives on the server; the
//! browser only runs the scripts a session sends it.
//!
//! Views carry typed properties (sizes, colours, composite borders, shadows,
//! transforms...) that are resolved against a theme and emitted as CSS. A
//! session batches every change made while handling one client event into a
//! single script for its bridge.
//!
//! ## Core Systems
//!
//! - **[`units`]**: lengths, angles, colours, ranges and size expressions
//! - **[`data`]**: the `tag { key = value }` text format of messages and themes
//! - **[`property`]**: typed property containers, schemas and aliases
//! - **[`style`]**: composite properties (bounds, radius, border, shadow, clip, filter, background, animation)
//! - **[`theme`]**: constants, light/dark colours, style rules and media rules
//! - **[`css`]**: property-to-CSS mapping, stylesheets and keyframes
//! - **[`view`]**: views, the per-session view tree and HTML rendering
//! - **[`session`]**: update batching, the bridge and getter answers
//! - **[`app`]**: the application host, start page, downloads
//!
//! ```
//! use rui::units::SizeUnit;
//! use rui::view::{View, Widget};
//!
//! let view = View::new(Widget::TextView)
//!     .with("width", SizeUnit::px(120.0))
//!     .with("text", "Hello");
//! let css = rui::css::view_css(&view, &()).finish();
//! assert_eq!(css, "width: 120px;");
//! ```

// Foundation
pub mod error;
pub mod pool;
pub mod units;

// Properties and styling
pub mod data;
pub mod property;
pub mod style;
pub mod theme;
pub mod css;

// Views and sessions
pub mod view;
pub mod session;

// Application
pub mod app;

pub use error::{Error, Result};

// Proc macros (feature-gated)
#[cfg(feature = "macros")]
pub use rui_macros::props;
