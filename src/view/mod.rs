//! Views: the typed property bag of every UI node, the slotmap arena that
//! holds a session's tree, the widget catalogue and the HTML renderer.

pub mod html;
pub mod schema;
pub mod tree;
#[allow(clippy::module_inception)]
pub mod view;
pub mod widget;

pub use html::{escape_html, js_string, view_html, CheckboxImages, HtmlContext};
pub use schema::VIEW_SCHEMA;
pub use tree::{ViewId, ViewTree};
pub use view::{ChangeListener, EventListener, View};
pub use widget::Widget;
