//! [`View`]: one node of the UI tree.

use std::fmt;
use std::sync::Arc;

use crate::data::DataObject;
use crate::error::Result;
use crate::property::{set_in, Properties, PropertyContainer, Schema, Value};
use crate::session::Session;
use crate::theme::Constants;
use crate::view::html::Rendered;
use crate::view::schema::{DISABLED, ID, STYLE, STYLE_DISABLED, VIEW_SCHEMA};
use crate::view::tree::ViewId;
use crate::view::widget::Widget;

/// Called after a property of the view changed, with the canonical tag.
pub type ChangeListener = Arc<dyn Fn(&View, &str) + Send + Sync>;

/// Called for a client event on the view, with the event's data object.
pub type EventListener = Arc<dyn Fn(&mut Session, ViewId, &DataObject) + Send + Sync>;

/// A view: a widget kind, a stable HTML id and a typed property bag.
///
/// Mutations go through [`PropertyContainer`]; every accepted one is recorded
/// so the owning session can notify listeners and patch the page.
pub struct View {
    html_id: String,
    widget: Widget,
    properties: Properties,
    change_listeners: Vec<(String, ChangeListener)>,
    event_listeners: Vec<(String, EventListener)>,
    changes: Vec<&'static str>,
    pub(crate) rendered: Option<Rendered>,
}

impl fmt::Debug for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("View")
            .field("html_id", &self.html_id)
            .field("widget", &self.widget)
            .field("properties", &self.properties)
            .field("change_listeners", &self.change_listeners.len())
            .field("event_listeners", &self.event_listeners.len())
            .finish()
    }
}

impl View {
    pub fn new(widget: Widget) -> Self {
        Self {
            html_id: String::new(),
            widget,
            properties: Properties::new(),
            change_listeners: Vec::new(),
            event_listeners: Vec::new(),
            changes: Vec::new(),
            rendered: None,
        }
    }

    /// Set a property (builder). A rejected value is reported and skipped.
    pub fn with(mut self, tag: &str, value: impl Into<Value>) -> Self {
        self.set(tag, value);
        self
    }

    /// Set every node of `object` as a property (builder).
    pub fn with_object(mut self, object: &DataObject) -> Self {
        for node in object.nodes() {
            self.set_value(&node.tag, Some(Value::from(node.value.clone())));
        }
        self
    }

    pub fn widget(&self) -> Widget {
        self.widget
    }

    /// Id of the view's element; empty until the view joins a tree.
    pub fn html_id(&self) -> &str {
        &self.html_id
    }

    pub(crate) fn set_html_id(&mut self, html_id: String) {
        self.html_id = html_id;
    }

    /// The application-level `id` property.
    pub fn id(&self) -> Option<&str> {
        match self.properties.get(ID) {
            Some(Value::Text(id)) => Some(id),
            _ => None,
        }
    }

    pub fn is_disabled(&self, constants: &dyn Constants) -> bool {
        self.bool_value(DISABLED, constants).unwrap_or(false)
    }

    /// Value of the `class` attribute: the system class plus the style in effect.
    pub fn class_name(&self, constants: &dyn Constants) -> String {
        let style = if self.is_disabled(constants) {
            self.text(STYLE_DISABLED, constants)
                .or_else(|| self.widget.disabled_class().map(str::to_owned))
                .or_else(|| self.text(STYLE, constants))
        } else {
            self.text(STYLE, constants)
        };
        match style {
            Some(style) if !style.is_empty() => format!("{} {style}", self.widget.system_class()),
            _ => self.widget.system_class().to_owned(),
        }
    }

    /// Call `listener` after every accepted change of `tag`.
    pub fn on_change(&mut self, tag: &str, listener: impl Fn(&View, &str) + Send + Sync + 'static) {
        let tag = self.schema().canonical(tag).unwrap_or(tag).to_owned();
        self.change_listeners.push((tag, Arc::new(listener)));
    }

    /// Call `listener` for the client event `tag` (`click`, `focus`, ...).
    pub fn on_event(
        &mut self,
        tag: &str,
        listener: impl Fn(&mut Session, ViewId, &DataObject) + Send + Sync + 'static,
    ) {
        self.event_listeners.push((tag.to_owned(), Arc::new(listener)));
    }

    pub fn has_event_listener(&self, tag: &str) -> bool {
        self.event_listeners.iter().any(|(t, _)| t == tag)
    }

    pub(crate) fn change_listeners_for(&self, tag: &str) -> Vec<ChangeListener> {
        self.change_listeners
            .iter()
            .filter(|(t, _)| t == tag)
            .map(|(_, listener)| listener.clone())
            .collect()
    }

    pub(crate) fn event_listeners_for(&self, tag: &str) -> Vec<EventListener> {
        self.event_listeners
            .iter()
            .filter(|(t, _)| t == tag)
            .map(|(_, listener)| listener.clone())
            .collect()
    }

    /// Canonical tags changed since the last call, in change order.
    pub(crate) fn take_changes(&mut self) -> Vec<&'static str> {
        std::mem::take(&mut self.changes)
    }

    /// Record what the page now shows. Changes made before this point are
    /// part of the markup and are dropped.
    pub(crate) fn mark_rendered(&mut self, state: Rendered) {
        self.rendered = Some(state);
        self.changes.clear();
    }
}

impl PropertyContainer for View {
    fn schema(&self) -> &'static Schema {
        &VIEW_SCHEMA
    }

    fn properties(&self) -> &Properties {
        &self.properties
    }

    fn properties_mut(&mut self) -> &mut Properties {
        &mut self.properties
    }

    fn object_tag(&self) -> &str {
        self.widget.name()
    }

    fn try_set(&mut self, tag: &str, value: Option<Value>) -> Result<()> {
        set_in(self, tag, value)?;
        let schema = self.schema();
        let changed = schema
            .canonical(tag)
            .or_else(|| schema.route(tag).map(|(parent, _)| parent));
        if let Some(changed) = changed {
            if !self.changes.contains(&changed) {
                self.changes.push(changed);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::error;
    use crate::units::SizeUnit;
    use crate::view::schema::{MARGIN, TEXT_COLOR, WIDTH};

    #[test]
    fn changes_are_canonical_and_unique() {
        let mut view = View::new(Widget::View);
        view.set("width", SizeUnit::px(10.0));
        view.set("top-margin", SizeUnit::px(4.0));
        view.set("color", "red");
        view.set("width", SizeUnit::px(12.0));
        assert_eq!(view.take_changes(), vec![WIDTH, MARGIN, TEXT_COLOR]);
        assert!(view.take_changes().is_empty());
    }

    #[test]
    fn rejected_value_records_nothing() {
        let mut view = View::new(Widget::View);
        let (accepted, errors) = error::capture(|| view.set("width", true));
        assert!(!accepted);
        assert_eq!(errors.len(), 1);
        assert!(view.take_changes().is_empty());
        assert_eq!(view.get("width"), None);
    }

    #[test]
    fn class_name_follows_disabled_state() {
        let mut view = View::new(Widget::Button).with("style", "primary");
        assert_eq!(view.class_name(&()), "ruiButton primary");
        view.set("disabled", true);
        assert_eq!(view.class_name(&()), "ruiButton ruiDisabledButton");
        view.set("style-disabled", "muted");
        assert_eq!(view.class_name(&()), "ruiButton muted");
    }

    #[test]
    fn listeners_are_keyed_by_canonical_tag() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut view = View::new(Widget::TextView);
        let seen = count.clone();
        view.on_change("color", move |_, tag| {
            assert_eq!(tag, TEXT_COLOR);
            seen.fetch_add(1, Ordering::Relaxed);
        });
        let listeners = view.change_listeners_for(TEXT_COLOR);
        assert_eq!(listeners.len(), 1);
        listeners[0](&view, TEXT_COLOR);
        assert_eq!(count.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn data_object_uses_widget_name() {
        let view = View::new(Widget::TextView).with("text", "hello");
        let object = view.to_data_object();
        assert_eq!(object.tag(), "TextView");
        assert_eq!(object.property_value("text"), Some("hello"));
    }
}
