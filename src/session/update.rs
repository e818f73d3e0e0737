//! Per-view update batches and the script statements they turn into.

use std::collections::HashMap;
use std::fmt::Write as _;

use crate::view::html::Rendered;
use crate::view::{js_string, Widget};

/// Id of the page element the root view is rendered into.
pub const ROOT_ELEMENT_ID: &str = "ruiRootView";

/// Closes every update frame.
pub const UPDATE_SCRIPT_FOOTER: &str = "scanElementsSize();}\n";

/// Opens the update frame of one element.
pub fn update_script_header(html_id: &str) -> String {
    format!("var element = document.getElementById('{html_id}'); if (element) {{\n")
}

/// Pending work for one view inside the current batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpdateState {
    #[default]
    Clean,
    /// Only inline CSS or attributes changed: patch them.
    DirtyCss,
    /// The inner HTML is stale: rebuild it (pending CSS patches are merged in).
    DirtyStructure,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct ViewUpdate {
    pub state: UpdateState,
    /// Raw statements added with `add_to_update_script`.
    pub statements: String,
}

/// Update frames keyed by HTML id, in first-touch order.
#[derive(Debug, Default)]
pub struct UpdateScripts {
    order: Vec<String>,
    pending: HashMap<String, ViewUpdate>,
}

impl UpdateScripts {
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(&mut self, html_id: &str) -> &mut ViewUpdate {
        if !self.pending.contains_key(html_id) {
            self.order.push(html_id.to_owned());
        }
        self.pending.entry(html_id.to_owned()).or_default()
    }

    /// Open a frame for `html_id` without changing its state.
    pub fn touch(&mut self, html_id: &str) {
        self.entry(html_id);
    }

    pub fn mark_css(&mut self, html_id: &str) {
        let update = self.entry(html_id);
        if update.state == UpdateState::Clean {
            update.state = UpdateState::DirtyCss;
        }
    }

    pub fn mark_structure(&mut self, html_id: &str) {
        self.entry(html_id).state = UpdateState::DirtyStructure;
    }

    pub fn add_statement(&mut self, html_id: &str, statement: &str) {
        let update = self.entry(html_id);
        update.statements.push_str(statement);
        if !statement.ends_with('\n') {
            update.statements.push('\n');
        }
    }

    pub fn state(&self, html_id: &str) -> UpdateState {
        self.pending
            .get(html_id)
            .map(|update| update.state)
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Take every frame, leaving the batch empty.
    pub(crate) fn take(&mut self) -> Vec<(String, ViewUpdate)> {
        let mut pending = std::mem::take(&mut self.pending);
        std::mem::take(&mut self.order)
            .into_iter()
            .filter_map(|html_id| {
                let update = pending.remove(&html_id)?;
                Some((html_id, update))
            })
            .collect()
    }
}

/// Statements that bring the element from `old` to `new`.
///
/// Changed declarations come in the order `new.css` was emitted, then the
/// removed ones.
pub(crate) fn write_patch(old: &Rendered, new: &Rendered, widget: Widget, out: &mut String) {
    for (key, value) in &new.css {
        let previous = old.css.iter().find(|(k, _)| k == key).map(|(_, v)| v);
        if previous != Some(value) {
            let _ = writeln!(out, "element.style['{key}'] = '{}';", js_string(value));
        }
    }
    for (key, _) in &old.css {
        if !new.css.iter().any(|(k, _)| k == key) {
            let _ = writeln!(out, "element.style['{key}'] = '';");
        }
    }

    if old.class != new.class {
        let _ = writeln!(out, "element.className = '{}';", js_string(&new.class));
    }

    if old.tooltip != new.tooltip {
        match &new.tooltip {
            Some(tooltip) => {
                let _ = writeln!(
                    out,
                    "element.setAttribute('data-tooltip', '{}');",
                    js_string(tooltip)
                );
            }
            None => out.push_str("element.removeAttribute('data-tooltip');\n"),
        }
    }

    if old.disabled != new.disabled {
        if new.disabled {
            out.push_str("element.setAttribute('data-disabled', '1');\n");
        } else {
            out.push_str("element.removeAttribute('data-disabled');\n");
        }
        if matches!(widget, Widget::Button | Widget::DropDownList) {
            let _ = writeln!(out, "element.disabled = {};", new.disabled);
        }
    }
}
