//! HTML rendering of views and the per-view render state used for patching.

use std::collections::HashMap;
use std::fmt::Write as _;

use crate::css::builder::{CssBuilder, ViewCssBuilder};
use crate::css::view_style::{css_view_style, flex_alignment};
use crate::pool::{alloc_string_builder, finish_string_builder};
use crate::property::{enums, PropertyContainer, Value};
use crate::theme::Constants;
use crate::units::Color;
use crate::view::schema::{
    CHECKBOX_HORIZONTAL_ALIGN, CHECKBOX_VERTICAL_ALIGN, CHECKED, CURRENT, HORIZONTAL_ALIGN, ITEMS,
    SEMANTICS, TEXT, TOOLTIP, VERTICAL_ALIGN,
};
use crate::view::tree::{ViewId, ViewTree};
use crate::view::view::View;
use crate::view::widget::Widget;

/// Element per `semantics` value; empty means the widget's own element.
const SEMANTIC_ELEMENTS: &[&str] = &[
    "", "article", "section", "aside", "header", "main", "footer", "nav", "figure", "figcaption",
    "button", "p", "h1", "h2", "h3", "h4", "h5", "h6", "blockquote", "code",
];

/// Keys a view drops when its alignment positions children instead.
const CONTENT_ALIGNMENT_KEYS: &[&str] = &["justify-content", "align-items", "align-content"];

/// What the page currently shows for a view, as last sent.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Rendered {
    pub css: Vec<(String, String)>,
    pub class: String,
    pub tooltip: Option<String>,
    pub disabled: bool,
}

/// Escape text for element content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#39;"),
            _ => result.push(ch),
        }
    }
    result
}

/// Escape text for a single-quoted JavaScript string literal.
pub fn js_string(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => result.push_str("\\\\"),
            '\'' => result.push_str("\\'"),
            '"' => result.push_str("\\\""),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            '<' if chars.peek() == Some(&'/') => result.push_str("<\\"),
            _ => result.push(ch),
        }
    }
    result
}

/// `key: value;` pairs joined for a `style` attribute.
pub(crate) fn style_text(entries: &[(String, String)]) -> String {
    let mut builder = ViewCssBuilder::new();
    for (key, value) in entries {
        builder.add(key, value);
    }
    builder.finish()
}

fn text_html(text: &str) -> String {
    escape_html(text).replace('\n', "<br>")
}

// ---------------------------------------------------------------------------
// Checkbox images
// ---------------------------------------------------------------------------

/// Inline SVG checkbox images, cached per state and color pair.
#[derive(Debug, Default)]
pub struct CheckboxImages {
    cache: HashMap<(bool, u32, u32), String>,
}

impl CheckboxImages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn image(&mut self, checked: bool, constants: &dyn Constants) -> &str {
        let accent = constants
            .color("ruiHighlightColor")
            .unwrap_or(Color(0xFF1A74E8));
        let frame = constants
            .color("ruiDisabledTextColor")
            .unwrap_or(Color(0xFF808080));
        self.cache
            .entry((checked, accent.0, frame.0))
            .or_insert_with(|| checkbox_svg(checked, accent, frame))
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

fn checkbox_svg(checked: bool, accent: Color, frame: Color) -> String {
    if checked {
        format!(
            "<svg width=\"16\" height=\"16\" viewBox=\"0 0 16 16\"><rect x=\"0.5\" y=\"0.5\" width=\"15\" height=\"15\" rx=\"3\" ry=\"3\" fill=\"{accent}\" stroke=\"{accent}\"/><path d=\"M4 8 L7 11 L12 5\" stroke=\"white\" stroke-width=\"2\" fill=\"none\"/></svg>",
            accent = accent.css_string()
        )
    } else {
        format!(
            "<svg width=\"16\" height=\"16\" viewBox=\"0 0 16 16\"><rect x=\"0.5\" y=\"0.5\" width=\"15\" height=\"15\" rx=\"3\" ry=\"3\" fill=\"none\" stroke=\"{}\"/></svg>",
            frame.css_string()
        )
    }
}

// ---------------------------------------------------------------------------
// Render state
// ---------------------------------------------------------------------------

/// Constants plus the caches a render pass may fill.
pub struct HtmlContext<'a> {
    pub constants: &'a dyn Constants,
    pub images: &'a mut CheckboxImages,
}

/// Inline declarations of a view, including what its widget and its parent add.
pub(crate) fn inline_css(tree: &ViewTree, id: ViewId, constants: &dyn Constants) -> ViewCssBuilder {
    let mut builder = ViewCssBuilder::new();
    let Some(view) = tree.get(id) else {
        return builder;
    };
    for (key, value) in view.widget().base_css() {
        builder.add(key, value);
    }
    css_view_style(view, &mut builder, constants);
    if view.widget().aligns_children() {
        for key in CONTENT_ALIGNMENT_KEYS {
            builder.remove(key);
        }
    }

    let grid = tree
        .parent(id)
        .and_then(|parent| tree.get(parent))
        .filter(|parent| parent.widget() == Widget::GridLayout);
    if let Some(grid) = grid {
        let self_alignment = |align| match align {
            enums::ALIGN_END => "end",
            enums::ALIGN_CENTER => "center",
            enums::ALIGN_STRETCH => "stretch",
            _ => "start",
        };
        if let Some(align) = grid.enum_index(HORIZONTAL_ALIGN, constants) {
            builder.add("justify-self", self_alignment(align));
        }
        if let Some(align) = grid.enum_index(VERTICAL_ALIGN, constants) {
            builder.add("align-self", self_alignment(align));
        }
    }
    builder
}

pub(crate) fn render_state(tree: &ViewTree, id: ViewId, constants: &dyn Constants) -> Option<Rendered> {
    let view = tree.get(id)?;
    Some(Rendered {
        css: inline_css(tree, id, constants).into_entries(),
        class: view.class_name(constants),
        tooltip: view.text(TOOLTIP, constants).filter(|text| !text.is_empty()),
        disabled: view.is_disabled(constants),
    })
}

fn element_name(view: &View, constants: &dyn Constants) -> &'static str {
    view.enum_index(SEMANTICS, constants)
        .and_then(|index| SEMANTIC_ELEMENTS.get(index))
        .copied()
        .filter(|element| !element.is_empty())
        .unwrap_or_else(|| view.widget().element())
}

// ---------------------------------------------------------------------------
// HTML
// ---------------------------------------------------------------------------

/// Write the element of `id` and its subtree, remembering what was sent.
pub fn view_html(tree: &mut ViewTree, id: ViewId, context: &mut HtmlContext<'_>, out: &mut String) {
    let Some(state) = render_state(tree, id, context.constants) else {
        return;
    };
    let Some(view) = tree.get(id) else {
        return;
    };
    let widget = view.widget();
    let element = element_name(view, context.constants);

    let _ = write!(
        out,
        "<{element} id=\"{}\" class=\"{}\"",
        view.html_id(),
        escape_html(&state.class)
    );
    if !state.css.is_empty() {
        let _ = write!(out, " style=\"{}\"", escape_html(&style_text(&state.css)));
    }
    if let Some(tooltip) = &state.tooltip {
        let _ = write!(out, " data-tooltip=\"{}\"", escape_html(tooltip));
    }
    if state.disabled {
        out.push_str(" data-disabled=\"1\"");
        if matches!(widget, Widget::Button | Widget::DropDownList) {
            out.push_str(" disabled");
        }
    }
    if widget.always_clickable() || view.has_event_listener("click") {
        out.push_str(" onclick=\"clickEvent(this, event)\"");
    }
    match widget {
        Widget::DropDownList => out.push_str(" onchange=\"dropDownListEvent(this, event)\""),
        Widget::ListView => out.push_str(" tabindex=\"0\""),
        _ => {}
    }
    out.push('>');

    inner_html(tree, id, context, out);
    let _ = write!(out, "</{element}>");

    if let Some(view) = tree.get_mut(id) {
        view.mark_rendered(state);
    }
}

/// Write the content of `id`: text, items, or the child views.
pub fn inner_html(tree: &mut ViewTree, id: ViewId, context: &mut HtmlContext<'_>, out: &mut String) {
    let Some(view) = tree.get(id) else {
        return;
    };
    let constants = context.constants;
    match view.widget() {
        Widget::TextView | Widget::Button => {
            if let Some(text) = view.text(TEXT, constants) {
                out.push_str(&text_html(&text));
            }
        }
        Widget::Checkbox => checkbox_html(view, context, out),
        Widget::ListView => list_items_html(view, constants, out),
        Widget::DropDownList => options_html(view, constants, out),
        Widget::StackLayout => {
            let children = tree.children(id);
            let current = view
                .int(CURRENT, constants)
                .and_then(|index| usize::try_from(index).ok())
                .filter(|&index| index < children.len())
                .or_else(|| children.len().checked_sub(1));
            let child = current.map(|index| children[index]);
            if let Some(child) = child {
                view_html(tree, child, context, out);
            }
        }
        Widget::View | Widget::ListLayout | Widget::GridLayout | Widget::ColumnLayout => {
            let children = tree.children(id).to_vec();
            for child in children {
                view_html(tree, child, context, out);
            }
        }
    }
}

/// The whole subtree of `id` as a string.
pub(crate) fn subtree_html(tree: &mut ViewTree, id: ViewId, context: &mut HtmlContext<'_>) -> String {
    let mut buffer = alloc_string_builder();
    view_html(tree, id, context, &mut buffer);
    finish_string_builder(buffer)
}

/// The content of `id` as a string.
pub(crate) fn content_html(tree: &mut ViewTree, id: ViewId, context: &mut HtmlContext<'_>) -> String {
    let mut buffer = alloc_string_builder();
    inner_html(tree, id, context, &mut buffer);
    finish_string_builder(buffer)
}

fn checkbox_html(view: &View, context: &mut HtmlContext<'_>, out: &mut String) {
    let constants = context.constants;
    let checked = view.bool_value(CHECKED, constants).unwrap_or(false);
    let horizontal = view
        .enum_index(CHECKBOX_HORIZONTAL_ALIGN, constants)
        .unwrap_or(enums::ALIGN_START);
    let vertical = view
        .enum_index(CHECKBOX_VERTICAL_ALIGN, constants)
        .unwrap_or(enums::ALIGN_START);

    let (columns, image_cell, content_cell) = match horizontal {
        enums::ALIGN_END => ("1fr auto", "grid-column: 2; grid-row: 1;", "grid-column: 1; grid-row: 1;"),
        enums::ALIGN_CENTER => ("auto; justify-items: center", "grid-row: 1;", "grid-row: 2;"),
        _ => ("auto 1fr", "grid-column: 1; grid-row: 1;", "grid-column: 2; grid-row: 1;"),
    };
    let align = match vertical {
        enums::ALIGN_END => "end",
        enums::ALIGN_CENTER => "center",
        enums::ALIGN_STRETCH => "stretch",
        _ => "start",
    };
    let gap = constants
        .resolve_constants("@ruiCheckboxGap")
        .unwrap_or_else(|| "4px".to_owned());

    let _ = write!(
        out,
        "<div style=\"display: grid; grid-template-columns: {columns}; align-items: {align}; gap: {gap};\">"
    );
    let _ = write!(
        out,
        "<div class=\"ruiCheckboxImage\" style=\"{image_cell}\">{}</div>",
        context.images.image(checked, constants)
    );
    let text = view.text(TEXT, constants).unwrap_or_default();
    let _ = write!(
        out,
        "<div class=\"ruiCheckboxContent\" style=\"{content_cell}\">{}</div></div>",
        text_html(&text)
    );
}

fn items(view: &View) -> &[String] {
    match view.get_raw(ITEMS) {
        Some(Value::Strings(items)) => items,
        _ => &[],
    }
}

fn current_index(view: &View, constants: &dyn Constants) -> Option<usize> {
    view.int(CURRENT, constants)
        .and_then(|index| usize::try_from(index).ok())
}

fn list_items_html(view: &View, constants: &dyn Constants, out: &mut String) {
    let current = current_index(view, constants);
    let horizontal = view
        .enum_index(HORIZONTAL_ALIGN, constants)
        .unwrap_or(enums::ALIGN_START);
    let vertical = view
        .enum_index(VERTICAL_ALIGN, constants)
        .unwrap_or(enums::ALIGN_START);
    let item_style = format!(
        "display: flex; justify-content: {}; align-items: {};",
        flex_alignment(horizontal, true, false, false),
        flex_alignment(vertical, false, false, false)
    );
    for (index, item) in items(view).iter().enumerate() {
        let class = if current == Some(index) {
            "ruiListItemSelected"
        } else {
            "ruiListItem"
        };
        let _ = write!(
            out,
            "<div class=\"{class}\" data-index=\"{index}\" style=\"{item_style}\" onclick=\"listItemClickEvent(this, event)\">{}</div>",
            text_html(item)
        );
    }
}

fn options_html(view: &View, constants: &dyn Constants, out: &mut String) {
    let current = current_index(view, constants);
    for (index, item) in items(view).iter().enumerate() {
        let selected = if current == Some(index) { " selected" } else { "" };
        let _ = write!(
            out,
            "<option value=\"{index}\"{selected}>{}</option>",
            escape_html(item)
        );
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::units::SizeUnit;

    fn render(tree: &mut ViewTree, id: ViewId) -> String {
        let mut images = CheckboxImages::new();
        let mut context = HtmlContext {
            constants: &(),
            images: &mut images,
        };
        subtree_html(tree, id, &mut context)
    }

    #[test]
    fn escaping() {
        assert_eq!(escape_html("a<b & \"c\""), "a&lt;b &amp; &quot;c&quot;");
        assert_eq!(js_string("it's\n</div>"), "it\\'s\\n<\\/div>");
    }

    #[test]
    fn text_view_html() {
        let mut tree = ViewTree::new();
        let id = tree.insert(
            View::new(Widget::TextView)
                .with("text", "Hello\n<world>")
                .with("width", SizeUnit::px(100.0))
                .with("style", "caption"),
        );
        assert_eq!(
            render(&mut tree, id),
            "<div id=\"id1\" class=\"ruiTextView caption\" style=\"width: 100px;\">Hello<br>&lt;world&gt;</div>"
        );
        assert!(tree.get(id).unwrap().rendered.is_some());
    }

    #[test]
    fn rendering_drops_pending_changes() {
        let mut tree = ViewTree::new();
        let id = tree.insert(View::new(Widget::TextView).with("text", "hi"));
        render(&mut tree, id);
        assert!(tree.get_mut(id).unwrap().take_changes().is_empty());
    }

    #[test]
    fn containers_render_children() {
        let mut tree = ViewTree::new();
        let root = tree.insert(View::new(Widget::ListLayout).with("orientation", "start-to-end"));
        tree.insert_child(root, View::new(Widget::Button).with("text", "OK"));
        tree.insert_child(root, View::new(Widget::TextView).with("semantics", "h1").with("text", "T"));
        insta::assert_snapshot!(render(&mut tree, root), @r#"<div id="id1" class="ruiListLayout" style="display: flex; flex-flow: row; justify-content: flex-start; align-items: flex-start;"><button id="id2" class="ruiButton" onclick="clickEvent(this, event)">OK</button><h1 id="id3" class="ruiTextView">T</h1></div>"#);
    }

    #[test]
    fn grid_alignment_goes_to_children() {
        let mut tree = ViewTree::new();
        let grid = tree.insert(View::new(Widget::GridLayout).with("horizontal-align", "center"));
        let cell = tree
            .insert_child(grid, View::new(Widget::View).with("row", 1))
            .unwrap();
        let grid_css = inline_css(&tree, grid, &());
        assert_eq!(grid_css.get("justify-content"), None);
        assert_eq!(grid_css.get("display"), Some("grid"));
        let cell_css = inline_css(&tree, cell, &());
        assert_eq!(cell_css.get("justify-self"), Some("center"));
        assert_eq!(cell_css.get("grid-row-start"), Some("2"));
    }

    #[test]
    fn list_view_items() {
        let mut tree = ViewTree::new();
        let id = tree.insert(
            View::new(Widget::ListView)
                .with("items", vec!["one", "two"])
                .with("current", 1),
        );
        let html = render(&mut tree, id);
        assert!(html.contains("<div class=\"ruiListItem\" data-index=\"0\""));
        assert!(html.contains("<div class=\"ruiListItemSelected\" data-index=\"1\""));
        assert!(html.contains(">two</div>"));
    }

    #[test]
    fn drop_down_options() {
        let mut tree = ViewTree::new();
        let id = tree.insert(
            View::new(Widget::DropDownList)
                .with("items", vec!["a", "b"])
                .with("current", 0),
        );
        let html = render(&mut tree, id);
        assert!(html.starts_with("<select id=\"id1\" class=\"ruiDropDownList\" onchange="));
        assert!(html.contains("<option value=\"0\" selected>a</option><option value=\"1\">b</option>"));
    }

    #[test]
    fn stack_layout_shows_current_child() {
        let mut tree = ViewTree::new();
        let stack = tree.insert(View::new(Widget::StackLayout));
        tree.insert_child(stack, View::new(Widget::TextView).with("text", "first"));
        tree.insert_child(stack, View::new(Widget::TextView).with("text", "second"));
        assert!(render(&mut tree, stack).contains("second"));
        tree.get_mut(stack).unwrap().set("current", 0);
        let html = render(&mut tree, stack);
        assert!(html.contains("first"));
        assert!(!html.contains("second"));
    }

    #[test]
    fn checkbox_images_are_cached() {
        let mut tree = ViewTree::new();
        let id = tree.insert(View::new(Widget::Checkbox).with("checked", true).with("text", "Agree"));
        let mut images = CheckboxImages::new();
        let mut context = HtmlContext {
            constants: &(),
            images: &mut images,
        };
        let html = subtree_html(&mut tree, id, &mut context);
        subtree_html(&mut tree, id, &mut context);
        assert!(html.contains("class=\"ruiCheckboxImage\""));
        assert!(html.contains("Agree"));
        assert_eq!(images.len(), 1);
    }
}
