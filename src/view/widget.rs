//! The widget catalogue: what each kind of view renders as.

use crate::view::schema::{
    CHECKBOX_HORIZONTAL_ALIGN, CHECKBOX_VERTICAL_ALIGN, CHECKED, CURRENT, HORIZONTAL_ALIGN, ITEMS,
    TEXT, VERTICAL_ALIGN,
};

/// Kind of a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Widget {
    View,
    TextView,
    Button,
    Checkbox,
    ListLayout,
    GridLayout,
    ColumnLayout,
    StackLayout,
    ListView,
    DropDownList,
}

const ALL: &[Widget] = &[
    Widget::View,
    Widget::TextView,
    Widget::Button,
    Widget::Checkbox,
    Widget::ListLayout,
    Widget::GridLayout,
    Widget::ColumnLayout,
    Widget::StackLayout,
    Widget::ListView,
    Widget::DropDownList,
];

impl Widget {
    pub fn name(self) -> &'static str {
        match self {
            Widget::View => "View",
            Widget::TextView => "TextView",
            Widget::Button => "Button",
            Widget::Checkbox => "Checkbox",
            Widget::ListLayout => "ListLayout",
            Widget::GridLayout => "GridLayout",
            Widget::ColumnLayout => "ColumnLayout",
            Widget::StackLayout => "StackLayout",
            Widget::ListView => "ListView",
            Widget::DropDownList => "DropDownList",
        }
    }

    /// Look a widget up by name, ignoring case.
    pub fn from_name(name: &str) -> Option<Widget> {
        ALL.iter()
            .copied()
            .find(|widget| widget.name().eq_ignore_ascii_case(name.trim()))
    }

    /// CSS class the theme styles this widget with.
    pub fn system_class(self) -> &'static str {
        match self {
            Widget::View => "ruiView",
            Widget::TextView => "ruiTextView",
            Widget::Button => "ruiButton",
            Widget::Checkbox => "ruiCheckbox",
            Widget::ListLayout => "ruiListLayout",
            Widget::GridLayout => "ruiGridLayout",
            Widget::ColumnLayout => "ruiColumnLayout",
            Widget::StackLayout => "ruiStackLayout",
            Widget::ListView => "ruiListView",
            Widget::DropDownList => "ruiDropDownList",
        }
    }

    /// Class used instead of the `style` property while the view is disabled.
    pub fn disabled_class(self) -> Option<&'static str> {
        match self {
            Widget::Button => Some("ruiDisabledButton"),
            _ => None,
        }
    }

    /// HTML element when the view has no explicit semantics.
    pub fn element(self) -> &'static str {
        match self {
            Widget::Button => "button",
            Widget::DropDownList => "select",
            _ => "div",
        }
    }

    /// Whether the view holds child views.
    pub fn is_container(self) -> bool {
        matches!(
            self,
            Widget::View
                | Widget::ListLayout
                | Widget::GridLayout
                | Widget::ColumnLayout
                | Widget::StackLayout
        )
    }

    /// Properties whose change invalidates the inner HTML.
    pub fn structural_tags(self) -> &'static [&'static str] {
        match self {
            Widget::TextView | Widget::Button => &[TEXT],
            Widget::Checkbox => &[TEXT, CHECKED, CHECKBOX_HORIZONTAL_ALIGN, CHECKBOX_VERTICAL_ALIGN],
            Widget::GridLayout => &[HORIZONTAL_ALIGN, VERTICAL_ALIGN],
            Widget::StackLayout => &[CURRENT],
            Widget::ListView => &[ITEMS, CURRENT, HORIZONTAL_ALIGN, VERTICAL_ALIGN],
            Widget::DropDownList => &[ITEMS, CURRENT],
            Widget::View | Widget::ListLayout | Widget::ColumnLayout => &[],
        }
    }

    /// Whether `horizontal-align`/`vertical-align` position the children
    /// (or items) instead of the view's own flex content.
    pub fn aligns_children(self) -> bool {
        matches!(self, Widget::GridLayout | Widget::ListView)
    }

    /// Declarations every view of this kind starts from.
    pub fn base_css(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Widget::ListLayout | Widget::ListView => &[("display", "flex")],
            Widget::GridLayout => &[("display", "grid")],
            Widget::StackLayout => &[("position", "relative")],
            _ => &[],
        }
    }

    /// Whether the element reports clicks without an explicit listener.
    pub(crate) fn always_clickable(self) -> bool {
        matches!(self, Widget::Button | Widget::Checkbox)
    }
}
