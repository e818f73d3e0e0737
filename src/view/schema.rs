//! The property registry shared by views and theme style rules.

use once_cell::sync::Lazy;

use crate::property::enums;
use crate::property::{Kind, Schema};

// ---------------------------------------------------------------------------
// Tags
// ---------------------------------------------------------------------------

pub const ID: &str = "id";
pub const STYLE: &str = "style";
pub const STYLE_DISABLED: &str = "style-disabled";
pub const DISABLED: &str = "disabled";
pub const SEMANTICS: &str = "semantics";
pub const VISIBILITY: &str = "visibility";
pub const OVERFLOW: &str = "overflow";
pub const TOOLTIP: &str = "tooltip";

pub const WIDTH: &str = "width";
pub const HEIGHT: &str = "height";
pub const MIN_WIDTH: &str = "min-width";
pub const MIN_HEIGHT: &str = "min-height";
pub const MAX_WIDTH: &str = "max-width";
pub const MAX_HEIGHT: &str = "max-height";
pub const LEFT: &str = "left";
pub const RIGHT: &str = "right";
pub const TOP: &str = "top";
pub const BOTTOM: &str = "bottom";
pub const MARGIN: &str = "margin";
pub const PADDING: &str = "padding";
pub const RADIUS: &str = "radius";
pub const BORDER: &str = "border";
pub const OUTLINE: &str = "outline";
pub const OUTLINE_OFFSET: &str = "outline-offset";
pub const Z_INDEX: &str = "z-index";
pub const OPACITY: &str = "opacity";

pub const BACKGROUND: &str = "background";
pub const BACKGROUND_COLOR: &str = "background-color";
pub const BACKGROUND_CLIP: &str = "background-clip";
pub const ACCENT_COLOR: &str = "accent-color";
pub const CARET_COLOR: &str = "caret-color";
pub const TEXT_COLOR: &str = "text-color";

pub const FONT_NAME: &str = "font-name";
pub const TEXT_SIZE: &str = "text-size";
pub const TEXT_ALIGN: &str = "text-align";
pub const TEXT_TRANSFORM: &str = "text-transform";
pub const TEXT_WEIGHT: &str = "text-weight";
pub const TEXT_INDENT: &str = "text-indent";
pub const TEXT_DIRECTION: &str = "text-direction";
pub const WRITING_MODE: &str = "writing-mode";
pub const VERTICAL_TEXT_ORIENTATION: &str = "vertical-text-orientation";
pub const LETTER_SPACING: &str = "letter-spacing";
pub const WORD_SPACING: &str = "word-spacing";
pub const LINE_HEIGHT: &str = "line-height";
pub const CURSOR: &str = "cursor";
pub const WHITE_SPACE: &str = "white-space";
pub const WORD_BREAK: &str = "word-break";
pub const TEXT_OVERFLOW: &str = "text-overflow";
pub const FLOAT: &str = "float";
pub const TABLE_VERTICAL_ALIGN: &str = "table-vertical-align";
pub const ITALIC: &str = "italic";
pub const SMALL_CAPS: &str = "small-caps";
pub const STRIKETHROUGH: &str = "strikethrough";
pub const OVERLINE: &str = "overline";
pub const UNDERLINE: &str = "underline";
pub const TEXT_LINE_THICKNESS: &str = "text-line-thickness";
pub const TEXT_LINE_STYLE: &str = "text-line-style";
pub const TEXT_LINE_COLOR: &str = "text-line-color";
pub const SHADOW: &str = "shadow";
pub const TEXT_SHADOW: &str = "text-shadow";

pub const COLUMN_COUNT: &str = "column-count";
pub const COLUMN_WIDTH: &str = "column-width";
pub const COLUMN_GAP: &str = "column-gap";
pub const COLUMN_SEPARATOR: &str = "column-separator";

pub const ORIENTATION: &str = "orientation";
pub const LIST_WRAP: &str = "list-wrap";
pub const HORIZONTAL_ALIGN: &str = "horizontal-align";
pub const VERTICAL_ALIGN: &str = "vertical-align";
pub const LIST_ROW_GAP: &str = "list-row-gap";
pub const LIST_COLUMN_GAP: &str = "list-column-gap";

pub const ROW: &str = "row";
pub const COLUMN: &str = "column";
pub const CELL_WIDTH: &str = "cell-width";
pub const CELL_HEIGHT: &str = "cell-height";
pub const GRID_ROW_GAP: &str = "grid-row-gap";
pub const GRID_COLUMN_GAP: &str = "grid-column-gap";

pub const PERSPECTIVE: &str = "perspective";
pub const PERSPECTIVE_ORIGIN_X: &str = "perspective-origin-x";
pub const PERSPECTIVE_ORIGIN_Y: &str = "perspective-origin-y";
pub const BACKFACE_VISIBLE: &str = "backface-visible";
pub const TRANSFORM_ORIGIN_X: &str = "transform-origin-x";
pub const TRANSFORM_ORIGIN_Y: &str = "transform-origin-y";
pub const TRANSFORM_ORIGIN_Z: &str = "transform-origin-z";
pub const TRANSLATE_X: &str = "translate-x";
pub const TRANSLATE_Y: &str = "translate-y";
pub const TRANSLATE_Z: &str = "translate-z";
pub const SCALE_X: &str = "scale-x";
pub const SCALE_Y: &str = "scale-y";
pub const SCALE_Z: &str = "scale-z";
pub const ROTATE: &str = "rotate";
pub const ROTATE_X: &str = "rotate-x";
pub const ROTATE_Y: &str = "rotate-y";
pub const ROTATE_Z: &str = "rotate-z";
pub const SKEW_X: &str = "skew-x";
pub const SKEW_Y: &str = "skew-y";

pub const CLIP: &str = "clip";
pub const SHAPE_OUTSIDE: &str = "shape-outside";
pub const FILTER: &str = "filter";
pub const BACKDROP_FILTER: &str = "backdrop-filter";
pub const TRANSITIONS: &str = "transitions";
pub const ANIMATION: &str = "animation";
pub const ANIMATION_PAUSED: &str = "animation-paused";

// Widget content.
pub const TEXT: &str = "text";
pub const CONTENT: &str = "content";
pub const ITEMS: &str = "items";
pub const CURRENT: &str = "current";
pub const CHECKED: &str = "checked";
pub const CHECKBOX_HORIZONTAL_ALIGN: &str = "checkbox-horizontal-align";
pub const CHECKBOX_VERTICAL_ALIGN: &str = "checkbox-vertical-align";

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Every property a view (or a theme style rule) recognises.
pub static VIEW_SCHEMA: Lazy<Schema> = Lazy::new(|| {
    Schema::new(
        "view",
        &[
            (ID, Kind::Text),
            (STYLE, Kind::Text),
            (STYLE_DISABLED, Kind::Text),
            (DISABLED, Kind::Bool),
            (SEMANTICS, Kind::Enum(enums::SEMANTICS)),
            (VISIBILITY, Kind::Enum(enums::VISIBILITY)),
            (OVERFLOW, Kind::Enum(enums::OVERFLOW)),
            (TOOLTIP, Kind::Text),
            (WIDTH, Kind::Size),
            (HEIGHT, Kind::Size),
            (MIN_WIDTH, Kind::Size),
            (MIN_HEIGHT, Kind::Size),
            (MAX_WIDTH, Kind::Size),
            (MAX_HEIGHT, Kind::Size),
            (LEFT, Kind::Size),
            (RIGHT, Kind::Size),
            (TOP, Kind::Size),
            (BOTTOM, Kind::Size),
            (MARGIN, Kind::Bounds),
            (PADDING, Kind::Bounds),
            (RADIUS, Kind::Radius),
            (BORDER, Kind::Border),
            (OUTLINE, Kind::Outline),
            (OUTLINE_OFFSET, Kind::Size),
            (Z_INDEX, Kind::Int),
            (OPACITY, Kind::Float(None)),
            (BACKGROUND, Kind::Background),
            (BACKGROUND_COLOR, Kind::Color),
            (BACKGROUND_CLIP, Kind::Enum(enums::BACKGROUND_CLIP)),
            (ACCENT_COLOR, Kind::Color),
            (CARET_COLOR, Kind::Color),
            (TEXT_COLOR, Kind::Color),
            (FONT_NAME, Kind::Text),
            (TEXT_SIZE, Kind::Size),
            (TEXT_ALIGN, Kind::Enum(enums::TEXT_ALIGN)),
            (TEXT_TRANSFORM, Kind::Enum(enums::TEXT_TRANSFORM)),
            (TEXT_WEIGHT, Kind::Enum(enums::TEXT_WEIGHT)),
            (TEXT_INDENT, Kind::Size),
            (TEXT_DIRECTION, Kind::Enum(enums::TEXT_DIRECTION)),
            (WRITING_MODE, Kind::Enum(enums::WRITING_MODE)),
            (VERTICAL_TEXT_ORIENTATION, Kind::Enum(enums::VERTICAL_TEXT_ORIENTATION)),
            (LETTER_SPACING, Kind::Size),
            (WORD_SPACING, Kind::Size),
            (LINE_HEIGHT, Kind::Size),
            (CURSOR, Kind::Enum(enums::CURSOR)),
            (WHITE_SPACE, Kind::Enum(enums::WHITE_SPACE)),
            (WORD_BREAK, Kind::Enum(enums::WORD_BREAK)),
            (TEXT_OVERFLOW, Kind::Enum(enums::TEXT_OVERFLOW)),
            (FLOAT, Kind::Enum(enums::FLOAT)),
            (TABLE_VERTICAL_ALIGN, Kind::Enum(enums::TABLE_VERTICAL_ALIGN)),
            (ITALIC, Kind::Bool),
            (SMALL_CAPS, Kind::Bool),
            (STRIKETHROUGH, Kind::Bool),
            (OVERLINE, Kind::Bool),
            (UNDERLINE, Kind::Bool),
            (TEXT_LINE_THICKNESS, Kind::Size),
            (TEXT_LINE_STYLE, Kind::Enum(enums::TEXT_LINE_STYLE)),
            (TEXT_LINE_COLOR, Kind::Color),
            (SHADOW, Kind::Shadows),
            (TEXT_SHADOW, Kind::Shadows),
            (COLUMN_COUNT, Kind::Int),
            (COLUMN_WIDTH, Kind::Size),
            (COLUMN_GAP, Kind::Size),
            (COLUMN_SEPARATOR, Kind::ColumnSeparator),
            (ORIENTATION, Kind::Enum(enums::ORIENTATION)),
            (LIST_WRAP, Kind::Enum(enums::LIST_WRAP)),
            (HORIZONTAL_ALIGN, Kind::Enum(enums::HORIZONTAL_ALIGN)),
            (VERTICAL_ALIGN, Kind::Enum(enums::VERTICAL_ALIGN)),
            (LIST_ROW_GAP, Kind::Size),
            (LIST_COLUMN_GAP, Kind::Size),
            (ROW, Kind::Range),
            (COLUMN, Kind::Range),
            (CELL_WIDTH, Kind::SizeList),
            (CELL_HEIGHT, Kind::SizeList),
            (GRID_ROW_GAP, Kind::Size),
            (GRID_COLUMN_GAP, Kind::Size),
            (PERSPECTIVE, Kind::Size),
            (PERSPECTIVE_ORIGIN_X, Kind::Size),
            (PERSPECTIVE_ORIGIN_Y, Kind::Size),
            (BACKFACE_VISIBLE, Kind::Bool),
            (TRANSFORM_ORIGIN_X, Kind::Size),
            (TRANSFORM_ORIGIN_Y, Kind::Size),
            (TRANSFORM_ORIGIN_Z, Kind::Size),
            (TRANSLATE_X, Kind::Size),
            (TRANSLATE_Y, Kind::Size),
            (TRANSLATE_Z, Kind::Size),
            (SCALE_X, Kind::Float(None)),
            (SCALE_Y, Kind::Float(None)),
            (SCALE_Z, Kind::Float(None)),
            (ROTATE, Kind::Angle),
            (ROTATE_X, Kind::Float(None)),
            (ROTATE_Y, Kind::Float(None)),
            (ROTATE_Z, Kind::Float(None)),
            (SKEW_X, Kind::Angle),
            (SKEW_Y, Kind::Angle),
            (CLIP, Kind::Clip),
            (SHAPE_OUTSIDE, Kind::Clip),
            (FILTER, Kind::Filter),
            (BACKDROP_FILTER, Kind::Filter),
            (TRANSITIONS, Kind::Transitions),
            (ANIMATION, Kind::Animations),
            (ANIMATION_PAUSED, Kind::Bool),
            (TEXT, Kind::Text),
            (CONTENT, Kind::Text),
            (ITEMS, Kind::Strings),
            (CURRENT, Kind::Int),
            (CHECKED, Kind::Bool),
            (CHECKBOX_HORIZONTAL_ALIGN, Kind::Enum(enums::CHECKBOX_ALIGN)),
            (CHECKBOX_VERTICAL_ALIGN, Kind::Enum(enums::VERTICAL_ALIGN)),
        ],
    )
    .with_aliases(&[
        ("top-margin", "margin-top"),
        ("right-margin", "margin-right"),
        ("bottom-margin", "margin-bottom"),
        ("left-margin", "margin-left"),
        ("top-padding", "padding-top"),
        ("right-padding", "padding-right"),
        ("bottom-padding", "padding-bottom"),
        ("left-padding", "padding-left"),
        ("row-gap", GRID_ROW_GAP),
        ("color", TEXT_COLOR),
        ("font", FONT_NAME),
        ("font-size", TEXT_SIZE),
        ("border-radius", RADIUS),
        ("box-shadow", SHADOW),
        ("line-through", STRIKETHROUGH),
        ("list-orientation", ORIENTATION),
        ("checked-state", CHECKED),
        ("transition", TRANSITIONS),
    ])
    .with_routes(&[
        (MARGIN, MARGIN),
        (PADDING, PADDING),
        (RADIUS, RADIUS),
        (BORDER, BORDER),
        (OUTLINE, OUTLINE),
        (COLUMN_SEPARATOR, COLUMN_SEPARATOR),
    ])
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_fold_to_canonical_tags() {
        assert_eq!(VIEW_SCHEMA.canonical("row-gap"), Some(GRID_ROW_GAP));
        assert_eq!(VIEW_SCHEMA.canonical("Color"), Some(TEXT_COLOR));
        assert_eq!(VIEW_SCHEMA.canonical("border-radius"), Some(RADIUS));
        assert_eq!(VIEW_SCHEMA.canonical("box-shadow"), Some(SHADOW));
        assert_eq!(VIEW_SCHEMA.route("top-margin"), Some((MARGIN, "top".to_owned())));
    }

    #[test]
    fn compound_tags_route_into_composites() {
        assert_eq!(VIEW_SCHEMA.route("radius-top-left-x"), Some((RADIUS, "top-left-x".to_owned())));
        assert_eq!(VIEW_SCHEMA.route("border-left-color"), Some((BORDER, "left-color".to_owned())));
        assert_eq!(
            VIEW_SCHEMA.route("column-separator-width"),
            Some((COLUMN_SEPARATOR, "width".to_owned()))
        );
    }
}
