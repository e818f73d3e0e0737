//! Name tables for enum-valued properties.
//!
//! An enum property stores the index into its table; the table order is
//! part of the public contract (indices are accepted as input).

pub const BORDER_STYLE: &[&str] = &["none", "solid", "dashed", "dotted", "double"];
pub const NONE_LINE: usize = 0;
pub const SOLID_LINE: usize = 1;

pub const TEXT_ALIGN: &[&str] = &["left", "right", "center", "justify"];

pub const TEXT_TRANSFORM: &[&str] = &["none", "capitalize", "lowercase", "uppercase"];

/// `text-weight`: index × 100 is the CSS `font-weight`; 0 inherits.
pub const TEXT_WEIGHT: &[&str] = &[
    "inherit",
    "thin",
    "extra-light",
    "light",
    "normal",
    "medium",
    "semi-bold",
    "bold",
    "extra-bold",
    "black",
];

pub const WRITING_MODE: &[&str] = &[
    "horizontal-top-to-bottom",
    "horizontal-bottom-to-top",
    "vertical-right-to-left",
    "vertical-left-to-right",
];
pub const VERTICAL_WRITING_MIN: usize = 2;

pub const VERTICAL_TEXT_ORIENTATION: &[&str] = &["mixed", "upright"];

pub const TEXT_DIRECTION: &[&str] = &["system", "left-to-right", "right-to-left"];

pub const TEXT_LINE_STYLE: &[&str] = &["solid", "dashed", "dotted", "double", "wavy"];

pub const CURSOR: &[&str] = &[
    "auto",
    "default",
    "none",
    "context-menu",
    "help",
    "pointer",
    "progress",
    "wait",
    "cell",
    "crosshair",
    "text",
    "vertical-text",
    "alias",
    "copy",
    "move",
    "no-drop",
    "not-allowed",
    "e-resize",
    "n-resize",
    "ne-resize",
    "nw-resize",
    "s-resize",
    "se-resize",
    "sw-resize",
    "w-resize",
    "ew-resize",
    "ns-resize",
    "nesw-resize",
    "nwse-resize",
    "col-resize",
    "row-resize",
    "all-scroll",
    "zoom-in",
    "zoom-out",
    "grab",
    "grabbing",
];

pub const WHITE_SPACE: &[&str] = &[
    "inherit",
    "normal",
    "nowrap",
    "pre",
    "pre-wrap",
    "pre-line",
    "break-spaces",
];

pub const WORD_BREAK: &[&str] = &["normal", "break-all", "keep-all", "break-word"];

pub const TEXT_OVERFLOW: &[&str] = &["clip", "ellipsis"];

pub const FLOAT: &[&str] = &["none", "left", "right"];

pub const TABLE_VERTICAL_ALIGN: &[&str] = &["top", "bottom", "center", "stretch", "baseline"];

pub const VISIBILITY: &[&str] = &["visible", "invisible", "gone"];
pub const INVISIBLE: usize = 1;
pub const GONE: usize = 2;

pub const OVERFLOW: &[&str] = &["visible", "hidden", "scroll", "auto"];

/// Main-axis orientation of list layouts.
pub const ORIENTATION: &[&str] = &["up-down", "start-to-end", "bottom-up", "end-to-start"];
pub const TOP_DOWN: usize = 0;
pub const START_TO_END: usize = 1;
pub const BOTTOM_UP: usize = 2;
pub const END_TO_START: usize = 3;

pub const LIST_WRAP: &[&str] = &["off", "on", "reverse"];
pub const WRAP_OFF: usize = 0;
pub const WRAP_ON: usize = 1;
pub const WRAP_REVERSE: usize = 2;

pub const HORIZONTAL_ALIGN: &[&str] = &["left", "right", "center", "stretch"];
pub const VERTICAL_ALIGN: &[&str] = &["top", "bottom", "center", "stretch"];
pub const ALIGN_START: usize = 0;
pub const ALIGN_END: usize = 1;
pub const ALIGN_CENTER: usize = 2;
pub const ALIGN_STRETCH: usize = 3;

pub const SEMANTICS: &[&str] = &[
    "default",
    "article",
    "section",
    "aside",
    "header",
    "main",
    "footer",
    "navigation",
    "figure",
    "figure-caption",
    "button",
    "paragraph",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "blockquote",
    "code",
];

/// Compass directions of linear gradients.
pub const GRADIENT_DIRECTION: &[&str] = &[
    "to-top",
    "to-right-top",
    "to-right",
    "to-right-bottom",
    "to-bottom",
    "to-left-bottom",
    "to-left",
    "to-left-top",
];

pub const RADIAL_SHAPE: &[&str] = &["ellipse", "circle"];

pub const RADIAL_EXTENT: &[&str] = &[
    "farthest-corner",
    "closest-side",
    "closest-corner",
    "farthest-side",
];

pub const BACKGROUND_REPEAT: &[&str] = &[
    "no-repeat",
    "repeat",
    "repeat-x",
    "repeat-y",
    "round",
    "space",
];

pub const BACKGROUND_ATTACHMENT: &[&str] = &["scroll", "fixed", "local"];

pub const BACKGROUND_CLIP: &[&str] = &["border-box", "padding-box", "content-box", "text"];

pub const BACKGROUND_FIT: &[&str] = &["none", "contain", "cover"];

pub const ANIMATION_DIRECTION: &[&str] = &["normal", "reverse", "alternate", "alternate-reverse"];

pub const CHECKBOX_ALIGN: &[&str] = &["left", "right", "center"];

/// Index of `name` in `names`, ignoring case and `_`/`-` differences.
pub fn index_of(names: &[&str], name: &str) -> Option<usize> {
    let wanted: String = name
        .trim()
        .chars()
        .map(|c| if c == '_' { '-' } else { c.to_ascii_lowercase() })
        .collect();
    names.iter().position(|candidate| *candidate == wanted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_forgiving() {
        assert_eq!(index_of(ORIENTATION, "Start_To_End"), Some(START_TO_END));
        assert_eq!(index_of(LIST_WRAP, " reverse "), Some(WRAP_REVERSE));
        assert_eq!(index_of(LIST_WRAP, "sideways"), None);
    }
}
