//! Property-to-CSS mapping for views and theme style rules.
//!
//! [`css_view_style`] is the only place that knows how a view property turns
//! into CSS declarations; inline styles, theme stylesheets, keyframes and
//! targeted updates all go through it.

use crate::css::builder::{CssBuilder, CssStyleBuilder, ViewCssBuilder};
use crate::css::transform::{has_perspective, transform_css};
use crate::property::{enums, PropertyContainer, PropertyObject, Value};
use crate::style::{shadows_css, Animation};
use crate::theme::Constants;
use crate::units::{fmt_number, SizeValue};
use crate::view::schema::*;
use crate::view::VIEW_SCHEMA;

/// Size-valued tags emitted under a CSS name when not `auto`.
const SIZE_PROPERTIES: &[(&str, &str)] = &[
    (WIDTH, "width"),
    (HEIGHT, "height"),
    (MIN_WIDTH, "min-width"),
    (MIN_HEIGHT, "min-height"),
    (MAX_WIDTH, "max-width"),
    (MAX_HEIGHT, "max-height"),
    (LEFT, "left"),
    (RIGHT, "right"),
    (TOP, "top"),
    (BOTTOM, "bottom"),
    (OUTLINE_OFFSET, "outline-offset"),
    (TEXT_SIZE, "font-size"),
    (TEXT_INDENT, "text-indent"),
    (LETTER_SPACING, "letter-spacing"),
    (WORD_SPACING, "word-spacing"),
    (LINE_HEIGHT, "line-height"),
    (TEXT_LINE_THICKNESS, "text-decoration-thickness"),
    (COLUMN_WIDTH, "column-width"),
    (COLUMN_GAP, "column-gap"),
    (LIST_ROW_GAP, "row-gap"),
    (LIST_COLUMN_GAP, "column-gap"),
    (GRID_ROW_GAP, "row-gap"),
    (GRID_COLUMN_GAP, "column-gap"),
];

/// Color-valued tags emitted when not fully transparent.
const COLOR_PROPERTIES: &[(&str, &str)] = &[
    (BACKGROUND_COLOR, "background-color"),
    (TEXT_COLOR, "color"),
    (CARET_COLOR, "caret-color"),
    (ACCENT_COLOR, "accent-color"),
    (TEXT_LINE_COLOR, "text-decoration-color"),
];

/// Enum-valued tags and the CSS value of each index.
const ENUM_PROPERTIES: &[(&str, &str, &[&str])] = &[
    (TEXT_ALIGN, "text-align", enums::TEXT_ALIGN),
    (TEXT_TRANSFORM, "text-transform", enums::TEXT_TRANSFORM),
    (
        WRITING_MODE,
        "writing-mode",
        &["horizontal-tb", "horizontal-tb", "vertical-rl", "vertical-lr"],
    ),
    (TEXT_DIRECTION, "direction", &["", "ltr", "rtl"]),
    (CURSOR, "cursor", enums::CURSOR),
    (WHITE_SPACE, "white-space", enums::WHITE_SPACE),
    (WORD_BREAK, "word-break", enums::WORD_BREAK),
    (TEXT_OVERFLOW, "text-overflow", enums::TEXT_OVERFLOW),
    (FLOAT, "float", enums::FLOAT),
    (
        TABLE_VERTICAL_ALIGN,
        "vertical-align",
        &["top", "bottom", "middle", "middle", "baseline"],
    ),
    (TEXT_LINE_STYLE, "text-decoration-style", enums::TEXT_LINE_STYLE),
    (OVERFLOW, "overflow", enums::OVERFLOW),
    (BACKGROUND_CLIP, "background-clip", enums::BACKGROUND_CLIP),
];

/// Emit every CSS declaration `style` implies.
pub fn css_view_style(
    style: &dyn PropertyContainer,
    builder: &mut dyn CssBuilder,
    constants: &dyn Constants,
) {
    box_model(style, builder, constants);

    for (tag, key) in SIZE_PROPERTIES {
        if let Some(size) = style.size(tag, constants) {
            if !size.is_auto() {
                builder.add(key, &size.css_string("", constants));
            }
        }
    }

    if let Some(Value::Background(elements)) = style.get_raw(BACKGROUND) {
        let layers: Vec<String> = elements
            .iter()
            .filter_map(|element| element.css_string(constants))
            .collect();
        builder.add_values("background", ", ", &layers);
    }

    for (tag, key) in COLOR_PROPERTIES {
        if let Some(color) = style.color(tag, constants) {
            if color.alpha() > 0 {
                builder.add(key, &color.css_string());
            }
        }
    }

    text(style, builder, constants);

    if let Some(Value::Shadows(shadows)) = style.get_raw(SHADOW) {
        if let Some(css) = shadows_css(shadows, false, constants) {
            builder.add("box-shadow", &css);
        }
    }
    if let Some(Value::Shadows(shadows)) = style.get_raw(TEXT_SHADOW) {
        if let Some(css) = shadows_css(shadows, true, constants) {
            builder.add("text-shadow", &css);
        }
    }

    if let Some(Value::ColumnSeparator(separator)) = style.get_raw(COLUMN_SEPARATOR) {
        let line = separator.view_line(constants);
        if line.style != enums::NONE_LINE {
            builder.add("column-rule", &line.css_string(constants));
        }
    }

    flex(style, builder, constants);
    grid(style, builder, constants);
    transform(style, builder, constants);

    for (tag, key) in [(CLIP, "clip-path"), (SHAPE_OUTSIDE, "shape-outside")] {
        if let Some(Value::Clip(shape)) = style.get_raw(tag) {
            if shape.valid(constants) {
                if let Some(css) = shape.css_string(constants) {
                    builder.add(key, &css);
                }
            }
        }
    }

    for (tag, key) in [(FILTER, "filter"), (BACKDROP_FILTER, "backdrop-filter")] {
        if let Some(Value::Filter(filter)) = style.get_raw(tag) {
            if let Some(css) = filter.css_string(constants) {
                builder.add(key, &css);
            }
        }
    }

    animation(style, builder, constants);
}

/// Inline declarations of `style`.
pub fn view_css(style: &dyn PropertyContainer, constants: &dyn Constants) -> ViewCssBuilder {
    let mut builder = ViewCssBuilder::new();
    css_view_style(style, &mut builder, constants);
    builder
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

fn box_model(style: &dyn PropertyContainer, builder: &mut dyn CssBuilder, constants: &dyn Constants) {
    for (tag, key) in [(MARGIN, "margin"), (PADDING, "padding")] {
        if let Some(Value::Bounds(bounds)) = style.get_raw(tag) {
            let bounds = bounds.bounds(constants);
            if !bounds.is_all_auto() {
                builder.add(key, &bounds.css_string("0", constants));
            }
        }
    }

    if let Some(Value::Border(border)) = style.get_raw(BORDER) {
        let borders = border.view_borders(constants);
        if !borders.all_none() {
            builder.add("border-style", &borders.css_style());
            if let Some(width) = borders.css_width(constants) {
                builder.add("border-width", &width);
            }
            if let Some(color) = borders.css_color() {
                builder.add("border-color", &color);
            }
        }
    }

    if let Some(Value::Radius(radius)) = style.get_raw(RADIUS) {
        let radius = radius.box_radius(constants);
        if radius.any_non_zero() {
            builder.add("border-radius", &radius.css_string(constants));
        }
    }

    if let Some(Value::Outline(outline)) = style.get_raw(OUTLINE) {
        let line = outline.view_line(constants);
        if line.style != enums::NONE_LINE {
            builder.add("outline", &line.css_string(constants));
        }
    }

    if let Some(z_index) = style.int(Z_INDEX, constants) {
        builder.add("z-index", &z_index.to_string());
    }
    if let Some(opacity) = style.float(OPACITY, constants) {
        if (0.0..=1.0).contains(&opacity) {
            builder.add("opacity", &fmt_number(opacity));
        }
    }
    if let Some(count) = style.int(COLUMN_COUNT, constants) {
        if count > 0 {
            builder.add("column-count", &count.to_string());
        }
    }

    match style.enum_index(VISIBILITY, constants) {
        Some(enums::INVISIBLE) => builder.add("visibility", "hidden"),
        Some(enums::GONE) => builder.add("display", "none"),
        _ => {}
    }
}

fn text(style: &dyn PropertyContainer, builder: &mut dyn CssBuilder, constants: &dyn Constants) {
    if let Some(font) = style.text(FONT_NAME, constants) {
        if !font.is_empty() {
            builder.add("font-family", &font);
        }
    }

    for (tag, key, values) in ENUM_PROPERTIES {
        if let Some(value) = style
            .enum_index(tag, constants)
            .and_then(|index| values.get(index))
            .filter(|value| !value.is_empty())
        {
            builder.add(key, value);
        }
    }

    if let Some(weight) = style.enum_index(TEXT_WEIGHT, constants) {
        if weight > 0 && weight < enums::TEXT_WEIGHT.len() {
            builder.add("font-weight", &(weight * 100).to_string());
        }
    }

    let vertical = style
        .enum_index(WRITING_MODE, constants)
        .is_some_and(|mode| mode >= enums::VERTICAL_WRITING_MIN);
    if vertical {
        if let Some(orientation) = style
            .enum_index(VERTICAL_TEXT_ORIENTATION, constants)
            .and_then(|index| enums::VERTICAL_TEXT_ORIENTATION.get(index))
        {
            builder.add("text-orientation", orientation);
        }
    }

    if let Some(italic) = style.bool_value(ITALIC, constants) {
        builder.add("font-style", if italic { "italic" } else { "normal" });
    }
    if let Some(small_caps) = style.bool_value(SMALL_CAPS, constants) {
        builder.add("font-variant", if small_caps { "small-caps" } else { "normal" });
    }

    let mut any_set = false;
    let mut decorations = Vec::new();
    for (tag, css) in [
        (STRIKETHROUGH, "line-through"),
        (OVERLINE, "overline"),
        (UNDERLINE, "underline"),
    ] {
        if let Some(on) = style.bool_value(tag, constants) {
            any_set = true;
            if on {
                decorations.push(css);
            }
        }
    }
    if !decorations.is_empty() {
        builder.add("text-decoration", &decorations.join(" "));
    } else if any_set {
        builder.add("text-decoration", "none");
    }
}

/// CSS value for one alignment along a flex axis.
///
/// `main` is true for the axis of the flex direction. A reversed direction
/// flips start and end on the main axis, `wrap-reverse` flips them on the
/// cross axis; `stretch` spreads items on the main axis.
pub(crate) fn flex_alignment(align: usize, main: bool, wrap_reverse: bool, reversed: bool) -> &'static str {
    let flip = if main { reversed } else { wrap_reverse };
    match align {
        enums::ALIGN_START if flip => "flex-end",
        enums::ALIGN_START => "flex-start",
        enums::ALIGN_END if flip => "flex-start",
        enums::ALIGN_END => "flex-end",
        enums::ALIGN_CENTER => "center",
        _ if main => "space-between",
        _ => "stretch",
    }
}

fn flex(style: &dyn PropertyContainer, builder: &mut dyn CssBuilder, constants: &dyn Constants) {
    let orientation = style.enum_index(ORIENTATION, constants);
    let wrap = style.enum_index(LIST_WRAP, constants);
    let horizontal = style.enum_index(HORIZONTAL_ALIGN, constants);
    let vertical = style.enum_index(VERTICAL_ALIGN, constants);
    if orientation.is_none() && wrap.is_none() && horizontal.is_none() && vertical.is_none() {
        return;
    }

    let orientation = orientation.unwrap_or(enums::TOP_DOWN);
    let wrap = wrap.unwrap_or(enums::WRAP_OFF);
    let row = matches!(orientation, enums::START_TO_END | enums::END_TO_START);
    let reversed = matches!(orientation, enums::BOTTOM_UP | enums::END_TO_START);

    let direction = match orientation {
        enums::START_TO_END => "row",
        enums::END_TO_START => "row-reverse",
        enums::BOTTOM_UP => "column-reverse",
        _ => "column",
    };
    let flow = match wrap {
        enums::WRAP_ON => format!("{direction} wrap"),
        enums::WRAP_REVERSE => format!("{direction} wrap-reverse"),
        _ => direction.to_owned(),
    };
    builder.add("flex-flow", &flow);

    let wrap_reverse = wrap == enums::WRAP_REVERSE;
    let horizontal = horizontal.unwrap_or(enums::ALIGN_START);
    let vertical = vertical.unwrap_or(enums::ALIGN_START);
    let (main, cross) = if row {
        (horizontal, vertical)
    } else {
        (vertical, horizontal)
    };
    builder.add("justify-content", flex_alignment(main, true, wrap_reverse, reversed));
    let cross = flex_alignment(cross, false, wrap_reverse, reversed);
    builder.add("align-items", cross);
    if wrap != enums::WRAP_OFF {
        builder.add("align-content", cross);
    }
}

fn grid_template(sizes: &[SizeValue], constants: &dyn Constants) -> Option<String> {
    match sizes {
        [] => None,
        [single] if single.is_auto() => None,
        [single] => Some(format!("repeat(auto-fill, {})", single.css_string("auto", constants))),
        [first, rest @ ..] if !first.is_auto() && rest.iter().all(|size| size == first) => Some(
            format!("repeat({}, {})", sizes.len(), first.css_string("auto", constants)),
        ),
        _ => Some(
            sizes
                .iter()
                .map(|size| size.css_string("auto", constants))
                .collect::<Vec<_>>()
                .join(" "),
        ),
    }
}

fn grid(style: &dyn PropertyContainer, builder: &mut dyn CssBuilder, constants: &dyn Constants) {
    for (tag, start, end) in [
        (ROW, "grid-row-start", "grid-row-end"),
        (COLUMN, "grid-column-start", "grid-column-end"),
    ] {
        if let Some(range) = style.range(tag, constants) {
            builder.add(start, &(range.first + 1).to_string());
            builder.add(end, &(range.last + 2).to_string());
        }
    }

    for (tag, key) in [
        (CELL_WIDTH, "grid-template-columns"),
        (CELL_HEIGHT, "grid-template-rows"),
    ] {
        if let Some(Value::List(items)) = style.get_raw(tag) {
            let sizes: Vec<SizeValue> = items
                .iter()
                .map(|item| item.size_value(constants).unwrap_or_default())
                .collect();
            if let Some(css) = grid_template(&sizes, constants) {
                builder.add(key, &css);
            }
        }
    }
}

fn origin(
    style: &dyn PropertyContainer,
    tags: &[&str],
    constants: &dyn Constants,
) -> Option<String> {
    let sizes: Vec<SizeValue> = tags
        .iter()
        .map(|tag| style.size(tag, constants).unwrap_or_default())
        .collect();
    if sizes.iter().all(SizeValue::is_auto) {
        return None;
    }
    let mut parts: Vec<String> = sizes[..2]
        .iter()
        .map(|size| size.css_string("50%", constants))
        .collect();
    if let Some(z) = sizes.get(2).filter(|z| !z.is_auto()) {
        parts.push(z.css_string("0", constants));
    }
    Some(parts.join(" "))
}

fn transform(style: &dyn PropertyContainer, builder: &mut dyn CssBuilder, constants: &dyn Constants) {
    if has_perspective(style, constants) {
        if let Some(size) = style.size(PERSPECTIVE, constants) {
            builder.add("perspective", &size.css_string("0", constants));
        }
        if let Some(css) = origin(style, &[PERSPECTIVE_ORIGIN_X, PERSPECTIVE_ORIGIN_Y], constants) {
            builder.add("perspective-origin", &css);
        }
    }
    if let Some(visible) = style.bool_value(BACKFACE_VISIBLE, constants) {
        builder.add("backface-visibility", if visible { "visible" } else { "hidden" });
    }
    if let Some(css) = origin(
        style,
        &[TRANSFORM_ORIGIN_X, TRANSFORM_ORIGIN_Y, TRANSFORM_ORIGIN_Z],
        constants,
    ) {
        builder.add("transform-origin", &css);
    }
    if let Some(css) = transform_css(style, constants) {
        builder.add("transform", &css);
    }
}

/// CSS property animated by a transition on view tag `tag`.
pub fn css_property_name(tag: &str) -> String {
    let tag = VIEW_SCHEMA
        .canonical(tag)
        .map(str::to_owned)
        .unwrap_or_else(|| tag.to_ascii_lowercase());
    let mapped = SIZE_PROPERTIES
        .iter()
        .chain(COLOR_PROPERTIES)
        .find(|(from, _)| *from == tag)
        .map(|(_, css)| *css);
    if let Some(css) = mapped {
        return css.to_owned();
    }
    match tag.as_str() {
        FONT_NAME => "font-family",
        RADIUS => "border-radius",
        SHADOW => "box-shadow",
        TRANSLATE_X | TRANSLATE_Y | TRANSLATE_Z | SCALE_X | SCALE_Y | SCALE_Z | ROTATE
        | ROTATE_X | ROTATE_Y | ROTATE_Z | SKEW_X | SKEW_Y => "transform",
        CLIP => "clip-path",
        _ => return tag,
    }
    .to_owned()
}

fn animation(style: &dyn PropertyContainer, builder: &mut dyn CssBuilder, constants: &dyn Constants) {
    if let Some(Value::Transitions(transitions)) = style.get_raw(TRANSITIONS) {
        let items: Vec<String> = transitions
            .iter()
            .map(|(tag, animation)| animation.transition_css(&css_property_name(tag), constants))
            .collect();
        builder.add_values("transition", ", ", &items);
    }

    if let Some(Value::Animations(animations)) = style.get_raw(ANIMATION) {
        let items: Vec<String> = animations
            .iter()
            .filter(|animation| !animation.animated_properties().is_empty())
            .map(|animation| animation.animation_css(constants))
            .collect();
        builder.add_values("animation", ", ", &items);
    }
    if let Some(paused) = style.bool_value(ANIMATION_PAUSED, constants) {
        builder.add("animation-play-state", if paused { "paused" } else { "running" });
    }
}

// ---------------------------------------------------------------------------
// Keyframes
// ---------------------------------------------------------------------------

/// Write the `@keyframes` block of `animation`.
pub fn write_keyframes(builder: &mut CssStyleBuilder, animation: &Animation, constants: &dyn Constants) {
    builder.start_keyframes(animation.id());
    for (percent, entries) in animation.frames() {
        let mut frame = PropertyObject::new(&VIEW_SCHEMA);
        for (tag, value) in entries {
            frame.set_value(tag, Some(value.clone()));
        }
        builder.start_frame(percent);
        css_view_style(&frame, builder, constants);
        builder.end_block();
    }
    builder.end_block();
}
