//! Theme stylesheets: base rules, `@media` overrides and `@keyframes`.

use crate::css::builder::CssStyleBuilder;
use crate::css::view_style::{css_view_style, write_keyframes};
use crate::property::{PropertyContainer, PropertyObject, Value};
use crate::style::Animation;
use crate::theme::{Constants, Theme};
use crate::view::schema::ANIMATION;

fn write_rules(builder: &mut CssStyleBuilder, rules: &[(String, PropertyObject)], constants: &dyn Constants) {
    for (name, style) in rules {
        builder.start_style(name);
        css_view_style(style, builder, constants);
        builder.end_block();
    }
}

/// Animations referenced by any rule of `theme`, in rule order.
pub fn theme_animations(theme: &Theme) -> Vec<&Animation> {
    let media_rules = theme.media_styles().iter().flat_map(|media| media.styles.iter());
    theme
        .styles()
        .iter()
        .chain(media_rules)
        .filter_map(|(_, style)| match style.get_raw(ANIMATION) {
            Some(Value::Animations(animations)) => Some(animations.iter()),
            _ => None,
        })
        .flatten()
        .collect()
}

/// The complete stylesheet of `theme`.
///
/// Media blocks are written widest first: the sorted order puts the
/// narrowest condition first, and a later block wins in the cascade.
pub fn theme_stylesheet(theme: &Theme, constants: &dyn Constants) -> String {
    let mut builder = CssStyleBuilder::new();
    write_rules(&mut builder, theme.styles(), constants);

    for media in theme.media_styles().iter().rev() {
        if media.styles.is_empty() {
            continue;
        }
        builder.start_media(&media.condition.css_prelude());
        write_rules(&mut builder, &media.styles, constants);
        builder.end_block();
    }

    for animation in theme_animations(theme) {
        write_keyframes(&mut builder, animation, constants);
    }
    builder.finish()
}

/// `@keyframes` blocks for `animations`, for the session's animation style element.
pub fn animations_stylesheet<'a>(
    animations: impl IntoIterator<Item = &'a Animation>,
    constants: &dyn Constants,
) -> String {
    let mut builder = CssStyleBuilder::new();
    for animation in animations {
        if !animation.animated_properties().is_empty() {
            write_keyframes(&mut builder, animation, constants);
        }
    }
    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::ThemeContext;
    use std::sync::Arc;

    const THEME: &str = r#"
        theme {
            colors = _ { accent = #FF2196F3 },
            styles = [
                ruiApp { text-color = "@accent" },
                ruiRoot { width = 100% },
                myCard { padding = 4px, radius = 8px },
            ],
            styles:width1200 = [ myCard { padding = 8px } ],
            styles:width600 = [ myCard { padding = 2px } ],
        }
    "#;

    #[test]
    fn theme_to_css() {
        let theme = Theme::parse(THEME).unwrap();
        let context = ThemeContext::new(Arc::new(theme.clone()));
        insta::assert_snapshot!(theme_stylesheet(&theme, &context).trim_end(), @r"
        body {
          color: rgb(33,150,243);
        }
        .myCard {
          padding: 4px;
          border-radius: 8px;
        }
        @media screen and (max-width: 1200px) {
          .myCard {
            padding: 8px;
          }
        }
        @media screen and (max-width: 600px) {
          .myCard {
            padding: 2px;
          }
        }
        ");
    }

    #[test]
    fn oriented_media_is_written_after_unoriented() {
        let theme = Theme::parse(
            r#"theme {
                styles:portrait:width800 = [ myCard { padding = 2px } ],
                styles:width800 = [ myCard { padding = 1px } ],
            }"#,
        )
        .unwrap();
        let css = theme_stylesheet(&theme, &());
        let unoriented = css.find("@media screen and (max-width: 800px)").unwrap();
        let oriented = css
            .find("@media screen and (orientation: portrait) and (max-width: 800px)")
            .unwrap();
        assert!(unoriented < oriented, "{css}");
    }

    #[test]
    fn keyframes_follow_rules() {
        let theme = Theme::parse(
            r#"theme { styles = [ blink { animation = "_{ id = blink, duration = 1, property = _{ tag = opacity, from = 0, to = 1 } }" } ] }"#,
        )
        .unwrap();
        assert_eq!(theme_animations(&theme).len(), 1);
        let css = theme_stylesheet(&theme, &());
        assert!(css.contains("@keyframes blink {"));
        assert!(css.contains("animation: blink 1s ease 0s 1 normal;"));
    }
}
