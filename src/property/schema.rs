//! Property registries: canonical tags, aliases, and sub-property routes.

use std::collections::HashMap;

use super::Kind;

/// The set of properties a container recognises.
///
/// Built once per container type and kept in a `Lazy` static.
#[derive(Debug)]
pub struct Schema {
    name: &'static str,
    kinds: HashMap<&'static str, Kind>,
    aliases: HashMap<&'static str, &'static str>,
    /// `(prefix, parent)`: `prefix-sub` is routed to `sub` inside `parent`.
    routes: Vec<(&'static str, &'static str)>,
}

impl Schema {
    pub fn new(name: &'static str, kinds: &[(&'static str, Kind)]) -> Self {
        Self {
            name,
            kinds: kinds.iter().copied().collect(),
            aliases: HashMap::new(),
            routes: Vec::new(),
        }
    }

    pub fn with_aliases(mut self, aliases: &[(&'static str, &'static str)]) -> Self {
        self.aliases.extend(aliases.iter().copied());
        self
    }

    pub fn with_routes(mut self, routes: &[(&'static str, &'static str)]) -> Self {
        self.routes.extend(routes.iter().copied());
        // Longer prefixes first so `column-separator-` wins over `column-`.
        self.routes.sort_by_key(|(prefix, _)| std::cmp::Reverse(prefix.len()));
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Canonical tag for `tag` (lowercased, aliases folded), if recognised.
    pub fn canonical(&self, tag: &str) -> Option<&'static str> {
        let lower = tag.trim().to_ascii_lowercase();
        let lower = self.aliases.get(lower.as_str()).copied().map(str::to_owned).unwrap_or(lower);
        self.kinds.get_key_value(lower.as_str()).map(|(key, _)| *key)
    }

    pub fn kind(&self, canonical: &str) -> Option<Kind> {
        self.kinds.get(canonical).copied()
    }

    /// Split a compound tag into `(parent, sub)`, e.g. `margin-top` → `(margin, top)`.
    pub fn route(&self, tag: &str) -> Option<(&'static str, String)> {
        let lower = tag.trim().to_ascii_lowercase();
        let lower = self.aliases.get(lower.as_str()).copied().map(str::to_owned).unwrap_or(lower);
        self.routes.iter().find_map(|(prefix, parent)| {
            lower
                .strip_prefix(prefix)
                .and_then(|rest| rest.strip_prefix('-'))
                .filter(|sub| !sub.is_empty())
                .map(|sub| (*parent, sub.to_owned()))
        })
    }

    pub fn tags(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.kinds.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> Schema {
        Schema::new(
            "test",
            &[("margin", Kind::Bounds), ("width", Kind::Size), ("column-separator", Kind::ColumnSeparator)],
        )
        .with_aliases(&[("w", "width"), ("top-margin", "margin-top")])
        .with_routes(&[("margin", "margin"), ("column-separator", "column-separator")])
    }

    #[test]
    fn canonical_folds_case_and_aliases() {
        let schema = schema();
        assert_eq!(schema.canonical("Width"), Some("width"));
        assert_eq!(schema.canonical("w"), Some("width"));
        assert_eq!(schema.canonical("height"), None);
    }

    #[test]
    fn routes_split_compound_tags() {
        let schema = schema();
        assert_eq!(schema.route("margin-top"), Some(("margin", "top".to_owned())));
        assert_eq!(schema.route("top-margin"), Some(("margin", "top".to_owned())));
        assert_eq!(
            schema.route("column-separator-color"),
            Some(("column-separator", "color".to_owned()))
        );
        assert_eq!(schema.route("margin"), None);
        assert_eq!(schema.route("margin-"), None);
    }
}
