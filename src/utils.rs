//! Name canonicalization and wildcard-label helpers shared by the loader,
//! the zone index and the resolver.

/// Lowercases a name and ensures it ends with exactly one trailing dot.
pub fn canonicalize(name: &str) -> String {
    let lower = name.trim().to_ascii_lowercase();
    let trimmed = lower.trim_end_matches('.');
    format!("{trimmed}.")
}

/// Splits a canonical (or near-canonical) name into its labels, dropping the
/// empty label produced by the trailing dot.
pub fn labels(name: &str) -> Vec<&str> {
    name.trim_end_matches('.')
        .split('.')
        .filter(|label| !label.is_empty())
        .collect()
}

/// Builds the single-level wildcard key `*.<all-but-first-label>.` for a
/// canonical query name, or `None` if the name has fewer than two labels.
pub fn wildcard_key(canonical_query: &str) -> Option<String> {
    let mut parts = labels(canonical_query);
    if parts.len() < 2 {
        return None;
    }
    parts.remove(0);
    Some(format!("*.{}.", parts.join(".")))
}

/// True when `name`'s leftmost label is the literal wildcard `*`.
pub fn has_leading_wildcard_label(name: &str) -> bool {
    labels(name).first() == Some(&"*")
}

/// Substitutes a wildcard target's leading `*` label with `first_label` and
/// recanonicalizes the result. Targets without a leading `*` are returned
/// unchanged.
pub fn substitute_wildcard_target(target: &str, first_label: &str) -> String {
    if !has_leading_wildcard_label(target) {
        return target.to_string();
    }
    let mut parts = labels(target);
    parts[0] = first_label;
    canonicalize(&parts.join("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonicalize_lowercases_and_adds_dot() {
        assert_eq!(canonicalize("Example.COM"), "example.com.");
        assert_eq!(canonicalize("example.com."), "example.com.");
    }

    #[test]
    fn labels_drop_trailing_empty() {
        assert_eq!(labels("a.b.example."), vec!["a", "b", "example"]);
    }

    #[test]
    fn wildcard_key_is_single_level() {
        assert_eq!(
            wildcard_key("a.b.example."),
            Some("*.b.example.".to_string())
        );
        assert_eq!(wildcard_key("example."), None);
    }

    #[test]
    fn substitute_wildcard_replaces_leading_label_only() {
        assert_eq!(
            substitute_wildcard_target("*.example.com.", "anything"),
            "anything.example.com."
        );
        assert_eq!(
            substitute_wildcard_target("static.example.com.", "anything"),
            "static.example.com."
        );
    }
}
