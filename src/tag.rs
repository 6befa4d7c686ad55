//! Resolution of a field's public key under an annotation key.
//!
//! An annotation value such as `"label,omitempty"` contributes only its first
//! comma separated segment (`"label"`); the rest is modifier metadata.

use crate::record::FieldDescriptor;

/// The first comma delimited segment of an annotation value.
pub fn tag_head(annotation: &str) -> &str {
    match annotation.split_once(',') {
        Some((head, _)) => head,
        None => annotation,
    }
}

impl FieldDescriptor {
    /// Raw annotation value stored under `key`.
    pub fn annotation(&self, key: &str) -> Option<&'static str> {
        self.tags
            .iter()
            .find(|(tag, _)| *tag == key)
            .map(|(_, value)| *value)
    }
    /// The key this field is published under, or `None` when the field is
    /// not eligible for `key`. An empty key selects the bare field name.
    pub fn resolve(&self, key: &str) -> Option<&'static str> {
        if key.is_empty() {
            Some(self.name)
        } else {
            self.annotation(key).map(tag_head)
        }
    }
    /// Like [`resolve`](Self::resolve) but falls back to the first of
    /// `fallbacks` the field carries. Also returns the annotation key that
    /// won, which is the one nested values must be resolved under.
    pub fn resolve_with_fallback<'k>(
        &self,
        key: &'k str,
        fallbacks: &[&'k str],
    ) -> Option<(&'static str, &'k str)> {
        if let Some(resolved) = self.resolve(key) {
            return Some((resolved, key));
        }
        fallbacks
            .iter()
            .find_map(|fallback| self.resolve(fallback).map(|resolved| (resolved, *fallback)))
    }
}

/// Index of the field that publishes `key` under annotation `tag`.
pub fn locate(descriptors: &[FieldDescriptor], key: &str, tag: &str) -> Option<usize> {
    descriptors
        .iter()
        .position(|descriptor| descriptor.resolve(tag) == Some(key))
}

#[cfg(test)]
mod tests {
    use super::*;

    const LABEL: FieldDescriptor =
        FieldDescriptor::new("label", &[("json", "label,omitempty"), ("api", "the_label")], true);
    const PLAIN: FieldDescriptor = FieldDescriptor::new("plain", &[], true);

    #[test]
    fn head_strips_modifiers() {
        assert_eq!(tag_head("name,omitempty,string"), "name");
        assert_eq!(tag_head("name"), "name");
        assert_eq!(tag_head(""), "");
    }

    #[test]
    fn empty_key_uses_field_name() {
        assert_eq!(LABEL.resolve(""), Some("label"));
        assert_eq!(PLAIN.resolve(""), Some("plain"));
    }

    #[test]
    fn missing_annotation_is_ineligible() {
        assert_eq!(PLAIN.resolve("json"), None);
        assert_eq!(LABEL.resolve("db"), None);
        assert_eq!(LABEL.resolve("json"), Some("label"));
    }

    #[test]
    fn fallback_reports_winning_key() {
        assert_eq!(LABEL.resolve_with_fallback("api", &["json"]), Some(("the_label", "api")));
        assert_eq!(LABEL.resolve_with_fallback("db", &["xml", "json"]), Some(("label", "json")));
        assert_eq!(PLAIN.resolve_with_fallback("db", &["json"]), None);
    }

    #[test]
    fn locate_by_tag_and_by_name() {
        let descriptors = [PLAIN, LABEL];
        assert_eq!(locate(&descriptors, "the_label", "api"), Some(1));
        assert_eq!(locate(&descriptors, "plain", ""), Some(0));
        assert_eq!(locate(&descriptors, "plain", "json"), None);
    }
}
