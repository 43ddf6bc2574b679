//! Matching strategies.

use csvmap_model::{ColumnName, SchemaField};
use rapidfuzz::distance::indel;

/// Minimum similarity a fuzzy candidate needs. The bound is inclusive.
pub const FUZZY_THRESHOLD: f64 = 0.6;

/// A source column as handed to a [`Matcher`].
#[derive(Debug, Clone, Copy)]
pub struct ColumnSample<'a> {
    pub name: &'a ColumnName,
    /// Present values from the first rows; empty when only names are known.
    pub values: &'a [&'a str],
    /// The classifier made the name up, so it says nothing about the content.
    pub synthesized: bool,
}

impl<'a> ColumnSample<'a> {
    /// A column known by name only.
    pub fn named(name: &'a ColumnName) -> Self {
        Self {
            name,
            values: &[],
            synthesized: false,
        }
    }
}

/// One way of pairing a schema field with a source column.
///
/// A matcher scores a single (field, column) pair; [`crate::MappingEngine`]
/// asks each matcher in turn and keeps the first one that clears its own
/// [`Matcher::threshold`].
pub trait Matcher: Send + Sync {
    /// Label reported alongside suggestions, e.g. `"exact"`.
    fn name(&self) -> &'static str;

    /// `None` means the pair is not a candidate at all.
    fn score(&self, field: &SchemaField, column: &str) -> Option<f64>;

    /// Scores a column together with its sampled values.
    ///
    /// The default scores the name and skips synthesized names.
    fn score_sample(&self, field: &SchemaField, column: &ColumnSample<'_>) -> Option<f64> {
        if column.synthesized {
            return None;
        }
        self.score(field, column.name.as_str())
    }

    fn threshold(&self) -> f64;
}

/// Case-insensitive equality of field name and column name.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactMatcher;

impl Matcher for ExactMatcher {
    fn name(&self) -> &'static str {
        "exact"
    }

    fn score(&self, field: &SchemaField, column: &str) -> Option<f64> {
        field
            .name
            .trim()
            .eq_ignore_ascii_case(column.trim())
            .then_some(1.0)
    }

    fn threshold(&self) -> f64 {
        1.0
    }
}

/// Case-insensitive equality of any declared alias and column name.
#[derive(Debug, Clone, Copy, Default)]
pub struct AliasMatcher;

impl Matcher for AliasMatcher {
    fn name(&self) -> &'static str {
        "alias"
    }

    fn score(&self, field: &SchemaField, column: &str) -> Option<f64> {
        let column = column.trim();
        field
            .aliases
            .iter()
            .any(|alias| alias.trim().eq_ignore_ascii_case(column))
            .then_some(1.0)
    }

    fn threshold(&self) -> f64 {
        1.0
    }
}

/// Normalized Indel similarity against the field name and each alias.
#[derive(Debug, Clone, Copy)]
pub struct FuzzyMatcher {
    threshold: f64,
}

impl FuzzyMatcher {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }
}

impl Default for FuzzyMatcher {
    fn default() -> Self {
        Self::new(FUZZY_THRESHOLD)
    }
}

impl Matcher for FuzzyMatcher {
    fn name(&self) -> &'static str {
        "fuzzy"
    }

    fn score(&self, field: &SchemaField, column: &str) -> Option<f64> {
        std::iter::once(field.name.as_str())
            .chain(field.aliases.iter().map(String::as_str))
            .map(|candidate| similarity(candidate, column))
            .reduce(f64::max)
    }

    fn threshold(&self) -> f64 {
        self.threshold
    }
}

/// Lowercases and removes `_`, `-`, `.` and whitespace.
pub fn normalize_for_similarity(raw: &str) -> String {
    raw.chars()
        .filter(|ch| !matches!(ch, '_' | '-' | '.') && !ch.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// `(len_a + len_b - indel) / (len_a + len_b)` over normalized strings, in `[0, 1]`.
///
/// Two strings that normalize to nothing score 0.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = normalize_for_similarity(a);
    let b = normalize_for_similarity(b);
    let total = a.chars().count() + b.chars().count();
    if total == 0 {
        return 0.0;
    }
    let distance = indel::distance(a.chars(), b.chars());
    (total - distance) as f64 / total as f64
}

#[cfg(test)]
mod tests {
    use csvmap_model::TypeTag;

    use super::*;

    #[test]
    fn normalization_strips_separators() {
        assert_eq!(normalize_for_similarity(" First_Name.x-Y "), "firstnamexy");
    }

    #[test]
    fn similarity_bounds() {
        assert_eq!(similarity("first_name", "FirstName"), 1.0);
        assert_eq!(similarity("", "__"), 0.0);
        assert_eq!(similarity("abc", "xyz"), 0.0);
        assert!((similarity("abcxy", "abcpq") - 0.6).abs() < 1e-12);
    }

    #[test]
    fn fuzzy_uses_best_of_name_and_aliases() {
        let field = SchemaField::new("phone", TypeTag::String).with_aliases(["telephone"]);
        let by_alias = FuzzyMatcher::default()
            .score(&field, "telephon")
            .expect("score");
        assert!(by_alias > similarity("phone", "telephon"));
    }

    #[test]
    fn synthesized_names_are_not_name_matched() {
        let field = SchemaField::new("column_0", TypeTag::String);
        let name = ColumnName::synthesized(0);
        let mut sample = ColumnSample::named(&name);
        assert_eq!(ExactMatcher.score_sample(&field, &sample), Some(1.0));
        sample.synthesized = true;
        assert_eq!(ExactMatcher.score_sample(&field, &sample), None);
        assert_eq!(FuzzyMatcher::default().score_sample(&field, &sample), None);
    }

    #[test]
    fn exact_and_alias_ignore_case() {
        let field = SchemaField::new("email", TypeTag::String).with_aliases(["mail"]);
        assert_eq!(ExactMatcher.score(&field, "EMAIL"), Some(1.0));
        assert_eq!(ExactMatcher.score(&field, "mail"), None);
        assert_eq!(AliasMatcher.score(&field, "Mail"), Some(1.0));
        assert_eq!(AliasMatcher.score(&field, "email"), None);
    }
}
