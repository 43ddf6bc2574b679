//! Matching on what a column holds rather than what it is called.
//!
//! Only fields that declare a [`ContentHint`] take part, and only when the
//! engine was given sampled values, which is what makes header-less files
//! (`Column_0 .. Column_{k-1}`) mappable at all.

use std::collections::HashSet;

use csvmap_ingest::{looks_like_email, looks_like_phone, parse_date, parse_f64};
use csvmap_model::{ContentHint, ContentRule, SchemaField};

use crate::matcher::{ColumnSample, FUZZY_THRESHOLD, Matcher};

/// Rows sampled per column when suggesting from a table.
pub const CONTENT_SAMPLE_ROWS: usize = 100;

/// Share of present values that must fit a hint.
pub const CONTENT_MATCH_RATIO: f64 = 0.8;

const EMAIL_SCORE: f64 = 0.95;
const PHONE_SCORE: f64 = 0.90;
const HINT_SCORE: f64 = 0.85;

/// Identifier columns of plain numbers up to this value read as ages.
const SMALL_NUMBER_MAX: f64 = 150.0;
const IDENTIFIER_UNIQUE_RATIO: f64 = 0.9;

/// Scores columns by their sampled values against the field's [`ContentHint`].
#[derive(Debug, Clone, Copy)]
pub struct ContentMatcher {
    threshold: f64,
}

impl ContentMatcher {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }
}

impl Default for ContentMatcher {
    fn default() -> Self {
        Self::new(FUZZY_THRESHOLD)
    }
}

impl Matcher for ContentMatcher {
    fn name(&self) -> &'static str {
        "content"
    }

    fn score(&self, _field: &SchemaField, _column: &str) -> Option<f64> {
        None
    }

    fn score_sample(&self, field: &SchemaField, column: &ColumnSample<'_>) -> Option<f64> {
        let hint = field.content?;
        if column.values.is_empty() {
            return None;
        }
        content_score(field, hint, column.values)
    }

    fn threshold(&self) -> f64 {
        self.threshold
    }
}

/// Score of `values` for a field with `hint`, or `None` when they do not fit.
///
/// Date-like columns are never phones or identifiers, and small numbers
/// are never identifiers.
pub fn content_score(field: &SchemaField, hint: ContentHint, values: &[&str]) -> Option<f64> {
    match hint {
        ContentHint::Email => fits(values, looks_like_email).then_some(EMAIL_SCORE),
        ContentHint::Phone => {
            (!is_date_like(values) && fits(values, looks_like_phone)).then_some(PHONE_SCORE)
        }
        ContentHint::Date => is_date_like(values).then_some(HINT_SCORE),
        ContentHint::Identifier => {
            let conflicting = is_date_like(values) || is_small_number_like(values);
            (!conflicting && is_identifier_like(values)).then_some(HINT_SCORE)
        }
        ContentHint::MatchesRule => {
            let rule = field.rule.as_ref()?;
            fits_rule(rule, values)?.then_some(HINT_SCORE)
        }
    }
}

fn share(values: &[&str], predicate: impl Fn(&str) -> bool) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let hits = values.iter().filter(|value| predicate(**value)).count();
    hits as f64 / values.len() as f64
}

fn fits(values: &[&str], predicate: impl Fn(&str) -> bool) -> bool {
    share(values, predicate) > CONTENT_MATCH_RATIO
}

fn is_date_like(values: &[&str]) -> bool {
    fits(values, |value| parse_date(value).is_some())
}

fn is_small_number_like(values: &[&str]) -> bool {
    fits(values, |value| {
        parse_f64(value).is_some_and(|number| (0.0..=SMALL_NUMBER_MAX).contains(&number))
    })
}

/// Mostly unique single tokens of ASCII letters, digits, `-` and `_`.
fn is_identifier_like(values: &[&str]) -> bool {
    let distinct: HashSet<&str> = values.iter().copied().collect();
    let unique_ratio = distinct.len() as f64 / values.len() as f64;
    unique_ratio > IDENTIFIER_UNIQUE_RATIO
        && fits(values, |value| {
            value
                .chars()
                .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_'))
        })
}

/// `None` for rules that every present value satisfies anyway.
fn fits_rule(rule: &ContentRule, values: &[&str]) -> Option<bool> {
    match rule {
        ContentRule::IntegerRange { min, max, .. } => {
            let range = (*min as f64)..=(*max as f64);
            Some(fits(values, |value| {
                parse_f64(value).is_some_and(|number| range.contains(&number))
            }))
        }
        ContentRule::OneOf {
            values: allowed,
            case_insensitive,
            ..
        } => {
            let matches = |value: &str| {
                allowed.iter().any(|candidate| {
                    if *case_insensitive {
                        candidate.eq_ignore_ascii_case(value)
                    } else {
                        candidate == value
                    }
                })
            };
            Some(share(values, matches) >= CONTENT_MATCH_RATIO)
        }
        ContentRule::Pattern { pattern, .. } => {
            Some(fits(values, |value| pattern.is_match(value)))
        }
        ContentRule::Contains { .. } | ContentRule::NotBlank { .. } => None,
    }
}

#[cfg(test)]
mod tests {
    use csvmap_model::{ColumnName, TypeTag};

    use super::*;

    #[test]
    fn email_needs_more_than_eighty_percent() {
        let field = SchemaField::new("email", TypeTag::String);
        let mostly = ["a@b.io", "c@d.io", "e@f.io", "g@h.io", "i@j.io", "nope"];
        assert_eq!(
            content_score(&field, ContentHint::Email, &mostly),
            Some(EMAIL_SCORE)
        );
        let four_of_five = ["a@b.io", "c@d.io", "e@f.io", "g@h.io", "nope"];
        assert_eq!(content_score(&field, ContentHint::Email, &four_of_five), None);
    }

    #[test]
    fn dates_are_neither_phones_nor_identifiers() {
        let field = SchemaField::new("x", TypeTag::String);
        let dates = ["2024-01-15", "2024-02-01", "2024-03-10"];
        assert_eq!(content_score(&field, ContentHint::Phone, &dates), None);
        assert_eq!(content_score(&field, ContentHint::Identifier, &dates), None);
        assert_eq!(
            content_score(&field, ContentHint::Date, &dates),
            Some(HINT_SCORE)
        );
    }

    #[test]
    fn identifiers_are_unique_tokens_but_not_ages() {
        let field = SchemaField::new("user_id", TypeTag::String);
        assert_eq!(
            content_score(&field, ContentHint::Identifier, &["USR001", "USR002", "USR003"]),
            Some(HINT_SCORE)
        );
        assert_eq!(
            content_score(&field, ContentHint::Identifier, &["12", "40", "77"]),
            None
        );
        assert_eq!(
            content_score(&field, ContentHint::Identifier, &["A1", "A1", "A1"]),
            None
        );
        assert_eq!(
            content_score(&field, ContentHint::Identifier, &["a b", "c d", "e f"]),
            None
        );
    }

    #[test]
    fn rule_hint_uses_the_field_rule() {
        let status = SchemaField::new("status", TypeTag::String).with_rule(ContentRule::OneOf {
            values: vec!["active".to_string(), "pending".to_string()],
            case_insensitive: true,
            message: "bad status".to_string(),
        });
        let statuses = ["Active", "pending", "ACTIVE", "pending", "gone"];
        assert_eq!(
            content_score(&status, ContentHint::MatchesRule, &statuses),
            Some(HINT_SCORE)
        );

        let age = SchemaField::new("age", TypeTag::Integer).with_rule(ContentRule::IntegerRange {
            min: 0,
            max: 150,
            message: "bad age".to_string(),
        });
        assert_eq!(
            content_score(&age, ContentHint::MatchesRule, &["30", "41", "7"]),
            Some(HINT_SCORE)
        );
        assert_eq!(
            content_score(&age, ContentHint::MatchesRule, &["300", "410", "7"]),
            None
        );

        let unruled = SchemaField::new("note", TypeTag::String);
        assert_eq!(
            content_score(&unruled, ContentHint::MatchesRule, &["x"]),
            None
        );
    }

    #[test]
    fn names_alone_never_score() {
        let field = SchemaField::new("email", TypeTag::String).with_content(ContentHint::Email);
        let matcher = ContentMatcher::default();
        assert_eq!(matcher.score(&field, "email"), None);
        let name = ColumnName::synthesized(1);
        assert_eq!(
            matcher.score_sample(&field, &ColumnSample::named(&name)),
            None
        );
    }
}
