//! Evaluation of [`ContentRule`]s.

use csvmap_ingest::parse_i64;
use csvmap_model::ContentRule;

use crate::coerce::TypedValue;

/// True when the value satisfies `rule`.
///
/// Text-oriented rules look at the raw cell text; the integer range looks
/// at the coerced value and falls back to reading the text as an integer.
pub fn passes(rule: &ContentRule, raw: &str, value: &TypedValue) -> bool {
    match rule {
        ContentRule::Contains { needle, .. } => raw.contains(needle.as_str()),
        ContentRule::IntegerRange { min, max, .. } => match value {
            TypedValue::Integer(number) => (*min..=*max).contains(number),
            TypedValue::Number(number) => {
                number.fract() == 0.0 && *number >= *min as f64 && *number <= *max as f64
            }
            _ => parse_i64(raw).is_some_and(|number| (*min..=*max).contains(&number)),
        },
        ContentRule::OneOf {
            values,
            case_insensitive,
            ..
        } => {
            let candidate = raw.trim();
            values.iter().any(|allowed| {
                if *case_insensitive {
                    allowed.eq_ignore_ascii_case(candidate)
                } else {
                    allowed == candidate
                }
            })
        }
        ContentRule::Pattern { pattern, .. } => pattern.is_match(raw),
        ContentRule::NotBlank { .. } => !raw.trim().is_empty(),
    }
}

/// The rule's message when `raw` fails it.
pub fn evaluate<'r>(rule: &'r ContentRule, raw: &str, value: &TypedValue) -> Option<&'r str> {
    (!passes(rule, raw, value)).then(|| rule.message())
}
