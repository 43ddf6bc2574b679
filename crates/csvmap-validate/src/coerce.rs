//! Type coercion of present cell values.

use chrono::NaiveDate;
use csvmap_ingest::{parse_bool, parse_date, parse_f64, parse_i64};
use csvmap_model::TypeTag;

/// A cell value after coercion to its field's [`TypeTag`].
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    String(String),
    Integer(i64),
    Number(f64),
    Boolean(bool),
    Date(NaiveDate),
}

/// Returns `None` when `raw` cannot be read as `type_tag`.
///
/// Strings pass through unchanged. Integers must fit `i64` without a
/// fractional part; numbers must be finite.
pub fn coerce(raw: &str, type_tag: TypeTag) -> Option<TypedValue> {
    match type_tag {
        TypeTag::String => Some(TypedValue::String(raw.to_string())),
        TypeTag::Integer => parse_i64(raw).map(TypedValue::Integer),
        TypeTag::Number => parse_f64(raw).map(TypedValue::Number),
        TypeTag::Boolean => parse_bool(raw).map(TypedValue::Boolean),
        TypeTag::Date => parse_date(raw).map(TypedValue::Date),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coerces_each_type() {
        assert_eq!(
            coerce(" x ", TypeTag::String),
            Some(TypedValue::String(" x ".to_string()))
        );
        assert_eq!(coerce("42", TypeTag::Integer), Some(TypedValue::Integer(42)));
        assert_eq!(coerce("4.5", TypeTag::Integer), None);
        assert_eq!(coerce("4.5", TypeTag::Number), Some(TypedValue::Number(4.5)));
        assert_eq!(coerce("inf", TypeTag::Number), None);
        assert_eq!(coerce("Y", TypeTag::Boolean), Some(TypedValue::Boolean(true)));
        assert_eq!(coerce("maybe", TypeTag::Boolean), None);
        assert_eq!(
            coerce("2024-01-15", TypeTag::Date),
            NaiveDate::from_ymd_opt(2024, 1, 15).map(TypedValue::Date)
        );
        assert_eq!(coerce("not a date", TypeTag::Date), None);
    }
}
