//! The built-in user-record schema.

use csvmap_model::{ContentHint, ContentRule, Pattern, SchemaField, SchemaRegistry, TypeTag};

use crate::error::StandardsError;

/// Accepts forms such as `+44 1234567890`, `+1-555-0123` and `123-456-7890`.
pub const PHONE_PATTERN: &str =
    r"^\+?\d{1,4}?[\s\-\.]?\(?\d{1,4}?\)?[\s\-\.]?\d{1,4}[\s\-\.]?\d{1,9}$";

pub const ALLOWED_STATUSES: [&str; 3] = ["active", "inactive", "pending"];

pub const AGE_MIN: i64 = 0;
pub const AGE_MAX: i64 = 150;

/// Target schema for user records: four required identity fields and five
/// optional profile fields.
pub fn builtin_user_schema() -> Result<SchemaRegistry, StandardsError> {
    let fields = vec![
        SchemaField::new("user_id", TypeTag::String)
            .required(true)
            .with_description("Unique user identifier")
            .with_aliases(["id", "userid", "user_identifier", "customer_id", "uid"])
            .with_content(ContentHint::Identifier),
        SchemaField::new("email", TypeTag::String)
            .required(true)
            .with_description("User email address")
            .with_aliases(["email_address", "mail", "e-mail", "contact_email"])
            .with_rule(ContentRule::Contains {
                needle: "@".to_string(),
                message: "invalid email format".to_string(),
            })
            .with_content(ContentHint::Email),
        SchemaField::new("first_name", TypeTag::String)
            .required(true)
            .with_description("User's first name")
            .with_aliases(["firstname", "fname", "given_name", "forename"]),
        SchemaField::new("last_name", TypeTag::String)
            .required(true)
            .with_description("User's last name")
            .with_aliases(["lastname", "lname", "surname", "family_name"]),
        SchemaField::new("age", TypeTag::Integer)
            .with_description("User's age (0-150)")
            .with_aliases(["years", "age_years", "user_age"])
            .with_rule(ContentRule::IntegerRange {
                min: AGE_MIN,
                max: AGE_MAX,
                message: format!("age out of range [{AGE_MIN},{AGE_MAX}]"),
            })
            .with_content(ContentHint::MatchesRule),
        SchemaField::new("phone", TypeTag::String)
            .with_description("Phone number")
            .with_aliases([
                "phone_number",
                "telephone",
                "mobile",
                "contact_number",
                "tel",
            ])
            .with_rule(ContentRule::Pattern {
                pattern: Pattern::new(PHONE_PATTERN)?,
                message: "invalid phone number format".to_string(),
            })
            .with_content(ContentHint::Phone),
        SchemaField::new("country", TypeTag::String)
            .with_description("Country code or name")
            .with_aliases(["country_code", "nation", "location", "residence"]),
        SchemaField::new("status", TypeTag::String)
            .with_description("User account status (active/inactive/pending)")
            .with_aliases(["account_status", "user_status", "state"])
            .with_rule(ContentRule::OneOf {
                values: ALLOWED_STATUSES.iter().map(|s| (*s).to_string()).collect(),
                case_insensitive: true,
                message: format!("status must be one of {{{}}}", ALLOWED_STATUSES.join(", ")),
            })
            .with_content(ContentHint::MatchesRule),
        SchemaField::new("created_at", TypeTag::Date)
            .with_description("Account creation date")
            .with_aliases([
                "creation_date",
                "created",
                "signup_date",
                "registration_date",
                "date_created",
            ])
            .with_content(ContentHint::Date),
    ];
    Ok(SchemaRegistry::new(fields)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_schema_has_nine_fields() {
        let registry = builtin_user_schema().expect("builtin schema");
        let names: Vec<&str> = registry.field_names().collect();
        assert_eq!(
            names,
            vec![
                "user_id",
                "email",
                "first_name",
                "last_name",
                "age",
                "phone",
                "country",
                "status",
                "created_at"
            ]
        );
        let required: Vec<&str> = registry
            .required_fields()
            .map(|field| field.name.as_str())
            .collect();
        assert_eq!(required, vec!["user_id", "email", "first_name", "last_name"]);
    }

    #[test]
    fn status_message_lists_allowed_values() {
        let registry = builtin_user_schema().expect("builtin schema");
        let status = registry.get("status").expect("status field");
        assert_eq!(
            status.rule.as_ref().map(ContentRule::message),
            Some("status must be one of {active, inactive, pending}")
        );
    }

    #[test]
    fn blank_user_id_is_left_to_the_required_check() {
        let registry = builtin_user_schema().expect("builtin schema");
        let user_id = registry.get("user_id").expect("user_id field");
        assert!(user_id.required);
        assert!(user_id.rule.is_none());
        assert_eq!(user_id.content, Some(ContentHint::Identifier));
    }

    #[test]
    fn unhinted_fields_are_name_matched_only() {
        let registry = builtin_user_schema().expect("builtin schema");
        let unhinted: Vec<&str> = registry
            .fields()
            .iter()
            .filter(|field| field.content.is_none())
            .map(|field| field.name.as_str())
            .collect();
        assert_eq!(unhinted, vec!["first_name", "last_name", "country"]);
    }

    #[test]
    fn phone_pattern_accepts_common_forms() {
        let pattern = Pattern::new(PHONE_PATTERN).expect("pattern");
        for phone in ["+1-555-0123", "123-456-7890", "+44 1234567890", "5550123"] {
            assert!(pattern.is_match(phone), "{phone} should match");
        }
        assert!(!pattern.is_match("call me"));
    }
}
