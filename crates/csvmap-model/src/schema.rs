//! Target schema description: fields, declared types and content rules.
//!
//! The registry is built once and only read afterwards. Rule *declarations*
//! live here; evaluating them against coerced cell values is the validation
//! crate's job.

use std::collections::BTreeSet;
use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::ModelError;

/// Declared type of a schema field, used for validation-time coercion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeTag {
    String,
    Integer,
    Number,
    Boolean,
    Date,
}

impl TypeTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeTag::String => "string",
            TypeTag::Integer => "integer",
            TypeTag::Number => "number",
            TypeTag::Boolean => "boolean",
            TypeTag::Date => "date",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A compiled regular expression that serializes as its source text.
#[derive(Debug, Clone)]
pub struct Pattern(Regex);

impl Pattern {
    pub fn new(source: &str) -> Result<Self, ModelError> {
        Regex::new(source)
            .map(Self)
            .map_err(|err| ModelError::InvalidPattern {
                pattern: source.to_string(),
                message: err.to_string(),
            })
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn is_match(&self, value: &str) -> bool {
        self.0.is_match(value)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Serialize for Pattern {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Pattern {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let source = String::deserialize(deserializer)?;
        Pattern::new(&source).map_err(serde::de::Error::custom)
    }
}

/// Content rule evaluated against a successfully coerced cell value.
///
/// Every variant carries the message reported when the rule fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContentRule {
    /// Text form of the value must contain `needle`.
    Contains { needle: String, message: String },
    /// Value must be an integer within `[min, max]`.
    IntegerRange { min: i64, max: i64, message: String },
    /// Text form of the value must be one of `values`.
    OneOf {
        values: Vec<String>,
        #[serde(default)]
        case_insensitive: bool,
        message: String,
    },
    /// Text form of the value must match `pattern`.
    Pattern { pattern: Pattern, message: String },
    /// Text form of the value must contain a non-whitespace character.
    NotBlank { message: String },
}

impl ContentRule {
    pub fn message(&self) -> &str {
        match self {
            ContentRule::Contains { message, .. }
            | ContentRule::IntegerRange { message, .. }
            | ContentRule::OneOf { message, .. }
            | ContentRule::Pattern { message, .. }
            | ContentRule::NotBlank { message } => message,
        }
    }
}

/// What the values of a matching column look like.
///
/// Used to suggest columns whose names say nothing, such as `Column_3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentHint {
    Email,
    Phone,
    Date,
    /// Mostly unique single-token values that are neither dates nor small numbers.
    Identifier,
    /// Values satisfy the field's own [`ContentRule`].
    MatchesRule,
}

/// A named slot in the target structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaField {
    pub name: String,
    #[serde(default)]
    pub required: bool,
    #[serde(rename = "type")]
    pub type_tag: TypeTag,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule: Option<ContentRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<ContentHint>,
}

impl SchemaField {
    pub fn new(name: impl Into<String>, type_tag: TypeTag) -> Self {
        Self {
            name: name.into(),
            required: false,
            type_tag,
            description: String::new(),
            aliases: Vec::new(),
            rule: None,
            content: None,
        }
    }

    #[must_use]
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Adds aliases, skipping ones already present (compared case-insensitively).
    #[must_use]
    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for alias in aliases {
            let alias = alias.into();
            let alias = alias.trim();
            if alias.is_empty()
                || self
                    .aliases
                    .iter()
                    .any(|existing| existing.eq_ignore_ascii_case(alias))
            {
                continue;
            }
            self.aliases.push(alias.to_string());
        }
        self
    }

    #[must_use]
    pub fn with_rule(mut self, rule: ContentRule) -> Self {
        self.rule = Some(rule);
        self
    }

    #[must_use]
    pub fn with_content(mut self, hint: ContentHint) -> Self {
        self.content = Some(hint);
        self
    }
}

/// The fixed set of target fields, in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<SchemaField>", into = "Vec<SchemaField>")]
pub struct SchemaRegistry {
    fields: Vec<SchemaField>,
}

impl SchemaRegistry {
    /// Builds a registry, rejecting blank names and names that collide
    /// case-insensitively.
    pub fn new(fields: Vec<SchemaField>) -> Result<Self, ModelError> {
        let mut seen = BTreeSet::new();
        for field in &fields {
            let key = field.name.trim().to_lowercase();
            if key.is_empty() {
                return Err(ModelError::BlankFieldName);
            }
            if !seen.insert(key) {
                return Err(ModelError::DuplicateField(field.name.clone()));
            }
        }
        Ok(Self { fields })
    }

    pub fn fields(&self) -> &[SchemaField] {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&SchemaField> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|field| field.name.as_str())
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &SchemaField> {
        self.fields.iter().filter(|field| field.required)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl TryFrom<Vec<SchemaField>> for SchemaRegistry {
    type Error = ModelError;

    fn try_from(fields: Vec<SchemaField>) -> Result<Self, Self::Error> {
        Self::new(fields)
    }
}

impl From<SchemaRegistry> for Vec<SchemaField> {
    fn from(registry: SchemaRegistry) -> Self {
        registry.fields
    }
}
