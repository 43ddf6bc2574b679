#![deny(unsafe_code)]

//! Suggests which source column feeds each schema field.

pub mod content;
pub mod engine;
pub mod matcher;

pub use content::{CONTENT_MATCH_RATIO, CONTENT_SAMPLE_ROWS, ContentMatcher, content_score};
pub use engine::{FieldSuggestion, MappingEngine, suggest, suggest_table};
pub use matcher::{
    AliasMatcher, ColumnSample, ExactMatcher, FUZZY_THRESHOLD, FuzzyMatcher, Matcher,
    normalize_for_similarity, similarity,
};
