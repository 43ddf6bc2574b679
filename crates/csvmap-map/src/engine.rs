//! Mapping suggestion engine.

use csvmap_ingest::is_missing_value;
use csvmap_model::{CellValue, ColumnName, Mapping, ParsedTable, SchemaField, SchemaRegistry};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::content::{CONTENT_SAMPLE_ROWS, ContentMatcher};
use crate::matcher::{AliasMatcher, ColumnSample, ExactMatcher, FuzzyMatcher, Matcher};

/// Why a field received (or did not receive) a column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSuggestion {
    pub field: String,
    pub column: Option<ColumnName>,
    /// Name of the matcher that produced the column.
    pub strategy: Option<String>,
    pub score: Option<f64>,
}

/// Suggests a column for every field of a registry.
///
/// Fields are processed in registry order. For each field the matchers are
/// consulted in list order and the first one with a candidate at or above
/// its threshold decides; within a matcher the highest score wins and ties
/// go to the earlier column. A column chosen for one field stays available
/// to the others.
///
/// Suggesting from column names alone leaves the content matcher idle; the
/// `*_table` methods also hand it sampled values.
///
/// # Example
///
/// ```ignore
/// use csvmap_map::MappingEngine;
///
/// let engine = MappingEngine::new(&registry);
/// let mapping = engine.suggest(&table.columns);
/// ```
pub struct MappingEngine<'a> {
    registry: &'a SchemaRegistry,
    matchers: Vec<Box<dyn Matcher>>,
}

impl<'a> MappingEngine<'a> {
    /// Engine with the exact, alias, fuzzy and content matchers, in that order.
    pub fn new(registry: &'a SchemaRegistry) -> Self {
        Self {
            registry,
            matchers: default_matchers(),
        }
    }

    /// Replaces the matcher list. Order is precedence.
    pub fn with_matchers(mut self, matchers: Vec<Box<dyn Matcher>>) -> Self {
        self.matchers = matchers;
        self
    }

    pub fn matcher_names(&self) -> Vec<&'static str> {
        self.matchers.iter().map(|matcher| matcher.name()).collect()
    }

    /// One suggestion per registry field, in registry order.
    pub fn explain(&self, columns: &[ColumnName]) -> Vec<FieldSuggestion> {
        let samples: Vec<ColumnSample<'_>> = columns.iter().map(ColumnSample::named).collect();
        self.explain_samples(&samples)
    }

    /// Like [`Self::explain`], with the present values of the first
    /// [`CONTENT_SAMPLE_ROWS`] rows of every column. Names of a header-less
    /// table count as synthesized.
    pub fn explain_table(&self, table: &ParsedTable) -> Vec<FieldSuggestion> {
        let rows = table.preview(CONTENT_SAMPLE_ROWS);
        let values: Vec<Vec<&str>> = table
            .columns
            .iter()
            .map(|column| {
                rows.iter()
                    .filter_map(|row| row.get(column.as_str()).and_then(CellValue::as_text))
                    .filter(|value| !is_missing_value(value))
                    .collect()
            })
            .collect();
        let samples: Vec<ColumnSample<'_>> = table
            .columns
            .iter()
            .zip(&values)
            .map(|(name, values)| ColumnSample {
                name,
                values,
                synthesized: !table.has_header,
            })
            .collect();
        self.explain_samples(&samples)
    }

    /// Builds a complete [`Mapping`]: every registry field is a key.
    pub fn suggest(&self, columns: &[ColumnName]) -> Mapping {
        self.to_mapping(self.explain(columns))
    }

    /// [`Self::suggest`] with sampled values; see [`Self::explain_table`].
    pub fn suggest_table(&self, table: &ParsedTable) -> Mapping {
        self.to_mapping(self.explain_table(table))
    }

    fn to_mapping(&self, suggestions: Vec<FieldSuggestion>) -> Mapping {
        let mut mapping = Mapping::unmapped(self.registry);
        for suggestion in suggestions {
            mapping.set(suggestion.field, suggestion.column);
        }
        mapping
    }

    fn explain_samples(&self, samples: &[ColumnSample<'_>]) -> Vec<FieldSuggestion> {
        self.registry
            .fields()
            .iter()
            .map(|field| self.suggest_field(field, samples))
            .collect()
    }

    fn suggest_field(&self, field: &SchemaField, samples: &[ColumnSample<'_>]) -> FieldSuggestion {
        for matcher in &self.matchers {
            if let Some((column, score)) = best_column(matcher.as_ref(), field, samples) {
                debug!(
                    field = %field.name,
                    column = %column,
                    strategy = matcher.name(),
                    score,
                    "suggested column"
                );
                return FieldSuggestion {
                    field: field.name.clone(),
                    column: Some(column.clone()),
                    strategy: Some(matcher.name().to_string()),
                    score: Some(score),
                };
            }
        }
        debug!(field = %field.name, "no column suggested");
        FieldSuggestion {
            field: field.name.clone(),
            column: None,
            strategy: None,
            score: None,
        }
    }
}

/// Suggests a mapping with the default matchers.
pub fn suggest(columns: &[ColumnName], registry: &SchemaRegistry) -> Mapping {
    MappingEngine::new(registry).suggest(columns)
}

/// Suggests a mapping for a classified table with the default matchers.
pub fn suggest_table(table: &ParsedTable, registry: &SchemaRegistry) -> Mapping {
    MappingEngine::new(registry).suggest_table(table)
}

fn default_matchers() -> Vec<Box<dyn Matcher>> {
    vec![
        Box::new(ExactMatcher),
        Box::new(AliasMatcher),
        Box::new(FuzzyMatcher::default()),
        Box::new(ContentMatcher::default()),
    ]
}

fn best_column<'c>(
    matcher: &dyn Matcher,
    field: &SchemaField,
    samples: &[ColumnSample<'c>],
) -> Option<(&'c ColumnName, f64)> {
    let threshold = matcher.threshold();
    let mut best: Option<(&ColumnName, f64)> = None;
    for sample in samples {
        let Some(score) = matcher.score_sample(field, sample) else {
            continue;
        };
        if score < threshold {
            continue;
        }
        if best.is_none_or(|(_, best_score)| score > best_score) {
            best = Some((sample.name, score));
        }
    }
    best
}
