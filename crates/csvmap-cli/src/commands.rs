//! Subcommand implementations.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Serialize;
use tracing::{debug, info, info_span, trace};

use csvmap_ingest::{IngestOptions, profile_columns, read_csv_table};
use csvmap_map::{FieldSuggestion, MappingEngine};
use csvmap_model::{Mapping, ParsedTable, SchemaRegistry, ValidationReport};
use csvmap_standards::{builtin_user_schema, load_registry};
use csvmap_store::{StoredTemplate, TemplateRepository};
use csvmap_validate::{StructuralReport, check_mapping_keys, validate, validate_structure};

use crate::cli::{
    CsvArgs, InspectArgs, SuggestArgs, TemplateCommand, TemplateSaveArgs, ValidateArgs,
};
use crate::logging::redact_value;
use crate::summary::{
    print_report, print_structure, profile_table, preview_table, schema_table, suggestion_table,
    template_table,
};

const BYTES_PER_MB: u64 = 1024 * 1024;

/// The registry at `path`, or the built-in user schema.
pub fn load_schema(path: Option<&Path>) -> Result<SchemaRegistry> {
    match path {
        Some(path) => {
            load_registry(path).with_context(|| format!("load schema {}", path.display()))
        }
        None => builtin_user_schema().context("load built-in schema"),
    }
}

pub fn ingest_options(args: &CsvArgs) -> Result<IngestOptions> {
    let Some(delimiter) = u8::try_from(args.delimiter)
        .ok()
        .filter(u8::is_ascii)
    else {
        bail!("delimiter must be a single ASCII character, got {:?}", args.delimiter);
    };
    Ok(IngestOptions {
        max_file_bytes: args.max_file_mb.saturating_mul(BYTES_PER_MB),
        delimiter,
    })
}

pub fn read_table(args: &CsvArgs) -> Result<ParsedTable> {
    let options = ingest_options(args)?;
    let table = read_csv_table(&args.csv, &options)
        .with_context(|| format!("read {}", args.csv.display()))?;
    info!(
        rows = table.row_count(),
        columns = table.columns.len(),
        has_header = table.has_header,
        "loaded table"
    );
    Ok(table)
}

/// Reads a mapping file; fields the file leaves out are treated as unmapped.
pub fn load_mapping(path: &Path, registry: &SchemaRegistry) -> Result<Mapping> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read mapping {}", path.display()))?;
    let mut mapping: Mapping = serde_json::from_str(&contents)
        .with_context(|| format!("parse mapping {}", path.display()))?;
    for field in registry.field_names() {
        if !mapping.contains_field(field) {
            debug!(field, "field absent from mapping file; treated as unmapped");
            mapping.set(field, None);
        }
    }
    Ok(mapping)
}

pub fn run_schema(registry: &SchemaRegistry) -> Result<()> {
    println!("{}", schema_table(registry));
    Ok(())
}

pub fn run_inspect(args: &InspectArgs) -> Result<()> {
    let span = info_span!("inspect", file = %args.input.csv.display());
    let _guard = span.enter();
    let table = read_table(&args.input)?;

    let header = if table.has_header {
        "detected"
    } else {
        "not detected (columns synthesized)"
    };
    println!("File: {}", args.input.csv.display());
    println!("Header row: {header}");
    println!("Rows: {}", table.row_count());
    println!("{}", profile_table(&profile_columns(&table)));
    let rows = table.window(args.skip, args.rows);
    if !rows.is_empty() {
        println!("{}", preview_table(&table, rows, args.skip));
    }
    Ok(())
}

/// A suggested mapping, how each field got its column, and the structural
/// check of the result against the file.
#[derive(Debug, Serialize)]
pub struct SuggestOutput {
    pub mapping: Mapping,
    pub suggestions: Vec<FieldSuggestion>,
    pub validation: StructuralReport,
}

pub fn suggest_mapping(table: &ParsedTable, registry: &SchemaRegistry) -> SuggestOutput {
    let engine = MappingEngine::new(registry);
    let suggestions = engine.explain_table(table);
    let mut mapping = Mapping::unmapped(registry);
    for suggestion in &suggestions {
        mapping.set(suggestion.field.clone(), suggestion.column.clone());
    }
    let validation = validate_structure(&mapping, &table.columns, registry);
    SuggestOutput {
        mapping,
        suggestions,
        validation,
    }
}

pub fn run_suggest(args: &SuggestArgs, registry: &SchemaRegistry) -> Result<SuggestOutput> {
    let span = info_span!("suggest", file = %args.input.csv.display());
    let _guard = span.enter();
    let table = read_table(&args.input)?;
    let output = suggest_mapping(&table, registry);
    info!(
        mapped = output.mapping.mapped_count(),
        fields = output.mapping.len(),
        structural_errors = output.validation.errors.len(),
        "suggested mapping"
    );

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&output).context("serialize suggestion")?
        );
    } else {
        println!("{}", suggestion_table(&output.suggestions));
        print_structure(&output.validation);
    }
    Ok(output)
}

/// Runs validation and prints the report. The caller turns `valid` into an exit code.
pub fn run_validate(args: &ValidateArgs, registry: &SchemaRegistry) -> Result<ValidationReport> {
    let span = info_span!("validate", file = %args.input.csv.display());
    let _guard = span.enter();
    let mapping = match (&args.mapping, &args.template) {
        (Some(path), _) => load_mapping(path, registry)?,
        (None, Some(id)) => {
            let repository = TemplateRepository::new(&args.store.store)?;
            let template = repository
                .get(id)?
                .with_context(|| format!("template {id} not found"))?;
            template.to_mapping(registry)?
        }
        (None, None) => bail!("either --mapping or --template is required"),
    };
    let table = read_table(&args.input)?;
    let report = validate(&mapping, &table, registry, args.max_error_rows)
        .context("mapping does not cover the schema")?;
    for row in &report.row_errors {
        for error in &row.errors {
            trace!(row = row.row_index, error = redact_value(error), "row error");
        }
    }
    info!(
        valid = report.valid,
        errors = report.error_count(),
        warnings = report.warning_count(),
        failing_rows = report.row_errors.len(),
        "validation finished"
    );

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("serialize report")?
        );
    } else {
        print_report(&report);
    }
    Ok(report)
}

pub fn run_template(command: &TemplateCommand, registry: &SchemaRegistry) -> Result<()> {
    match command {
        TemplateCommand::Save(args) => {
            let template = save_template(args, registry)?;
            println!("Saved template {} ({})", template.id, template.name);
        }
        TemplateCommand::List { store } => {
            let repository = TemplateRepository::new(&store.store)?;
            let templates = repository.list()?;
            if templates.is_empty() {
                println!("No templates in {}", repository.base_dir().display());
            } else {
                println!("{}", template_table(&templates));
            }
        }
        TemplateCommand::Show { id, store } => {
            let repository = TemplateRepository::new(&store.store)?;
            let template = repository
                .get(id)?
                .with_context(|| format!("template {id} not found"))?;
            println!(
                "{}",
                serde_json::to_string_pretty(&template).context("serialize template")?
            );
        }
        TemplateCommand::Delete { id, store } => {
            let repository = TemplateRepository::new(&store.store)?;
            if !repository.delete(id)? {
                bail!("template {id} not found");
            }
            println!("Deleted template {id}");
        }
    }
    Ok(())
}

/// Saves a mapping only if it is structurally valid for the given CSV file.
pub fn save_template(args: &TemplateSaveArgs, registry: &SchemaRegistry) -> Result<StoredTemplate> {
    let mapping = load_mapping(&args.mapping, registry)?;
    check_mapping_keys(&mapping, registry).context("mapping does not fit the schema")?;
    let table = read_table(&args.input)?;
    let structural = validate_structure(&mapping, &table.columns, registry);
    if !structural.is_ok() {
        bail!(
            "Cannot save invalid mapping: {}",
            structural.errors.join(", ")
        );
    }
    let repository = TemplateRepository::new(&args.store.store)?;
    repository.save(&args.name, &args.description, &mapping)
}
