//! CLI argument definitions for csvmap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use csvmap_validate::DEFAULT_MAX_ERROR_ROWS;

#[derive(Parser)]
#[command(
    name = "csvmap",
    version,
    about = "Reconcile arbitrary CSV files against a target schema",
    long_about = "Reconcile arbitrary CSV files against a target schema.\n\n\
                  Detects header rows, suggests which column feeds each schema field\n\
                  and validates a mapping against a sample of the file."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Schema definition (JSON array of fields) used instead of the built-in user schema.
    #[arg(long = "schema", value_name = "PATH", global = true)]
    pub schema: Option<PathBuf>,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow cell values to appear in log output.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the fields of the active schema.
    Schema,

    /// Classify a CSV file and preview its columns and rows.
    Inspect(InspectArgs),

    /// Suggest a column for every schema field.
    Suggest(SuggestArgs),

    /// Validate a mapping against a CSV file.
    Validate(ValidateArgs),

    /// Manage saved mapping templates.
    #[command(subcommand)]
    Template(TemplateCommand),
}

/// Options shared by every command that reads a CSV file.
#[derive(Args, Clone)]
pub struct CsvArgs {
    /// Path to the CSV file.
    #[arg(value_name = "CSV")]
    pub csv: PathBuf,

    /// Field delimiter (a single ASCII character).
    #[arg(long = "delimiter", default_value_t = ',')]
    pub delimiter: char,

    /// Reject files larger than this many megabytes.
    #[arg(long = "max-file-mb", value_name = "MB", default_value_t = 100)]
    pub max_file_mb: u64,
}

#[derive(Args)]
pub struct InspectArgs {
    #[command(flatten)]
    pub input: CsvArgs,

    /// Number of data rows to preview.
    #[arg(long = "rows", default_value_t = 5)]
    pub rows: usize,

    /// Number of data rows to skip before the preview.
    #[arg(long = "skip", default_value_t = 0)]
    pub skip: usize,
}

#[derive(Args)]
pub struct SuggestArgs {
    #[command(flatten)]
    pub input: CsvArgs,

    /// Print the suggestion as JSON instead of a table.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Args)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub input: CsvArgs,

    /// Mapping file: a JSON object of field name to column name (or null).
    #[arg(
        long = "mapping",
        value_name = "JSON",
        conflicts_with = "template",
        required_unless_present = "template"
    )]
    pub mapping: Option<PathBuf>,

    /// Id of a saved template to validate instead of a mapping file.
    #[arg(long = "template", value_name = "ID")]
    pub template: Option<String>,

    #[command(flatten)]
    pub store: StoreArgs,

    /// Number of rows sampled for content checks.
    #[arg(long = "max-error-rows", default_value_t = DEFAULT_MAX_ERROR_ROWS)]
    pub max_error_rows: usize,

    /// Print the report as JSON instead of tables.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Args, Clone)]
pub struct StoreArgs {
    /// Directory holding saved templates.
    #[arg(long = "store", value_name = "DIR", default_value = "mappings")]
    pub store: PathBuf,
}

#[derive(Subcommand)]
pub enum TemplateCommand {
    /// Save a mapping as a template after checking it against a CSV file.
    Save(TemplateSaveArgs),

    /// List saved templates, newest first.
    List {
        #[command(flatten)]
        store: StoreArgs,
    },

    /// Print one template as JSON.
    Show {
        /// Template id.
        id: String,
        #[command(flatten)]
        store: StoreArgs,
    },

    /// Delete a template.
    Delete {
        /// Template id.
        id: String,
        #[command(flatten)]
        store: StoreArgs,
    },
}

#[derive(Args)]
pub struct TemplateSaveArgs {
    /// Template name.
    #[arg(long = "name")]
    pub name: String,

    /// Free-form description.
    #[arg(long = "description", default_value = "")]
    pub description: String,

    /// Mapping file: a JSON object of field name to column name (or null).
    #[arg(long = "mapping", value_name = "JSON")]
    pub mapping: PathBuf,

    #[command(flatten)]
    pub input: CsvArgs,

    #[command(flatten)]
    pub store: StoreArgs,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
