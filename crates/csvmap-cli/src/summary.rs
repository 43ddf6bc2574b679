//! Table rendering for terminal output.

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use csvmap_ingest::ColumnProfile;
use csvmap_map::FieldSuggestion;
use csvmap_model::{CellValue, ParsedTable, Row, SchemaRegistry, ValidationReport};
use csvmap_store::TemplateSummary;
use csvmap_validate::StructuralReport;

pub fn schema_table(registry: &SchemaRegistry) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Field"),
        header_cell("Type"),
        header_cell("Required"),
        header_cell("Aliases"),
        header_cell("Description"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Center);
    for field in registry.fields() {
        let required = if field.required {
            Cell::new("yes").fg(Color::Yellow)
        } else {
            dim_cell("no")
        };
        table.add_row(vec![
            Cell::new(&field.name).add_attribute(Attribute::Bold),
            Cell::new(field.type_tag),
            required,
            Cell::new(field.aliases.join(", ")),
            Cell::new(&field.description),
        ]);
    }
    table
}

pub fn profile_table(profiles: &[ColumnProfile]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Column"),
        header_cell("Kind"),
        header_cell("Non-null"),
        header_cell("Null"),
        header_cell("Samples"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    for profile in profiles {
        table.add_row(vec![
            Cell::new(&profile.name).add_attribute(Attribute::Bold),
            Cell::new(profile.kind),
            Cell::new(profile.non_null_count),
            count_cell(profile.null_count, Color::Yellow),
            Cell::new(profile.sample_values.join(", ")),
        ]);
    }
    table
}

/// `rows` rendered under the table's columns, numbered from `first_index`.
pub fn preview_table(parsed: &ParsedTable, rows: &[Row], first_index: usize) -> Table {
    let mut table = Table::new();
    let mut header = vec![header_cell("#")];
    header.extend(parsed.columns.iter().map(|column| header_cell(column.as_str())));
    table.set_header(header);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for (offset, row) in rows.iter().enumerate() {
        let mut cells = vec![dim_cell(first_index + offset)];
        cells.extend(parsed.columns.iter().map(|column| {
            match row.get(column.as_str()).and_then(CellValue::as_text) {
                Some(value) => Cell::new(value),
                None => dim_cell("-"),
            }
        }));
        table.add_row(cells);
    }
    table
}

pub fn suggestion_table(suggestions: &[FieldSuggestion]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Field"),
        header_cell("Column"),
        header_cell("Strategy"),
        header_cell("Score"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Right);
    for suggestion in suggestions {
        let column = match &suggestion.column {
            Some(column) => Cell::new(column).fg(Color::Green),
            None => dim_cell("unmapped"),
        };
        table.add_row(vec![
            Cell::new(&suggestion.field).add_attribute(Attribute::Bold),
            column,
            suggestion
                .strategy
                .as_deref()
                .map_or_else(|| dim_cell("-"), Cell::new),
            suggestion
                .score
                .map_or_else(|| dim_cell("-"), |score| Cell::new(format!("{score:.3}"))),
        ]);
    }
    table
}

pub fn template_table(templates: &[TemplateSummary]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Id"),
        header_cell("Name"),
        header_cell("Description"),
        header_cell("Fields"),
        header_cell("Created"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Right);
    for template in templates {
        table.add_row(vec![
            Cell::new(&template.id).fg(Color::Cyan),
            Cell::new(&template.name).add_attribute(Attribute::Bold),
            Cell::new(&template.description),
            Cell::new(template.field_count),
            dim_cell(template.created_at.to_rfc3339()),
        ]);
    }
    table
}

pub fn print_report(report: &ValidationReport) {
    let status = if report.valid {
        "valid"
    } else {
        "invalid"
    };
    println!("Mapping is {status}");

    let mut totals = Table::new();
    totals.set_header(vec![
        header_cell("Errors"),
        header_cell("Warnings"),
        header_cell("Failing rows"),
        header_cell("Row errors"),
    ]);
    apply_summary_table_style(&mut totals);
    totals.add_row(vec![
        count_cell(report.error_count(), Color::Red),
        count_cell(report.warning_count(), Color::Yellow),
        count_cell(report.row_errors.len(), Color::Red),
        count_cell(report.row_error_count(), Color::Red),
    ]);
    println!("{totals}");

    if let Some(issues) = issues_table(&report.errors, &report.warnings) {
        println!("{issues}");
    }

    if !report.row_errors.is_empty() {
        let mut rows = Table::new();
        rows.set_header(vec![header_cell("Row"), header_cell("Problem")]);
        apply_table_style(&mut rows);
        align_column(&mut rows, 0, CellAlignment::Right);
        for row in &report.row_errors {
            for error in &row.errors {
                rows.add_row(vec![Cell::new(row.row_index), Cell::new(error)]);
            }
        }
        println!("{rows}");
    }
}

/// Structural findings for a suggested mapping.
pub fn print_structure(report: &StructuralReport) {
    match issues_table(&report.errors, &report.warnings) {
        Some(issues) => println!("{issues}"),
        None => println!("Mapping covers every required field"),
    }
}

/// Errors then warnings, or `None` when there is nothing to show.
pub fn issues_table(errors: &[String], warnings: &[String]) -> Option<Table> {
    if errors.is_empty() && warnings.is_empty() {
        return None;
    }
    let mut issues = Table::new();
    issues.set_header(vec![header_cell("Severity"), header_cell("Message")]);
    apply_table_style(&mut issues);
    for error in errors {
        issues.add_row(vec![severity_cell("error", Color::Red), Cell::new(error)]);
    }
    for warning in warnings {
        issues.add_row(vec![
            severity_cell("warning", Color::Yellow),
            Cell::new(warning),
        ]);
    }
    Some(issues)
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn severity_cell(label: &str, color: Color) -> Cell {
    Cell::new(label).fg(color).add_attribute(Attribute::Bold)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

#[cfg(test)]
mod tests {
    use csvmap_model::{SchemaField, TypeTag};

    use super::*;

    #[test]
    fn schema_table_has_a_row_per_field() {
        let registry = SchemaRegistry::new(vec![
            SchemaField::new("user_id", TypeTag::String).required(true),
            SchemaField::new("age", TypeTag::Integer).with_aliases(["years"]),
        ])
        .expect("registry");
        let table = schema_table(&registry);
        assert_eq!(table.row_iter().count(), 2);
        let rendered = table.to_string();
        assert!(rendered.contains("user_id"));
        assert!(rendered.contains("years"));
    }

    #[test]
    fn unmapped_suggestion_is_marked() {
        let suggestions = vec![FieldSuggestion {
            field: "phone".to_string(),
            column: None,
            strategy: None,
            score: None,
        }];
        let rendered = suggestion_table(&suggestions).to_string();
        assert!(rendered.contains("unmapped"));
    }

    #[test]
    fn issues_table_lists_errors_before_warnings() {
        assert!(issues_table(&[], &[]).is_none());
        let errors = vec!["required field 'email' is not mapped.".to_string()];
        let warnings = vec!["column 'x' is mapped to multiple fields: [a, b].".to_string()];
        let table = issues_table(&errors, &warnings).expect("issues");
        assert_eq!(table.row_iter().count(), 2);
        let rendered = table.to_string();
        let error_at = rendered.find("email").expect("error row");
        let warning_at = rendered.find("multiple").expect("warning row");
        assert!(error_at < warning_at);
    }
}
