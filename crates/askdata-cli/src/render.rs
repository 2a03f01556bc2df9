use anyhow::Result;
use askdata_agent::{QueryOutput, ResultEnvelope};
use askdata_model::{ColumnType, Dataset, Value};
use clap::ValueEnum;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

pub fn render(envelope: &ResultEnvelope, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => render_text(envelope),
        OutputFormat::Json => Ok(serde_json::to_string(envelope)?),
    }
}

pub fn render_text(envelope: &ResultEnvelope) -> Result<String> {
    let body = match &envelope.result {
        QueryOutput::Scalar(value) => scalar(value),
        QueryOutput::Count(n) => n.to_string(),
        QueryOutput::Summary(summary) => serde_json::to_string_pretty(summary)?,
        QueryOutput::Table(table) => render_table(table),
    };
    Ok(format!("Intent: {}\n{body}", envelope.intent))
}

fn scalar(value: &Value) -> String {
    match value {
        Value::Blank => "null".to_string(),
        other => other.to_string(),
    }
}

/// Aligned text grid with a header rule and a trailing row count. Numeric columns are
/// right-aligned.
pub fn render_table(table: &Dataset) -> String {
    let headers = table.column_names();
    let cells: Vec<Vec<String>> = table
        .rows()
        .iter()
        .map(|row| row.iter().map(Value::to_string).collect())
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }
    let right: Vec<bool> = table
        .columns()
        .iter()
        .map(|c| c.column_type == ColumnType::Number)
        .collect();

    let mut out = String::new();
    push_line(&mut out, &headers, &widths, &vec![false; widths.len()]);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&rule.join("-+-"));
    out.push('\n');
    for row in &cells {
        push_line(&mut out, row, &widths, &right);
    }

    let n = table.row_count();
    out.push_str(&format!("({n} {})", if n == 1 { "row" } else { "rows" }));
    out
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize], right: &[bool]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .zip(right)
        .map(|((cell, &width), right)| {
            if *right {
                format!("{cell:>width$}")
            } else {
                format!("{cell:<width$}")
            }
        })
        .collect();
    out.push_str(padded.join(" | ").trim_end());
    out.push('\n');
}
