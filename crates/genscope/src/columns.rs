//! Column set of the generations table.

use crate::generation::Generation;
use genscope_core::Color;
use genscope_widgets::{CellContent, CellValue, ColumnDef, ColumnSet, TableError};

/// Columns of the generations table: time, model, status, duration, total
/// tokens, prompt and response.
pub fn generation_columns() -> Result<ColumnSet<Generation>, TableError> {
    ColumnSet::new(vec![
        ColumnDef::accessor("created_at", "Time", |g: &Generation| {
            CellValue::Number(g.created_at.timestamp_millis() as f64)
        })
        .size(60.0)
        .resizable(false)
        .sorting_fn(|a: &Generation, b: &Generation| a.created_at.cmp(&b.created_at))
        .cell(|_, g: &Generation| CellContent::text(g.created_at.format("%H:%M:%S").to_string())),
        ColumnDef::accessor("name", "Model", |g: &Generation| CellValue::from(g.name.as_str()))
            .size(80.0)
            .cell(|_, g: &Generation| CellContent::badge(g.name.as_str(), Color::BLUE)),
        ColumnDef::accessor("status", "Status", |g: &Generation| {
            CellValue::from(g.status.as_str())
        })
        .size(60.0)
        .cell(|_, g: &Generation| {
            let color = if g.is_success() { Color::GREEN } else { Color::RED };
            CellContent::badge(g.status.as_str(), color)
        }),
        ColumnDef::accessor("duration", "Duration", |g: &Generation| {
            CellValue::Number(g.duration_ms().map_or(f64::NAN, |ms| ms as f64))
        })
        .size(25.0)
        .cell(|value, _| format_duration(value)),
        ColumnDef::accessor("tokens", "Total tokens", |g: &Generation| {
            CellValue::from(g.total_tokens())
        })
        .size(25.0)
        .sorting_fn(|a: &Generation, b: &Generation| a.total_tokens().cmp(&b.total_tokens())),
        ColumnDef::accessor("input", "Prompt", |g: &Generation| {
            g.last_message()
                .map_or(CellValue::Empty, |m| CellValue::from(m.text.as_str()))
        })
        .size(200.0)
        .sortable(false)
        .cell(|_, g: &Generation| match g.last_message() {
            Some(last) => CellContent::Preview {
                text: last.text.clone(),
                total: g.messages().len(),
            },
            None => CellContent::Empty,
        }),
        ColumnDef::accessor("response", "Response", |g: &Generation| {
            CellValue::from(g.response_text())
        })
        .size(200.0)
        .sortable(false),
    ])
}

/// Seconds with two decimals; nothing for a zero or unknown duration.
fn format_duration(value: &CellValue) -> CellContent {
    match value.as_f64() {
        Some(ms) if ms != 0.0 => CellContent::text(format!("{:.2}s", ms / 1000.0)),
        _ => CellContent::Empty,
    }
}
