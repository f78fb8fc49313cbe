use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;
use serde_json::{Map, Value, json};

use retrobox_core::{RowColor, Status};
use retrobox_engine::Row;
use retrobox_engine::rows::{read_rows, write_rows};

use crate::cli_types::SelectionArgs;
use crate::error::CliError;
use crate::session::{Session, selection};

/// Show the stored rows of a selection.
pub(crate) fn run_rows(
    session: &Session,
    args: &SelectionArgs,
    json: bool,
) -> Result<(), CliError> {
    let ctx = session.context(selection(args)?);
    let rows = read_rows(&ctx.refresh_rows_path())?;
    if rows.is_empty() && !json {
        log::info!(
            "No stored rows for {} {}; run a refresh first",
            ctx.selection.action,
            ctx.selection.category
        );
        return Ok(());
    }
    print_rows(&rows, json)
}

/// Mark or clear rows for the next execute.
pub(crate) fn run_select(
    session: &Session,
    args: &SelectionArgs,
    ids: &[String],
    all: bool,
    red: bool,
    none: bool,
) -> Result<(), CliError> {
    let ctx = session.context(selection(args)?);
    let path = ctx.refresh_rows_path();
    let mut rows = read_rows(&path)?;
    for id in ids {
        if !rows.iter().any(|row| &row.id == id) {
            log::warn!("No stored row '{}'", id);
        }
    }
    for row in &mut rows {
        if none {
            row.selected = false;
        }
        if all || (red && row.color == RowColor::Red) || ids.contains(&row.id) {
            row.selected = true;
        }
    }
    write_rows(&path, &rows)?;
    let count = rows.iter().filter(|row| row.selected).count();
    log::info!("{} of {} rows selected", count, rows.len());
    Ok(())
}

/// Print rows as a colored listing, or as a JSON array on stdout.
pub(crate) fn print_rows(rows: &[Row], json: bool) -> Result<(), CliError> {
    if json {
        let values: Vec<Value> = rows.iter().map(row_json).collect();
        let text = serde_json::to_string_pretty(&values)
            .map_err(|e| CliError::other(e.to_string()))?;
        println!("{text}");
        return Ok(());
    }

    let width = rows.iter().map(|row| row.id.len()).max().unwrap_or(0);
    for row in rows {
        let marker = if row.selected { "*" } else { " " };
        let color = match row.color {
            RowColor::Red => format!("{}", "red  ".if_supports_color(Stdout, |t| t.red())),
            RowColor::Green => format!("{}", "green".if_supports_color(Stdout, |t| t.green())),
            RowColor::Black => format!("{}", "black".if_supports_color(Stdout, |t| t.dimmed())),
        };
        let statuses: Vec<String> = row
            .columns
            .iter()
            .filter(|(_, status)| status.is_applicable())
            .map(|(column, status)| match status {
                Status::Absent => format!("{}", column.if_supports_color(Stdout, |t| t.red())),
                _ => column.to_string(),
            })
            .collect();
        log::info!(
            "{} {} {:<width$} {} {}",
            marker,
            color,
            row.id,
            row.name.if_supports_color(Stdout, |t| t.bold()),
            statuses.join(" ").if_supports_color(Stdout, |t| t.dimmed()),
            width = width
        );
    }
    summarize(rows);
    Ok(())
}

fn summarize(rows: &[Row]) {
    let red = rows.iter().filter(|row| row.color == RowColor::Red).count();
    log::info!("");
    log::info!(
        "{} rows, {} to act on",
        rows.len(),
        if red > 0 {
            format!("{}", red.if_supports_color(Stdout, |t| t.red()))
        } else {
            format!("{}", red.if_supports_color(Stdout, |t| t.green()))
        }
    );
}

fn row_json(row: &Row) -> Value {
    let columns: Map<String, Value> = row
        .columns
        .iter()
        .map(|(column, status)| (column.key().to_string(), Value::from(status.to_string())))
        .collect();
    json!({
        "id": row.id,
        "name": row.name,
        "selected": row.selected,
        "color": row.color.as_str(),
        "columns": columns,
    })
}
