//! Refresh: verify every item of the selection and persist the rows.

use std::sync::mpsc::Sender;

use retrobox_lib::progress::send;
use retrobox_lib::{CancelToken, ProgressEvent, RunContext};

use crate::rows::{Row, merge_partial, read_rows, sort_rows, write_rows};
use crate::services::Services;
use crate::source::{Item, list_items};
use crate::verifier::Verifier;
use crate::EngineError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshOutcome {
    /// Every persisted row of the selection, sorted
    pub rows: Vec<Row>,
    /// Ids verified by this run, in processing order
    pub processed: Vec<String>,
    pub interrupted: bool,
}

/// Items of the selection that pass its id filter.
pub fn selected_items(ctx: &RunContext, services: &Services<'_>) -> Result<Vec<Item>, EngineError> {
    Ok(list_items(ctx, services)?
        .into_iter()
        .filter(|item| ctx.selection.includes(item.id()))
        .collect())
}

/// Verify the selection, one item at a time.
///
/// The cancel token is checked before each item; an interrupted run keeps
/// the previous rows of the items it did not reach. The first error is
/// logged, reported as [`ProgressEvent::Failed`] and halts the batch.
///
/// Rows of a partial refresh (`only_ids`) are merged into the persisted
/// rows of the selection. The user's selection flags survive a refresh.
pub fn refresh(
    ctx: &RunContext,
    services: Services<'_>,
    cancel: &CancelToken,
    progress: Option<&Sender<ProgressEvent>>,
) -> Result<RefreshOutcome, EngineError> {
    let items = match selected_items(ctx, &services) {
        Ok(items) => items,
        Err(e) => {
            log::error!("Cannot list {}: {}", ctx.selection.category, e);
            send(progress, ProgressEvent::failed(e.to_string()));
            return Err(e);
        }
    };
    let total = items.len();
    log::info!(
        "Refreshing {} {} ({} items)",
        ctx.selection.action,
        ctx.selection.category,
        total
    );
    send(progress, ProgressEvent::started(total));

    let verifier = Verifier::new(ctx, services);
    let mut fresh = Vec::with_capacity(total);
    let mut processed = Vec::with_capacity(total);
    let mut interrupted = false;
    for (index, item) in items.iter().enumerate() {
        if cancel.is_cancelled() {
            log::info!("Refresh interrupted after {} of {} items", index, total);
            interrupted = true;
            break;
        }
        send(progress, ProgressEvent::item(item.name(), index + 1, total));
        match verifier.verify(item) {
            Ok(row) => {
                log::debug!("{}: {}", row.id, row.color.as_str());
                processed.push(item.id().to_string());
                fresh.push(row);
            }
            Err(e) => {
                log::error!("Refresh of {} failed: {}", item.name(), e);
                send(progress, ProgressEvent::failed(e.to_string()));
                return Err(e);
            }
        }
    }

    let path = ctx.refresh_rows_path();
    let previous = read_rows(&path)?;
    for row in &mut fresh {
        if let Some(old) = previous.iter().find(|old| old.id == row.id) {
            row.selected = old.selected;
        }
    }
    let rows = if interrupted {
        merge_partial(fresh, previous, &processed)
    } else if let Some(ids) = &ctx.selection.only_ids {
        merge_partial(fresh, previous, ids)
    } else {
        sort_rows(&mut fresh);
        fresh
    };
    write_rows(&path, &rows)?;

    send(
        progress,
        if interrupted {
            ProgressEvent::Interrupted
        } else {
            ProgressEvent::Finished
        },
    );
    Ok(RefreshOutcome {
        rows,
        processed,
        interrupted,
    })
}
