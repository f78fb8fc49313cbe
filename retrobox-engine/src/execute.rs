//! Execute: apply the selected action to the chosen items.

use std::sync::mpsc::Sender;

use retrobox_core::{Component, Platform};
use retrobox_frontend::{Manager, PlatformMappings};
use retrobox_lib::progress::send;
use retrobox_lib::{CancelToken, FileOps, ProgressEvent, RunContext};

use crate::executor::Executor;
use crate::rows::read_rows;
use crate::services::Services;
use crate::source::list_items;
use crate::EngineError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecuteOptions {
    /// Items to process; `None` takes the rows selected in the last refresh
    pub ids: Option<Vec<String>>,
    /// Components to apply; empty means all of them
    pub components: Vec<Component>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecuteOutcome {
    /// Ids handled by this run, to refresh afterwards
    pub processed: Vec<String>,
    pub interrupted: bool,
}

/// Run the action of the selection over the chosen items.
///
/// Items are handled in the given order. The cancel token is checked
/// before each item; the first error halts the batch.
pub fn execute(
    ctx: &RunContext,
    services: Services<'_>,
    options: &ExecuteOptions,
    cancel: &CancelToken,
    progress: Option<&Sender<ProgressEvent>>,
) -> Result<ExecuteOutcome, EngineError> {
    let ids = match &options.ids {
        Some(ids) => ids.clone(),
        None => read_rows(&ctx.refresh_rows_path())?
            .into_iter()
            .filter(|row| row.selected)
            .map(|row| row.id)
            .collect(),
    };
    let items = list_items(ctx, &services)?;
    let total = ids.len();
    log::info!(
        "Executing {} {} on {} items{}",
        ctx.selection.action,
        ctx.selection.category,
        total,
        if ctx.simulated { " (simulation)" } else { "" }
    );
    send(progress, ProgressEvent::started(total));

    let executor = Executor::new(ctx, services, &options.components);
    let mut outcome = ExecuteOutcome::default();
    for (index, id) in ids.iter().enumerate() {
        if cancel.is_cancelled() {
            log::info!("Execute interrupted after {} of {} items", index, total);
            outcome.interrupted = true;
            send(progress, ProgressEvent::Interrupted);
            return Ok(outcome);
        }
        let Some(item) = items.iter().find(|item| item.id() == id) else {
            log::warn!("Unknown {} '{}', skipped", ctx.selection.category, id);
            continue;
        };
        send(progress, ProgressEvent::item(item.name(), index + 1, total));
        if let Err(e) = executor.execute(item) {
            log::error!("{} of {} failed: {}", ctx.selection.action, item.name(), e);
            send(progress, ProgressEvent::failed(e.to_string()));
            return Err(e);
        }
        outcome.processed.push(id.clone());
    }
    send(progress, ProgressEvent::Finished);
    Ok(outcome)
}

/// Record `native_key` as the folder of `platform` for the manager's
/// software, unless the manager already maps it there.
///
/// Returns true when a mapping was recorded, in which case the manager
/// must be rebuilt to see it.
pub fn confirm_platform_mapping(
    mappings: &mut PlatformMappings,
    manager: &dyn Manager,
    platform: Platform,
    native_key: &str,
    files: &FileOps,
) -> Result<bool, EngineError> {
    if manager.native_key(platform).ok() == Some(native_key) {
        return Ok(false);
    }
    mappings.set(platform, manager.software(), native_key, files)?;
    Ok(true)
}
