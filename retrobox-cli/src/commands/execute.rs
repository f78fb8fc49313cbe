use retrobox_core::Component;
use retrobox_engine::{ExecuteOptions, confirm_platform_mapping, execute, refresh};
use retrobox_frontend::{ManagerKind, PlatformMappings};
use retrobox_lib::{CancelToken, RunContext};

use crate::cli_types::SelectionArgs;
use crate::commands::rows::print_rows;
use crate::error::CliError;
use crate::session::{Live, Session, run_in_background, selection};

/// Execute the selection's action, then refresh the processed items so
/// their rows reflect the new state.
pub(crate) fn run_execute(
    session: &Session,
    args: &SelectionArgs,
    ids: Option<Vec<String>>,
    components: Vec<Component>,
    native_platform: Option<&str>,
    offline: bool,
    json: bool,
) -> Result<(), CliError> {
    let ctx = session.context(selection(args)?);
    if let Some(key) = native_platform {
        record_platform_mapping(&ctx, key)?;
    }
    let options = ExecuteOptions { ids, components };
    let label = format!("{} {}", ctx.selection.action, ctx.selection.category);

    let (outcome, refreshed) = run_in_background(session.quiet, &label, |cancel, tx| {
        let live = Live::open(&ctx, offline)?;
        let outcome = execute(&ctx, live.services(), &options, cancel, Some(tx))?;
        if outcome.processed.is_empty() {
            return Ok((outcome, None));
        }
        let refresh_ctx = RunContext {
            selection: ctx.selection.clone().with_only_ids(outcome.processed.clone()),
            ..ctx.clone()
        };
        // The processed items are re-verified even after an interrupt.
        let refreshed = refresh(&refresh_ctx, live.services(), &CancelToken::new(), Some(tx))?;
        Ok((outcome, Some(refreshed)))
    })?;

    if outcome.interrupted {
        log::warn!("Execute stopped after {} items", outcome.processed.len());
    }
    match refreshed {
        Some(refreshed) => {
            let rows: Vec<_> = refreshed
                .rows
                .into_iter()
                .filter(|row| outcome.processed.contains(&row.id))
                .collect();
            print_rows(&rows, json)
        }
        None => {
            log::info!("Nothing to do");
            Ok(())
        }
    }
}

/// Record `native_key` as the live folder of the selected platform before
/// the adapter is built for the run.
fn record_platform_mapping(ctx: &RunContext, native_key: &str) -> Result<(), CliError> {
    let software = ctx
        .selection
        .software
        .ok_or_else(|| CliError::selection("--native-platform needs --software"))?;
    let platform = ctx
        .selection
        .platform
        .ok_or_else(|| CliError::selection("--native-platform needs --platform"))?;

    let mut mappings = PlatformMappings::load(&ctx.platforms_path())?;
    let manager = ManagerKind::from_settings(software, &ctx.settings, &mappings)?;
    if confirm_platform_mapping(&mut mappings, &*manager, platform, native_key, &ctx.files())? {
        log::info!(
            "Recorded '{}' as the {} folder for {}",
            native_key,
            software,
            platform
        );
    }
    Ok(())
}
