use retrobox_engine::refresh;

use crate::cli_types::SelectionArgs;
use crate::commands::rows::print_rows;
use crate::error::CliError;
use crate::session::{Live, Session, run_in_background, selection};

pub(crate) fn run_refresh(
    session: &Session,
    args: &SelectionArgs,
    only: Option<Vec<String>>,
    offline: bool,
    json: bool,
) -> Result<(), CliError> {
    let mut selection = selection(args)?;
    if let Some(ids) = only {
        selection = selection.with_only_ids(ids);
    }
    let ctx = session.context(selection);
    let label = format!("Refreshing {} {}", ctx.selection.action, ctx.selection.category);

    let outcome = run_in_background(session.quiet, &label, |cancel, tx| {
        let live = Live::open(&ctx, offline)?;
        Ok(refresh(&ctx, live.services(), cancel, Some(tx))?)
    })?;

    if outcome.interrupted {
        log::warn!(
            "Refresh stopped after {} items; the other rows keep their previous state",
            outcome.processed.len()
        );
    }
    print_rows(&outcome.rows, json)
}
