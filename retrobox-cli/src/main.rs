//! retrobox CLI
//!
//! Command-line interface for reconciling a pinball and retro game archive
//! with PinUP Popper, the pinball emulators and the game front-ends.

mod cli_types;
mod commands;
mod error;
mod logging;
mod session;
mod spinner;

use clap::Parser;

use cli_types::{Cli, Commands, ConfigAction, ListAction};
use commands::config::{run_config_path, run_config_set, run_config_show, run_config_simulate};
use commands::execute::run_execute;
use commands::list::{run_list_categories, run_list_games, run_list_platforms};
use commands::refresh::run_refresh;
use commands::rows::{run_rows, run_select};
use commands::transform::run_transform;
use error::CliError;
use session::Session;

fn main() {
    let cli = Cli::parse();
    if let Err(e) = logging::init(cli.quiet, cli.verbose, cli.logfile.as_deref()) {
        eprintln!("{e}");
        std::process::exit(1);
    }
    if let Err(e) = run(cli) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let session = Session::load(&cli);
    if session.simulate {
        log::info!("Simulation mode: nothing will be changed");
    }

    match cli.command {
        Commands::Refresh {
            selection,
            only,
            offline,
            json,
        } => run_refresh(&session, &selection, only, offline, json),
        Commands::Execute {
            selection,
            ids,
            components,
            native_platform,
            offline,
            json,
        } => run_execute(
            &session,
            &selection,
            ids,
            components,
            native_platform.as_deref(),
            offline,
            json,
        ),
        Commands::Rows { selection, json } => run_rows(&session, &selection, json),
        Commands::Select {
            selection,
            ids,
            all,
            red,
            none,
        } => run_select(&session, &selection, &ids, all, red, none),
        Commands::List { action } => match action {
            ListAction::Categories => {
                run_list_categories();
                Ok(())
            }
            ListAction::Platforms { software } => run_list_platforms(&session, software),
            ListAction::Games { software, platform } => {
                run_list_games(&session, software, platform)
            }
        },
        Commands::Transform {
            program,
            options,
            input,
            output,
            timeout,
        } => run_transform(&session, &program, &options, &input, &output, timeout),
        Commands::Config { action } => match action {
            ConfigAction::Show => {
                run_config_show(&session);
                Ok(())
            }
            ConfigAction::Path => {
                run_config_path(&session);
                Ok(())
            }
            ConfigAction::Set { name, path } => run_config_set(&session, &name, path),
            ConfigAction::Simulate { enabled } => run_config_simulate(&session, enabled),
        },
    }
}

#[cfg(test)]
#[path = "tests/cli_tests.rs"]
mod tests;
