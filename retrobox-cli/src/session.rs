//! Settings resolution, live service handles and the background worker
//! shared by the commands.

use std::path::PathBuf;
use std::sync::mpsc::{self, Sender};

use retrobox_core::Category;
use retrobox_db::{Connection, open_database};
use retrobox_engine::{NoLookup, Services, VersionLookup, WebVersionLookup};
use retrobox_frontend::{ManagerKind, PlatformMappings};
use retrobox_lib::registry::system_registry;
use retrobox_lib::settings::{resolve_working_path, settings_path};
use retrobox_lib::{CancelToken, ProgressEvent, Registry, RunContext, Selection, Settings};

use crate::cli_types::{Cli, SelectionArgs};
use crate::error::CliError;
use crate::spinner::BatchProgress;

/// Global options resolved once per invocation.
pub(crate) struct Session {
    pub settings_path: PathBuf,
    pub settings: Settings,
    pub working_path: PathBuf,
    pub simulate: bool,
    pub quiet: bool,
}

impl Session {
    pub(crate) fn load(cli: &Cli) -> Self {
        let settings_path = cli.settings.clone().unwrap_or_else(settings_path);
        let settings = Settings::load_from(&settings_path);
        let working_path = resolve_working_path(cli.working_path.clone(), &settings);
        log::debug!(
            "Settings {}, working path {}",
            settings_path.display(),
            working_path.display()
        );
        Self {
            settings_path,
            simulate: cli.simulate || settings.simulated,
            settings,
            working_path,
            quiet: cli.quiet,
        }
    }

    pub(crate) fn context(&self, selection: Selection) -> RunContext {
        RunContext::new(self.working_path.clone(), self.settings.clone(), selection)
            .with_simulated(self.simulate)
    }
}

/// Turn the selection arguments into a [`Selection`], rejecting actions the
/// category does not support.
pub(crate) fn selection(args: &SelectionArgs) -> Result<Selection, CliError> {
    if !args.category.actions().contains(&args.action) {
        return Err(CliError::selection(format!(
            "{} is not available for {}",
            args.action, args.category
        )));
    }
    let mut selection = Selection::new(args.category, args.action);
    if let Some(emulator) = args.emulator {
        selection = selection.with_emulator(emulator);
    }
    if let Some(platform) = args.platform {
        selection = selection.with_platform(platform);
    }
    if let Some(software) = args.software {
        selection = selection.with_software(software);
    }
    Ok(selection)
}

/// Handles to the live side of a run, owned by the worker thread.
pub(crate) struct Live {
    registry: Box<dyn Registry>,
    database: Option<Connection>,
    manager: Option<ManagerKind>,
    lookup: Box<dyn VersionLookup>,
}

impl Live {
    /// Open what the selection needs: the PinUP database for the pinball
    /// categories, and the front-end adapter when a software is selected.
    pub(crate) fn open(ctx: &RunContext, offline: bool) -> Result<Self, CliError> {
        let uses_database = matches!(
            ctx.selection.category,
            Category::Tables | Category::Playlists | Category::PinupDatabase
        );
        let database = match ctx.pinup_database_path().filter(|_| uses_database) {
            Some(path) if path.is_file() => Some(open_database(&path)?),
            Some(path) => {
                log::warn!("PinUP database not found at {}", path.display());
                None
            }
            None => None,
        };
        let manager = match ctx.selection.software {
            Some(software) => {
                let mappings = PlatformMappings::load(&ctx.platforms_path())?;
                Some(ManagerKind::from_settings(software, &ctx.settings, &mappings)?)
            }
            None => None,
        };
        let lookup: Box<dyn VersionLookup> = if offline {
            Box::new(NoLookup)
        } else {
            Box::new(WebVersionLookup::new()?)
        };
        Ok(Self {
            registry: system_registry(),
            database,
            manager,
            lookup,
        })
    }

    pub(crate) fn services(&self) -> Services<'_> {
        let mut services = Services::new(self.registry.as_ref(), self.lookup.as_ref());
        if let Some(database) = &self.database {
            services = services.with_database(database);
        }
        if let Some(manager) = &self.manager {
            services = services.with_manager(manager.as_manager());
        }
        services
    }
}

/// Run `work` on a worker thread while the foreground follows its progress
/// events. Ctrl-C raises the cancel token handed to the worker.
pub(crate) fn run_in_background<T, F>(quiet: bool, label: &str, work: F) -> Result<T, CliError>
where
    T: Send,
    F: FnOnce(&CancelToken, &Sender<ProgressEvent>) -> Result<T, CliError> + Send,
{
    let cancel = CancelToken::new();
    let handler_token = cancel.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        log::warn!("Interrupt requested, stopping after the current item");
        handler_token.cancel();
    }) {
        log::debug!("Ctrl-C handler not installed: {}", e);
    }

    let progress = BatchProgress::new(quiet, label);
    let (tx, rx) = mpsc::channel();
    let result = std::thread::scope(|scope| {
        let cancel = &cancel;
        let handle = scope.spawn(move || work(cancel, &tx));
        for event in rx {
            progress.handle(&event);
        }
        handle.join()
    });
    progress.finish();
    result.unwrap_or_else(|_| Err(CliError::other("Worker thread panicked")))
}
