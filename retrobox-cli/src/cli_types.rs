//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use retrobox_core::{Action, Category, Component, Emulator, Platform, Software};

#[derive(Parser)]
#[command(name = "retrobox")]
#[command(
    about = "Reconcile a pinball and retro game archive with the installed front-ends",
    long_about = None
)]
pub(crate) struct Cli {
    /// Archive root (defaults to RETROBOX_MANAGER_PATH, then the settings,
    /// then the current directory)
    #[arg(short, long, global = true)]
    pub working_path: Option<PathBuf>,

    /// Settings file (defaults to ~/.config/retrobox/settings.toml)
    #[arg(long, global = true)]
    pub settings: Option<PathBuf>,

    /// Log every file, registry and database change instead of making it
    #[arg(long, global = true)]
    pub simulate: bool,

    /// Only show warnings and errors (suppress normal output)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Write log output to a file (ANSI codes stripped)
    #[arg(long, global = true)]
    pub logfile: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// What a refresh or execute operates on.
#[derive(Args, Clone)]
pub(crate) struct SelectionArgs {
    /// Kind of item: tables, playlists, pinup_database, configs, games
    #[arg(short, long)]
    pub category: Category,

    /// install, uninstall, export, copy or edit
    #[arg(short, long)]
    pub action: Action,

    /// Pinball emulator (tables)
    #[arg(short, long)]
    pub emulator: Option<Emulator>,

    /// Platform name or alias, e.g. megadrive, snes, psx (games)
    #[arg(short, long)]
    pub platform: Option<Platform>,

    /// Front-end or scraper on the live side (games)
    #[arg(short, long)]
    pub software: Option<Software>,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Verify every item of a selection and store the resulting rows
    Refresh {
        #[command(flatten)]
        selection: SelectionArgs,

        /// Only recompute these ids; the other stored rows are kept
        #[arg(long, value_delimiter = ',')]
        only: Option<Vec<String>>,

        /// Skip the web lookup of the latest published versions
        #[arg(long)]
        offline: bool,

        /// Print the rows as JSON
        #[arg(long)]
        json: bool,
    },

    /// Apply the action of a selection to chosen items, then refresh them
    Execute {
        #[command(flatten)]
        selection: SelectionArgs,

        /// Items to process (defaults to the rows marked with `select`)
        #[arg(long, value_delimiter = ',')]
        ids: Option<Vec<String>>,

        /// Only apply these components (defaults to all of them)
        #[arg(long, value_delimiter = ',')]
        components: Vec<Component>,

        /// Record this folder name as the live folder of --platform first
        #[arg(long)]
        native_platform: Option<String>,

        /// Skip the web lookup of the latest published versions
        #[arg(long)]
        offline: bool,

        /// Print the refreshed rows as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the stored rows of a selection without recomputing them
    Rows {
        #[command(flatten)]
        selection: SelectionArgs,

        /// Print the rows as JSON
        #[arg(long)]
        json: bool,
    },

    /// Mark stored rows for the next execute
    Select {
        #[command(flatten)]
        selection: SelectionArgs,

        /// Rows to mark
        #[arg(long, value_delimiter = ',')]
        ids: Vec<String>,

        /// Mark every row
        #[arg(long, conflicts_with_all = ["red", "none"])]
        all: bool,

        /// Mark every red row
        #[arg(long, conflicts_with = "none")]
        red: bool,

        /// Clear every mark
        #[arg(long)]
        none: bool,
    },

    /// List known values and live content
    List {
        #[command(subcommand)]
        action: ListAction,
    },

    /// Run an external media transform once
    Transform {
        /// Transform tool, e.g. ffmpeg
        program: PathBuf,

        /// Tool options with {input} and {output} placeholders
        #[arg(long, allow_hyphen_values = true)]
        options: String,

        /// Input file
        input: PathBuf,

        /// Output file
        output: PathBuf,

        /// Seconds to wait for the output file
        #[arg(long, default_value_t = 600)]
        timeout: u64,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum ListAction {
    /// Categories and the actions each one supports
    Categories,

    /// Canonical platforms, or the platforms installed in a front-end
    Platforms {
        /// Front-end or scraper to inspect
        #[arg(short, long)]
        software: Option<Software>,
    },

    /// Games installed in a front-end for one platform
    Games {
        #[arg(short, long)]
        software: Software,

        #[arg(short, long)]
        platform: Platform,
    },
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Show the current settings
    Show,

    /// Print the settings file path
    Path,

    /// Set or clear an install location
    Set {
        /// working_path, pinup, an emulator (visual_pinball_x, future_pinball)
        /// or a software (batocera, launchbox, emumovies, skraper)
        name: String,

        /// New location; omit to clear it
        path: Option<PathBuf>,
    },

    /// Turn simulation on or off by default
    Simulate {
        #[arg(action = clap::ArgAction::Set)]
        enabled: bool,
    },
}
