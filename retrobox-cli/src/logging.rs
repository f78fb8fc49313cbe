//! Logger setup: plain messages on stderr, optionally mirrored to a file
//! with the ANSI codes stripped.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use env_logger::{Builder, Target};
use log::{Level, LevelFilter};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stderr;

use crate::error::CliError;

/// Install the global logger.
///
/// `quiet` keeps warnings and errors only; `verbose` adds debug messages
/// and timestamps. `RUST_LOG` still overrides the level per module.
pub(crate) fn init(quiet: bool, verbose: bool, logfile: Option<&Path>) -> Result<(), CliError> {
    let level = if quiet {
        LevelFilter::Warn
    } else if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let file = logfile.map(File::create).transpose()?;

    let mut builder = Builder::new();
    builder
        .filter_level(level)
        .parse_default_env()
        .target(Target::Pipe(Box::new(Tee { file })))
        .format(move |buf, record| {
            let level = match record.level() {
                Level::Error => format!("{}", "error".if_supports_color(Stderr, |t| t.red())),
                Level::Warn => format!("{}", "warning".if_supports_color(Stderr, |t| t.yellow())),
                Level::Info => String::new(),
                Level::Debug => format!("{}", "debug".if_supports_color(Stderr, |t| t.dimmed())),
                Level::Trace => format!("{}", "trace".if_supports_color(Stderr, |t| t.dimmed())),
            };
            if verbose {
                writeln!(
                    buf,
                    "{} {:<7} {}",
                    chrono::Local::now().format("%H:%M:%S%.3f"),
                    level,
                    record.args()
                )
            } else if level.is_empty() {
                writeln!(buf, "{}", record.args())
            } else {
                writeln!(buf, "{}: {}", level, record.args())
            }
        });
    builder
        .try_init()
        .map_err(|e| CliError::other(format!("Cannot install logger: {e}")))
}

/// Writes every log line to stderr and, when set, to the log file.
struct Tee {
    file: Option<File>,
}

impl Write for Tee {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stderr().write_all(buf)?;
        if let Some(file) = &mut self.file {
            file.write_all(&strip_ansi_escapes::strip(buf))?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()?;
        if let Some(file) = &mut self.file {
            file.flush()?;
        }
        Ok(())
    }
}
