use std::path::Path;
use std::time::Duration;

use retrobox_lib::{FileOps, TransformRequest, TransformRunner};

use crate::error::CliError;
use crate::session::{Session, run_in_background};

/// Run one media transform, e.g. an ffmpeg re-encode of a table video.
pub(crate) fn run_transform(
    session: &Session,
    program: &Path,
    options: &str,
    input: &Path,
    output: &Path,
    timeout: u64,
) -> Result<(), CliError> {
    if !input.is_file() {
        return Err(CliError::other(format!("Input file not found: {}", input.display())));
    }
    let runner = TransformRunner::new(program).with_timeout(Duration::from_secs(timeout));
    let request = TransformRequest::new(options, input, output);
    let files = FileOps::new(session.simulate);
    let label = format!("Transforming {}", input.display());

    let produced = run_in_background(session.quiet, &label, |cancel, _| {
        Ok(runner.run(&request, &files, cancel)?)
    })?;
    if produced {
        log::info!("Wrote {}", output.display());
        Ok(())
    } else {
        Err(CliError::other(format!(
            "{} did not produce {}",
            program.display(),
            output.display()
        )))
    }
}
