//! Command implementations

pub mod build;
pub mod check;
pub mod completions;
pub mod formats;
pub mod path;
pub mod run;
pub mod up_to_date;

use crate::cli::ScenarioArgs;
use gyptest::{Format, Scenario, VerifyError};

/// Open a scenario over the current directory.
///
/// The generated build files are expected to be there already, so nothing
/// is staged and no temporary directory is made.
pub fn open_scenario(args: &ScenarioArgs) -> Result<Scenario, VerifyError> {
    let cwd = std::env::current_dir()?;
    let mut builder = Scenario::builder()
        .cwd(&cwd)
        .workdir(&cwd)
        .formats(args.valid_formats.iter().cloned());
    if let Some(name) = args.format.as_deref() {
        let format: Format = name
            .parse()
            .map_err(|_| VerifyError::UnknownFormat(name.to_string()))?;
        builder = builder.format(format);
    }
    builder.build()
}

/// Echo captured output the way the tool printed it.
pub fn echo(stdout: &str, stderr: &str) {
    print!("{}", stdout);
    eprint!("{}", stderr);
}
