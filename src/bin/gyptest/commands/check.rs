//! `gyptest check` command
//!
//! Resolves one format's build tool and fails if it is unavailable.

use anyhow::Result;

use crate::cli::CheckArgs;
use gyptest::builder::shim::BackendSummary;
use gyptest::{Backend, Config, Format, ToolLocator, VerifyError};

pub fn execute(args: CheckArgs) -> Result<()> {
    let format: Format = args
        .format
        .parse()
        .map_err(|_| VerifyError::UnknownFormat(args.format.clone()))?;

    let cwd = std::env::current_dir()?;
    let config = Config::discover(&cwd)?;
    let locator = ToolLocator::from_env();

    let backend = Backend::select(format, &locator, &config)?;
    let summary = BackendSummary::from_backend(&backend);

    if !summary.is_available() {
        let searched = summary
            .resolution
            .path()
            .map(|p| vec![p.to_path_buf()])
            .unwrap_or_default();
        return Err(VerifyError::ToolNotFound {
            format,
            tool: summary.tool.to_string(),
            searched,
        }
        .into());
    }

    match summary.resolution.path() {
        Some(path) => println!(
            "{}: {} ({}, {})",
            format,
            path.display(),
            summary.tool,
            summary.resolution.label()
        ),
        None => println!("{}: no build tool needed", format),
    }

    Ok(())
}
