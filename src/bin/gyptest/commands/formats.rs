//! `gyptest formats` command
//!
//! Lists every format with its build tool and how the tool resolved.

use anyhow::Result;

use crate::cli::FormatsArgs;
use gyptest::builder::shim::get_backend_summaries;
use gyptest::{Config, ToolLocator};

pub fn execute(args: FormatsArgs) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let config = Config::discover(&cwd)?;
    let summaries = get_backend_summaries(&ToolLocator::from_env(), &config);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    println!("Formats:");
    println!();

    for summary in summaries {
        let status = if summary.is_available() {
            "available"
        } else {
            "unavailable"
        };

        println!("  {} - {}", summary.format, summary.description);
        println!("    Status:     {}", status);
        println!("    Tool:       {}", summary.tool);
        match summary.resolution.path() {
            Some(path) => println!(
                "    Resolved:   {} ({})",
                path.display(),
                summary.resolution.label()
            ),
            None => println!("    Resolved:   {}", summary.resolution.label()),
        }
        if let Some(generation) = summary.generation {
            println!("    Generation: {}", generation);
        }
        println!();
    }

    Ok(())
}
