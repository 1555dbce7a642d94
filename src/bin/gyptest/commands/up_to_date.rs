//! `gyptest up-to-date` command
//!
//! Builds again and fails, with the captured output, if anything was done.

use anyhow::Result;

use super::open_scenario;
use crate::cli::{BuildArgs, ScenarioArgs};

pub fn execute(args: BuildArgs, scenario_args: &ScenarioArgs) -> Result<()> {
    let mut scenario = open_scenario(scenario_args)?;
    if args.config.is_some() {
        scenario.set_configuration(args.config.as_deref());
    }

    let invocation = scenario.up_to_date(&args.project, &args.target(), &args.options())?;
    tracing::info!("Up to date: {}", invocation.command);

    Ok(())
}
