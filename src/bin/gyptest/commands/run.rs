//! `gyptest run` command
//!
//! Runs a built executable with the backend's library search path and
//! exits with the program's status.

use anyhow::Result;

use super::{echo, open_scenario};
use crate::cli::{RunArgs, ScenarioArgs};

pub fn execute(args: RunArgs, scenario_args: &ScenarioArgs) -> Result<()> {
    let mut scenario = open_scenario(scenario_args)?;
    if args.config.is_some() {
        scenario.set_configuration(args.config.as_deref());
    }

    let invocation = scenario.run_built_executable(&args.name, &args.options())?;
    echo(&invocation.stdout, &invocation.stderr);

    if !invocation.success() {
        std::process::exit(invocation.status.unwrap_or(1));
    }

    Ok(())
}
