//! `gyptest build` command
//!
//! Runs one build of generated files in the current directory and exits
//! with the build tool's status.

use anyhow::Result;

use super::{echo, open_scenario};
use crate::cli::{BuildArgs, ScenarioArgs};

pub fn execute(args: BuildArgs, scenario_args: &ScenarioArgs) -> Result<()> {
    let mut scenario = open_scenario(scenario_args)?;
    if args.config.is_some() {
        scenario.set_configuration(args.config.as_deref());
    }

    let invocation = scenario.build(&args.project, &args.target(), &args.options())?;
    echo(&invocation.stdout, &invocation.stderr);

    if !invocation.success() {
        tracing::debug!("`{}` exited with {:?}", invocation.command, invocation.status);
        std::process::exit(invocation.status.unwrap_or(1));
    }

    Ok(())
}
