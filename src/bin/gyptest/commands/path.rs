//! `gyptest path` command

use anyhow::Result;

use super::open_scenario;
use crate::cli::{PathArgs, ScenarioArgs};
use gyptest::ArtifactSpec;

pub fn execute(args: PathArgs, scenario_args: &ScenarioArgs) -> Result<()> {
    let mut scenario = open_scenario(scenario_args)?;
    if args.config.is_some() {
        scenario.set_configuration(args.config.as_deref());
    }

    let mut artifact = ArtifactSpec::new(args.name, args.kind)
        .with_chdir(args.chdir)
        .with_bare(args.bare);
    if let Some(libdir) = args.libdir {
        artifact = artifact.with_libdir(libdir);
    }

    println!("{}", scenario.built_file_path(&artifact).display());
    Ok(())
}
