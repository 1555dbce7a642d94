//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use gyptest::{ArtifactKind, BuildOptions, RunOptions, SymRoot, Target};

/// gyptest - verify gyp-generated builds across native build tools
#[derive(Parser)]
#[command(name = "gyptest")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(flatten)]
    pub scenario: ScenarioArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Flags shared by every command that opens a scenario.
#[derive(Args)]
pub struct ScenarioArgs {
    /// Output format under test
    #[arg(short, long, global = true, env = "TESTGYP_FORMAT")]
    pub format: Option<String>,

    /// Formats the scenario applies to; `!name` excludes one
    #[arg(long, global = true, value_delimiter = ',')]
    pub valid_formats: Vec<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List every format and how its build tool resolved
    Formats(FormatsArgs),

    /// Check that one format's build tool is available
    Check(CheckArgs),

    /// Build a generated project in the current directory
    Build(BuildArgs),

    /// Build again and verify that nothing was done
    UpToDate(BuildArgs),

    /// Print where a built artifact lands
    Path(PathArgs),

    /// Run a built executable
    Run(RunArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct FormatsArgs {
    /// Emit JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct CheckArgs {
    /// Format to check
    pub format: String,
}

#[derive(Args)]
pub struct BuildArgs {
    /// Project file the build files were generated from
    pub project: PathBuf,

    /// Specific target to build
    #[arg(long, conflicts_with = "all")]
    pub target: Option<String>,

    /// Build every target
    #[arg(long)]
    pub all: bool,

    /// Build configuration
    #[arg(long)]
    pub config: Option<String>,

    /// Subdirectory to build in
    #[arg(long)]
    pub chdir: Option<PathBuf>,

    /// Rebuild instead of build (msvs only)
    #[arg(long)]
    pub rebuild: bool,

    /// Xcode SYMROOT; empty to omit
    #[arg(long)]
    pub symroot: Option<String>,

    /// Extra argument for the build tool
    #[arg(long = "arg", allow_hyphen_values = true)]
    pub arguments: Vec<String>,
}

impl BuildArgs {
    /// Target selection from the flags.
    pub fn target(&self) -> Target {
        match (&self.target, self.all) {
            (Some(name), _) => Target::named(name.as_str()),
            (None, true) => Target::All,
            (None, false) => Target::Default,
        }
    }

    /// Build options from the flags.
    pub fn options(&self) -> BuildOptions {
        let mut opts = BuildOptions::new().with_rebuild(self.rebuild);
        if let Some(chdir) = &self.chdir {
            opts = opts.with_chdir(chdir);
        }
        if let Some(symroot) = &self.symroot {
            opts = opts.with_symroot(SymRoot::from_value(symroot.as_str()));
        }
        for arg in &self.arguments {
            opts = opts.with_arg(arg.as_str());
        }
        opts
    }
}

#[derive(Args)]
pub struct PathArgs {
    /// Base name of the artifact
    pub name: String,

    /// Artifact kind: exe, static, shared, or file
    #[arg(long, default_value = "exe")]
    pub kind: ArtifactKind,

    /// Build configuration
    #[arg(long)]
    pub config: Option<String>,

    /// Source subdirectory the artifact was built under
    #[arg(long)]
    pub chdir: Option<PathBuf>,

    /// Library subdirectory override
    #[arg(long)]
    pub libdir: Option<String>,

    /// Skip platform prefixes and suffixes
    #[arg(long)]
    pub bare: bool,
}

#[derive(Args)]
pub struct RunArgs {
    /// Base name of the executable
    pub name: String,

    /// Build configuration
    #[arg(long)]
    pub config: Option<String>,

    /// Subdirectory the executable was built under
    #[arg(long)]
    pub chdir: Option<PathBuf>,

    /// Arguments for the executable
    #[arg(last = true)]
    pub args: Vec<String>,
}

impl RunArgs {
    /// Run options from the flags.
    pub fn options(&self) -> RunOptions {
        let opts = RunOptions::new().with_args(&self.args);
        match &self.chdir {
            Some(chdir) => opts.with_chdir(chdir),
            None => opts,
        }
    }
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}
