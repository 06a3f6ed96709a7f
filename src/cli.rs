use std::path::PathBuf;

use clap::{ArgGroup, Parser};

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "sweep", about = "Benchmark sweep over grid size x worker count with speedup charts", version)]
#[command(group(ArgGroup::new("output_mode").args(["json", "dry_run"]).multiple(false)))]
pub struct Cli {
    /// Read settings from this rc file instead of the default location.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Number of generations each simulation runs.
    #[arg(long)]
    pub generations: Option<u32>,

    /// Grid sizes to sweep, comma separated (e.g. 10,15,1000).
    #[arg(long, value_name = "LIST")]
    pub sizes: Option<String>,

    /// Worker counts to sweep in ascending order, comma separated (e.g. 4,8,16).
    #[arg(long, value_name = "LIST")]
    pub workers: Option<String>,

    /// Simulation executable.
    #[arg(long)]
    pub executable: Option<PathBuf>,

    /// Command prefix placed before the rank count (e.g. "mpiexec -n").
    ///
    /// Pass an empty string to run the executable directly with the rank
    /// count as its first argument.
    #[arg(long)]
    pub launcher: Option<String>,

    /// Directory holding `<base><size>.txt` input grids.
    #[arg(long = "input-dir")]
    pub input_dir: Option<PathBuf>,

    /// Directory the executable writes its timing artifacts under.
    #[arg(long = "output-dir")]
    pub output_dir: Option<PathBuf>,

    /// File name prefix shared by inputs and outputs.
    #[arg(long = "base-name")]
    pub base_name: Option<String>,

    /// Skip the interactive chart after the sweep.
    #[arg(long = "no-plot")]
    pub no_plot: bool,

    /// Print the aggregated measurements as JSON.
    #[arg(long)]
    pub json: bool,

    /// Discard the executable's stdout/stderr.
    #[arg(long = "quiet-runs")]
    pub quiet_runs: bool,

    /// Delete a run's artifacts before launching it so stale files from an
    /// earlier worker count can never be read.
    #[arg(long = "clear-artifacts")]
    pub clear_artifacts: bool,

    /// Print every command line of the sweep and exit without running.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }
}
