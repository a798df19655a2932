use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Fimbril CLI - Metropolis Monte Carlo simulation of surface-grafted bead-chain fibers with small-angle scattering analysis.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads for the parallel geometry check.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a Metropolis simulation of self-avoiding bead-chain fibers.
    Run(RunArgs),
}

/// Arguments for the `run` subcommand. Every value can also come from a
/// TOML configuration file; flags given here win.
#[derive(Args, Debug, Default)]
pub struct RunArgs {
    // --- System ---
    /// Number of chains, or an `MxN` grid of anchor sites on the surface.
    #[arg(short = 'n', long, value_name = "N|MxN")]
    pub chains: Option<String>,

    /// Beads per chain; the contour length is one bead fewer.
    #[arg(short, long, value_name = "INT")]
    pub length: Option<usize>,

    /// Side length of the square grafting box; 0 disables lateral bounds.
    #[arg(short, long, value_name = "FLOAT")]
    pub box_side: Option<f64>,

    /// Maximum bend angle at each bead in degrees, where 0 keeps every
    /// chain a straight rod.
    #[arg(long, value_name = "DEG")]
    pub max_angle: Option<f64>,

    /// Effective bond strength, energy / (kT); the bond well width is 0.2.
    #[arg(long, value_name = "FLOAT")]
    pub beta: Option<f64>,

    /// Graft the chains on a hard but inert surface.
    #[arg(long)]
    pub surface: bool,

    // --- Sampling ---
    /// Number of proposals to run, counting rejected ones.
    #[arg(short, long, value_name = "INT")]
    pub steps: Option<u64>,

    /// Scale factor in (0, 1] for the size of random rotation steps.
    #[arg(long, value_name = "FLOAT")]
    pub step_size: Option<f64>,

    /// Ramp beta up from zero this many times for simulated annealing;
    /// after each ramp, beta holds for an equal duration.
    #[arg(long, value_name = "INT")]
    pub ramps: Option<u32>,

    /// Seed for the random stream; omit to seed from entropy.
    #[arg(long, value_name = "INT")]
    pub seed: Option<u64>,

    // --- Output ---
    /// Base name of the output files.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Produce output every this many accepted steps.
    #[arg(long, value_name = "INT")]
    pub output_freq: Option<u64>,

    /// Continue the existing simulation under the same output base name,
    /// which must match the other settings.
    #[arg(long)]
    pub append: bool,

    // --- Scattering ---
    /// Calculate a Debye scattering curve at every output.
    #[arg(long)]
    pub debye: bool,

    /// Maximum q value for the scattering grid.
    #[arg(long, value_name = "FLOAT")]
    pub debye_max: Option<f64>,

    /// Number of q values for the scattering grid.
    #[arg(long, value_name = "INT")]
    pub debye_n: Option<usize>,

    /// Scaling factor applied to coordinates in the scattering sum only;
    /// output coordinates are unaffected.
    #[arg(long, value_name = "FLOAT")]
    pub debye_dist: Option<f64>,

    // --- Configuration file ---
    /// Run configuration file in TOML format; flags override its values.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn run_arguments_parse() {
        let cli = Cli::parse_from([
            "fimbril", "run", "-n", "3x4", "--surface", "--beta", "1.5", "--steps", "5000",
            "--debye",
        ]);
        let Commands::Run(args) = cli.command;
        assert_eq!(args.chains.as_deref(), Some("3x4"));
        assert!(args.surface);
        assert_eq!(args.beta, Some(1.5));
        assert_eq!(args.steps, Some(5000));
        assert!(args.debye);
        assert!(args.config.is_none());
    }
}
