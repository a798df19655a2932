use crate::cli::RunArgs;
use crate::error::{CliError, Result};
use fimbril::core::models::params::GridSpec;
use fimbril::engine::config::{ScatteringConfig, SimulationConfig, SimulationConfigBuilder};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Built-in defaults, applied when neither a flag nor the configuration
/// file supplies a value.
mod defaults {
    pub const CHAINS: usize = 1;
    pub const LENGTH: usize = 50;
    pub const BOX_SIDE: f64 = 10.0;
    pub const MAX_ANGLE_DEGREES: f64 = 90.0;
    pub const BETA: f64 = 0.0;
    pub const STEP_SIZE: f64 = 1.0;
    pub const RAMPS: u32 = 0;
    pub const STEPS: u64 = 1000;
    pub const OUTPUT_FREQ: u64 = 10;
    pub const OUTPUT_BASE: &str = "out";
    pub const DEBYE_MAX: f64 = 0.5;
    pub const DEBYE_N: usize = 51;
    pub const DEBYE_DIST: f64 = 1.0;
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub system: SystemSection,
    #[serde(default)]
    pub run: RunSection,
    pub scattering: Option<ScatteringConfig>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct SystemSection {
    pub chains: Option<usize>,
    pub grid: Option<GridSpec>,
    pub length: Option<usize>,
    pub box_side: Option<f64>,
    /// Degrees, like the command line.
    pub max_angle: Option<f64>,
    pub beta: Option<f64>,
    pub surface: Option<bool>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct RunSection {
    pub steps: Option<u64>,
    pub step_size: Option<f64>,
    pub ramps: Option<u32>,
    pub output: Option<PathBuf>,
    pub output_freq: Option<u64>,
    pub seed: Option<u64>,
}

/// Everything the `run` command needs, fully resolved.
#[derive(Debug)]
pub struct AppConfig {
    pub simulation: SimulationConfig,
    pub output: PathBuf,
    pub append: bool,
    pub seed: Option<u64>,
}

pub fn load_file(path: &Path) -> Result<FileConfig> {
    let text = std::fs::read_to_string(path)?;
    let config = toml::from_str(&text).map_err(|source| CliError::FileParsing {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), "Loaded configuration file.");
    Ok(config)
}

/// Merges command-line arguments over file values over built-in defaults
/// and validates the result through the core builder.
pub fn resolve(args: &RunArgs, file: FileConfig) -> Result<AppConfig> {
    let (cli_chains, cli_grid) = match &args.chains {
        Some(spec) => {
            let (chains, grid) = parse_chain_spec(spec)?;
            (Some(chains), grid)
        }
        None => (None, None),
    };
    let chains = cli_chains.or(file.system.chains).unwrap_or(defaults::CHAINS);
    let grid = cli_grid.or(file.system.grid);
    let max_angle_degrees = args
        .max_angle
        .or(file.system.max_angle)
        .unwrap_or(defaults::MAX_ANGLE_DEGREES);
    let surface = args.surface || file.system.surface.unwrap_or(false);

    let scattering = if args.debye || file.scattering.is_some() {
        let base = file.scattering;
        Some(ScatteringConfig {
            q_max: args
                .debye_max
                .or(base.map(|s| s.q_max))
                .unwrap_or(defaults::DEBYE_MAX),
            q_count: args
                .debye_n
                .or(base.map(|s| s.q_count))
                .unwrap_or(defaults::DEBYE_N),
            dist_scale: args
                .debye_dist
                .or(base.map(|s| s.dist_scale))
                .unwrap_or(defaults::DEBYE_DIST),
        })
    } else {
        None
    };

    let simulation = SimulationConfigBuilder::new()
        .chains(chains)
        .length(args.length.or(file.system.length).unwrap_or(defaults::LENGTH))
        .box_side(
            args.box_side
                .or(file.system.box_side)
                .unwrap_or(defaults::BOX_SIDE),
        )
        .max_bend_angle(max_angle_degrees.to_radians())
        .beta(args.beta.or(file.system.beta).unwrap_or(defaults::BETA))
        .surface(surface)
        .grid(grid)
        .steps(args.steps.or(file.run.steps).unwrap_or(defaults::STEPS))
        .step_size(
            args.step_size
                .or(file.run.step_size)
                .unwrap_or(defaults::STEP_SIZE),
        )
        .ramps(args.ramps.or(file.run.ramps).unwrap_or(defaults::RAMPS))
        .output_freq(
            args.output_freq
                .or(file.run.output_freq)
                .unwrap_or(defaults::OUTPUT_FREQ),
        )
        .scattering(scattering)
        .build()?;

    Ok(AppConfig {
        simulation,
        output: args
            .output
            .clone()
            .or(file.run.output)
            .unwrap_or_else(|| defaults::OUTPUT_BASE.into()),
        append: args.append,
        seed: args.seed.or(file.run.seed),
    })
}

/// A chain specifier is either a plain count or an `MxN` grid of anchor
/// sites, which implies the chain count.
fn parse_chain_spec(spec: &str) -> Result<(usize, Option<GridSpec>)> {
    let invalid = || CliError::Argument(format!("invalid chain specifier {spec:?}"));
    match spec.split_once(['x', 'X']) {
        Some((rows, cols)) => {
            let rows: usize = rows.trim().parse().map_err(|_| invalid())?;
            let cols: usize = cols.trim().parse().map_err(|_| invalid())?;
            if rows == 0 || cols == 0 {
                return Err(invalid());
            }
            Ok((rows * cols, Some(GridSpec { rows, cols })))
        }
        None => {
            let chains = spec.trim().parse().map_err(|_| invalid())?;
            Ok((chains, None))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_specifier_accepts_counts_and_grids() {
        assert_eq!(parse_chain_spec("7").unwrap(), (7, None));
        assert_eq!(
            parse_chain_spec("3x4").unwrap(),
            (12, Some(GridSpec { rows: 3, cols: 4 }))
        );
        assert!(parse_chain_spec("3x").is_err());
        assert!(parse_chain_spec("0x4").is_err());
        assert!(parse_chain_spec("many").is_err());
    }

    #[test]
    fn built_in_defaults_match_the_documented_ones() {
        let app = resolve(&RunArgs::default(), FileConfig::default()).unwrap();
        assert_eq!(app.simulation.system.chains, 1);
        assert_eq!(app.simulation.system.length, 50);
        assert_eq!(app.simulation.system.box_side, 10.0);
        assert!((app.simulation.system.max_bend_angle - 90f64.to_radians()).abs() < 1e-12);
        assert_eq!(app.simulation.steps, 1000);
        assert_eq!(app.simulation.output_freq, 10);
        assert_eq!(app.output, PathBuf::from("out"));
        assert!(app.simulation.scattering.is_none());
    }

    #[test]
    fn file_values_override_defaults_and_flags_override_the_file() {
        let file: FileConfig = toml::from_str(
            r#"
            [system]
            chains = 4
            grid = { rows = 2, cols = 2 }
            length = 30
            beta = 1.25
            surface = true

            [run]
            steps = 5000
            output = "fibers"

            [scattering]
            q-max = 0.8
            q-count = 41
            "#,
        )
        .unwrap();

        let args = RunArgs {
            beta: Some(2.0),
            ..RunArgs::default()
        };
        let app = resolve(&args, file).unwrap();
        assert_eq!(app.simulation.system.chains, 4);
        assert_eq!(app.simulation.system.length, 30);
        assert_eq!(app.simulation.system.beta, 2.0);
        assert!(app.simulation.system.surface);
        assert_eq!(app.simulation.grid, Some(GridSpec { rows: 2, cols: 2 }));
        assert_eq!(app.simulation.steps, 5000);
        assert_eq!(app.output, PathBuf::from("fibers"));

        let scattering = app.simulation.scattering.unwrap();
        assert_eq!(scattering.q_max, 0.8);
        assert_eq!(scattering.q_count, 41);
        assert_eq!(scattering.dist_scale, 1.0);
    }

    #[test]
    fn grid_specifier_on_the_command_line_beats_the_file_grid() {
        let file: FileConfig = toml::from_str(
            r#"
            [system]
            grid = { rows = 5, cols = 5 }
            surface = true
            "#,
        )
        .unwrap();
        let args = RunArgs {
            chains: Some("2x3".into()),
            surface: true,
            ..RunArgs::default()
        };
        let app = resolve(&args, file).unwrap();
        assert_eq!(app.simulation.system.chains, 6);
        assert_eq!(app.simulation.grid, Some(GridSpec { rows: 2, cols: 3 }));
    }

    #[test]
    fn invalid_merged_configuration_is_rejected_by_the_core_builder() {
        let args = RunArgs {
            chains: Some("3".into()),
            ..RunArgs::default()
        };
        // Three chains without a surface make no sense.
        let result = resolve(&args, FileConfig::default());
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn configuration_file_loads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.toml");
        std::fs::write(&path, "[run]\nsteps = 42\nseed = 7\n").unwrap();
        let file = load_file(&path).unwrap();
        assert_eq!(file.run.steps, Some(42));
        assert_eq!(file.run.seed, Some(7));

        let missing = load_file(&dir.path().join("absent.toml"));
        assert!(matches!(missing, Err(CliError::Io(_))));
    }

    #[test]
    fn unknown_file_keys_are_rejected() {
        let parsed: std::result::Result<FileConfig, _> = toml::from_str(
            r#"
            [system]
            chian-count = 3
            "#,
        );
        assert!(parsed.is_err());
    }
}
