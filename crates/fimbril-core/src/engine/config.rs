use crate::core::models::params::{GridSpec, SystemParameters};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Invalid value for {name}: {reason}")]
    InvalidParameter {
        name: &'static str,
        reason: String,
    },

    #[error("A {rows}x{cols} anchor grid cannot hold {chains} chains")]
    GridTooSmall {
        rows: usize,
        cols: usize,
        chains: usize,
    },

    #[error("A collection of {chains} chains requires a grafting surface")]
    UngraftedCollection { chains: usize },
}

/// Debye scattering options: the q grid and the coordinate scale factor
/// applied before the sum (the output grid itself stays unscaled).
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ScatteringConfig {
    pub q_max: f64,
    pub q_count: usize,
    #[serde(default = "default_dist_scale")]
    pub dist_scale: f64,
}

fn default_dist_scale() -> f64 {
    1.0
}

/// Complete, validated configuration of one simulation run.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    pub system: SystemParameters,
    pub grid: Option<GridSpec>,
    pub steps: u64,
    pub step_size: f64,
    pub ramps: u32,
    pub output_freq: u64,
    pub scattering: Option<ScatteringConfig>,
}

#[derive(Default)]
pub struct SimulationConfigBuilder {
    chains: Option<usize>,
    length: Option<usize>,
    box_side: Option<f64>,
    max_bend_angle: Option<f64>,
    beta: Option<f64>,
    surface: bool,
    grid: Option<GridSpec>,
    steps: Option<u64>,
    step_size: Option<f64>,
    ramps: Option<u32>,
    output_freq: Option<u64>,
    scattering: Option<ScatteringConfig>,
}

impl SimulationConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chains(mut self, chains: usize) -> Self {
        self.chains = Some(chains);
        self
    }
    pub fn length(mut self, length: usize) -> Self {
        self.length = Some(length);
        self
    }
    pub fn box_side(mut self, box_side: f64) -> Self {
        self.box_side = Some(box_side);
        self
    }
    /// Maximum bend angle in radians.
    pub fn max_bend_angle(mut self, angle: f64) -> Self {
        self.max_bend_angle = Some(angle);
        self
    }
    pub fn beta(mut self, beta: f64) -> Self {
        self.beta = Some(beta);
        self
    }
    pub fn surface(mut self, surface: bool) -> Self {
        self.surface = surface;
        self
    }
    pub fn grid(mut self, grid: Option<GridSpec>) -> Self {
        self.grid = grid;
        self
    }
    pub fn steps(mut self, steps: u64) -> Self {
        self.steps = Some(steps);
        self
    }
    pub fn step_size(mut self, step_size: f64) -> Self {
        self.step_size = Some(step_size);
        self
    }
    pub fn ramps(mut self, ramps: u32) -> Self {
        self.ramps = Some(ramps);
        self
    }
    pub fn output_freq(mut self, output_freq: u64) -> Self {
        self.output_freq = Some(output_freq);
        self
    }
    pub fn scattering(mut self, scattering: Option<ScatteringConfig>) -> Self {
        self.scattering = scattering;
        self
    }

    pub fn build(self) -> Result<SimulationConfig, ConfigError> {
        let chains = self.chains.ok_or(ConfigError::MissingParameter("chains"))?;
        let length = self.length.ok_or(ConfigError::MissingParameter("length"))?;
        let box_side = self
            .box_side
            .ok_or(ConfigError::MissingParameter("box_side"))?;
        let max_bend_angle = self
            .max_bend_angle
            .ok_or(ConfigError::MissingParameter("max_bend_angle"))?;
        let beta = self.beta.ok_or(ConfigError::MissingParameter("beta"))?;
        let steps = self.steps.ok_or(ConfigError::MissingParameter("steps"))?;
        let step_size = self.step_size.unwrap_or(1.0);
        let ramps = self.ramps.unwrap_or(0);
        let output_freq = self.output_freq.unwrap_or(10);

        if chains == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "chains",
                reason: "at least one chain is required".into(),
            });
        }
        if length < 2 {
            return Err(ConfigError::InvalidParameter {
                name: "length",
                reason: "a chain needs at least two beads".into(),
            });
        }
        if !(box_side >= 0.0 && box_side.is_finite()) {
            return Err(ConfigError::InvalidParameter {
                name: "box_side",
                reason: format!("must be a finite non-negative length, got {box_side}"),
            });
        }
        if !(max_bend_angle >= 0.0) {
            return Err(ConfigError::InvalidParameter {
                name: "max_bend_angle",
                reason: format!("must be a non-negative angle, got {max_bend_angle}"),
            });
        }
        if beta < 0.0 {
            return Err(ConfigError::InvalidParameter {
                name: "beta",
                reason: format!("bond strength cannot be negative, got {beta}"),
            });
        }
        if !(step_size > 0.0 && step_size <= 1.0) {
            return Err(ConfigError::InvalidParameter {
                name: "step_size",
                reason: format!("must lie in (0, 1], got {step_size}"),
            });
        }
        if output_freq == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "output_freq",
                reason: "sampling cadence must be positive".into(),
            });
        }
        if chains > 1 && !self.surface {
            return Err(ConfigError::UngraftedCollection { chains });
        }
        if let Some(grid) = self.grid {
            if grid.capacity() < chains {
                return Err(ConfigError::GridTooSmall {
                    rows: grid.rows,
                    cols: grid.cols,
                    chains,
                });
            }
        }
        if let Some(sc) = &self.scattering {
            if sc.q_count == 0 {
                return Err(ConfigError::InvalidParameter {
                    name: "q_count",
                    reason: "the q grid needs at least one point".into(),
                });
            }
            if !(sc.q_max >= 0.0) {
                return Err(ConfigError::InvalidParameter {
                    name: "q_max",
                    reason: format!("must be non-negative, got {}", sc.q_max),
                });
            }
            if !(sc.dist_scale > 0.0) {
                return Err(ConfigError::InvalidParameter {
                    name: "dist_scale",
                    reason: format!("must be positive, got {}", sc.dist_scale),
                });
            }
        }

        Ok(SimulationConfig {
            system: SystemParameters {
                chains,
                length,
                box_side,
                max_bend_angle,
                beta,
                surface: self.surface,
            },
            grid: self.grid,
            steps,
            step_size,
            ramps,
            output_freq,
            scattering: self.scattering,
        })
    }
}
