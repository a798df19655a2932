use super::params::{GridSpec, SystemParameters};
use crate::core::validation::{self, Validation};
use nalgebra::{Point3, Rotation3};
use rand::Rng;
use thiserror::Error;
use tracing::{debug, trace};

/// Retry cap for random initial placement. The source of this model retried
/// forever; a bounded cap turns an infeasible parameter combination into a
/// diagnosable failure instead of a hang.
const MAX_PLACEMENT_ATTEMPTS: usize = 10_000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EnsembleError {
    #[error("No saved coordinate snapshot to restore")]
    NoSnapshot,

    #[error("Failed to place a valid initial arrangement after {attempts} attempts")]
    PlacementExhausted { attempts: usize },

    #[error("A {rows}x{cols} anchor grid cannot hold {chains} chains")]
    GridTooSmall {
        rows: usize,
        cols: usize,
        chains: usize,
    },

    #[error(
        "Coordinate set holds {got_chains} chains of {got_length} beads, expected {chains} of {length}"
    )]
    ShapeMismatch {
        chains: usize,
        length: usize,
        got_chains: usize,
        got_length: usize,
    },
}

/// The full mutable simulation state: every bead position of every chain,
/// plus a single-slot rollback snapshot.
///
/// Bead order within a chain is semantically load-bearing: consecutive
/// beads define backbone bonds, and bead 0 is the anchor that never moves
/// during a proposal. The snapshot in `previous` is valid only between a
/// [`snapshot`](Self::snapshot) and the next one; proposing a new move
/// overwrites it.
#[derive(Debug, Clone)]
pub struct ChainEnsemble {
    params: SystemParameters,
    coords: Vec<Vec<Point3<f64>>>,
    previous: Option<Vec<Vec<Point3<f64>>>>,
}

impl ChainEnsemble {
    /// Adopts an existing coordinate set, e.g. the last frame of a prior
    /// trajectory. No geometric validity check is run; resumed state is
    /// trusted.
    ///
    /// # Errors
    ///
    /// Returns [`EnsembleError::ShapeMismatch`] if the coordinate set does
    /// not match the parameters' chain count and length.
    pub fn from_coords(
        params: SystemParameters,
        coords: Vec<Vec<Point3<f64>>>,
    ) -> Result<Self, EnsembleError> {
        let got_chains = coords.len();
        let got_length = coords.first().map_or(0, Vec::len);
        if got_chains != params.chains || coords.iter().any(|c| c.len() != params.length) {
            return Err(EnsembleError::ShapeMismatch {
                chains: params.chains,
                length: params.length,
                got_chains,
                got_length,
            });
        }
        Ok(Self {
            params,
            coords,
            previous: None,
        })
    }

    /// Places straight rods at random (or grid) anchor positions and
    /// retries from scratch until the geometry checker accepts the
    /// arrangement.
    ///
    /// Each chain starts as a straight rod along z: every bead shares the
    /// anchor's (x, y), with z at half-integer offsets 0.5, 1.5, and so on,
    /// giving exact unit backbone spacing.
    ///
    /// # Errors
    ///
    /// Returns [`EnsembleError::GridTooSmall`] if a grid with fewer sites
    /// than chains is requested, or [`EnsembleError::PlacementExhausted`]
    /// once the retry cap is reached.
    pub fn random(
        params: SystemParameters,
        grid: Option<GridSpec>,
        rng: &mut impl Rng,
    ) -> Result<Self, EnsembleError> {
        if let Some(g) = grid {
            if g.capacity() < params.chains {
                return Err(EnsembleError::GridTooSmall {
                    rows: g.rows,
                    cols: g.cols,
                    chains: params.chains,
                });
            }
        }

        for attempt in 1..=MAX_PLACEMENT_ATTEMPTS {
            let anchors = match grid {
                Some(g) => grid_anchors(g, params.box_side),
                None => (0..params.chains)
                    .map(|_| {
                        (
                            rng.gen_range(0.0..1.0) * params.box_side,
                            rng.gen_range(0.0..1.0) * params.box_side,
                        )
                    })
                    .collect(),
            };
            let coords: Vec<Vec<Point3<f64>>> = anchors
                .into_iter()
                .take(params.chains)
                .map(|(x, y)| {
                    (0..params.length)
                        .map(|i| Point3::new(x, y, 0.5 + i as f64))
                        .collect()
                })
                .collect();

            let candidate = Self {
                params,
                coords,
                previous: None,
            };
            if candidate.validate().is_valid() {
                debug!(attempt, "Initial arrangement of chains placed.");
                return Ok(candidate);
            }
            trace!(attempt, "Initial arrangement rejected, retrying.");
        }

        Err(EnsembleError::PlacementExhausted {
            attempts: MAX_PLACEMENT_ATTEMPTS,
        })
    }

    pub fn params(&self) -> &SystemParameters {
        &self.params
    }

    /// Bead coordinates, one ordered sequence per chain.
    pub fn coords(&self) -> &[Vec<Point3<f64>>] {
        &self.coords
    }

    pub fn chain(&self, index: usize) -> &[Point3<f64>] {
        &self.coords[index]
    }

    /// All bead positions across all chains, flattened in chain order.
    pub fn positions(&self) -> Vec<Point3<f64>> {
        self.coords.iter().flatten().copied().collect()
    }

    /// Runs the geometry checker against the current coordinates.
    pub fn validate(&self) -> Validation {
        validation::check(self)
    }

    /// Copies the full coordinate set into the rollback slot, replacing any
    /// earlier snapshot.
    pub fn snapshot(&mut self) {
        self.previous = Some(self.coords.clone());
    }

    /// Restores the coordinates saved by the last [`snapshot`](Self::snapshot)
    /// and consumes it.
    ///
    /// # Errors
    ///
    /// Returns [`EnsembleError::NoSnapshot`] if no snapshot is pending.
    /// The driver treats that as a fatal invariant violation.
    pub fn rollback(&mut self) -> Result<(), EnsembleError> {
        self.coords = self.previous.take().ok_or(EnsembleError::NoSnapshot)?;
        Ok(())
    }

    /// Rigidly rotates every bead beyond `pivot` in one chain about the
    /// pivot bead's position. Beads at or before the pivot are untouched,
    /// so all backbone bond lengths are preserved exactly.
    pub fn rotate_tail(&mut self, chain: usize, pivot: usize, rotation: &Rotation3<f64>) {
        let beads = &mut self.coords[chain];
        let origin = beads[pivot];
        for bead in beads.iter_mut().skip(pivot + 1) {
            *bead = origin + rotation * (*bead - origin);
        }
    }
}

/// Anchor sites of a regular lattice spanning the box, traversed row by
/// row with x varying fastest.
fn grid_anchors(grid: GridSpec, box_side: f64) -> Vec<(f64, f64)> {
    let site = |index: usize, count: usize| {
        index as f64 * box_side / count as f64 + box_side / (2.0 * (count as f64 + 1.0))
    };
    let mut anchors = Vec::with_capacity(grid.capacity());
    for j in 0..grid.cols {
        for i in 0..grid.rows {
            anchors.push((site(i, grid.rows), site(j, grid.cols)));
        }
    }
    anchors
}
