use crate::core::models::ensemble::ChainEnsemble;
use crate::core::utils::geometry::bend_angle;
use itertools::Itertools;
use nalgebra::Point3;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Any two beads closer than this overlap and invalidate the conformation.
pub const OVERLAP_DISTANCE: f64 = 1.0;
/// Any two non-backbone-adjacent beads closer than this count as one
/// energetic bond.
pub const BOND_DISTANCE: f64 = 1.2;
/// Minimum z coordinate of every non-anchor bead on a grafted system.
pub const SURFACE_CLEARANCE: f64 = 0.5;

/// Outcome of the geometric consistency check.
///
/// Invalidity is an expected, frequent result that drives move rejection;
/// it is a value, never an error.
#[derive(Debug, Clone, PartialEq)]
pub enum Validation {
    /// The conformation satisfies every constraint. Carries the total
    /// energetic bond count and the interior bend angles per chain.
    Valid { bonds: u64, angles: Vec<Vec<f64>> },
    /// Some constraint is violated; no further data is available.
    Invalid,
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        matches!(self, Validation::Valid { .. })
    }

    /// The bond count, if the conformation was valid.
    pub fn bonds(&self) -> Option<u64> {
        match self {
            Validation::Valid { bonds, .. } => Some(*bonds),
            Validation::Invalid => None,
        }
    }
}

/// Checks an ensemble's current coordinates against every geometric
/// constraint and counts energetic bonds.
///
/// The scan is O(chainLength² · numberOfChains²) and runs once per
/// proposed move, making it the dominant cost of a simulation. The order
/// of evaluation is: interior bend angles (short-circuiting), surface and
/// box bounds, intra-chain contacts excluding backbone-adjacent pairs,
/// then all cross-chain contacts.
pub fn check(ensemble: &ChainEnsemble) -> Validation {
    let params = ensemble.params();
    let coords = ensemble.coords();

    let mut angles = Vec::with_capacity(coords.len());
    for chain in coords {
        let mut chain_angles = Vec::with_capacity(chain.len().saturating_sub(2));
        for i in 1..chain.len().saturating_sub(1) {
            let a = chain[i + 1] - chain[i];
            let b = chain[i] - chain[i - 1];
            let angle = bend_angle(&a, &b);
            if angle > params.max_bend_angle {
                return Validation::Invalid;
            }
            chain_angles.push(angle);
        }
        angles.push(chain_angles);
    }

    for chain in coords {
        for (i, bead) in chain.iter().enumerate() {
            if params.surface && i > 0 && bead.z < SURFACE_CLEARANCE {
                return Validation::Invalid;
            }
            if params.box_side > 0.0
                && (bead.x < 0.0
                    || bead.x > params.box_side
                    || bead.y < 0.0
                    || bead.y > params.box_side)
            {
                return Validation::Invalid;
            }
        }
    }

    match count_contacts(coords) {
        Some(bonds) => Validation::Valid { bonds, angles },
        None => Validation::Invalid,
    }
}

/// Mean interior bend angle across all chains; zero when no chain has an
/// interior bead.
pub fn mean_angle(angles: &[Vec<f64>]) -> f64 {
    let count: usize = angles.iter().map(Vec::len).sum();
    if count == 0 {
        return 0.0;
    }
    angles.iter().flatten().sum::<f64>() / count as f64
}

/// Total energetic bond count over every bead pair, or `None` on the first
/// overlap.
fn count_contacts(coords: &[Vec<Point3<f64>>]) -> Option<u64> {
    let pairs: Vec<(usize, usize)> = (0..coords.len()).tuple_combinations().collect();

    #[cfg(not(feature = "parallel"))]
    let (chain_iter, pair_iter) = (coords.iter(), pairs.iter());

    #[cfg(feature = "parallel")]
    let (chain_iter, pair_iter) = (coords.par_iter(), pairs.par_iter());

    let intra = chain_iter
        .map(|chain| intra_chain_contacts(chain))
        .collect::<Option<Vec<u64>>>()?;
    let cross = pair_iter
        .map(|&(m, n)| cross_chain_contacts(&coords[m], &coords[n]))
        .collect::<Option<Vec<u64>>>()?;

    Some(intra.iter().sum::<u64>() + cross.iter().sum::<u64>())
}

/// Bond count among non-adjacent bead pairs of one chain, `None` on
/// overlap. Pairs `(i, j)` with `j >= i - 1` are skipped: self pairs and
/// backbone bonds do not interact.
fn intra_chain_contacts(chain: &[Point3<f64>]) -> Option<u64> {
    let mut bonds = 0;
    for i in 0..chain.len() {
        for j in 0..i.saturating_sub(1) {
            let dist = (chain[i] - chain[j]).norm();
            if dist < OVERLAP_DISTANCE {
                return None;
            }
            if dist < BOND_DISTANCE {
                bonds += 1;
            }
        }
    }
    Some(bonds)
}

/// Bond count over every bead pair across two distinct chains, `None` on
/// overlap. No adjacency exclusion applies across chains.
fn cross_chain_contacts(a: &[Point3<f64>], b: &[Point3<f64>]) -> Option<u64> {
    let mut bonds = 0;
    for bead_a in a {
        for bead_b in b {
            let dist = (bead_a - bead_b).norm();
            if dist < OVERLAP_DISTANCE {
                return None;
            }
            if dist < BOND_DISTANCE {
                bonds += 1;
            }
        }
    }
    Some(bonds)
}
