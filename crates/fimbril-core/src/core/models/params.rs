use serde::Deserialize;

/// Physical and geometric parameters of a chain ensemble.
///
/// These are fixed for the lifetime of a simulation run. Angles are in
/// radians; distances are in bead diameters (the backbone bond length is
/// the unit of length).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SystemParameters {
    /// Number of chains in the ensemble.
    pub chains: usize,
    /// Number of beads per chain.
    pub length: usize,
    /// Side length of the square lateral confinement box. A value of zero
    /// disables the lateral bound.
    pub box_side: f64,
    /// Maximum turn angle at any interior bead, in radians.
    pub max_bend_angle: f64,
    /// Effective bond strength, energy / (kT), for the Metropolis draw.
    pub beta: f64,
    /// Whether the chains are grafted on a hard, inert surface.
    pub surface: bool,
}

/// A regular rectangular lattice of chain anchor sites spanning the box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GridSpec {
    pub rows: usize,
    pub cols: usize,
}

impl GridSpec {
    /// Number of anchor sites the lattice provides.
    pub fn capacity(&self) -> usize {
        self.rows * self.cols
    }
}
