//! Trajectory, observable, and scattering-curve file formats.
//!
//! The frame format is deliberately simple: fixed-width coordinate records
//! grouped per chain, with `MODEL`/`TER`/`ENDMDL` markers, readable by
//! standard structure viewers. Resumption parses back exactly what the
//! writer produced, last frame only.

pub mod frames;
pub mod observables;
pub mod sinks;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrajectoryError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Record serialization failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("Trajectory contains no frames")]
    NoFrames,

    #[error("Malformed trajectory record: {0:?}")]
    MalformedRecord(String),

    #[error(
        "Last frame holds {got_chains} chains with {got_beads} beads in total, expected {chains} chains of {length}"
    )]
    FrameShape {
        chains: usize,
        length: usize,
        got_chains: usize,
        got_beads: usize,
    },
}
