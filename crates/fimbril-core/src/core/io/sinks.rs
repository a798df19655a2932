use super::TrajectoryError;
use super::frames;
use super::observables::ObservablesWriter;
use super::observables::ScatteringWriter;
use crate::core::models::ensemble::ChainEnsemble;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Receiver of trajectory output: coordinate frames and scalar observable
/// records. The driver only writes; it never reads back through this
/// interface.
pub trait TrajectorySink {
    fn record_frame(&mut self, ensemble: &ChainEnsemble) -> Result<(), TrajectoryError>;

    fn record_observables(
        &mut self,
        iteration: u64,
        bonds: u64,
        mean_angle: f64,
    ) -> Result<(), TrajectoryError>;
}

/// Receiver of scattering output: the q grid once, then one intensity
/// curve per sampled step.
pub trait ScatteringSink {
    fn begin(&mut self, q: &[f64]) -> Result<(), TrajectoryError>;

    fn record_curve(&mut self, iteration: u64, intensity: &[f64]) -> Result<(), TrajectoryError>;
}

/// File-backed trajectory sink writing `<base>.pdb` frames and a
/// `<base>.traj` observable table.
///
/// The observable table is always started fresh; the frame file is opened
/// in append mode when resuming a prior run so frame numbering stays
/// continuous.
pub struct FileTrajectorySink {
    frames: BufWriter<File>,
    observables: ObservablesWriter<BufWriter<File>>,
}

impl FileTrajectorySink {
    pub fn create<P: AsRef<Path>>(base: P, resume: bool) -> Result<Self, TrajectoryError> {
        let base = base.as_ref();
        let frame_file = if resume {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(base.with_extension("pdb"))?
        } else {
            File::create(base.with_extension("pdb"))?
        };
        let observable_file = File::create(base.with_extension("traj"))?;
        Ok(Self {
            frames: BufWriter::new(frame_file),
            observables: ObservablesWriter::new(BufWriter::new(observable_file))?,
        })
    }
}

impl TrajectorySink for FileTrajectorySink {
    fn record_frame(&mut self, ensemble: &ChainEnsemble) -> Result<(), TrajectoryError> {
        frames::write_frame(&mut self.frames, ensemble)?;
        self.frames.flush()?;
        Ok(())
    }

    fn record_observables(
        &mut self,
        iteration: u64,
        bonds: u64,
        mean_angle: f64,
    ) -> Result<(), TrajectoryError> {
        self.observables.append(iteration, bonds, mean_angle)
    }
}

impl<W: Write> ScatteringSink for ScatteringWriter<W> {
    fn begin(&mut self, q: &[f64]) -> Result<(), TrajectoryError> {
        self.write_header(q)
    }

    fn record_curve(&mut self, iteration: u64, intensity: &[f64]) -> Result<(), TrajectoryError> {
        self.append(iteration, intensity)
    }
}
