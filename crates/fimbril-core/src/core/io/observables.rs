use super::TrajectoryError;
use std::io::Write;

/// Tab-separated scalar record stream: one `(iteration, bonds, mean
/// angle)` row per sampled step.
pub struct ObservablesWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> ObservablesWriter<W> {
    pub fn new(writer: W) -> Result<Self, TrajectoryError> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .from_writer(writer);
        writer.write_record(["iteration", "bonds", "mean_angle"])?;
        writer.flush()?;
        Ok(Self { writer })
    }

    pub fn append(
        &mut self,
        iteration: u64,
        bonds: u64,
        mean_angle: f64,
    ) -> Result<(), TrajectoryError> {
        self.writer.write_record([
            iteration.to_string(),
            bonds.to_string(),
            format!("{mean_angle:.6}"),
        ])?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Comma-separated scattering curves: a header row naming the q grid, then
/// one intensity row per sampled step, so consumers can average over any
/// burn-in window after the fact.
pub struct ScatteringWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> ScatteringWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(writer),
        }
    }

    pub fn write_header(&mut self, q: &[f64]) -> Result<(), TrajectoryError> {
        let mut record = vec!["iteration".to_string()];
        record.extend(q.iter().map(|qk| format!("{qk:.6}")));
        self.writer.write_record(&record)?;
        self.writer.flush()?;
        Ok(())
    }

    pub fn append(&mut self, iteration: u64, intensity: &[f64]) -> Result<(), TrajectoryError> {
        let mut record = vec![iteration.to_string()];
        record.extend(intensity.iter().map(|v| format!("{v:.8}")));
        self.writer.write_record(&record)?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn observable_rows_are_tab_separated_with_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("run.traj");
        {
            let file = fs::File::create(&path).unwrap();
            let mut writer = ObservablesWriter::new(file).unwrap();
            writer.append(10, 3, 0.523599).unwrap();
            writer.append(20, 5, 0.6).unwrap();
        }
        let text = fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("iteration\tbonds\tmean_angle"));
        assert_eq!(lines.next(), Some("10\t3\t0.523599"));
        assert_eq!(lines.next(), Some("20\t5\t0.600000"));
    }

    #[test]
    fn scattering_rows_carry_the_q_grid_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("run.scattering.csv");
        {
            let file = fs::File::create(&path).unwrap();
            let mut writer = ScatteringWriter::new(file);
            writer.write_header(&[0.0, 0.25, 0.5]).unwrap();
            writer.append(10, &[1.0, 0.8, 0.4]).unwrap();
        }
        let text = fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("iteration,0.000000,0.250000,0.500000"));
        assert_eq!(
            lines.next(),
            Some("10,1.00000000,0.80000000,0.40000000")
        );
    }
}
