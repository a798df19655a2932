use super::TrajectoryError;
use crate::core::models::ensemble::ChainEnsemble;
use crate::core::models::params::SystemParameters;
use nalgebra::Point3;
use std::io::{BufRead, Write};

/// Byte offsets of the x coordinate field in an `ATOM` record; y and z
/// follow in adjacent 8-byte columns. The layout matches the classic PDB
/// coordinate columns so frames open in standard viewers.
const COORD_OFFSET: usize = 30;
const COORD_WIDTH: usize = 8;

/// Symbolic bead names: the anchor, the second bead, and everything else.
/// Viewers use the distinction to color chain roots differently.
fn bead_name(index: usize) -> &'static str {
    match index {
        0 => "A",
        1 => "B",
        _ => "C",
    }
}

/// Appends one coordinate frame for the whole ensemble.
///
/// Each chain's beads are written in backbone order and closed with a
/// `TER` marker; the frame is delimited by `MODEL`/`ENDMDL`.
pub fn write_frame<W: Write>(
    writer: &mut W,
    ensemble: &ChainEnsemble,
) -> Result<(), TrajectoryError> {
    writeln!(writer, "MODEL")?;
    let length = ensemble.params().length;
    for (m, chain) in ensemble.coords().iter().enumerate() {
        for (i, bead) in chain.iter().enumerate() {
            let serial = m * length + i;
            writeln!(
                writer,
                "ATOM  {:>5} {:^4} {:<3} {}{:>4}    {:>8.3}{:>8.3}{:>8.3}",
                serial,
                bead_name(i),
                "FIM",
                'A',
                m,
                bead.x,
                bead.y,
                bead.z,
            )?;
        }
        writeln!(writer, "TER")?;
    }
    writeln!(writer, "ENDMDL")?;
    Ok(())
}

/// Reads back the LAST frame of a trajectory written by [`write_frame`],
/// ignoring all earlier frames.
///
/// # Errors
///
/// [`TrajectoryError::NoFrames`] if no `MODEL` marker exists,
/// [`TrajectoryError::MalformedRecord`] on unparsable coordinate fields,
/// and [`TrajectoryError::FrameShape`] if the frame does not match the
/// expected chain count and length.
pub fn read_last_frame<R: BufRead>(
    reader: R,
    params: &SystemParameters,
) -> Result<Vec<Vec<Point3<f64>>>, TrajectoryError> {
    let lines: Vec<String> = reader.lines().collect::<Result<_, _>>()?;
    let start = lines
        .iter()
        .rposition(|line| line.starts_with("MODEL"))
        .ok_or(TrajectoryError::NoFrames)?;

    let mut coords: Vec<Vec<Point3<f64>>> = Vec::with_capacity(params.chains);
    let mut current: Vec<Point3<f64>> = Vec::with_capacity(params.length);
    for line in &lines[start + 1..] {
        if line.starts_with("ATOM") {
            let x = coord_field(line, COORD_OFFSET)?;
            let y = coord_field(line, COORD_OFFSET + COORD_WIDTH)?;
            let z = coord_field(line, COORD_OFFSET + 2 * COORD_WIDTH)?;
            current.push(Point3::new(x, y, z));
        } else if line.starts_with("TER") {
            coords.push(std::mem::take(&mut current));
        } else if line.starts_with("ENDMDL") {
            break;
        }
    }

    let got_beads: usize = coords.iter().map(Vec::len).sum();
    if coords.len() != params.chains || coords.iter().any(|c| c.len() != params.length) {
        return Err(TrajectoryError::FrameShape {
            chains: params.chains,
            length: params.length,
            got_chains: coords.len(),
            got_beads,
        });
    }
    Ok(coords)
}

fn coord_field(line: &str, offset: usize) -> Result<f64, TrajectoryError> {
    line.get(offset..offset + COORD_WIDTH)
        .and_then(|field| field.trim().parse().ok())
        .ok_or_else(|| TrajectoryError::MalformedRecord(line.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::ensemble::ChainEnsemble;
    use std::io::Cursor;

    fn params(chains: usize, length: usize) -> SystemParameters {
        SystemParameters {
            chains,
            length,
            box_side: 10.0,
            max_bend_angle: std::f64::consts::PI,
            beta: 0.0,
            surface: true,
        }
    }

    fn ensemble_at(params: SystemParameters, offset: f64) -> ChainEnsemble {
        let coords = (0..params.chains)
            .map(|m| {
                (0..params.length)
                    .map(|i| Point3::new(offset + m as f64 * 2.0, 1.25, 0.5 + i as f64))
                    .collect()
            })
            .collect();
        ChainEnsemble::from_coords(params, coords).unwrap()
    }

    #[test]
    fn coordinates_land_in_fixed_columns() {
        let mut buffer = Vec::new();
        write_frame(&mut buffer, &ensemble_at(params(1, 2), 3.0)).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let atom_line = text.lines().find(|l| l.starts_with("ATOM")).unwrap();
        assert_eq!(&atom_line[30..38], "   3.000");
        assert_eq!(&atom_line[38..46], "   1.250");
        assert_eq!(&atom_line[46..54], "   0.500");
    }

    #[test]
    fn last_frame_round_trips() {
        let p = params(2, 4);
        let first = ensemble_at(p, 0.0);
        let second = ensemble_at(p, 4.0);

        let mut buffer = Vec::new();
        write_frame(&mut buffer, &first).unwrap();
        write_frame(&mut buffer, &second).unwrap();

        let coords = read_last_frame(Cursor::new(buffer), &p).unwrap();
        assert_eq!(coords, second.coords());
    }

    #[test]
    fn empty_input_reports_no_frames() {
        let p = params(1, 3);
        let result = read_last_frame(Cursor::new(Vec::new()), &p);
        assert!(matches!(result, Err(TrajectoryError::NoFrames)));
    }

    #[test]
    fn frame_not_matching_parameters_reports_shape_error() {
        let p = params(2, 4);
        let mut buffer = Vec::new();
        write_frame(&mut buffer, &ensemble_at(p, 0.0)).unwrap();

        let wrong = params(3, 4);
        let result = read_last_frame(Cursor::new(buffer), &wrong);
        assert!(matches!(result, Err(TrajectoryError::FrameShape { .. })));
    }

    #[test]
    fn garbled_record_is_rejected() {
        let text = "MODEL\nATOM      0  A   FIM A   0    abcdefgh   0.000   0.500\nTER\nENDMDL\n";
        let p = params(1, 1);
        let result = read_last_frame(Cursor::new(text.as_bytes().to_vec()), &p);
        assert!(matches!(result, Err(TrajectoryError::MalformedRecord(_))));
    }
}
