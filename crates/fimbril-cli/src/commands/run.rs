use crate::cli::RunArgs;
use crate::config::{self, AppConfig};
use crate::error::Result;
use crate::progress::CliProgressHandler;
use fimbril::core::io::frames;
use fimbril::core::io::observables::ScatteringWriter;
use fimbril::core::io::sinks::FileTrajectorySink;
use fimbril::core::models::ensemble::ChainEnsemble;
use fimbril::engine::progress::ProgressReporter;
use fimbril::workflows::simulate::{self, InitialConformation};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub fn run(args: RunArgs) -> Result<()> {
    let file = match &args.config {
        Some(path) => config::load_file(path)?,
        None => Default::default(),
    };
    let app = config::resolve(&args, file)?;
    debug!(config = ?app.simulation, "Resolved run configuration.");

    let mut rng = match app.seed {
        Some(seed) => {
            info!(seed, "Seeding the random stream.");
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };

    let start = if app.append {
        let path = app.output.with_extension("pdb");
        info!(path = %path.display(), "Reading the last recorded frame for resumption.");
        let reader = BufReader::new(File::open(&path)?);
        let coords = frames::read_last_frame(reader, &app.simulation.system)?;
        InitialConformation::Resumed(ChainEnsemble::from_coords(app.simulation.system, coords)?)
    } else {
        InitialConformation::Random
    };

    let mut trajectory = FileTrajectorySink::create(&app.output, app.append)?;
    let mut scattering_writer = if app.simulation.scattering.is_some() {
        let file = File::create(scattering_path(&app.output))?;
        Some(ScatteringWriter::new(BufWriter::new(file)))
    } else {
        None
    };

    let handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(handler.get_callback());

    let report = simulate::run(
        &app.simulation,
        start,
        &mut trajectory,
        scattering_writer.as_mut(),
        &reporter,
        &mut rng,
    )?;

    print_summary(&app, &report);
    Ok(())
}

fn print_summary(app: &AppConfig, report: &simulate::SimulationReport) {
    println!(
        "Trajectory written to {}",
        app.output.with_extension("pdb").display()
    );
    println!(
        "Observables written to {}",
        app.output.with_extension("traj").display()
    );
    if app.simulation.scattering.is_some() {
        println!(
            "Scattering curves written to {}",
            scattering_path(&app.output).display()
        );
    }
    println!(
        "Acceptance rate: {:.1}%",
        100.0 * report.acceptance_rate()
    );
}

fn scattering_path(base: &Path) -> PathBuf {
    base.with_extension("scattering.csv")
}
