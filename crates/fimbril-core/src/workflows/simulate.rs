use crate::core::io::sinks::{ScatteringSink, TrajectorySink};
use crate::core::models::ensemble::ChainEnsemble;
use crate::core::scattering::{debye, q_grid};
use crate::core::validation::{Validation, mean_angle};
use crate::engine::acceptance::metropolis_accept;
use crate::engine::annealing::AnnealingSchedule;
use crate::engine::config::SimulationConfig;
use crate::engine::error::EngineError;
use crate::engine::moves::propose_tail_rotation;
use crate::engine::progress::{Progress, ProgressReporter};
use rand::Rng;
use tracing::{debug, info, instrument, trace};

/// Where the run's starting coordinates come from.
pub enum InitialConformation {
    /// Place chains at random (or grid) anchors and retry until valid.
    Random,
    /// Adopt a previously recorded conformation, e.g. the last frame of an
    /// earlier trajectory. No frame-zero dump is written for resumed runs.
    Resumed(ChainEnsemble),
}

/// Summary statistics of a completed run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationReport {
    pub total_steps: u64,
    pub good_steps: u64,
    pub bad_steps: u64,
    /// Bond count of the last accepted conformation.
    pub final_bonds: u64,
}

impl SimulationReport {
    /// Fraction of proposals that were accepted.
    pub fn acceptance_rate(&self) -> f64 {
        if self.total_steps == 0 {
            return 0.0;
        }
        self.good_steps as f64 / self.total_steps as f64
    }
}

/// Runs a complete Metropolis simulation.
///
/// Each step proposes one tail rotation, evaluates the geometry checker,
/// applies the Metropolis criterion under the annealing schedule's current
/// β, and commits or rolls back. Every `output_freq` accepted steps one
/// frame, one observable record, and (when configured) one scattering
/// curve go to the sinks. Both accepted and rejected proposals count
/// toward the step budget.
#[instrument(skip_all, name = "simulation_workflow")]
pub fn run<T, S, R>(
    config: &SimulationConfig,
    start: InitialConformation,
    trajectory: &mut T,
    mut scattering: Option<&mut S>,
    reporter: &ProgressReporter,
    rng: &mut R,
) -> Result<SimulationReport, EngineError>
where
    T: TrajectorySink,
    S: ScatteringSink,
    R: Rng,
{
    // === Phase 0: starting conformation ===
    reporter.report(Progress::PhaseStart {
        name: "Initialization",
    });
    let fresh = matches!(start, InitialConformation::Random);
    let mut ensemble = match start {
        InitialConformation::Random => {
            info!(
                chains = config.system.chains,
                length = config.system.length,
                "Generating initial arrangement of chains."
            );
            ChainEnsemble::random(config.system, config.grid, rng)?
        }
        InitialConformation::Resumed(ensemble) => {
            info!("Continuing from a previously recorded conformation.");
            ensemble
        }
    };
    if fresh {
        trajectory.record_frame(&ensemble)?;
    }

    let scattering_grid = config.scattering.as_ref().map(|sc| {
        let q = q_grid(sc.q_max, sc.q_count);
        let scaled: Vec<f64> = q.iter().map(|qk| qk * sc.dist_scale).collect();
        (q, scaled)
    });
    if let (Some(sink), Some((q, _))) = (scattering.as_mut(), scattering_grid.as_ref()) {
        sink.begin(q)?;
    }
    reporter.report(Progress::PhaseFinish);

    // === Phase 1: Metropolis sampling ===
    reporter.report(Progress::PhaseStart {
        name: "Metropolis sampling",
    });
    reporter.report(Progress::TaskStart {
        total_steps: config.steps,
    });
    let schedule = AnnealingSchedule::new(config.system.beta, config.steps, config.ramps);
    let mut good_steps: u64 = 0;
    let mut bad_steps: u64 = 0;
    let mut old_bonds: u64 = 0;

    for step in 0..config.steps {
        let mv = propose_tail_rotation(&mut ensemble, config.step_size, rng);
        trace!(chain = mv.chain, joint = mv.joint, "Proposed tail rotation.");

        let beta = schedule.beta_at(step);
        let verdict = ensemble.validate();
        let accepted = match &verdict {
            Validation::Invalid => false,
            Validation::Valid { bonds, .. } => {
                metropolis_accept(old_bonds as i64 - *bonds as i64, beta, rng)
            }
        };

        if accepted {
            let Validation::Valid { bonds, angles } = verdict else {
                unreachable!("accepted moves carry a valid check result")
            };
            good_steps += 1;
            old_bonds = bonds;

            if good_steps % config.output_freq == 0 {
                trajectory.record_frame(&ensemble)?;
                trajectory.record_observables(good_steps, bonds, mean_angle(&angles))?;
                if let (Some(sink), Some((_, scaled_q))) =
                    (scattering.as_mut(), scattering_grid.as_ref())
                {
                    let curve = debye(&ensemble.positions(), scaled_q);
                    sink.record_curve(good_steps, &curve)?;
                }
            }
        } else {
            // A missing snapshot here is a driver ordering bug and fatal.
            ensemble.rollback()?;
            bad_steps += 1;
        }

        reporter.report(Progress::TaskIncrement);
        let elapsed = step + 1;
        if elapsed % config.output_freq == 0 || elapsed == config.steps {
            reporter.report(Progress::StatusUpdate {
                text: format!(
                    "step {}/{}: {} bonds, beta {:.2}",
                    elapsed, config.steps, old_bonds, beta
                ),
            });
        }
    }

    reporter.report(Progress::TaskFinish);
    reporter.report(Progress::PhaseFinish);

    let report = SimulationReport {
        total_steps: config.steps,
        good_steps,
        bad_steps,
        final_bonds: old_bonds,
    };
    debug!(?report, "Assembled run report.");
    info!(
        good_steps,
        bad_steps,
        acceptance = report.acceptance_rate(),
        "Sampling complete."
    );
    Ok(report)
}
