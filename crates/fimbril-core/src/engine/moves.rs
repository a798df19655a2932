use crate::core::models::ensemble::ChainEnsemble;
use crate::core::utils::geometry::euler_rotation;
use rand::Rng;

/// Description of one proposed tail rotation, mainly for tracing and
/// tests. `joint` is the bond index; the pivot bead is `joint + 1` and
/// every bead beyond it moves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TailRotation {
    pub chain: usize,
    pub joint: usize,
    pub angles: [f64; 3],
}

/// Proposes a single rigid rotation of one chain's tail, mutating the
/// ensemble in place after snapshotting it for rollback.
///
/// The chain and joint are chosen uniformly. Each of the three rotation
/// angles is drawn uniformly from `±max_bend_angle · step_size`, doubled
/// on grafted systems where the surface constraint leaves fewer reachable
/// configurations. The proposal always succeeds; geometric validity is the
/// checker's concern.
pub fn propose_tail_rotation(
    ensemble: &mut ChainEnsemble,
    step_size: f64,
    rng: &mut impl Rng,
) -> TailRotation {
    let (chains, length, surface, max_bend_angle) = {
        let p = ensemble.params();
        (p.chains, p.length, p.surface, p.max_bend_angle)
    };
    ensemble.snapshot();

    let chain = rng.gen_range(0..chains);
    let joint = rng.gen_range(0..length - 1);

    let theta_max = max_bend_angle * step_size * if surface { 2.0 } else { 1.0 };
    let tx = (1.0 - 2.0 * rng.gen_range(0.0..1.0)) * theta_max;
    let ty = (1.0 - 2.0 * rng.gen_range(0.0..1.0)) * theta_max;
    let tz = (1.0 - 2.0 * rng.gen_range(0.0..1.0)) * theta_max;

    let rotation = euler_rotation(tx, ty, tz);
    ensemble.rotate_tail(chain, joint + 1, &rotation);

    TailRotation {
        chain,
        joint,
        angles: [tx, ty, tz],
    }
}
