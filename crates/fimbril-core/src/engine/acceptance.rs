use rand::Rng;

/// Metropolis acceptance on the bond-count change of a proposed move.
///
/// `delta_bonds` is old minus new: non-positive means bonding increased or
/// held (energetically favorable under the bond-counting model) and the
/// move is accepted outright. A net loss of bonds is accepted with
/// probability `exp(-beta · delta)` against a single uniform draw.
pub fn metropolis_accept(delta_bonds: i64, beta: f64, rng: &mut impl Rng) -> bool {
    if delta_bonds <= 0 {
        return true;
    }
    rng.gen_range(0.0..1.0) < (-beta * delta_bonds as f64).exp()
}
