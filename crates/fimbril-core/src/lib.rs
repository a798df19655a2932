//! # Fimbril Core Library
//!
//! A Metropolis Monte Carlo simulator for bead-chain polymers modeling
//! semi-flexible fibers (fimbriae), with self-avoidance, bounded bend
//! angles, optional surface grafting, and Debye small-angle-scattering
//! analysis of the sampled ensemble.
//!
//! ## Architectural Philosophy
//!
//! The library is split into three layers with a strict dependency
//! direction, so that the geometric core stays pure and testable while the
//! stochastic machinery remains swappable.
//!
//! - **[`core`]: The Foundation.** Stateless data models (`ChainEnsemble`),
//!   the pure geometric-validity checker, the Debye structure-factor sum,
//!   and trajectory/observable I/O.
//!
//! - **[`engine`]: The Logic Core.** The stateful pieces of the sampler:
//!   run configuration, the tail-rotation move proposer, the annealing
//!   schedule, and the Metropolis acceptance draw.
//!
//! - **[`workflows`]: The Public API.** Ties `engine` and `core` together
//!   into a complete simulation run: initialization, the step loop, and
//!   periodic sampling to trajectory and scattering sinks.

pub mod core;
pub mod engine;
pub mod workflows;
