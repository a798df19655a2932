//! # Workflows Module
//!
//! The user-facing entry points that tie the core models and the engine
//! together into complete procedures. Currently there is one workflow:
//! [`simulate::run`], a full Metropolis run from initial placement to the
//! last sampled frame.

pub mod simulate;
