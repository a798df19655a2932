use thiserror::Error;

use crate::core::io::TrajectoryError;
use crate::core::models::ensemble::EnsembleError;
use crate::engine::config::ConfigError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Configuration error: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("Ensemble state error: {source}")]
    Ensemble {
        #[from]
        source: EnsembleError,
    },

    #[error("Trajectory output failed: {source}")]
    Trajectory {
        #[from]
        source: TrajectoryError,
    },
}
