use fimbril::core::io::TrajectoryError;
use fimbril::core::models::ensemble::EnsembleError;
use fimbril::engine::config::ConfigError;
use fimbril::engine::error::EngineError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Ensemble state error: {0}")]
    Ensemble(#[from] EnsembleError),

    #[error("Trajectory I/O failed: {0}")]
    Trajectory(#[from] TrajectoryError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid argument: {0}")]
    Argument(String),

    #[error("Failed to parse file '{path}': {source}", path = path.display())]
    FileParsing {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to configure the thread pool: {0}")]
    ThreadPool(String),
}
