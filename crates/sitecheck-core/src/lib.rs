use thiserror::Error;

pub mod app_config;
pub mod config;
pub mod facts;
pub mod location;

pub use app_config::{AppConfig, Environment, MatcherChoice};
pub use config::{load_app_config, load_app_config_from_env};
pub use facts::{FactCheck, FactStatus};
pub use location::{HoursPeriod, Location, ProbeResult, TimePoint, VerificationRecord};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
