use std::path::PathBuf;

use glam::Vec3;
use thiserror::Error;

use crate::types::Code;

/// Errors raised at the fallible edges of the crate: parsing code text and
/// loading configuration. Generating branches never fails.
#[derive(Debug, Error)]
pub enum BranchError {
    #[error("Invalid code {token:?} at position {position}")]
    InvalidCode { token: String, position: usize },

    #[error("Code 0 is the terminal code and cannot carry a branching rule")]
    ReservedTerminal,

    #[error("Branch offset for code {code} is not finite: {offset}")]
    NonFiniteOffset { code: Code, offset: Vec3 },

    #[error("Step length must be finite and positive, got {0}")]
    InvalidStepLen(f32),

    #[error("Failed to read config file {}: {source}", .path.display())]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    ParseConfig(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, BranchError>;
