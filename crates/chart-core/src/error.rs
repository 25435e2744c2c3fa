// File: crates/chart-core/src/error.rs
// Summary: Error type for the fallible edges of the engine (config, colors, mode names).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid color `{0}`: expected #rrggbb or #rrggbbaa")]
    InvalidColor(String),

    #[error("unknown scale mode `{0}` (expected `shared` or `banded`)")]
    UnknownMode(String),

    #[error("invalid chart config: {0}")]
    Config(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, ChartError>;
