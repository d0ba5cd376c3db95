use std::path::PathBuf;

use thiserror::Error;

use crate::target::TargetKind;

#[derive(Error, Debug)]
pub enum GardenctlError {
    #[error("Target stack is empty")]
    EmptyStack,

    #[error("Invalid target: {0}")]
    InvalidTarget(String),

    #[error("Illegal target stack: {0}")]
    IllegalStackShape(String),

    #[error("No {kind} matches '{pattern}'")]
    NoMatch { kind: TargetKind, pattern: String },

    #[error("Pattern '{pattern}' matches several {kind}s, pick one of: {}", .candidates.join(", "))]
    AmbiguousMatch {
        kind: TargetKind,
        pattern: String,
        candidates: Vec<String>,
    },

    #[error("No {0} is targeted")]
    NotTargeted(TargetKind),

    #[error("Garden '{0}' is not configured")]
    UnknownGarden(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Cannot access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cluster request failed: {0}")]
    Cluster(#[source] anyhow::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GardenctlError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type GardenctlResult<T> = Result<T, GardenctlError>;
