pub mod builtin;
pub mod definition;
pub mod store;

use std::path::PathBuf;

use thiserror::Error;

use crate::rspec::RspecError;

pub use builtin::hello_world_cluster;
pub use definition::ProfileDefinition;

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("failed to encode profile: {0}")]
    Encode(String),

    #[error("no profile file or stored profile named '{0}'")]
    NotFound(String),

    #[error("invalid profile name '{0}'")]
    InvalidName(String),

    #[error("could not determine home directory")]
    NoHome,

    #[error(transparent)]
    Invalid(#[from] RspecError),
}
