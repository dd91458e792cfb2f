use crate::parser::RegistryError;
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Not a regular file: {0}")]
    NotAFile(String),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to decompress {path}: {source}")]
    Decompress {
        path: String,
        #[source]
        source: io::Error,
    },
}

#[derive(Error, Debug)]
pub enum MergeError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Resolve(#[from] RegistryError),

    #[error("Failed to decode report {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write report {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to encode report: {0}")]
    Encode(#[from] serde_json::Error),
}

impl MergeError {
    /// Missing inputs and unresolvable parsers, as opposed to broken data
    pub fn is_resolution(&self) -> bool {
        matches!(
            self,
            MergeError::Resolve(_) | MergeError::Load(LoadError::NotFound(_) | LoadError::NotAFile(_))
        )
    }
}
