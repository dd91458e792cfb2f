use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Parser not found: {0}")]
    UnknownParser(String),

    #[error("No applicable parser found for {0}")]
    NoApplicableParser(String),
}
