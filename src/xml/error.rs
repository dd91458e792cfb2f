use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum XmlError {
    #[error("Malformed XML: {0}")]
    Malformed(String),

    #[error("Document has no root element")]
    Empty,

    #[error("Closing tag without matching opening tag")]
    UnexpectedEnd,

    #[error("Element <{0}> is never closed")]
    Unclosed(String),

    #[error("Unexpected second root element <{0}>")]
    MultipleRoots(String),
}
