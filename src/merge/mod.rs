//! Folding many report files into one aggregate report

mod cache;
mod driver;
mod error;
mod input;
mod options;
mod output;

#[cfg(test)]
mod tests;

pub use cache::{FileCache, GZIP_MAGIC, decompress};
pub use driver::{MergeDriver, MergeOutcome};
pub use error::{LoadError, MergeError};
pub use input::InputSpec;
pub use options::MergeOptions;
pub use output::{marshal, unmarshal, write_report};
