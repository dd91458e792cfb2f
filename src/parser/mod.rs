mod dialect;
mod error;
mod junit;
mod linter;
mod nested;
mod registry;
mod source;


pub use dialect::{AttributeMap, Dialect};
pub use error::RegistryError;
pub use junit::JunitParser;
pub use linter::{Linter, LinterParser};
pub use registry::ParserRegistry;
pub use source::ReportFile;

use crate::model::TestResults;

/// Core trait that all parsers must implement
pub trait Parser: Send + Sync {
    /// Registry name, also recorded as `TestResults::framework`
    fn name(&self) -> &'static str;

    /// Lowercase file extensions (without dot) this parser reads
    fn supported_extensions(&self) -> &'static [&'static str];

    /// Whether this parser understands the given file
    fn is_applicable(&self, file: &ReportFile) -> bool;

    /// Parse a report file into the canonical model
    ///
    /// # Arguments
    /// * `file` - Path and decoded contents of the report
    ///
    /// # Returns
    /// A `TestResults` with IDs derived and summaries aggregated. Malformed
    /// input yields `Status::Error` with a message instead of a panic.
    fn parse(&self, file: &ReportFile) -> TestResults;
}
