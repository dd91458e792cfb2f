// Public API exports
pub mod discover;
pub mod merge;
pub mod model;
pub mod parser;
pub mod xml;

// Re-export main types for convenience
pub use model::{Fault, Report, SemEnv, State, Status, Suite, Summary, Test, TestResults};

pub use parser::{Dialect, Linter, Parser, ParserRegistry, RegistryError, ReportFile};

pub use merge::{
    FileCache, InputSpec, LoadError, MergeDriver, MergeError, MergeOptions, MergeOutcome, marshal,
    write_report,
};

pub use discover::{DiscoverError, expand_inputs};
