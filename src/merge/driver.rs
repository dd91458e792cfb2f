use super::{FileCache, InputSpec, MergeError, MergeOptions, unmarshal};
use crate::model::{Report, TestResults};
use crate::parser::ParserRegistry;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Result of compiling a batch of report files
#[derive(Debug, Clone, Default)]
pub struct MergeOutcome {
    /// Every successfully parsed run, folded together
    pub report: Report,
    /// Runs that failed to parse, left out of `report`
    pub rejected: Vec<TestResults>,
}

/// Parses inputs and folds them into a single report
pub struct MergeDriver<'a> {
    registry: &'a ParserRegistry,
    cache: &'a FileCache,
    options: MergeOptions,
}

impl<'a> MergeDriver<'a> {
    pub fn new(registry: &'a ParserRegistry, cache: &'a FileCache, options: MergeOptions) -> Self {
        Self {
            registry,
            cache,
            options,
        }
    }

    pub fn options(&self) -> &MergeOptions {
        &self.options
    }

    /// Load and parse a single input
    ///
    /// The parser is the input's own suffix, else the configured override,
    /// else whatever the registry detects.
    pub fn parse_input(&self, input: &InputSpec) -> Result<TestResults, MergeError> {
        let file = self.cache.load(&input.path)?;
        let forced = input.parser.as_deref().or(self.options.parser.as_deref());
        let parser = self.registry.resolve(&file, forced)?;

        let mut results = parser.parse(&file);
        if let Some(name) = &self.options.name {
            results.rename(name.clone());
        }
        Ok(results)
    }

    /// Parse every input and fold the runs into one report
    ///
    /// Runs that fail to parse are returned in `rejected` instead of being
    /// folded. Resolution errors abort unless `ignore_missing` is set.
    pub fn compile(&self, inputs: &[InputSpec]) -> Result<MergeOutcome, MergeError> {
        let mut outcome = MergeOutcome::default();

        for input in inputs {
            let results = match self.parse_input(input) {
                Ok(results) => results,
                Err(e) if e.is_resolution() && self.options.ignore_missing => {
                    warn!("Skipping {}: {}", input.path.display(), e);
                    continue;
                }
                Err(e) => return Err(e),
            };

            if results.is_error() {
                warn!(
                    "Failed to parse {}: {}",
                    input.path.display(),
                    results.status_message
                );
                outcome.rejected.push(results);
                continue;
            }

            debug!(
                "{}: {} tests in {} suites",
                input.path.display(),
                results.summary.total,
                results.suites.len()
            );
            outcome.report.add(results);
        }

        self.post_process(&mut outcome.report);
        info!(
            "Compiled {} inputs into {} runs with {} tests ({} rejected)",
            inputs.len(),
            outcome.report.test_results.len(),
            outcome.report.test_count(),
            outcome.rejected.len()
        );
        Ok(outcome)
    }

    /// Fold previously serialized reports (gzip or raw JSON) into one
    pub fn combine(&self, paths: &[PathBuf]) -> Result<Report, MergeError> {
        let mut report = Report::new();

        for path in paths {
            let file = match self.cache.load(path) {
                Ok(file) => file,
                Err(e) => {
                    let e = MergeError::from(e);
                    if e.is_resolution() && self.options.ignore_missing {
                        warn!("Skipping {}: {}", path.display(), e);
                        continue;
                    }
                    return Err(e);
                }
            };

            let partial = unmarshal(&file)?;
            debug!("{}: {} runs", path.display(), partial.test_results.len());
            report.combine(partial);
        }

        self.post_process(&mut report);
        info!(
            "Combined {} reports into {} runs with {} tests",
            paths.len(),
            report.test_results.len(),
            report.test_count()
        );
        Ok(report)
    }

    fn post_process(&self, report: &mut Report) {
        if self.options.omit_output_for_passed {
            report.omit_output_for_passed();
        }
        report.trim_output(self.options.trim_output_to);
    }
}
