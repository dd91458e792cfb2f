use super::{ROOT_NAMESPACE, State, Status, Suite, Summary, derive_id};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::mem;
use tracing::{debug, warn};
use uuid::Uuid;

/// One logical run: a framework invocation or a single report file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TestResults {
    pub id: Uuid,
    #[serde(skip)]
    pub source_id: String,
    pub name: String,
    /// Name of the parser that produced this run
    pub framework: String,
    pub is_disabled: bool,
    pub summary: Summary,
    pub status: Status,
    pub status_message: String,
    pub suites: Vec<Suite>,
}

impl TestResults {
    pub fn new(name: impl Into<String>, framework: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            framework: framework.into(),
            ..Self::default()
        }
    }

    /// An empty run marked as failed to parse
    pub fn failed(
        name: impl Into<String>,
        framework: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        let mut results = Self::new(name, framework);
        results.status = Status::Error;
        results.status_message = message.into();
        results.ensure_id();
        results
    }

    pub fn is_error(&self) -> bool {
        self.status == Status::Error
    }

    /// Derive `id` from the run name and framework
    pub fn ensure_id(&mut self) {
        let mut identity = if self.source_id.is_empty() {
            self.name.clone()
        } else {
            self.source_id.clone()
        };
        identity.push('\u{1f}');
        identity.push_str(&self.framework);
        self.id = derive_id(&ROOT_NAMESPACE, &identity);
    }

    /// Re-derive this run's ID, then every suite ID, then every test ID
    pub fn regenerate_id(&mut self) {
        self.ensure_id();
        for suite in &mut self.suites {
            suite.regenerate_id(&self.id);
        }
    }

    /// Rename the run and cascade the new identity to every descendant
    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.source_id.clear();
        self.regenerate_id();
    }

    /// Merge suites that share an ID inside this single run
    pub fn flatten(&mut self) {
        let suites = mem::take(&mut self.suites);
        let mut index: HashMap<Uuid, usize> = HashMap::new();

        for mut suite in suites {
            match index.get(&suite.id) {
                Some(&i) => self.suites[i].combine(suite),
                None => {
                    suite.dedup_tests();
                    index.insert(suite.id, self.suites.len());
                    self.suites.push(suite);
                }
            }
        }

        self.sort_suites();
    }

    /// Merge another shard of the same run into this one
    ///
    /// Returns `false` and leaves `self` untouched when the IDs differ.
    pub fn combine(&mut self, other: TestResults) -> bool {
        if self.id != other.id {
            warn!(
                "refusing to combine runs with different IDs: {} and {}",
                self.id, other.id
            );
            return false;
        }

        let mut index: HashMap<Uuid, usize> = self
            .suites
            .iter()
            .enumerate()
            .map(|(i, suite)| (suite.id, i))
            .collect();

        for suite in other.suites {
            match index.get(&suite.id) {
                Some(&i) => {
                    self.suites[i].combine(suite);
                    self.suites[i].aggregate();
                }
                None => {
                    index.insert(suite.id, self.suites.len());
                    self.suites.push(suite);
                }
            }
        }

        self.sort_suites();
        self.aggregate();
        true
    }

    pub fn sort_suites(&mut self) {
        self.suites.sort_by(|a, b| a.id.cmp(&b.id));
    }

    /// Recompute every suite summary and sum them into this run's summary
    pub fn aggregate(&mut self) {
        let mut summary = Summary::default();
        for suite in &mut self.suites {
            suite.aggregate();
            summary.merge(&suite.summary);
        }
        self.summary = summary;
    }

    /// Regroup all tests into one suite per test file
    ///
    /// Tests without a file stay grouped under their original suite name.
    pub fn arrange_suites_by_test_file(&mut self) {
        let mut arranged: Vec<Suite> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for suite in mem::take(&mut self.suites) {
            for test in suite.tests {
                let key = if test.file.is_empty() {
                    suite.name.clone()
                } else {
                    test.file.clone()
                };

                let i = *index.entry(key.clone()).or_insert_with(|| {
                    let mut bucket = Suite::new(key);
                    bucket.timestamp = suite.timestamp.clone();
                    bucket.hostname = suite.hostname.clone();
                    bucket.package = suite.package.clone();
                    arranged.push(bucket);
                    arranged.len() - 1
                });
                arranged[i].append_test(test);
            }
        }

        for suite in &mut arranged {
            suite.regenerate_id(&self.id);
            suite.aggregate();
        }

        self.suites = arranged;
        self.aggregate();
    }

    /// Truncate captured output on every suite and test
    pub fn trim_output(&mut self, max_chars: usize) {
        for suite in &mut self.suites {
            suite.trim_output(max_chars);
        }
    }

    /// Drop captured output of tests that passed
    pub fn omit_output_for_passed(&mut self) {
        for test in self.suites.iter_mut().flat_map(|s| s.tests.iter_mut()) {
            if test.state == State::Passed {
                test.system_out.clear();
                test.system_err.clear();
            }
        }
    }
}

/// Top-level container for any number of runs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Report {
    pub test_results: Vec<TestResults>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold every run of `incoming` into this report
    ///
    /// Each incoming run is flattened first, then merged with the run of the
    /// same ID or appended. Runs end up sorted by ID and re-aggregated.
    pub fn combine(&mut self, incoming: Report) {
        for results in incoming.test_results {
            self.fold(results);
        }

        self.test_results.sort_by(|a, b| a.id.cmp(&b.id));
        for results in &mut self.test_results {
            results.aggregate();
        }
    }

    /// Fold a single run into this report
    pub fn add(&mut self, results: TestResults) {
        self.combine(Report {
            test_results: vec![results],
        });
    }

    fn fold(&mut self, mut results: TestResults) {
        results.flatten();

        match self.test_results.iter_mut().find(|r| r.id == results.id) {
            Some(existing) => {
                debug!("merging shard into run {} ({})", existing.name, existing.id);
                existing.combine(results);
            }
            None => {
                debug!("adding run {} ({})", results.name, results.id);
                self.test_results.push(results);
            }
        }
    }

    /// Total number of tests across every run
    pub fn test_count(&self) -> usize {
        self.test_results.iter().map(|r| r.summary.total).sum()
    }

    pub fn trim_output(&mut self, max_chars: usize) {
        for results in &mut self.test_results {
            results.trim_output(max_chars);
        }
    }

    pub fn omit_output_for_passed(&mut self) {
        for results in &mut self.test_results {
            results.omit_output_for_passed();
        }
    }
}
