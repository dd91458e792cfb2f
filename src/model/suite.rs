use super::{Summary, Test, derive_id, trim_text};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::mem;
use uuid::Uuid;

/// A group of tests, usually one source file or one test class
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Suite {
    pub id: Uuid,
    #[serde(skip)]
    pub source_id: String,
    pub name: String,
    pub is_skipped: bool,
    pub is_disabled: bool,
    pub timestamp: String,
    pub hostname: String,
    pub package: String,
    pub properties: BTreeMap<String, String>,
    pub summary: Summary,
    pub system_out: String,
    pub system_err: String,
    pub tests: Vec<Test>,
}

impl Suite {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Derive `id` from the suite name and the owning `TestResults` ID
    pub fn ensure_id(&mut self, results_id: &Uuid) {
        let identity = if self.source_id.is_empty() {
            self.name.as_str()
        } else {
            self.source_id.as_str()
        };
        self.id = derive_id(results_id, identity);
    }

    /// Re-derive this suite's ID and then every test ID beneath it
    pub fn regenerate_id(&mut self, results_id: &Uuid) {
        self.ensure_id(results_id);
        for test in &mut self.tests {
            test.ensure_id(&self.id);
        }
    }

    pub fn append_test(&mut self, test: Test) {
        self.tests.push(test);
    }

    /// Merge the tests of `other` into this suite
    ///
    /// Tests are folded by ID: the first record of an ID is kept until a
    /// later one wins `Test::superseded_by`. Duplicates already present on
    /// either side collapse the same way. The larger reported duration of the
    /// two suites is kept for `aggregate`. Tests end up sorted by ID.
    pub fn combine(&mut self, other: Suite) {
        if other.summary.duration > self.summary.duration {
            self.summary.duration = other.summary.duration;
        }

        let existing = mem::take(&mut self.tests);
        self.fold_tests(existing.into_iter().chain(other.tests));
    }

    /// Collapse tests sharing an ID, keeping the record that wins escalation
    pub fn dedup_tests(&mut self) {
        let existing = mem::take(&mut self.tests);
        self.fold_tests(existing);
    }

    fn fold_tests(&mut self, tests: impl IntoIterator<Item = Test>) {
        let mut index: HashMap<Uuid, usize> = HashMap::new();

        for incoming in tests {
            match index.get(&incoming.id) {
                Some(&i) => {
                    if self.tests[i].superseded_by(&incoming) {
                        self.tests[i] = incoming;
                    }
                }
                None => {
                    index.insert(incoming.id, self.tests.len());
                    self.tests.push(incoming);
                }
            }
        }

        self.sort_tests();
    }

    pub fn sort_tests(&mut self) {
        self.tests.sort_by(|a, b| a.id.cmp(&b.id));
    }

    /// Recompute `summary` from the current tests
    ///
    /// A positive duration already on the suite that exceeds the sum of test
    /// durations is kept: it is the wall time of a parallel run.
    pub fn aggregate(&mut self) {
        let mut summary = Summary::default();
        for test in &self.tests {
            summary.count(test.state);
            summary.duration = summary.duration + test.duration;
        }

        let reported = self.summary.duration;
        if reported > Duration::zero() && reported > summary.duration {
            summary.duration = reported;
        }

        self.summary = summary;
    }

    pub(crate) fn trim_output(&mut self, max_chars: usize) {
        trim_text(&mut self.system_out, max_chars);
        trim_text(&mut self.system_err, max_chars);
        for test in &mut self.tests {
            test.trim_output(max_chars);
        }
    }
}
