use super::dialect::{Dialect, Layout};
use super::nested::flatten_suites;
use super::{Parser, ReportFile};
use crate::model::{Fault, SemEnv, State, Suite, Summary, Test, TestResults};
use crate::xml::XmlElement;
use chrono::Duration;
use tracing::debug;

const TESTSUITES_TAG: &str = "testsuites";
const TESTSUITE_TAG: &str = "testsuite";
const TESTCASE_TAG: &str = "testcase";
const PROPERTIES_TAG: &str = "properties";
const PROPERTY_TAG: &str = "property";
const FAILURE_TAG: &str = "failure";
const ERROR_TAG: &str = "error";
const SKIPPED_TAG: &str = "skipped";
const SYSTEM_OUT_TAG: &str = "system-out";
const SYSTEM_ERR_TAG: &str = "system-err";

const XML_EXTENSIONS: &[&str] = &["xml"];

/// JUnit XML parser, specialised by a `Dialect`
pub struct JunitParser {
    dialect: Dialect,
    sem_env: SemEnv,
}

impl JunitParser {
    pub fn new(dialect: Dialect, sem_env: SemEnv) -> Self {
        Self { dialect, sem_env }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    fn results_from_testsuites(&self, root: &XmlElement) -> TestResults {
        let attrs = self.dialect.attributes();
        let name = match root.attr(attrs.name) {
            Some(name) if !name.is_empty() => name,
            _ => self.dialect.default_results_name(),
        };

        let mut results = TestResults::new(name, self.name());
        results.source_id = root.attr_or_empty(attrs.id).to_string();
        results.is_disabled = is_true(root.attr("disabled"));
        results.summary = summary_from_attrs(root, attrs.time);
        results.suites = self.suites_from(root.children_named(TESTSUITE_TAG));
        results
    }

    fn results_from_testsuite(&self, root: &XmlElement) -> TestResults {
        let mut results = TestResults::new(self.dialect.default_results_name(), self.name());
        results.suites = self.suites_from(std::iter::once(root));
        results
    }

    fn suites_from<'a>(&self, top_level: impl Iterator<Item = &'a XmlElement>) -> Vec<Suite> {
        let name_attr = self.dialect.attributes().name;
        let suites: Vec<Suite> = match self.dialect.layout() {
            Layout::Flat => top_level
                .map(|node| {
                    let name = self.dialect.suite_name(node.attr_or_empty(name_attr));
                    self.build_suite(node, name, node.children_named(TESTCASE_TAG))
                })
                .collect(),
            Layout::Nested(naming) => flatten_suites(top_level, naming)
                .into_iter()
                .map(|flat| {
                    let name = self.dialect.suite_name(&flat.name);
                    self.build_suite(flat.node, name, flat.testcases.into_iter())
                })
                .collect(),
        };

        suites
            .into_iter()
            .filter(|suite| self.dialect.keeps_suite(suite))
            .collect()
    }

    fn build_suite<'a>(
        &self,
        node: &XmlElement,
        name: String,
        testcases: impl Iterator<Item = &'a XmlElement>,
    ) -> Suite {
        let attrs = self.dialect.attributes();
        let mut suite = Suite::new(name);
        suite.source_id = node.attr_or_empty(attrs.id).to_string();
        suite.timestamp = node.attr_or_empty(attrs.timestamp).to_string();
        suite.hostname = node.attr_or_empty(attrs.hostname).to_string();
        suite.package = node.attr_or_empty(attrs.package).to_string();
        suite.is_skipped = is_true(node.attr("skipped"));
        suite.is_disabled = is_true(node.attr("disabled"));
        suite.summary = summary_from_attrs(node, attrs.time);

        if let Some(properties) = node.child(PROPERTIES_TAG) {
            for property in properties.children_named(PROPERTY_TAG) {
                let value = property.attr("value").unwrap_or(property.text.as_str());
                suite
                    .properties
                    .insert(property.attr_or_empty("name").to_string(), value.to_string());
            }
        }

        suite.system_out = text_of(node, SYSTEM_OUT_TAG);
        suite.system_err = text_of(node, SYSTEM_ERR_TAG);

        let suite_file = node.attr_or_empty(attrs.file);
        for testcase in testcases {
            suite.append_test(self.build_test(testcase, suite_file));
        }

        suite
    }

    fn build_test(&self, node: &XmlElement, suite_file: &str) -> Test {
        let attrs = self.dialect.attributes();
        let mut test = Test::new(node.attr_or_empty(attrs.name), self.sem_env.clone());
        test.source_id = node.attr_or_empty(attrs.id).to_string();
        test.classname = self.dialect.classname(node.attr_or_empty(attrs.classname));
        test.package = node.attr_or_empty(attrs.package).to_string();
        test.duration = parse_seconds(node.attr_or_empty(attrs.time));

        let file = match node.attr(attrs.file) {
            Some(file) if !file.is_empty() => file,
            _ if self.dialect.inherits_suite_file() => suite_file,
            _ => "",
        };
        test.file = self.dialect.file(file);

        if is_true(node.attr("disabled")) {
            test.state = State::Disabled;
        }

        for child in &node.children {
            match child.name.as_str() {
                FAILURE_TAG => test.fail(fault_from(child)),
                ERROR_TAG => test.error(fault_from(child)),
                SKIPPED_TAG => test.state = State::Skipped,
                SYSTEM_OUT_TAG => test.system_out = child.text.clone(),
                SYSTEM_ERR_TAG => test.system_err = child.text.clone(),
                _ => (),
            }
        }

        test
    }
}

impl Parser for JunitParser {
    fn name(&self) -> &'static str {
        self.dialect.name()
    }

    fn supported_extensions(&self) -> &'static [&'static str] {
        XML_EXTENSIONS
    }

    fn is_applicable(&self, file: &ReportFile) -> bool {
        if self.dialect == Dialect::Generic {
            return true;
        }
        match file.xml() {
            Ok(root) => self.dialect.matches(root),
            Err(_) => false,
        }
    }

    fn parse(&self, file: &ReportFile) -> TestResults {
        let fallback_name = self.dialect.default_results_name();
        let root = match file.xml() {
            Ok(root) => root,
            Err(e) => {
                debug!("{}: {}", file.path().display(), e);
                return TestResults::failed(fallback_name, self.name(), e.to_string());
            }
        };

        let mut results = match root.name.as_str() {
            TESTSUITES_TAG => self.results_from_testsuites(root),
            TESTSUITE_TAG => self.results_from_testsuite(root),
            other => {
                return TestResults::failed(
                    fallback_name,
                    self.name(),
                    format!(
                        "Invalid root element found: <{}>, must be one of <{}>, <{}>",
                        other, TESTSUITES_TAG, TESTSUITE_TAG
                    ),
                );
            }
        };

        results.regenerate_id();
        self.dialect.finish(&mut results);
        results.aggregate();

        debug!(
            "{}: parsed {} suites, {} tests as {}",
            file.path().display(),
            results.suites.len(),
            results.summary.total,
            self.name()
        );

        results
    }
}

/// Counters declared on a container element
///
/// Only `duration` survives aggregation, and only when it exceeds the sum of
/// the test durations.
fn summary_from_attrs(node: &XmlElement, time_attr: &str) -> Summary {
    let count = |key: &str| {
        node.attr(key)
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(0)
    };

    let mut summary = Summary {
        total: count("tests"),
        failed: count("failures"),
        error: count("errors"),
        disabled: count("disabled"),
        skipped: count("skipped"),
        duration: parse_seconds(node.attr_or_empty(time_attr)),
        ..Summary::default()
    };
    let not_passed = [summary.failed, summary.error, summary.disabled, summary.skipped]
        .into_iter()
        .fold(0usize, usize::saturating_add);
    summary.passed = summary.total.saturating_sub(not_passed);
    summary
}

fn fault_from(node: &XmlElement) -> Fault {
    Fault {
        message: node.attr_or_empty("message").to_string(),
        kind: node.attr_or_empty("type").to_string(),
        body: node.text.clone(),
    }
}

fn text_of(node: &XmlElement, tag: &str) -> String {
    node.child(tag).map(|c| c.text.clone()).unwrap_or_default()
}

fn is_true(value: Option<&str>) -> bool {
    value.is_some_and(|v| v.trim().eq_ignore_ascii_case("true"))
}

/// Parse a duration in (possibly fractional) seconds
///
/// Thousands separators are ignored; anything unparseable is zero.
pub(crate) fn parse_seconds(raw: &str) -> Duration {
    let cleaned: String = raw.chars().filter(|c| *c != ',').collect();
    match cleaned.trim().parse::<f64>() {
        Ok(seconds) if seconds.is_finite() => Duration::nanoseconds((seconds * 1e9).round() as i64),
        _ => Duration::zero(),
    }
}
