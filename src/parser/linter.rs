use super::{Parser, ReportFile};
use crate::model::{Fault, SemEnv, Suite, Test, TestResults};
use serde::Deserialize;
use std::collections::HashMap;
use tracing::debug;

const NDJSON_EXTENSIONS: &[&str] = &["json", "jsonl", "ndjson"];

/// Name of the synthetic test recorded when a linter found nothing
const NO_ISSUES_TEST: &str = "No issues found";

/// Static analyzers emitting one JSON finding per line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Linter {
    Staticcheck,
    Revive,
}

/// A linter finding, independent of the tool that reported it
#[derive(Debug, Clone, PartialEq, Eq)]
struct Finding {
    file: String,
    line: u64,
    column: u64,
    rule: String,
    category: String,
    message: String,
    severity: String,
}

#[derive(Debug, Deserialize)]
struct StaticcheckIssue {
    code: String,
    #[serde(default)]
    severity: String,
    location: StaticcheckLocation,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct StaticcheckLocation {
    #[serde(default)]
    file: String,
    #[serde(default)]
    line: u64,
    #[serde(default)]
    column: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ReviveIssue {
    #[serde(default)]
    severity: String,
    #[serde(default)]
    failure: String,
    rule_name: String,
    #[serde(default)]
    category: String,
    position: RevivePosition,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RevivePosition {
    start: ReviveLocation,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ReviveLocation {
    #[serde(default)]
    filename: String,
    #[serde(default)]
    line: u64,
    #[serde(default)]
    column: u64,
}

impl Linter {
    pub const ALL: [Linter; 2] = [Linter::Staticcheck, Linter::Revive];

    pub fn name(self) -> &'static str {
        match self {
            Linter::Staticcheck => "go:staticcheck",
            Linter::Revive => "go:revive",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Linter::Staticcheck => "Staticcheck",
            Linter::Revive => "Revive",
        }
    }

    /// Decode one line of linter output, `None` if it is not a finding
    fn decode(self, line: &str) -> Option<Finding> {
        match self {
            Linter::Staticcheck => {
                let issue: StaticcheckIssue = serde_json::from_str(line).ok()?;
                Some(Finding {
                    file: issue.location.file,
                    line: issue.location.line,
                    column: issue.location.column,
                    rule: issue.code,
                    category: String::new(),
                    message: issue.message,
                    severity: issue.severity,
                })
            }
            Linter::Revive => {
                let issue: ReviveIssue = serde_json::from_str(line).ok()?;
                Some(Finding {
                    file: issue.position.start.filename,
                    line: issue.position.start.line,
                    column: issue.position.start.column,
                    rule: issue.rule_name,
                    category: issue.category,
                    message: issue.failure,
                    severity: issue.severity,
                })
            }
        }
    }
}

/// Parser for newline-delimited JSON linter output
pub struct LinterParser {
    linter: Linter,
    sem_env: SemEnv,
}

impl LinterParser {
    pub fn new(linter: Linter, sem_env: SemEnv) -> Self {
        Self { linter, sem_env }
    }

    pub fn linter(&self) -> Linter {
        self.linter
    }

    fn test_for(&self, finding: Finding) -> Test {
        let location = format!("{}:{}:{}", finding.file, finding.line, finding.column);
        let mut test = Test::new(
            format!("{} {}", location, finding.message),
            self.sem_env.clone(),
        );
        test.classname = finding.rule.clone();
        test.file = finding.file;

        let body = if finding.category.is_empty() {
            format!("{}: {}", location, finding.message)
        } else {
            format!("{}: {} ({})", location, finding.message, finding.category)
        };
        let fault = Fault {
            message: finding.message,
            kind: finding.rule,
            body,
        };

        if finding.severity.eq_ignore_ascii_case("error") {
            test.error(fault);
        } else {
            test.fail(fault);
        }
        test
    }
}

impl Parser for LinterParser {
    fn name(&self) -> &'static str {
        self.linter.name()
    }

    fn supported_extensions(&self) -> &'static [&'static str] {
        NDJSON_EXTENSIONS
    }

    fn is_applicable(&self, file: &ReportFile) -> bool {
        if !NDJSON_EXTENSIONS.contains(&file.extension().as_str()) {
            return false;
        }
        let text = file.text();
        let first = text.lines().map(str::trim).find(|l| !l.is_empty());
        first.is_some_and(|line| self.linter.decode(line).is_some())
    }

    fn parse(&self, file: &ReportFile) -> TestResults {
        let text = file.text();
        let mut results = TestResults::new(self.linter.display_name(), self.name());

        let mut findings = Vec::new();
        for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
            match self.linter.decode(line) {
                Some(finding) => findings.push(finding),
                None => debug!("{}: skipping unparseable line", file.path().display()),
            }
        }

        if findings.is_empty() {
            let mut suite = Suite::new(self.linter.display_name());
            suite.append_test(Test::new(NO_ISSUES_TEST, self.sem_env.clone()));
            results.suites.push(suite);
        } else {
            let mut index: HashMap<String, usize> = HashMap::new();
            for finding in findings {
                let i = *index.entry(finding.file.clone()).or_insert_with(|| {
                    results.suites.push(Suite::new(finding.file.clone()));
                    results.suites.len() - 1
                });
                let test = self.test_for(finding);
                results.suites[i].append_test(test);
            }
        }

        results.regenerate_id();
        results.aggregate();
        results
    }
}
