use crate::model::{Suite, TestResults};
use crate::xml::XmlElement;

/// Attribute names a dialect reads canonical fields from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeMap {
    pub name: &'static str,
    pub time: &'static str,
    pub classname: &'static str,
    pub file: &'static str,
    pub package: &'static str,
    pub id: &'static str,
    pub timestamp: &'static str,
    pub hostname: &'static str,
}

impl AttributeMap {
    pub const JUNIT: AttributeMap = AttributeMap {
        name: "name",
        time: "time",
        classname: "classname",
        file: "file",
        package: "package",
        id: "id",
        timestamp: "timestamp",
        hostname: "hostname",
    };

    /// PHPUnit writes the namespaced class name to `class`
    pub const PHPUNIT: AttributeMap = AttributeMap {
        classname: "class",
        ..AttributeMap::JUNIT
    };
}

/// JUnit XML flavours, in registry priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    PhpUnit,
    Embedded,
    GoLang,
    ExUnit,
    Mocha,
    RSpec,
    /// Catch-all, applicable to any file
    Generic,
}

/// How nested `<testsuite>` trees are turned into suites
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Layout {
    /// Only direct `<testsuite>` children of the root are suites
    Flat,
    /// Nested trees collapse into one suite per test-bearing node
    Nested(Naming),
}

/// Name given to a suite collapsed out of a nested tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Naming {
    /// Non-empty ancestor names joined with the separator
    JoinPath(&'static str),
    /// The test-bearing node's own name, already fully qualified
    Own,
}

const EXUNIT_PREFIX: &str = "Elixir.";
const MOCHA_ROOT_SUITE: &str = "Root Suite";

impl Dialect {
    pub const ALL: [Dialect; 7] = [
        Dialect::PhpUnit,
        Dialect::Embedded,
        Dialect::GoLang,
        Dialect::ExUnit,
        Dialect::Mocha,
        Dialect::RSpec,
        Dialect::Generic,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Dialect::PhpUnit => "phpunit",
            Dialect::Embedded => "embedded",
            Dialect::GoLang => "golang",
            Dialect::ExUnit => "exunit",
            Dialect::Mocha => "mocha",
            Dialect::RSpec => "rspec",
            Dialect::Generic => "generic",
        }
    }

    /// Name given to runs whose report does not name them
    pub fn default_results_name(self) -> &'static str {
        match self {
            Dialect::PhpUnit => "PHPUnit Suite",
            Dialect::Embedded => "Embedded Suite",
            Dialect::GoLang => "Golang Suite",
            Dialect::ExUnit => "Exunit Suite",
            Dialect::Mocha => "Mocha Suite",
            Dialect::RSpec => "RSpec Suite",
            Dialect::Generic => "Generic Suite",
        }
    }

    pub fn attributes(self) -> &'static AttributeMap {
        match self {
            Dialect::PhpUnit => &AttributeMap::PHPUNIT,
            _ => &AttributeMap::JUNIT,
        }
    }

    pub(crate) fn layout(self) -> Layout {
        match self {
            Dialect::PhpUnit => Layout::Nested(Naming::Own),
            Dialect::Embedded => Layout::Nested(Naming::JoinPath(" / ")),
            _ => Layout::Flat,
        }
    }

    /// Whether a decoded document belongs to this dialect
    pub fn matches(self, root: &XmlElement) -> bool {
        let suites = || root.descendants().filter(|e| e.name == "testsuite");
        let has_nested_suite = || suites().any(|s| s.child("testsuite").is_some());

        match self {
            Dialect::PhpUnit => {
                has_nested_suite()
                    && root
                        .descendants()
                        .any(|e| e.name == "testcase" && e.attr("class").is_some())
            }
            Dialect::Embedded => has_nested_suite(),
            Dialect::GoLang => root
                .descendants()
                .any(|e| e.name == "property" && e.attr("name") == Some("go.version")),
            Dialect::ExUnit => suites().any(|s| s.attr_or_empty("name").starts_with(EXUNIT_PREFIX)),
            Dialect::Mocha => {
                root.name == "testsuites"
                    && root.attr_or_empty("name").to_lowercase().contains("mocha")
            }
            Dialect::RSpec => suites().any(|s| s.attr_or_empty("name").starts_with("rspec")),
            Dialect::Generic => true,
        }
    }

    pub(crate) fn suite_name(self, raw: &str) -> String {
        match self {
            Dialect::ExUnit => raw.strip_prefix(EXUNIT_PREFIX).unwrap_or(raw).to_string(),
            _ => raw.to_string(),
        }
    }

    pub(crate) fn classname(self, raw: &str) -> String {
        match self {
            Dialect::ExUnit => raw.strip_prefix(EXUNIT_PREFIX).unwrap_or(raw).to_string(),
            _ => raw.to_string(),
        }
    }

    pub(crate) fn file(self, raw: &str) -> String {
        match self {
            Dialect::RSpec => raw.strip_prefix("./").unwrap_or(raw).to_string(),
            _ => raw.to_string(),
        }
    }

    /// Whether tests without a `file` take the one declared on their suite
    pub(crate) fn inherits_suite_file(self) -> bool {
        matches!(self, Dialect::Mocha)
    }

    pub(crate) fn keeps_suite(self, suite: &Suite) -> bool {
        match self {
            Dialect::Mocha => !(suite.name == MOCHA_ROOT_SUITE && suite.tests.is_empty()),
            _ => true,
        }
    }

    /// Dialect-specific regrouping once IDs are derived
    pub(crate) fn finish(self, results: &mut TestResults) {
        if self == Dialect::RSpec {
            results.arrange_suites_by_test_file();
        }
    }
}
