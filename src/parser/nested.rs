use super::dialect::Naming;
use crate::xml::XmlElement;

const SUITE_TAG: &str = "testsuite";
const CASE_TAG: &str = "testcase";

/// A suite collapsed out of a nested `<testsuite>` tree
#[derive(Debug)]
pub(crate) struct FlatSuite<'a> {
    pub name: String,
    /// The test-bearing node the suite's attributes are read from
    pub node: &'a XmlElement,
    /// Every `<testcase>` beneath `node`, in document order
    pub testcases: Vec<&'a XmlElement>,
}

/// Collapse nested suites into one flat level
///
/// Walking down from each top-level suite, the first node on a branch that
/// directly holds test cases becomes a suite owning every test case in its
/// subtree. Branches without any test case produce nothing.
pub(crate) fn flatten_suites<'a>(
    top_level: impl Iterator<Item = &'a XmlElement>,
    naming: Naming,
) -> Vec<FlatSuite<'a>> {
    let mut out = Vec::new();
    let mut path = Vec::new();
    for suite in top_level {
        walk(suite, &mut path, naming, &mut out);
    }
    out
}

fn walk<'a>(
    node: &'a XmlElement,
    path: &mut Vec<&'a str>,
    naming: Naming,
    out: &mut Vec<FlatSuite<'a>>,
) {
    path.push(node.attr_or_empty("name"));

    if node.child(CASE_TAG).is_some() {
        out.push(FlatSuite {
            name: flat_name(node, path, naming),
            node,
            testcases: node.descendants().filter(|e| e.name == CASE_TAG).collect(),
        });
    } else {
        for child in node.children_named(SUITE_TAG) {
            walk(child, path, naming, out);
        }
    }

    path.pop();
}

fn flat_name(node: &XmlElement, path: &[&str], naming: Naming) -> String {
    let joined = |separator: &str| {
        path.iter()
            .filter(|p| !p.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(separator)
    };

    match naming {
        Naming::JoinPath(separator) => joined(separator),
        Naming::Own => match node.attr("name") {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => joined("/"),
        },
    }
}
