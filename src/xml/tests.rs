use super::*;

#[test]
fn test_parse_nested_elements() {
    let xml = br#"<?xml version="1.0" encoding="UTF-8"?>
<testsuites name="all">
  <testsuite name="a" tests="2">
    <testcase name="one"/>
    <testcase name="two"><failure message="bad">trace</failure></testcase>
  </testsuite>
</testsuites>"#;

    let root = parse_document(xml).unwrap();
    assert_eq!(root.name, "testsuites");
    assert_eq!(root.attr("name"), Some("all"));

    let suite = root.child("testsuite").unwrap();
    assert_eq!(suite.children_named("testcase").count(), 2);

    let failure = suite.children[1].child("failure").unwrap();
    assert_eq!(failure.attr("message"), Some("bad"));
    assert_eq!(failure.text, "trace");
}

#[test]
fn test_unescapes_attributes_and_text() {
    let xml = br#"<testcase name="a &lt; b"><system-out>x &amp; y</system-out></testcase>"#;
    let root = parse_document(xml).unwrap();
    assert_eq!(root.attr("name"), Some("a < b"));
    assert_eq!(root.child("system-out").unwrap().text, "x & y");
}

#[test]
fn test_cdata_is_kept_verbatim() {
    let xml = b"<system-out><![CDATA[<not> a tag & raw]]></system-out>";
    let root = parse_document(xml).unwrap();
    assert_eq!(root.text, "<not> a tag & raw");
}

#[test]
fn test_missing_attribute() {
    let root = parse_document(b"<testcase/>").unwrap();
    assert_eq!(root.attr("time"), None);
    assert_eq!(root.attr_or_empty("time"), "");
}

#[test]
fn test_descendants_in_document_order() {
    let root = parse_document(b"<a><b><c/></b><d/></a>").unwrap();
    let names: Vec<&str> = root.descendants().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["a", "b", "c", "d"]);
}

#[test]
fn test_empty_document() {
    assert_eq!(parse_document(b"").unwrap_err(), XmlError::Empty);
    assert_eq!(parse_document(b"   \n").unwrap_err(), XmlError::Empty);
}

#[test]
fn test_mismatched_tags_fail() {
    let result = parse_document(b"<a><b></a>");
    assert!(matches!(result, Err(XmlError::Malformed(_))));
}

#[test]
fn test_unclosed_element_fails() {
    let result = parse_document(b"<testsuites><testsuite>");
    assert!(result.is_err());
}

#[test]
fn test_not_xml_fails() {
    let result = parse_document(b"{\"json\": true}");
    assert!(result.is_err());
}
