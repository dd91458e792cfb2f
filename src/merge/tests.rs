use super::*;
use crate::model::{SemEnv, State};
use crate::parser::ParserRegistry;
use flate2::Compression;
use flate2::write::GzEncoder;
use pretty_assertions::assert_eq;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

const SHARD_A: &str = r#"<testsuites name="Unit">
  <testsuite name="S">
    <testcase name="1" classname="C"/>
    <testcase name="2" classname="C"><system-out>two passed</system-out></testcase>
  </testsuite>
</testsuites>"#;

const SHARD_B: &str = r#"<testsuites name="Unit">
  <testsuite name="S">
    <testcase name="2" classname="C"><failure message="flaky">trace</failure></testcase>
    <testcase name="3" classname="C"/>
  </testsuite>
</testsuites>"#;

fn registry() -> ParserRegistry {
    ParserRegistry::with_env(SemEnv::default())
}

fn write(dir: &TempDir, name: &str, contents: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn gzip(bytes: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes).unwrap();
    encoder.finish().unwrap()
}

fn compile(paths: &[&PathBuf], options: MergeOptions) -> Result<MergeOutcome, MergeError> {
    let registry = registry();
    let cache = FileCache::new();
    let inputs: Vec<InputSpec> = paths.iter().map(|p| InputSpec::new(*p)).collect();
    MergeDriver::new(&registry, &cache, options).compile(&inputs)
}

// ========================================================================
// Compile
// ========================================================================

#[test]
fn test_compile_merges_shards() {
    let dir = TempDir::new().unwrap();
    let a = write(&dir, "a.xml", SHARD_A.as_bytes());
    let b = write(&dir, "b.xml", SHARD_B.as_bytes());

    let outcome = compile(&[&a, &b], MergeOptions::new()).unwrap();
    assert!(outcome.rejected.is_empty());

    let report = outcome.report;
    assert_eq!(report.test_results.len(), 1);
    let suite = &report.test_results[0].suites[0];
    let mut names: Vec<&str> = suite.tests.iter().map(|t| t.name.as_str()).collect();
    names.sort();
    assert_eq!(names, vec!["1", "2", "3"]);

    let two = suite.tests.iter().find(|t| t.name == "2").unwrap();
    assert_eq!(two.state, State::Failed);
    assert_eq!(report.test_results[0].summary.failed, 1);
    assert_eq!(report.test_results[0].summary.total, 3);
}

#[test]
fn test_compile_is_independent_of_input_order() {
    let dir = TempDir::new().unwrap();
    let a = write(&dir, "a.xml", SHARD_A.as_bytes());
    let b = write(&dir, "b.xml", SHARD_B.as_bytes());

    let ab = compile(&[&a, &b], MergeOptions::new()).unwrap().report;
    let ba = compile(&[&b, &a], MergeOptions::new()).unwrap().report;
    assert_eq!(marshal(&ab).unwrap(), marshal(&ba).unwrap());
}

#[test]
fn test_compile_rejects_unparseable_files() {
    let dir = TempDir::new().unwrap();
    let good = write(&dir, "good.xml", SHARD_A.as_bytes());
    let bad = write(&dir, "bad.xml", b"<nontestsuites/>");

    let outcome = compile(&[&good, &bad], MergeOptions::new()).unwrap();
    assert_eq!(outcome.report.test_results.len(), 1);
    assert_eq!(outcome.rejected.len(), 1);
    assert!(outcome.rejected[0].is_error());
    assert!(outcome.rejected[0].status_message.contains("nontestsuites"));
}

#[test]
fn test_missing_file_is_fatal_by_default() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing.xml");

    let err = compile(&[&missing], MergeOptions::new()).unwrap_err();
    assert!(err.is_resolution());
    assert!(matches!(err, MergeError::Load(LoadError::NotFound(_))));
}

#[test]
fn test_missing_file_is_skipped_when_ignored() {
    let dir = TempDir::new().unwrap();
    let good = write(&dir, "good.xml", SHARD_A.as_bytes());
    let missing = dir.path().join("missing.xml");

    let outcome = compile(&[&missing, &good], MergeOptions::new().ignore_missing(true)).unwrap();
    assert_eq!(outcome.report.test_count(), 2);
}

#[test]
fn test_unknown_parser_is_a_resolution_error() {
    let dir = TempDir::new().unwrap();
    let good = write(&dir, "good.xml", SHARD_A.as_bytes());

    let err = compile(&[&good], MergeOptions::new().parser("nope")).unwrap_err();
    assert!(err.is_resolution());
}

#[test]
fn test_input_parser_suffix_overrides_option() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "a.xml", SHARD_A.as_bytes());

    let registry = registry();
    let cache = FileCache::new();
    let driver = MergeDriver::new(&registry, &cache, MergeOptions::new().parser("golang"));

    let forced = driver
        .parse_input(&InputSpec::with_parser(&path, "mocha"))
        .unwrap();
    assert_eq!(forced.framework, "mocha");

    let default = driver.parse_input(&InputSpec::new(&path)).unwrap();
    assert_eq!(default.framework, "golang");
}

#[test]
fn test_name_override_merges_runs() {
    let dir = TempDir::new().unwrap();
    let a = write(&dir, "a.xml", SHARD_A.as_bytes());
    let renamed = SHARD_B.replace("name=\"Unit\"", "name=\"Other\"");
    let b = write(&dir, "b.xml", renamed.as_bytes());

    let separate = compile(&[&a, &b], MergeOptions::new()).unwrap().report;
    assert_eq!(separate.test_results.len(), 2);

    let merged = compile(&[&a, &b], MergeOptions::new().name("Backend")).unwrap().report;
    assert_eq!(merged.test_results.len(), 1);
    assert_eq!(merged.test_results[0].name, "Backend");
    assert_eq!(merged.test_count(), 3);
}

#[test]
fn test_output_options() {
    let dir = TempDir::new().unwrap();
    let a = write(&dir, "a.xml", SHARD_A.as_bytes());
    let failing = r#"<testsuite name="S"><testcase name="x"><failure/><system-out>0123456789</system-out></testcase></testsuite>"#;
    let b = write(&dir, "b.xml", failing.as_bytes());

    let options = MergeOptions::new()
        .omit_output_for_passed(true)
        .trim_output_to(4);
    let report = compile(&[&a, &b], options).unwrap().report;

    for test in report
        .test_results
        .iter()
        .flat_map(|r| r.suites.iter())
        .flat_map(|s| s.tests.iter())
    {
        match test.state {
            State::Passed => assert_eq!(test.system_out, ""),
            _ => assert_eq!(test.system_out, "0123"),
        }
    }
}

// ========================================================================
// Combine serialized reports
// ========================================================================

#[test]
fn test_combine_reads_raw_and_gzip_reports() {
    let dir = TempDir::new().unwrap();
    let a = write(&dir, "a.xml", SHARD_A.as_bytes());
    let b = write(&dir, "b.xml", SHARD_B.as_bytes());

    let part_a = compile(&[&a], MergeOptions::new()).unwrap().report;
    let part_b = compile(&[&b], MergeOptions::new()).unwrap().report;

    let raw = dir.path().join("a.json");
    let zipped = dir.path().join("b.json.gz");
    write_report(&raw, &part_a, false).unwrap();
    write_report(&zipped, &part_b, true).unwrap();
    assert!(fs::read(&zipped).unwrap().starts_with(&GZIP_MAGIC));

    let registry = registry();
    let cache = FileCache::new();
    let driver = MergeDriver::new(&registry, &cache, MergeOptions::new());
    let combined = driver.combine(&[raw, zipped]).unwrap();

    let direct = compile(&[&a, &b], MergeOptions::new()).unwrap().report;
    assert_eq!(combined, direct);
}

#[test]
fn test_combine_rejects_invalid_json() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "broken.json", b"{ not json");

    let registry = registry();
    let cache = FileCache::new();
    let driver = MergeDriver::new(&registry, &cache, MergeOptions::new());
    let err = driver.combine(&[path]).unwrap_err();
    assert!(matches!(err, MergeError::Decode { .. }));
}

// ========================================================================
// Cache and input specs
// ========================================================================

#[test]
fn test_cache_reuses_and_invalidates() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "a.xml", b"<testsuite/>");

    let cache = FileCache::new();
    let first = cache.load(&path).unwrap();
    let second = cache.load(&path).unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(cache.len(), 1);

    fs::write(&path, b"<testsuite name=\"changed\"/>").unwrap();
    let third = cache.load(&path).unwrap();
    assert!(!Arc::ptr_eq(&first, &third));
    assert_eq!(third.bytes(), b"<testsuite name=\"changed\"/>");

    cache.clear();
    assert!(cache.is_empty());
}

#[test]
fn test_cache_decompresses_gzip() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "report.xml", &gzip(SHARD_A.as_bytes()));

    let file = FileCache::new().load(&path).unwrap();
    assert_eq!(file.bytes(), SHARD_A.as_bytes());
}

#[test]
fn test_cache_rejects_directories() {
    let dir = TempDir::new().unwrap();
    let err = FileCache::new().load(dir.path()).unwrap_err();
    assert!(matches!(err, LoadError::NotAFile(_)));
}

#[test]
fn test_decompress_passes_plain_bytes_through() {
    assert_eq!(decompress(b"plain".to_vec()).unwrap(), b"plain".to_vec());
    assert!(decompress(vec![0x1f, 0x8b, 0x00]).is_err());
}

#[test]
fn test_input_spec_parse() {
    let known = ["golang", "go:revive", "revive", "rspec"];

    assert_eq!(InputSpec::parse("a.xml", &known), InputSpec::new("a.xml"));
    assert_eq!(
        InputSpec::parse("a.xml:rspec", &known),
        InputSpec::with_parser("a.xml", "rspec")
    );
    assert_eq!(
        InputSpec::parse("lint.json:go:revive", &known),
        InputSpec::with_parser("lint.json", "go:revive")
    );
    assert_eq!(InputSpec::parse("C:\\a.xml", &known), InputSpec::new("C:\\a.xml"));
    assert_eq!(InputSpec::parse("a.xml:nope", &known), InputSpec::new("a.xml:nope"));
    assert_eq!(InputSpec::parse(":rspec", &known), InputSpec::new(":rspec"));
}
