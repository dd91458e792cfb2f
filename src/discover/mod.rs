//! Expanding directory inputs into report files


use crate::merge::InputSpec;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

#[derive(Error, Debug)]
#[error("Failed to scan {path}: {source}")]
pub struct DiscoverError {
    pub path: String,
    #[source]
    pub source: io::Error,
}

/// Replace every directory input with the report files found beneath it
///
/// Files are kept when their extension, ignoring a trailing `.gz`, is one of
/// `extensions`. Files found in one directory inherit its parser suffix and
/// are sorted by path. Non-directory inputs pass through untouched.
pub fn expand_inputs(
    inputs: Vec<InputSpec>,
    extensions: &[&str],
) -> Result<Vec<InputSpec>, DiscoverError> {
    let mut expanded = Vec::with_capacity(inputs.len());

    for input in inputs {
        if !input.path.is_dir() {
            expanded.push(input);
            continue;
        }

        let found = find_report_files(&input.path, extensions)?;
        debug!("{}: found {} report files", input.path.display(), found.len());
        expanded.extend(found.into_iter().map(|path| InputSpec {
            path,
            parser: input.parser.clone(),
        }));
    }

    Ok(expanded)
}

/// Recursively collect files under `root` with a supported extension
pub fn find_report_files(root: &Path, extensions: &[&str]) -> Result<Vec<PathBuf>, DiscoverError> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e))
    {
        let entry = entry.map_err(|e| DiscoverError {
            path: root.display().to_string(),
            source: e.into(),
        })?;

        if entry.file_type().is_file() && has_report_extension(entry.path(), extensions) {
            files.push(entry.into_path());
        }
    }

    files.sort();
    Ok(files)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_str().is_some_and(|name| name.starts_with('.'))
}

fn has_report_extension(path: &Path, extensions: &[&str]) -> bool {
    let extension = |p: &Path| {
        p.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
    };

    let ext = match extension(path) {
        Some(ext) if ext == "gz" => path.file_stem().and_then(|stem| extension(Path::new(stem))),
        other => other,
    };

    ext.is_some_and(|ext| extensions.contains(&ext.as_str()))
}
