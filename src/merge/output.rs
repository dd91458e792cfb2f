use super::MergeError;
use crate::model::Report;
use crate::parser::ReportFile;
use flate2::Compression;
use flate2::write::GzEncoder;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Serialize a report to its canonical JSON bytes
pub fn marshal(report: &Report) -> Result<Vec<u8>, MergeError> {
    Ok(serde_json::to_vec(report)?)
}

/// Decode a report previously written by `write_report`
pub fn unmarshal(file: &ReportFile) -> Result<Report, MergeError> {
    serde_json::from_slice(file.bytes()).map_err(|source| MergeError::Decode {
        path: file.path().display().to_string(),
        source,
    })
}

/// Write a report to `path`, gzip-compressed when asked
pub fn write_report(path: &Path, report: &Report, gzip: bool) -> Result<(), MergeError> {
    let json = marshal(report)?;
    let write_err = |source| MergeError::Write {
        path: path.display().to_string(),
        source,
    };

    let bytes = if gzip {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&json).map_err(write_err)?;
        encoder.finish().map_err(write_err)?
    } else {
        json
    };

    fs::write(path, bytes).map_err(write_err)
}
