use crate::xml::{XmlElement, XmlError, parse_document};
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// A report file's path and decoded bytes, shared by every parser probing it
#[derive(Debug)]
pub struct ReportFile {
    path: PathBuf,
    bytes: Vec<u8>,
    /// XML tree, decoded on first use
    xml: OnceLock<Result<XmlElement, XmlError>>,
}

impl ReportFile {
    pub fn new(path: impl Into<PathBuf>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            bytes: bytes.into(),
            xml: OnceLock::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Lowercase file extension, empty when there is none
    ///
    /// A trailing `.gz` is looked through, since the payload has already been
    /// decompressed: `lint.json.gz` reports `json`.
    pub fn extension(&self) -> String {
        let extension = |path: &Path| {
            path.extension()
                .and_then(|e| e.to_str())
                .map(|s| s.to_lowercase())
        };

        match extension(&self.path) {
            Some(ext) if ext == "gz" => self
                .path
                .file_stem()
                .and_then(|stem| extension(Path::new(stem)))
                .unwrap_or(ext),
            other => other.unwrap_or_default(),
        }
    }

    /// Contents as text, replacing invalid UTF-8 sequences
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.bytes)
    }

    /// Root element of the file decoded as XML
    pub fn xml(&self) -> Result<&XmlElement, &XmlError> {
        self.xml
            .get_or_init(|| parse_document(&self.bytes))
            .as_ref()
    }
}
