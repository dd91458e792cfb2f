use super::LoadError;
use crate::parser::ReportFile;
use flate2::read::GzDecoder;
use std::collections::HashMap;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// First two bytes of every gzip stream
pub const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

struct CachedFile {
    /// Size on disk when loaded, before decompression
    disk_size: u64,
    file: Arc<ReportFile>,
}

/// Loaded report files keyed by path
///
/// An entry is reused while the file keeps the same size on disk. Safe to
/// share between threads loading files in parallel.
#[derive(Default)]
pub struct FileCache {
    entries: Mutex<HashMap<PathBuf, CachedFile>>,
}

impl FileCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `path`, transparently decompressing gzip payloads
    pub fn load(&self, path: &Path) -> Result<Arc<ReportFile>, LoadError> {
        let display = || path.display().to_string();

        let metadata = fs::metadata(path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => LoadError::NotFound(display()),
            _ => LoadError::Io {
                path: display(),
                source,
            },
        })?;
        if !metadata.is_file() {
            return Err(LoadError::NotAFile(display()));
        }

        if let Some(cached) = self.lock().get(path) {
            if cached.disk_size == metadata.len() {
                debug!("{}: cache hit", path.display());
                return Ok(Arc::clone(&cached.file));
            }
        }

        let raw = fs::read(path).map_err(|source| LoadError::Io {
            path: display(),
            source,
        })?;
        let bytes = decompress(raw).map_err(|source| LoadError::Decompress {
            path: display(),
            source,
        })?;

        let file = Arc::new(ReportFile::new(path, bytes));
        self.lock().insert(
            path.to_path_buf(),
            CachedFile {
                disk_size: metadata.len(),
                file: Arc::clone(&file),
            },
        );
        Ok(file)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<PathBuf, CachedFile>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Gunzip `raw` when it starts with the gzip magic, else return it as is
pub fn decompress(raw: Vec<u8>) -> io::Result<Vec<u8>> {
    if !raw.starts_with(&GZIP_MAGIC) {
        return Ok(raw);
    }

    let mut decoded = Vec::new();
    GzDecoder::new(raw.as_slice()).read_to_end(&mut decoded)?;
    Ok(decoded)
}
