use std::path::PathBuf;

/// One input file, optionally forced to a specific parser
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputSpec {
    pub path: PathBuf,
    pub parser: Option<String>,
}

impl InputSpec {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            parser: None,
        }
    }

    pub fn with_parser(path: impl Into<PathBuf>, parser: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            parser: Some(parser.into()),
        }
    }

    /// Parse `path` or `path:parser`
    ///
    /// The suffix is only split off when it names one of `known_parsers`, so
    /// paths that contain colons are left intact. Parser names may contain
    /// colons themselves (`go:revive`); the longest matching name wins.
    pub fn parse(raw: &str, known_parsers: &[&str]) -> Self {
        let matched = known_parsers
            .iter()
            .filter(|name| {
                raw.len() > name.len() + 1
                    && raw.ends_with(*name)
                    && raw[..raw.len() - name.len()].ends_with(':')
            })
            .max_by_key(|name| name.len());

        match matched {
            Some(name) => Self::with_parser(&raw[..raw.len() - name.len() - 1], *name),
            None => Self::new(raw),
        }
    }
}
