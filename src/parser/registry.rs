use super::{Dialect, JunitParser, Linter, LinterParser, Parser, RegistryError, ReportFile};
use crate::model::SemEnv;
use tracing::debug;

/// Ordered list of parsers, most specific first
///
/// The generic JUnit parser accepts every file, so it always stays last.
pub struct ParserRegistry {
    parsers: Vec<Box<dyn Parser>>,
}

impl ParserRegistry {
    /// Create a registry with every built-in parser, capturing the CI
    /// environment from the process
    pub fn new() -> Self {
        Self::with_env(SemEnv::from_env())
    }

    /// Create a registry whose parsers stamp tests with `sem_env`
    pub fn with_env(sem_env: SemEnv) -> Self {
        let mut parsers: Vec<Box<dyn Parser>> = Vec::new();

        for dialect in Dialect::ALL {
            if dialect != Dialect::Generic {
                parsers.push(Box::new(JunitParser::new(dialect, sem_env.clone())));
            }
        }
        for linter in Linter::ALL {
            parsers.push(Box::new(LinterParser::new(linter, sem_env.clone())));
        }
        parsers.push(Box::new(JunitParser::new(Dialect::Generic, sem_env)));

        Self { parsers }
    }

    /// Register a parser ahead of the generic catch-all
    ///
    /// # Example
    /// ```ignore
    /// registry.register(MyFrameworkParser::new());
    /// ```
    pub fn register(&mut self, parser: impl Parser + 'static) {
        let at = self.parsers.len().saturating_sub(1);
        self.parsers.insert(at, Box::new(parser));
    }

    /// Look up a parser by its registry name
    pub fn find(&self, name: &str) -> Option<&dyn Parser> {
        self.parsers
            .iter()
            .find(|p| p.name() == name)
            .map(|p| &**p)
    }

    /// Select the parser for a file
    ///
    /// An explicit `name` must exist. Otherwise the first parser, in
    /// registry order, that claims the file wins.
    pub fn resolve(&self, file: &ReportFile, name: Option<&str>) -> Result<&dyn Parser, RegistryError> {
        if let Some(name) = name {
            return self
                .find(name)
                .ok_or_else(|| RegistryError::UnknownParser(name.to_string()));
        }

        let parser = self
            .parsers
            .iter()
            .find(|p| p.is_applicable(file))
            .map(|p| &**p)
            .ok_or_else(|| RegistryError::NoApplicableParser(file.path().display().to_string()))?;

        debug!("{}: detected {} report", file.path().display(), parser.name());
        Ok(parser)
    }

    /// Registry names in priority order
    pub fn names(&self) -> Vec<&'static str> {
        self.parsers.iter().map(|p| p.name()).collect()
    }

    /// Every extension some parser supports, sorted and deduplicated
    pub fn supported_extensions(&self) -> Vec<&'static str> {
        let mut extensions: Vec<&'static str> = self
            .parsers
            .iter()
            .flat_map(|p| p.supported_extensions().iter().copied())
            .collect();
        extensions.sort_unstable();
        extensions.dedup();
        extensions
    }

    pub fn parser_count(&self) -> usize {
        self.parsers.len()
    }
}

impl Default for ParserRegistry {
    fn default() -> Self {
        Self::new()
    }
}
