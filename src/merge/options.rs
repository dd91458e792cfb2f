/// Knobs applied while compiling or combining reports
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeOptions {
    /// Parser used for every input without its own `path:parser` suffix
    pub parser: Option<String>,
    /// Name forced onto every parsed run
    pub name: Option<String>,
    /// Warn and skip on missing files or unresolvable parsers
    pub ignore_missing: bool,
    /// Maximum characters kept in captured output (0 keeps everything)
    pub trim_output_to: usize,
    /// Drop captured output of passing tests
    pub omit_output_for_passed: bool,
}

impl MergeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parser(mut self, parser: impl Into<String>) -> Self {
        self.parser = Some(parser.into());
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn ignore_missing(mut self, ignore: bool) -> Self {
        self.ignore_missing = ignore;
        self
    }

    pub fn trim_output_to(mut self, max_chars: usize) -> Self {
        self.trim_output_to = max_chars;
        self
    }

    pub fn omit_output_for_passed(mut self, omit: bool) -> Self {
        self.omit_output_for_passed = omit;
        self
    }
}
