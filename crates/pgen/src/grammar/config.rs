/// Configuration for grammar compilation
#[derive(Debug, Clone)]
pub struct CompileConfig {
    /// Merge equivalent DFA states after subset construction
    pub minimize: bool,

    /// Start symbol; the first rule declared when unset
    pub start: Option<String>,
}

impl Default for CompileConfig {
    fn default() -> Self {
        Self {
            minimize: true,
            start: None,
        }
    }
}

impl CompileConfig {
    #[must_use]
    pub const fn with_minimize(mut self, minimize: bool) -> Self {
        self.minimize = minimize;
        self
    }

    #[must_use]
    pub fn with_start(mut self, start: impl Into<String>) -> Self {
        self.start = Some(start.into());
        self
    }
}
