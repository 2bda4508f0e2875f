/// Configuration for a single parse
#[derive(Debug, Clone, Default)]
pub struct ParserConfig {
    /// Rule to parse; the grammar's start symbol when unset
    pub start: Option<String>,
}

impl ParserConfig {
    #[must_use]
    pub fn with_start(start: impl Into<String>) -> Self {
        Self {
            start: Some(start.into()),
        }
    }
}
