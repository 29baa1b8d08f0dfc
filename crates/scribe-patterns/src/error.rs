//! Pattern library errors

/// Errors while building a pattern library
#[derive(Debug, thiserror::Error)]
pub enum PatternError {
    /// Pattern source failed to compile
    #[error("pattern '{name}' failed to compile: {source}")]
    InvalidPattern {
        /// Matcher name
        name: String,
        /// Underlying regex error
        #[source]
        source: Box<regex::Error>,
    },

    /// Two matchers registered under the same name in one category
    #[error("duplicate matcher '{0}'")]
    DuplicateMatcher(String),
}

impl PatternError {
    /// Create invalid pattern error
    pub fn invalid(name: impl Into<String>, source: regex::Error) -> Self {
        Self::InvalidPattern {
            name: name.into(),
            source: Box::new(source),
        }
    }
}
