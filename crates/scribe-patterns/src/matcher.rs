//! Matcher trait and the built-in regex matcher

use crate::error::PatternError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

/// Result of a successful match attempt
///
/// Named groups are kept in the order they appear in the pattern; groups
/// that did not participate in the match are absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Captures {
    /// Byte span of the match within the unit
    pub span: Range<usize>,
    /// Matched text
    pub text: String,
    /// Named sub-values in group order
    pub groups: Vec<(String, String)>,
}

impl Captures {
    /// Create captures for a whole-unit match with no groups
    #[must_use]
    pub fn whole(unit: &str) -> Self {
        Self {
            span: 0..unit.len(),
            text: unit.to_string(),
            groups: Vec::new(),
        }
    }

    /// Add a named group
    #[inline]
    #[must_use]
    pub fn with_group(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.groups.push((name.into(), value.into()));
        self
    }

    /// Look up a named group, trimmed; empty values count as absent
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.groups
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// Whether a named group is present
    #[inline]
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}

/// A recogniser that attempts a match on one unit of text
///
/// Implementations must be pure: the same unit always yields the same result.
pub trait Matcher: Send + Sync + fmt::Debug {
    /// Stable matcher name, reported on candidates
    fn name(&self) -> &str;

    /// Attempt a match on a unit of text
    fn attempt(&self, unit: &str) -> Option<Captures>;
}

/// Matcher backed by a compiled regular expression
#[derive(Clone)]
pub struct RegexMatcher {
    name: String,
    regex: Regex,
}

impl RegexMatcher {
    /// Compile a pattern
    ///
    /// # Errors
    ///
    /// Returns [`PatternError::InvalidPattern`] if the pattern does not compile.
    pub fn new(name: impl Into<String>, pattern: &str) -> Result<Self, PatternError> {
        let name = name.into();
        match Regex::new(pattern) {
            Ok(regex) => Ok(Self { name, regex }),
            Err(e) => Err(PatternError::invalid(name, e)),
        }
    }

    /// Pattern source
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

impl fmt::Debug for RegexMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegexMatcher")
            .field("name", &self.name)
            .field("pattern", &self.regex.as_str())
            .finish()
    }
}

impl Matcher for RegexMatcher {
    fn name(&self) -> &str {
        &self.name
    }

    fn attempt(&self, unit: &str) -> Option<Captures> {
        let caps = self.regex.captures(unit)?;
        let whole = caps.get(0)?;

        let groups = self
            .regex
            .capture_names()
            .flatten()
            .filter_map(|n| caps.name(n).map(|m| (n.to_string(), m.as_str().to_string())))
            .collect();

        Some(Captures {
            span: whole.range(),
            text: whole.as_str().to_string(),
            groups,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_pattern_is_reported() {
        let err = RegexMatcher::new("broken", "(unclosed").unwrap_err();
        assert!(matches!(err, PatternError::InvalidPattern { ref name, .. } if name == "broken"));
    }

    #[test]
    fn groups_follow_pattern_order() {
        let m = RegexMatcher::new("pair", r"(?P<b>\w+)=(?P<a>\w+)").unwrap();
        let caps = m.attempt("x key=value y").unwrap();
        assert_eq!(caps.span, 2..11);
        assert_eq!(caps.text, "key=value");
        assert_eq!(
            caps.groups,
            vec![("b".to_string(), "key".to_string()), ("a".to_string(), "value".to_string())]
        );
    }

    #[test]
    fn non_participating_groups_are_absent() {
        let m = RegexMatcher::new("opt", r"go(?: to (?P<place>\w+))?").unwrap();
        let caps = m.attempt("go").unwrap();
        assert!(caps.groups.is_empty());
        assert!(!caps.has("place"));
    }

    #[test]
    fn blank_group_counts_as_absent() {
        let caps = Captures::whole("x").with_group("name", "   ");
        assert_eq!(caps.get("name"), None);
    }

    #[test]
    fn no_match_yields_none() {
        let m = RegexMatcher::new("digits", r"\d+").unwrap();
        assert!(m.attempt("no digits here").is_none());
    }
}
