//! Search patterns as opaque matchers over frame titles.

use regex::Regex;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PatternError {
    #[error("invalid search pattern `{pattern}`: {source}")]
    Syntax {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Decides whether a frame title is highlighted by the active search.
pub trait FrameMatcher: std::fmt::Debug {
    fn matches(&self, title: &str) -> bool;
}

/// Regular expression search; a match anywhere in the title counts.
#[derive(Debug, Clone)]
pub struct RegexMatcher {
    regex: Regex,
}

impl RegexMatcher {
    pub fn new(pattern: &str) -> Result<Self, PatternError> {
        let regex = Regex::new(pattern).map_err(|source| PatternError::Syntax {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self { regex })
    }
}

impl FrameMatcher for RegexMatcher {
    fn matches(&self, title: &str) -> bool {
        self.regex.is_match(title)
    }
}

/// Plain substring search, for hosts that offer a literal-text mode.
#[derive(Debug, Clone)]
pub struct SubstringMatcher {
    needle: String,
    ignore_case: bool,
}

impl SubstringMatcher {
    pub fn new(needle: impl Into<String>) -> Self {
        Self {
            needle: needle.into(),
            ignore_case: false,
        }
    }

    pub fn ignore_case(mut self) -> Self {
        self.needle = self.needle.to_lowercase();
        self.ignore_case = true;
        self
    }
}

impl FrameMatcher for SubstringMatcher {
    fn matches(&self, title: &str) -> bool {
        if self.ignore_case {
            title.to_lowercase().contains(&self.needle)
        } else {
            title.contains(&self.needle)
        }
    }
}
