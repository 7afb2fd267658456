use regex::{Regex, RegexBuilder};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuleError {
    #[error("prefix must not be empty")]
    EmptyPrefix,
    #[error("invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

#[derive(Debug, Clone)]
pub struct MatchRule {
    regex: Regex,
    prefix: String,
    skip_already_prefixed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    AlreadyPrefixed,
    NoMatch,
    Matched { desired_name: String },
}

impl MatchRule {
    pub fn new(
        pattern: &str,
        prefix: &str,
        ignore_case: bool,
        whole_word: bool,
        skip_already_prefixed: bool,
    ) -> Result<Self, RuleError> {
        if prefix.is_empty() {
            return Err(RuleError::EmptyPrefix);
        }

        let bounded = if whole_word && !pattern.is_empty() {
            format!(r"\b(?:{})\b", pattern)
        } else {
            pattern.to_string()
        };

        let regex = RegexBuilder::new(&bounded)
            .case_insensitive(ignore_case)
            .build()?;

        Ok(Self {
            regex,
            prefix: prefix.to_string(),
            skip_already_prefixed,
        })
    }

    pub fn decide(&self, name: &str) -> MatchOutcome {
        // The prefix check is byte-exact and runs before the pattern; an
        // already-prefixed name is never re-evaluated against the regex.
        if self.skip_already_prefixed && name.starts_with(&self.prefix) {
            return MatchOutcome::AlreadyPrefixed;
        }

        if self.regex.is_match(name) {
            return MatchOutcome::Matched {
                desired_name: format!("{}{}", self.prefix, name),
            };
        }

        MatchOutcome::NoMatch
    }
}
