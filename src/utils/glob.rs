//! Shell-style glob matching for release names.
//!
//! Thin wrapper over [`glob::Pattern`] that keeps the source text around for
//! log messages. Supports `*`, `?` and bracket classes (`[abc]`, `[!abc]`).

use crate::utils::error::ConfigError;
use glob::Pattern;

/// Compiled glob pattern
#[derive(Debug, Clone)]
pub struct GlobPattern {
    pattern: Pattern,
}

impl GlobPattern {
    /// Compile a glob pattern
    pub fn new(pattern: &str) -> Result<Self, ConfigError> {
        let pattern = Pattern::new(pattern).map_err(|source| ConfigError::Pattern {
            pattern: pattern.to_string(),
            source,
        })?;

        Ok(Self { pattern })
    }

    /// Check whether a name matches the whole pattern
    pub fn matches(&self, name: &str) -> bool {
        self.pattern.matches(name)
    }

    pub fn as_str(&self) -> &str {
        self.pattern.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_star_matches_everything() {
        let glob = GlobPattern::new("*").unwrap();
        assert!(glob.matches("CMSSW_12_0_0"));
        assert!(glob.matches(""));
    }

    #[test]
    fn test_prefix_and_question_mark() {
        let glob = GlobPattern::new("CMSSW_12_?_X_*").unwrap();
        assert!(glob.matches("CMSSW_12_1_X_2021-09-01-2300"));
        assert!(!glob.matches("CMSSW_12_10_X_2021-09-01-2300"));
        assert!(!glob.matches("CMSSW_11_3_X_2021-09-01-2300"));
    }

    #[test]
    fn test_bracket_classes() {
        let glob = GlobPattern::new("CMSSW_1[12]_*").unwrap();
        assert!(glob.matches("CMSSW_11_3_0"));
        assert!(glob.matches("CMSSW_12_0_0"));
        assert!(!glob.matches("CMSSW_10_6_0"));

        let negated = GlobPattern::new("CMSSW_1[!2]_*").unwrap();
        assert!(negated.matches("CMSSW_11_3_0"));
        assert!(!negated.matches("CMSSW_12_0_0"));
    }

    #[test]
    fn test_regex_metacharacters_are_literal() {
        let glob = GlobPattern::new("CMSSW_12.0+").unwrap();
        assert!(glob.matches("CMSSW_12.0+"));
        assert!(!glob.matches("CMSSW_12x0+"));
    }

    #[test]
    fn test_unclosed_bracket_is_rejected() {
        let err = GlobPattern::new("CMSSW_[12").unwrap_err();
        assert!(matches!(err, ConfigError::Pattern { .. }));
        assert!(err.to_string().contains("CMSSW_[12"));
    }

    #[test]
    fn test_as_str_keeps_source() {
        assert_eq!(GlobPattern::new("CMSSW_12_*").unwrap().as_str(), "CMSSW_12_*");
    }
}
