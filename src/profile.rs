//! @ai:module:intent Describe how a language delimits comments and string literals
//! @ai:module:layer domain
//! @ai:module:public_api CommentSyntaxProfile, BlockDelimiters, StringDelimiter
//! @ai:module:stateless true

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// @ai:intent A block comment opener/closer pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockDelimiters {
    pub open: String,
    pub close: String,
    /// Openers inside the comment increase depth instead of being inert.
    #[serde(default)]
    pub nested: bool,
    /// Decoration allowed at the start of continuation lines, e.g. the `*` in ` * text`.
    #[serde(default)]
    pub line_prefix: Option<String>,
}

/// @ai:intent A string literal delimiter (the same text opens and closes the literal)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringDelimiter {
    pub delimiter: String,
    #[serde(default)]
    pub escape: Option<char>,
    #[serde(default)]
    pub multiline: bool,
    /// Only opens when a single (possibly escaped) character and the closer follow, as in
    /// Rust's `'x'`, so lifetimes such as `'a` stay code.
    #[serde(default)]
    pub char_literal: bool,
}

/// @ai:intent Comment and string syntax for one language, supplied by the caller
/// @ai:invariant read-only to the engine; validated before any scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentSyntaxProfile {
    pub name: String,
    #[serde(default)]
    pub line_comments: Vec<String>,
    #[serde(default)]
    pub block_comments: Vec<BlockDelimiters>,
    #[serde(default)]
    pub strings: Vec<StringDelimiter>,
}

impl BlockDelimiters {
    pub fn new(open: &str, close: &str) -> Self {
        Self {
            open: open.to_string(),
            close: close.to_string(),
            nested: false,
            line_prefix: None,
        }
    }

    pub fn nested(mut self) -> Self {
        self.nested = true;
        self
    }

    pub fn with_line_prefix(mut self, prefix: &str) -> Self {
        self.line_prefix = Some(prefix.to_string());
        self
    }
}

impl StringDelimiter {
    /// @ai:intent Single-line literal with backslash escapes, like C's `"..."`
    pub fn escaped(delimiter: &str) -> Self {
        Self {
            delimiter: delimiter.to_string(),
            escape: Some('\\'),
            multiline: false,
            char_literal: false,
        }
    }

    /// @ai:intent Literal without escapes, like Go's backtick raw strings
    pub fn raw(delimiter: &str) -> Self {
        Self {
            delimiter: delimiter.to_string(),
            escape: None,
            multiline: false,
            char_literal: false,
        }
    }

    pub fn multiline(mut self) -> Self {
        self.multiline = true;
        self
    }

    /// @ai:intent Restrict the delimiter to one-character literals like `'x'` or `'\n'`
    pub fn char_literal(mut self) -> Self {
        self.char_literal = true;
        self
    }
}

impl CommentSyntaxProfile {
    /// @ai:intent Create an empty profile to be filled in with the builder methods
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            line_comments: Vec::new(),
            block_comments: Vec::new(),
            strings: Vec::new(),
        }
    }

    pub fn line_comment(mut self, prefix: &str) -> Self {
        self.line_comments.push(prefix.to_string());
        self
    }

    pub fn block_comment(mut self, delimiters: BlockDelimiters) -> Self {
        self.block_comments.push(delimiters);
        self
    }

    pub fn string(mut self, delimiter: StringDelimiter) -> Self {
        self.strings.push(delimiter);
        self
    }

    /// @ai:intent Reject profiles that cannot find comments or would match empty text
    /// @ai:post Ok means the scanner can make progress on every opener it matches
    /// @ai:example (profile with no line prefix and no block pair) -> Err(InvalidProfile)
    /// @ai:effects pure
    pub fn validate(&self) -> Result<()> {
        if self.line_comments.is_empty() && self.block_comments.is_empty() {
            return Err(Error::invalid_profile(
                &self.name,
                "no line-comment prefix and no block-comment pair; comments cannot be found",
            ));
        }

        if self.line_comments.iter().any(|p| p.is_empty()) {
            return Err(Error::invalid_profile(&self.name, "empty line-comment prefix"));
        }

        for pair in &self.block_comments {
            if pair.open.is_empty() || pair.close.is_empty() {
                return Err(Error::invalid_profile(
                    &self.name,
                    "block-comment delimiters must not be empty",
                ));
            }
            if pair.line_prefix.as_deref() == Some("") {
                return Err(Error::invalid_profile(
                    &self.name,
                    format!("empty line prefix for block comment `{}`", pair.open),
                ));
            }
        }

        if self.strings.iter().any(|s| s.delimiter.is_empty()) {
            return Err(Error::invalid_profile(&self.name, "empty string delimiter"));
        }

        Ok(())
    }

    /// @ai:intent Parse and validate a profile written in TOML
    /// @ai:effects pure
    pub fn from_toml(content: &str) -> Result<Self> {
        let profile: Self = toml::from_str(content)?;
        profile.validate()?;
        Ok(profile)
    }

    /// @ai:intent Load and validate a profile from a TOML file
    /// @ai:effects fs:read
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let profile: Self = toml::from_str(&content).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            source: e,
        })?;
        profile.validate()?;
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_without_comment_syntax_is_rejected() {
        let profile = CommentSyntaxProfile::new("strings-only").string(StringDelimiter::escaped("\""));
        let err = profile.validate().unwrap_err();
        assert!(matches!(err, Error::InvalidProfile { .. }));
        assert!(err.is_configuration());
    }

    #[test]
    fn test_empty_prefix_is_rejected() {
        let profile = CommentSyntaxProfile::new("broken").line_comment("");
        assert!(profile.validate().is_err());
    }

    #[test]
    fn test_empty_block_closer_is_rejected() {
        let profile = CommentSyntaxProfile::new("broken").block_comment(BlockDelimiters::new("/*", ""));
        assert!(profile.validate().is_err());
    }

    #[test]
    fn test_block_only_profile_is_valid() {
        let profile = CommentSyntaxProfile::new("css").block_comment(BlockDelimiters::new("/*", "*/"));
        assert!(profile.validate().is_ok());
    }

    #[test]
    fn test_from_toml() {
        let profile = CommentSyntaxProfile::from_toml(
            r#"
name = "lua"
line_comments = ["--"]

[[block_comments]]
open = "--[["
close = "]]"

[[strings]]
delimiter = '"'
escape = '\'
"#,
        )
        .unwrap();

        assert_eq!(profile.name, "lua");
        assert_eq!(profile.line_comments, vec!["--".to_string()]);
        assert_eq!(profile.block_comments[0].close, "]]");
        assert!(!profile.block_comments[0].nested);
        assert_eq!(profile.strings[0].escape, Some('\\'));
        assert!(!profile.strings[0].multiline);
    }

    #[test]
    fn test_from_toml_rejects_profile_without_comments() {
        let result = CommentSyntaxProfile::from_toml(r#"name = "nothing""#);
        assert!(matches!(result, Err(Error::InvalidProfile { .. })));
    }
}
