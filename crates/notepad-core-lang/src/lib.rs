#![warn(missing_docs)]
//! `notepad-core-lang` - data-driven language profiles for `notepad-core`.
//!
//! A profile names the lexical features the tagger looks for: a keyword set, a line-comment
//! token and a string delimiter with its escape character. Profiles are plain data, so hosts
//! can ship them as YAML next to the binary instead of compiling them in.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Errors produced while loading or validating a [`LanguageProfile`].
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("YAML parse error: {0}")]
    /// YAML parsing failed.
    Yaml(#[from] serde_yaml::Error),

    #[error("I/O error: {0}")]
    /// Reading the profile file failed.
    Io(#[from] std::io::Error),

    #[error("profile '{0}' contains an empty keyword")]
    /// A keyword entry was the empty string.
    EmptyKeyword(String),

    #[error("profile '{0}' has an empty line comment token")]
    /// `line_comment` was present but empty.
    EmptyCommentToken(String),
}

/// Comment tokens for a language.
///
/// Only line comments are recognized: the token opens a comment that runs to the next `'\n'`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(transparent)]
pub struct CommentConfig {
    /// Line comment token (e.g. `//`, `#`).
    pub line: Option<String>,
}

impl CommentConfig {
    /// Create a config with a line comment token.
    pub fn line(token: impl Into<String>) -> Self {
        Self {
            line: Some(token.into()),
        }
    }

    /// Returns `true` if a non-empty line comment token is configured.
    pub fn has_line(&self) -> bool {
        self.line.as_deref().is_some_and(|s| !s.is_empty())
    }
}

/// String literal delimiters for a language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct StringConfig {
    /// Opening and closing delimiter (e.g. `"`).
    pub delimiter: char,
    /// Escape character; a delimiter preceded by an odd run of it does not close the literal.
    #[serde(default)]
    pub escape: Option<char>,
}

impl StringConfig {
    /// Double-quoted strings with backslash escapes.
    pub fn double_quoted() -> Self {
        Self {
            delimiter: '"',
            escape: Some('\\'),
        }
    }
}

/// A language profile consumed by the lexical tagger.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct LanguageProfile {
    /// Profile name (e.g. `c`).
    pub name: String,
    /// Keywords, matched on word boundaries.
    pub keywords: Vec<String>,
    /// Comment tokens.
    #[serde(rename = "line_comment")]
    pub comments: CommentConfig,
    /// String literal config, if the language has string literals.
    #[serde(rename = "string")]
    pub strings: Option<StringConfig>,
}

const C_KEYWORDS: &[&str] = &[
    "int", "float", "double", "char", "void", "if", "else", "for", "while", "do", "return",
    "switch", "case", "break", "continue", "struct", "typedef", "const", "sizeof",
];

impl LanguageProfile {
    /// A C-like profile: C keywords, `//` line comments and `"..."` strings.
    pub fn c() -> Self {
        Self {
            name: "c".to_string(),
            keywords: C_KEYWORDS.iter().map(|kw| kw.to_string()).collect(),
            comments: CommentConfig::line("//"),
            strings: Some(StringConfig::double_quoted()),
        }
    }

    /// A profile that tags nothing; every span comes out as normal text.
    pub fn plain_text() -> Self {
        Self {
            name: "plain".to_string(),
            ..Self::default()
        }
    }

    /// Parse and validate a profile from YAML.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ProfileError> {
        let profile: Self = serde_yaml::from_str(yaml)?;
        profile.validate()?;
        Ok(profile)
    }

    /// Read, parse and validate a profile from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ProfileError> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    /// Check that no keyword or comment token is empty.
    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.keywords.iter().any(|kw| kw.is_empty()) {
            return Err(ProfileError::EmptyKeyword(self.name.clone()));
        }
        if self.comments.line.as_deref() == Some("") {
            return Err(ProfileError::EmptyCommentToken(self.name.clone()));
        }
        Ok(())
    }
}
