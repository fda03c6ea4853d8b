//! Nucleotide input normalization and validation / 核苷酸输入规范化与校验
//!
//! Used by the orchestrator for patterns, and exported for the collaborators
//! that clean uploaded sequences before they reach the search core.

use std::fmt;

use crate::error::ValidationError;

/// Maximum pattern length in characters / 模式最大长度
pub const MAX_PATTERN_LEN: usize = 1000;

/// Allowed nucleotide symbols / 允许的核苷酸字符
pub const DNA_ALPHABET: &[u8] = b"ATCGN";

/// Strip all whitespace (spaces, tabs, line breaks) and uppercase / 去除空白并转大写
pub fn normalize_sequence(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(|c| c.to_uppercase())
        .collect()
}

/// Check that `seq` is non-empty and only contains A, T, C, G or N / 校验DNA序列
pub fn validate_dna_sequence(seq: &str) -> Result<(), ValidationError> {
    if seq.is_empty() {
        return Err(ValidationError::EmptySequence);
    }
    check_alphabet(seq)
}

fn check_alphabet(seq: &str) -> Result<(), ValidationError> {
    match seq
        .char_indices()
        .find(|(_, c)| !c.is_ascii() || !DNA_ALPHABET.contains(&(*c as u8)))
    {
        Some((position, ch)) => Err(ValidationError::InvalidCharacter { ch, position }),
        None => Ok(()),
    }
}

/// A normalized, validated search pattern / 已规范化并校验的搜索模式
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pattern(String);

impl Pattern {
    /// Normalize then validate raw user input / 规范化后校验
    ///
    /// Checks run in order: empty, alphabet, length.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let normalized = normalize_sequence(raw);
        if normalized.is_empty() {
            return Err(ValidationError::EmptyPattern);
        }
        check_alphabet(&normalized)?;
        if normalized.len() > MAX_PATTERN_LEN {
            return Err(ValidationError::PatternTooLong {
                len: normalized.len(),
                max: MAX_PATTERN_LEN,
            });
        }
        Ok(Pattern(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Pattern {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
