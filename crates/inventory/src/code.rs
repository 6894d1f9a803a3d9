//! Item codes: six uppercase alphanumerics, leading letter.

use serde::{Deserialize, Serialize};

use crate::validation::ValidationError;

/// Required length of an item code, in characters.
pub const ITEM_CODE_LEN: usize = 6;

/// A validated item code.
///
/// Only constructible through [`ItemCode::parse`], so holding one means the
/// length, leading-letter and charset rules have all been checked.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemCode(String);

impl ItemCode {
    /// Check `raw` against the code rules, in order: length, leading letter,
    /// charset. The first violated rule is reported.
    ///
    /// No normalization happens here; callers that accept free-form input
    /// uppercase it first (see [`crate::ItemDraft::from_form`]).
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        if raw.chars().count() != ITEM_CODE_LEN {
            return Err(ValidationError::InvalidCodeLength);
        }
        if !raw.starts_with(|c: char| c.is_ascii_uppercase()) {
            return Err(ValidationError::InvalidCodeStart);
        }
        if !raw.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()) {
            return Err(ValidationError::InvalidCodeCharset);
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for ItemCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ItemCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// As-you-type formatting for the code field: uppercase, drop anything
/// outside `[A-Z0-9]`, cap at [`ITEM_CODE_LEN`] characters.
pub fn format_code_input(raw: &str) -> String {
    raw.chars()
        .flat_map(char::to_uppercase)
        .filter(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        .take(ITEM_CODE_LEN)
        .collect()
}
