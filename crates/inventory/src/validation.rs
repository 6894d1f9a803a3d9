//! Client-side validation of the "add item" form.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::code::ItemCode;

/// Form fields, used to say which one was missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Code,
    Name,
    Quantity,
}

/// Local, pre-network validation failure.
///
/// The `Display` text is what the user sees.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A field was empty, or the quantity was not an integer.
    #[error("Please fill in all fields correctly")]
    MissingField(Field),

    #[error("Item code must be exactly 6 characters")]
    InvalidCodeLength,

    #[error("Item code must start with a letter")]
    InvalidCodeStart,

    #[error("Item code can only contain letters and numbers")]
    InvalidCodeCharset,

    #[error("Quantity cannot be negative")]
    NegativeQuantity,
}

/// Raw form input, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemDraft {
    pub code: String,
    pub name: String,
    pub quantity: String,
}

impl ItemDraft {
    /// Build a draft the way the form is read: every field trimmed, the code
    /// uppercased.
    pub fn from_form(code: &str, name: &str, quantity: &str) -> Self {
        Self {
            code: code.trim().to_uppercase(),
            name: name.trim().to_string(),
            quantity: quantity.trim().to_string(),
        }
    }
}

/// A validated item, ready to be sent as the create request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewItem {
    pub code: ItemCode,
    pub name: String,
    pub quantity: i64,
}

/// Validate a draft.
///
/// Checks run in a fixed order and stop at the first failure, so the message
/// shown for a given input is deterministic: presence, code length, leading
/// letter, code charset, quantity sign.
pub fn validate(draft: &ItemDraft) -> Result<NewItem, ValidationError> {
    if draft.code.is_empty() {
        return Err(ValidationError::MissingField(Field::Code));
    }
    if draft.name.is_empty() {
        return Err(ValidationError::MissingField(Field::Name));
    }
    let quantity: i64 = draft
        .quantity
        .parse()
        .map_err(|_| ValidationError::MissingField(Field::Quantity))?;

    let code = ItemCode::parse(&draft.code)?;

    if quantity < 0 {
        return Err(ValidationError::NegativeQuantity);
    }

    Ok(NewItem {
        code,
        name: draft.name.clone(),
        quantity,
    })
}
