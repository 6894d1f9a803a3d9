//! Inventory domain module (client side).
//!
//! Items, item codes, form validation, and the list query/page shapes shared
//! with the backend. Pure logic only: no IO, no HTTP, no rendering.

pub mod code;
pub mod item;
pub mod query;
pub mod validation;

pub use code::{ITEM_CODE_LEN, ItemCode, format_code_input};
pub use item::{Item, ItemId};
pub use query::{ListQuery, ListResponse, PER_PAGE, PageResult, Pagination};
pub use validation::{Field, ItemDraft, NewItem, ValidationError, validate};
