//! `stockmesh-client`
//!
//! **Responsibility:** the inventory client's request/state/render cycle.
//!
//! This crate provides:
//! - `InventoryClient`: the guarded operation cycles (list, search, paginate,
//!   create, delete) over a single-in-flight gate
//! - `InventoryGateway`: the seam to the backend, with an HTTP and an
//!   in-memory implementation
//! - `Renderer`: the capability a presentation adapter implements
//! - A periodic background refresh task
//!
//! The client is a **thin shell** around the inventory API: the server is
//! authoritative for every list and pagination value.

pub mod client;
pub mod config;
pub mod console;
pub mod error;
pub mod gateway;
pub mod refresher;
pub mod render;
pub mod state;
pub mod view;

pub use client::{CycleOutcome, InventoryClient, PageStep};
pub use config::ClientConfig;
pub use error::{ConfigError, GatewayError};
pub use gateway::{HttpGateway, InMemoryGateway, InventoryGateway};
pub use refresher::{RefreshHandle, spawn_periodic_refresh};
pub use render::{Notice, NoticeKind, Renderer};
pub use state::ClientState;
