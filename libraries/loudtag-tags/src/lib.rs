//! ReplayGain 2.0 / R128 tag routing and writing for loudtag
//!
//! This crate turns a [`ScanResult`](loudtag_core::ScanResult) into a
//! [`TagUpdate`] for the file's native tag format and persists it:
//! - A static route table maps (container, codec) to a [`TagFormat`]
//! - Each format defines removal and write sets, casing and value formats
//! - Opus gets Q7.8 `R128_*` gains against -23 LUFS instead of ReplayGain tags
//! - [`LoftyTagStore`] applies an update with one save per file
//!
//! # Example
//!
//! ```ignore
//! use loudtag_tags::{plan, LoftyTagStore, TagStore};
//!
//! if let Some(update) = plan(&result, &config)? {
//!     LoftyTagStore::new().apply(&update)?;
//! }
//! ```

#![deny(unsafe_code)]

mod error;
mod lofty_store;
pub mod names;
pub mod opus;
mod router;
mod store;
mod strategy;
mod update;

pub use error::{Result, TagError};
pub use lofty_store::LoftyTagStore;
pub use router::{plan, route};
pub use store::TagStore;
pub use strategy::{format_gain, format_peak, format_reference, TagFormat};
pub use update::{SaveOptions, TagUpdate};

#[cfg(any(test, feature = "test-utils"))]
pub use store::MemoryTagStore;
