//! Core types and trait definitions for the Folio person store.
//!
//! This crate is deliberately free of database dependencies. Storage
//! backends and the CLI depend on it; it depends on nothing proprietary.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod document;
pub mod error;
pub mod import;
pub mod person;
pub mod store;
pub mod user;

pub use document::Document;
pub use error::{Error, Result};
