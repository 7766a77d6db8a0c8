//! VIBE Core - Shared domain types.
//!
//! This crate provides the types shared by every VIBE component:
//! - `storefront` - Session engine and JSON API
//! - `cli` - Command-line catalog and checkout tools
//!
//! # Architecture
//!
//! The core crate contains only types and parsing rules - no I/O, no async,
//! no HTTP. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Product records, type-safe IDs, prices, categories and sort keys

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
