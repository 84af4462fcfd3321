//! Sabriaz Core - Shared domain types.
//!
//! This crate provides the types used across all Sabriaz components:
//! - `storefront` - Shopper-facing client (cart, session, catalog, checkout)
//! - `admin` - Back-office client (catalog and order management, analytics)
//! - `cli` - Command-line front-end
//!
//! # Architecture
//!
//! The core crate contains only types and pure helpers - no I/O, no storage,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Ids, money, emails, statuses and backend records

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
