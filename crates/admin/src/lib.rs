//! Sabriaz back-office library.
//!
//! Catalog, content and order management against the Sabriaz backend, plus
//! the order filtering and sales analytics behind the admin dashboard.
//!
//! # Security
//!
//! An [`AdminClient`] can only be built from an admin session. The backend
//! enforces the role as well; the client-side check keeps non-admins from
//! issuing requests that would be refused.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod analytics;
pub mod client;
pub mod error;
pub mod filter;

pub use analytics::SalesSummary;
pub use client::AdminClient;
pub use client::catalog::{ProductInput, ShowcaseInput};
pub use error::{AdminError, Result};
pub use filter::{OrderFilter, with_payment_proof};
