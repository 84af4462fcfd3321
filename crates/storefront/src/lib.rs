//! Sabriaz storefront client library.
//!
//! Everything a front-end needs to run the shop against the Sabriaz backend:
//! the persisted cart and session, catalog browsing, checkout and order
//! tracking. Front-ends hold one [`state::AppState`] and call into it.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod services;
pub mod sitemap;
pub mod state;
pub mod storage;
pub mod stores;
