//! Domain types for the Sabriaz storefront.

pub mod catalog;
pub mod content;
pub mod email;
pub mod id;
pub mod money;
pub mod order;
pub mod status;
pub mod user;

pub use catalog::{Category, CategoryRef, Product, Review, ShowcaseCategory, Tester, average_rating};
pub use content::{AboutContent, SiteSettings};
pub use email::{Email, EmailError};
pub use id::*;
pub use money::Money;
pub use order::{CustomerInfo, NewOrder, NewOrderLine, Order, OrderLine};
pub use status::*;
pub use user::User;
