//! Client-held state containers.
//!
//! Each store owns its state and a handle to durable storage. Mutations are
//! synchronous `&mut self` calls followed by a snapshot write; nothing is
//! shared behind locks.

pub mod cart;
pub mod guest_orders;
pub mod session;

pub use cart::{CartItem, CartState, CartStore};
pub use guest_orders::GuestOrders;
pub use session::{BearerToken, SessionState, SessionStore};
