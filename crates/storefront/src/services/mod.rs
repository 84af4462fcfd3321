//! Third-party integrations used by the storefront.
//!
//! # Services
//!
//! - `uploads` - Payment-proof and product images pushed to the asset host
//! - `contact` - WhatsApp click-to-chat links

pub mod contact;
pub mod uploads;

pub use contact::{ContactError, whatsapp_link};
pub use uploads::{AssetUploader, UploadError};
