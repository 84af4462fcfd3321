//! WhatsApp click-to-chat links for the contact form.

use thiserror::Error;

/// Errors that can occur when building a contact link.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContactError {
    /// The message was empty after trimming.
    #[error("Please write a message")]
    EmptyMessage,
}

/// Build `https://wa.me/<phone>?text=<message>`.
///
/// The message is percent-encoded as-is; a blank message yields no link.
///
/// # Errors
///
/// Returns `ContactError::EmptyMessage` if the message is blank.
///
/// ```
/// use sabriaz_storefront::services::whatsapp_link;
///
/// let link = whatsapp_link("923399650031", "Is Oud Noir in stock?").unwrap();
/// assert_eq!(link, "https://wa.me/923399650031?text=Is%20Oud%20Noir%20in%20stock%3F");
/// assert!(whatsapp_link("923399650031", "   ").is_err());
/// ```
pub fn whatsapp_link(phone: &str, message: &str) -> Result<String, ContactError> {
    if message.trim().is_empty() {
        return Err(ContactError::EmptyMessage);
    }
    Ok(format!(
        "https://wa.me/{phone}?text={}",
        urlencoding::encode(message)
    ))
}
