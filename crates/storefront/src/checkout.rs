//! Checkout: turn the cart into an order.
//!
//! # Flow
//!
//! 1. Validate locally: non-empty cart, complete shipping details, at most
//!    [`MAX_TESTERS`] free samples, a payment proof for prepaid methods
//! 2. Upload the payment proof (prepaid only) and keep its hosted URL
//! 3. `POST /api/orders`, with the bearer token when signed in
//! 4. Guests: remember the new order id on this device
//! 5. Clear the cart
//!
//! There is no two-phase commit. If step 3 fails the cart is left as is; if it
//! succeeds the cart is cleared even though nothing confirms delivery of the
//! response to other devices.

use std::path::PathBuf;

use sabriaz_core::{CustomerInfo, NewOrder, NewOrderLine, Order, PaymentMethod};
use thiserror::Error;
use tracing::instrument;

use crate::api::ApiClient;
use crate::error::{Result, add_breadcrumb};
use crate::services::AssetUploader;
use crate::stores::{CartState, CartStore, GuestOrders, SessionState};

/// Free samples allowed per order.
pub const MAX_TESTERS: usize = 5;

/// Fallback shown when a cash-on-delivery order fails without a server message.
pub const ORDER_FAILED: &str = "Error placing order";

/// Fallback shown when a prepaid order fails without a server message.
pub const PAID_ORDER_FAILED: &str = "Error placing paid order";

/// Checkout input rejected before anything is sent.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CheckoutError {
    #[error("Your cart is empty")]
    EmptyCart,

    #[error("Please fill all fields (missing: {})", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("You can select only {max} testers")]
    TooManyTesters { max: usize },

    #[error("Please upload a payment screenshot for {0}")]
    MissingPaymentProof(PaymentMethod),
}

// =============================================================================
// Tester selection
// =============================================================================

/// Free samples picked in the cart, by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TesterSelection {
    names: Vec<String>,
}

impl TesterSelection {
    #[must_use]
    pub const fn new() -> Self {
        Self { names: Vec::new() }
    }

    /// Select a batch of names at once.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::TooManyTesters` if more than [`MAX_TESTERS`]
    /// distinct names are given.
    pub fn from_names<I, S>(names: I) -> std::result::Result<Self, CheckoutError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut selection = Self::new();
        for name in names {
            let name = name.into();
            if !selection.contains(&name) {
                selection.toggle(&name)?;
            }
        }
        Ok(selection)
    }

    /// Select an unselected tester or deselect a selected one.
    ///
    /// Returns whether the tester is selected afterwards.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::TooManyTesters` when selecting beyond the limit;
    /// the selection is unchanged.
    pub fn toggle(&mut self, name: &str) -> std::result::Result<bool, CheckoutError> {
        if let Some(pos) = self.names.iter().position(|n| n == name) {
            self.names.remove(pos);
            return Ok(false);
        }
        if self.names.len() >= MAX_TESTERS {
            return Err(CheckoutError::TooManyTesters { max: MAX_TESTERS });
        }
        self.names.push(name.to_string());
        Ok(true)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }
}

// =============================================================================
// Request
// =============================================================================

/// Screenshot proving a prepaid transfer.
#[derive(Debug, Clone)]
pub enum PaymentProof {
    /// Image on disk.
    File(PathBuf),
    /// Image already in memory.
    Bytes { file_name: String, bytes: Vec<u8> },
}

/// Everything the shopper enters at checkout.
#[derive(Debug, Clone, Default)]
pub struct CheckoutRequest {
    pub customer: CustomerInfo,
    pub testers: TesterSelection,
    pub notes: String,
    pub payment_method: PaymentMethod,
    pub payment_proof: Option<PaymentProof>,
}

impl CheckoutRequest {
    /// Message to show when placing the order fails without a server message.
    #[must_use]
    pub const fn failure_message(&self) -> &'static str {
        if self.payment_method.requires_proof() {
            PAID_ORDER_FAILED
        } else {
            ORDER_FAILED
        }
    }

    /// Local checks, in the order the shopper should fix them.
    ///
    /// # Errors
    ///
    /// Returns the first `CheckoutError` that applies.
    pub fn validate(&self, cart: &CartState) -> std::result::Result<(), CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        let missing = self.customer.missing_fields();
        if !missing.is_empty() {
            return Err(CheckoutError::MissingFields(missing));
        }
        if self.testers.names().len() > MAX_TESTERS {
            return Err(CheckoutError::TooManyTesters { max: MAX_TESTERS });
        }
        if self.payment_method.requires_proof() && self.payment_proof.is_none() {
            return Err(CheckoutError::MissingPaymentProof(self.payment_method));
        }
        Ok(())
    }

    /// Build the order body from the cart.
    ///
    /// The subtotal and total are both the cart total; discounts are applied
    /// by the backend.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError` if [`CheckoutRequest::validate`] fails.
    pub fn build_order(
        &self,
        cart: &CartState,
        payment_proof_url: Option<String>,
    ) -> std::result::Result<NewOrder, CheckoutError> {
        self.validate(cart)?;

        let items = cart
            .items()
            .iter()
            .map(|item| NewOrderLine {
                product_id: item.id.clone(),
                quantity: item.quantity,
            })
            .collect();
        let total = cart.total_amount().amount();

        Ok(NewOrder {
            customer_info: self.customer.trimmed(),
            items,
            testers: self.testers.names().to_vec(),
            notes: self.notes.trim().to_string(),
            subtotal: total,
            discount_total: rust_decimal::Decimal::ZERO,
            total,
            payment_method: self.payment_method,
            payment_proof_url: if self.payment_method.requires_proof() {
                payment_proof_url
            } else {
                None
            },
        })
    }
}

/// Stores and clients checkout touches.
pub struct CheckoutContext<'a> {
    pub api: &'a ApiClient,
    pub uploader: &'a AssetUploader,
    pub cart: &'a mut CartStore,
    pub session: &'a SessionState,
    pub guest_orders: &'a mut GuestOrders,
}

/// Place an order for the current cart.
///
/// # Errors
///
/// Returns `AppError::Checkout` for local validation failures (nothing is
/// sent), `AppError::Upload` if the payment proof cannot be uploaded, and
/// `AppError::Api` if the backend rejects the order. The cart is only cleared
/// on success.
#[instrument(skip(ctx, request), fields(method = %request.payment_method, authenticated = ctx.session.is_authenticated()))]
pub async fn place_order(ctx: CheckoutContext<'_>, request: &CheckoutRequest) -> Result<Order> {
    request.validate(ctx.cart.state())?;

    let proof_url = match (&request.payment_proof, request.payment_method.requires_proof()) {
        (Some(PaymentProof::File(path)), true) => Some(ctx.uploader.upload_file(path).await?),
        (Some(PaymentProof::Bytes { file_name, bytes }), true) => {
            Some(ctx.uploader.upload_bytes(file_name, bytes.clone()).await?)
        }
        _ => None,
    };

    let body = request.build_order(ctx.cart.state(), proof_url)?;
    let token = ctx.session.token();
    let order = ctx.api.create_order(&body, token).await?;

    if token.is_none() {
        ctx.guest_orders.record(order.id.clone());
    }
    ctx.cart.clear();

    add_breadcrumb(
        "checkout",
        "Order placed",
        Some(&[
            ("order_id", order.id.as_str()),
            ("payment_method", request.payment_method.as_str()),
        ]),
    );
    tracing::info!(order_id = %order.id, total = %order.total, "Order placed");

    Ok(order)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use sabriaz_core::{Money, ProductId};

    use super::*;
    use crate::stores::CartItem;

    fn customer() -> CustomerInfo {
        CustomerInfo {
            name: " Zara ".to_string(),
            phone: "03001234567".to_string(),
            address: "House 12, Street 4".to_string(),
            city: "Lahore".to_string(),
        }
    }

    fn cart() -> CartState {
        let mut cart = CartState::new();
        cart.add_item(CartItem::new("p1", "Oud Noir", Money::from_rupees(4500)));
        cart.add_item(CartItem::new("p1", "Oud Noir", Money::from_rupees(4500)));
        cart.add_item(CartItem::new("p2", "Amber Bloom", Money::from_rupees(3200)));
        cart
    }

    #[test]
    fn test_build_order_body() {
        let request = CheckoutRequest {
            customer: customer(),
            testers: TesterSelection::from_names(["Rose", "Musk"]).unwrap(),
            notes: " ring the bell ".to_string(),
            ..CheckoutRequest::default()
        };
        let order = request.build_order(&cart(), None).unwrap();

        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["customerInfo"]["name"], "Zara");
        assert_eq!(json["items"][0]["productId"], "p1");
        assert_eq!(json["items"][0]["quantity"], 2);
        assert_eq!(json["items"][1]["quantity"], 1);
        assert_eq!(json["testers"], serde_json::json!(["Rose", "Musk"]));
        assert_eq!(json["notes"], "ring the bell");
        assert_eq!(json["subtotal"], 12200.0);
        assert_eq!(json["discountTotal"], 0.0);
        assert_eq!(json["total"], 12200.0);
        assert_eq!(json["paymentMethod"], "cod");
        assert!(json["paymentProofUrl"].is_null());
    }

    #[test]
    fn test_empty_cart_rejected_first() {
        let request = CheckoutRequest::default();
        assert_eq!(
            request.validate(&CartState::new()),
            Err(CheckoutError::EmptyCart)
        );
    }

    #[test]
    fn test_missing_fields_listed() {
        let request = CheckoutRequest {
            customer: CustomerInfo {
                name: "Zara".to_string(),
                city: "  ".to_string(),
                ..CustomerInfo::default()
            },
            ..CheckoutRequest::default()
        };
        assert_eq!(
            request.validate(&cart()),
            Err(CheckoutError::MissingFields(vec!["phone", "address", "city"]))
        );
    }

    #[test]
    fn test_prepaid_needs_proof() {
        let mut request = CheckoutRequest {
            customer: customer(),
            payment_method: PaymentMethod::Jazzcash,
            ..CheckoutRequest::default()
        };
        assert_eq!(
            request.validate(&cart()),
            Err(CheckoutError::MissingPaymentProof(PaymentMethod::Jazzcash))
        );
        assert_eq!(request.failure_message(), PAID_ORDER_FAILED);

        request.payment_proof = Some(PaymentProof::Bytes {
            file_name: "proof.png".to_string(),
            bytes: vec![0x89, 0x50],
        });
        let order = request
            .build_order(&cart(), Some("https://img.example/proof.png".to_string()))
            .unwrap();
        assert_eq!(order.payment_proof_url.as_deref(), Some("https://img.example/proof.png"));
    }

    #[test]
    fn test_tester_selection_limit() {
        let mut selection =
            TesterSelection::from_names(["Rose", "Musk", "Oud", "Amber", "Vanilla"]).unwrap();
        assert_eq!(
            selection.toggle("Citrus"),
            Err(CheckoutError::TooManyTesters { max: MAX_TESTERS })
        );
        assert!(!selection.toggle("Rose").unwrap());
        assert!(selection.toggle("Citrus").unwrap());
        assert_eq!(selection.names().len(), MAX_TESTERS);
        assert!(selection.contains("Citrus"));

        assert!(TesterSelection::from_names(["a", "b", "c", "d", "e", "f"]).is_err());
    }

    #[test]
    fn test_cod_never_sends_proof_url() {
        let request = CheckoutRequest {
            customer: customer(),
            ..CheckoutRequest::default()
        };
        let order = request
            .build_order(&cart(), Some("https://img.example/stray.png".to_string()))
            .unwrap();
        assert!(order.payment_proof_url.is_none());
        assert_eq!(order.items[0].product_id, ProductId::new("p1"));
    }
}
