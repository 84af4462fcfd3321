//! Placing, tracking and cancelling orders.

use sabriaz_core::{NewOrder, Order, OrderId};
use serde::Serialize;
use tracing::instrument;

use super::{ApiClient, ApiError, segment};
use crate::stores::BearerToken;

#[derive(Serialize)]
struct GuestOrdersBody<'a> {
    ids: &'a [OrderId],
}

impl ApiClient {
    /// Place an order, attributed to the account when a token is given.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Api` with the server's message if the order is
    /// rejected.
    #[instrument(skip(self, order, token), fields(lines = order.items.len(), authenticated = token.is_some()))]
    pub async fn create_order(
        &self,
        order: &NewOrder,
        token: Option<&BearerToken>,
    ) -> Result<Order, ApiError> {
        self.send_json(reqwest::Method::POST, "api/orders", order, token)
            .await
    }

    /// Orders of the signed-in customer.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Api` with status 401 if the token is not accepted.
    #[instrument(skip(self, token))]
    pub async fn my_orders(&self, token: &BearerToken) -> Result<Vec<Order>, ApiError> {
        self.get("api/orders/my", Some(token)).await
    }

    /// Orders placed on this device without an account.
    ///
    /// No ids means no orders; the backend is not asked.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self, ids), fields(count = ids.len()))]
    pub async fn guest_orders(&self, ids: &[OrderId]) -> Result<Vec<Order>, ApiError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.send_json(
            reqwest::Method::POST,
            "api/orders/guest",
            &GuestOrdersBody { ids },
            None,
        )
        .await
    }

    /// Cancel one of the customer's orders.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Api` with the server's message if the order can no
    /// longer be cancelled.
    #[instrument(skip(self, token), fields(order_id = %id))]
    pub async fn cancel_order(&self, id: &OrderId, token: &BearerToken) -> Result<(), ApiError> {
        let path = format!("api/orders/{}/cancel", segment(id.as_str()));
        self.send_json_unit(reqwest::Method::PATCH, &path, &serde_json::json!({}), Some(token))
            .await
    }
}
