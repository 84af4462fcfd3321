//! Order list and status changes.

use reqwest::Method;
use sabriaz_core::{Order, OrderId, OrderStatus, PaymentStatus};
use serde::Serialize;
use tracing::instrument;

use super::{AdminClient, item_path};
use crate::error::Result;

#[derive(Serialize)]
struct StatusBody {
    status: OrderStatus,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PaymentBody {
    payment_status: PaymentStatus,
}

impl AdminClient {
    /// Every order, newest first as the backend returns them.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Api` if the request fails.
    #[instrument(skip(self))]
    pub async fn list_orders(&self) -> Result<Vec<Order>> {
        Ok(self.api().get_json("api/orders", Some(self.token())).await?)
    }

    /// One order, looked up in the full list.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Api` if the request fails.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn get_order(&self, id: &OrderId) -> Result<Option<Order>> {
        let orders = self.list_orders().await?;
        Ok(orders.into_iter().find(|order| &order.id == id))
    }

    /// Move an order through fulfilment.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Api` if the backend rejects the change.
    #[instrument(skip(self), fields(order_id = %id, status = %status))]
    pub async fn update_order_status(&self, id: &OrderId, status: OrderStatus) -> Result<()> {
        self.api()
            .call_unit(
                Method::PATCH,
                &format!("{}/status", item_path("api/orders", id.as_str())),
                &StatusBody { status },
                Some(self.token()),
            )
            .await?;
        tracing::info!("Order status updated");
        Ok(())
    }

    /// Record payment state, typically after checking a payment screenshot.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Api` if the backend rejects the change.
    #[instrument(skip(self), fields(order_id = %id, payment_status = %payment_status))]
    pub async fn update_payment_status(
        &self,
        id: &OrderId,
        payment_status: PaymentStatus,
    ) -> Result<()> {
        self.api()
            .call_unit(
                Method::PATCH,
                &format!("{}/payment", item_path("api/orders", id.as_str())),
                &PaymentBody { payment_status },
                Some(self.token()),
            )
            .await?;
        tracing::info!("Payment status updated");
        Ok(())
    }
}
