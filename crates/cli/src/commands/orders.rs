//! Order history, cancellation and checkout.

use std::path::PathBuf;

use sabriaz_core::{CustomerInfo, Order, OrderId, PaymentMethod};
use sabriaz_storefront::checkout::{CheckoutRequest, PaymentProof, TesterSelection};
use sabriaz_storefront::error::AppError;
use sabriaz_storefront::state::{AppState, CANCEL_FAILED};

use super::{CommandFailed, failed};

/// Checkout form as entered on the command line.
pub struct CheckoutInput {
    pub name: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub notes: String,
    pub testers: Vec<String>,
    pub payment: PaymentMethod,
    pub proof: Option<PathBuf>,
}

#[allow(clippy::print_stdout)]
fn print_order(order: &Order) {
    println!(
        "#{} {} {:<10} {:<9} {} ({} unit(s), {})",
        order.short_ref(),
        order.created_at.format("%Y-%m-%d"),
        order.status.as_str(),
        order.payment_status.as_str(),
        order.total,
        order.unit_count(),
        order.payment_method.unwrap_or_default().as_str(),
    );
    for line in &order.items {
        println!("    {}", super::describe_line(line));
    }
    if !order.testers.is_empty() {
        println!("    testers: {}", order.testers.join(", "));
    }
    if order.status.is_cancellable() {
        println!("    cancel with: sabriaz orders cancel {}", order.id);
    }
}

/// Account orders when signed in, otherwise this device's guest orders.
#[allow(clippy::print_stdout)]
pub async fn list(state: &AppState) -> Result<(), CommandFailed> {
    let orders = state
        .my_orders()
        .await
        .map_err(|e| failed(&e, "Could not load orders"))?;

    if orders.is_empty() {
        println!("No orders yet.");
        return Ok(());
    }
    for order in &orders {
        print_order(order);
    }
    Ok(())
}

#[allow(clippy::print_stdout)]
pub async fn cancel(state: &AppState, order_id: &str) -> Result<(), CommandFailed> {
    state
        .cancel_order(&OrderId::new(order_id))
        .await
        .map_err(|e| failed(&e, CANCEL_FAILED))?;
    println!("Order {order_id} cancelled");
    Ok(())
}

/// Place an order for the cart.
#[allow(clippy::print_stdout)]
pub async fn checkout(state: &mut AppState, input: CheckoutInput) -> Result<(), CommandFailed> {
    let testers = TesterSelection::from_names(input.testers)
        .map_err(|e| failed(&AppError::from(e), "Invalid tester selection"))?;

    let request = CheckoutRequest {
        customer: CustomerInfo {
            name: input.name,
            phone: input.phone,
            address: input.address,
            city: input.city,
        },
        testers,
        notes: input.notes,
        payment_method: input.payment,
        payment_proof: input.proof.map(PaymentProof::File),
    };

    let order = state
        .checkout(&request)
        .await
        .map_err(|e| failed(&e, request.failure_message()))?;

    if request.payment_method.requires_proof() {
        println!("Order placed! Payment proof received; we will confirm shortly.");
    } else {
        println!("Order placed successfully (Cash on Delivery)!");
    }
    print_order(&order);
    Ok(())
}
