//! Back-office commands.

use chrono::FixedOffset;
use sabriaz_admin::{AdminClient, AdminError, OrderFilter, SalesSummary, with_payment_proof};
use sabriaz_core::{OrderId, OrderStatus, PaymentStatus};
use sabriaz_storefront::state::AppState;

use super::{CommandFailed, admin_failed};

fn client(state: &AppState) -> Result<AdminClient, CommandFailed> {
    AdminClient::from_session(state.api().clone(), state.session().state())
        .map_err(|e| admin_failed(&e, "Admin access required"))
}

/// Print the sales dashboard.
#[allow(clippy::print_stdout)]
pub async fn analytics(state: &AppState, utc_offset_hours: i32, top: usize) -> Result<(), CommandFailed> {
    let offset = FixedOffset::east_opt(utc_offset_hours * 3600).ok_or_else(|| {
        admin_failed(
            &AdminError::BadRequest(format!("UTC offset {utc_offset_hours}h is out of range")),
            "Invalid offset",
        )
    })?;

    let admin = client(state)?;
    let orders = admin
        .list_orders()
        .await
        .map_err(|e| admin_failed(&e, "Could not load orders"))?;
    let summary = SalesSummary::from_orders_in(&orders, offset);

    println!("Total orders:        {}", summary.total_orders);
    println!("Revenue:             {}", summary.revenue);
    println!("Average order value: {}", summary.average_order_value);
    println!("Paid / unpaid:       {} / {}", summary.paid_orders, summary.unpaid_orders);

    println!("\nBy day:");
    for (day, count) in &summary.orders_by_day {
        let revenue = summary.revenue_by_day.get(day).copied().unwrap_or_default();
        println!("  {day}  {count:>4} order(s)  {revenue}");
    }

    println!("\nRevenue by city:");
    for (city, revenue) in &summary.revenue_by_city {
        println!("  {city:<20} {revenue}");
    }

    println!("\nOrders by payment method:");
    for (method, count) in &summary.orders_by_payment_method {
        println!("  {method:<20} {count}");
    }

    println!("\nTop products:");
    for (name, units) in summary.top_products(top) {
        println!("  {name:<30} {units} unit(s)");
    }
    Ok(())
}

/// List orders matching the filters.
#[allow(clippy::print_stdout)]
pub async fn orders(state: &AppState, filter: &OrderFilter, with_proof: bool) -> Result<(), CommandFailed> {
    let admin = client(state)?;
    let all = admin
        .list_orders()
        .await
        .map_err(|e| admin_failed(&e, "Could not load orders"))?;

    let mut hits = filter.apply(&all);
    if with_proof {
        let proofs = with_payment_proof(&all);
        hits.retain(|order| proofs.iter().any(|p| p.id == order.id));
    }

    if hits.is_empty() {
        println!("No orders match.");
        return Ok(());
    }
    for order in hits {
        println!(
            "{}  {:<20} {:<12} {:<10} {:<10} {:<8} {}",
            order.id,
            order.customer_info.name,
            order.customer_info.phone,
            order.status.as_str(),
            order.payment_status.as_str(),
            order.payment_method.unwrap_or_default().as_str(),
            order.total,
        );
        for line in &order.items {
            println!("    {}", super::describe_line(line));
        }
        if let Some(url) = order.payment_proof_url.as_deref().filter(|u| !u.is_empty()) {
            println!("    proof: {url}");
        }
    }
    Ok(())
}

#[allow(clippy::print_stdout)]
pub async fn order_status(state: &AppState, order_id: &str, status: OrderStatus) -> Result<(), CommandFailed> {
    client(state)?
        .update_order_status(&OrderId::new(order_id), status)
        .await
        .map_err(|e| admin_failed(&e, "Status update failed"))?;
    println!("Order {order_id} is now {status}");
    Ok(())
}

#[allow(clippy::print_stdout)]
pub async fn payment_status(
    state: &AppState,
    order_id: &str,
    status: PaymentStatus,
) -> Result<(), CommandFailed> {
    client(state)?
        .update_payment_status(&OrderId::new(order_id), status)
        .await
        .map_err(|e| admin_failed(&e, "Payment update failed"))?;
    println!("Order {order_id} payment is now {status}");
    Ok(())
}
