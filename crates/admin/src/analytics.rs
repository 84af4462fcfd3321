//! Sales analytics over the order list.
//!
//! Cancelled orders are excluded from every figure. Breakdowns are keyed in
//! sorted order so reports are stable between runs.

use std::collections::BTreeMap;

use chrono::{FixedOffset, NaiveDate, Offset, Utc};
use sabriaz_core::{Money, Order, OrderStatus, PaymentMethod, PaymentStatus};
use serde::Serialize;

/// City label for orders without one.
pub const UNKNOWN_CITY: &str = "Unknown";

/// Dashboard figures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SalesSummary {
    pub total_orders: usize,
    pub revenue: Money,
    /// Revenue divided by order count, rounded to whole rupees.
    pub average_order_value: Money,
    pub paid_orders: usize,
    pub unpaid_orders: usize,
    pub orders_by_day: BTreeMap<NaiveDate, usize>,
    pub revenue_by_day: BTreeMap<NaiveDate, Money>,
    pub revenue_by_city: BTreeMap<String, Money>,
    pub orders_by_payment_method: BTreeMap<String, usize>,
    pub units_by_product: BTreeMap<String, u32>,
}

impl SalesSummary {
    /// Summarise orders, bucketing days in UTC.
    #[must_use]
    pub fn from_orders(orders: &[Order]) -> Self {
        Self::from_orders_in(orders, Utc.fix())
    }

    /// Summarise orders, bucketing days in the given offset.
    #[must_use]
    pub fn from_orders_in(orders: &[Order], offset: FixedOffset) -> Self {
        let mut summary = Self::default();

        for order in orders.iter().filter(|o| o.status != OrderStatus::Cancelled) {
            summary.total_orders += 1;
            summary.revenue += order.total;

            match order.payment_status {
                PaymentStatus::Paid => summary.paid_orders += 1,
                PaymentStatus::Unpaid => summary.unpaid_orders += 1,
                PaymentStatus::Refunded => {}
            }

            let day = order.created_at.with_timezone(&offset).date_naive();
            *summary.orders_by_day.entry(day).or_default() += 1;
            *summary.revenue_by_day.entry(day).or_default() += order.total;

            let city = order.customer_info.city.trim();
            let city = if city.is_empty() { UNKNOWN_CITY } else { city };
            *summary.revenue_by_city.entry(city.to_string()).or_default() += order.total;

            let method = order.payment_method.unwrap_or(PaymentMethod::Cod);
            *summary
                .orders_by_payment_method
                .entry(method.as_str().to_string())
                .or_default() += 1;

            for line in &order.items {
                *summary.units_by_product.entry(line.name.clone()).or_default() += line.quantity;
            }
        }

        if summary.total_orders > 0 {
            let count = rust_decimal::Decimal::from(summary.total_orders);
            summary.average_order_value = Money::new(summary.revenue.amount() / count).round();
        }

        summary
    }

    /// Best sellers by units, most first; ties by name.
    #[must_use]
    pub fn top_products(&self, limit: usize) -> Vec<(&str, u32)> {
        let mut products: Vec<(&str, u32)> = self
            .units_by_product
            .iter()
            .map(|(name, units)| (name.as_str(), *units))
            .collect();
        products.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        products.truncate(limit);
        products
    }
}
