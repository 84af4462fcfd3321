//! Order list filtering for the orders and payments screens.

use sabriaz_core::{Order, OrderStatus, PaymentStatus};

/// Filters applied to the order list. Empty fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub payment_status: Option<PaymentStatus>,
    /// Matches an id substring, a customer name (case-insensitive) or a phone
    /// substring.
    pub search: Option<String>,
}

impl OrderFilter {
    #[must_use]
    pub fn matches(&self, order: &Order) -> bool {
        if self.status.is_some_and(|status| order.status != status) {
            return false;
        }
        if self
            .payment_status
            .is_some_and(|payment| order.payment_status != payment)
        {
            return false;
        }

        match self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            None => true,
            Some(term) => {
                let lowered = term.to_lowercase();
                order.id.as_str().contains(term)
                    || order.customer_info.name.to_lowercase().contains(&lowered)
                    || order.customer_info.phone.contains(term)
            }
        }
    }

    /// Matching orders, in their original order.
    #[must_use]
    pub fn apply<'a>(&self, orders: &'a [Order]) -> Vec<&'a Order> {
        orders.iter().filter(|order| self.matches(order)).collect()
    }
}

/// Orders that came with a payment screenshot, for the payments screen.
#[must_use]
pub fn with_payment_proof(orders: &[Order]) -> Vec<&Order> {
    orders
        .iter()
        .filter(|order| {
            order
                .payment_proof_url
                .as_deref()
                .is_some_and(|url| !url.is_empty())
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use chrono::{TimeZone, Utc};
    use sabriaz_core::{CustomerInfo, Money, OrderId, OrderLine, PaymentMethod};

    use super::*;

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn order(
        id: &str,
        name: &str,
        phone: &str,
        city: &str,
        total: i64,
        status: OrderStatus,
        payment_status: PaymentStatus,
        day: u32,
    ) -> Order {
        Order {
            id: OrderId::new(id),
            customer_info: CustomerInfo {
                name: name.to_string(),
                phone: phone.to_string(),
                address: "Street 1".to_string(),
                city: city.to_string(),
            },
            items: vec![OrderLine {
                product_id: None,
                name: "Oud Noir".to_string(),
                quantity: 1,
                price_at_purchase: Some(Money::from_rupees(total)),
                discount_percent_at_purchase: None,
            }],
            testers: Vec::new(),
            notes: None,
            subtotal: Money::from_rupees(total),
            discount_total: Money::ZERO,
            total: Money::from_rupees(total),
            payment_method: Some(PaymentMethod::Cod),
            payment_proof_url: None,
            status,
            payment_status,
            created_at: Utc.with_ymd_and_hms(2025, 3, day, 10, 0, 0).unwrap(),
        }
    }

    fn orders() -> Vec<Order> {
        vec![
            order("65aa01", "Ayesha Khan", "03001112222", "Lahore", 4500, OrderStatus::Pending, PaymentStatus::Unpaid, 1),
            order("65aa02", "Bilal", "03214445555", "Karachi", 3200, OrderStatus::Shipped, PaymentStatus::Paid, 1),
            order("65bb03", "Sana", "03337778888", "", 2800, OrderStatus::Cancelled, PaymentStatus::Refunded, 2),
        ]
    }

    fn ids(hits: &[&Order]) -> Vec<String> {
        hits.iter().map(|o| o.id.to_string()).collect()
    }

    #[test]
    fn test_empty_filter_matches_all() {
        assert_eq!(OrderFilter::default().apply(&orders()).len(), 3);
    }

    #[test]
    fn test_status_and_payment_filters() {
        let all = orders();
        let filter = OrderFilter {
            status: Some(OrderStatus::Shipped),
            ..OrderFilter::default()
        };
        assert_eq!(ids(&filter.apply(&all)), ["65aa02"]);

        let filter = OrderFilter {
            payment_status: Some(PaymentStatus::Unpaid),
            ..OrderFilter::default()
        };
        assert_eq!(ids(&filter.apply(&all)), ["65aa01"]);
    }

    #[test]
    fn test_search_fields() {
        let all = orders();
        let search = |term: &str| {
            ids(&OrderFilter {
                search: Some(term.to_string()),
                ..OrderFilter::default()
            }
            .apply(&all))
        };
        assert_eq!(search("65aa"), ["65aa01", "65aa02"]);
        assert_eq!(search("AYESHA"), ["65aa01"]);
        assert_eq!(search("0333"), ["65bb03"]);
        assert!(search("nobody").is_empty());
    }

    #[test]
    fn test_with_payment_proof() {
        let mut all = orders();
        all[1].payment_proof_url = Some("https://img.example/p.png".to_string());
        all[2].payment_proof_url = Some(String::new());
        assert_eq!(ids(&with_payment_proof(&all)), ["65aa02"]);
    }
}
