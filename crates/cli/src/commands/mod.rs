//! Command implementations.
//!
//! Results go to stdout; diagnostics go through `tracing` to stderr.

pub mod account;
pub mod admin;
pub mod orders;
pub mod shop;

use sabriaz_admin::AdminError;
use sabriaz_core::OrderLine;
use sabriaz_storefront::error::AppError;
use thiserror::Error;

/// A command failed; the message is already fit to show.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct CommandFailed(pub String);

/// Report a storefront error and turn it into a shopper-facing message.
pub fn failed(err: &AppError, fallback: &str) -> CommandFailed {
    err.report();
    CommandFailed(err.user_message(fallback))
}

/// Report a back-office error and turn it into an operator-facing message.
pub fn admin_failed(err: &AdminError, fallback: &str) -> CommandFailed {
    err.report();
    CommandFailed(err.user_message(fallback))
}

/// One order line for listings: quantity, name, unit price, discount and line total.
pub fn describe_line(line: &OrderLine) -> String {
    let mut text = format!("{} x {}", line.quantity, line.name);
    if let Some(price) = line.price_at_purchase {
        text.push_str(&format!(" @ {price}"));
    }
    if let Some(pct) = line.discount_percent_at_purchase.filter(|pct| !pct.is_zero()) {
        text.push_str(&format!(" (-{}%)", pct.normalize()));
    }
    if let Some(total) = line.line_total() {
        text.push_str(&format!(" = {total}"));
    }
    text
}
