//! Cart, catalog and marketing commands.

use std::path::Path;

use sabriaz_core::{CategoryId, ProductId};
use sabriaz_storefront::catalog::{ShopQuery, SortBy};
use sabriaz_storefront::error::AppError;
use sabriaz_storefront::state::AppState;
use tokio_util::sync::CancellationToken;

use super::{CommandFailed, failed};

#[allow(clippy::print_stdout)]
pub fn show_cart(state: &AppState) {
    let cart = state.cart().state();
    if cart.is_empty() {
        println!("Your cart is empty.");
        return;
    }

    for item in cart.items() {
        println!(
            "{:<12} {:<30} {:>3} x {:<12} = {}",
            item.id,
            item.name,
            item.quantity,
            item.unit_price.to_string(),
            item.line_total()
        );
    }
    println!(
        "{} item(s), total {}",
        cart.total_quantity(),
        cart.total_amount()
    );
}

/// Add one unit of a product, looked up on the backend.
pub async fn add(state: &mut AppState, product_id: &str) -> Result<(), CommandFailed> {
    state
        .add_to_cart(&ProductId::new(product_id))
        .await
        .map_err(|e| failed(&e, "Could not add to cart"))?;
    show_cart(state);
    Ok(())
}

#[allow(clippy::print_stdout)]
pub fn remove(state: &mut AppState, product_id: &str) {
    if !state.cart_mut().remove_item(&ProductId::new(product_id)) {
        println!("{product_id} is not in the cart");
    }
    show_cart(state);
}

#[allow(clippy::print_stdout)]
pub fn increase(state: &mut AppState, product_id: &str) {
    if !state.cart_mut().increase_quantity(&ProductId::new(product_id)) {
        println!("{product_id} is not in the cart");
    }
    show_cart(state);
}

#[allow(clippy::print_stdout)]
pub fn decrease(state: &mut AppState, product_id: &str) {
    if !state.cart_mut().decrease_quantity(&ProductId::new(product_id)) {
        println!("Quantity unchanged (minimum is 1; use `cart remove` to drop it)");
    }
    show_cart(state);
}

pub fn clear(state: &mut AppState) {
    state.cart_mut().clear();
    show_cart(state);
}

/// Refresh the catalog (Ctrl-C cancels) and print the filtered listing.
#[allow(clippy::print_stdout)]
pub async fn products(
    state: &mut AppState,
    search: Option<String>,
    category: Option<String>,
    sort: SortBy,
) -> Result<(), CommandFailed> {
    let category = match category {
        Some(wanted) => Some(resolve_category(state, &wanted).await?),
        None => None,
    };

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    let watcher = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });
    let refreshed = state.refresh_catalog(&cancel).await;
    watcher.abort();
    refreshed.map_err(|e| failed(&e, "Could not load products"))?;

    let query = ShopQuery {
        search,
        category,
        sort,
    };
    let hits = query.apply(state.catalog().entries());
    if hits.is_empty() {
        println!("No products found. Try adjusting filters.");
        return Ok(());
    }

    for entry in hits {
        let product = &entry.product;
        let price = if product.has_discount() {
            format!("{} (was {})", product.discounted_price(), product.price)
        } else {
            product.price.to_string()
        };
        let stars = if entry.rating == 0 {
            "unrated".to_string()
        } else {
            "*".repeat(usize::from(entry.rating))
        };
        println!("{:<12} {:<30} {:<28} {}", product.id, product.name, price, stars);
    }
    Ok(())
}

async fn resolve_category(state: &AppState, wanted: &str) -> Result<CategoryId, CommandFailed> {
    let categories = state
        .api()
        .list_categories()
        .await
        .map_err(|e| failed(&AppError::from(e), "Could not load categories"))?;

    categories
        .into_iter()
        .find(|c| {
            c.id.as_str() == wanted
                || c.slug.as_deref() == Some(wanted)
                || c.name.eq_ignore_ascii_case(wanted)
        })
        .map(|c| c.id)
        .ok_or_else(|| CommandFailed(format!("No category matches '{wanted}'")))
}

#[allow(clippy::print_stdout)]
pub async fn subscribe(state: &AppState, email: &str) -> Result<(), CommandFailed> {
    state
        .subscribe(email)
        .await
        .map_err(|e| failed(&e, "Subscription failed"))?;
    println!("Subscribed {email}");
    Ok(())
}

#[allow(clippy::print_stdout)]
pub fn contact(state: &AppState, message: &str) -> Result<(), CommandFailed> {
    let link = state
        .contact_link(message)
        .map_err(|e| failed(&e, "Could not build link"))?;
    println!("{link}");
    Ok(())
}

#[allow(clippy::print_stdout)]
pub fn sitemap(state: &AppState, out: &Path) -> Result<(), CommandFailed> {
    state
        .write_sitemap(out)
        .map_err(|e| failed(&e, "Could not write sitemap"))?;
    println!("Sitemap written to {}", out.display());
    Ok(())
}
