//! Product catalog cache and shop listing.
//!
//! # Architecture
//!
//! - The product list is fetched from the backend and overwritten wholesale;
//!   nothing is merged or reconciled
//! - Star ratings are aggregated per product on every refresh, with one
//!   review lookup per product running concurrently on a `JoinSet`
//! - A refresh is scoped by a `CancellationToken`: cancelling it aborts the
//!   outstanding lookups and leaves the cache untouched
//! - Filtering and sorting for the shop page are pure functions over the cache

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use sabriaz_core::{CategoryId, Product, ProductId, average_rating};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::instrument;

use crate::api::ApiClient;
use crate::error::{AppError, Result};

/// A product with its aggregated rating.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub product: Product,
    /// Rounded average of the product's reviews; 0 when unrated.
    pub rating: u8,
}

/// Last fetched product list.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// An empty catalog.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Entries in backend order.
    #[must_use]
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Whether anything has been fetched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up a product by id.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&CatalogEntry> {
        self.entries.iter().find(|entry| &entry.product.id == id)
    }

    /// Products flagged as featured, for the landing page.
    pub fn featured(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter().filter(|entry| entry.product.is_featured)
    }

    /// Replace the cache with a freshly fetched list.
    pub fn replace(&mut self, entries: Vec<CatalogEntry>) {
        self.entries = entries;
    }

    /// Fetch products and their ratings, then overwrite the cache.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Cancelled` if `cancel` fires first, in which case
    /// the cache is unchanged. Returns `AppError::Api` if the product list
    /// cannot be fetched; individual rating failures count as unrated.
    #[instrument(skip(self, api, cancel))]
    pub async fn refresh(&mut self, api: &ApiClient, cancel: &CancellationToken) -> Result<()> {
        let products = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(AppError::Cancelled),
            products = api.list_products() => products?,
        };

        let ratings = fetch_ratings(api, &products, cancel).await?;

        let entries = products
            .into_iter()
            .map(|product| {
                let rating = ratings.get(&product.id).copied().unwrap_or(0);
                CatalogEntry { product, rating }
            })
            .collect::<Vec<_>>();

        tracing::info!(count = entries.len(), "Catalog refreshed");
        self.replace(entries);
        Ok(())
    }
}

/// Look up the rating of every product concurrently.
///
/// Lookups complete in any order. A failed lookup yields 0 for that product.
///
/// # Errors
///
/// Returns `AppError::Cancelled` if `cancel` fires before every lookup
/// finished; outstanding lookups are aborted.
pub async fn fetch_ratings(
    api: &ApiClient,
    products: &[Product],
    cancel: &CancellationToken,
) -> Result<HashMap<ProductId, u8>> {
    let mut tasks = JoinSet::new();
    for product in products {
        let api = api.clone();
        let id = product.id.clone();
        tasks.spawn(async move {
            let rating = product_rating(&api, &id).await;
            (id, rating)
        });
    }

    let mut ratings = HashMap::with_capacity(products.len());
    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                tasks.abort_all();
                tracing::debug!("Rating refresh cancelled");
                return Err(AppError::Cancelled);
            }
            next = tasks.join_next() => match next {
                Some(Ok((id, rating))) => {
                    ratings.insert(id, rating);
                }
                Some(Err(e)) => {
                    tracing::warn!(error = %e, "Rating lookup task failed");
                }
                None => break,
            },
        }
    }

    Ok(ratings)
}

/// Rounded average rating of one product; 0 when the lookup fails.
pub async fn product_rating(api: &ApiClient, id: &ProductId) -> u8 {
    match api.product_reviews(id).await {
        Ok(reviews) => average_rating(&reviews),
        Err(e) => {
            tracing::warn!(error = %e, product_id = %id, "Failed to fetch reviews for rating");
            0
        }
    }
}

// =============================================================================
// Shop listing
// =============================================================================

/// Sort orders offered on the shop page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortBy {
    /// Backend order.
    #[default]
    Default,
    PriceLow,
    PriceHigh,
    /// Largest discount first.
    Discount,
    NameAz,
}

impl SortBy {
    pub const ALL: [Self; 5] = [
        Self::Default,
        Self::PriceLow,
        Self::PriceHigh,
        Self::Discount,
        Self::NameAz,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::PriceLow => "price-low",
            Self::PriceHigh => "price-high",
            Self::Discount => "discount",
            Self::NameAz => "name-az",
        }
    }

    fn compare(self, a: &Product, b: &Product) -> Ordering {
        match self {
            Self::Default => Ordering::Equal,
            Self::PriceLow => a.price.cmp(&b.price),
            Self::PriceHigh => b.price.cmp(&a.price),
            Self::Discount => discount_of(b).cmp(&discount_of(a)),
            Self::NameAz => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        }
    }
}

fn discount_of(product: &Product) -> Decimal {
    product.discount_percent.unwrap_or(Decimal::ZERO)
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['_', ' '], "-");
        match normalized.as_str() {
            "default" => Ok(Self::Default),
            "price-low" | "pricelow" => Ok(Self::PriceLow),
            "price-high" | "pricehigh" => Ok(Self::PriceHigh),
            "discount" => Ok(Self::Discount),
            "name-az" | "nameaz" => Ok(Self::NameAz),
            _ => Err(format!(
                "unknown sort '{s}' (expected one of: {})",
                Self::ALL.map(Self::as_str).join(", ")
            )),
        }
    }
}

/// Shop page filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShopQuery {
    /// Case-insensitive match against name or description.
    pub search: Option<String>,
    pub category: Option<CategoryId>,
    pub sort: SortBy,
}

impl ShopQuery {
    /// Whether a product passes the search and category filters.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        let search_ok = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
            .is_none_or(|term| {
                let term = term.to_lowercase();
                product.name.to_lowercase().contains(&term)
                    || product
                        .description
                        .as_deref()
                        .is_some_and(|d| d.to_lowercase().contains(&term))
            });

        let category_ok = self
            .category
            .as_ref()
            .is_none_or(|wanted| product.category_id() == Some(wanted));

        search_ok && category_ok
    }

    /// Filter then stably sort.
    #[must_use]
    pub fn apply<'a>(&self, entries: &'a [CatalogEntry]) -> Vec<&'a CatalogEntry> {
        let mut hits: Vec<&CatalogEntry> = entries
            .iter()
            .filter(|entry| self.matches(&entry.product))
            .collect();
        hits.sort_by(|a, b| self.sort.compare(&a.product, &b.product));
        hits
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use sabriaz_core::{Category, CategoryRef, Money};

    use super::*;

    fn product(id: &str, name: &str, price: i64, discount: Option<i64>, category: &str) -> CatalogEntry {
        CatalogEntry {
            product: Product {
                id: ProductId::new(id),
                name: name.to_string(),
                description: Some(format!("{name} eau de parfum")),
                price: Money::from_rupees(price),
                discount_percent: discount.map(Decimal::from),
                stock: Some(10),
                category: Some(CategoryRef::Populated(Category {
                    id: CategoryId::new(category),
                    name: category.to_string(),
                    slug: None,
                })),
                images: Vec::new(),
                is_featured: id == "p2",
            },
            rating: 0,
        }
    }

    fn shelf() -> Vec<CatalogEntry> {
        vec![
            product("p1", "Oud Noir", 4500, Some(10), "men"),
            product("p2", "amber Bloom", 3200, None, "women"),
            product("p3", "Citrus Veil", 2800, Some(25), "women"),
        ]
    }

    fn ids(hits: &[&CatalogEntry]) -> Vec<String> {
        hits.iter().map(|e| e.product.id.to_string()).collect()
    }

    #[test]
    fn test_default_keeps_backend_order() {
        let entries = shelf();
        assert_eq!(ids(&ShopQuery::default().apply(&entries)), ["p1", "p2", "p3"]);
    }

    #[test]
    fn test_sorts() {
        let entries = shelf();
        let by = |sort| ids(&ShopQuery { sort, ..ShopQuery::default() }.apply(&entries));
        assert_eq!(by(SortBy::PriceLow), ["p3", "p2", "p1"]);
        assert_eq!(by(SortBy::PriceHigh), ["p1", "p2", "p3"]);
        assert_eq!(by(SortBy::Discount), ["p3", "p1", "p2"]);
        assert_eq!(by(SortBy::NameAz), ["p2", "p3", "p1"]);
    }

    #[test]
    fn test_search_covers_name_and_description() {
        let entries = shelf();
        let query = ShopQuery {
            search: Some("OUD".to_string()),
            ..ShopQuery::default()
        };
        assert_eq!(ids(&query.apply(&entries)), ["p1"]);

        let query = ShopQuery {
            search: Some("parfum".to_string()),
            ..ShopQuery::default()
        };
        assert_eq!(query.apply(&entries).len(), 3);
    }

    #[test]
    fn test_category_filter_with_sort() {
        let entries = shelf();
        let query = ShopQuery {
            category: Some(CategoryId::new("women")),
            sort: SortBy::PriceLow,
            ..ShopQuery::default()
        };
        assert_eq!(ids(&query.apply(&entries)), ["p3", "p2"]);
    }

    #[test]
    fn test_sort_parse() {
        assert_eq!("priceLow".parse::<SortBy>().unwrap(), SortBy::PriceLow);
        assert_eq!("name_az".parse::<SortBy>().unwrap(), SortBy::NameAz);
        assert!("cheapest".parse::<SortBy>().is_err());
    }

    #[test]
    fn test_catalog_lookup_and_featured() {
        let mut catalog = Catalog::new();
        assert!(catalog.is_empty());
        catalog.replace(shelf());
        assert_eq!(catalog.get(&ProductId::new("p3")).unwrap().product.name, "Citrus Veil");
        assert_eq!(catalog.featured().count(), 1);
    }

    #[tokio::test]
    async fn test_cancelled_refresh_leaves_cache_untouched() {
        let api = ApiClient::new(&url::Url::parse("http://127.0.0.1:9").unwrap()).unwrap();
        let mut catalog = Catalog::new();
        catalog.replace(shelf());

        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = catalog.refresh(&api, &cancel).await.unwrap_err();

        assert!(matches!(err, AppError::Cancelled));
        assert_eq!(catalog.entries().len(), 3);
    }
}
