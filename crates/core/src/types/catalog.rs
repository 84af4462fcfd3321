//! Catalog records: products, categories, reviews, showcase tiles, testers.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use super::id::{CategoryId, ProductId, ReviewId, ShowcaseCategoryId, TesterId};
use super::money::{Money, round_half_away};

/// A perfume as returned by `GET /api/products`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// List price before discount.
    pub price: Money,
    #[serde(default)]
    pub discount_percent: Option<Decimal>,
    /// Display only; never reconciled with the cart.
    #[serde(default)]
    pub stock: Option<u32>,
    #[serde(default)]
    pub category: Option<CategoryRef>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub is_featured: bool,
}

impl Product {
    /// Whether a positive discount applies.
    #[must_use]
    pub fn has_discount(&self) -> bool {
        self.discount_percent.is_some_and(|pct| pct > Decimal::ZERO)
    }

    /// Price after the percentage discount, rounded to whole rupees.
    ///
    /// Without a positive discount the list price is returned unrounded.
    #[must_use]
    pub fn discounted_price(&self) -> Money {
        match self.discount_percent {
            Some(pct) if pct > Decimal::ZERO => {
                let price = self.price.amount();
                Money::new(round_half_away(price - price * pct / Decimal::ONE_HUNDRED))
            }
            _ => self.price,
        }
    }

    /// First image, used as the thumbnail.
    #[must_use]
    pub fn thumbnail(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    /// Category id, whether the backend populated the reference or not.
    #[must_use]
    pub fn category_id(&self) -> Option<&CategoryId> {
        self.category.as_ref().map(CategoryRef::id)
    }
}

/// A product's category, either populated or a bare id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategoryRef {
    Populated(Category),
    Id(CategoryId),
}

impl CategoryRef {
    /// The referenced category id.
    #[must_use]
    pub const fn id(&self) -> &CategoryId {
        match self {
            Self::Populated(category) => &category.id,
            Self::Id(id) => id,
        }
    }
}

/// A product category used for filtering and category pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "_id")]
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
}

/// A customer review of a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(rename = "_id")]
    pub id: ReviewId,
    pub product_id: ProductId,
    pub rating: u8,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Average star rating, rounded to the nearest whole star (halves round up).
///
/// No reviews means a rating of zero.
#[must_use]
pub fn average_rating(reviews: &[Review]) -> u8 {
    if reviews.is_empty() {
        return 0;
    }
    let sum: u64 = reviews.iter().map(|r| u64::from(r.rating)).sum();
    let avg = Decimal::from(sum) / Decimal::from(reviews.len());
    round_half_away(avg).to_u8().unwrap_or(u8::MAX)
}

/// A curated, image-backed category tile on the landing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowcaseCategory {
    #[serde(rename = "_id")]
    pub id: ShowcaseCategoryId,
    pub display_name: String,
    pub image: String,
    #[serde(default)]
    pub category: Option<CategoryRef>,
}

/// A free sample a customer can add to an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tester {
    #[serde(rename = "_id")]
    pub id: TesterId,
    pub name: String,
}
