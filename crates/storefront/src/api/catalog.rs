//! Catalog resources: products, categories, reviews, showcase tiles, testers.

use sabriaz_core::{Category, Product, ProductId, Review, ShowcaseCategory, Tester};
use serde::Serialize;
use tracing::instrument;

use super::{ApiClient, ApiError, segment};

/// Body of `POST /api/reviews`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReview {
    pub product_id: ProductId,
    pub rating: u8,
    pub comment: String,
    pub customer_name: String,
}

impl NewReview {
    /// Name shown when the reviewer leaves theirs blank.
    pub const ANONYMOUS: &'static str = "Anonymous";

    /// Build a review submission, checking the rating and defaulting the name.
    ///
    /// # Errors
    ///
    /// Returns a message when the rating is outside one to five stars.
    pub fn new(
        product_id: ProductId,
        rating: u8,
        comment: impl Into<String>,
        customer_name: Option<&str>,
    ) -> Result<Self, String> {
        if !(1..=5).contains(&rating) {
            return Err("Rating must be between 1 and 5 stars".to_string());
        }
        let customer_name = customer_name
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(Self::ANONYMOUS)
            .to_string();

        Ok(Self {
            product_id,
            rating,
            comment: comment.into().trim().to_string(),
            customer_name,
        })
    }
}

impl ApiClient {
    // =========================================================================
    // Products
    // =========================================================================

    /// Every product, in backend order.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        self.get("api/products", None).await
    }

    /// A single product.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Api` with status 404 if the product does not exist.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: &ProductId) -> Result<Product, ApiError> {
        self.get(&format!("api/products/{}", segment(id.as_str())), None)
            .await
    }

    /// Products in the category with the given slug.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn products_by_category_slug(&self, slug: &str) -> Result<Vec<Product>, ApiError> {
        self.get(&format!("api/products?slug={}", segment(slug)), None)
            .await
    }

    // =========================================================================
    // Categories
    // =========================================================================

    /// All categories.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> Result<Vec<Category>, ApiError> {
        self.get("api/categories", None).await
    }

    /// A category by slug.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Api` with status 404 if no category has the slug.
    #[instrument(skip(self))]
    pub async fn category_by_slug(&self, slug: &str) -> Result<Category, ApiError> {
        self.get(&format!("api/categories/{}", segment(slug)), None)
            .await
    }

    // =========================================================================
    // Reviews
    // =========================================================================

    /// Reviews of one product.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn product_reviews(&self, product_id: &ProductId) -> Result<Vec<Review>, ApiError> {
        self.get(&format!("api/reviews/{}", segment(product_id.as_str())), None)
            .await
    }

    /// Post a review. Reviews are anonymous; no token is sent.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the backend rejects the review.
    #[instrument(skip(self, review), fields(product_id = %review.product_id))]
    pub async fn create_review(&self, review: &NewReview) -> Result<(), ApiError> {
        self.send_json_unit(reqwest::Method::POST, "api/reviews", review, None)
            .await
    }

    // =========================================================================
    // Landing page and cart extras
    // =========================================================================

    /// Image tiles shown on the landing page.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn showcase_categories(&self) -> Result<Vec<ShowcaseCategory>, ApiError> {
        self.get("api/showcase-categories", None).await
    }

    /// Free samples offered in the cart.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn list_testers(&self) -> Result<Vec<Tester>, ApiError> {
        self.get("api/testers", None).await
    }
}
