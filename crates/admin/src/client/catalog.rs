//! Catalog management: products, categories, showcase tiles and testers.

use reqwest::Method;
use rust_decimal::Decimal;
use sabriaz_core::{
    Category, CategoryId, Product, ProductId, ShowcaseCategory, ShowcaseCategoryId, Tester, TesterId,
};
use serde::Serialize;
use tracing::instrument;

use super::{AdminClient, item_path};
use crate::error::{AdminError, Result};

/// Fields of the product form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    pub name: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub discount_percent: Decimal,
    pub stock: u32,
    pub category: CategoryId,
    pub images: Vec<String>,
    pub is_featured: bool,
}

impl ProductInput {
    /// Reject input the backend would store in a broken state.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::BadRequest` describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(AdminError::BadRequest("Product name is required".to_string()));
        }
        if self.price <= Decimal::ZERO {
            return Err(AdminError::BadRequest("Price must be greater than zero".to_string()));
        }
        if self.discount_percent < Decimal::ZERO || self.discount_percent > Decimal::ONE_HUNDRED {
            return Err(AdminError::BadRequest(
                "Discount must be between 0 and 100 percent".to_string(),
            ));
        }
        Ok(())
    }
}

/// Fields of the showcase tile form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowcaseInput {
    pub display_name: String,
    pub image: String,
    pub category: CategoryId,
}

impl ShowcaseInput {
    /// A tile without an image cannot be shown.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::BadRequest` if the image or name is blank.
    pub fn validate(&self) -> Result<()> {
        if self.image.trim().is_empty() {
            return Err(AdminError::BadRequest("Please upload an image".to_string()));
        }
        if self.display_name.trim().is_empty() {
            return Err(AdminError::BadRequest("Display name is required".to_string()));
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct NameBody<'a> {
    name: &'a str,
}

#[derive(Serialize)]
struct ImagesBody<'a> {
    images: &'a [String],
}

fn required_name(name: &str, what: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AdminError::BadRequest(format!("{what} name is required")));
    }
    Ok(name.to_string())
}

impl AdminClient {
    // =========================================================================
    // Products
    // =========================================================================

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::BadRequest` for invalid input, otherwise
    /// `AdminError::Api` if the backend rejects it.
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_product(&self, input: &ProductInput) -> Result<Product> {
        input.validate()?;
        let product = self
            .api()
            .call_json(Method::POST, "api/products", input, Some(self.token()))
            .await?;
        Ok(product)
    }

    /// Replace a product's fields.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::BadRequest` for invalid input, otherwise
    /// `AdminError::Api` if the backend rejects it.
    #[instrument(skip(self, input), fields(product_id = %id))]
    pub async fn update_product(&self, id: &ProductId, input: &ProductInput) -> Result<Product> {
        input.validate()?;
        let path = item_path("api/products", id.as_str());
        let product = self
            .api()
            .call_json(Method::PUT, &path, input, Some(self.token()))
            .await?;
        Ok(product)
    }

    /// Replace only the image list of a product.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Api` if the backend rejects the update.
    #[instrument(skip(self, images), fields(product_id = %id, count = images.len()))]
    pub async fn set_product_images(&self, id: &ProductId, images: &[String]) -> Result<Product> {
        let path = item_path("api/products", id.as_str());
        let product = self
            .api()
            .call_json(Method::PUT, &path, &ImagesBody { images }, Some(self.token()))
            .await?;
        Ok(product)
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Api` if the backend refuses.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn delete_product(&self, id: &ProductId) -> Result<()> {
        self.api()
            .delete_resource(&item_path("api/products", id.as_str()), Some(self.token()))
            .await?;
        Ok(())
    }

    // =========================================================================
    // Categories
    // =========================================================================

    /// Create a category; the backend derives the slug.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::BadRequest` for a blank name, otherwise
    /// `AdminError::Api` if the backend rejects it.
    #[instrument(skip(self))]
    pub async fn create_category(&self, name: &str) -> Result<Category> {
        let name = required_name(name, "Category")?;
        let category = self
            .api()
            .call_json(Method::POST, "api/categories", &NameBody { name: &name }, Some(self.token()))
            .await?;
        Ok(category)
    }

    /// Rename a category.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::BadRequest` for a blank name, otherwise
    /// `AdminError::Api` if the backend rejects it.
    #[instrument(skip(self), fields(category_id = %id))]
    pub async fn update_category(&self, id: &CategoryId, name: &str) -> Result<Category> {
        let name = required_name(name, "Category")?;
        let category = self
            .api()
            .call_json(
                Method::PUT,
                &item_path("api/categories", id.as_str()),
                &NameBody { name: &name },
                Some(self.token()),
            )
            .await?;
        Ok(category)
    }

    /// Delete a category.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Api` if the backend refuses.
    #[instrument(skip(self), fields(category_id = %id))]
    pub async fn delete_category(&self, id: &CategoryId) -> Result<()> {
        self.api()
            .delete_resource(&item_path("api/categories", id.as_str()), Some(self.token()))
            .await?;
        Ok(())
    }

    // =========================================================================
    // Showcase tiles
    // =========================================================================

    /// Create a landing-page tile.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::BadRequest` without an image, otherwise
    /// `AdminError::Api` if the backend rejects it.
    #[instrument(skip(self, input), fields(display_name = %input.display_name))]
    pub async fn create_showcase(&self, input: &ShowcaseInput) -> Result<ShowcaseCategory> {
        input.validate()?;
        let tile = self
            .api()
            .call_json(Method::POST, "api/showcase-categories", input, Some(self.token()))
            .await?;
        Ok(tile)
    }

    /// Replace a tile's fields.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::BadRequest` without an image, otherwise
    /// `AdminError::Api` if the backend rejects it.
    #[instrument(skip(self, input), fields(showcase_id = %id))]
    pub async fn update_showcase(
        &self,
        id: &ShowcaseCategoryId,
        input: &ShowcaseInput,
    ) -> Result<ShowcaseCategory> {
        input.validate()?;
        let tile = self
            .api()
            .call_json(
                Method::PUT,
                &item_path("api/showcase-categories", id.as_str()),
                input,
                Some(self.token()),
            )
            .await?;
        Ok(tile)
    }

    /// Delete a tile.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Api` if the backend refuses.
    #[instrument(skip(self), fields(showcase_id = %id))]
    pub async fn delete_showcase(&self, id: &ShowcaseCategoryId) -> Result<()> {
        self.api()
            .delete_resource(&item_path("api/showcase-categories", id.as_str()), Some(self.token()))
            .await?;
        Ok(())
    }

    // =========================================================================
    // Testers
    // =========================================================================

    /// Offer a new free sample.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::BadRequest` for a blank name, otherwise
    /// `AdminError::Api` if the backend rejects it.
    #[instrument(skip(self))]
    pub async fn create_tester(&self, name: &str) -> Result<Tester> {
        let name = required_name(name, "Tester")?;
        let tester = self
            .api()
            .call_json(Method::POST, "api/testers", &NameBody { name: &name }, Some(self.token()))
            .await?;
        Ok(tester)
    }

    /// Withdraw a free sample.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Api` if the backend refuses.
    #[instrument(skip(self), fields(tester_id = %id))]
    pub async fn delete_tester(&self, id: &TesterId) -> Result<()> {
        self.api()
            .delete_resource(&item_path("api/testers", id.as_str()), Some(self.token()))
            .await?;
        Ok(())
    }
}
