//! Editable site content: home banner settings and the about page.

use serde::{Deserialize, Serialize};

/// Global storefront settings edited from the back-office.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SiteSettings {
    pub home_banner_image: String,
    pub home_banner_title: String,
    pub home_banner_subtitle: String,
    pub home_banner_link: String,
    /// Announcement strip text shown across the site.
    pub global_offer_text: String,
}

/// About page copy and imagery.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AboutContent {
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub mission: String,
    pub vision: String,
    pub image1: String,
    pub image2: String,
}
