/// Represents a product in the catalog.
///
/// # Edit Framework
/// Products are read-only from the inventory editor's point of view: the editor keys its
/// ledger by [`ProductId`] and only ever writes inventory rows. The catalog flow may edit
/// the title and color and replace or clear the image reference.
use serde::{Deserialize, Serialize};

use std::fmt::Display;

/// Type-safe identifier for Products.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub i64);

impl From<i64> for ProductId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: Option<String>,
    pub color: Option<String>,
    pub image_url: Option<String>,
}

impl Product {
    /// Creates a new Product instance without color or image.
    pub fn new(id: impl Into<ProductId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: Some(title.into()),
            color: None,
            image_url: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    /// Title used for display and ordering; untitled products sort first.
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }

    /// Applies an update in place.
    pub fn apply(&mut self, update: ProductUpdate) {
        if let Some(title) = update.title {
            self.title = Some(title);
        }
        if let Some(color) = update.color {
            self.color = color;
        }
        if let Some(image_url) = update.image_url {
            self.image_url = image_url;
        }
    }
}

// DTO for Product updates. `None` leaves a field untouched; `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub title: Option<String>,
    pub color: Option<Option<String>>,
    pub image_url: Option<Option<String>>,
}

impl ProductUpdate {
    /// Title and color edit from the product form.
    pub fn details(title: impl Into<String>, color: Option<String>) -> Self {
        Self {
            title: Some(title.into()),
            color: Some(color),
            image_url: None,
        }
    }

    /// Replaces (`Some`) or clears (`None`) the image reference.
    pub fn image(url: Option<String>) -> Self {
        Self {
            image_url: Some(url),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_leaves_untouched_fields() {
        let mut product = Product::new(1, "Mug").with_color("blue").with_image("http://x/a.png");

        product.apply(ProductUpdate::image(None));

        assert_eq!(product.title.as_deref(), Some("Mug"));
        assert_eq!(product.color.as_deref(), Some("blue"));
        assert_eq!(product.image_url, None);
    }

    #[test]
    fn test_details_can_clear_color() {
        let mut product = Product::new(1, "Mug").with_color("blue");

        product.apply(ProductUpdate::details("Big Mug", None));

        assert_eq!(product.title.as_deref(), Some("Big Mug"));
        assert_eq!(product.color, None);
    }
}
