//! # Product Catalog
//!
//! Listing, detail edits and image management for products. Unlike the inventory
//! editor there is no ledger here: each form submission is validated and written at once.
//!
//! Image uploads go to public-read object storage under
//! `products/{id}-{unix_millis}.{ext}`; the product stores the resulting public URL.
//! Removing an image clears that reference and leaves the blob in place.

pub mod error;

pub use error::*;

use crate::backend::{Backend, ObjectStorage, ProductStore};
use crate::model::{FilterState, Product, ProductId, ProductUpdate};
use crate::session::AdminUser;
use chrono::{DateTime, Utc};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, instrument};

/// Submitted product form.
#[derive(Debug, Clone, Default)]
pub struct ProductForm {
    pub title: String,
    pub color: String,
}

/// A file picked for upload.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }
}

pub struct CatalogService {
    backend: Arc<dyn Backend>,
    user: AdminUser,
}

impl CatalogService {
    /// Only constructed for an authenticated admin.
    pub fn new(backend: Arc<dyn Backend>, user: AdminUser) -> Self {
        Self { backend, user }
    }

    pub fn user(&self) -> &AdminUser {
        &self.user
    }

    #[instrument(skip(self))]
    pub async fn list(&self, filter: &FilterState) -> Result<Vec<Product>, CatalogError> {
        Ok(self.backend.list_products(filter).await?)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: ProductId) -> Result<Product, CatalogError> {
        self.backend
            .get_product(id)
            .await?
            .ok_or(CatalogError::NotFound(id))
    }

    /// Saves the title (required, trimmed) and color (optional; blank clears it).
    #[instrument(skip(self))]
    pub async fn update_details(
        &self,
        id: ProductId,
        form: ProductForm,
    ) -> Result<Product, CatalogError> {
        let title = form.title.trim();
        if title.is_empty() {
            return Err(CatalogError::TitleRequired);
        }
        let color = Some(form.color.trim())
            .filter(|c| !c.is_empty())
            .map(str::to_string);

        let product = self.write(id, ProductUpdate::details(title, color)).await?;
        info!(user = %self.user.email, %id, "Product updated");
        Ok(product)
    }

    /// Uploads a new image and points the product at it.
    #[instrument(skip(self, upload), fields(file = %upload.file_name, size = upload.bytes.len()))]
    pub async fn upload_image(
        &self,
        id: ProductId,
        upload: ImageUpload,
    ) -> Result<Product, CatalogError> {
        if upload.bytes.is_empty() {
            return Err(CatalogError::EmptyImage);
        }
        // fail before storing anything for an unknown product
        self.get(id).await?;

        let key = image_key(id, &upload.file_name, Utc::now())?;
        self.backend
            .upload_public(&key, upload.bytes, &upload.content_type)
            .await?;
        let url = self.backend.public_url(&key);

        let product = self.write(id, ProductUpdate::image(Some(url))).await?;
        info!(user = %self.user.email, %id, %key, "Image uploaded");
        Ok(product)
    }

    /// Clears the image reference. The stored blob is not deleted.
    #[instrument(skip(self))]
    pub async fn remove_image(&self, id: ProductId) -> Result<Product, CatalogError> {
        let product = self.write(id, ProductUpdate::image(None)).await?;
        info!(user = %self.user.email, %id, "Image removed");
        Ok(product)
    }

    async fn write(&self, id: ProductId, update: ProductUpdate) -> Result<Product, CatalogError> {
        match self.backend.update_product(id, update).await {
            Ok(product) => Ok(product),
            Err(crate::backend::BackendError::NotFound(_)) => Err(CatalogError::NotFound(id)),
            Err(e) => Err(e.into()),
        }
    }
}

/// Storage key for a product image: `products/{id}-{unix_millis}.{ext}`.
pub fn image_key(
    id: ProductId,
    file_name: &str,
    now: DateTime<Utc>,
) -> Result<String, CatalogError> {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty())
        .ok_or_else(|| CatalogError::MissingExtension(file_name.to_string()))?;
    Ok(format!(
        "products/{id}-{}.{}",
        now.timestamp_millis(),
        ext.to_lowercase()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;

    fn service(backend: Arc<MemoryBackend>) -> CatalogService {
        CatalogService::new(backend, AdminUser::new("u1", "ops@example.com"))
    }

    fn seeded() -> Arc<MemoryBackend> {
        Arc::new(
            MemoryBackend::new("https://cdn.example/public")
                .with_product(Product::new(4, "Mug").with_color("blue")),
        )
    }

    #[test]
    fn test_image_key_format() {
        let at = DateTime::from_timestamp_millis(1_714_557_600_123).unwrap();

        assert_eq!(
            image_key(ProductId(4), "Photo.JPG", at).unwrap(),
            "products/4-1714557600123.jpg"
        );
        assert_eq!(
            image_key(ProductId(4), "noext", at),
            Err(CatalogError::MissingExtension("noext".into()))
        );
        assert!(image_key(ProductId(4), "trailing.", at).is_err());
    }

    #[tokio::test]
    async fn test_update_details_trims_and_requires_title() {
        let backend = seeded();
        let catalog = service(backend.clone());

        let blank = ProductForm {
            title: "   ".into(),
            color: "red".into(),
        };
        assert_eq!(
            catalog.update_details(ProductId(4), blank).await,
            Err(CatalogError::TitleRequired)
        );

        let form = ProductForm {
            title: "  Big Mug ".into(),
            color: " ".into(),
        };
        let product = catalog.update_details(ProductId(4), form).await.unwrap();
        assert_eq!(product.title.as_deref(), Some("Big Mug"));
        assert_eq!(product.color, None);
    }

    #[tokio::test]
    async fn test_upload_stores_public_url() {
        let backend = seeded();
        let catalog = service(backend.clone());

        let upload = ImageUpload::new("mug.png", "image/png", vec![1, 2, 3]);
        let product = catalog.upload_image(ProductId(4), upload).await.unwrap();

        let url = product.image_url.expect("image url");
        assert!(url.starts_with("https://cdn.example/public/products/4-"));
        assert!(url.ends_with(".png"));

        let key = url.trim_start_matches("https://cdn.example/public/");
        let object = backend.object(key).expect("stored object");
        assert_eq!(object.bytes, vec![1, 2, 3]);
        assert_eq!(object.content_type, "image/png");
    }

    #[tokio::test]
    async fn test_rejected_uploads_store_nothing() {
        let backend = seeded();
        let catalog = service(backend.clone());

        let empty = ImageUpload::new("mug.png", "image/png", vec![]);
        assert_eq!(
            catalog.upload_image(ProductId(4), empty).await,
            Err(CatalogError::EmptyImage)
        );

        let unknown = ImageUpload::new("mug.png", "image/png", vec![1]);
        assert_eq!(
            catalog.upload_image(ProductId(99), unknown).await,
            Err(CatalogError::NotFound(ProductId(99)))
        );

        assert_eq!(backend.object_count(), 0);
    }

    #[tokio::test]
    async fn test_remove_image_keeps_blob() {
        let backend = seeded();
        let catalog = service(backend.clone());

        let upload = ImageUpload::new("mug.png", "image/png", vec![7]);
        catalog.upload_image(ProductId(4), upload).await.unwrap();

        let product = catalog.remove_image(ProductId(4)).await.unwrap();

        assert_eq!(product.image_url, None);
        assert_eq!(backend.object_count(), 1);
    }
}
