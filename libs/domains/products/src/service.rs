use std::sync::Arc;
use uuid::Uuid;

use crate::error::{ProductError, ProductResult};
use crate::models::{CreateProduct, Product, ProductFilter, UpdateProduct};
use crate::repository::ProductRepository;

/// Service layer for Product business logic
#[derive(Clone)]
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Create a new product owned by the acting user
    pub async fn create_product(
        &self,
        input: CreateProduct,
        owner_id: Uuid,
    ) -> ProductResult<Product> {
        self.validate_price(input.price)?;

        let product = Product::new(input, Some(owner_id));
        self.repository.insert(product).await
    }

    /// Get a product by ID
    pub async fn get_product(&self, id: Uuid) -> ProductResult<Product> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(ProductError::NotFound(id))
    }

    /// List products with filters
    pub async fn list_products(&self, filter: ProductFilter) -> ProductResult<Vec<Product>> {
        self.repository.list(filter).await
    }

    /// Distinct category values, sorted
    pub async fn list_categories(&self) -> ProductResult<Vec<String>> {
        self.repository.categories().await
    }

    /// Update a product; only its owner may do so
    pub async fn update_product(
        &self,
        id: Uuid,
        input: UpdateProduct,
        actor: Uuid,
    ) -> ProductResult<Product> {
        if let Some(price) = input.price {
            self.validate_price(price)?;
        }

        let mut product = self.get_product(id).await?;

        if !product.is_owned_by(actor) {
            return Err(ProductError::NotOwner);
        }

        product.apply_update(input);
        self.repository.update(product).await
    }

    /// Delete a product; only its owner may do so
    pub async fn delete_product(&self, id: Uuid, actor: Uuid) -> ProductResult<()> {
        let product = self.get_product(id).await?;

        if !product.is_owned_by(actor) {
            return Err(ProductError::NotOwner);
        }

        let deleted = self.repository.delete(id).await?;
        if !deleted {
            return Err(ProductError::NotFound(id));
        }

        Ok(())
    }

    // Structural validation happens in ValidatedJson; finiteness cannot be
    // expressed as a validator attribute, so it is re-checked here.
    fn validate_price(&self, price: f64) -> ProductResult<()> {
        if !price.is_finite() || price < 0.0 {
            return Err(ProductError::Validation(
                "Price must be a finite, non-negative number".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryProductRepository;

    fn service() -> ProductService<InMemoryProductRepository> {
        ProductService::new(InMemoryProductRepository::new())
    }

    fn create_input(title: &str, price: f64, category: &str) -> CreateProduct {
        CreateProduct {
            title: title.to_string(),
            description: None,
            price,
            category: category.to_string(),
            stock: None,
            tags: None,
            images: None,
        }
    }

    #[tokio::test]
    async fn test_create_sets_owner() {
        let svc = service();
        let owner = Uuid::new_v4();

        let product = svc
            .create_product(create_input("Lamp", 10.0, "home"), owner)
            .await
            .unwrap();

        assert_eq!(product.owner_id, Some(owner));
    }

    #[tokio::test]
    async fn test_create_rejects_nan_price() {
        let err = service()
            .create_product(create_input("Lamp", f64::NAN, "home"), Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, ProductError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_by_non_owner_is_forbidden() {
        let svc = service();
        let owner = Uuid::new_v4();
        let product = svc
            .create_product(create_input("Lamp", 10.0, "home"), owner)
            .await
            .unwrap();

        let err = svc
            .update_product(
                product.id,
                UpdateProduct {
                    price: Some(12.0),
                    ..Default::default()
                },
                Uuid::new_v4(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ProductError::NotOwner));
    }

    #[tokio::test]
    async fn test_update_by_owner_merges() {
        let svc = service();
        let owner = Uuid::new_v4();
        let product = svc
            .create_product(create_input("Lamp", 10.0, "home"), owner)
            .await
            .unwrap();

        let updated = svc
            .update_product(
                product.id,
                UpdateProduct {
                    price: Some(12.0),
                    ..Default::default()
                },
                owner,
            )
            .await
            .unwrap();

        assert_eq!(updated.price, 12.0);
        assert_eq!(updated.title, "Lamp");
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let err = service()
            .delete_product(Uuid::new_v4(), Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, ProductError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_ownerless_product_cannot_be_mutated() {
        let svc = service();
        let product = Product::new(create_input("Orphan", 5.0, "misc"), None);
        svc.repository.insert(product.clone()).await.unwrap();

        let err = svc
            .delete_product(product.id, Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, ProductError::NotOwner));
    }

    #[tokio::test]
    async fn test_list_price_bounds_are_inclusive() {
        let svc = service();
        let owner = Uuid::new_v4();
        for (title, price) in [("A", 5.0), ("B", 10.0), ("C", 15.0)] {
            svc.create_product(create_input(title, price, "misc"), owner)
                .await
                .unwrap();
        }

        let products = svc
            .list_products(ProductFilter {
                min_price: Some(5.0),
                max_price: Some(10.0),
                ..Default::default()
            })
            .await
            .unwrap();

        let mut titles: Vec<&str> = products.iter().map(|p| p.title.as_str()).collect();
        titles.sort();
        assert_eq!(titles, vec!["A", "B"]);
    }

    #[tokio::test]
    async fn test_list_sorts_by_price() {
        let svc = service();
        let owner = Uuid::new_v4();
        for (title, price) in [("Mid", 10.0), ("Cheap", 5.0), ("Dear", 15.0)] {
            svc.create_product(create_input(title, price, "misc"), owner)
                .await
                .unwrap();
        }

        let asc = svc
            .list_products(ProductFilter {
                sort: Some("price-asc".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        let titles: Vec<&str> = asc.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Cheap", "Mid", "Dear"]);

        let desc = svc
            .list_products(ProductFilter {
                sort: Some("price-desc".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        let titles: Vec<&str> = desc.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Dear", "Mid", "Cheap"]);
    }

    #[tokio::test]
    async fn test_list_search_is_case_insensitive() {
        let svc = service();
        let owner = Uuid::new_v4();
        svc.create_product(create_input("Desk Lamp", 10.0, "home"), owner)
            .await
            .unwrap();
        svc.create_product(create_input("Chair", 20.0, "home"), owner)
            .await
            .unwrap();

        let products = svc
            .list_products(ProductFilter {
                search: Some("LAMP".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(products.len(), 1);
        assert_eq!(products[0].title, "Desk Lamp");
    }

    #[tokio::test]
    async fn test_categories_sorted_distinct() {
        let svc = service();
        let owner = Uuid::new_v4();
        for category in ["home", "audio", "home", "books"] {
            svc.create_product(create_input("X", 1.0, category), owner)
                .await
                .unwrap();
        }

        let categories = svc.list_categories().await.unwrap();
        assert_eq!(categories, vec!["audio", "books", "home"]);
    }
}
