use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{ProductError, ProductResult};
use crate::models::{Product, ProductFilter, ProductSort};

/// Repository trait for Product persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Insert a new product
    async fn insert(&self, product: Product) -> ProductResult<Product>;

    /// Get a product by ID
    async fn get_by_id(&self, id: Uuid) -> ProductResult<Option<Product>>;

    /// List products with optional filters
    async fn list(&self, filter: ProductFilter) -> ProductResult<Vec<Product>>;

    /// Distinct category values, lexicographically sorted
    async fn categories(&self) -> ProductResult<Vec<String>>;

    /// Replace an existing product
    async fn update(&self, product: Product) -> ProductResult<Product>;

    /// Delete a product by ID, returning whether it existed
    async fn delete(&self, id: Uuid) -> ProductResult<bool>;
}

/// In-memory implementation of ProductRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryProductRepository {
    products: Arc<RwLock<HashMap<Uuid, Product>>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self {
            products: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn insert(&self, product: Product) -> ProductResult<Product> {
        let mut products = self.products.write().await;
        products.insert(product.id, product.clone());

        tracing::info!(product_id = %product.id, "Created product");
        Ok(product)
    }

    async fn get_by_id(&self, id: Uuid) -> ProductResult<Option<Product>> {
        let products = self.products.read().await;
        Ok(products.get(&id).cloned())
    }

    async fn list(&self, filter: ProductFilter) -> ProductResult<Vec<Product>> {
        let products = self.products.read().await;

        let mut result: Vec<Product> = products
            .values()
            .filter(|p| {
                if let Some(ref category) = filter.category {
                    if &p.category != category {
                        return false;
                    }
                }
                if let Some(ref search) = filter.search {
                    let needle = search.to_lowercase();
                    let hit = p.title.to_lowercase().contains(&needle)
                        || p.description.to_lowercase().contains(&needle);
                    if !hit {
                        return false;
                    }
                }
                if let Some(min) = filter.min_price {
                    if p.price < min {
                        return false;
                    }
                }
                if let Some(max) = filter.max_price {
                    if p.price > max {
                        return false;
                    }
                }
                true
            })
            .cloned()
            .collect();

        match filter.sort_order() {
            ProductSort::Newest => result.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            ProductSort::PriceAsc => {
                result.sort_by(|a, b| a.price.total_cmp(&b.price));
            }
            ProductSort::PriceDesc => {
                result.sort_by(|a, b| b.price.total_cmp(&a.price));
            }
        }

        let result: Vec<Product> = result
            .into_iter()
            .skip(filter.offset() as usize)
            .take(filter.limit() as usize)
            .collect();

        Ok(result)
    }

    async fn categories(&self) -> ProductResult<Vec<String>> {
        let products = self.products.read().await;

        let mut categories: Vec<String> =
            products.values().map(|p| p.category.clone()).collect();
        categories.sort();
        categories.dedup();

        Ok(categories)
    }

    async fn update(&self, product: Product) -> ProductResult<Product> {
        let mut products = self.products.write().await;

        if !products.contains_key(&product.id) {
            return Err(ProductError::NotFound(product.id));
        }

        products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn delete(&self, id: Uuid) -> ProductResult<bool> {
        let mut products = self.products.write().await;
        Ok(products.remove(&id).is_some())
    }
}
