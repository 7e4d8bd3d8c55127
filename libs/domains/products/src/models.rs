use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Sort order for product listings
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, Default, ToSchema,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ProductSort {
    /// Newest first (by creation time)
    #[default]
    Newest,
    /// Cheapest first
    PriceAsc,
    /// Most expensive first
    PriceDesc,
}

impl ProductSort {
    /// Parse a sort selector leniently. Unrecognized values fall back to
    /// newest-first.
    pub fn parse_lenient(value: Option<&str>) -> Self {
        value
            .and_then(|v| v.parse().ok())
            .unwrap_or_default()
    }
}

/// Product entity - represents a product stored in MongoDB
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Product {
    /// Unique identifier (stored as _id in MongoDB)
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    /// Product title
    pub title: String,
    /// Product description
    #[serde(default)]
    pub description: String,
    /// Price in the marketplace currency
    pub price: f64,
    /// Free-form category label
    pub category: String,
    /// Current stock quantity
    #[serde(default)]
    pub stock: i64,
    /// Tags for search and organization
    #[serde(default)]
    pub tags: Vec<String>,
    /// Image URLs
    #[serde(default)]
    pub images: Vec<String>,
    /// The user who listed the product, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<Uuid>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn new(input: CreateProduct, owner_id: Option<Uuid>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            title: input.title,
            description: input.description.unwrap_or_default(),
            price: input.price,
            category: input.category,
            stock: input.stock.unwrap_or(0),
            tags: input.tags.unwrap_or_default(),
            images: input.images.unwrap_or_default(),
            owner_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the given user owns this product. A product without an owner
    /// is owned by nobody.
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.owner_id == Some(user_id)
    }

    /// Apply a partial update, bumping `updated_at`.
    pub fn apply_update(&mut self, input: UpdateProduct) {
        if let Some(title) = input.title {
            self.title = title;
        }
        if let Some(description) = input.description {
            self.description = description;
        }
        if let Some(price) = input.price {
            self.price = price;
        }
        if let Some(category) = input.category {
            self.category = category;
        }
        if let Some(stock) = input.stock {
            self.stock = stock;
        }
        if let Some(tags) = input.tags {
            self.tags = tags;
        }
        if let Some(images) = input.images {
            self.images = images;
        }
        self.updated_at = Utc::now();
    }
}

/// DTO for creating a new product
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateProduct {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    #[validate(range(min = 0.0))]
    pub price: f64,
    #[validate(length(min = 1, max = 100))]
    pub category: String,
    #[validate(range(min = 0))]
    pub stock: Option<i64>,
    pub tags: Option<Vec<String>>,
    pub images: Option<Vec<String>>,
}

/// DTO for updating an existing product (all fields optional)
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateProduct {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    #[validate(range(min = 0.0))]
    pub price: Option<f64>,
    #[validate(length(min = 1, max = 100))]
    pub category: Option<String>,
    #[validate(range(min = 0))]
    pub stock: Option<i64>,
    pub tags: Option<Vec<String>>,
    pub images: Option<Vec<String>>,
}

impl UpdateProduct {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.category.is_none()
            && self.stock.is_none()
            && self.tags.is_none()
            && self.images.is_none()
    }
}

/// Query parameters for product listing
#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
pub struct ProductFilter {
    /// Exact category match
    pub category: Option<String>,
    /// Case-insensitive substring search over title and description
    pub search: Option<String>,
    /// Inclusive lower price bound
    pub min_price: Option<f64>,
    /// Inclusive upper price bound
    pub max_price: Option<f64>,
    /// Sort selector: newest (default), price-asc, price-desc
    pub sort: Option<String>,
    /// Maximum number of results (default 50)
    pub limit: Option<i64>,
    /// Number of results to skip
    pub offset: Option<u64>,
}

impl ProductFilter {
    pub fn sort_order(&self) -> ProductSort {
        ProductSort::parse_lenient(self.sort.as_deref())
    }

    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(50).clamp(1, 200)
    }

    pub fn offset(&self) -> u64 {
        self.offset.unwrap_or(0)
    }
}
