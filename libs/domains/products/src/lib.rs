//! Products Domain
//!
//! Product catalog with public listing/filtering and owner-guarded mutation.
//!
//! # Architecture
//!
//! ```text
//! Handlers → Service → Repository (trait + implementations) → Models
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use axum_helpers::{JwtAuth, JwtConfig};
//! use domain_products::{handlers, InMemoryProductRepository, ProductService};
//!
//! let jwt = JwtAuth::new(&JwtConfig::new("a-secret-that-is-at-least-32-chars!!"));
//! let service = ProductService::new(InMemoryProductRepository::new());
//!
//! let router = handlers::router(service, jwt);
//! ```

pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;

pub use error::{ProductError, ProductResult};
pub use handlers::ApiDoc;
pub use models::{CreateProduct, Product, ProductFilter, ProductSort, UpdateProduct};
pub use mongodb::MongoProductRepository;
pub use repository::{InMemoryProductRepository, ProductRepository};
pub use service::ProductService;
