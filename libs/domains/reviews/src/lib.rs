//! Reviews Domain
//!
//! Product reviews from registered users and guests, with strict identity
//! resolution, per-identity uniqueness, and author-only mutation.
//!
//! # Architecture
//!
//! ```text
//! Handlers → Service → Repository (trait + implementations) → Models
//!                ↘ identity (pure resolution rules)
//! ```
//!
//! The service also consults the products repository: reviews can only be
//! attached to existing products, and product owners cannot review their
//! own listings.

pub mod error;
pub mod handlers;
pub mod identity;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;

pub use error::{ReviewError, ReviewResult};
pub use handlers::{ProductReviewsApiDoc, ReviewsApiDoc};
pub use models::{CreateReview, OriginClaim, Review, ReviewAuthor, UpdateReview};
pub use mongodb::MongoReviewRepository;
pub use repository::{InMemoryReviewRepository, ReviewRepository};
pub use service::ReviewService;
