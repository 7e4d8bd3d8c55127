use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{ReviewError, ReviewResult};
use crate::models::{Review, ReviewAuthor};

/// Repository trait for Review persistence.
///
/// `insert` is the uniqueness authority: implementations must reject a
/// second review for the same (product, author) or (product, guest email)
/// pair with `DuplicateReview`, even under concurrent inserts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Insert a new review, enforcing per-identity uniqueness
    async fn insert(&self, review: Review) -> ReviewResult<Review>;

    /// Get a review by ID
    async fn get_by_id(&self, id: Uuid) -> ReviewResult<Option<Review>>;

    /// List reviews for a product, newest first
    async fn list_by_product(&self, product_id: Uuid) -> ReviewResult<Vec<Review>>;

    /// Whether an identity already reviewed the product
    async fn exists_for_author(&self, product_id: Uuid, author: &ReviewAuthor)
        -> ReviewResult<bool>;

    /// Replace an existing review
    async fn update(&self, review: Review) -> ReviewResult<Review>;

    /// Delete a review by ID, returning whether it existed
    async fn delete(&self, id: Uuid) -> ReviewResult<bool>;
}

fn same_identity(a: &ReviewAuthor, b: &ReviewAuthor) -> bool {
    match (a, b) {
        (ReviewAuthor::User { author_id: x }, ReviewAuthor::User { author_id: y }) => x == y,
        (
            ReviewAuthor::Guest { guest_email: x, .. },
            ReviewAuthor::Guest { guest_email: y, .. },
        ) => x.eq_ignore_ascii_case(y),
        _ => false,
    }
}

/// In-memory implementation of ReviewRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryReviewRepository {
    reviews: Arc<RwLock<HashMap<Uuid, Review>>>,
}

impl InMemoryReviewRepository {
    pub fn new() -> Self {
        Self {
            reviews: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl ReviewRepository for InMemoryReviewRepository {
    async fn insert(&self, review: Review) -> ReviewResult<Review> {
        let mut reviews = self.reviews.write().await;

        let duplicate = reviews.values().any(|r| {
            r.product_id == review.product_id && same_identity(&r.author, &review.author)
        });
        if duplicate {
            return Err(ReviewError::DuplicateReview);
        }

        reviews.insert(review.id, review.clone());

        tracing::info!(review_id = %review.id, product_id = %review.product_id, "Created review");
        Ok(review)
    }

    async fn get_by_id(&self, id: Uuid) -> ReviewResult<Option<Review>> {
        let reviews = self.reviews.read().await;
        Ok(reviews.get(&id).cloned())
    }

    async fn list_by_product(&self, product_id: Uuid) -> ReviewResult<Vec<Review>> {
        let reviews = self.reviews.read().await;

        let mut result: Vec<Review> = reviews
            .values()
            .filter(|r| r.product_id == product_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(result)
    }

    async fn exists_for_author(
        &self,
        product_id: Uuid,
        author: &ReviewAuthor,
    ) -> ReviewResult<bool> {
        let reviews = self.reviews.read().await;
        Ok(reviews
            .values()
            .any(|r| r.product_id == product_id && same_identity(&r.author, author)))
    }

    async fn update(&self, review: Review) -> ReviewResult<Review> {
        let mut reviews = self.reviews.write().await;

        if !reviews.contains_key(&review.id) {
            return Err(ReviewError::NotFound(review.id));
        }

        reviews.insert(review.id, review.clone());
        Ok(review)
    }

    async fn delete(&self, id: Uuid) -> ReviewResult<bool> {
        let mut reviews = self.reviews.write().await;
        Ok(reviews.remove(&id).is_some())
    }
}
