use std::sync::Arc;
use uuid::Uuid;

use axum_helpers::JwtClaims;
use domain_products::ProductRepository;

use crate::error::{ReviewError, ReviewResult};
use crate::identity::resolve_author;
use crate::models::{CreateReview, Review, ReviewAuthor, UpdateReview};
use crate::repository::ReviewRepository;

/// Service layer for Review business logic.
///
/// Owns the review lifecycle: identity resolution, invariant checks,
/// self-review and authorship guards, and the duplicate pre-check. The
/// store's unique indexes remain the final authority on uniqueness.
#[derive(Clone)]
pub struct ReviewService<R: ReviewRepository, P: ProductRepository> {
    reviews: Arc<R>,
    products: Arc<P>,
}

impl<R: ReviewRepository, P: ProductRepository> ReviewService<R, P> {
    pub fn new(reviews: R, products: Arc<P>) -> Self {
        Self {
            reviews: Arc::new(reviews),
            products,
        }
    }

    /// Create a review for a product.
    ///
    /// Works for authenticated users and guests; `claims` is whatever the
    /// optional-auth middleware resolved.
    pub async fn create_review(
        &self,
        product_id: Uuid,
        claims: Option<&JwtClaims>,
        input: CreateReview,
    ) -> ReviewResult<Review> {
        let author = resolve_author(claims, &input)?;

        let product = self
            .products
            .get_by_id(product_id)
            .await?
            .ok_or(ReviewError::ProductNotFound(product_id))?;

        if let ReviewAuthor::User { author_id } = author {
            if product.is_owned_by(author_id) {
                return Err(ReviewError::SelfReview);
            }
        }

        let review = Review::new(product_id, author, &input);
        if !review.has_content() {
            return Err(ReviewError::EmptyReview);
        }

        // Fast-path rejection; the partial unique indexes catch races.
        if self
            .reviews
            .exists_for_author(product_id, &review.author)
            .await?
        {
            return Err(ReviewError::DuplicateReview);
        }

        self.reviews.insert(review).await
    }

    /// List a product's reviews, newest first. The product must exist.
    pub async fn list_reviews(&self, product_id: Uuid) -> ReviewResult<Vec<Review>> {
        self.products
            .get_by_id(product_id)
            .await?
            .ok_or(ReviewError::ProductNotFound(product_id))?;

        self.reviews.list_by_product(product_id).await
    }

    /// Update a review; only the registered author may do so. Guest reviews
    /// are immutable through the API.
    pub async fn update_review(
        &self,
        id: Uuid,
        actor: Uuid,
        input: UpdateReview,
    ) -> ReviewResult<Review> {
        if input.is_empty() {
            return Err(ReviewError::NoChanges);
        }

        let mut review = self
            .reviews
            .get_by_id(id)
            .await?
            .ok_or(ReviewError::NotFound(id))?;

        if review.author.author_id() != Some(actor) {
            return Err(ReviewError::NotAuthor);
        }

        review.apply_update(input);
        if !review.has_content() {
            return Err(ReviewError::EmptyReview);
        }

        self.reviews.update(review).await
    }

    /// Delete a review; only the registered author may do so.
    pub async fn delete_review(&self, id: Uuid, actor: Uuid) -> ReviewResult<()> {
        let review = self
            .reviews
            .get_by_id(id)
            .await?
            .ok_or(ReviewError::NotFound(id))?;

        if review.author.author_id() != Some(actor) {
            return Err(ReviewError::NotAuthor);
        }

        let deleted = self.reviews.delete(id).await?;
        if !deleted {
            return Err(ReviewError::NotFound(id));
        }

        Ok(())
    }
}
