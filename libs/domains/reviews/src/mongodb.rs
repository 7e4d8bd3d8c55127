//! MongoDB implementation of ReviewRepository
//!
//! Uniqueness is enforced by two partial unique indexes: one over
//! `(product_id, author_id)` for registered users and one over
//! `(product_id, guest_email)` for guests. Each index only covers documents
//! that carry its identity field, so user reviews never collide with guest
//! reviews and vice versa. Duplicate-key violations (code 11000) surface as
//! `DuplicateReview` via the error conversion.

use async_trait::async_trait;
use mongodb::{
    bson::{doc, to_bson, Bson},
    options::IndexOptions,
    Collection, Database, IndexModel,
};
use tracing::instrument;
use uuid::Uuid;

use crate::error::{ReviewError, ReviewResult};
use crate::models::{Review, ReviewAuthor};
use crate::repository::ReviewRepository;

/// MongoDB implementation of the ReviewRepository
pub struct MongoReviewRepository {
    collection: Collection<Review>,
}

impl MongoReviewRepository {
    /// Create a new MongoReviewRepository
    pub fn new(db: &Database) -> Self {
        let collection = db.collection::<Review>("reviews");
        Self { collection }
    }

    /// Initialize indexes; the partial unique indexes are the uniqueness
    /// authority for review creation.
    pub async fn init_indexes(&self) -> ReviewResult<()> {
        let indexes = vec![
            // One review per (product, registered author)
            IndexModel::builder()
                .keys(doc! { "product_id": 1, "author_id": 1 })
                .options(
                    IndexOptions::builder()
                        .unique(true)
                        .partial_filter_expression(doc! { "author_id": { "$exists": true } })
                        .name("idx_product_author_unique".to_string())
                        .build(),
                )
                .build(),
            // One review per (product, guest email)
            IndexModel::builder()
                .keys(doc! { "product_id": 1, "guest_email": 1 })
                .options(
                    IndexOptions::builder()
                        .unique(true)
                        .partial_filter_expression(doc! { "guest_email": { "$exists": true } })
                        .name("idx_product_guest_unique".to_string())
                        .build(),
                )
                .build(),
            // Newest-first listing per product
            IndexModel::builder()
                .keys(doc! { "product_id": 1, "created_at": -1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_product_created".to_string())
                        .build(),
                )
                .build(),
        ];

        self.collection.create_indexes(indexes).await?;
        tracing::info!("Review indexes created successfully");
        Ok(())
    }

    fn identity_filter(product_id: Uuid, author: &ReviewAuthor) -> mongodb::bson::Document {
        let mut filter = doc! { "product_id": to_bson(&product_id).unwrap_or(Bson::Null) };
        match author {
            ReviewAuthor::User { author_id } => {
                filter.insert("author_id", to_bson(author_id).unwrap_or(Bson::Null));
            }
            ReviewAuthor::Guest { guest_email, .. } => {
                filter.insert("guest_email", guest_email);
            }
        }
        filter
    }
}

#[async_trait]
impl ReviewRepository for MongoReviewRepository {
    #[instrument(skip(self, review), fields(product_id = %review.product_id))]
    async fn insert(&self, review: Review) -> ReviewResult<Review> {
        self.collection.insert_one(&review).await?;

        tracing::info!(review_id = %review.id, "Review created successfully");
        Ok(review)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: Uuid) -> ReviewResult<Option<Review>> {
        let filter = doc! { "_id": to_bson(&id).unwrap_or(Bson::Null) };
        let review = self.collection.find_one(filter).await?;
        Ok(review)
    }

    #[instrument(skip(self))]
    async fn list_by_product(&self, product_id: Uuid) -> ReviewResult<Vec<Review>> {
        use futures_util::TryStreamExt;

        let filter = doc! { "product_id": to_bson(&product_id).unwrap_or(Bson::Null) };
        let options = mongodb::options::FindOptions::builder()
            .sort(doc! { "created_at": -1 })
            .build();

        let cursor = self.collection.find(filter).with_options(options).await?;
        let reviews: Vec<Review> = cursor.try_collect().await?;

        Ok(reviews)
    }

    #[instrument(skip(self, author))]
    async fn exists_for_author(
        &self,
        product_id: Uuid,
        author: &ReviewAuthor,
    ) -> ReviewResult<bool> {
        let filter = Self::identity_filter(product_id, author);
        let existing = self.collection.find_one(filter).await?;
        Ok(existing.is_some())
    }

    #[instrument(skip(self, review))]
    async fn update(&self, review: Review) -> ReviewResult<Review> {
        let filter = doc! { "_id": to_bson(&review.id).unwrap_or(Bson::Null) };

        let result = self.collection.replace_one(filter, &review).await?;
        if result.matched_count == 0 {
            return Err(ReviewError::NotFound(review.id));
        }

        tracing::info!(review_id = %review.id, "Review updated successfully");
        Ok(review)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> ReviewResult<bool> {
        let filter = doc! { "_id": to_bson(&id).unwrap_or(Bson::Null) };
        let result = self.collection.delete_one(filter).await?;

        Ok(result.deleted_count > 0)
    }
}
