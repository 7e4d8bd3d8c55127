use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("Review not found: {0}")]
    NotFound(Uuid),

    #[error("Product not found: {0}")]
    ProductNotFound(Uuid),

    #[error("Review must contain a rating, a comment, or an image")]
    EmptyReview,

    #[error("Update payload contains no changes")]
    NoChanges,

    #[error("Identity mismatch: {0}")]
    IdentityMismatch(String),

    #[error("A review needs an authenticated user or guest name and email")]
    MissingIdentity,

    #[error("Product owners cannot review their own product")]
    SelfReview,

    #[error("Only the review author can modify this review")]
    NotAuthor,

    #[error("A review for this product already exists for this identity")]
    DuplicateReview,

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

pub type ReviewResult<T> = Result<T, ReviewError>;

/// Convert ReviewError to AppError for standardized error responses
impl From<ReviewError> for AppError {
    fn from(err: ReviewError) -> Self {
        match err {
            ReviewError::NotFound(id) => AppError::NotFound(format!("Review {} not found", id)),
            ReviewError::ProductNotFound(id) => {
                AppError::NotFound(format!("Product {} not found", id))
            }
            ReviewError::EmptyReview => AppError::BadRequest(
                "Review must contain a rating, a comment, or an image".to_string(),
            ),
            ReviewError::NoChanges => {
                AppError::BadRequest("Update payload contains no changes".to_string())
            }
            ReviewError::IdentityMismatch(msg) => {
                AppError::BadRequest(format!("Identity mismatch: {}", msg))
            }
            ReviewError::MissingIdentity => AppError::BadRequest(
                "A review needs an authenticated user or guest name and email".to_string(),
            ),
            ReviewError::SelfReview => {
                AppError::Forbidden("Product owners cannot review their own product".to_string())
            }
            ReviewError::NotAuthor => {
                AppError::Forbidden("Only the review author can modify this review".to_string())
            }
            ReviewError::DuplicateReview => AppError::Conflict(
                "A review for this product already exists for this identity".to_string(),
            ),
            ReviewError::Validation(msg) => AppError::BadRequest(msg),
            ReviewError::Database(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for ReviewError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

/// Store errors are classified once, here: a duplicate-key violation of the
/// partial unique indexes means the identity already reviewed the product;
/// everything else is an opaque database failure.
impl From<mongodb::error::Error> for ReviewError {
    fn from(err: mongodb::error::Error) -> Self {
        use mongodb::error::{ErrorKind, WriteFailure};
        if matches!(*err.kind, ErrorKind::Write(WriteFailure::WriteError(ref e)) if e.code == 11000)
        {
            return ReviewError::DuplicateReview;
        }
        ReviewError::Database(err.to_string())
    }
}

impl From<domain_products::ProductError> for ReviewError {
    fn from(err: domain_products::ProductError) -> Self {
        match err {
            domain_products::ProductError::NotFound(id) => ReviewError::ProductNotFound(id),
            other => ReviewError::Database(other.to_string()),
        }
    }
}
