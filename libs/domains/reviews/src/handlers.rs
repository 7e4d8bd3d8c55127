//! HTTP handlers for Reviews API
//!
//! Two routers: one mounted alongside the product routes for
//! `/{id}/reviews` (list + create), one mounted at `/reviews` for direct
//! review mutation. Creation runs behind optional auth so both registered
//! users and guests can post; mutation requires a token.

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch},
    Extension, Json, Router,
};
use axum_helpers::{
    jwt_auth_middleware, optional_jwt_auth_middleware, ErrorResponse, JwtAuth, JwtClaims, UuidPath,
    ValidatedJson,
};
use domain_products::ProductRepository;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::models::{CreateReview, Review, ReviewAuthor, UpdateReview};
use crate::repository::ReviewRepository;
use crate::service::ReviewService;

/// OpenAPI documentation for the review endpoints mounted under the
/// products path (`/{id}/reviews`)
#[derive(OpenApi)]
#[openapi(
    paths(list_reviews, create_review),
    components(
        schemas(Review, ReviewAuthor, CreateReview, ErrorResponse)
    ),
    tags(
        (name = "Reviews", description = "Product review endpoints")
    )
)]
pub struct ProductReviewsApiDoc;

/// OpenAPI documentation for the direct review mutation endpoints
/// (`/reviews/{id}`)
#[derive(OpenApi)]
#[openapi(
    paths(update_review, delete_review),
    components(
        schemas(Review, ReviewAuthor, UpdateReview, ErrorResponse)
    ),
    tags(
        (name = "Reviews", description = "Product review endpoints")
    )
)]
pub struct ReviewsApiDoc;

/// Router for `/{id}/reviews`, meant to be merged into the products mount.
pub fn product_reviews_router<R, P>(service: Arc<ReviewService<R, P>>, jwt: JwtAuth) -> Router
where
    R: ReviewRepository + 'static,
    P: ProductRepository + 'static,
{
    Router::new()
        .route(
            "/{id}/reviews",
            get(list_reviews::<R, P>).post(create_review::<R, P>),
        )
        .layer(axum::middleware::from_fn_with_state(
            jwt,
            optional_jwt_auth_middleware,
        ))
        .with_state(service)
}

/// Router for `/reviews/{id}` mutation endpoints.
pub fn reviews_router<R, P>(service: Arc<ReviewService<R, P>>, jwt: JwtAuth) -> Router
where
    R: ReviewRepository + 'static,
    P: ProductRepository + 'static,
{
    Router::new()
        .route(
            "/{id}",
            patch(update_review::<R, P>).delete(delete_review::<R, P>),
        )
        .layer(axum::middleware::from_fn_with_state(
            jwt,
            jwt_auth_middleware,
        ))
        .with_state(service)
}

/// List a product's reviews, newest first
#[utoipa::path(
    get,
    path = "/{id}/reviews",
    tag = "Reviews",
    params(("id" = uuid::Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Reviews for the product", body = Vec<Review>),
        (status = 400, description = "Malformed product ID", body = ErrorResponse),
        (status = 404, description = "Product not found", body = ErrorResponse)
    )
)]
async fn list_reviews<R: ReviewRepository, P: ProductRepository>(
    State(service): State<Arc<ReviewService<R, P>>>,
    UuidPath(product_id): UuidPath,
) -> crate::error::ReviewResult<Json<Vec<Review>>> {
    let reviews = service.list_reviews(product_id).await?;
    Ok(Json(reviews))
}

/// Create a review as a registered user (bearer token) or guest
/// (guest_name + guest_email in the payload)
#[utoipa::path(
    post,
    path = "/{id}/reviews",
    tag = "Reviews",
    params(("id" = uuid::Uuid, Path, description = "Product ID")),
    request_body = CreateReview,
    responses(
        (status = 201, description = "Review created", body = Review),
        (status = 400, description = "Validation or identity error", body = ErrorResponse),
        (status = 401, description = "Token supplied but invalid", body = ErrorResponse),
        (status = 403, description = "Product owner reviewing own product", body = ErrorResponse),
        (status = 404, description = "Product not found", body = ErrorResponse),
        (status = 409, description = "Identity already reviewed this product", body = ErrorResponse)
    )
)]
async fn create_review<R: ReviewRepository, P: ProductRepository>(
    State(service): State<Arc<ReviewService<R, P>>>,
    claims: Option<Extension<JwtClaims>>,
    UuidPath(product_id): UuidPath,
    ValidatedJson(input): ValidatedJson<CreateReview>,
) -> crate::error::ReviewResult<impl IntoResponse> {
    let claims = claims.as_deref();
    let review = service.create_review(product_id, claims, input).await?;
    Ok((StatusCode::CREATED, Json(review)))
}

/// Update a review (registered author only)
#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Reviews",
    security(("bearer_auth" = [])),
    params(("id" = uuid::Uuid, Path, description = "Review ID")),
    request_body = UpdateReview,
    responses(
        (status = 200, description = "Review updated", body = Review),
        (status = 400, description = "Empty payload or validation error", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Not the review author", body = ErrorResponse),
        (status = 404, description = "Review not found", body = ErrorResponse)
    )
)]
async fn update_review<R: ReviewRepository, P: ProductRepository>(
    State(service): State<Arc<ReviewService<R, P>>>,
    Extension(claims): Extension<JwtClaims>,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateReview>,
) -> Result<Json<Review>, axum_helpers::AppError> {
    let actor = claims.user_id()?;
    let review = service.update_review(id, actor, input).await?;
    Ok(Json(review))
}

/// Delete a review (registered author only)
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Reviews",
    security(("bearer_auth" = [])),
    params(("id" = uuid::Uuid, Path, description = "Review ID")),
    responses(
        (status = 200, description = "Review deleted"),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Not the review author", body = ErrorResponse),
        (status = 404, description = "Review not found", body = ErrorResponse)
    )
)]
async fn delete_review<R: ReviewRepository, P: ProductRepository>(
    State(service): State<Arc<ReviewService<R, P>>>,
    Extension(claims): Extension<JwtClaims>,
    UuidPath(id): UuidPath,
) -> Result<Json<serde_json::Value>, axum_helpers::AppError> {
    let actor = claims.user_id()?;
    service.delete_review(id, actor).await?;
    Ok(Json(serde_json::json!({ "deleted": true })))
}
