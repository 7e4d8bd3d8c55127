//! API routes module
//!
//! Wires the domain routers onto the shared MongoDB-backed repositories.
//! Routes here are nested under `/api` by `axum_helpers::create_router`.

pub mod health;

use axum::Router;
use domain_products::{MongoProductRepository, ProductService};
use domain_reviews::{MongoReviewRepository, ReviewService};
use domain_users::{MongoUserRepository, UserService};
use std::sync::Arc;

use crate::state::AppState;

/// Create all API routes
pub fn routes(state: &AppState) -> Router {
    let jwt = state.jwt.clone();

    let users = UserService::new(MongoUserRepository::new(&state.db), jwt.clone());

    let products = ProductService::new(MongoProductRepository::new(&state.db));

    // The review service reads products directly so it can 404 on missing
    // products and block self-reviews.
    let product_repo = Arc::new(MongoProductRepository::new(&state.db));
    let reviews = Arc::new(ReviewService::new(
        MongoReviewRepository::new(&state.db),
        product_repo,
    ));

    let product_routes = domain_products::handlers::router(products, jwt.clone()).merge(
        domain_reviews::handlers::product_reviews_router(reviews.clone(), jwt.clone()),
    );

    Router::new()
        .nest("/auth", domain_users::handlers::router(users, jwt.clone()))
        .nest("/products", product_routes)
        .nest(
            "/reviews",
            domain_reviews::handlers::reviews_router(reviews, jwt),
        )
        .merge(health::router(state.clone()))
}

/// Create all MongoDB indexes the domains rely on. The review uniqueness
/// indexes are load-bearing, so startup fails if index creation does.
pub async fn init_indexes(state: &AppState) -> eyre::Result<()> {
    MongoUserRepository::new(&state.db)
        .init_indexes()
        .await
        .map_err(|e| eyre::eyre!("user indexes: {}", e))?;
    MongoProductRepository::new(&state.db)
        .init_indexes()
        .await
        .map_err(|e| eyre::eyre!("product indexes: {}", e))?;
    MongoReviewRepository::new(&state.db)
        .init_indexes()
        .await
        .map_err(|e| eyre::eyre!("review indexes: {}", e))?;

    Ok(())
}
