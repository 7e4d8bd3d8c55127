//! Handler tests for the Reviews domain
//!
//! These tests run the review routers against the in-memory repositories
//! and verify identity resolution, uniqueness, authorization, and the
//! HTTP status codes of the whole review lifecycle.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use axum_helpers::{JwtAuth, JwtConfig};
use domain_products::{CreateProduct, InMemoryProductRepository, Product, ProductRepository};
use domain_reviews::*;
use http_body_util::BodyExt;
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt; // For oneshot()
use uuid::Uuid;

fn jwt() -> JwtAuth {
    JwtAuth::new(&JwtConfig::new("test-secret-that-is-long-enough-123456"))
}

struct Fixture {
    /// Serves /{id}/reviews (list + create) and /reviews/{id} (mutation)
    app: Router,
    products: Arc<InMemoryProductRepository>,
}

fn fixture() -> Fixture {
    let products = Arc::new(InMemoryProductRepository::new());
    let service = Arc::new(ReviewService::new(
        InMemoryReviewRepository::new(),
        products.clone(),
    ));

    let app = handlers::product_reviews_router(service.clone(), jwt())
        .nest("/reviews", handlers::reviews_router(service, jwt()));

    Fixture { app, products }
}

async fn seed_product(products: &InMemoryProductRepository, owner: Option<Uuid>) -> Product {
    let product = Product::new(
        CreateProduct {
            title: "Lamp".to_string(),
            description: None,
            price: 10.0,
            category: "home".to_string(),
            stock: None,
            tags: None,
            images: None,
        },
        owner,
    );
    products.insert(product).await.unwrap()
}

fn token_for(user_id: Uuid) -> String {
    jwt()
        .create_access_token(&user_id.to_string(), "reviewer@example.com", "Reviewer")
        .unwrap()
}

async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_review(product_id: Uuid, token: Option<&str>, body: serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(format!("/{}/reviews", product_id))
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

#[tokio::test]
async fn test_authenticated_create_returns_201_with_user_origin() {
    let f = fixture();
    let product = seed_product(&f.products, None).await;
    let reviewer = Uuid::new_v4();

    let response = f
        .app
        .oneshot(post_review(
            product.id,
            Some(&token_for(reviewer)),
            json!({ "rating": 5, "comment": "great" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let body: serde_json::Value = json_body(response.into_body()).await;
    assert_eq!(body["origin"], "user");
    assert_eq!(body["author_id"], reviewer.to_string());
    assert_eq!(body["rating"], 5);
}

#[tokio::test]
async fn test_guest_create_returns_201_with_guest_origin() {
    let f = fixture();
    let product = seed_product(&f.products, None).await;

    let response = f
        .app
        .oneshot(post_review(
            product.id,
            None,
            json!({ "rating": 4, "guest_name": "Ann", "guest_email": "ann@example.com" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let body: serde_json::Value = json_body(response.into_body()).await;
    assert_eq!(body["origin"], "guest");
    assert_eq!(body["guest_email"], "ann@example.com");
    assert!(body.get("author_id").is_none());
}

#[tokio::test]
async fn test_garbage_token_returns_401_even_with_guest_fields() {
    let f = fixture();
    let product = seed_product(&f.products, None).await;

    let response = f
        .app
        .oneshot(post_review(
            product.id,
            Some("this.is.garbage"),
            json!({ "rating": 4, "guest_name": "Ann", "guest_email": "ann@example.com" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_anonymous_without_guest_identity_returns_400() {
    let f = fixture();
    let product = seed_product(&f.products, None).await;

    let response = f
        .app
        .oneshot(post_review(product.id, None, json!({ "rating": 4 })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_authenticated_with_guest_fields_returns_400() {
    let f = fixture();
    let product = seed_product(&f.products, None).await;

    let response = f
        .app
        .oneshot(post_review(
            product.id,
            Some(&token_for(Uuid::new_v4())),
            json!({ "rating": 4, "guest_name": "Ann", "guest_email": "ann@example.com" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_rating_out_of_range_returns_400() {
    let f = fixture();
    let product = seed_product(&f.products, None).await;

    let response = f
        .app
        .oneshot(post_review(
            product.id,
            Some(&token_for(Uuid::new_v4())),
            json!({ "rating": 6 }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_bad_image_url_returns_400() {
    let f = fixture();
    let product = seed_product(&f.products, None).await;

    let response = f
        .app
        .oneshot(post_review(
            product.id,
            Some(&token_for(Uuid::new_v4())),
            json!({ "image_url": "not-a-url" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_for_missing_product_returns_404() {
    let f = fixture();

    let response = f
        .app
        .oneshot(post_review(
            Uuid::new_v4(),
            Some(&token_for(Uuid::new_v4())),
            json!({ "rating": 4 }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_owner_review_returns_403() {
    let f = fixture();
    let owner = Uuid::new_v4();
    let product = seed_product(&f.products, Some(owner)).await;

    let response = f
        .app
        .oneshot(post_review(
            product.id,
            Some(&token_for(owner)),
            json!({ "rating": 5 }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_duplicate_review_returns_409() {
    let f = fixture();
    let product = seed_product(&f.products, None).await;
    let reviewer = Uuid::new_v4();

    let first = f
        .app
        .clone()
        .oneshot(post_review(
            product.id,
            Some(&token_for(reviewer)),
            json!({ "rating": 5 }),
        ))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = f
        .app
        .oneshot(post_review(
            product.id,
            Some(&token_for(reviewer)),
            json!({ "rating": 1 }),
        ))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_list_for_missing_product_returns_404() {
    let f = fixture();

    let response = f
        .app
        .oneshot(
            Request::builder()
                .uri(format!("/{}/reviews", Uuid::new_v4()))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_returns_reviews() {
    let f = fixture();
    let product = seed_product(&f.products, None).await;

    f.app
        .clone()
        .oneshot(post_review(
            product.id,
            None,
            json!({ "rating": 4, "guest_name": "Ann", "guest_email": "ann@example.com" }),
        ))
        .await
        .unwrap();

    let response = f
        .app
        .oneshot(
            Request::builder()
                .uri(format!("/{}/reviews", product.id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let reviews: Vec<Review> = json_body(response.into_body()).await;
    assert_eq!(reviews.len(), 1);
}

#[tokio::test]
async fn test_update_requires_auth() {
    let f = fixture();

    let response = f
        .app
        .oneshot(
            Request::builder()
                .method("PATCH")
                .uri(format!("/reviews/{}", Uuid::new_v4()))
                .header("content-type", "application/json")
                .body(Body::from(json!({ "rating": 3 }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_update_lifecycle() {
    let f = fixture();
    let product = seed_product(&f.products, None).await;
    let author = Uuid::new_v4();

    let created = f
        .app
        .clone()
        .oneshot(post_review(
            product.id,
            Some(&token_for(author)),
            json!({ "rating": 5 }),
        ))
        .await
        .unwrap();
    let review: Review = json_body(created.into_body()).await;

    // Empty patch is rejected
    let empty = f
        .app
        .clone()
        .oneshot(
            Request::builder()
                .method("PATCH")
                .uri(format!("/reviews/{}", review.id))
                .header("content-type", "application/json")
                .header("authorization", format!("Bearer {}", token_for(author)))
                .body(Body::from(json!({}).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(empty.status(), StatusCode::BAD_REQUEST);

    // Another user cannot update
    let stranger = f
        .app
        .clone()
        .oneshot(
            Request::builder()
                .method("PATCH")
                .uri(format!("/reviews/{}", review.id))
                .header("content-type", "application/json")
                .header(
                    "authorization",
                    format!("Bearer {}", token_for(Uuid::new_v4())),
                )
                .body(Body::from(json!({ "rating": 1 }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(stranger.status(), StatusCode::FORBIDDEN);

    // The author can
    let updated = f
        .app
        .oneshot(
            Request::builder()
                .method("PATCH")
                .uri(format!("/reviews/{}", review.id))
                .header("content-type", "application/json")
                .header("authorization", format!("Bearer {}", token_for(author)))
                .body(Body::from(json!({ "rating": 2 }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(updated.status(), StatusCode::OK);
    let updated: Review = json_body(updated.into_body()).await;
    assert_eq!(updated.rating, Some(2));
}

#[tokio::test]
async fn test_delete_lifecycle() {
    let f = fixture();
    let product = seed_product(&f.products, None).await;
    let author = Uuid::new_v4();

    let created = f
        .app
        .clone()
        .oneshot(post_review(
            product.id,
            Some(&token_for(author)),
            json!({ "rating": 5 }),
        ))
        .await
        .unwrap();
    let review: Review = json_body(created.into_body()).await;

    let deleted = f
        .app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/reviews/{}", review.id))
                .header("authorization", format!("Bearer {}", token_for(author)))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(deleted.status(), StatusCode::OK);

    let again = f
        .app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/reviews/{}", review.id))
                .header("authorization", format!("Bearer {}", token_for(author)))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(again.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_review_id_returns_400() {
    let f = fixture();

    let response = f
        .app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/reviews/not-a-uuid")
                .header(
                    "authorization",
                    format!("Bearer {}", token_for(Uuid::new_v4())),
                )
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
