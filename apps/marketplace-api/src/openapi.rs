//! OpenAPI documentation configuration

use utoipa::OpenApi;

/// Combined OpenAPI documentation for all APIs
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Marketplace API",
        version = "0.1.0",
        description = "REST API for a product marketplace with user and guest reviews",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    nest(
        (path = "/api/auth", api = domain_users::ApiDoc),
        (path = "/api/products", api = domain_products::ApiDoc),
        (path = "/api/products", api = domain_reviews::ProductReviewsApiDoc),
        (path = "/api/reviews", api = domain_reviews::ReviewsApiDoc)
    ),
    tags(
        (name = "Auth", description = "Registration and authentication"),
        (name = "Products", description = "Product catalog"),
        (name = "Reviews", description = "Product reviews from users and guests")
    )
)]
pub struct ApiDoc;
