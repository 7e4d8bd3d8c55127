use super::jwt::JwtAuth;
use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::errors::AppError;

/// Extract a bearer token from the Authorization header.
fn extract_token_from_request(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer ").map(|s| s.to_string()))
}

/// JWT authentication middleware.
///
/// Validates the bearer token and inserts [`super::JwtClaims`] into request
/// extensions on success; rejects with a structured 401 otherwise.
///
/// # Example
///
/// ```ignore
/// let protected = Router::new()
///     .route("/products", post(create_product))
///     .layer(axum::middleware::from_fn_with_state(auth.clone(), jwt_auth_middleware));
/// ```
pub async fn jwt_auth_middleware(
    State(auth): State<JwtAuth>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = match extract_token_from_request(&headers) {
        Some(t) => t,
        None => {
            tracing::debug!("No bearer token in Authorization header");
            return Err(
                AppError::Unauthorized("Authentication required".to_string()).into_response(),
            );
        }
    };

    let claims = match auth.verify_token(&token) {
        Ok(c) => c,
        Err(e) => {
            tracing::debug!("JWT verification failed: {}", e);
            return Err(
                AppError::Unauthorized("Invalid or expired token".to_string()).into_response(),
            );
        }
    };

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

/// Optional JWT authentication middleware.
///
/// Like [`jwt_auth_middleware`] but anonymous requests pass through without
/// claims. A token that is present but fails verification is still rejected
/// with 401. Used for endpoints that behave differently for authenticated vs
/// anonymous actors (e.g. guest reviews).
pub async fn optional_jwt_auth_middleware(
    State(auth): State<JwtAuth>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, Response> {
    if let Some(token) = extract_token_from_request(&headers) {
        match auth.verify_token(&token) {
            Ok(claims) => {
                request.extensions_mut().insert(claims);
            }
            Err(e) => {
                tracing::debug!("JWT verification failed: {}", e);
                return Err(
                    AppError::Unauthorized("Invalid or expired token".to_string()).into_response(),
                );
            }
        }
    }

    Ok(next.run(request).await)
}
