//! Application state management.
//!
//! Shared state passed to the route builders: configuration, the MongoDB
//! client/database, and the JWT signer/verifier.

use axum_helpers::JwtAuth;
use mongodb::{Client, Database};

/// Shared application state.
///
/// Cloned per handler; the MongoDB client and `JwtAuth` are cheap clones
/// over shared internals.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: crate::config::Config,
    /// MongoDB client (cloneable, shares underlying connection pool)
    pub mongo_client: Client,
    /// MongoDB database instance
    pub db: Database,
    /// Stateless JWT issuance and verification
    pub jwt: JwtAuth,
}
