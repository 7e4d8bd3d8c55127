//! Users Domain
//!
//! Registration, login, and current-user lookup with Argon2 password hashing
//! and stateless JWT issuance.
//!
//! # Architecture
//!
//! ```text
//! Handlers → Service → Repository (trait + implementations) → Models
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use axum_helpers::{JwtAuth, JwtConfig};
//! use domain_users::{handlers, InMemoryUserRepository, UserService};
//!
//! let jwt = JwtAuth::new(&JwtConfig::new("a-secret-that-is-at-least-32-chars!!"));
//! let repository = InMemoryUserRepository::new();
//! let service = UserService::new(repository, jwt.clone());
//!
//! let router = handlers::router(service, jwt);
//! ```

pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;

pub use error::{UserError, UserResult};
pub use handlers::ApiDoc;
pub use models::{LoginRequest, LoginResponse, RegisterRequest, User, UserResponse};
pub use mongodb::MongoUserRepository;
pub use repository::{InMemoryUserRepository, UserRepository};
pub use service::UserService;
