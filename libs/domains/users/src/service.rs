use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum_helpers::JwtAuth;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::{LoginRequest, LoginResponse, RegisterRequest, User, UserResponse};
use crate::repository::UserRepository;

/// Service layer for User business logic
#[derive(Clone)]
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
    jwt: JwtAuth,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R, jwt: JwtAuth) -> Self {
        Self {
            repository: Arc::new(repository),
            jwt,
        }
    }

    /// Register a new user and issue their first access token
    pub async fn register(&self, input: RegisterRequest) -> UserResult<LoginResponse> {
        let email = input.email.trim().to_lowercase();
        let name = input.name.trim().to_string();

        if self.repository.get_by_email(&email).await?.is_some() {
            return Err(UserError::DuplicateEmail(email));
        }

        let password_hash = self.hash_password(&input.password)?;
        let user = User::new(email, name, password_hash);

        let created = self.repository.insert(user).await?;

        let token = self
            .jwt
            .create_access_token(&created.id.to_string(), &created.email, &created.name)
            .map_err(|e| UserError::Token(e.to_string()))?;

        Ok(LoginResponse::new(token, created))
    }

    /// Verify credentials and issue an access token
    pub async fn login(&self, input: LoginRequest) -> UserResult<LoginResponse> {
        let email = input.email.trim().to_lowercase();

        let user = self
            .repository
            .get_by_email(&email)
            .await?
            .ok_or(UserError::InvalidCredentials)?;

        if !self.verify_password(&input.password, &user.password_hash)? {
            return Err(UserError::InvalidCredentials);
        }

        let token = self
            .jwt
            .create_access_token(&user.id.to_string(), &user.email, &user.name)
            .map_err(|e| UserError::Token(e.to_string()))?;

        tracing::info!(user_id = %user.id, "User logged in");
        Ok(LoginResponse::new(token, user))
    }

    /// Get a user by ID
    pub async fn get_user(&self, id: Uuid) -> UserResult<UserResponse> {
        let user = self
            .repository
            .get_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id))?;

        Ok(user.into())
    }

    fn hash_password(&self, password: &str) -> UserResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| UserError::PasswordHash(e.to_string()))
    }

    fn verify_password(&self, password: &str, hash: &str) -> UserResult<bool> {
        let parsed_hash =
            PasswordHash::new(hash).map_err(|e| UserError::PasswordHash(e.to_string()))?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryUserRepository;
    use axum_helpers::JwtConfig;

    fn service() -> UserService<InMemoryUserRepository> {
        let jwt = JwtAuth::new(&JwtConfig::new("test-secret-that-is-long-enough-123456"));
        UserService::new(InMemoryUserRepository::new(), jwt)
    }

    fn register_request(email: &str) -> RegisterRequest {
        RegisterRequest {
            email: email.to_string(),
            name: "Alice".to_string(),
            password: "correct horse battery".to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_normalizes_email_and_issues_token() {
        let svc = service();
        let resp = svc
            .register(register_request("  Alice@Example.COM "))
            .await
            .unwrap();
        assert_eq!(resp.user.email, "alice@example.com");
        assert!(!resp.access_token.is_empty());
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let svc = service();
        svc.register(register_request("a@example.com")).await.unwrap();

        let err = svc
            .register(register_request("A@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, UserError::DuplicateEmail(_)));
    }

    #[tokio::test]
    async fn test_login_roundtrip() {
        let svc = service();
        let registered = svc.register(register_request("a@example.com")).await.unwrap();

        let resp = svc
            .login(LoginRequest {
                email: "a@example.com".to_string(),
                password: "correct horse battery".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(resp.token_type, "Bearer");
        assert_eq!(resp.user.id, registered.user.id);
        assert!(!resp.access_token.is_empty());
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let svc = service();
        svc.register(register_request("a@example.com")).await.unwrap();

        let err = svc
            .login(LoginRequest {
                email: "a@example.com".to_string(),
                password: "wrong".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, UserError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_login_unknown_email() {
        let err = service()
            .login(LoginRequest {
                email: "ghost@example.com".to_string(),
                password: "whatever".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, UserError::InvalidCredentials));
    }
}
