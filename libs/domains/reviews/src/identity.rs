//! Resolves who a review candidate belongs to.
//!
//! A review has exactly one identity source: the verified JWT claims of an
//! authenticated user, or the guest fields of the payload. Mixing the two,
//! or claiming an origin that contradicts the resolved one, is rejected
//! before anything touches the store.

use axum_helpers::JwtClaims;

use crate::error::{ReviewError, ReviewResult};
use crate::models::{CreateReview, OriginClaim, ReviewAuthor};

/// Resolve the review author from the (optional) authenticated claims and
/// the create payload.
pub fn resolve_author(
    claims: Option<&JwtClaims>,
    input: &CreateReview,
) -> ReviewResult<ReviewAuthor> {
    match claims {
        Some(claims) => {
            if input.has_guest_fields() {
                return Err(ReviewError::IdentityMismatch(
                    "authenticated request must not carry guest fields".to_string(),
                ));
            }
            if input.origin == Some(OriginClaim::Guest) {
                return Err(ReviewError::IdentityMismatch(
                    "authenticated request cannot claim guest origin".to_string(),
                ));
            }
            let author_id = claims
                .user_id()
                .map_err(|_| ReviewError::IdentityMismatch("malformed token subject".to_string()))?;
            Ok(ReviewAuthor::User { author_id })
        }
        None => {
            if input.origin == Some(OriginClaim::User) {
                return Err(ReviewError::IdentityMismatch(
                    "anonymous request cannot claim user origin".to_string(),
                ));
            }
            match input.guest_identity() {
                Some((guest_name, guest_email)) => Ok(ReviewAuthor::Guest {
                    guest_name,
                    guest_email,
                }),
                None => Err(ReviewError::MissingIdentity),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn claims_for(user_id: Uuid) -> JwtClaims {
        JwtClaims {
            sub: user_id.to_string(),
            email: "u@example.com".to_string(),
            name: "U".to_string(),
            exp: 0,
            iat: 0,
        }
    }

    fn guest_input(name: &str, email: &str) -> CreateReview {
        CreateReview {
            guest_name: Some(name.to_string()),
            guest_email: Some(email.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_authenticated_resolves_to_user() {
        let user_id = Uuid::new_v4();
        let author = resolve_author(Some(&claims_for(user_id)), &CreateReview::default()).unwrap();
        assert_eq!(author, ReviewAuthor::User { author_id: user_id });
    }

    #[test]
    fn test_authenticated_with_guest_fields_is_mismatch() {
        let err = resolve_author(
            Some(&claims_for(Uuid::new_v4())),
            &guest_input("Ann", "ann@example.com"),
        )
        .unwrap_err();
        assert!(matches!(err, ReviewError::IdentityMismatch(_)));
    }

    #[test]
    fn test_authenticated_claiming_guest_origin_is_mismatch() {
        let input = CreateReview {
            origin: Some(OriginClaim::Guest),
            ..Default::default()
        };
        let err = resolve_author(Some(&claims_for(Uuid::new_v4())), &input).unwrap_err();
        assert!(matches!(err, ReviewError::IdentityMismatch(_)));
    }

    #[test]
    fn test_authenticated_claiming_user_origin_is_fine() {
        let input = CreateReview {
            origin: Some(OriginClaim::User),
            ..Default::default()
        };
        assert!(resolve_author(Some(&claims_for(Uuid::new_v4())), &input).is_ok());
    }

    #[test]
    fn test_anonymous_guest_resolves_to_guest() {
        let author = resolve_author(None, &guest_input("Ann", "Ann@Example.com")).unwrap();
        assert_eq!(
            author,
            ReviewAuthor::Guest {
                guest_name: "Ann".to_string(),
                guest_email: "ann@example.com".to_string(),
            }
        );
    }

    #[test]
    fn test_anonymous_claiming_user_origin_is_mismatch() {
        let input = CreateReview {
            origin: Some(OriginClaim::User),
            guest_name: Some("Ann".to_string()),
            guest_email: Some("ann@example.com".to_string()),
            ..Default::default()
        };
        let err = resolve_author(None, &input).unwrap_err();
        assert!(matches!(err, ReviewError::IdentityMismatch(_)));
    }

    #[test]
    fn test_anonymous_without_identity_is_missing() {
        let err = resolve_author(None, &CreateReview::default()).unwrap_err();
        assert!(matches!(err, ReviewError::MissingIdentity));
    }

    #[test]
    fn test_anonymous_blank_guest_fields_is_missing() {
        let err = resolve_author(None, &guest_input("  ", "ann@example.com")).unwrap_err();
        assert!(matches!(err, ReviewError::MissingIdentity));
    }
}
