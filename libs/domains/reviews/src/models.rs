use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Review images must be plain http(s) URLs without whitespace
static IMAGE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://\S+$").unwrap_or_else(|e| panic!("invalid image url pattern: {e}"))
});

/// Custom validator for review image URLs
fn validate_image_url(url: &str) -> Result<(), validator::ValidationError> {
    if !IMAGE_URL.is_match(url) {
        return Err(validator::ValidationError::new("invalid_image_url"));
    }
    Ok(())
}

/// The identity behind a review: a registered user or a guest.
///
/// Serialized with an `origin` tag (`user` | `guest`) and flattened into the
/// review document, so the tag is always derived from the populated fields
/// and can never disagree with them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "origin", rename_all = "snake_case")]
pub enum ReviewAuthor {
    /// Review left by a registered user
    User { author_id: Uuid },
    /// Review left by a guest identified by name and email
    Guest {
        guest_name: String,
        guest_email: String,
    },
}

impl ReviewAuthor {
    /// The registered author's id, if this is a user review.
    pub fn author_id(&self) -> Option<Uuid> {
        match self {
            ReviewAuthor::User { author_id } => Some(*author_id),
            ReviewAuthor::Guest { .. } => None,
        }
    }

    /// The guest email, if this is a guest review.
    pub fn guest_email(&self) -> Option<&str> {
        match self {
            ReviewAuthor::User { .. } => None,
            ReviewAuthor::Guest { guest_email, .. } => Some(guest_email),
        }
    }
}

/// Review entity - represents a review stored in MongoDB
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Review {
    /// Unique identifier (stored as _id in MongoDB)
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    /// The reviewed product
    pub product_id: Uuid,
    /// Star rating in [1, 5]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<i32>,
    /// Free-text comment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Attached image URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Who wrote the review (flattened: `origin` + identity fields)
    #[serde(flatten)]
    pub author: ReviewAuthor,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Review {
    pub fn new(product_id: Uuid, author: ReviewAuthor, input: &CreateReview) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            product_id,
            rating: input.rating,
            comment: normalize(input.comment.as_deref()),
            image_url: normalize(input.image_url.as_deref()),
            author,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the review carries any content at all.
    pub fn has_content(&self) -> bool {
        self.rating.is_some() || self.comment.is_some() || self.image_url.is_some()
    }

    /// Apply a partial update, bumping `updated_at`.
    pub fn apply_update(&mut self, input: UpdateReview) {
        if let Some(rating) = input.rating {
            self.rating = Some(rating);
        }
        if let Some(comment) = input.comment {
            self.comment = normalize(Some(&comment));
        }
        if let Some(image_url) = input.image_url {
            self.image_url = normalize(Some(&image_url));
        }
        self.updated_at = Utc::now();
    }
}

fn normalize(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Explicit origin claim a create payload may carry. When present it must
/// match the identity resolved from the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum OriginClaim {
    User,
    Guest,
}

/// DTO for creating a review
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct CreateReview {
    #[validate(range(min = 1, max = 5))]
    pub rating: Option<i32>,
    #[validate(length(max = 2000))]
    pub comment: Option<String>,
    #[validate(custom(function = "validate_image_url"))]
    pub image_url: Option<String>,
    /// Guest identity, for anonymous reviewers
    #[validate(length(max = 100))]
    pub guest_name: Option<String>,
    #[validate(email)]
    pub guest_email: Option<String>,
    /// Optional explicit origin claim
    pub origin: Option<OriginClaim>,
}

impl CreateReview {
    /// Whether the payload carries a usable (non-blank) guest identity.
    pub fn guest_identity(&self) -> Option<(String, String)> {
        let name = self.guest_name.as_deref().map(str::trim)?;
        let email = self.guest_email.as_deref().map(str::trim)?;
        if name.is_empty() || email.is_empty() {
            return None;
        }
        Some((name.to_string(), email.to_lowercase()))
    }

    /// Whether any guest field was supplied at all, even blank.
    pub fn has_guest_fields(&self) -> bool {
        self.guest_name.is_some() || self.guest_email.is_some()
    }
}

/// DTO for updating a review (all fields optional)
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateReview {
    #[validate(range(min = 1, max = 5))]
    pub rating: Option<i32>,
    #[validate(length(max = 2000))]
    pub comment: Option<String>,
    #[validate(custom(function = "validate_image_url"))]
    pub image_url: Option<String>,
}

impl UpdateReview {
    pub fn is_empty(&self) -> bool {
        self.rating.is_none() && self.comment.is_none() && self.image_url.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_url_pattern() {
        assert!(validate_image_url("https://cdn.example.com/a.jpg").is_ok());
        assert!(validate_image_url("http://example.com/a").is_ok());
        assert!(validate_image_url("ftp://example.com/a").is_err());
        assert!(validate_image_url("https://exa mple.com/a").is_err());
        assert!(validate_image_url("example.com/a").is_err());
    }

    #[test]
    fn test_origin_tag_roundtrip() {
        let user = ReviewAuthor::User {
            author_id: Uuid::new_v4(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["origin"], "user");

        let guest = ReviewAuthor::Guest {
            guest_name: "Ann".to_string(),
            guest_email: "ann@example.com".to_string(),
        };
        let json = serde_json::to_value(&guest).unwrap();
        assert_eq!(json["origin"], "guest");
        assert_eq!(json["guest_email"], "ann@example.com");

        let back: ReviewAuthor = serde_json::from_value(json).unwrap();
        assert_eq!(back, guest);
    }

    #[test]
    fn test_guest_identity_requires_non_blank_fields() {
        let input = CreateReview {
            guest_name: Some("  ".to_string()),
            guest_email: Some("ann@example.com".to_string()),
            ..Default::default()
        };
        assert!(input.guest_identity().is_none());
        assert!(input.has_guest_fields());

        let input = CreateReview {
            guest_name: Some("Ann".to_string()),
            guest_email: Some("Ann@Example.com".to_string()),
            ..Default::default()
        };
        assert_eq!(
            input.guest_identity(),
            Some(("Ann".to_string(), "ann@example.com".to_string()))
        );
    }

    #[test]
    fn test_new_review_blank_comment_becomes_none() {
        let input = CreateReview {
            rating: Some(4),
            comment: Some("   ".to_string()),
            ..Default::default()
        };
        let review = Review::new(
            Uuid::new_v4(),
            ReviewAuthor::User {
                author_id: Uuid::new_v4(),
            },
            &input,
        );
        assert_eq!(review.comment, None);
        assert!(review.has_content());
    }
}
