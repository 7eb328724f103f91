//! Review (testimonial) models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const DEFAULT_REVIEW_ROLE: &str = "Client";

/// A submitted testimonial
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: Uuid,
    pub name: String,
    /// Free-form label shown under the name
    pub role: String,
    pub rating: i16,
    pub message: String,
    pub is_approved: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /reviews`
#[derive(Debug, Deserialize)]
pub struct ReviewSubmission {
    #[serde(default)]
    pub name: String,
    pub role: Option<String>,
    pub rating: Option<i64>,
    #[serde(default)]
    pub message: String,
}

/// Validated review. Always stored unapproved.
#[derive(Debug, Clone)]
pub struct NewReview {
    pub name: String,
    pub role: String,
    pub rating: i16,
    pub message: String,
}

impl ReviewSubmission {
    pub fn validate(self) -> Result<NewReview, String> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err("Name is required".to_string());
        }

        let message = self.message.trim().to_string();
        if message.is_empty() {
            return Err("Message is required".to_string());
        }

        let rating = match self.rating {
            Some(rating @ 1..=5) => rating as i16,
            Some(_) => return Err("Rating must be between 1 and 5".to_string()),
            None => return Err("Rating is required".to_string()),
        };

        let role = self
            .role
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| DEFAULT_REVIEW_ROLE.to_string());

        Ok(NewReview {
            name,
            role,
            rating,
            message,
        })
    }
}

/// Body of `PUT /reviews/:id`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewApproval {
    pub is_approved: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(rating: Option<i64>, role: Option<&str>) -> ReviewSubmission {
        ReviewSubmission {
            name: "Priya".to_string(),
            role: role.map(str::to_string),
            rating,
            message: "Great service".to_string(),
        }
    }

    #[test]
    fn role_defaults_to_client() {
        let review = submission(Some(5), None).validate().unwrap();
        assert_eq!(review.role, "Client");

        let review = submission(Some(4), Some("  ")).validate().unwrap();
        assert_eq!(review.role, "Client");

        let review = submission(Some(4), Some("Founder")).validate().unwrap();
        assert_eq!(review.role, "Founder");
    }

    #[test]
    fn rating_must_be_one_to_five() {
        assert!(submission(Some(0), None).validate().is_err());
        assert!(submission(Some(6), None).validate().is_err());
        assert!(submission(None, None).validate().is_err());
        assert_eq!(submission(Some(1), None).validate().unwrap().rating, 1);
    }
}
