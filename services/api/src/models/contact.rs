//! Contact form messages

use auth::validation::{normalize_email, validate_email};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub details: String,
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /contact`
#[derive(Debug, Deserialize)]
pub struct ContactSubmission {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub phone: Option<String>,
    #[serde(default)]
    pub details: String,
}

#[derive(Debug, Clone)]
pub struct NewContactMessage {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub details: String,
}

impl ContactSubmission {
    pub fn validate(self) -> Result<NewContactMessage, String> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err("Name is required".to_string());
        }

        let email = normalize_email(&self.email);
        validate_email(&email)?;

        let details = self.details.trim().to_string();
        if details.is_empty() {
            return Err("Message details are required".to_string());
        }

        Ok(NewContactMessage {
            name,
            email,
            phone: self
                .phone
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty()),
            details,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_and_validates() {
        let message = ContactSubmission {
            name: " Ravi ".to_string(),
            email: "Ravi@Example.COM".to_string(),
            phone: Some("".to_string()),
            details: "Need a website".to_string(),
        }
        .validate()
        .unwrap();

        assert_eq!(message.name, "Ravi");
        assert_eq!(message.email, "ravi@example.com");
        assert!(message.phone.is_none());
    }

    #[test]
    fn rejects_bad_email() {
        let result = ContactSubmission {
            name: "Ravi".to_string(),
            email: "not-an-email".to_string(),
            phone: None,
            details: "Hello".to_string(),
        }
        .validate();

        assert!(result.is_err());
    }
}
