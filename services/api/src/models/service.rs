//! Service catalog models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

pub const DEFAULT_ICON: &str = "Smartphone";
pub const DEFAULT_GRADIENT: &str = "from-blue-500/20 to-cyan-500/20";
pub const DEFAULT_BUTTON_TEXT: &str = "Buy Now";

/// A catalog entry
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    /// Opaque icon name resolved by the client
    pub icon: String,
    /// Opaque gradient classes resolved by the client
    pub gradient: String,
    pub sub_services: Vec<SubService>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Service {
    /// Find a package by its title
    pub fn package(&self, title: &str) -> Option<&SubService> {
        self.sub_services.iter().find(|sub| sub.title == title)
    }
}

/// A priced package under a service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubService {
    #[serde(default)]
    pub title: String,
    /// Numeric price kept as text; clients send either a string or a number
    #[serde(default, deserialize_with = "price_as_text")]
    pub price: String,
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    pub is_popular: bool,
    #[serde(default = "default_button_text")]
    pub button_text: String,
}

impl SubService {
    /// Parsed price, if it is a finite non-negative number
    pub fn unit_price(&self) -> Option<f64> {
        self.price
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|price| price.is_finite() && *price >= 0.0)
    }
}

fn default_button_text() -> String {
    DEFAULT_BUTTON_TEXT.to_string()
}

fn price_as_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Price {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Price::deserialize(deserializer)? {
        Price::Text(text) => text.trim().to_string(),
        Price::Number(number) => number.to_string(),
    })
}

/// Body of `POST /services` and `PUT /services/:id`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDefinition {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub icon: Option<String>,
    pub gradient: Option<String>,
    #[serde(default)]
    pub sub_services: Vec<SubService>,
}

/// Validated catalog entry
#[derive(Debug, Clone)]
pub struct NewService {
    pub title: String,
    pub description: String,
    pub icon: String,
    pub gradient: String,
    pub sub_services: Vec<SubService>,
}

impl ServiceDefinition {
    /// Check required fields and fill in defaults
    pub fn validate(self) -> Result<NewService, String> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err("Service title is required".to_string());
        }

        let description = self.description.trim().to_string();
        if description.is_empty() {
            return Err("Service description is required".to_string());
        }

        let mut sub_services = Vec::with_capacity(self.sub_services.len());
        for (index, mut sub) in self.sub_services.into_iter().enumerate() {
            sub.title = sub.title.trim().to_string();
            if sub.title.is_empty() {
                return Err(format!("Package {} needs a title", index + 1));
            }
            if sub.unit_price().is_none() {
                return Err(format!(
                    "Package '{}' needs a non-negative numeric price",
                    sub.title
                ));
            }
            if sub.button_text.trim().is_empty() {
                sub.button_text = default_button_text();
            }
            sub_services.push(sub);
        }

        Ok(NewService {
            title,
            description,
            icon: non_blank(self.icon).unwrap_or_else(|| DEFAULT_ICON.to_string()),
            gradient: non_blank(self.gradient).unwrap_or_else(|| DEFAULT_GRADIENT.to_string()),
            sub_services,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
