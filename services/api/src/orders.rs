//! Order lifecycle
//!
//! Creation validates the payment proof and the submitted fields, prices
//! the order from the catalog, stores the proof, then inserts the order in
//! `Pending`. Status changes follow [`OrderStatus::can_transition_to`].

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    models::{NewOrder, Order, OrderStatus, OrderWithCustomer},
    repositories::{OrderStore, ServiceStore},
    uploads::{UploadStore, UploadedFile},
};

const MAX_QUANTITY: i32 = 1_000_000;

/// Text fields of an order submission, as received
#[derive(Debug, Clone, Default)]
pub struct OrderDraft {
    pub service_title: String,
    pub sub_service_title: String,
    pub amount: Option<String>,
    pub quantity: String,
    pub country: String,
    pub target_url: String,
    pub comments: Option<String>,
    pub utr_number: String,
}

impl OrderDraft {
    /// Record a multipart text field. Unknown names are ignored.
    pub fn set(&mut self, name: &str, value: String) {
        match name {
            "serviceTitle" => self.service_title = value,
            "subServiceTitle" => self.sub_service_title = value,
            "amount" => self.amount = Some(value),
            "quantity" => self.quantity = value,
            "country" => self.country = value,
            "targetUrl" => self.target_url = value,
            "comments" => self.comments = Some(value),
            "utrNumber" => self.utr_number = value,
            _ => {}
        }
    }
}

/// Draft with required fields checked, before pricing
#[derive(Debug)]
struct CheckedDraft {
    service_title: String,
    sub_service_title: String,
    quantity: i32,
    claimed_amount: Option<f64>,
    country: String,
    target_url: String,
    comments: Option<String>,
    utr_number: String,
}

fn required(value: &str, field: &str) -> ApiResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ApiError::Validation(format!("{} is required", field)));
    }
    Ok(value.to_string())
}

impl OrderDraft {
    fn check(&self) -> ApiResult<CheckedDraft> {
        let service_title = required(&self.service_title, "serviceTitle")?;
        let sub_service_title = required(&self.sub_service_title, "subServiceTitle")?;
        let country = required(&self.country, "country")?;
        let target_url = required(&self.target_url, "targetUrl")?;
        let utr_number = required(&self.utr_number, "utrNumber")?;

        let quantity = required(&self.quantity, "quantity")?
            .parse::<i32>()
            .ok()
            .filter(|q| (1..=MAX_QUANTITY).contains(q))
            .ok_or_else(|| {
                ApiError::Validation("quantity must be a positive integer".to_string())
            })?;

        let claimed_amount = match self.amount.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(
                raw.parse::<f64>()
                    .ok()
                    .filter(|a| a.is_finite())
                    .ok_or_else(|| ApiError::Validation("amount must be a number".to_string()))?,
            ),
        };

        Ok(CheckedDraft {
            service_title,
            sub_service_title,
            quantity,
            claimed_amount,
            country,
            target_url,
            comments: self
                .comments
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string),
            utr_number,
        })
    }
}

fn to_cents(value: f64) -> i64 {
    (value * 100.0).round() as i64
}

/// Coordinates order creation and status changes
#[derive(Clone)]
pub struct OrderManager {
    orders: Arc<dyn OrderStore>,
    catalog: Arc<dyn ServiceStore>,
    uploads: UploadStore,
}

impl OrderManager {
    pub fn new(
        orders: Arc<dyn OrderStore>,
        catalog: Arc<dyn ServiceStore>,
        uploads: UploadStore,
    ) -> Self {
        Self {
            orders,
            catalog,
            uploads,
        }
    }

    pub fn uploads(&self) -> &UploadStore {
        &self.uploads
    }

    /// Place an order for `customer_id`. Nothing is persisted on failure.
    pub async fn create_order(
        &self,
        customer_id: Uuid,
        draft: OrderDraft,
        proof: Option<UploadedFile>,
    ) -> ApiResult<Order> {
        self.uploads.check(proof.as_ref())?;
        let draft = draft.check()?;

        let service = self
            .catalog
            .find_by_title(&draft.service_title)
            .await?
            .ok_or_else(|| {
                ApiError::Validation(format!("Unknown service '{}'", draft.service_title))
            })?;
        let unit_price = service
            .package(&draft.sub_service_title)
            .and_then(|package| package.unit_price())
            .ok_or_else(|| {
                ApiError::Validation(format!(
                    "Unknown package '{}' for service '{}'",
                    draft.sub_service_title, draft.service_title
                ))
            })?;

        let amount = to_cents(unit_price * f64::from(draft.quantity)) as f64 / 100.0;
        if let Some(claimed) = draft.claimed_amount {
            if to_cents(claimed) != to_cents(amount) {
                warn!(
                    "Customer {} submitted amount {} but the catalog price is {}",
                    customer_id, claimed, amount
                );
                return Err(ApiError::Validation(format!(
                    "amount does not match the catalog price ({:.2})",
                    amount
                )));
            }
        }

        let payment_screenshot = self.uploads.store(proof.as_ref()).await?;

        let new_order = NewOrder {
            customer_id,
            service_title: draft.service_title,
            sub_service_title: draft.sub_service_title,
            unit_price,
            country: draft.country,
            target_url: draft.target_url,
            quantity: draft.quantity,
            amount,
            comments: draft.comments,
            utr_number: draft.utr_number,
            payment_screenshot: payment_screenshot.clone(),
        };

        match self.orders.insert(new_order).await {
            Ok(order) => {
                info!("Order {} placed by customer {}", order.id, customer_id);
                Ok(order)
            }
            Err(e) => {
                self.uploads.discard(&payment_screenshot).await;
                Err(e.into())
            }
        }
    }

    pub async fn list_orders_for(&self, customer_id: Uuid) -> ApiResult<Vec<Order>> {
        Ok(self.orders.list_for_customer(customer_id).await?)
    }

    pub async fn list_all_orders(&self) -> ApiResult<Vec<OrderWithCustomer>> {
        Ok(self.orders.list_all().await?)
    }

    /// Move an order to `next` if the transition table allows it
    pub async fn set_status(&self, order_id: Uuid, next: OrderStatus) -> ApiResult<Order> {
        let current = self
            .orders
            .find_by_id(order_id)
            .await?
            .ok_or(ApiError::NotFound("Order not found"))?;

        if !current.status.can_transition_to(next) {
            return Err(ApiError::IllegalTransition {
                from: current.status,
                to: next,
            });
        }

        match self
            .orders
            .update_status(order_id, current.status, next)
            .await?
        {
            Some(order) => {
                info!("Order {} moved from {} to {}", order_id, current.status, next);
                Ok(order)
            }
            // Another writer changed the status first
            None => {
                let latest = self
                    .orders
                    .find_by_id(order_id)
                    .await?
                    .ok_or(ApiError::NotFound("Order not found"))?;
                Err(ApiError::IllegalTransition {
                    from: latest.status,
                    to: next,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use auth::repositories::MemoryCustomerStore;
    use axum::body::Bytes;
    use tempfile::TempDir;

    use crate::{
        models::{ServiceDefinition, SubService},
        repositories::{MemoryOrderStore, MemoryServiceStore},
        uploads::DEFAULT_MAX_UPLOAD_BYTES,
    };

    struct Fixture {
        manager: OrderManager,
        orders: MemoryOrderStore,
        dir: TempDir,
    }

    async fn fixture() -> Fixture {
        let dir = TempDir::new().unwrap();
        let orders = MemoryOrderStore::new(Arc::new(MemoryCustomerStore::new()));
        let catalog = MemoryServiceStore::new();

        let definition = ServiceDefinition {
            title: "Instagram Growth".to_string(),
            description: "Followers".to_string(),
            icon: None,
            gradient: None,
            sub_services: vec![SubService {
                title: "Starter".to_string(),
                price: "100".to_string(),
                details: "1k followers".to_string(),
                is_popular: false,
                button_text: "Buy Now".to_string(),
            }],
        };
        catalog
            .create(definition.validate().unwrap())
            .await
            .unwrap();

        let manager = OrderManager::new(
            Arc::new(orders.clone()),
            Arc::new(catalog),
            UploadStore::new(dir.path().join("uploads"), DEFAULT_MAX_UPLOAD_BYTES),
        );

        Fixture {
            manager,
            orders,
            dir,
        }
    }

    fn draft(quantity: &str, amount: Option<&str>) -> OrderDraft {
        let mut draft = OrderDraft::default();
        draft.set("serviceTitle", "Instagram Growth".to_string());
        draft.set("subServiceTitle", "Starter".to_string());
        draft.set("quantity", quantity.to_string());
        draft.set("country", "India".to_string());
        draft.set("targetUrl", "https://instagram.com/alice".to_string());
        draft.set("utrNumber", "UTR123".to_string());
        if let Some(amount) = amount {
            draft.set("amount", amount.to_string());
        }
        draft
    }

    fn proof() -> Option<UploadedFile> {
        Some(UploadedFile {
            file_name: "proof.png".to_string(),
            content_type: Some("image/png".to_string()),
            bytes: Bytes::from_static(b"png"),
        })
    }

    fn stored_files(dir: &TempDir) -> usize {
        std::fs::read_dir(dir.path().join("uploads"))
            .map(|entries| entries.count())
            .unwrap_or(0)
    }

    #[tokio::test]
    async fn amount_is_priced_from_the_catalog() {
        let f = fixture().await;
        let customer = Uuid::new_v4();

        let order = f
            .manager
            .create_order(customer, draft("3", None), proof())
            .await
            .unwrap();

        assert_eq!(order.amount, 300.0);
        assert_eq!(order.unit_price, 100.0);
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.customer_id, customer);
        assert_eq!(stored_files(&f.dir), 1);
    }

    #[tokio::test]
    async fn matching_client_amount_is_accepted() {
        let f = fixture().await;
        let order = f
            .manager
            .create_order(Uuid::new_v4(), draft("2", Some("200.00")), proof())
            .await
            .unwrap();
        assert_eq!(order.amount, 200.0);
    }

    #[tokio::test]
    async fn mismatched_client_amount_is_rejected() {
        let f = fixture().await;
        let err = f
            .manager
            .create_order(Uuid::new_v4(), draft("3", Some("1")), proof())
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Validation(_)));
        assert_eq!(f.orders.len().await, 0);
        assert_eq!(stored_files(&f.dir), 0);
    }

    #[tokio::test]
    async fn missing_proof_persists_nothing() {
        let f = fixture().await;
        let err = f
            .manager
            .create_order(Uuid::new_v4(), draft("1", None), None)
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::MissingProof));
        assert_eq!(f.orders.len().await, 0);
    }

    #[tokio::test]
    async fn invalid_fields_are_rejected_before_storing() {
        let f = fixture().await;

        for quantity in ["0", "-2", "abc", ""] {
            let err = f
                .manager
                .create_order(Uuid::new_v4(), draft(quantity, None), proof())
                .await
                .unwrap_err();
            assert!(matches!(err, ApiError::Validation(_)), "quantity {:?}", quantity);
        }

        let mut unknown = draft("1", None);
        unknown.set("subServiceTitle", "Platinum".to_string());
        let err = f
            .manager
            .create_order(Uuid::new_v4(), unknown, proof())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));

        assert_eq!(f.orders.len().await, 0);
        assert_eq!(stored_files(&f.dir), 0);
    }

    #[tokio::test]
    async fn status_follows_the_transition_table() {
        let f = fixture().await;
        let order = f
            .manager
            .create_order(Uuid::new_v4(), draft("1", None), proof())
            .await
            .unwrap();

        let order = f
            .manager
            .set_status(order.id, OrderStatus::InProgress)
            .await
            .unwrap();
        assert_eq!(order.status, OrderStatus::InProgress);

        let err = f
            .manager
            .set_status(order.id, OrderStatus::Pending)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ApiError::IllegalTransition {
                from: OrderStatus::InProgress,
                to: OrderStatus::Pending
            }
        ));

        f.manager.set_status(order.id, OrderStatus::Done).await.unwrap();
        let err = f
            .manager
            .set_status(order.id, OrderStatus::Cancelled)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::IllegalTransition { .. }));
    }

    #[tokio::test]
    async fn unknown_order_is_not_found() {
        let f = fixture().await;
        let err = f
            .manager
            .set_status(Uuid::new_v4(), OrderStatus::Done)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }
}
