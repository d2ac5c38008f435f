//! Order summary entity

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Order identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(u64);

impl OrderId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unknown order status: '{0}'")]
pub struct OrderStatusError(pub String);

/// Lifecycle status of an order
///
/// Parsing accepts the storage form with a `wc-` prefix; output never carries it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum OrderStatus {
    Pending,
    Processing,
    OnHold,
    Completed,
    Cancelled,
    Refunded,
    Failed,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 7] = [
        Self::Pending,
        Self::Processing,
        Self::OnHold,
        Self::Completed,
        Self::Cancelled,
        Self::Refunded,
        Self::Failed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::OnHold => "on-hold",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Refunded => "refunded",
            Self::Failed => "failed",
        }
    }
}

impl FromStr for OrderStatus {
    type Err = OrderStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bare = s.strip_prefix("wc-").unwrap_or(s);

        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == bare)
            .ok_or_else(|| OrderStatusError(s.to_string()))
    }
}

impl TryFrom<String> for OrderStatus {
    type Error = OrderStatusError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<OrderStatus> for String {
    fn from(status: OrderStatus) -> Self {
        status.as_str().to_string()
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_created_via() -> String {
    "checkout".to_string()
}

/// A stored order, as much of it as the API exposes or filters on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    number: String,
    order_key: String,
    #[serde(default = "default_created_via")]
    created_via: String,
    status: OrderStatus,
    currency: String,
    /// Owning customer; 0 for guest checkouts
    #[serde(default)]
    customer_id: u64,
    /// Products on the order's line items
    #[serde(default)]
    product_ids: Vec<u64>,
    date_created: DateTime<Utc>,
    #[serde(default)]
    date_modified: Option<DateTime<Utc>>,
    total: f64,
}

impl Order {
    pub fn new(
        id: OrderId,
        order_key: impl Into<String>,
        status: OrderStatus,
        currency: impl Into<String>,
        total: f64,
        date_created: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            number: id.to_string(),
            order_key: order_key.into(),
            created_via: default_created_via(),
            status,
            currency: currency.into(),
            customer_id: 0,
            product_ids: Vec::new(),
            date_created,
            date_modified: None,
            total,
        }
    }

    pub fn with_customer(mut self, customer_id: u64) -> Self {
        self.customer_id = customer_id;
        self
    }

    pub fn with_products(mut self, product_ids: Vec<u64>) -> Self {
        self.product_ids = product_ids;
        self
    }

    pub fn with_number(mut self, number: impl Into<String>) -> Self {
        self.number = number.into();
        self
    }

    pub fn with_date_modified(mut self, date_modified: DateTime<Utc>) -> Self {
        self.date_modified = Some(date_modified);
        self
    }

    pub fn id(&self) -> OrderId {
        self.id
    }

    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn order_key(&self) -> &str {
        &self.order_key
    }

    pub fn created_via(&self) -> &str {
        &self.created_via
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn customer_id(&self) -> u64 {
        self.customer_id
    }

    pub fn has_product(&self, product_id: u64) -> bool {
        self.product_ids.contains(&product_id)
    }

    pub fn date_created(&self) -> DateTime<Utc> {
        self.date_created
    }

    pub fn date_modified(&self) -> Option<DateTime<Utc>> {
        self.date_modified
    }

    pub fn total(&self) -> f64 {
        self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse_strips_prefix() {
        assert_eq!("wc-processing".parse::<OrderStatus>(), Ok(OrderStatus::Processing));
        assert_eq!("on-hold".parse::<OrderStatus>(), Ok(OrderStatus::OnHold));
        assert!("wc-shipped".parse::<OrderStatus>().is_err());
        assert!("any".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_status_serializes_without_prefix() {
        let json = serde_json::to_string(&OrderStatus::OnHold).unwrap();
        assert_eq!(json, "\"on-hold\"");

        let parsed: OrderStatus = serde_json::from_str("\"wc-completed\"").unwrap();
        assert_eq!(parsed, OrderStatus::Completed);
    }

    #[test]
    fn test_order_deserialize_defaults() {
        let order: Order = serde_json::from_str(
            r#"{
                "id": 101,
                "number": "101",
                "order_key": "wc_order_abc",
                "status": "wc-pending",
                "currency": "EUR",
                "date_created": "2024-01-05T10:00:00Z",
                "total": 19.5
            }"#,
        )
        .unwrap();

        assert_eq!(order.id().value(), 101);
        assert_eq!(order.created_via(), "checkout");
        assert_eq!(order.status(), OrderStatus::Pending);
        assert_eq!(order.customer_id(), 0);
        assert!(order.date_modified().is_none());
        assert!(!order.has_product(1));
    }

    #[test]
    fn test_builder_defaults_number_to_id() {
        let order = Order::new(
            OrderId::new(9),
            "wc_order_9",
            OrderStatus::Completed,
            "USD",
            10.0,
            Utc::now(),
        )
        .with_products(vec![3, 4]);

        assert_eq!(order.number(), "9");
        assert!(order.has_product(4));
    }
}
