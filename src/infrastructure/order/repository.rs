//! In-memory order repository implementation

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::order::{Order, OrderId, OrderPage, OrderQuery, OrderRepository};
use crate::domain::DomainError;

/// In-memory implementation of OrderRepository
#[derive(Debug, Default)]
pub struct InMemoryOrderRepository {
    orders: Arc<RwLock<BTreeMap<OrderId, Order>>>,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository with initial orders; a repeated id replaces the earlier entry
    pub fn with_orders(orders: Vec<Order>) -> Self {
        let orders = orders.into_iter().map(|o| (o.id(), o)).collect();

        Self {
            orders: Arc::new(RwLock::new(orders)),
        }
    }

    /// Load orders from a JSON array file
    pub async fn from_json_file(path: impl AsRef<Path>) -> Result<Self, DomainError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            DomainError::storage(format!("Failed to read orders file '{}': {}", path.display(), e))
        })?;

        let orders: Vec<Order> = serde_json::from_str(&content).map_err(|e| {
            DomainError::storage(format!("Failed to parse orders file '{}': {}", path.display(), e))
        })?;

        Ok(Self::with_orders(orders))
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn get(&self, id: OrderId) -> Result<Option<Order>, DomainError> {
        Ok(self.orders.read().await.get(&id).cloned())
    }

    async fn query(&self, query: &OrderQuery) -> Result<OrderPage, DomainError> {
        let orders = self.orders.read().await;
        Ok(query.apply(orders.values()))
    }

    async fn count(&self) -> Result<usize, DomainError> {
        Ok(self.orders.read().await.len())
    }
}
