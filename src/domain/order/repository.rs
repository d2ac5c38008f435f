//! Order repository trait

use async_trait::async_trait;

use super::entity::{Order, OrderId};
use super::query::{OrderPage, OrderQuery};
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Read access to stored orders
#[cfg_attr(test, automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Get a single order
    async fn get(&self, id: OrderId) -> Result<Option<Order>, DomainError>;

    /// Run a collection query, returning one page plus totals
    async fn query(&self, query: &OrderQuery) -> Result<OrderPage, DomainError>;

    /// Count all stored orders
    async fn count(&self) -> Result<usize, DomainError>;
}
