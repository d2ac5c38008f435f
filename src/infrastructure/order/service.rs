//! Order service for read access to stored orders

use std::sync::Arc;

use crate::domain::order::{Order, OrderId, OrderPage, OrderQuery, OrderRepository};
use crate::domain::DomainError;

#[derive(Debug)]
pub struct OrderService<R: OrderRepository> {
    repository: Arc<R>,
}

impl<R: OrderRepository> OrderService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Get a single order; id 0 never exists
    pub async fn get(&self, id: u64) -> Result<Option<Order>, DomainError> {
        if id == 0 {
            return Ok(None);
        }

        self.repository.get(OrderId::new(id)).await
    }

    /// Run a validated collection query
    pub async fn list(&self, query: &OrderQuery) -> Result<OrderPage, DomainError> {
        query
            .validate()
            .map_err(|e| DomainError::validation(e.to_string()))?;

        self.repository.query(query).await
    }

    pub async fn count(&self) -> Result<usize, DomainError> {
        self.repository.count().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::MockOrderRepository;

    #[tokio::test]
    async fn test_zero_id_skips_repository() {
        let mut repository = MockOrderRepository::new();
        repository.expect_get().never();

        let service = OrderService::new(Arc::new(repository));
        assert!(service.get(0).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_rejects_invalid_query() {
        let mut repository = MockOrderRepository::new();
        repository.expect_query().never();

        let service = OrderService::new(Arc::new(repository));
        let query = OrderQuery {
            per_page: 0,
            ..Default::default()
        };

        assert!(matches!(
            service.list(&query).await,
            Err(DomainError::Validation { .. })
        ));
    }

    #[tokio::test]
    async fn test_list_delegates() {
        let mut repository = MockOrderRepository::new();
        repository
            .expect_query()
            .times(1)
            .returning(|q| Ok(OrderPage::new(Vec::new(), 42, q.per_page)));

        let service = OrderService::new(Arc::new(repository));
        let page = service.list(&OrderQuery::default()).await.unwrap();

        assert_eq!(page.total, 42);
        assert_eq!(page.pages, 5);
    }
}
