//! Order domain
//!
//! Read-only order summaries and the collection query used to page through them.

mod entity;
mod query;
mod repository;

pub use entity::{Order, OrderId, OrderStatus, OrderStatusError};
pub use query::{OrderBy, OrderPage, OrderQuery, OrderQueryError, SortOrder, MAX_PER_PAGE};
pub use repository::OrderRepository;

#[cfg(test)]
pub use repository::MockOrderRepository;
