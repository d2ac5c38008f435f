//! Order infrastructure module

mod repository;
mod service;

pub use repository::InMemoryOrderRepository;
pub use service::OrderService;
