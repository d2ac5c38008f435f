//! Collection query over orders

use std::cmp::Ordering;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use thiserror::Error;

use super::entity::{Order, OrderStatus};

pub const MAX_PER_PAGE: u32 = 100;

/// A collection parameter that cannot be honoured
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OrderQueryError {
    #[error("{param} must be between {min} (inclusive) and {max} (inclusive)")]
    OutOfRange {
        param: &'static str,
        min: u32,
        max: u32,
    },

    #[error("{param} is not of type {expected}.")]
    InvalidType {
        param: &'static str,
        expected: &'static str,
    },

    #[error("{param} is not one of {allowed}.")]
    NotOneOf {
        param: &'static str,
        allowed: &'static str,
    },

    #[error("Invalid date.")]
    InvalidDate { param: &'static str },
}

impl OrderQueryError {
    /// Name of the offending parameter
    pub fn param(&self) -> &'static str {
        match self {
            Self::OutOfRange { param, .. }
            | Self::InvalidType { param, .. }
            | Self::NotOneOf { param, .. }
            | Self::InvalidDate { param } => param,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl FromStr for SortOrder {
    type Err = OrderQueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(OrderQueryError::NotOneOf {
                param: "order",
                allowed: "asc, desc",
            }),
        }
    }
}

/// Attribute a collection is sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderBy {
    #[default]
    Date,
    Id,
    /// Position in the `include` list
    Include,
    /// Order number
    Title,
    /// Order key
    Slug,
}

impl FromStr for OrderBy {
    type Err = OrderQueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "date" => Ok(Self::Date),
            "id" => Ok(Self::Id),
            "include" => Ok(Self::Include),
            "title" => Ok(Self::Title),
            "slug" => Ok(Self::Slug),
            _ => Err(OrderQueryError::NotOneOf {
                param: "orderby",
                allowed: "date, id, include, title, slug",
            }),
        }
    }
}

/// Filters, sorting and paging for an order listing
#[derive(Debug, Clone, PartialEq)]
pub struct OrderQuery {
    /// 1-based page number
    pub page: u32,
    pub per_page: u32,
    /// Explicit start offset; takes precedence over `page`
    pub offset: Option<u32>,
    pub order: SortOrder,
    pub orderby: OrderBy,
    pub include: Vec<u64>,
    pub exclude: Vec<u64>,
    pub search: Option<String>,
    /// Only orders created strictly after this instant
    pub after: Option<DateTime<Utc>>,
    /// Only orders created strictly before this instant
    pub before: Option<DateTime<Utc>>,
    /// `None` means any status
    pub status: Option<OrderStatus>,
    pub customer: Option<u64>,
    pub product: Option<u64>,
}

impl Default for OrderQuery {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 10,
            offset: None,
            order: SortOrder::default(),
            orderby: OrderBy::default(),
            include: Vec::new(),
            exclude: Vec::new(),
            search: None,
            after: None,
            before: None,
            status: None,
            customer: None,
            product: None,
        }
    }
}

impl OrderQuery {
    /// Check paging bounds
    pub fn validate(&self) -> Result<(), OrderQueryError> {
        if self.page == 0 {
            return Err(OrderQueryError::OutOfRange {
                param: "page",
                min: 1,
                max: u32::MAX,
            });
        }

        if self.per_page == 0 || self.per_page > MAX_PER_PAGE {
            return Err(OrderQueryError::OutOfRange {
                param: "per_page",
                min: 1,
                max: MAX_PER_PAGE,
            });
        }

        Ok(())
    }

    /// Whether an order passes every filter of this query
    pub fn matches(&self, order: &Order) -> bool {
        let id = order.id().value();

        if !self.include.is_empty() && !self.include.contains(&id) {
            return false;
        }

        if self.exclude.contains(&id) {
            return false;
        }

        if let Some(status) = self.status {
            if order.status() != status {
                return false;
            }
        }

        if let Some(customer) = self.customer {
            if order.customer_id() != customer {
                return false;
            }
        }

        if let Some(product) = self.product {
            if !order.has_product(product) {
                return false;
            }
        }

        if let Some(after) = self.after {
            if order.date_created() <= after {
                return false;
            }
        }

        if let Some(before) = self.before {
            if order.date_created() >= before {
                return false;
            }
        }

        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            let needle = search.to_lowercase();
            let hit = order.number().to_lowercase().contains(&needle)
                || order.order_key().to_lowercase().contains(&needle);

            if !hit {
                return false;
            }
        }

        true
    }

    /// Ordering of two matching orders under this query's sort
    pub fn compare(&self, a: &Order, b: &Order) -> Ordering {
        let ordering = match self.orderby {
            OrderBy::Date => a
                .date_created()
                .cmp(&b.date_created())
                .then_with(|| a.id().cmp(&b.id())),
            OrderBy::Id => a.id().cmp(&b.id()),
            OrderBy::Include => self
                .include_position(a)
                .cmp(&self.include_position(b))
                .then_with(|| a.id().cmp(&b.id())),
            OrderBy::Title => a
                .number()
                .cmp(b.number())
                .then_with(|| a.id().cmp(&b.id())),
            OrderBy::Slug => a
                .order_key()
                .cmp(b.order_key())
                .then_with(|| a.id().cmp(&b.id())),
        };

        match self.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }

    /// Index of the first result on the requested page
    pub fn start(&self) -> usize {
        match self.offset {
            Some(offset) => offset as usize,
            None => (self.page.saturating_sub(1) as usize) * self.per_page as usize,
        }
    }

    /// Filter, sort and slice a set of orders
    pub fn apply<'a, I>(&self, orders: I) -> OrderPage
    where
        I: IntoIterator<Item = &'a Order>,
    {
        let mut matching: Vec<&Order> = orders.into_iter().filter(|o| self.matches(o)).collect();
        matching.sort_by(|a, b| self.compare(a, b));

        let total = matching.len();
        let orders = matching
            .into_iter()
            .skip(self.start())
            .take(self.per_page as usize)
            .cloned()
            .collect();

        OrderPage::new(orders, total, self.per_page)
    }

    fn include_position(&self, order: &Order) -> usize {
        self.include
            .iter()
            .position(|id| *id == order.id().value())
            .unwrap_or(usize::MAX)
    }
}

/// One page of a collection query
#[derive(Debug, Clone, PartialEq)]
pub struct OrderPage {
    pub orders: Vec<Order>,
    /// Number of orders matching the filters, across all pages
    pub total: usize,
    pub pages: usize,
}

impl OrderPage {
    pub fn new(orders: Vec<Order>, total: usize, per_page: u32) -> Self {
        let per_page = per_page.max(1) as usize;

        Self {
            orders,
            total,
            pages: total.div_ceil(per_page),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::OrderId;
    use chrono::{Duration, TimeZone};

    fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    fn order(id: u64, status: OrderStatus, day: i64) -> Order {
        Order::new(
            OrderId::new(id),
            format!("wc_order_{}", id),
            status,
            "USD",
            id as f64 * 10.0,
            base_time() + Duration::days(day),
        )
    }

    fn sample() -> Vec<Order> {
        vec![
            order(1, OrderStatus::Completed, 1).with_customer(5).with_products(vec![10]),
            order(2, OrderStatus::Processing, 2).with_customer(6),
            order(3, OrderStatus::Completed, 3).with_products(vec![10, 11]),
            order(4, OrderStatus::Pending, 4),
            order(5, OrderStatus::Completed, 5).with_customer(5),
        ]
    }

    fn ids(page: &OrderPage) -> Vec<u64> {
        page.orders.iter().map(|o| o.id().value()).collect()
    }

    #[test]
    fn test_default_sort_is_newest_first() {
        let orders = sample();
        let page = OrderQuery::default().apply(&orders);

        assert_eq!(ids(&page), vec![5, 4, 3, 2, 1]);
        assert_eq!(page.total, 5);
        assert_eq!(page.pages, 1);
    }

    #[test]
    fn test_paging() {
        let orders = sample();
        let query = OrderQuery {
            page: 2,
            per_page: 2,
            order: SortOrder::Asc,
            ..Default::default()
        };

        let page = query.apply(&orders);
        assert_eq!(ids(&page), vec![3, 4]);
        assert_eq!(page.total, 5);
        assert_eq!(page.pages, 3);
    }

    #[test]
    fn test_out_of_range_page_still_counts() {
        let orders = sample();
        let query = OrderQuery {
            page: 9,
            per_page: 2,
            ..Default::default()
        };

        let page = query.apply(&orders);
        assert!(page.orders.is_empty());
        assert_eq!(page.total, 5);
        assert_eq!(page.pages, 3);
    }

    #[test]
    fn test_offset_overrides_page() {
        let orders = sample();
        let query = OrderQuery {
            page: 3,
            per_page: 2,
            offset: Some(1),
            order: SortOrder::Asc,
            orderby: OrderBy::Id,
            ..Default::default()
        };

        assert_eq!(ids(&query.apply(&orders)), vec![2, 3]);
    }

    #[test]
    fn test_status_customer_and_product_filters() {
        let orders = sample();

        let completed = OrderQuery {
            status: Some(OrderStatus::Completed),
            ..Default::default()
        };
        assert_eq!(ids(&completed.apply(&orders)), vec![5, 3, 1]);

        let customer = OrderQuery {
            customer: Some(5),
            ..Default::default()
        };
        assert_eq!(ids(&customer.apply(&orders)), vec![5, 1]);

        let product = OrderQuery {
            product: Some(10),
            ..Default::default()
        };
        assert_eq!(ids(&product.apply(&orders)), vec![3, 1]);
    }

    #[test]
    fn test_include_exclude_and_include_ordering() {
        let orders = sample();
        let query = OrderQuery {
            include: vec![4, 1, 2],
            exclude: vec![2],
            orderby: OrderBy::Include,
            order: SortOrder::Asc,
            ..Default::default()
        };

        assert_eq!(ids(&query.apply(&orders)), vec![4, 1]);
    }

    #[test]
    fn test_date_bounds_are_exclusive() {
        let orders = sample();
        let query = OrderQuery {
            after: Some(base_time() + Duration::days(2)),
            before: Some(base_time() + Duration::days(5)),
            ..Default::default()
        };

        assert_eq!(ids(&query.apply(&orders)), vec![4, 3]);
    }

    #[test]
    fn test_search_number_and_key() {
        let orders = sample();
        let query = OrderQuery {
            search: Some("ORDER_3".to_string()),
            ..Default::default()
        };

        assert_eq!(ids(&query.apply(&orders)), vec![3]);
    }

    #[test]
    fn test_validate_bounds() {
        assert!(OrderQuery::default().validate().is_ok());

        let zero_page = OrderQuery {
            page: 0,
            ..Default::default()
        };
        assert_eq!(zero_page.validate().unwrap_err().param(), "page");

        let too_many = OrderQuery {
            per_page: 101,
            ..Default::default()
        };
        let err = too_many.validate().unwrap_err();
        assert_eq!(err.param(), "per_page");
        assert_eq!(
            err.to_string(),
            "per_page must be between 1 (inclusive) and 100 (inclusive)"
        );
    }

    #[test]
    fn test_sort_parsing() {
        assert_eq!("asc".parse::<SortOrder>(), Ok(SortOrder::Asc));
        assert_eq!("slug".parse::<OrderBy>(), Ok(OrderBy::Slug));
        assert_eq!("ASC".parse::<SortOrder>().unwrap_err().param(), "order");
        assert_eq!("total".parse::<OrderBy>().unwrap_err().param(), "orderby");
    }

    #[test]
    fn test_empty_result_has_zero_pages() {
        let page = OrderQuery::default().apply(&Vec::new());
        assert_eq!(page.total, 0);
        assert_eq!(page.pages, 0);
    }
}
