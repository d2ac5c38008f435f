//! Order representation returned by the API

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::order::Order;

const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Link {
    pub href: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderLinks {
    #[serde(rename = "self")]
    pub self_link: Vec<Link>,
    pub collection: Vec<Link>,
}

/// Field order follows the REST resource clients already parse
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderResponse {
    pub id: u64,
    pub number: String,
    pub order_key: String,
    pub created_via: String,
    pub status: String,
    pub currency: String,
    pub date_created: Option<String>,
    pub date_created_gmt: Option<String>,
    pub date_modified: Option<String>,
    pub date_modified_gmt: Option<String>,
    pub total: String,
    #[serde(rename = "_links")]
    pub links: OrderLinks,
}

/// How dates, amounts and links are rendered
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub site_offset: FixedOffset,
    pub dp: u32,
    /// Absolute URL of the collection, e.g. `https://shop.test/wp-json/uni-app/v1/orders`
    pub collection_url: String,
}

impl OrderResponse {
    pub fn from_order(order: &Order, options: &RenderOptions) -> Self {
        let (date_created, date_created_gmt) = format_dates(Some(order.date_created()), options);
        let (date_modified, date_modified_gmt) = format_dates(order.date_modified(), options);

        Self {
            id: order.id().value(),
            number: order.number().to_string(),
            order_key: order.order_key().to_string(),
            created_via: order.created_via().to_string(),
            status: order.status().to_string(),
            currency: order.currency().to_string(),
            date_created,
            date_created_gmt,
            date_modified,
            date_modified_gmt,
            total: format_decimal(order.total(), options.dp),
            links: OrderLinks {
                self_link: vec![Link {
                    href: format!("{}/{}", options.collection_url, order.id()),
                }],
                collection: vec![Link {
                    href: options.collection_url.clone(),
                }],
            },
        }
    }
}

/// Local and GMT renderings of an optional instant
fn format_dates(
    at: Option<DateTime<Utc>>,
    options: &RenderOptions,
) -> (Option<String>, Option<String>) {
    match at {
        Some(at) => (
            Some(at.with_timezone(&options.site_offset).format(DATE_FORMAT).to_string()),
            Some(at.format(DATE_FORMAT).to_string()),
        ),
        None => (None, None),
    }
}

fn format_decimal(amount: f64, dp: u32) -> String {
    format!("{:.*}", dp as usize, amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::{OrderId, OrderStatus};
    use chrono::TimeZone;

    fn options() -> RenderOptions {
        RenderOptions {
            site_offset: FixedOffset::west_opt(5 * 3600).unwrap(),
            dp: 2,
            collection_url: "https://shop.test/wp-json/uni-app/v1/orders".to_string(),
        }
    }

    fn order() -> Order {
        Order::new(
            OrderId::new(77),
            "wc_order_77",
            OrderStatus::OnHold,
            "USD",
            29.355,
            Utc.with_ymd_and_hms(2024, 4, 10, 3, 30, 0).unwrap(),
        )
    }

    #[test]
    fn test_fields() {
        let response = OrderResponse::from_order(&order(), &options());

        assert_eq!(response.id, 77);
        assert_eq!(response.status, "on-hold");
        assert_eq!(response.created_via, "checkout");
        assert_eq!(response.date_created.as_deref(), Some("2024-04-09T22:30:00"));
        assert_eq!(response.date_created_gmt.as_deref(), Some("2024-04-10T03:30:00"));
        assert!(response.date_modified.is_none());
        assert!(response.date_modified_gmt.is_none());
        assert_eq!(
            response.links.self_link[0].href,
            "https://shop.test/wp-json/uni-app/v1/orders/77"
        );
    }

    #[test]
    fn test_serialized_field_order_and_links() {
        let json = serde_json::to_string(&OrderResponse::from_order(&order(), &options())).unwrap();

        let keys = ["\"id\"", "\"number\"", "\"order_key\"", "\"status\"", "\"date_created_gmt\"", "\"total\"", "\"_links\""];
        let positions: Vec<usize> = keys.iter().map(|k| json.find(k).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(json.contains("\"self\":[{\"href\""));
        assert!(json.contains("\"date_modified\":null"));
    }

    #[test]
    fn test_decimal_places() {
        assert_eq!(format_decimal(10.0, 2), "10.00");
        assert_eq!(format_decimal(10.4, 0), "10");
        assert_eq!(format_decimal(3.14159, 3), "3.142");
    }
}
