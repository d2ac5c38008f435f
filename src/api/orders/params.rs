//! Query string parsing for the orders collection

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};

use crate::domain::order::{OrderQuery, OrderQueryError, OrderStatus};

/// Requested representation; both expose the same fields here
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Context {
    #[default]
    View,
    Edit,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListParams {
    pub query: OrderQuery,
    pub context: Context,
    /// Decimals used when rendering money amounts
    pub dp: u32,
}

const STATUS_VALUES: &str = "any, pending, processing, on-hold, completed, cancelled, refunded, failed";

/// Parse raw query pairs
///
/// Keys may carry a `[]` suffix and list parameters may repeat or be comma
/// separated. Unknown keys are ignored.
pub fn parse_list_params(
    pairs: &[(String, String)],
    default_dp: u32,
    site_offset: FixedOffset,
) -> Result<ListParams, OrderQueryError> {
    let mut params = ListParams {
        query: OrderQuery::default(),
        context: Context::default(),
        dp: default_dp,
    };

    for (key, value) in pairs {
        let key = key.strip_suffix("[]").unwrap_or(key);
        let query = &mut params.query;

        match key {
            "context" => params.context = parse_context(value)?,
            "page" => query.page = parse_int("page", value)?,
            "per_page" => query.per_page = parse_int("per_page", value)?,
            "offset" => query.offset = Some(parse_int("offset", value)?),
            "order" => query.order = value.parse()?,
            "orderby" => query.orderby = value.parse()?,
            "include" => query.include.extend(parse_id_list("include", value)?),
            "exclude" => query.exclude.extend(parse_id_list("exclude", value)?),
            "search" => query.search = Some(value.clone()).filter(|s| !s.is_empty()),
            "after" => query.after = Some(parse_date("after", value, site_offset)?),
            "before" => query.before = Some(parse_date("before", value, site_offset)?),
            "status" => query.status = parse_status(value)?,
            "customer" => query.customer = Some(parse_int("customer", value)?),
            "product" => query.product = Some(parse_int("product", value)?),
            "dp" => params.dp = parse_int("dp", value)?,
            _ => {}
        }
    }

    params.query.validate()?;

    Ok(params)
}

fn parse_context(value: &str) -> Result<Context, OrderQueryError> {
    match value {
        "view" => Ok(Context::View),
        "edit" => Ok(Context::Edit),
        _ => Err(OrderQueryError::NotOneOf {
            param: "context",
            allowed: "view, edit",
        }),
    }
}

fn parse_int<T: std::str::FromStr>(param: &'static str, value: &str) -> Result<T, OrderQueryError> {
    value
        .trim()
        .parse()
        .map_err(|_| OrderQueryError::InvalidType {
            param,
            expected: "integer",
        })
}

fn parse_id_list(param: &'static str, value: &str) -> Result<Vec<u64>, OrderQueryError> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse().map_err(|_| OrderQueryError::InvalidType {
                param,
                expected: "array",
            })
        })
        .collect()
}

fn parse_status(value: &str) -> Result<Option<OrderStatus>, OrderQueryError> {
    if value == "any" {
        return Ok(None);
    }

    value
        .parse()
        .map(Some)
        .map_err(|_| OrderQueryError::NotOneOf {
            param: "status",
            allowed: STATUS_VALUES,
        })
}

/// ISO 8601 date-time; without an offset it is read in the site timezone
fn parse_date(
    param: &'static str,
    value: &str,
    site_offset: FixedOffset,
) -> Result<DateTime<Utc>, OrderQueryError> {
    if let Ok(at) = DateTime::parse_from_rfc3339(value) {
        return Ok(at.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .and_then(|naive| site_offset.from_local_datetime(&naive).single())
        .map(|at| at.with_timezone(&Utc))
        .ok_or(OrderQueryError::InvalidDate { param })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::{OrderBy, SortOrder};

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    #[test]
    fn test_defaults() {
        let params = parse_list_params(&[], 2, utc()).unwrap();

        assert_eq!(params.query, OrderQuery::default());
        assert_eq!(params.context, Context::View);
        assert_eq!(params.dp, 2);
    }

    #[test]
    fn test_full_parse() {
        let params = parse_list_params(
            &pairs(&[
                ("context", "edit"),
                ("page", "2"),
                ("per_page", "25"),
                ("order", "asc"),
                ("orderby", "id"),
                ("include", "3, 4"),
                ("include[]", "5"),
                ("exclude[]", "9"),
                ("search", "wc_order"),
                ("status", "wc-completed"),
                ("customer", "12"),
                ("product", "40"),
                ("dp", "3"),
                ("_fields", "id"),
            ]),
            2,
            utc(),
        )
        .unwrap();

        let query = &params.query;
        assert_eq!(params.context, Context::Edit);
        assert_eq!(query.page, 2);
        assert_eq!(query.per_page, 25);
        assert_eq!(query.order, SortOrder::Asc);
        assert_eq!(query.orderby, OrderBy::Id);
        assert_eq!(query.include, vec![3, 4, 5]);
        assert_eq!(query.exclude, vec![9]);
        assert_eq!(query.search.as_deref(), Some("wc_order"));
        assert_eq!(query.status, Some(OrderStatus::Completed));
        assert_eq!(query.customer, Some(12));
        assert_eq!(query.product, Some(40));
        assert_eq!(params.dp, 3);
    }

    #[test]
    fn test_status_any() {
        let params = parse_list_params(&pairs(&[("status", "any")]), 2, utc()).unwrap();
        assert_eq!(params.query.status, None);
    }

    #[test]
    fn test_invalid_values() {
        let cases = [
            ("per_page", "0", "per_page"),
            ("per_page", "101", "per_page"),
            ("page", "0", "page"),
            ("page", "two", "page"),
            ("order", "up", "order"),
            ("orderby", "total", "orderby"),
            ("include", "1,x", "include"),
            ("status", "shipped", "status"),
            ("context", "embed", "context"),
            ("after", "yesterday", "after"),
        ];

        for (key, value, param) in cases {
            let err = parse_list_params(&pairs(&[(key, value)]), 2, utc()).unwrap_err();
            assert_eq!(err.param(), param, "{}={}", key, value);
        }
    }

    #[test]
    fn test_dates_with_and_without_offset() {
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        let params = parse_list_params(
            &pairs(&[
                ("after", "2024-03-01T10:00:00"),
                ("before", "2024-03-02T10:00:00+00:00"),
            ]),
            2,
            plus_two,
        )
        .unwrap();

        assert_eq!(
            params.query.after,
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap())
        );
        assert_eq!(
            params.query.before,
            Some(Utc.with_ymd_and_hms(2024, 3, 2, 10, 0, 0).unwrap())
        );
    }
}
