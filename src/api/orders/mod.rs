//! Orders endpoints
//!
//! Read-only access to shop orders for users whose role may manage the shop.

mod pagination;
mod params;
mod response;

pub use pagination::{pagination_headers, TOTAL_HEADER, TOTAL_PAGES_HEADER};
pub use params::{parse_list_params, Context, ListParams};
pub use response::{Link, OrderLinks, OrderResponse, RenderOptions};

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tracing::debug;

use crate::api::middleware::RequireUser;
use crate::api::state::{ApiSettings, AppState};
use crate::api::types::{error::CODE_PREFIX, ApiError, Json};
use crate::domain::user::User;

pub fn create_orders_router() -> Router<AppState> {
    Router::new()
        .route("/orders", get(list_orders))
        .route("/orders/{id}", get(get_order))
}

/// GET {ns}/orders
pub async fn list_orders(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Response, ApiError> {
    let settings = &state.settings;
    let params = parse_list_params(&pairs, settings.site.price_decimals, settings.site_offset())?;

    ensure_can_read(&user, "Sorry, you cannot list resources.")?;

    let page = state.order_service.list(&params.query).await?;
    debug!(user_id = %user.id(), total = page.total, returned = page.orders.len(), "Listed orders");

    let options = render_options(settings, params.dp);
    let body: Vec<OrderResponse> = page
        .orders
        .iter()
        .map(|order| OrderResponse::from_order(order, &options))
        .collect();

    let headers = pagination_headers(
        &options.collection_url,
        &pairs,
        params.query.page,
        page.total,
        page.pages,
    );

    Ok((headers, Json(body)).into_response())
}

/// GET {ns}/orders/{id}
pub async fn get_order(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<String>,
) -> Result<Json<OrderResponse>, ApiError> {
    // Ids are digits only; anything else is not a route of this API
    let id: u64 = id.parse().map_err(|_| ApiError::no_route())?;

    ensure_can_read(&user, "Sorry, you cannot view this resource.")?;

    let order = state
        .order_service
        .get(id)
        .await?
        .ok_or_else(invalid_id)?;

    let options = render_options(&state.settings, state.settings.site.price_decimals);

    Ok(Json(OrderResponse::from_order(&order, &options)))
}

fn ensure_can_read(user: &User, message: &str) -> Result<(), ApiError> {
    if user.role().can_read_orders() {
        return Ok(());
    }

    Err(ApiError::forbidden(message).with_code(format!("{}_rest_cannot_view", CODE_PREFIX)))
}

fn invalid_id() -> ApiError {
    ApiError::not_found("Invalid ID.").with_code(format!("{}_rest_shop_order_invalid_id", CODE_PREFIX))
}

fn render_options(settings: &ApiSettings, dp: u32) -> RenderOptions {
    RenderOptions {
        site_offset: settings.site_offset(),
        dp,
        collection_url: format!(
            "{}{}/orders",
            settings.site.url.trim_end_matches('/'),
            settings.base_path()
        ),
    }
}
