use crate::handlers::common::{
    created_response, map_service_error, no_content_response, success_response,
};
use crate::{
    errors::{ApiError, ErrorResponse},
    services::purchase_orders::{
        CreatePurchaseOrderInput, PurchaseOrderResponse, UpdatePurchaseOrderInput,
    },
    AppState,
};
use axum::{
    extract::{Json, Path, State},
    routing::get,
    Router,
};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

/// Creates the router for purchase-order endpoints
pub fn purchase_orders_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_purchase_orders).post(create_purchase_order))
        .route(
            "/:id",
            get(get_purchase_order)
                .put(update_purchase_order)
                .delete(delete_purchase_order),
        )
}

/// Create a purchase order
#[utoipa::path(
    post,
    path = "/purchase-orders",
    request_body = CreatePurchaseOrderRequest,
    responses(
        (status = 201, description = "Purchase order created", body = PurchaseOrderResponse),
        (status = 400, description = "Missing or malformed field", body = ErrorResponse),
        (status = 409, description = "Order number already exists", body = ErrorResponse),
    )
)]
pub async fn create_purchase_order(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreatePurchaseOrderRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let input = CreatePurchaseOrderInput {
        customer: payload.customer,
        line_items: payload.line_items,
        subtotal: payload.subtotal,
        tax_rate: payload.tax_rate,
        tax_amount: payload.tax_amount,
        total: payload.total,
        order_number: payload.order_number,
        notes: payload.notes,
        status: payload.status,
        due_date: payload.due_date,
    };

    let order = state
        .services
        .purchase_orders
        .create(input)
        .await
        .map_err(map_service_error)?;

    Ok(created_response(PurchaseOrderResponse::from(order)))
}

/// List all purchase orders
#[utoipa::path(
    get,
    path = "/purchase-orders",
    responses(
        (status = 200, description = "All purchase orders", body = [PurchaseOrderResponse]),
    )
)]
pub async fn list_purchase_orders(
    State(state): State<Arc<AppState>>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let orders = state
        .services
        .purchase_orders
        .list()
        .await
        .map_err(map_service_error)?;

    let body: Vec<PurchaseOrderResponse> = orders
        .into_iter()
        .map(PurchaseOrderResponse::from)
        .collect();
    Ok(success_response(body))
}

/// Fetch one purchase order
#[utoipa::path(
    get,
    path = "/purchase-orders/{id}",
    params(("id" = String, Path, description = "Purchase order id")),
    responses(
        (status = 200, description = "The purchase order", body = PurchaseOrderResponse),
        (status = 404, description = "Unknown id", body = ErrorResponse),
    )
)]
pub async fn get_purchase_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let id = parse_order_id(&id)?;

    let order = state
        .services
        .purchase_orders
        .get_by_id(id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(PurchaseOrderResponse::from(order)))
}

/// Partially update a purchase order
#[utoipa::path(
    put,
    path = "/purchase-orders/{id}",
    params(("id" = String, Path, description = "Purchase order id")),
    request_body = UpdatePurchaseOrderRequest,
    responses(
        (status = 200, description = "Updated purchase order", body = PurchaseOrderResponse),
        (status = 400, description = "Malformed field", body = ErrorResponse),
        (status = 404, description = "Unknown id", body = ErrorResponse),
    )
)]
pub async fn update_purchase_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<UpdatePurchaseOrderRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let id = parse_order_id(&id)?;

    let input = UpdatePurchaseOrderInput {
        customer: payload.customer,
        line_items: payload.line_items,
        subtotal: payload.subtotal,
        tax_rate: payload.tax_rate,
        tax_amount: payload.tax_amount,
        total: payload.total,
        notes: payload.notes,
        status: payload.status,
        due_date: payload.due_date,
    };

    let order = state
        .services
        .purchase_orders
        .update(id, input)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(PurchaseOrderResponse::from(order)))
}

/// Delete a purchase order
#[utoipa::path(
    delete,
    path = "/purchase-orders/{id}",
    params(("id" = String, Path, description = "Purchase order id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Unknown id", body = ErrorResponse),
    )
)]
pub async fn delete_purchase_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let id = parse_order_id(&id)?;

    state
        .services
        .purchase_orders
        .delete(id)
        .await
        .map_err(map_service_error)?;

    Ok(no_content_response())
}

/// Ids are opaque UUIDs; anything that does not parse cannot match a record,
/// so it is reported as not-found rather than a validation failure.
fn parse_order_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::NotFound(format!("Purchase order {raw} not found")))
}

// Request DTOs

/// Creation payload. Required keys stay `Option` so the service can name the
/// missing one; numeric fields arrive as raw JSON to allow number-or-string
/// coercion.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePurchaseOrderRequest {
    #[schema(value_type = Option<Object>)]
    pub customer: Option<Value>,
    #[schema(value_type = Option<Object>)]
    pub line_items: Option<Value>,
    #[schema(value_type = Option<Object>)]
    pub subtotal: Option<Value>,
    #[schema(value_type = Option<Object>)]
    pub tax_rate: Option<Value>,
    #[schema(value_type = Option<Object>)]
    pub tax_amount: Option<Value>,
    #[schema(value_type = Option<Object>)]
    pub total: Option<Value>,
    pub order_number: Option<String>,
    pub notes: Option<String>,
    pub status: Option<String>,
    pub due_date: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePurchaseOrderRequest {
    #[schema(value_type = Option<Object>)]
    pub customer: Option<Value>,
    #[schema(value_type = Option<Object>)]
    pub line_items: Option<Value>,
    #[schema(value_type = Option<Object>)]
    pub subtotal: Option<Value>,
    #[schema(value_type = Option<Object>)]
    pub tax_rate: Option<Value>,
    #[schema(value_type = Option<Object>)]
    pub tax_amount: Option<Value>,
    #[schema(value_type = Option<Object>)]
    pub total: Option<Value>,
    #[serde(default, deserialize_with = "deserialize_present")]
    #[schema(value_type = Option<Object>)]
    pub notes: Option<Value>,
    pub status: Option<String>,
    #[serde(default, deserialize_with = "deserialize_present")]
    #[schema(value_type = Option<Object>)]
    pub due_date: Option<Value>,
}

/// Keeps an explicit JSON `null` distinguishable from an absent key: a
/// present value (including `null`) becomes `Some`, an absent key falls back
/// to `None` through `#[serde(default)]`. Plain `Option<Value>` folds both
/// into `None`, which would make null-sensitive fields impossible to clear.
fn deserialize_present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}
