use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Purchase Order API",
        version = "0.1.0",
        description = "Records purchase orders for a small invoicing tool: \
customer and line-item payloads, monetary totals, lifecycle status and an \
optional due date. Error bodies use a consistent `{error, message, timestamp}` \
shape with 400 for validation failures, 404 for unknown ids and 409 for \
order-number conflicts."
    ),
    paths(
        crate::handlers::purchase_orders::create_purchase_order,
        crate::handlers::purchase_orders::list_purchase_orders,
        crate::handlers::purchase_orders::get_purchase_order,
        crate::handlers::purchase_orders::update_purchase_order,
        crate::handlers::purchase_orders::delete_purchase_order,
    ),
    components(schemas(
        crate::handlers::purchase_orders::CreatePurchaseOrderRequest,
        crate::handlers::purchase_orders::UpdatePurchaseOrderRequest,
        crate::services::purchase_orders::PurchaseOrderResponse,
        crate::errors::ErrorResponse,
    )),
    tags(
        (name = "purchase-orders", description = "Purchase order CRUD")
    )
)]
pub struct ApiDoc;

/// The rendered OpenAPI document, served at `/api-docs/openapi.json`.
pub fn openapi_json() -> serde_json::Value {
    serde_json::to_value(ApiDoc::openapi()).unwrap_or_else(|_| serde_json::json!({}))
}
