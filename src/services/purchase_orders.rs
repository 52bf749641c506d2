use crate::{
    dates,
    entities::purchase_order::{self, Entity as PurchaseOrder, DEFAULT_STATUS},
    errors::ServiceError,
    json_column, order_number,
};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, ModelTrait,
    QueryFilter, Set, SqlErr, TransactionTrait,
};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;

/// Entity layer for purchase orders.
///
/// Stateless; every operation runs against the injected connection, writes
/// inside a single transaction.
#[derive(Clone)]
pub struct PurchaseOrderService {
    db: Arc<DatabaseConnection>,
}

/// Payload for creating a purchase order.
///
/// The required fields are `Option` so their absence can be reported by name
/// instead of failing generically at deserialization.
#[derive(Debug, Default)]
pub struct CreatePurchaseOrderInput {
    pub customer: Option<Value>,
    pub line_items: Option<Value>,
    pub subtotal: Option<Value>,
    pub tax_rate: Option<Value>,
    pub tax_amount: Option<Value>,
    pub total: Option<Value>,
    pub order_number: Option<String>,
    pub notes: Option<String>,
    pub status: Option<String>,
    pub due_date: Option<String>,
}

/// Partial update payload. Absent fields leave the stored value untouched.
///
/// `notes` and `due_date` keep the raw JSON value: an explicit `null` clears
/// notes, while a `null` due date is ignored rather than treated as a clear.
#[derive(Debug, Default)]
pub struct UpdatePurchaseOrderInput {
    pub customer: Option<Value>,
    pub line_items: Option<Value>,
    pub subtotal: Option<Value>,
    pub tax_rate: Option<Value>,
    pub tax_amount: Option<Value>,
    pub total: Option<Value>,
    pub notes: Option<Value>,
    pub status: Option<String>,
    pub due_date: Option<Value>,
}

/// Wire representation of a purchase order (camelCase, decoded payloads).
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrderResponse {
    pub id: Uuid,
    pub order_number: String,
    #[schema(value_type = Object)]
    pub customer: Value,
    #[schema(value_type = Object)]
    pub line_items: Value,
    pub subtotal: f64,
    pub tax_rate: f64,
    pub tax_amount: f64,
    pub total: f64,
    pub notes: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub due_date: Option<DateTime<Utc>>,
}

impl From<purchase_order::Model> for PurchaseOrderResponse {
    fn from(model: purchase_order::Model) -> Self {
        Self {
            id: model.id,
            order_number: model.order_number,
            customer: json_column::decode(&model.customer),
            line_items: json_column::decode(&model.line_items),
            subtotal: model.subtotal,
            tax_rate: model.tax_rate,
            tax_amount: model.tax_amount,
            total: model.total,
            notes: model.notes,
            status: model.status,
            created_at: model.created_at,
            due_date: model.due_date,
        }
    }
}

impl PurchaseOrderService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Create a purchase order.
    #[instrument(skip(self, input))]
    pub async fn create(
        &self,
        input: CreatePurchaseOrderInput,
    ) -> Result<purchase_order::Model, ServiceError> {
        let customer = input
            .customer
            .ok_or_else(|| ServiceError::missing_field("customer"))?;
        let line_items = input
            .line_items
            .ok_or_else(|| ServiceError::missing_field("lineItems"))?;
        let subtotal = required_number("subtotal", input.subtotal)?;
        let tax_rate = required_number("taxRate", input.tax_rate)?;
        let tax_amount = required_number("taxAmount", input.tax_amount)?;
        let total = required_number("total", input.total)?;

        let due_date = match input.due_date.as_deref() {
            Some(raw) => Some(dates::parse_due_date(raw)?),
            None => None,
        };

        let customer_text = json_column::encode(&customer)?;
        let line_items_text = json_column::encode(&line_items)?;

        let id = Uuid::new_v4();
        let order_number = input.order_number.unwrap_or_else(order_number::generate);

        let txn = self.db.begin().await?;

        if self
            .find_by_order_number(&txn, &order_number)
            .await?
            .is_some()
        {
            return Err(ServiceError::Conflict(format!(
                "Order number {order_number} already exists"
            )));
        }

        let order = purchase_order::ActiveModel {
            id: Set(id),
            order_number: Set(order_number),
            customer: Set(customer_text),
            line_items: Set(line_items_text),
            subtotal: Set(subtotal),
            tax_rate: Set(tax_rate),
            tax_amount: Set(tax_amount),
            total: Set(total),
            notes: Set(input.notes),
            status: Set(input.status.unwrap_or_else(|| DEFAULT_STATUS.to_string())),
            created_at: Set(Utc::now()),
            due_date: Set(due_date),
        };

        let order = order.insert(&txn).await.map_err(map_unique_violation)?;
        txn.commit().await?;

        info!(order_id = %order.id, order_number = %order.order_number, "purchase order created");
        Ok(order)
    }

    /// List all purchase orders in storage order.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<purchase_order::Model>, ServiceError> {
        PurchaseOrder::find()
            .all(&*self.db)
            .await
            .map_err(Into::into)
    }

    /// Fetch a purchase order by id.
    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: Uuid) -> Result<purchase_order::Model, ServiceError> {
        PurchaseOrder::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Purchase order {id} not found")))
    }

    /// Apply a partial update. Only supplied fields are overwritten; `id`,
    /// `order_number` and `created_at` are never touched. Totals are stored
    /// as supplied without recomputation from line items.
    #[instrument(skip(self, input))]
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdatePurchaseOrderInput,
    ) -> Result<purchase_order::Model, ServiceError> {
        // Validate and encode everything before opening the transaction so a
        // bad field can never leave a partial write behind.
        let customer_text = match &input.customer {
            Some(value) => Some(json_column::encode(value)?),
            None => None,
        };
        let line_items_text = match &input.line_items {
            Some(value) => Some(json_column::encode(value)?),
            None => None,
        };
        let subtotal = optional_number("subtotal", input.subtotal.as_ref())?;
        let tax_rate = optional_number("taxRate", input.tax_rate.as_ref())?;
        let tax_amount = optional_number("taxAmount", input.tax_amount.as_ref())?;
        let total = optional_number("total", input.total.as_ref())?;

        // A supplied null due date is left alone (historical client behavior);
        // a supplied string must parse.
        let due_date = match &input.due_date {
            None | Some(Value::Null) => None,
            Some(Value::String(raw)) => Some(dates::parse_due_date(raw)?),
            Some(other) => {
                return Err(ServiceError::ValidationError(format!(
                    "Invalid dueDate {other}: expected a string"
                )))
            }
        };

        let notes = match input.notes {
            None => None,
            Some(Value::Null) => Some(None),
            Some(Value::String(text)) => Some(Some(text)),
            Some(other) => {
                return Err(ServiceError::ValidationError(format!(
                    "Invalid notes {other}: expected a string or null"
                )))
            }
        };

        let txn = self.db.begin().await?;

        let existing = PurchaseOrder::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Purchase order {id} not found")))?;

        let mut order: purchase_order::ActiveModel = existing.into();

        if let Some(text) = customer_text {
            order.customer = Set(text);
        }
        if let Some(text) = line_items_text {
            order.line_items = Set(text);
        }
        if let Some(n) = subtotal {
            order.subtotal = Set(n);
        }
        if let Some(n) = tax_rate {
            order.tax_rate = Set(n);
        }
        if let Some(n) = tax_amount {
            order.tax_amount = Set(n);
        }
        if let Some(n) = total {
            order.total = Set(n);
        }
        if let Some(status) = input.status {
            order.status = Set(status);
        }
        if let Some(notes) = notes {
            order.notes = Set(notes);
        }
        if let Some(parsed) = due_date {
            order.due_date = Set(Some(parsed));
        }

        let order = order.update(&txn).await?;
        txn.commit().await?;

        info!(order_id = %order.id, "purchase order updated");
        Ok(order)
    }

    /// Hard-delete a purchase order.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        let txn = self.db.begin().await?;

        let existing = PurchaseOrder::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Purchase order {id} not found")))?;

        existing.delete(&txn).await?;
        txn.commit().await?;

        info!(order_id = %id, "purchase order deleted");
        Ok(())
    }

    async fn find_by_order_number<C: ConnectionTrait>(
        &self,
        conn: &C,
        order_number: &str,
    ) -> Result<Option<purchase_order::Model>, ServiceError> {
        PurchaseOrder::find()
            .filter(purchase_order::Column::OrderNumber.eq(order_number))
            .one(conn)
            .await
            .map_err(Into::into)
    }
}

/// Coerces a JSON number or numeric string to a finite f64, naming the wire
/// field on failure.
fn coerce_number(field: &str, value: &Value) -> Result<f64, ServiceError> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match parsed {
        Some(n) if n.is_finite() => Ok(n),
        _ => Err(ServiceError::ValidationError(format!(
            "Field '{field}' must be a finite number"
        ))),
    }
}

fn required_number(field: &str, value: Option<Value>) -> Result<f64, ServiceError> {
    let value = value.ok_or_else(|| ServiceError::missing_field(field))?;
    coerce_number(field, &value)
}

fn optional_number(field: &str, value: Option<&Value>) -> Result<Option<f64>, ServiceError> {
    value.map(|v| coerce_number(field, v)).transpose()
}

/// The unique index on order_number is the backstop for races the pre-check
/// cannot see; surface it as a structured conflict, not a storage error.
fn map_unique_violation(err: sea_orm::DbErr) -> ServiceError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            ServiceError::Conflict("Order number already exists".to_string())
        }
        _ => ServiceError::DatabaseError(err),
    }
}
