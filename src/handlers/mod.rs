pub mod common;
pub mod purchase_orders;

use crate::db::DbPool;
use crate::services::PurchaseOrderService;
use std::sync::Arc;

/// Container for the services exposed to HTTP handlers.
#[derive(Clone)]
pub struct AppServices {
    pub purchase_orders: Arc<PurchaseOrderService>,
}

impl AppServices {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self {
            purchase_orders: Arc::new(PurchaseOrderService::new(db_pool)),
        }
    }
}
