pub mod purchase_orders;

pub use purchase_orders::PurchaseOrderService;
