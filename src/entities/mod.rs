pub mod purchase_order;

pub use purchase_order::Entity as PurchaseOrder;
pub use purchase_order::Model as PurchaseOrderModel;
