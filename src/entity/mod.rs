pub mod audit_logs;
pub mod carts;
pub mod coupons;
pub mod foods;
pub mod users;
pub mod vendors;

pub use audit_logs::Entity as AuditLogs;
pub use carts::Entity as Carts;
pub use coupons::Entity as Coupons;
pub use foods::Entity as Foods;
pub use users::Entity as Users;
pub use vendors::Entity as Vendors;
