pub mod farm;
pub mod supply;
pub mod supply_order;
pub mod user;

pub use farm::Entity as Farm;
pub use supply::Entity as Supply;
pub use supply_order::Entity as SupplyOrder;
pub use user::Entity as User;
