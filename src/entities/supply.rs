use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A stockable item listed by a supplier.
///
/// `quantity` is the total units ever stocked; `available_quantity` is what
/// remains orderable. The ledger maintains `0 <= available_quantity <= quantity`.
/// `version` is the optimistic-lock counter: every quantity mutation is
/// conditioned on the version read at the start of the operation.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "supplies")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub supplier_id: Uuid,
    pub name: String,
    pub category: String,
    pub unit_price_cents: i64,
    pub quantity: i32,
    pub available_quantity: i32,
    pub version: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::SupplierId",
        to = "super::user::Column::Id"
    )]
    Supplier,
    #[sea_orm(has_many = "super::supply_order::Entity")]
    Orders,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Supplier.def()
    }
}

impl Related<super::supply_order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Orders.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
