use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Audit-style record of one accepted order against a supply.
///
/// Rows are written exactly once and never mutated. The two snapshot columns
/// capture the supply's `available_quantity` immediately before and after the
/// deduction, so `remaining_supply_quantity == original_supply_quantity -
/// ordered_quantity` holds for every row.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "supply_orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub supply_id: Uuid,
    pub buyer_id: Uuid,
    pub ordered_quantity: i32,
    pub original_supply_quantity: i32,
    pub remaining_supply_quantity: i32,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::supply::Entity",
        from = "Column::SupplyId",
        to = "super::supply::Column::Id"
    )]
    Supply,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::BuyerId",
        to = "super::user::Column::Id"
    )]
    Buyer,
}

impl Related<super::supply::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Supply.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Buyer.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
