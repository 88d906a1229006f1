use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    /// Absent for accounts created through a social-login provider.
    pub password_hash: Option<String>,
    pub role: UserRole,
    pub profile_picture: Option<String>,
    pub google_id: Option<String>,
    pub facebook_id: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum UserRole {
    #[sea_orm(string_value = "farmer")]
    Farmer,
    #[sea_orm(string_value = "supplier")]
    Supplier,
    #[sea_orm(string_value = "buyer")]
    Buyer,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::farm::Entity")]
    Farms,
    #[sea_orm(has_many = "super::supply::Entity")]
    Supplies,
}

impl Related<super::farm::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Farms.def()
    }
}

impl Related<super::supply::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Supplies.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
