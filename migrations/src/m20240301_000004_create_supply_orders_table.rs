use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SupplyOrders::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SupplyOrders::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(ColumnDef::new(SupplyOrders::SupplyId).uuid().not_null())
                    .col(ColumnDef::new(SupplyOrders::BuyerId).uuid().not_null())
                    .col(
                        ColumnDef::new(SupplyOrders::OrderedQuantity)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SupplyOrders::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_supply_orders_supply_id")
                            .from(SupplyOrders::Table, SupplyOrders::SupplyId)
                            .to(Supplies::Table, Supplies::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_supply_orders_buyer_id")
                            .from(SupplyOrders::Table, SupplyOrders::BuyerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_supply_orders_supply_id")
                    .table(SupplyOrders::Table)
                    .col(SupplyOrders::SupplyId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SupplyOrders::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum SupplyOrders {
    Table,
    Id,
    SupplyId,
    BuyerId,
    OrderedQuantity,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Supplies {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}
