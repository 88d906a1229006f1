use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Orders placed before the ledger existed carry zero snapshots; the
        // snapshot columns are only meaningful for rows written by it.
        if !manager
            .has_column(
                "supply_orders",
                SupplyOrders::OriginalSupplyQuantity.to_string().as_str(),
            )
            .await?
        {
            let mut col = ColumnDef::new(SupplyOrders::OriginalSupplyQuantity);
            col.integer().not_null().default(0);
            manager
                .alter_table(
                    Table::alter()
                        .table(SupplyOrders::Table)
                        .add_column(col)
                        .to_owned(),
                )
                .await?;
        }

        if !manager
            .has_column(
                "supply_orders",
                SupplyOrders::RemainingSupplyQuantity.to_string().as_str(),
            )
            .await?
        {
            let mut col = ColumnDef::new(SupplyOrders::RemainingSupplyQuantity);
            col.integer().not_null().default(0);
            manager
                .alter_table(
                    Table::alter()
                        .table(SupplyOrders::Table)
                        .add_column(col)
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        crate::drop_column_best_effort(
            manager,
            "supply_orders",
            SupplyOrders::RemainingSupplyQuantity.to_string().as_str(),
        )
        .await?;
        crate::drop_column_best_effort(
            manager,
            "supply_orders",
            SupplyOrders::OriginalSupplyQuantity.to_string().as_str(),
        )
        .await
    }
}

#[derive(DeriveIden)]
enum SupplyOrders {
    Table,
    OriginalSupplyQuantity,
    RemainingSupplyQuantity,
}
