use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        if !manager
            .has_column("supplies", Supplies::AvailableQuantity.to_string().as_str())
            .await?
        {
            let mut col = ColumnDef::new(Supplies::AvailableQuantity);
            col.integer().null();
            manager
                .alter_table(
                    Table::alter()
                        .table(Supplies::Table)
                        .add_column(col)
                        .to_owned(),
                )
                .await?;
        }

        if !manager
            .has_column("supplies", Supplies::Version.to_string().as_str())
            .await?
        {
            let mut col = ColumnDef::new(Supplies::Version);
            col.integer().not_null().default(1);
            manager
                .alter_table(
                    Table::alter()
                        .table(Supplies::Table)
                        .add_column(col)
                        .to_owned(),
                )
                .await?;
        }

        // Backfill: pre-existing rows start fully available. A row already at
        // zero available stock is indistinguishable from an unmigrated one
        // here; both are reset to the full quantity.
        let backfill = Query::update()
            .table(Supplies::Table)
            .value(Supplies::AvailableQuantity, Expr::col(Supplies::Quantity))
            .cond_where(
                Cond::any()
                    .add(Expr::col(Supplies::AvailableQuantity).is_null())
                    .add(Expr::col(Supplies::AvailableQuantity).eq(0)),
            )
            .to_owned();
        manager.exec_stmt(backfill).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        crate::drop_column_best_effort(manager, "supplies", Supplies::Version.to_string().as_str())
            .await?;
        crate::drop_column_best_effort(
            manager,
            "supplies",
            Supplies::AvailableQuantity.to_string().as_str(),
        )
        .await
    }
}

#[derive(DeriveIden)]
enum Supplies {
    Table,
    Quantity,
    AvailableQuantity,
    Version,
}
