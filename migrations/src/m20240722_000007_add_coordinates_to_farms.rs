use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        if !manager
            .has_column("farms", Farms::Coordinates.to_string().as_str())
            .await?
        {
            let mut col = ColumnDef::new(Farms::Coordinates);
            col.text().null();
            manager
                .alter_table(Table::alter().table(Farms::Table).add_column(col).to_owned())
                .await?;
        }
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        crate::drop_column_best_effort(manager, "farms", Farms::Coordinates.to_string().as_str())
            .await
    }
}

#[derive(DeriveIden)]
enum Farms {
    Table,
    Coordinates,
}
