use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        if !manager
            .has_column("users", Users::GoogleId.to_string().as_str())
            .await?
        {
            let mut col = ColumnDef::new(Users::GoogleId);
            col.string().null();
            manager
                .alter_table(Table::alter().table(Users::Table).add_column(col).to_owned())
                .await?;
        }

        if !manager
            .has_column("users", Users::FacebookId.to_string().as_str())
            .await?
        {
            let mut col = ColumnDef::new(Users::FacebookId);
            col.string().null();
            manager
                .alter_table(Table::alter().table(Users::Table).add_column(col).to_owned())
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        crate::drop_column_best_effort(manager, "users", Users::FacebookId.to_string().as_str())
            .await?;
        crate::drop_column_best_effort(manager, "users", Users::GoogleId.to_string().as_str()).await
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    GoogleId,
    FacebookId,
}
