use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Farms::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Farms::Id).uuid().primary_key().not_null())
                    .col(ColumnDef::new(Farms::OwnerId).uuid().not_null())
                    .col(ColumnDef::new(Farms::Name).string().not_null())
                    .col(ColumnDef::new(Farms::Location).string().not_null())
                    .col(ColumnDef::new(Farms::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_farms_owner_id")
                            .from(Farms::Table, Farms::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Farms::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Farms {
    Table,
    Id,
    OwnerId,
    Name,
    Location,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}
