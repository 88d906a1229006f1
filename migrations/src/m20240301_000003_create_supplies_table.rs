use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Supplies::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Supplies::Id).uuid().primary_key().not_null())
                    .col(ColumnDef::new(Supplies::SupplierId).uuid().not_null())
                    .col(ColumnDef::new(Supplies::Name).string().not_null())
                    .col(ColumnDef::new(Supplies::Category).string().not_null())
                    .col(
                        ColumnDef::new(Supplies::UnitPriceCents)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Supplies::Quantity)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Supplies::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Supplies::UpdatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_supplies_supplier_id")
                            .from(Supplies::Table, Supplies::SupplierId)
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
            .drop_table(Table::drop().table(Supplies::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Supplies {
    Table,
    Id,
    SupplierId,
    Name,
    Category,
    UnitPriceCents,
    Quantity,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}
