pub use sea_orm_migration::prelude::*;

mod m20240301_000001_create_users_table;
mod m20240301_000002_create_farms_table;
mod m20240301_000003_create_supplies_table;
mod m20240301_000004_create_supply_orders_table;
mod m20240610_000005_add_available_quantity_to_supplies;
mod m20240610_000006_add_order_quantity_snapshots;
mod m20240722_000007_add_coordinates_to_farms;
mod m20240722_000008_add_profile_picture_to_users;
mod m20240815_000009_add_social_login_to_users;

/// Drops a column during rollback without letting a single failed step abort
/// the remaining rollback sequence. Schema-inspection errors stay fatal; only
/// the drop itself is demoted to a logged warning.
pub(crate) async fn drop_column_best_effort(
    manager: &SchemaManager<'_>,
    table: &str,
    column: &str,
) -> Result<(), DbErr> {
    if !manager.has_column(table, column).await? {
        return Ok(());
    }
    if let Err(err) = manager
        .alter_table(
            Table::alter()
                .table(Alias::new(table))
                .drop_column(Alias::new(column))
                .to_owned(),
        )
        .await
    {
        tracing::warn!(table, column, "rollback step failed, continuing: {}", err);
    }
    Ok(())
}

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240301_000001_create_users_table::Migration),
            Box::new(m20240301_000002_create_farms_table::Migration),
            Box::new(m20240301_000003_create_supplies_table::Migration),
            Box::new(m20240301_000004_create_supply_orders_table::Migration),
            Box::new(m20240610_000005_add_available_quantity_to_supplies::Migration),
            Box::new(m20240610_000006_add_order_quantity_snapshots::Migration),
            Box::new(m20240722_000007_add_coordinates_to_farms::Migration),
            Box::new(m20240722_000008_add_profile_picture_to_users::Migration),
            Box::new(m20240815_000009_add_social_login_to_users::Migration),
        ]
    }
}
