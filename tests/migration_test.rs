//! Schema-evolution tests: backfill semantics, idempotence against repeated
//! and partial application, and forward/backward round-trips.

use chrono::Utc;
use farmlink_api::db::{self, DbConfig, DbPool};
use farmlink_api::entities::supply::Entity as Supply;
use migrations::{Migrator, MigratorTrait};
use sea_orm::{ConnectionTrait, DatabaseBackend, EntityTrait, Statement};
use uuid::Uuid;

async fn connect() -> DbPool {
    db::establish_connection_with_config(&DbConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        min_connections: 1,
        ..Default::default()
    })
    .await
    .expect("establish sqlite connection")
}

async fn has_column(db: &DbPool, table: &str, column: &str) -> bool {
    let stmt = Statement::from_string(
        DatabaseBackend::Sqlite,
        format!(
            "SELECT COUNT(*) AS cnt FROM pragma_table_info('{}') WHERE name = '{}'",
            table, column
        ),
    );
    let row = db
        .query_one(stmt)
        .await
        .expect("pragma query")
        .expect("pragma row");
    let cnt: i64 = row.try_get("", "cnt").expect("cnt");
    cnt > 0
}

async fn row_count(db: &DbPool, table: &str) -> i64 {
    let stmt = Statement::from_string(
        DatabaseBackend::Sqlite,
        format!("SELECT COUNT(*) AS cnt FROM {}", table),
    );
    let row = db
        .query_one(stmt)
        .await
        .expect("count query")
        .expect("count row");
    row.try_get("", "cnt").expect("cnt")
}

async fn insert_user(db: &DbPool) -> Uuid {
    let id = Uuid::new_v4();
    let stmt = Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "INSERT INTO users (id, name, email, password_hash, role, created_at) VALUES (?, ?, ?, ?, ?, ?)",
        [
            id.into(),
            "Legacy User".into(),
            format!("{}@example.com", id).into(),
            "hash".into(),
            "supplier".into(),
            Utc::now().into(),
        ],
    );
    db.execute(stmt).await.expect("insert user");
    id
}

async fn insert_pre_ledger_supply(db: &DbPool, supplier_id: Uuid, quantity: i32) -> Uuid {
    let id = Uuid::new_v4();
    let stmt = Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "INSERT INTO supplies (id, supplier_id, name, category, unit_price_cents, quantity, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        [
            id.into(),
            supplier_id.into(),
            "Legacy Supply".into(),
            "misc".into(),
            100i64.into(),
            quantity.into(),
            Utc::now().into(),
            Utc::now().into(),
        ],
    );
    db.execute(stmt).await.expect("insert supply");
    id
}

#[tokio::test]
async fn backfill_initializes_available_quantity_from_quantity() {
    let db = connect().await;
    // Schema as it stood before the ledger columns existed.
    Migrator::up(&db, Some(4)).await.expect("partial migrate");

    let supplier = insert_user(&db).await;
    let supply_id = insert_pre_ledger_supply(&db, supplier, 50).await;

    Migrator::up(&db, None).await.expect("remaining migrations");

    let migrated = Supply::find_by_id(supply_id)
        .one(&db)
        .await
        .expect("find supply")
        .expect("supply exists");
    assert_eq!(migrated.quantity, 50);
    assert_eq!(migrated.available_quantity, 50);
    assert_eq!(migrated.version, 1);
}

#[tokio::test]
async fn backfill_overwrites_zero_but_preserves_nonzero_values() {
    let db = connect().await;
    Migrator::up(&db, Some(4)).await.expect("partial migrate");

    // Simulate a partially applied rollout where the column already exists.
    db.execute(Statement::from_string(
        DatabaseBackend::Sqlite,
        "ALTER TABLE supplies ADD COLUMN available_quantity integer".to_string(),
    ))
    .await
    .expect("manual column add");

    let supplier = insert_user(&db).await;
    let zero_stock = insert_pre_ledger_supply(&db, supplier, 50).await;
    let partial_stock = insert_pre_ledger_supply(&db, supplier, 9).await;

    db.execute(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "UPDATE supplies SET available_quantity = ? WHERE id = ?",
        [0i32.into(), zero_stock.into()],
    ))
    .await
    .expect("set zero stock");
    db.execute(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "UPDATE supplies SET available_quantity = ? WHERE id = ?",
        [3i32.into(), partial_stock.into()],
    ))
    .await
    .expect("set partial stock");

    // The guarded column-add must be a no-op; the backfill must still run.
    Migrator::up(&db, None).await.expect("remaining migrations");

    let zero = Supply::find_by_id(zero_stock)
        .one(&db)
        .await
        .expect("find")
        .expect("exists");
    // A zero-stock row is indistinguishable from an unmigrated one and comes
    // back fully available.
    assert_eq!(zero.available_quantity, 50);

    let partial = Supply::find_by_id(partial_stock)
        .one(&db)
        .await
        .expect("find")
        .expect("exists");
    assert_eq!(partial.available_quantity, 3);
}

#[tokio::test]
async fn reapplying_all_migrations_is_a_no_op() {
    let db = connect().await;
    Migrator::up(&db, None).await.expect("first pass");

    let supplier = insert_user(&db).await;
    let stmt = Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "INSERT INTO supplies (id, supplier_id, name, category, unit_price_cents, quantity, \
         available_quantity, version, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        [
            Uuid::new_v4().into(),
            supplier.into(),
            "Compost".into(),
            "fertilizer".into(),
            400i64.into(),
            20i32.into(),
            7i32.into(),
            1i32.into(),
            Utc::now().into(),
            Utc::now().into(),
        ],
    );
    db.execute(stmt).await.expect("insert supply");

    Migrator::up(&db, None).await.expect("second pass");

    let supplies = Supply::find().all(&db).await.expect("all supplies");
    assert_eq!(supplies.len(), 1);
    // A second pass must not re-run the backfill over live ledger data.
    assert_eq!(supplies[0].available_quantity, 7);
}

#[tokio::test]
async fn coordinates_migration_round_trips_without_touching_rows() {
    let db = connect().await;
    Migrator::up(&db, None).await.expect("migrate");

    let owner = insert_user(&db).await;
    db.execute(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "INSERT INTO farms (id, owner_id, name, location, coordinates, created_at) VALUES (?, ?, ?, ?, ?, ?)",
        [
            Uuid::new_v4().into(),
            owner.into(),
            "North Field".into(),
            "Ridgeview".into(),
            r#"{"type":"Polygon"}"#.into(),
            Utc::now().into(),
        ],
    ))
    .await
    .expect("insert farm");

    assert!(has_column(&db, "farms", "coordinates").await);
    assert_eq!(row_count(&db, "farms").await, 1);

    // Roll back through the coordinates migration (and the two above it).
    Migrator::down(&db, Some(3)).await.expect("rollback");

    assert!(!has_column(&db, "farms", "coordinates").await);
    assert_eq!(row_count(&db, "farms").await, 1);

    let row = db
        .query_one(Statement::from_string(
            DatabaseBackend::Sqlite,
            "SELECT name, location FROM farms".to_string(),
        ))
        .await
        .expect("select farm")
        .expect("farm row");
    let name: String = row.try_get("", "name").expect("name");
    let location: String = row.try_get("", "location").expect("location");
    assert_eq!(name, "North Field");
    assert_eq!(location, "Ridgeview");

    // Forward again restores the schema shape.
    Migrator::up(&db, None).await.expect("re-migrate");
    assert!(has_column(&db, "farms", "coordinates").await);
    assert_eq!(row_count(&db, "farms").await, 1);
}

#[tokio::test]
async fn down_migrations_restore_the_pre_ledger_schema() {
    let db = connect().await;
    Migrator::up(&db, None).await.expect("migrate");

    assert!(has_column(&db, "supplies", "available_quantity").await);
    assert!(has_column(&db, "supplies", "version").await);
    assert!(has_column(&db, "supply_orders", "original_supply_quantity").await);
    assert!(has_column(&db, "users", "google_id").await);

    // Revert everything after the four create-table migrations.
    Migrator::down(&db, Some(5)).await.expect("rollback");

    assert!(!has_column(&db, "supplies", "available_quantity").await);
    assert!(!has_column(&db, "supplies", "version").await);
    assert!(!has_column(&db, "supply_orders", "original_supply_quantity").await);
    assert!(!has_column(&db, "supply_orders", "remaining_supply_quantity").await);
    assert!(!has_column(&db, "users", "google_id").await);
    assert!(!has_column(&db, "users", "profile_picture").await);

    // The base tables and their unrelated columns survive.
    assert!(has_column(&db, "supplies", "quantity").await);
    assert!(has_column(&db, "users", "email").await);
}
