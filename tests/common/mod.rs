use std::sync::Arc;

use chrono::Utc;
use farmlink_api::{
    db::{self, DbConfig, DbPool},
    entities::user,
    events::{self, EventSender},
    services::inventory::InventoryService,
};
use sea_orm::{ActiveModelTrait, Set};
use tokio::sync::mpsc;
use uuid::Uuid;

/// Test harness around an in-memory SQLite database with all migrations
/// applied. A single-connection pool keeps every task on the same database.
pub struct TestApp {
    pub db: Arc<DbPool>,
    pub inventory: InventoryService,
    _event_task: tokio::task::JoinHandle<()>,
}

impl TestApp {
    pub async fn new() -> Self {
        let pool = db::establish_connection_with_config(&DbConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_connections: 1,
            ..Default::default()
        })
        .await
        .expect("establish sqlite connection");

        db::run_migrations(&pool).await.expect("run migrations");

        let db = Arc::new(pool);
        let (tx, rx) = mpsc::channel(64);
        let event_sender = EventSender::new(tx);
        let event_task = tokio::spawn(events::process_events(rx));
        let inventory = InventoryService::new(db.clone(), event_sender);

        Self {
            db,
            inventory,
            _event_task: event_task,
        }
    }

    pub async fn seed_user(&self, role: user::UserRole) -> user::Model {
        user::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set("Test User".to_string()),
            email: Set(format!("{}@example.com", Uuid::new_v4())),
            password_hash: Set(Some("not-a-real-hash".to_string())),
            role: Set(role),
            profile_picture: Set(None),
            google_id: Set(None),
            facebook_id: Set(None),
            created_at: Set(Utc::now()),
        }
        .insert(self.db.as_ref())
        .await
        .expect("seed user")
    }
}
