//! FarmLink API Library
//!
//! Core functionality for the FarmLink farming-management backend: the supply
//! inventory ledger, its sea-orm entities, and the surrounding configuration
//! and database plumbing. The HTTP layer and frontend consume this crate; they
//! are not part of it.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod services;

use sea_orm::DatabaseConnection;
use std::sync::Arc;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub event_sender: events::EventSender,
    pub inventory_service: services::inventory::InventoryService,
}

impl AppState {
    /// Wires the shared application state from an established connection.
    pub fn new(
        db: Arc<DatabaseConnection>,
        config: config::AppConfig,
        event_sender: events::EventSender,
    ) -> Self {
        let inventory_service =
            services::inventory::InventoryService::new(db.clone(), event_sender.clone());
        Self {
            db,
            config,
            event_sender,
            inventory_service,
        }
    }
}
