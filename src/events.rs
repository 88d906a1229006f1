use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

/// Domain events emitted by the inventory ledger after a successful commit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    SupplyCreated {
        supply_id: Uuid,
        supplier_id: Uuid,
        quantity: i32,
    },
    SupplyRestocked {
        supply_id: Uuid,
        added_quantity: i32,
        new_available_quantity: i32,
    },
    SupplyOrderPlaced {
        order_id: Uuid,
        supply_id: Uuid,
        buyer_id: Uuid,
        ordered_quantity: i32,
        original_supply_quantity: i32,
        remaining_supply_quantity: i32,
        timestamp: DateTime<Utc>,
    },
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    /// Creates a new EventSender
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }
}

/// Consumer loop for the event channel. Runs until every sender is dropped.
pub async fn process_events(mut receiver: mpsc::Receiver<Event>) {
    while let Some(event) = receiver.recv().await {
        match &event {
            Event::SupplyCreated {
                supply_id,
                supplier_id,
                quantity,
            } => {
                info!(%supply_id, %supplier_id, quantity, "supply created");
            }
            Event::SupplyRestocked {
                supply_id,
                added_quantity,
                new_available_quantity,
            } => {
                info!(%supply_id, added_quantity, new_available_quantity, "supply restocked");
            }
            Event::SupplyOrderPlaced {
                order_id,
                supply_id,
                ordered_quantity,
                remaining_supply_quantity,
                ..
            } => {
                info!(
                    %order_id,
                    %supply_id,
                    ordered_quantity,
                    remaining_supply_quantity,
                    "supply order placed"
                );
            }
        }
    }
    warn!("event channel closed; event processor shutting down");
}
