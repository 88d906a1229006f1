use crate::{
    db::DbPool,
    entities::{
        supply::{self, Entity as Supply},
        supply_order::{self, Entity as SupplyOrder},
    },
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// Number of times a version-conflicted commit is retried before the
/// conflict is surfaced to the caller.
const MAX_COMMIT_ATTEMPTS: u32 = 3;

#[derive(Debug, Clone)]
pub struct CreateSupplyInput {
    pub supplier_id: Uuid,
    pub name: String,
    pub category: String,
    pub unit_price_cents: i64,
    pub quantity: i32,
}

#[derive(Debug, Clone)]
pub struct PlaceOrderCommand {
    pub supply_id: Uuid,
    pub buyer_id: Uuid,
    pub quantity: i32,
}

/// The inventory ledger.
///
/// Owns the only code path that mutates a supply's `available_quantity`.
/// Every mutation runs as a read-validate-write sequence conditioned on the
/// supply's `version` column, so two writers racing on the same supply cannot
/// both commit against the same observed quantity.
#[derive(Clone)]
pub struct InventoryService {
    db_pool: Arc<DbPool>,
    event_sender: EventSender,
}

impl InventoryService {
    /// Creates a new inventory service instance
    pub fn new(db_pool: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Lists a new supply. Stock starts fully available.
    #[instrument(skip(self, input), fields(supplier_id = %input.supplier_id))]
    pub async fn create_supply(
        &self,
        input: CreateSupplyInput,
    ) -> Result<supply::Model, ServiceError> {
        if input.quantity < 0 {
            return Err(ServiceError::ValidationError(format!(
                "quantity must not be negative, got {}",
                input.quantity
            )));
        }
        if input.name.trim().is_empty() {
            return Err(ServiceError::ValidationError(
                "supply name must not be empty".to_string(),
            ));
        }

        let now = Utc::now();
        let model = supply::ActiveModel {
            id: Set(Uuid::new_v4()),
            supplier_id: Set(input.supplier_id),
            name: Set(input.name),
            category: Set(input.category),
            unit_price_cents: Set(input.unit_price_cents),
            quantity: Set(input.quantity),
            available_quantity: Set(input.quantity),
            version: Set(1),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let created = model
            .insert(self.db_pool.as_ref())
            .await
            .map_err(ServiceError::db_error)?;

        info!(supply_id = %created.id, quantity = created.quantity, "supply created");

        self.event_sender
            .send(Event::SupplyCreated {
                supply_id: created.id,
                supplier_id: created.supplier_id,
                quantity: created.quantity,
            })
            .await
            .map_err(ServiceError::EventError)?;

        Ok(created)
    }

    /// Adds stock to an existing supply, raising `quantity` and
    /// `available_quantity` by the same amount.
    #[instrument(skip(self))]
    pub async fn restock_supply(
        &self,
        supply_id: Uuid,
        additional_quantity: i32,
    ) -> Result<supply::Model, ServiceError> {
        if additional_quantity <= 0 {
            return Err(ServiceError::ValidationError(format!(
                "restock quantity must be positive, got {}",
                additional_quantity
            )));
        }

        let mut attempts = 0;
        let restocked = loop {
            attempts += 1;
            match self.try_restock(supply_id, additional_quantity).await {
                Ok(model) => break model,
                Err(err @ ServiceError::ConcurrentModification(_))
                    if attempts < MAX_COMMIT_ATTEMPTS =>
                {
                    warn!(%supply_id, attempt = attempts, "restock version conflict, retrying: {}", err);
                }
                Err(err) => return Err(err),
            }
        };

        self.event_sender
            .send(Event::SupplyRestocked {
                supply_id,
                added_quantity: additional_quantity,
                new_available_quantity: restocked.available_quantity,
            })
            .await
            .map_err(ServiceError::EventError)?;

        Ok(restocked)
    }

    async fn try_restock(
        &self,
        supply_id: Uuid,
        additional_quantity: i32,
    ) -> Result<supply::Model, ServiceError> {
        let db = self.db_pool.as_ref();

        let current = Supply::find_by_id(supply_id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Supply {} not found", supply_id)))?;

        let updated = Supply::update_many()
            .col_expr(
                supply::Column::Quantity,
                Expr::value(current.quantity + additional_quantity),
            )
            .col_expr(
                supply::Column::AvailableQuantity,
                Expr::value(current.available_quantity + additional_quantity),
            )
            .col_expr(supply::Column::Version, Expr::value(current.version + 1))
            .col_expr(supply::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(supply::Column::Id.eq(supply_id))
            .filter(supply::Column::Version.eq(current.version))
            .exec(db)
            .await
            .map_err(ServiceError::db_error)?;

        if updated.rows_affected == 0 {
            return Err(ServiceError::ConcurrentModification(supply_id));
        }

        Supply::find_by_id(supply_id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Supply {} not found", supply_id)))
    }

    /// Accepts an order against a supply.
    ///
    /// Validates availability, writes the order row with before/after stock
    /// snapshots, and decrements the supply's `available_quantity`, all inside
    /// one transaction. A version conflict rolls the whole sequence back and
    /// retries it from the fresh read, up to `MAX_COMMIT_ATTEMPTS` times.
    #[instrument(skip(self, command), fields(supply_id = %command.supply_id, quantity = command.quantity))]
    pub async fn place_order(
        &self,
        command: PlaceOrderCommand,
    ) -> Result<supply_order::Model, ServiceError> {
        if command.quantity <= 0 {
            return Err(ServiceError::ValidationError(format!(
                "ordered quantity must be positive, got {}",
                command.quantity
            )));
        }

        let mut attempts = 0;
        let order = loop {
            attempts += 1;
            match self.try_place_order(&command).await {
                Ok(order) => break order,
                Err(err @ ServiceError::ConcurrentModification(_))
                    if attempts < MAX_COMMIT_ATTEMPTS =>
                {
                    warn!(
                        supply_id = %command.supply_id,
                        attempt = attempts,
                        "order commit conflicted, retrying: {}",
                        err
                    );
                }
                Err(err) => return Err(err),
            }
        };

        info!(
            order_id = %order.id,
            supply_id = %order.supply_id,
            remaining = order.remaining_supply_quantity,
            "supply order placed"
        );

        self.event_sender
            .send(Event::SupplyOrderPlaced {
                order_id: order.id,
                supply_id: order.supply_id,
                buyer_id: order.buyer_id,
                ordered_quantity: order.ordered_quantity,
                original_supply_quantity: order.original_supply_quantity,
                remaining_supply_quantity: order.remaining_supply_quantity,
                timestamp: order.created_at,
            })
            .await
            .map_err(ServiceError::EventError)?;

        Ok(order)
    }

    async fn try_place_order(
        &self,
        command: &PlaceOrderCommand,
    ) -> Result<supply_order::Model, ServiceError> {
        let command = command.clone();

        self.db_pool
            .transaction::<_, supply_order::Model, ServiceError>(move |txn| {
                Box::pin(async move {
                    let current = Supply::find_by_id(command.supply_id)
                        .one(txn)
                        .await
                        .map_err(ServiceError::db_error)?
                        .ok_or_else(|| {
                            ServiceError::NotFound(format!(
                                "Supply {} not found",
                                command.supply_id
                            ))
                        })?;

                    if current.available_quantity < command.quantity {
                        return Err(ServiceError::InsufficientStock(format!(
                            "Available: {}, Requested: {}",
                            current.available_quantity, command.quantity
                        )));
                    }

                    let original = current.available_quantity;
                    let remaining = original - command.quantity;

                    let updated = Supply::update_many()
                        .col_expr(supply::Column::AvailableQuantity, Expr::value(remaining))
                        .col_expr(supply::Column::Version, Expr::value(current.version + 1))
                        .col_expr(supply::Column::UpdatedAt, Expr::value(Utc::now()))
                        .filter(supply::Column::Id.eq(command.supply_id))
                        .filter(supply::Column::Version.eq(current.version))
                        .exec(txn)
                        .await
                        .map_err(ServiceError::db_error)?;

                    if updated.rows_affected == 0 {
                        return Err(ServiceError::ConcurrentModification(command.supply_id));
                    }

                    let order = supply_order::ActiveModel {
                        id: Set(Uuid::new_v4()),
                        supply_id: Set(command.supply_id),
                        buyer_id: Set(command.buyer_id),
                        ordered_quantity: Set(command.quantity),
                        original_supply_quantity: Set(original),
                        remaining_supply_quantity: Set(remaining),
                        created_at: Set(Utc::now()),
                    };

                    order.insert(txn).await.map_err(ServiceError::db_error)
                })
            })
            .await
            .map_err(ServiceError::from)
    }

    /// Gets a supply by id
    #[instrument(skip(self))]
    pub async fn get_supply(&self, supply_id: Uuid) -> Result<Option<supply::Model>, ServiceError> {
        Supply::find_by_id(supply_id)
            .one(self.db_pool.as_ref())
            .await
            .map_err(ServiceError::db_error)
    }

    /// Lists supplies with pagination. Pages are 1-based.
    #[instrument(skip(self))]
    pub async fn list_supplies(
        &self,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<supply::Model>, u64), ServiceError> {
        if page == 0 || limit == 0 {
            return Err(ServiceError::ValidationError(
                "page and limit must be positive".to_string(),
            ));
        }

        let paginator = Supply::find()
            .order_by_asc(supply::Column::CreatedAt)
            .paginate(self.db_pool.as_ref(), limit);

        let total = paginator.num_items().await.map_err(ServiceError::db_error)?;
        let items = paginator
            .fetch_page(page - 1)
            .await
            .map_err(ServiceError::db_error)?;

        Ok((items, total))
    }

    /// Returns the immutable order ledger for one supply, oldest first.
    #[instrument(skip(self))]
    pub async fn list_orders_for_supply(
        &self,
        supply_id: Uuid,
    ) -> Result<Vec<supply_order::Model>, ServiceError> {
        SupplyOrder::find()
            .filter(supply_order::Column::SupplyId.eq(supply_id))
            .order_by_asc(supply_order::Column::CreatedAt)
            .all(self.db_pool.as_ref())
            .await
            .map_err(ServiceError::db_error)
    }
}
