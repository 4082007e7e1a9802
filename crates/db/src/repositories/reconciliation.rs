//! Checkout and return persistence.
//!
//! The only write paths for borrowing material. Each operation runs in one
//! READ COMMITTED transaction and locks the material row first, then the
//! debt row, so checkouts and returns on the same pair queue behind each
//! other instead of deadlocking. The partial unique index on open debts backs
//! the locks up: a race that slips past them surfaces as a conflict and the
//! whole transaction is retried.

use avstock_core::audit::{IdempotencyKey, LogEntry};
use avstock_core::auth::Actor;
use avstock_core::debt::{DebtState, OpenDebt};
use avstock_core::ledger::{Quantity, StockLevel};
use avstock_core::reconciliation::{
    DebtStatus, InventoryError, OpenDebtView, Receipt, ReconciliationService, RetryPolicy,
};
use avstock_shared::InventoryConfig;
use avstock_shared::types::{DebtId, LogEntryId, MaterialId, UserId};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, IsolationLevel, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::{info, warn};
use uuid::Uuid;

use super::conflict::inventory_db_error;
use crate::entities::{material_debts, material_logs, material_returns, materials, users};

/// Repository for checkouts, returns, open debts and checkout history.
#[derive(Debug, Clone)]
pub struct ReconciliationRepository {
    db: DatabaseConnection,
    due_days: u32,
    retry: RetryPolicy,
}

impl ReconciliationRepository {
    /// Creates a new reconciliation repository.
    #[must_use]
    pub fn new(db: DatabaseConnection, config: InventoryConfig) -> Self {
        Self {
            db,
            due_days: config.debt_due_days,
            retry: RetryPolicy::new(config.max_attempts),
        }
    }

    /// Checks out `quantity` units of a material for the actor.
    ///
    /// Decrements stock, appends an audit entry and opens or grows the
    /// actor's debt, all in one transaction. With an idempotency key, a
    /// repeated call returns the original receipt (`replayed = true`)
    /// without touching stock again.
    ///
    /// # Errors
    ///
    /// - `InvalidQuantity` if `quantity <= 0`
    /// - `MaterialNotFound` if the material does not exist
    /// - `InsufficientStock` if not enough is on hand
    /// - `InvalidIdempotencyKey` if the key was used for a different checkout
    /// - `Unauthenticated` if the actor is unknown or inactive
    /// - `ConcurrencyConflict` if every attempt lost a race
    pub async fn checkout(
        &self,
        actor: &Actor,
        material_id: MaterialId,
        quantity: Quantity,
        idempotency_key: Option<&IdempotencyKey>,
    ) -> Result<Receipt, InventoryError> {
        if quantity <= 0 {
            return Err(InventoryError::InvalidQuantity(quantity));
        }

        let mut attempt = 1;
        loop {
            match self
                .try_checkout(actor, material_id, quantity, idempotency_key)
                .await
            {
                Ok(receipt) => {
                    if receipt.replayed {
                        info!(
                            user_id = %actor.user_id(),
                            material_id = %material_id,
                            log_entry_id = %receipt.log_entry_id,
                            "checkout replayed"
                        );
                    } else {
                        info!(
                            user_id = %actor.user_id(),
                            material_id = %material_id,
                            quantity,
                            remaining_on_hand = receipt.remaining_on_hand,
                            debt_amount = receipt.debt_amount,
                            "material checked out"
                        );
                    }
                    return Ok(receipt);
                }
                Err(err) if self.retry.should_retry(attempt, &err) => {
                    warn!(
                        user_id = %actor.user_id(),
                        material_id = %material_id,
                        attempt,
                        "checkout conflict, retrying"
                    );
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Returns `quantity` units against one of the actor's open debts.
    ///
    /// Increments stock, decrements the debt (settling it at zero) and
    /// records the return event, all in one transaction.
    ///
    /// # Errors
    ///
    /// - `InvalidQuantity` if `quantity <= 0`
    /// - `DebtNotFound` if the actor has no open debt with this ID
    /// - `OverReturn` if `quantity` exceeds the amount owed
    /// - `Unauthenticated` if the actor is unknown or inactive
    /// - `ConcurrencyConflict` if every attempt lost a race
    pub async fn return_material(
        &self,
        actor: &Actor,
        debt_id: DebtId,
        quantity: Quantity,
    ) -> Result<DebtStatus, InventoryError> {
        if quantity <= 0 {
            return Err(InventoryError::InvalidQuantity(quantity));
        }

        let mut attempt = 1;
        loop {
            match self.try_return(actor, debt_id, quantity).await {
                Ok(status) => {
                    info!(
                        user_id = %actor.user_id(),
                        material_id = %status.material_id,
                        debt_id = %debt_id,
                        quantity,
                        remaining = status.amount,
                        settled = status.settled,
                        "material returned"
                    );
                    return Ok(status);
                }
                Err(err) if self.retry.should_retry(attempt, &err) => {
                    warn!(
                        user_id = %actor.user_id(),
                        debt_id = %debt_id,
                        attempt,
                        "return conflict, retrying"
                    );
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Lists the actor's open debts, earliest due date first.
    ///
    /// # Errors
    ///
    /// Returns `Unauthenticated` if the actor is unknown or inactive.
    pub async fn list_open_debts(&self, actor: &Actor) -> Result<Vec<OpenDebtView>, InventoryError> {
        ensure_active_user(&self.db, actor.user_id()).await?;

        let today = Utc::now().date_naive();
        let rows = material_debts::Entity::find()
            .filter(material_debts::Column::UserId.eq(actor.user_id().into_inner()))
            .filter(material_debts::Column::Settled.eq(false))
            .find_also_related(materials::Entity)
            .order_by_asc(material_debts::Column::DueDate)
            .order_by_asc(material_debts::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(inventory_db_error)?;

        Ok(rows
            .into_iter()
            .map(|(debt, material)| OpenDebtView {
                debt_id: DebtId::from_uuid(debt.id),
                material_id: MaterialId::from_uuid(debt.material_id),
                material_name: material.map(|m| m.name).unwrap_or_default(),
                amount: debt.amount,
                due_date: debt.due_date,
                created_at: debt.created_at.with_timezone(&Utc),
                overdue: OpenDebtView::is_overdue(debt.due_date, today),
            })
            .collect())
    }

    /// Checkout history of a material, newest first.
    ///
    /// # Errors
    ///
    /// - `MaterialNotFound` if the material does not exist
    /// - `Unauthenticated` if the actor is unknown or inactive
    pub async fn material_history(
        &self,
        actor: &Actor,
        material_id: MaterialId,
    ) -> Result<Vec<LogEntry>, InventoryError> {
        ensure_active_user(&self.db, actor.user_id()).await?;

        materials::Entity::find_by_id(material_id.into_inner())
            .one(&self.db)
            .await
            .map_err(inventory_db_error)?
            .ok_or(InventoryError::MaterialNotFound(material_id.into_inner()))?;

        let logs = material_logs::Entity::find()
            .filter(material_logs::Column::MaterialId.eq(material_id.into_inner()))
            .order_by_desc(material_logs::Column::CreatedAt)
            .order_by_desc(material_logs::Column::Id)
            .all(&self.db)
            .await
            .map_err(inventory_db_error)?;

        Ok(logs.into_iter().map(log_entry).collect())
    }

    async fn begin(&self) -> Result<DatabaseTransaction, InventoryError> {
        self.db
            .begin_with_config(Some(IsolationLevel::ReadCommitted), None)
            .await
            .map_err(inventory_db_error)
    }

    async fn try_checkout(
        &self,
        actor: &Actor,
        material_id: MaterialId,
        quantity: Quantity,
        idempotency_key: Option<&IdempotencyKey>,
    ) -> Result<Receipt, InventoryError> {
        let txn = self.begin().await?;
        ensure_active_user(&txn, actor.user_id()).await?;

        if let Some(key) = idempotency_key
            && let Some(receipt) = find_replay(&txn, actor, material_id, quantity, key).await?
        {
            txn.commit().await.map_err(inventory_db_error)?;
            return Ok(receipt);
        }

        // Lock order: material row, then debt row.
        let material = lock_material(&txn, material_id).await?;
        let debt = lock_open_debt(&txn, actor.user_id(), material_id).await?;

        let stock = StockLevel::new(material.quantity, material.checked_out)?;
        let state = debt_state(debt.as_ref());
        let today = Utc::now().date_naive();

        let plan =
            ReconciliationService::plan_checkout(stock, state, quantity, today, self.due_days)?;
        let DebtState::Open(open) = plan.debt else {
            return Err(InventoryError::Internal(
                "checkout left the debt closed".to_string(),
            ));
        };

        let now = Utc::now();
        save_stock(&txn, material, plan.stock).await?;

        let debt = match debt {
            Some(existing) => {
                let mut active: material_debts::ActiveModel = existing.into();
                active.amount = Set(open.amount);
                active.updated_at = Set(now.into());
                active.update(&txn).await
            }
            None => {
                material_debts::ActiveModel {
                    id: Set(Uuid::now_v7()),
                    user_id: Set(actor.user_id().into_inner()),
                    material_id: Set(material_id.into_inner()),
                    amount: Set(open.amount),
                    due_date: Set(open.due_date),
                    settled: Set(false),
                    settled_at: Set(None),
                    created_at: Set(now.into()),
                    updated_at: Set(now.into()),
                }
                .insert(&txn)
                .await
            }
        }
        .map_err(inventory_db_error)?;

        let log = material_logs::ActiveModel {
            id: Set(Uuid::now_v7()),
            material_id: Set(material_id.into_inner()),
            user_id: Set(actor.user_id().into_inner()),
            debt_id: Set(debt.id),
            quantity: Set(quantity),
            on_hand_after: Set(plan.stock.on_hand()),
            debt_amount_after: Set(open.amount),
            idempotency_key: Set(idempotency_key.map(|k| k.as_str().to_string())),
            created_at: Set(now.into()),
        }
        .insert(&txn)
        .await
        .map_err(inventory_db_error)?;

        txn.commit().await.map_err(inventory_db_error)?;

        Ok(receipt(&log, debt.due_date, false))
    }

    async fn try_return(
        &self,
        actor: &Actor,
        debt_id: DebtId,
        quantity: Quantity,
    ) -> Result<DebtStatus, InventoryError> {
        let txn = self.begin().await?;
        ensure_active_user(&txn, actor.user_id()).await?;

        // Unlocked read to learn which material to lock first.
        let debt = find_open_debt(&txn, actor.user_id(), debt_id, false).await?;
        let material_id = MaterialId::from_uuid(debt.material_id);

        let material = lock_material(&txn, material_id).await?;
        // Re-read under lock: a concurrent return may have settled it meanwhile.
        let debt = find_open_debt(&txn, actor.user_id(), debt_id, true).await?;

        let stock = StockLevel::new(material.quantity, material.checked_out)?;
        let plan = ReconciliationService::plan_return(stock, debt_state(Some(&debt)), quantity)?;

        let now = Utc::now();
        let due_date = debt.due_date;
        save_stock(&txn, material, plan.stock).await?;

        let settled_at = plan.settles().then_some(now);
        let mut active: material_debts::ActiveModel = debt.into();
        active.amount = Set(plan.debt.amount());
        active.settled = Set(plan.settles());
        active.settled_at = Set(settled_at.map(Into::into));
        active.updated_at = Set(now.into());
        active.update(&txn).await.map_err(inventory_db_error)?;

        material_returns::ActiveModel {
            id: Set(Uuid::now_v7()),
            debt_id: Set(debt_id.into_inner()),
            material_id: Set(material_id.into_inner()),
            user_id: Set(actor.user_id().into_inner()),
            quantity: Set(quantity),
            created_at: Set(now.into()),
        }
        .insert(&txn)
        .await
        .map_err(inventory_db_error)?;

        txn.commit().await.map_err(inventory_db_error)?;

        Ok(DebtStatus {
            debt_id,
            material_id,
            returned: quantity,
            amount: plan.debt.amount(),
            settled: plan.settles(),
            settled_at,
            due_date,
            on_hand: plan.stock.on_hand(),
        })
    }
}

async fn ensure_active_user<C: ConnectionTrait>(
    conn: &C,
    user_id: UserId,
) -> Result<(), InventoryError> {
    let user = users::Entity::find_by_id(user_id.into_inner())
        .one(conn)
        .await
        .map_err(inventory_db_error)?;

    match user {
        Some(user) if user.is_active => Ok(()),
        _ => Err(InventoryError::Unauthenticated),
    }
}

async fn lock_material(
    txn: &DatabaseTransaction,
    material_id: MaterialId,
) -> Result<materials::Model, InventoryError> {
    materials::Entity::find_by_id(material_id.into_inner())
        .lock_exclusive()
        .one(txn)
        .await
        .map_err(inventory_db_error)?
        .ok_or(InventoryError::MaterialNotFound(material_id.into_inner()))
}

async fn lock_open_debt(
    txn: &DatabaseTransaction,
    user_id: UserId,
    material_id: MaterialId,
) -> Result<Option<material_debts::Model>, InventoryError> {
    material_debts::Entity::find()
        .filter(material_debts::Column::UserId.eq(user_id.into_inner()))
        .filter(material_debts::Column::MaterialId.eq(material_id.into_inner()))
        .filter(material_debts::Column::Settled.eq(false))
        .lock_exclusive()
        .one(txn)
        .await
        .map_err(inventory_db_error)
}

/// Finds an open debt owned by `user_id`. Debts of other users read as missing.
async fn find_open_debt(
    txn: &DatabaseTransaction,
    user_id: UserId,
    debt_id: DebtId,
    lock: bool,
) -> Result<material_debts::Model, InventoryError> {
    let mut query = material_debts::Entity::find_by_id(debt_id.into_inner())
        .filter(material_debts::Column::UserId.eq(user_id.into_inner()))
        .filter(material_debts::Column::Settled.eq(false));
    if lock {
        query = query.lock_exclusive();
    }

    query
        .one(txn)
        .await
        .map_err(inventory_db_error)?
        .ok_or(InventoryError::DebtNotFound(debt_id.into_inner()))
}

async fn save_stock(
    txn: &DatabaseTransaction,
    material: materials::Model,
    stock: StockLevel,
) -> Result<(), InventoryError> {
    let mut active: materials::ActiveModel = material.into();
    active.quantity = Set(stock.on_hand());
    active.checked_out = Set(stock.checked_out());
    active.updated_at = Set(Utc::now().into());
    active.update(txn).await.map_err(inventory_db_error)?;
    Ok(())
}

/// Looks up an earlier checkout made by this actor with the same key.
///
/// A key reused for a different material or quantity is rejected rather than
/// replayed.
async fn find_replay(
    txn: &DatabaseTransaction,
    actor: &Actor,
    material_id: MaterialId,
    quantity: Quantity,
    key: &IdempotencyKey,
) -> Result<Option<Receipt>, InventoryError> {
    let Some(log) = material_logs::Entity::find()
        .filter(material_logs::Column::UserId.eq(actor.user_id().into_inner()))
        .filter(material_logs::Column::IdempotencyKey.eq(key.as_str()))
        .one(txn)
        .await
        .map_err(inventory_db_error)?
    else {
        return Ok(None);
    };

    if log.material_id != material_id.into_inner() || log.quantity != quantity {
        return Err(InventoryError::InvalidIdempotencyKey);
    }

    let debt = material_debts::Entity::find_by_id(log.debt_id)
        .one(txn)
        .await
        .map_err(inventory_db_error)?
        .ok_or_else(|| InventoryError::Internal(format!("log {} has no debt", log.id)))?;

    Ok(Some(receipt(&log, debt.due_date, true)))
}

fn debt_state(debt: Option<&material_debts::Model>) -> DebtState {
    match debt {
        Some(d) if !d.settled => DebtState::Open(OpenDebt {
            amount: d.amount,
            due_date: d.due_date,
        }),
        Some(_) => DebtState::Settled,
        None => DebtState::NoDebt,
    }
}

fn receipt(log: &material_logs::Model, due_date: chrono::NaiveDate, replayed: bool) -> Receipt {
    Receipt {
        log_entry_id: LogEntryId::from_uuid(log.id),
        material_id: MaterialId::from_uuid(log.material_id),
        user_id: UserId::from_uuid(log.user_id),
        quantity: log.quantity,
        remaining_on_hand: log.on_hand_after,
        debt_id: DebtId::from_uuid(log.debt_id),
        debt_amount: log.debt_amount_after,
        due_date,
        created_at: log.created_at.with_timezone(&Utc),
        replayed,
    }
}

fn log_entry(log: material_logs::Model) -> LogEntry {
    LogEntry {
        id: LogEntryId::from_uuid(log.id),
        material_id: MaterialId::from_uuid(log.material_id),
        user_id: UserId::from_uuid(log.user_id),
        quantity: log.quantity,
        created_at: log.created_at.with_timezone(&Utc),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn debt_model(amount: i32, settled: bool) -> material_debts::Model {
        let now = Utc::now().into();
        material_debts::Model {
            id: Uuid::now_v7(),
            user_id: Uuid::now_v7(),
            material_id: Uuid::now_v7(),
            amount,
            due_date: NaiveDate::from_ymd_opt(2026, 3, 8).unwrap(),
            settled,
            settled_at: settled.then_some(now),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_debt_state_from_rows() {
        assert_eq!(debt_state(None), DebtState::NoDebt);
        assert_eq!(debt_state(Some(&debt_model(0, true))), DebtState::Settled);
        assert_eq!(
            debt_state(Some(&debt_model(3, false))),
            DebtState::Open(OpenDebt {
                amount: 3,
                due_date: NaiveDate::from_ymd_opt(2026, 3, 8).unwrap(),
            })
        );
    }

    #[test]
    fn test_receipt_from_log() {
        let log = material_logs::Model {
            id: Uuid::now_v7(),
            material_id: Uuid::now_v7(),
            user_id: Uuid::now_v7(),
            debt_id: Uuid::now_v7(),
            quantity: 3,
            on_hand_after: 2,
            debt_amount_after: 3,
            idempotency_key: Some("k".to_string()),
            created_at: Utc::now().into(),
        };
        let due = NaiveDate::from_ymd_opt(2026, 3, 8).unwrap();

        let r = receipt(&log, due, true);
        assert_eq!(r.log_entry_id.into_inner(), log.id);
        assert_eq!(r.remaining_on_hand, 2);
        assert_eq!(r.debt_amount, 3);
        assert_eq!(r.due_date, due);
        assert!(r.replayed);
    }
}
