//! Concurrent checkout and return stress tests.
//!
//! These verify that:
//! - Concurrent checkouts by one user on one material produce exactly one open debt
//! - Stock never goes negative when borrowers race for the last units
//! - Interleaved checkouts and returns on the same pair leave consistent totals
//! - Concurrent retries of one idempotent checkout apply it once

#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_possible_truncation)]

mod common;

use std::sync::Arc;

use avstock_core::audit::IdempotencyKey;
use avstock_core::reconciliation::InventoryError;
use avstock_db::entities::material_debts;
use avstock_shared::types::MaterialId;
use futures::future::join_all;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use tokio::sync::Barrier;

use common::{connect, create_actor, create_material, reconciliation, reload};

const TASKS: usize = 10;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_checkouts_single_open_debt() {
    let Some(db) = connect().await else { return };
    let actor = create_actor(&db).await;
    let tripod = create_material(&db, &actor, "Tripod B", 100).await;
    let repo = reconciliation(&db);
    let material_id = MaterialId::from_uuid(tripod.id);
    let barrier = Arc::new(Barrier::new(TASKS));

    let handles = (0..TASKS).map(|_| {
        let repo = repo.clone();
        let barrier = Arc::clone(&barrier);
        tokio::spawn(async move {
            barrier.wait().await;
            repo.checkout(&actor, material_id, 1, None).await
        })
    });

    let results: Vec<_> = join_all(handles)
        .await
        .into_iter()
        .map(|joined| joined.expect("task panicked"))
        .collect();

    let succeeded = results.iter().filter(|r| r.is_ok()).count() as i32;
    for result in &results {
        if let Err(err) = result {
            assert!(
                matches!(err, InventoryError::ConcurrencyConflict),
                "unexpected error: {err}"
            );
        }
    }

    let debts = material_debts::Entity::find()
        .filter(material_debts::Column::UserId.eq(actor.user_id().into_inner()))
        .filter(material_debts::Column::MaterialId.eq(tripod.id))
        .filter(material_debts::Column::Settled.eq(false))
        .all(&db)
        .await
        .unwrap();
    assert_eq!(debts.len(), 1, "exactly one open debt");
    assert_eq!(debts[0].amount, succeeded);

    let material = reload(&db, tripod.id).await;
    assert_eq!(material.quantity, 100 - succeeded);
    assert_eq!(material.checked_out, succeeded);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_race_for_last_units_never_oversells() {
    let Some(db) = connect().await else { return };
    let staff = create_actor(&db).await;
    let camera = create_material(&db, &staff, "Camera A", 5).await;
    let repo = reconciliation(&db);
    let material_id = MaterialId::from_uuid(camera.id);

    let mut borrowers = Vec::with_capacity(TASKS);
    for _ in 0..TASKS {
        borrowers.push(create_actor(&db).await);
    }
    let barrier = Arc::new(Barrier::new(TASKS));

    let handles = borrowers.into_iter().map(|actor| {
        let repo = repo.clone();
        let barrier = Arc::clone(&barrier);
        tokio::spawn(async move {
            barrier.wait().await;
            repo.checkout(&actor, material_id, 1, None).await
        })
    });

    let results: Vec<_> = join_all(handles)
        .await
        .into_iter()
        .map(|joined| joined.expect("task panicked"))
        .collect();

    let succeeded = results.iter().filter(|r| r.is_ok()).count();
    let insufficient = results
        .iter()
        .filter(|r| matches!(r, Err(InventoryError::InsufficientStock { .. })))
        .count();

    assert_eq!(succeeded, 5);
    assert_eq!(insufficient, TASKS - 5);

    let material = reload(&db, camera.id).await;
    assert_eq!(material.quantity, 0);
    assert_eq!(material.checked_out, 5);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_interleaved_checkouts_and_returns() {
    let Some(db) = connect().await else { return };
    let actor = create_actor(&db).await;
    let light = create_material(&db, &actor, "LED Panel", 50).await;
    let repo = reconciliation(&db);
    let material_id = MaterialId::from_uuid(light.id);

    // Open a debt large enough that every return below can succeed.
    let receipt = repo.checkout(&actor, material_id, 20, None).await.unwrap();
    let debt_id = receipt.debt_id;
    let barrier = Arc::new(Barrier::new(TASKS));

    let handles = (0..TASKS).map(|i| {
        let repo = repo.clone();
        let barrier = Arc::clone(&barrier);
        tokio::spawn(async move {
            barrier.wait().await;
            if i % 2 == 0 {
                repo.checkout(&actor, material_id, 1, None).await.map(|_| 1)
            } else {
                repo.return_material(&actor, debt_id, 1).await.map(|_| -1)
            }
        })
    });

    let deltas: Vec<i32> = join_all(handles)
        .await
        .into_iter()
        .map(|joined| joined.expect("task panicked"))
        .filter_map(Result::ok)
        .collect();
    let net: i32 = deltas.iter().sum();

    let material = reload(&db, light.id).await;
    assert_eq!(material.checked_out, 20 + net);
    assert_eq!(material.quantity + material.checked_out, 50);

    let debt = material_debts::Entity::find_by_id(debt_id.into_inner())
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(debt.amount, 20 + net);
    assert!(!debt.settled);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_same_key_checkout_applies_once() {
    const RETRIES: usize = 5;

    let Some(db) = connect().await else { return };
    let actor = create_actor(&db).await;
    let mixer = create_material(&db, &actor, "Audio Mixer", 50).await;
    let repo = reconciliation(&db);
    let material_id = MaterialId::from_uuid(mixer.id);
    let key = IdempotencyKey::parse("mixer-shoot-42").unwrap();
    let barrier = Arc::new(Barrier::new(RETRIES));

    let handles = (0..RETRIES).map(|_| {
        let repo = repo.clone();
        let key = key.clone();
        let barrier = Arc::clone(&barrier);
        tokio::spawn(async move {
            barrier.wait().await;
            repo.checkout(&actor, material_id, 3, Some(&key)).await
        })
    });

    let receipts: Vec<_> = join_all(handles)
        .await
        .into_iter()
        .map(|joined| joined.expect("task panicked").expect("checkout"))
        .collect();

    let fresh = receipts.iter().filter(|r| !r.replayed).count();
    assert_eq!(fresh, 1, "exactly one checkout is applied");
    assert_eq!(receipts.len() - fresh, RETRIES - 1);
    let log_entry_id = receipts[0].log_entry_id;
    assert!(receipts.iter().all(|r| r.log_entry_id == log_entry_id));
    assert!(receipts.iter().all(|r| r.debt_amount == 3));

    let material = reload(&db, mixer.id).await;
    assert_eq!(material.quantity, 47);
    assert_eq!(material.checked_out, 3);
}
