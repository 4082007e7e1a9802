//! Integration tests for the material catalog, types and suppliers.

mod common;

use avstock_core::reconciliation::InventoryError;
use avstock_db::repositories::{
    CatalogError, CreateMaterialInput, CreateSupplierInput, MaterialError, UpdateMaterialInput,
};
use avstock_db::{CatalogRepository, MaterialRepository};
use avstock_shared::types::{MaterialId, PageRequest};
use chrono::NaiveDate;
use uuid::Uuid;

use common::{connect, create_actor, create_material, reconciliation};

#[tokio::test]
async fn test_material_type_names_are_unique() {
    let Some(db) = connect().await else { return };
    let repo = CatalogRepository::new(db.clone());
    let name = format!("Lenses {}", Uuid::new_v4());

    let created = repo.create_material_type(&format!("  {name} ")).await.unwrap();
    assert_eq!(created.name, name);

    let dup = repo.create_material_type(&name).await;
    assert!(matches!(dup, Err(CatalogError::DuplicateName(n)) if n == name));

    let found = repo.find_material_type_by_name(&name).await.unwrap();
    assert_eq!(found.map(|t| t.id), Some(created.id));
    assert!(repo.list_material_types().await.unwrap().iter().any(|t| t.id == created.id));
}

#[tokio::test]
async fn test_supplier_names_are_unique() {
    let Some(db) = connect().await else { return };
    let repo = CatalogRepository::new(db.clone());
    let name = format!("Rental House {}", Uuid::new_v4());
    let supplier = || CreateSupplierInput {
        name: name.clone(),
        contact_email: Some("sales@rental.test".to_string()),
        phone: None,
    };

    let created = repo.create_supplier(supplier()).await.unwrap();
    assert_eq!(created.contact_email.as_deref(), Some("sales@rental.test"));
    assert!(matches!(
        repo.create_supplier(supplier()).await,
        Err(CatalogError::DuplicateName(_))
    ));
    assert!(matches!(
        repo.create_supplier(CreateSupplierInput {
            name: " ".to_string(),
            contact_email: None,
            phone: None,
        })
        .await,
        Err(CatalogError::EmptyName)
    ));
}

#[tokio::test]
async fn test_create_material_with_type_and_supplier() {
    let Some(db) = connect().await else { return };
    let actor = create_actor(&db).await;
    let catalog = CatalogRepository::new(db.clone());
    let kind = catalog
        .create_material_type(&format!("Cameras {}", Uuid::new_v4()))
        .await
        .unwrap();
    let supplier = catalog
        .create_supplier(CreateSupplierInput {
            name: format!("Supplier {}", Uuid::new_v4()),
            contact_email: None,
            phone: None,
        })
        .await
        .unwrap();

    let repo = MaterialRepository::new(db.clone());
    let code = format!("CAM-{}", Uuid::new_v4());
    let input = CreateMaterialInput {
        reference_code: code.clone(),
        name: "Camera A".to_string(),
        quantity: 5,
        material_type_id: Some(kind.id),
        supplier_id: Some(supplier.id),
        purchase_date: NaiveDate::from_ymd_opt(2025, 9, 1),
        serial_number: Some("SN-0001".to_string()),
        created_by: actor.user_id().into_inner(),
    };

    let material = repo.create(input.clone()).await.unwrap();
    assert_eq!(material.quantity, 5);
    assert_eq!(material.checked_out, 0);
    assert_eq!(material.created_by, actor.user_id().into_inner());

    assert!(matches!(
        repo.create(input.clone()).await,
        Err(MaterialError::DuplicateReference(c)) if c == code
    ));
    assert!(matches!(
        repo.create(CreateMaterialInput {
            reference_code: format!("CAM-{}", Uuid::new_v4()),
            quantity: -1,
            ..input.clone()
        })
        .await,
        Err(MaterialError::Stock(InventoryError::InvalidQuantity(-1)))
    ));
    assert!(matches!(
        repo.create(CreateMaterialInput {
            reference_code: format!("CAM-{}", Uuid::new_v4()),
            material_type_id: Some(Uuid::now_v7()),
            ..input
        })
        .await,
        Err(MaterialError::UnknownType(_))
    ));
}

#[tokio::test]
async fn test_admin_edit_adjusts_on_hand_only() {
    let Some(db) = connect().await else { return };
    let actor = create_actor(&db).await;
    let camera = create_material(&db, &actor, "Camera A", 5).await;
    reconciliation(&db)
        .checkout(&actor, MaterialId::from_uuid(camera.id), 2, None)
        .await
        .unwrap();

    let repo = MaterialRepository::new(db.clone());
    let updated = repo
        .update(
            camera.id,
            UpdateMaterialInput {
                name: Some("Camera A (body only)".to_string()),
                quantity: Some(10),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.name, "Camera A (body only)");
    assert_eq!(updated.quantity, 10);
    assert_eq!(updated.checked_out, 2);

    assert!(matches!(
        repo.update(
            camera.id,
            UpdateMaterialInput {
                quantity: Some(-3),
                ..Default::default()
            }
        )
        .await,
        Err(MaterialError::Stock(InventoryError::InvalidQuantity(-3)))
    ));
    assert!(matches!(
        repo.update(Uuid::now_v7(), UpdateMaterialInput::default()).await,
        Err(MaterialError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_list_is_paginated() {
    let Some(db) = connect().await else { return };
    let actor = create_actor(&db).await;
    for i in 0..3 {
        create_material(&db, &actor, &format!("Cable {i}"), 1).await;
    }

    let repo = MaterialRepository::new(db.clone());
    let page = repo
        .list(&PageRequest {
            page: 1,
            per_page: 2,
        })
        .await
        .unwrap();

    assert_eq!(page.materials.len(), 2);
    assert!(page.total >= 3);
}
