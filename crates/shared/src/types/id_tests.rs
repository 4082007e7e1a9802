use super::id::*;
use std::str::FromStr;
use uuid::Uuid;

#[test]
fn test_typed_id_creation() {
    let id = MaterialId::new();
    assert!(!id.to_string().is_empty());
}

#[test]
fn test_typed_ids_are_unique() {
    assert_ne!(DebtId::new(), DebtId::new());
}

#[test]
fn test_typed_id_from_uuid() {
    let uuid = Uuid::new_v4();
    assert_eq!(UserId::from_uuid(uuid).into_inner(), uuid);
    assert_eq!(UserId::from(uuid), UserId::from_uuid(uuid));
}

#[test]
fn test_typed_id_display() {
    let uuid = Uuid::new_v4();
    let id = MaterialId::from_uuid(uuid);
    assert_eq!(format!("{id}"), uuid.to_string());
}

#[test]
fn test_typed_id_from_str() {
    let uuid = Uuid::new_v4();
    let id = DebtId::from_str(&uuid.to_string()).unwrap();
    assert_eq!(id.into_inner(), uuid);
    assert!(DebtId::from_str("invalid").is_err());
}

#[test]
fn test_typed_id_serializes_transparently() {
    let uuid = Uuid::new_v4();
    let json = serde_json::to_string(&MaterialId::from_uuid(uuid)).unwrap();
    assert_eq!(json, format!("\"{uuid}\""));
}
