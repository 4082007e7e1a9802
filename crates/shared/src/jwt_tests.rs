use chrono::{Duration, TimeZone, Utc};
use uuid::Uuid;

use crate::auth::Claims;
use crate::jwt::{JwtConfig, JwtError, JwtService};

const SECRET: &str = "stock-room-secret";

fn service(minutes: i64) -> JwtService {
    JwtService::new(JwtConfig {
        secret: SECRET.to_string(),
        access_token_expires_minutes: minutes,
    })
}

#[test]
fn test_claims_expiry_follows_ttl() {
    let issued = Utc.with_ymd_and_hms(2026, 10, 18, 9, 0, 0).unwrap();
    let claims = Claims::new(Uuid::now_v7(), "borrower", issued, Duration::minutes(30));

    assert_eq!(claims.iat, issued.timestamp());
    assert_eq!(claims.expires_at(), Some(issued + Duration::minutes(30)));
}

#[test]
fn test_issued_token_verifies() {
    let user_id = Uuid::now_v7();
    let token = service(15).issue(user_id, "staff").unwrap();

    let claims = service(15).verify(&token).unwrap();

    assert_eq!(claims.user_id(), user_id);
    assert_eq!(claims.role, "staff");
}

#[test]
fn test_garbage_is_invalid() {
    assert!(matches!(
        service(15).verify("not.a.token"),
        Err(JwtError::Invalid(_))
    ));
}

#[test]
fn test_foreign_secret_is_invalid() {
    let foreign = JwtService::new(JwtConfig {
        secret: "someone-else".to_string(),
        access_token_expires_minutes: 15,
    });
    let token = foreign.issue(Uuid::now_v7(), "staff").unwrap();

    assert!(matches!(service(15).verify(&token), Err(JwtError::Invalid(_))));
}

#[test]
fn test_expired_token_reports_expiry() {
    let token = service(-10).issue(Uuid::now_v7(), "borrower").unwrap();

    assert!(matches!(service(15).verify(&token), Err(JwtError::Expired)));
}
