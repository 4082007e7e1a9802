//! Database seeder for Audiovisual Stock development and testing.
//!
//! Seeds material types, suppliers, a staff account and a few materials,
//! then prints an access token for the staff account.
//!
//! Usage: cargo run --bin seeder

use chrono::{Duration, Utc};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use avstock_core::auth::UserRole;
use avstock_db::repositories::{
    CatalogError, CatalogRepository, CreateMaterialInput, CreateSupplierInput, CreateUserInput,
    MaterialError, MaterialRepository, UserError, UserRepository,
};
use avstock_shared::{AppConfig, JwtConfig, JwtService};

const STAFF_EMAIL: &str = "staff@avstock.dev";
const STAFF_PASSWORD: &str = "avstock-dev-password";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = avstock_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    println!("Seeding material types...");
    let camera_type = seed_material_types(&db).await;

    println!("Seeding suppliers...");
    let supplier = seed_suppliers(&db).await;

    println!("Seeding staff user...");
    let staff_id = seed_staff_user(&db).await;

    println!("Seeding materials...");
    seed_materials(&db, staff_id, camera_type, supplier).await;

    print_dev_token(staff_id);

    println!("Seeding complete!");
}

/// Seeds the material types and returns the id of "Cameras".
async fn seed_material_types(db: &DatabaseConnection) -> Option<Uuid> {
    let repo = CatalogRepository::new(db.clone());

    for name in ["Cameras", "Tripods", "Lighting", "Audio"] {
        match repo.create_material_type(name).await {
            Ok(_) => println!("  Created material type: {name}"),
            Err(CatalogError::DuplicateName(_)) => {
                println!("  Material type {name} already exists, skipping...");
            }
            Err(e) => eprintln!("Failed to insert material type {name}: {e}"),
        }
    }

    repo.find_material_type_by_name("Cameras")
        .await
        .ok()
        .flatten()
        .map(|t| t.id)
}

/// Seeds the suppliers and returns the id of the first one.
async fn seed_suppliers(db: &DatabaseConnection) -> Option<Uuid> {
    let repo = CatalogRepository::new(db.clone());

    let suppliers = [
        ("Studio Rental House", Some("rentals@studio.example"), None),
        ("Broadcast Supply Co", None, Some("+1 555 0100")),
    ];

    for (name, email, phone) in suppliers {
        let input = CreateSupplierInput {
            name: name.to_string(),
            contact_email: email.map(str::to_string),
            phone: phone.map(str::to_string),
        };
        match repo.create_supplier(input).await {
            Ok(_) => println!("  Created supplier: {name}"),
            Err(CatalogError::DuplicateName(_)) => {
                println!("  Supplier {name} already exists, skipping...");
            }
            Err(e) => eprintln!("Failed to insert supplier {name}: {e}"),
        }
    }

    repo.find_supplier_by_name(suppliers[0].0)
        .await
        .ok()
        .flatten()
        .map(|s| s.id)
}

/// Seeds the staff account through the user factory.
async fn seed_staff_user(db: &DatabaseConnection) -> Uuid {
    let repo = UserRepository::new(db.clone());

    let input = CreateUserInput {
        email: STAFF_EMAIL.to_string(),
        password: STAFF_PASSWORD.to_string(),
        full_name: "Stock Keeper".to_string(),
        role: UserRole::Staff,
        is_staff: true,
        bio: Some("Seeded development account".to_string()),
    };

    match repo.create_with_profile(input).await {
        Ok(created) => {
            println!("  Created staff user: {STAFF_EMAIL}");
            created.user.id
        }
        Err(UserError::EmailTaken(_)) => {
            println!("  Staff user already exists, skipping...");
            repo.find_by_email(STAFF_EMAIL)
                .await
                .expect("Failed to look up staff user")
                .expect("Staff user should exist")
                .id
        }
        Err(e) => panic!("Failed to create staff user: {e}"),
    }
}

/// Seeds sample materials owned by the staff account.
async fn seed_materials(
    db: &DatabaseConnection,
    staff_id: Uuid,
    camera_type: Option<Uuid>,
    supplier: Option<Uuid>,
) {
    let repo = MaterialRepository::new(db.clone());
    let purchased = (Utc::now() - Duration::days(90)).date_naive();

    let materials = [
        ("CAM-A", "Camera A", 5, camera_type, Some("SN-CAM-0001")),
        ("TRI-B", "Tripod B", 4, None, None),
        ("MIC-C", "Shotgun Microphone C", 10, None, Some("SN-MIC-0042")),
    ];

    let mut inserted = 0;
    for (reference_code, name, quantity, material_type_id, serial) in materials {
        let input = CreateMaterialInput {
            reference_code: reference_code.to_string(),
            name: name.to_string(),
            quantity,
            material_type_id,
            supplier_id: supplier,
            purchase_date: Some(purchased),
            serial_number: serial.map(str::to_string),
            created_by: staff_id,
        };

        match repo.create(input).await {
            Ok(_) => inserted += 1,
            Err(MaterialError::DuplicateReference(_)) => {}
            Err(e) => eprintln!("Failed to insert material {reference_code}: {e}"),
        }
    }

    println!("  Inserted {inserted} materials");
}

/// Prints a bearer token for the staff account.
fn print_dev_token(staff_id: Uuid) {
    let secret = match AppConfig::load() {
        Ok(config) => config.jwt.secret,
        Err(e) => {
            eprintln!("Failed to load configuration, no token printed: {e}");
            return;
        }
    };

    let jwt = JwtService::new(JwtConfig {
        secret,
        access_token_expires_minutes: 60 * 24,
    });

    match jwt.issue(staff_id, UserRole::Staff.as_str()) {
        Ok(token) => println!("Development token (24h):\n  Bearer {token}"),
        Err(e) => eprintln!("Failed to generate development token: {e}"),
    }
}
