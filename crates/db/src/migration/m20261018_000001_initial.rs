//! Initial database migration.
//!
//! Creates the users, catalog, stock, debt and audit tables together with the
//! constraints and triggers that keep the stock ledger consistent even if
//! application logic fails.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: USERS
        // ============================================================
        db.execute_unprepared(USERS_SQL).await?;
        db.execute_unprepared(USER_PROFILES_SQL).await?;

        // ============================================================
        // PART 2: CATALOG
        // ============================================================
        db.execute_unprepared(MATERIAL_TYPES_SQL).await?;
        db.execute_unprepared(SUPPLIERS_SQL).await?;
        db.execute_unprepared(MATERIALS_SQL).await?;

        // ============================================================
        // PART 3: DEBTS & AUDIT TRAIL
        // ============================================================
        db.execute_unprepared(MATERIAL_DEBTS_SQL).await?;
        db.execute_unprepared(MATERIAL_LOGS_SQL).await?;
        db.execute_unprepared(MATERIAL_RETURNS_SQL).await?;

        // ============================================================
        // PART 4: TRIGGERS & FUNCTIONS
        // ============================================================
        db.execute_unprepared(TRIGGERS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

const USERS_SQL: &str = r"
CREATE TABLE users (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    email VARCHAR(255) NOT NULL UNIQUE,
    password_hash VARCHAR(255) NOT NULL,
    full_name VARCHAR(255) NOT NULL,
    role VARCHAR(20) NOT NULL DEFAULT 'borrower',
    is_active BOOLEAN NOT NULL DEFAULT true,
    is_staff BOOLEAN NOT NULL DEFAULT false,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_user_role CHECK (role IN ('admin', 'staff', 'borrower'))
);
";

const USER_PROFILES_SQL: &str = r"
CREATE TABLE user_profiles (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    user_id UUID NOT NULL UNIQUE REFERENCES users(id) ON DELETE CASCADE,
    display_name VARCHAR(150) NOT NULL,
    bio TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const MATERIAL_TYPES_SQL: &str = r"
CREATE TABLE material_types (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(100) NOT NULL UNIQUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const SUPPLIERS_SQL: &str = r"
CREATE TABLE suppliers (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(150) NOT NULL UNIQUE,
    contact_email VARCHAR(255),
    phone VARCHAR(50),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const MATERIALS_SQL: &str = r"
CREATE TABLE materials (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    reference_code VARCHAR(50) NOT NULL UNIQUE,
    name VARCHAR(255) NOT NULL,
    quantity INTEGER NOT NULL,
    checked_out INTEGER NOT NULL DEFAULT 0,
    material_type_id UUID REFERENCES material_types(id) ON DELETE RESTRICT,
    supplier_id UUID REFERENCES suppliers(id) ON DELETE RESTRICT,
    purchase_date DATE,
    serial_number VARCHAR(100),
    created_by UUID NOT NULL REFERENCES users(id) ON DELETE RESTRICT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_quantity_non_negative CHECK (quantity >= 0),
    CONSTRAINT chk_checked_out_non_negative CHECK (checked_out >= 0)
);

CREATE INDEX idx_materials_name ON materials(name);
";

const MATERIAL_DEBTS_SQL: &str = r"
CREATE TABLE material_debts (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    user_id UUID NOT NULL REFERENCES users(id) ON DELETE RESTRICT,
    material_id UUID NOT NULL REFERENCES materials(id) ON DELETE RESTRICT,
    amount INTEGER NOT NULL,
    due_date DATE NOT NULL,
    settled BOOLEAN NOT NULL DEFAULT false,
    settled_at TIMESTAMPTZ,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_debt_amount_non_negative CHECK (amount >= 0),
    CONSTRAINT chk_open_debt_positive CHECK (settled OR amount > 0),
    CONSTRAINT chk_settled_at CHECK (settled = (settled_at IS NOT NULL))
);

-- At most one open debt per (user, material)
CREATE UNIQUE INDEX uq_material_debts_open
    ON material_debts(user_id, material_id)
    WHERE settled = false;

-- Borrower's open debts by due date
CREATE INDEX idx_material_debts_user_due
    ON material_debts(user_id, due_date)
    WHERE settled = false;
";

const MATERIAL_LOGS_SQL: &str = r"
CREATE TABLE material_logs (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    material_id UUID NOT NULL REFERENCES materials(id) ON DELETE RESTRICT,
    user_id UUID NOT NULL REFERENCES users(id) ON DELETE RESTRICT,
    debt_id UUID NOT NULL REFERENCES material_debts(id) ON DELETE RESTRICT,
    quantity INTEGER NOT NULL,
    on_hand_after INTEGER NOT NULL,
    debt_amount_after INTEGER NOT NULL,
    idempotency_key VARCHAR(255),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_log_quantity_positive CHECK (quantity > 0),
    CONSTRAINT uq_material_logs_idempotency UNIQUE (user_id, idempotency_key)
);

CREATE INDEX idx_material_logs_material ON material_logs(material_id, created_at DESC);
";

const MATERIAL_RETURNS_SQL: &str = r"
CREATE TABLE material_returns (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    debt_id UUID NOT NULL REFERENCES material_debts(id) ON DELETE RESTRICT,
    material_id UUID NOT NULL REFERENCES materials(id) ON DELETE RESTRICT,
    user_id UUID NOT NULL REFERENCES users(id) ON DELETE RESTRICT,
    quantity INTEGER NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_return_quantity_positive CHECK (quantity > 0)
);

CREATE INDEX idx_material_returns_debt ON material_returns(debt_id, created_at DESC);
";

const TRIGGERS_SQL: &str = r"
-- ============================================================
-- FUNCTION: prevent_audit_modification
-- Checkout logs and return events are append-only
-- ============================================================
CREATE OR REPLACE FUNCTION prevent_audit_modification()
RETURNS TRIGGER AS $$
BEGIN
    RAISE EXCEPTION 'Audit records are append-only: % on % is not allowed', TG_OP, TG_TABLE_NAME;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_material_logs_append_only
BEFORE UPDATE OR DELETE ON material_logs
FOR EACH ROW
EXECUTE FUNCTION prevent_audit_modification();

CREATE TRIGGER trg_material_returns_append_only
BEFORE UPDATE OR DELETE ON material_returns
FOR EACH ROW
EXECUTE FUNCTION prevent_audit_modification();

-- ============================================================
-- FUNCTION: touch_updated_at
-- ============================================================
CREATE OR REPLACE FUNCTION touch_updated_at()
RETURNS TRIGGER AS $$
BEGIN
    NEW.updated_at = now();
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_users_updated_at
BEFORE UPDATE ON users
FOR EACH ROW
EXECUTE FUNCTION touch_updated_at();

CREATE TRIGGER trg_user_profiles_updated_at
BEFORE UPDATE ON user_profiles
FOR EACH ROW
EXECUTE FUNCTION touch_updated_at();

CREATE TRIGGER trg_materials_updated_at
BEFORE UPDATE ON materials
FOR EACH ROW
EXECUTE FUNCTION touch_updated_at();

CREATE TRIGGER trg_material_debts_updated_at
BEFORE UPDATE ON material_debts
FOR EACH ROW
EXECUTE FUNCTION touch_updated_at();
";

const DROP_ALL_SQL: &str = r"
-- ============================================================
-- DROP ALL: Rollback migration
-- Order matters due to foreign key constraints
-- ============================================================

-- Drop triggers
DROP TRIGGER IF EXISTS trg_material_debts_updated_at ON material_debts;
DROP TRIGGER IF EXISTS trg_materials_updated_at ON materials;
DROP TRIGGER IF EXISTS trg_user_profiles_updated_at ON user_profiles;
DROP TRIGGER IF EXISTS trg_users_updated_at ON users;
DROP TRIGGER IF EXISTS trg_material_returns_append_only ON material_returns;
DROP TRIGGER IF EXISTS trg_material_logs_append_only ON material_logs;

-- Drop functions
DROP FUNCTION IF EXISTS touch_updated_at();
DROP FUNCTION IF EXISTS prevent_audit_modification();

-- Drop tables (reverse order of creation)
DROP TABLE IF EXISTS material_returns CASCADE;
DROP TABLE IF EXISTS material_logs CASCADE;
DROP TABLE IF EXISTS material_debts CASCADE;
DROP TABLE IF EXISTS materials CASCADE;
DROP TABLE IF EXISTS suppliers CASCADE;
DROP TABLE IF EXISTS material_types CASCADE;
DROP TABLE IF EXISTS user_profiles CASCADE;
DROP TABLE IF EXISTS users CASCADE;
";
