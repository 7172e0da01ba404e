//! Initial database migration.
//!
//! Creates enums, tables, indexes and the triggers that keep the customer
//! ledger append-only and finalized closings frozen.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: CUSTOMERS & LEDGER
        // ============================================================
        db.execute_unprepared(CUSTOMERS_SQL).await?;
        db.execute_unprepared(CUSTOMER_ACCOUNTS_SQL).await?;
        db.execute_unprepared(CUSTOMER_TRANSACTIONS_SQL).await?;

        // ============================================================
        // PART 3: INVENTORY & SALES
        // ============================================================
        db.execute_unprepared(PRODUCTS_SQL).await?;
        db.execute_unprepared(SALES_SQL).await?;
        db.execute_unprepared(SALE_ITEMS_SQL).await?;
        db.execute_unprepared(PAYMENTS_SQL).await?;

        // ============================================================
        // PART 4: CASH REGISTER
        // ============================================================
        db.execute_unprepared(CASH_CLOSINGS_SQL).await?;
        db.execute_unprepared(EXPENSES_SQL).await?;

        // ============================================================
        // PART 5: TRIGGERS & FUNCTIONS
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

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
-- Ledger transaction type
CREATE TYPE transaction_type AS ENUM (
    'sale',
    'payment',
    'credit_note',
    'debit_note',
    'credit_application',
    'opening_balance',
    'adjustment',
    'repair_deposit',
    'void_sale'
);

-- How a sale or payment was settled
CREATE TYPE payment_method AS ENUM (
    'cash',
    'transfer',
    'card',
    'mixed',
    'credit',
    'account_credit'
);

-- Derived sale status
CREATE TYPE payment_status AS ENUM ('pending', 'partial', 'paid', 'voided');

-- What a payment row settles
CREATE TYPE payment_kind AS ENUM (
    'sale_payment',
    'debt_payment',
    'advance_payment',
    'credit_application'
);
";

const CUSTOMERS_SQL: &str = r"
CREATE TABLE customers (
    id UUID PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    phone VARCHAR(50),
    email VARCHAR(255),
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_customers_name ON customers(name);
";

const CUSTOMER_ACCOUNTS_SQL: &str = r"
CREATE TABLE customer_accounts (
    id UUID PRIMARY KEY,
    customer_id UUID NOT NULL UNIQUE REFERENCES customers(id) ON DELETE RESTRICT,

    -- Positive = customer owes, negative = customer holds credit
    account_balance NUMERIC(10, 2) NOT NULL DEFAULT 0,
    credit_limit NUMERIC(10, 2) NOT NULL DEFAULT 0,
    available_credit NUMERIC(10, 2) NOT NULL DEFAULT 0,

    -- Lifetime aggregates
    total_sales NUMERIC(12, 2) NOT NULL DEFAULT 0,
    total_payments NUMERIC(12, 2) NOT NULL DEFAULT 0,
    total_credit_notes NUMERIC(12, 2) NOT NULL DEFAULT 0,
    total_debit_notes NUMERIC(12, 2) NOT NULL DEFAULT 0,
    transaction_count BIGINT NOT NULL DEFAULT 0,

    last_transaction_date TIMESTAMPTZ,
    last_payment_date TIMESTAMPTZ,

    is_active BOOLEAN NOT NULL DEFAULT true,
    blocked_until TIMESTAMPTZ,
    block_reason TEXT,

    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT chk_credit_limit_non_negative CHECK (credit_limit >= 0),
    CONSTRAINT chk_available_credit_non_negative CHECK (available_credit >= 0)
);

CREATE INDEX idx_customer_accounts_balance ON customer_accounts(account_balance)
    WHERE account_balance <> 0;
CREATE INDEX idx_customer_accounts_last_payment ON customer_accounts(last_payment_date);
";

const CUSTOMER_TRANSACTIONS_SQL: &str = r"
CREATE TABLE customer_transactions (
    id UUID PRIMARY KEY,
    customer_id UUID NOT NULL REFERENCES customers(id) ON DELETE RESTRICT,
    account_id UUID NOT NULL REFERENCES customer_accounts(id) ON DELETE RESTRICT,
    transaction_type transaction_type NOT NULL,

    -- Magnitude only; direction comes from transaction_type
    amount NUMERIC(10, 2) NOT NULL,
    balance_before NUMERIC(10, 2) NOT NULL,
    balance_after NUMERIC(10, 2) NOT NULL,

    -- Loose link to the originating document
    reference_type VARCHAR(20),
    reference_id UUID,

    description TEXT,
    transaction_date TIMESTAMPTZ NOT NULL,
    created_by BIGINT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT chk_customer_transaction_amount_positive CHECK (amount > 0),
    CONSTRAINT uq_customer_transactions_id_created UNIQUE (id, created_at)
);

CREATE INDEX idx_customer_transactions_customer_date
    ON customer_transactions(customer_id, transaction_date, created_at);
CREATE INDEX idx_customer_transactions_reference
    ON customer_transactions(reference_type, reference_id);
";

const PRODUCTS_SQL: &str = r"
CREATE TABLE products (
    id UUID PRIMARY KEY,
    sku VARCHAR(64) NOT NULL UNIQUE,
    name VARCHAR(255) NOT NULL,
    price NUMERIC(10, 2) NOT NULL,
    stock INTEGER NOT NULL DEFAULT 0,
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT chk_product_price_non_negative CHECK (price >= 0),
    CONSTRAINT chk_product_stock_non_negative CHECK (stock >= 0)
);
";

const SALES_SQL: &str = r"
CREATE TABLE sales (
    id UUID PRIMARY KEY,
    customer_id UUID REFERENCES customers(id) ON DELETE RESTRICT,
    sale_date TIMESTAMPTZ NOT NULL,

    subtotal NUMERIC(10, 2) NOT NULL,
    discount_amount NUMERIC(10, 2) NOT NULL DEFAULT 0,
    tax_rate NUMERIC(5, 2) NOT NULL DEFAULT 0,
    tax_amount NUMERIC(10, 2) NOT NULL DEFAULT 0,
    total_amount NUMERIC(10, 2) NOT NULL,
    paid_amount NUMERIC(10, 2) NOT NULL DEFAULT 0,
    change_amount NUMERIC(10, 2) NOT NULL DEFAULT 0,

    payment_status payment_status NOT NULL DEFAULT 'pending',
    payment_method payment_method NOT NULL,

    -- Per-method components for breakdown reporting
    cash_amount NUMERIC(10, 2),
    transfer_amount NUMERIC(10, 2),
    card_amount NUMERIC(10, 2),
    credit_amount NUMERIC(10, 2),

    notes TEXT,

    is_voided BOOLEAN NOT NULL DEFAULT false,
    void_reason TEXT,
    voided_at TIMESTAMPTZ,
    voided_by BIGINT,

    created_by BIGINT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT chk_sale_total_non_negative CHECK (total_amount >= 0),
    CONSTRAINT chk_sale_paid_non_negative CHECK (paid_amount >= 0),
    CONSTRAINT chk_sale_change_non_negative CHECK (change_amount >= 0)
);

CREATE INDEX idx_sales_sale_date ON sales(sale_date) WHERE is_voided = false;
CREATE INDEX idx_sales_customer ON sales(customer_id, sale_date);
";

const SALE_ITEMS_SQL: &str = r"
CREATE TABLE sale_items (
    id UUID PRIMARY KEY,
    sale_id UUID NOT NULL REFERENCES sales(id) ON DELETE CASCADE,
    product_id UUID NOT NULL REFERENCES products(id) ON DELETE RESTRICT,
    quantity INTEGER NOT NULL,
    unit_price NUMERIC(10, 2) NOT NULL,
    discount NUMERIC(10, 2) NOT NULL DEFAULT 0,
    line_total NUMERIC(10, 2) NOT NULL,

    CONSTRAINT chk_sale_item_quantity_positive CHECK (quantity > 0)
);

CREATE INDEX idx_sale_items_sale ON sale_items(sale_id);
";

const PAYMENTS_SQL: &str = r"
CREATE TABLE payments (
    id UUID PRIMARY KEY,
    sale_id UUID REFERENCES sales(id) ON DELETE RESTRICT,
    customer_id UUID REFERENCES customers(id) ON DELETE RESTRICT,
    amount NUMERIC(10, 2) NOT NULL,
    payment_method payment_method NOT NULL,
    payment_kind payment_kind NOT NULL,
    payment_date TIMESTAMPTZ NOT NULL,
    notes TEXT,
    is_voided BOOLEAN NOT NULL DEFAULT false,
    voided_at TIMESTAMPTZ,
    created_by BIGINT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT chk_payment_amount_positive CHECK (amount > 0)
);

CREATE INDEX idx_payments_sale ON payments(sale_id) WHERE sale_id IS NOT NULL;
CREATE INDEX idx_payments_date ON payments(payment_date) WHERE is_voided = false;
";

const CASH_CLOSINGS_SQL: &str = r"
CREATE TABLE cash_closings (
    id UUID PRIMARY KEY,
    closing_date DATE NOT NULL,

    opening_balance NUMERIC(10, 2) NOT NULL DEFAULT 0,
    sales_total NUMERIC(10, 2) NOT NULL DEFAULT 0,
    expenses_total NUMERIC(10, 2) NOT NULL DEFAULT 0,
    cash_count NUMERIC(10, 2),
    expected_cash NUMERIC(10, 2),
    cash_difference NUMERIC(10, 2),
    notes TEXT,

    opened_at TIMESTAMPTZ NOT NULL,
    opened_by BIGINT NOT NULL,
    closed_at TIMESTAMPTZ,
    closed_by BIGINT,
    is_finalized BOOLEAN NOT NULL DEFAULT false,
    finalized_at TIMESTAMPTZ,
    finalized_by BIGINT,

    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT uq_cash_closings_date UNIQUE (closing_date),
    CONSTRAINT chk_opening_balance_non_negative CHECK (opening_balance >= 0),
    CONSTRAINT chk_cash_count_non_negative CHECK (cash_count IS NULL OR cash_count >= 0)
);

-- At most one register may be unfinalized at any time
CREATE UNIQUE INDEX uq_cash_closings_single_open
    ON cash_closings ((is_finalized))
    WHERE is_finalized = false;
";

const EXPENSES_SQL: &str = r"
CREATE TABLE expenses (
    id UUID PRIMARY KEY,
    expense_date DATE NOT NULL,
    amount NUMERIC(10, 2) NOT NULL,
    payment_method payment_method NOT NULL,
    category VARCHAR(100),
    description TEXT NOT NULL,
    created_by BIGINT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT chk_expense_amount_positive CHECK (amount > 0)
);

CREATE INDEX idx_expenses_date ON expenses(expense_date);
";

const TRIGGERS_SQL: &str = r"
-- ============================================================
-- FUNCTION: prevent_ledger_modification
-- Ledger rows are append-only; corrections are new rows
-- ============================================================
CREATE OR REPLACE FUNCTION prevent_ledger_modification()
RETURNS TRIGGER AS $$
BEGIN
    RAISE EXCEPTION 'customer_transactions is append-only. Post a reversing transaction instead.';
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_customer_transactions_immutable
BEFORE UPDATE OR DELETE ON customer_transactions
FOR EACH ROW
EXECUTE FUNCTION prevent_ledger_modification();

-- ============================================================
-- FUNCTION: prevent_finalized_closing_update
-- A finalized closing is frozen
-- ============================================================
CREATE OR REPLACE FUNCTION prevent_finalized_closing_update()
RETURNS TRIGGER AS $$
BEGIN
    IF OLD.is_finalized THEN
        RAISE EXCEPTION 'Cannot modify finalized cash closing for %', OLD.closing_date;
    END IF;
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_cash_closings_finalized
BEFORE UPDATE ON cash_closings
FOR EACH ROW
EXECUTE FUNCTION prevent_finalized_closing_update();
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS expenses CASCADE;
DROP TABLE IF EXISTS cash_closings CASCADE;
DROP TABLE IF EXISTS payments CASCADE;
DROP TABLE IF EXISTS sale_items CASCADE;
DROP TABLE IF EXISTS sales CASCADE;
DROP TABLE IF EXISTS products CASCADE;
DROP TABLE IF EXISTS customer_transactions CASCADE;
DROP TABLE IF EXISTS customer_accounts CASCADE;
DROP TABLE IF EXISTS customers CASCADE;

DROP FUNCTION IF EXISTS prevent_finalized_closing_update();
DROP FUNCTION IF EXISTS prevent_ledger_modification();

DROP TYPE IF EXISTS payment_kind;
DROP TYPE IF EXISTS payment_status;
DROP TYPE IF EXISTS payment_method;
DROP TYPE IF EXISTS transaction_type;
";
