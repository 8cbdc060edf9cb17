/// DuckDB initialization SQL.
///
/// Executed once at database open time via `Connection::execute_batch`.
/// All statements use `IF NOT EXISTS` so they are safe to re-run on every
/// startup (idempotent).
///
/// `memory_limit` is passed at runtime from `Config.duckdb_memory_limit`
/// (env `FLEETBOARD_DUCKDB_MEMORY`, default `"1GB"`). Always set an explicit
/// limit — the DuckDB default (80% of system RAM) is not acceptable for a
/// server process. `SET threads = 2` limits the background thread pool for
/// single-writer embedded use.
///
/// DuckDB does not support `ALTER TABLE ... DROP CONSTRAINT`, so no FOREIGN
/// KEY constraints are declared; cross-table deletes cascade manually inside
/// one transaction (child rows first, parent last).
pub fn init_sql(memory_limit: &str) -> String {
    format!(
        r#"SET memory_limit = '{memory_limit}';
SET threads = 2;

-- ===========================================
-- SETTINGS
-- ===========================================
-- Keys stored in this table:
--   'jwt_secret' – 32-byte random hex used to sign session tokens
--   'version'    – Database schema version (for migrations)
--   'install_id' – Unique installation identifier
CREATE TABLE IF NOT EXISTS settings (
    key             VARCHAR PRIMARY KEY,
    value           VARCHAR NOT NULL
);

-- ===========================================
-- USERS (dashboard operators)
-- ===========================================
CREATE TABLE IF NOT EXISTS users (
    id              VARCHAR PRIMARY KEY,           -- 'usr_' + 10 alnum chars
    tenant_id       VARCHAR,                       -- NULL in self-hosted mode
    email           VARCHAR NOT NULL UNIQUE,
    password_hash   VARCHAR NOT NULL,              -- Argon2id PHC string
    display_name    VARCHAR NOT NULL,
    role            VARCHAR NOT NULL DEFAULT 'operator',
    created_at      TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at      TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
);
CREATE INDEX IF NOT EXISTS idx_users_email ON users(email);

-- ===========================================
-- SHOPS (dealership branches)
-- ===========================================
CREATE TABLE IF NOT EXISTS shops (
    id              VARCHAR PRIMARY KEY,           -- 'shop_' + 10 alnum chars
    tenant_id       VARCHAR,
    name            VARCHAR NOT NULL,
    city            VARCHAR,
    address         VARCHAR,
    phone           VARCHAR,
    image_url       VARCHAR,                       -- public object-storage URL
    created_at      TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at      TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
);
CREATE INDEX IF NOT EXISTS idx_shops_tenant ON shops(tenant_id);

-- ===========================================
-- CARS (inventory)
-- ===========================================
CREATE TABLE IF NOT EXISTS cars (
    id              VARCHAR PRIMARY KEY,           -- 'car_' + 10 alnum chars
    tenant_id       VARCHAR,
    shop_id         VARCHAR,                       -- owning branch (nullable)
    make            VARCHAR NOT NULL,
    model           VARCHAR NOT NULL,
    year            INTEGER NOT NULL,
    sale_price      DOUBLE NOT NULL,
    status          VARCHAR NOT NULL DEFAULT 'available',  -- 'available' | 'sold'
    image_url       VARCHAR,
    created_at      TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at      TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
);
CREATE INDEX IF NOT EXISTS idx_cars_tenant     ON cars(tenant_id);
CREATE INDEX IF NOT EXISTS idx_cars_status     ON cars(status);
CREATE INDEX IF NOT EXISTS idx_cars_created_at ON cars(created_at);

-- ===========================================
-- CUSTOMERS
-- ===========================================
CREATE TABLE IF NOT EXISTS customers (
    id              VARCHAR PRIMARY KEY,           -- 'cust_' + 10 alnum chars
    tenant_id       VARCHAR,
    name            VARCHAR NOT NULL,
    phone           VARCHAR,
    email           VARCHAR,
    created_at      TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at      TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
);
CREATE INDEX IF NOT EXISTS idx_customers_tenant     ON customers(tenant_id);
CREATE INDEX IF NOT EXISTS idx_customers_created_at ON customers(created_at);

-- ===========================================
-- SERVICE PROVIDERS (guides, paramedics, security, entertainment, travel)
-- ===========================================
CREATE TABLE IF NOT EXISTS providers (
    id              VARCHAR PRIMARY KEY,           -- 'prov_' + 10 alnum chars
    tenant_id       VARCHAR,
    name            VARCHAR NOT NULL,
    kind            VARCHAR NOT NULL,              -- 'guide'|'paramedic'|'security'|'entertainment'|'travel'
    phone           VARCHAR,
    email           VARCHAR,
    city            VARCHAR,
    active          BOOLEAN NOT NULL DEFAULT TRUE,
    created_at      TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at      TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
);
CREATE INDEX IF NOT EXISTS idx_providers_tenant     ON providers(tenant_id);
CREATE INDEX IF NOT EXISTS idx_providers_kind       ON providers(kind);
CREATE INDEX IF NOT EXISTS idx_providers_created_at ON providers(created_at);

-- ===========================================
-- DEALS (car sales and trip bookings)
-- ===========================================
CREATE TABLE IF NOT EXISTS deals (
    id              VARCHAR PRIMARY KEY,           -- 'deal_' + 10 alnum chars
    tenant_id       VARCHAR,
    kind            VARCHAR NOT NULL,              -- 'sale' | 'trip'
    car_id          VARCHAR,                       -- set for 'sale' deals
    customer_id     VARCHAR NOT NULL,
    provider_id     VARCHAR,                       -- set for 'trip' deals
    amount          DOUBLE NOT NULL,
    status          VARCHAR NOT NULL DEFAULT 'pending',  -- 'pending'|'completed'|'cancelled'
    destination     VARCHAR,                       -- trip-only
    trip_date       DATE,                          -- trip-only
    seats           INTEGER,                       -- trip-only
    notes           VARCHAR,
    created_at      TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at      TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
);
CREATE INDEX IF NOT EXISTS idx_deals_tenant     ON deals(tenant_id);
CREATE INDEX IF NOT EXISTS idx_deals_status     ON deals(status);
CREATE INDEX IF NOT EXISTS idx_deals_provider   ON deals(provider_id);
CREATE INDEX IF NOT EXISTS idx_deals_created_at ON deals(created_at);

-- ===========================================
-- PAYOUTS (money paid out to service providers)
-- ===========================================
CREATE TABLE IF NOT EXISTS payouts (
    id              VARCHAR PRIMARY KEY,           -- 'pay_' + 10 alnum chars
    tenant_id       VARCHAR,
    provider_id     VARCHAR NOT NULL,
    amount          DOUBLE NOT NULL,
    method          VARCHAR NOT NULL DEFAULT 'transfer',
    reference       VARCHAR,
    created_at      TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
);
CREATE INDEX IF NOT EXISTS idx_payouts_tenant   ON payouts(tenant_id);
CREATE INDEX IF NOT EXISTS idx_payouts_provider ON payouts(provider_id);
"#
    )
}
