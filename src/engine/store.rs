// Engine — Wallet store
// Persisted set of created wallets, keyed by address, in SQLite via rusqlite.
// Insertion is idempotent: re-adding an existing address is a no-op and
// preserves the stored balance. Records survive restarts; an incompatible
// schema version discards the stored rows and rebuilds the layout.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use log::{info, warn};
use rusqlite::{params, Connection};

use crate::atoms::constants::{ENGINE_DB_FILE, STORE_SCHEMA_VERSION};
use crate::atoms::error::{EngineError, EngineResult};
use crate::atoms::types::{Network, WalletRecord};

/// Get the path to the engine's SQLite database.
fn engine_db_path() -> PathBuf {
    let home = dirs::home_dir().unwrap_or_default();
    let dir = home.join(".solops");
    std::fs::create_dir_all(&dir).ok();
    dir.join(ENGINE_DB_FILE)
}

/// Thread-safe wallet store. Update operations are serialized behind the
/// connection mutex, so each read-modify-write on the collection is atomic
/// with respect to the others.
pub struct WalletStore {
    conn: Mutex<Connection>,
}

impl WalletStore {
    /// Open (or create) the store at the default location under `~/.solops`.
    pub fn open_default() -> EngineResult<Self> {
        Self::open(engine_db_path())
    }

    pub fn open(path: impl AsRef<Path>) -> EngineResult<Self> {
        info!("[store] Opening wallet store at {:?}", path.as_ref());
        let conn = Connection::open(path)?;
        // WAL for better concurrent read behavior
        conn.execute_batch("PRAGMA journal_mode=WAL;").ok();
        Self::init_schema(&conn)?;
        Ok(WalletStore { conn: Mutex::new(conn) })
    }

    /// In-memory store, used by tests.
    pub fn open_in_memory() -> EngineResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;
        Ok(WalletStore { conn: Mutex::new(conn) })
    }

    /// Create tables, discarding a stored layout whose version no longer
    /// matches. The version lives in `store_meta` under `schema_version`.
    fn init_schema(conn: &Connection) -> EngineResult<()> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS store_meta (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;

        let stored: Option<String> = conn
            .query_row(
                "SELECT value FROM store_meta WHERE key = 'schema_version'",
                [],
                |row| row.get(0),
            )
            .ok();
        let stored_version = stored.and_then(|v| v.parse::<i64>().ok());

        if let Some(version) = stored_version {
            if version != STORE_SCHEMA_VERSION {
                warn!(
                    "[store] Discarding wallet storage with schema v{} (current v{})",
                    version, STORE_SCHEMA_VERSION
                );
                conn.execute_batch("DROP TABLE IF EXISTS wallet_storage;")?;
            }
        }

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS wallet_storage (
                address TEXT PRIMARY KEY,
                balance_sol REAL NOT NULL DEFAULT 0,
                network TEXT NOT NULL,
                secret TEXT,
                created_at TEXT NOT NULL DEFAULT (datetime('now'))
            );",
        )?;

        conn.execute(
            "INSERT INTO store_meta (key, value) VALUES ('schema_version', ?1)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![STORE_SCHEMA_VERSION.to_string()],
        )?;

        Ok(())
    }

    fn lock(&self) -> EngineResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|e| EngineError::Other(format!("Lock error: {e}")))
    }

    /// Insert a record. Returns `true` if it was new; re-adding an existing
    /// address is a no-op that preserves the stored balance.
    pub fn add(&self, record: &WalletRecord) -> EngineResult<bool> {
        let conn = self.lock()?;
        let inserted = conn.execute(
            "INSERT OR IGNORE INTO wallet_storage (address, balance_sol, network, secret, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                record.address,
                record.balance_sol,
                record.network.as_str(),
                record.secret,
                record.created_at,
            ],
        )?;
        Ok(inserted > 0)
    }

    /// Insert many records, skipping addresses already present.
    /// Returns how many were actually new.
    pub fn add_many(&self, records: &[WalletRecord]) -> EngineResult<usize> {
        let mut added = 0;
        for record in records {
            if self.add(record)? {
                added += 1;
            }
        }
        Ok(added)
    }

    /// Set the balance of an existing record. Returns `false` (and changes
    /// nothing) when the address is not in the store.
    pub fn update_balance(&self, address: &str, balance_sol: f64) -> EngineResult<bool> {
        let conn = self.lock()?;
        let updated = conn.execute(
            "UPDATE wallet_storage SET balance_sol = ?2 WHERE address = ?1",
            params![address, balance_sol],
        )?;
        Ok(updated > 0)
    }

    pub fn get(&self, address: &str) -> EngineResult<Option<WalletRecord>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT address, balance_sol, network, secret, created_at
             FROM wallet_storage WHERE address = ?1",
        )?;
        let mut rows = stmt.query_map(params![address], row_to_record)?;
        match rows.next() {
            Some(row) => Ok(Some(row?)),
            None => Ok(None),
        }
    }

    /// All records in insertion order.
    pub fn all(&self) -> EngineResult<Vec<WalletRecord>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT address, balance_sol, network, secret, created_at
             FROM wallet_storage ORDER BY rowid",
        )?;
        let records = stmt
            .query_map([], row_to_record)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    /// The most recently created wallet that still has local secret
    /// material, if any. Used by the swap action to pick a signer.
    pub fn latest_with_secret(&self) -> EngineResult<Option<WalletRecord>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT address, balance_sol, network, secret, created_at
             FROM wallet_storage WHERE secret IS NOT NULL
             ORDER BY rowid DESC LIMIT 1",
        )?;
        let mut rows = stmt.query_map([], row_to_record)?;
        match rows.next() {
            Some(row) => Ok(Some(row?)),
            None => Ok(None),
        }
    }

    pub fn count(&self) -> EngineResult<usize> {
        let conn = self.lock()?;
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM wallet_storage", [], |row| row.get(0))?;
        Ok(n as usize)
    }

    /// Remove every record. The schema version stays.
    pub fn clear(&self) -> EngineResult<()> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM wallet_storage", [])?;
        info!("[store] Cleared wallet storage");
        Ok(())
    }
}

fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<WalletRecord> {
    let network: String = row.get(2)?;
    Ok(WalletRecord {
        address: row.get(0)?,
        balance_sol: row.get(1)?,
        network: Network::parse(&network).unwrap_or_default(),
        secret: row.get(3)?,
        created_at: row.get(4)?,
    })
}
