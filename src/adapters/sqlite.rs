//! SQLite inventory store: a single table, simple INSERT/SELECT discipline.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use rusqlite::{params, Connection};
use tokio::sync::Mutex;

use crate::domain::model::{EligibilityStatus, InventoryItem, NewInventoryItem};
use crate::domain::ports::InventoryStore;
use crate::utils::error::Result;

#[derive(Clone)]
pub struct SqliteInventory {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteInventory {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        init_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// In-memory store for tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        init_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }
}

fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS inventory (
            id INTEGER PRIMARY KEY,
            gtin TEXT,
            name TEXT,
            rxcui TEXT,
            batch TEXT,
            expiry_date TEXT,
            is_sealed INTEGER,
            status TEXT
        )",
    )?;
    Ok(())
}

fn row_to_item(row: &rusqlite::Row<'_>) -> rusqlite::Result<InventoryItem> {
    Ok(InventoryItem {
        id: row.get(0)?,
        gtin: row.get(1)?,
        name: row.get(2)?,
        rxcui: row.get(3)?,
        batch: row.get(4)?,
        expiry_date: row.get(5)?,
        is_sealed: row.get::<_, i64>(6)? != 0,
        status: row.get(7)?,
    })
}

const SELECT_COLUMNS: &str =
    "SELECT id, gtin, name, rxcui, batch, expiry_date, is_sealed, status FROM inventory";

#[async_trait]
impl InventoryStore for SqliteInventory {
    async fn insert(&self, item: &NewInventoryItem) -> Result<i64> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO inventory (gtin, name, rxcui, batch, expiry_date, is_sealed, status)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                item.gtin,
                item.name,
                item.rxcui,
                item.batch,
                item.expiry_date,
                i64::from(item.is_sealed),
                item.status.as_db_str(),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    async fn list(&self, status: Option<EligibilityStatus>) -> Result<Vec<InventoryItem>> {
        let conn = self.conn.lock().await;
        let mut items = Vec::new();
        match status {
            Some(status) => {
                let mut stmt = conn.prepare(&format!(
                    "{} WHERE status = ?1 ORDER BY expiry_date ASC",
                    SELECT_COLUMNS
                ))?;
                let rows = stmt.query_map(params![status.as_db_str()], row_to_item)?;
                for row in rows {
                    items.push(row?);
                }
            }
            None => {
                let mut stmt =
                    conn.prepare(&format!("{} ORDER BY expiry_date ASC", SELECT_COLUMNS))?;
                let rows = stmt.query_map([], row_to_item)?;
                for row in rows {
                    items.push(row?);
                }
            }
        }
        Ok(items)
    }
}
