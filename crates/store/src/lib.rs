//! `cartera-store` — the document store reconciliation plans are applied to.
//!
//! Records live as JSON documents keyed by their natural key, one table per
//! record shape, in a single SQLite file. Plan application is chunked into
//! transactions of at most `batch_size` statements, mirroring the batch
//! limits of hosted document stores.

mod error;

use std::path::Path;

use rusqlite::{params, Connection};
use serde::de::DeserializeOwned;
use serde::Serialize;

use cartera_core::{normalize_key, FinancedPolicy, Policy, Receivable, YesNo};
use cartera_recon::{ReconPlan, Stored};

pub use error::StoreError;

/// Default batch size for plan application; hosted document stores cap
/// write batches around 500, the original tool used 450.
pub const DEFAULT_BATCH_SIZE: usize = 450;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS receivables (
    id   TEXT PRIMARY KEY,
    data TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS policies (
    id   TEXT PRIMARY KEY,
    data TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS financed (
    id   TEXT PRIMARY KEY,
    data TEXT NOT NULL
);
"#;

const TABLE_RECEIVABLES: &str = "receivables";
const TABLE_POLICIES: &str = "policies";
const TABLE_FINANCED: &str = "financed";

pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open (or create) the store at `path`.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| StoreError::Open(e.to_string()))?;
            }
        }
        let conn = Connection::open(path).map_err(|e| StoreError::Open(e.to_string()))?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// In-memory store, for tests and dry runs.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(|e| StoreError::Open(e.to_string()))?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    // -----------------------------------------------------------------------
    // Snapshots
    // -----------------------------------------------------------------------

    pub fn load_receivables(&self) -> Result<Vec<Stored<Receivable>>, StoreError> {
        self.load(TABLE_RECEIVABLES)
    }

    pub fn load_policies(&self) -> Result<Vec<Stored<Policy>>, StoreError> {
        self.load(TABLE_POLICIES)
    }

    fn load<T: DeserializeOwned>(&self, table: &str) -> Result<Vec<Stored<T>>, StoreError> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT id, data FROM {table} ORDER BY id"))?;
        let mut rows = stmt.query([])?;

        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let id: String = row.get(0)?;
            let data: String = row.get(1)?;
            let record = serde_json::from_str(&data).map_err(|e| StoreError::Decode {
                id: id.clone(),
                message: e.to_string(),
            })?;
            out.push(Stored { id, record });
        }
        Ok(out)
    }

    // -----------------------------------------------------------------------
    // Plan application
    // -----------------------------------------------------------------------

    pub fn apply_receivables(
        &mut self,
        plan: &ReconPlan<Receivable>,
        batch_size: usize,
    ) -> Result<(), StoreError> {
        self.apply(TABLE_RECEIVABLES, plan, batch_size, |r: &mut Receivable| {
            r.voided = YesNo::Yes
        })
    }

    pub fn apply_policies(
        &mut self,
        plan: &ReconPlan<Policy>,
        batch_size: usize,
    ) -> Result<(), StoreError> {
        self.apply(TABLE_POLICIES, plan, batch_size, |p: &mut Policy| {
            p.voided = YesNo::Yes
        })
    }

    /// Apply a plan in transactions of at most `batch_size` operations:
    /// deletes, then voids, then changed updates, then inserts.
    fn apply<T>(
        &mut self,
        table: &str,
        plan: &ReconPlan<T>,
        batch_size: usize,
        void: impl Fn(&mut T),
    ) -> Result<(), StoreError>
    where
        T: Serialize + DeserializeOwned + Clone + cartera_recon::Reconcilable,
    {
        enum Op {
            Delete(String),
            Void(String),
            Put(String, String),
        }

        let mut ops: Vec<Op> = Vec::new();
        for id in &plan.deletes {
            ops.push(Op::Delete(id.clone()));
        }
        for id in &plan.voids {
            ops.push(Op::Void(id.clone()));
        }
        for u in &plan.updates {
            if !u.changed {
                continue;
            }
            ops.push(Op::Put(u.id.clone(), encode(&u.record)?));
        }
        for record in &plan.inserts {
            ops.push(Op::Put(record.key(), encode(record)?));
        }

        let batch_size = batch_size.max(1);
        for chunk in ops.chunks(batch_size) {
            let tx = self.conn.transaction()?;
            for op in chunk {
                match op {
                    Op::Delete(id) => {
                        tx.execute(&format!("DELETE FROM {table} WHERE id = ?1"), params![id])?;
                    }
                    Op::Void(id) => {
                        let data: Option<String> = tx
                            .query_row(
                                &format!("SELECT data FROM {table} WHERE id = ?1"),
                                params![id],
                                |row| row.get(0),
                            )
                            .map(Some)
                            .or_else(ignore_not_found)?;
                        if let Some(data) = data {
                            let mut record: T =
                                serde_json::from_str(&data).map_err(|e| StoreError::Decode {
                                    id: id.clone(),
                                    message: e.to_string(),
                                })?;
                            void(&mut record);
                            tx.execute(
                                &format!("UPDATE {table} SET data = ?2 WHERE id = ?1"),
                                params![id, encode(&record)?],
                            )?;
                        }
                    }
                    Op::Put(id, data) => {
                        tx.execute(
                            &format!("INSERT OR REPLACE INTO {table} (id, data) VALUES (?1, ?2)"),
                            params![id, data],
                        )?;
                    }
                }
            }
            tx.commit()?;
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Financed policies (small CRUD surface, keyed by policy number)
    // -----------------------------------------------------------------------

    pub fn upsert_financed(&self, record: &FinancedPolicy) -> Result<(), StoreError> {
        let id = normalize_key(&record.policy);
        if id.is_empty() {
            return Err(StoreError::Sql("financed policy number is empty".into()));
        }
        self.conn.execute(
            &format!("INSERT OR REPLACE INTO {TABLE_FINANCED} (id, data) VALUES (?1, ?2)"),
            params![id, encode(record)?],
        )?;
        Ok(())
    }

    pub fn get_financed(&self, policy: &str) -> Result<Option<FinancedPolicy>, StoreError> {
        let id = normalize_key(policy);
        let data: Option<String> = self
            .conn
            .query_row(
                &format!("SELECT data FROM {TABLE_FINANCED} WHERE id = ?1"),
                params![id],
                |row| row.get(0),
            )
            .map(Some)
            .or_else(ignore_not_found)?;

        match data {
            Some(data) => serde_json::from_str(&data)
                .map(Some)
                .map_err(|e| StoreError::Decode {
                    id,
                    message: e.to_string(),
                }),
            None => Ok(None),
        }
    }

    pub fn list_financed(&self) -> Result<Vec<FinancedPolicy>, StoreError> {
        Ok(self
            .load::<FinancedPolicy>(TABLE_FINANCED)?
            .into_iter()
            .map(|s| s.record)
            .collect())
    }

    pub fn delete_financed(&self, policy: &str) -> Result<bool, StoreError> {
        let id = normalize_key(policy);
        let n = self.conn.execute(
            &format!("DELETE FROM {TABLE_FINANCED} WHERE id = ?1"),
            params![id],
        )?;
        Ok(n > 0)
    }
}

fn encode<T: Serialize>(record: &T) -> Result<String, StoreError> {
    serde_json::to_string(record).map_err(|e| StoreError::Sql(e.to_string()))
}

fn ignore_not_found<V>(e: rusqlite::Error) -> Result<Option<V>, rusqlite::Error> {
    match e {
        rusqlite::Error::QueryReturnedNoRows => Ok(None),
        other => Err(other),
    }
}
