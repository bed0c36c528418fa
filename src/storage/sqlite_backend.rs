use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
    str::FromStr,
};

use rusqlite::{params, params_from_iter, types::Type, Connection, OptionalExtension, Row};
use rust_decimal::Decimal;
use tracing::{debug, info};
use uuid::Uuid;

use crate::core::{errors::Result, utils::ensure_dir};
use crate::domain::{NewTransaction, Transaction, TransactionFilter, TransactionId};

use super::LedgerStore;

pub const DEFAULT_DATABASE_FILE: &str = "budget.db";

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS transactions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    kind TEXT NOT NULL,
    date TEXT NOT NULL,
    amount TEXT NOT NULL,
    category TEXT NOT NULL,
    subcategory TEXT,
    account TEXT,
    transfer_group_id TEXT,
    description TEXT,
    reconciled INTEGER NOT NULL DEFAULT 0
);
CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions (date);
CREATE INDEX IF NOT EXISTS idx_transactions_group ON transactions (transfer_group_id);
"#;

const SELECT_COLUMNS: &str = "SELECT id, kind, date, amount, category, subcategory, account, \
     transfer_group_id, description, reconciled FROM transactions";

/// SQLite-backed ledger. Each operation opens its own connection.
#[derive(Debug, Clone)]
pub struct SqliteStorage {
    path: PathBuf,
}

impl SqliteStorage {
    /// Opens (creating if needed) the database file and its schema.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            ensure_dir(parent)?;
        }
        let storage = Self { path };
        storage.connect()?.execute_batch(SCHEMA)?;
        info!(path = %storage.path.display(), "ledger database ready");
        Ok(storage)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect(&self) -> Result<Connection> {
        Ok(Connection::open(&self.path)?)
    }
}

impl LedgerStore for SqliteStorage {
    fn insert(&self, row: &NewTransaction) -> Result<TransactionId> {
        let conn = self.connect()?;
        let id = insert_row(&conn, row)?;
        info!(id, kind = %row.kind, amount = %row.amount, "transaction inserted");
        Ok(id)
    }

    fn insert_group(&self, rows: &[NewTransaction]) -> Result<Vec<TransactionId>> {
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;
        let mut ids = Vec::with_capacity(rows.len());
        for row in rows {
            ids.push(insert_row(&tx, row)?);
        }
        tx.commit()?;
        info!(?ids, "transaction group inserted");
        Ok(ids)
    }

    fn query(&self, filter: &TransactionFilter) -> Result<Vec<Transaction>> {
        let mut clauses = Vec::new();
        let mut values: Vec<String> = Vec::new();
        if let Some(start) = filter.start {
            clauses.push("date >= ?");
            values.push(start.to_string());
        }
        if let Some(end) = filter.end {
            clauses.push("date <= ?");
            values.push(end.to_string());
        }
        if let Some(kind) = filter.kind {
            clauses.push("kind = ?");
            values.push(kind.as_str().to_string());
        }
        if let Some(account) = filter.account.as_ref() {
            clauses.push("account = ?");
            values.push(account.clone());
        }

        let mut sql = SELECT_COLUMNS.to_string();
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY date DESC, id DESC");
        debug!(%sql, ?values, "querying transactions");

        let conn = self.connect()?;
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(values.iter()), map_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn delete(&self, ids: &BTreeSet<TransactionId>) -> Result<usize> {
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;
        let mut removed = 0;
        for id in ids {
            removed += tx.execute("DELETE FROM transactions WHERE id = ?1", params![id])?;
        }
        tx.commit()?;
        info!(requested = ids.len(), removed, "transactions deleted");
        Ok(removed)
    }

    fn existing_ids(&self, ids: &BTreeSet<TransactionId>) -> Result<BTreeSet<TransactionId>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare("SELECT id FROM transactions WHERE id = ?1")?;
        let mut found = BTreeSet::new();
        for id in ids {
            let hit: Option<TransactionId> =
                stmt.query_row(params![id], |row| row.get(0)).optional()?;
            if let Some(hit) = hit {
                found.insert(hit);
            }
        }
        Ok(found)
    }

    fn group_members(&self, group: Uuid) -> Result<Vec<Transaction>> {
        let conn = self.connect()?;
        let sql = format!("{} WHERE transfer_group_id = ?1 ORDER BY id", SELECT_COLUMNS);
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![group.to_string()], map_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

fn insert_row(conn: &Connection, row: &NewTransaction) -> rusqlite::Result<TransactionId> {
    conn.execute(
        "INSERT INTO transactions \
         (kind, date, amount, category, subcategory, account, transfer_group_id, description, reconciled) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            row.kind.as_str(),
            row.date,
            row.amount.to_string(),
            row.category,
            row.subcategory,
            row.account,
            row.transfer_group_id.map(|group| group.to_string()),
            row.description,
            row.reconciled,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

fn map_row(row: &Row<'_>) -> rusqlite::Result<Transaction> {
    let kind: String = row.get(1)?;
    let amount: String = row.get(3)?;
    let group: Option<String> = row.get(7)?;
    Ok(Transaction {
        id: row.get(0)?,
        kind: kind.parse().map_err(|err| conversion_error(1, err))?,
        date: row.get(2)?,
        amount: Decimal::from_str(&amount).map_err(|err| conversion_error(3, err))?,
        category: row.get(4)?,
        subcategory: row.get(5)?,
        account: row.get(6)?,
        transfer_group_id: group
            .map(|raw| Uuid::parse_str(&raw))
            .transpose()
            .map_err(|err| conversion_error(7, err))?,
        description: row.get(8)?,
        reconciled: row.get(9)?,
    })
}

fn conversion_error<E>(column: usize, err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(err))
}
