use crate::model::{ColumnDescriptor, RowSet};
use anyhow::Context;
use rusqlite::types::ValueRef;
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Result of one statement execution: rows for SELECT-shaped statements,
/// an affected-row acknowledgment for everything else.
#[derive(Debug, Clone)]
pub enum StatementResult {
    Rows(RowSet),
    Ack { rows_affected: usize },
}

#[derive(Clone)]
pub struct Store {
    conn: Arc<Mutex<Connection>>,
}

impl Store {
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        let conn = Connection::open(path).context("failed to open sqlite db")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn open_in_memory() -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory().context("failed to open in-memory sqlite db")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Executes one statement. Each call acquires and releases its own
    /// connection scope; no transaction spans successive calls.
    pub fn execute(&self, sql: &str, expect_rows: bool) -> anyhow::Result<StatementResult> {
        let conn = self.conn.lock().unwrap();
        if expect_rows {
            let mut stmt = conn.prepare(sql)?;
            let columns: Vec<String> = stmt
                .column_names()
                .iter()
                .map(|name| name.to_string())
                .collect();
            let column_count = columns.len();

            let mut rows = stmt.query([])?;
            let mut out = Vec::new();
            while let Some(row) = rows.next()? {
                let mut cells = Vec::with_capacity(column_count);
                for i in 0..column_count {
                    cells.push(cell_to_json(row.get_ref(i)?));
                }
                out.push(cells);
            }
            Ok(StatementResult::Rows(RowSet { columns, rows: out }))
        } else {
            let rows_affected = conn.execute(sql, [])?;
            Ok(StatementResult::Ack { rows_affected })
        }
    }

    pub fn list_tables(&self) -> anyhow::Result<Vec<String>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT name FROM sqlite_master
             WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
             ORDER BY name",
        )?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut tables = Vec::new();
        for r in rows {
            tables.push(r?);
        }
        Ok(tables)
    }

    /// Column name, declared type, and nullability for a table. Empty when
    /// the table does not exist.
    pub fn table_info(&self, table: &str) -> anyhow::Result<Vec<ColumnDescriptor>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", table))?;
        let rows = stmt.query_map([], |row| {
            Ok(ColumnDescriptor {
                name: row.get(1)?,
                sql_type: row.get(2)?,
                nullable: row.get::<_, i64>(3)? == 0,
            })
        })?;
        let mut columns = Vec::new();
        for r in rows {
            columns.push(r?);
        }
        Ok(columns)
    }
}

fn cell_to_json(value: ValueRef<'_>) -> serde_json::Value {
    match value {
        ValueRef::Null => serde_json::Value::Null,
        ValueRef::Integer(i) => serde_json::json!(i),
        ValueRef::Real(f) => serde_json::json!(f),
        ValueRef::Text(t) => serde_json::Value::String(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => serde_json::Value::String(format!("<blob {} bytes>", b.len())),
    }
}
