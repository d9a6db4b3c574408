use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    pub name: String,
    pub sql_type: String,
    #[serde(default)]
    pub nullable: bool,
}

/// Schema snapshot for one table. Never mutated in place; a schema change
/// produces a fresh descriptor on the next lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableSchema {
    pub table: String,
    pub columns: Vec<ColumnDescriptor>,
}

impl TableSchema {
    /// Renders the schema for display and as grounding text for SELECT
    /// generation. The SELECT prompt template depends on this exact shape;
    /// change both together.
    pub fn render(&self) -> String {
        let mut out = format!("Table: {}\nColumns:\n", self.table);
        for col in &self.columns {
            out.push_str(&format!("  - {} ({})\n", col.name, col.sql_type));
        }
        out
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum GenerationTask {
    CreateTable {
        description: String,
    },
    InsertRows {
        table: String,
        description: String,
    },
    SelectQuery {
        question: String,
        schema: String,
    },
    ExplainResult {
        question: String,
        sql: String,
        rows: RowSet,
    },
}

/// Result rows with their column names preserved, so downstream
/// explanation text keeps the name/value association.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RowSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<serde_json::Value>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum ExecutionOutcome {
    Rows { rows: RowSet },
    Ack { rows_affected: usize },
    Failure { message: String },
}

impl ExecutionOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, ExecutionOutcome::Failure { .. })
    }
}

/// Per-request result aggregate. Always carries the generated SQL, even
/// when execution failed, so the user can diagnose or correct it by hand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionReport {
    pub sql: String,
    pub outcomes: Vec<ExecutionOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowInsert {
    pub sql: String,
    pub outcome: ExecutionOutcome,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestReport {
    pub table: String,
    pub create_sql: String,
    pub create_outcome: ExecutionOutcome,
    pub inserts: Vec<RowInsert>,
    pub rows_inserted: usize,
}
