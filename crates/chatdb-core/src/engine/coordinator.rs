use crate::errors::PipelineError;
use crate::generate::StatementGenerator;
use crate::infer::{self, ColumnType};
use crate::ingest::CsvTable;
use crate::introspect;
use crate::model::{
    ExecutionOutcome, ExecutionReport, GenerationTask, IngestReport, RowInsert,
};
use crate::sanitize::{join_statements, sanitize};
use crate::storage::{StatementResult, Store};

/// Sequences schema lookup, generation, sanitization, execution, and
/// explanation for one request at a time, and aggregates the per-statement
/// outcomes into a single report.
pub struct Coordinator {
    pub store: Store,
    pub generator: StatementGenerator,
}

impl Coordinator {
    pub fn new(store: Store, generator: StatementGenerator) -> Self {
        Self { store, generator }
    }

    pub async fn create_table_from_text(
        &self,
        description: &str,
    ) -> anyhow::Result<ExecutionReport> {
        require(description, "table description")?;

        let raw = self
            .generator
            .generate(&GenerationTask::CreateTable {
                description: description.to_string(),
            })
            .await?;
        let statements = sanitize(&raw);
        let sql = join_statements(&statements);
        tracing::debug!(statements = statements.len(), "create-table generated");

        // Single-statement task: only the first statement is executed.
        let outcome = match statements.first() {
            Some(stmt) => self.run_statement(stmt, false),
            None => no_statement_outcome(),
        };
        Ok(ExecutionReport {
            sql,
            outcomes: vec![outcome],
            explanation: None,
        })
    }

    /// Executes every generated INSERT independently, in generation order.
    /// One malformed statement degrades the report; it never aborts the
    /// statements after it.
    pub async fn insert_rows_from_text(
        &self,
        table: &str,
        description: &str,
    ) -> anyhow::Result<ExecutionReport> {
        require(table, "table name")?;
        require(description, "row description")?;

        let raw = self
            .generator
            .generate(&GenerationTask::InsertRows {
                table: table.to_string(),
                description: description.to_string(),
            })
            .await?;
        let statements = sanitize(&raw);
        let sql = join_statements(&statements);
        tracing::debug!(statements = statements.len(), table, "insert generated");

        if statements.is_empty() {
            return Ok(ExecutionReport {
                sql,
                outcomes: vec![no_statement_outcome()],
                explanation: None,
            });
        }

        let outcomes = statements
            .iter()
            .map(|stmt| self.run_statement(stmt, false))
            .collect();
        Ok(ExecutionReport {
            sql,
            outcomes,
            explanation: None,
        })
    }

    /// CSV ingestion: inferencer-driven CREATE TABLE, then one INSERT per
    /// row with literal-escaped values. Aborts only when CREATE TABLE
    /// fails; per-row failures are recorded and skipped.
    pub fn ingest(&self, table: &str, data: &CsvTable) -> anyhow::Result<IngestReport> {
        require(table, "table name")?;
        if data.is_empty() {
            return Err(PipelineError::EmptyInput("csv rows".into()).into());
        }

        let mut columns = Vec::with_capacity(data.headers.len());
        let mut types = Vec::with_capacity(data.headers.len());
        for (idx, header) in data.headers.iter().enumerate() {
            let samples = data.column_samples(idx);
            let ty = infer::infer_type(None, &samples);
            columns.push(format!("{} {}", infer::normalize_column(header), ty));
            types.push(ty);
        }

        let create_sql = format!("CREATE TABLE {} ({});", table, columns.join(", "));
        let create_outcome = self.run_statement(&create_sql, false);
        if create_outcome.is_failure() {
            tracing::warn!(table, "create table failed, ingestion aborted");
            return Ok(IngestReport {
                table: table.to_string(),
                create_sql,
                create_outcome,
                inserts: Vec::new(),
                rows_inserted: 0,
            });
        }

        let mut inserts = Vec::with_capacity(data.rows.len());
        let mut rows_inserted = 0;
        for row in &data.rows {
            let values: Vec<String> = types
                .iter()
                .enumerate()
                .map(|(idx, ty)| sql_literal(row.get(idx).and_then(|c| c.as_deref()), ty))
                .collect();
            let insert_sql = format!("INSERT INTO {} VALUES ({});", table, values.join(", "));
            let outcome = self.run_statement(&insert_sql, false);
            if !outcome.is_failure() {
                rows_inserted += 1;
            }
            inserts.push(RowInsert {
                sql: insert_sql,
                outcome,
            });
        }

        tracing::info!(table, rows_inserted, total = data.rows.len(), "csv ingested");
        Ok(IngestReport {
            table: table.to_string(),
            create_sql,
            create_outcome,
            inserts,
            rows_inserted,
        })
    }

    /// Answers a natural-language question: schema lookup grounds SELECT
    /// generation, the query runs, and the rows are explained in prose.
    /// An unknown table short-circuits before any generation; a failed
    /// query returns without attempting an explanation.
    pub async fn answer_question(
        &self,
        table: &str,
        question: &str,
    ) -> anyhow::Result<ExecutionReport> {
        require(table, "table name")?;
        require(question, "question")?;

        let schema = introspect::describe(&self.store, table)?;

        let raw = self
            .generator
            .generate(&GenerationTask::SelectQuery {
                question: question.to_string(),
                schema: schema.render(),
            })
            .await?;
        let statements = sanitize(&raw);
        let sql = join_statements(&statements);

        let Some(stmt) = statements.first() else {
            return Ok(ExecutionReport {
                sql,
                outcomes: vec![no_statement_outcome()],
                explanation: None,
            });
        };

        match self.run_statement(stmt, true) {
            ExecutionOutcome::Rows { rows } => {
                let explanation = match self
                    .generator
                    .generate(&GenerationTask::ExplainResult {
                        question: question.to_string(),
                        sql: sql.clone(),
                        rows: rows.clone(),
                    })
                    .await
                {
                    Ok(text) => Some(text.trim().to_string()),
                    Err(e) => {
                        // The query already succeeded; surface the backend
                        // failure where the explanation would have gone.
                        tracing::warn!(error = %e, "explanation generation failed");
                        Some(e.to_string())
                    }
                };
                Ok(ExecutionReport {
                    sql,
                    outcomes: vec![ExecutionOutcome::Rows { rows }],
                    explanation,
                })
            }
            failure => Ok(ExecutionReport {
                sql,
                outcomes: vec![failure],
                explanation: None,
            }),
        }
    }

    fn run_statement(&self, sql: &str, expect_rows: bool) -> ExecutionOutcome {
        match self.store.execute(sql, expect_rows) {
            Ok(StatementResult::Rows(rows)) => ExecutionOutcome::Rows { rows },
            Ok(StatementResult::Ack { rows_affected }) => ExecutionOutcome::Ack { rows_affected },
            Err(e) => ExecutionOutcome::Failure {
                message: PipelineError::MalformedStatement(e.to_string()).to_string(),
            },
        }
    }
}

fn require(value: &str, field: &str) -> Result<(), PipelineError> {
    if value.trim().is_empty() {
        return Err(PipelineError::EmptyInput(field.to_string()));
    }
    Ok(())
}

fn no_statement_outcome() -> ExecutionOutcome {
    ExecutionOutcome::Failure {
        message: PipelineError::GenerationBackend(
            "backend produced no executable statement".into(),
        )
        .to_string(),
    }
}

/// Renders one cell as a SQL literal: absent values become the NULL
/// literal, textual values are single-quoted with quotes doubled, and
/// everything else keeps its natural textual form.
fn sql_literal(value: Option<&str>, ty: &ColumnType) -> String {
    match value {
        None => "NULL".to_string(),
        Some(v) if ty.is_textual() => format!("'{}'", v.replace('\'', "''")),
        Some(v) => v.trim().to_string(),
    }
}
