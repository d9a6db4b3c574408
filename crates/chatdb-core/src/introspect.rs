use crate::errors::PipelineError;
use crate::model::TableSchema;
use crate::storage::Store;

/// Produces the normalized schema description for a table, used both for
/// display and as grounding context for SELECT generation.
pub fn describe(store: &Store, table: &str) -> Result<TableSchema, PipelineError> {
    let columns = store
        .table_info(table)
        .map_err(|e| PipelineError::Connectivity(e.to_string()))?;
    if columns.is_empty() {
        return Err(PipelineError::UnknownTable(table.to_string()));
    }
    Ok(TableSchema {
        table: table.to_string(),
        columns,
    })
}
