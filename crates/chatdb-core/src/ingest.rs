use anyhow::Context;
use std::path::Path;

/// Tabular data decoded from CSV: raw headers plus rows of optional
/// string cells. An empty cell reads as absent, which downstream maps to
/// the NULL literal.
#[derive(Debug, Clone, Default)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl CsvTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All values of one column, in row order, padding short records with
    /// absent cells.
    pub fn column_samples(&self, idx: usize) -> Vec<Option<String>> {
        self.rows
            .iter()
            .map(|row| row.get(idx).cloned().flatten())
            .collect()
    }
}

pub fn read_csv(path: &Path) -> anyhow::Result<CsvTable> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open csv {}", path.display()))?;
    let headers = reader
        .headers()
        .context("failed to read csv headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.context("failed to read csv record")?;
        rows.push(
            record
                .iter()
                .map(|field| {
                    let field = field.trim();
                    if field.is_empty() {
                        None
                    } else {
                        Some(field.to_string())
                    }
                })
                .collect(),
        );
    }
    Ok(CsvTable { headers, rows })
}
