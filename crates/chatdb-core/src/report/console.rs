use crate::model::{ExecutionOutcome, ExecutionReport, IngestReport, RowSet};

pub fn print_report(report: &ExecutionReport) {
    if !report.sql.is_empty() {
        println!("Generated SQL:\n{}\n", report.sql);
    }
    let numbered = report.outcomes.len() > 1;
    for (i, outcome) in report.outcomes.iter().enumerate() {
        if numbered {
            print!("[{}] ", i + 1);
        }
        print_outcome(outcome);
    }
    if let Some(explanation) = &report.explanation {
        println!("\n{}", explanation);
    }
}

pub fn print_ingest(report: &IngestReport) {
    println!("Generated SQL:\n{}\n", report.create_sql);
    if report.create_outcome.is_failure() {
        print_outcome(&report.create_outcome);
        return;
    }
    for insert in &report.inserts {
        if let ExecutionOutcome::Failure { message } = &insert.outcome {
            eprintln!("row skipped: {} ({})", message, insert.sql);
        }
    }
    println!(
        "Created table '{}' and inserted {} of {} rows.",
        report.table,
        report.rows_inserted,
        report.inserts.len()
    );
}

fn print_outcome(outcome: &ExecutionOutcome) {
    match outcome {
        ExecutionOutcome::Rows { rows } => print_rowset(rows),
        ExecutionOutcome::Ack { rows_affected } => {
            println!("ok: {} row(s) affected", rows_affected);
        }
        ExecutionOutcome::Failure { message } => println!("failed: {}", message),
    }
}

fn print_rowset(rows: &RowSet) {
    println!("{}", rows.columns.join(" | "));
    for row in &rows.rows {
        let cells: Vec<String> = row.iter().map(cell_text).collect();
        println!("{}", cells.join(" | "));
    }
    println!("({} row(s))", rows.rows.len());
}

fn cell_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => "NULL".to_string(),
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
