use std::sync::Arc;

use chatdb_core::engine::Coordinator;
use chatdb_core::errors::PipelineError;
use chatdb_core::generate::StatementGenerator;
use chatdb_core::ingest::CsvTable;
use chatdb_core::model::ExecutionOutcome;
use chatdb_core::providers::llm::fake::FakeClient;
use chatdb_core::storage::Store;

fn coordinator_with(fake: Arc<FakeClient>) -> Coordinator {
    let store = Store::open_in_memory().unwrap();
    Coordinator::new(store, StatementGenerator::new(fake))
}

fn cell(value: &str) -> Option<String> {
    Some(value.to_string())
}

#[tokio::test]
async fn create_table_strips_fence_and_executes() {
    let fake = Arc::new(FakeClient::scripted([
        "```sql\nCREATE TABLE students (id INTEGER PRIMARY KEY, name VARCHAR(100));\n```",
    ]));
    let coordinator = coordinator_with(fake);

    let report = coordinator
        .create_table_from_text("a students table with id and name")
        .await
        .unwrap();

    assert_eq!(
        report.sql,
        "CREATE TABLE students (id INTEGER PRIMARY KEY, name VARCHAR(100));"
    );
    assert!(matches!(
        report.outcomes.as_slice(),
        [ExecutionOutcome::Ack { .. }]
    ));
    assert_eq!(coordinator.store.list_tables().unwrap(), vec!["students"]);
}

#[tokio::test]
async fn create_table_report_carries_sql_even_on_failure() {
    let fake = Arc::new(FakeClient::scripted(["CREATE TABEL broken (;"]));
    let coordinator = coordinator_with(fake);

    let report = coordinator.create_table_from_text("broken").await.unwrap();

    assert_eq!(report.sql, "CREATE TABEL broken (;");
    assert!(report.outcomes[0].is_failure());
}

#[tokio::test]
async fn insert_rows_isolates_a_malformed_statement() {
    let fake = Arc::new(FakeClient::scripted([
        "INSERT INTO people VALUES ('Alice', 90);\n\
         INSERT INTO people VALUES ('Bob', 'not', 'enough', 'columns');\n\
         INSERT INTO people VALUES ('Cara', 75);",
    ]));
    let coordinator = coordinator_with(fake);
    coordinator
        .store
        .execute("CREATE TABLE people (name TEXT, score INTEGER)", false)
        .unwrap();

    let report = coordinator
        .insert_rows_from_text("people", "add alice, bob and cara")
        .await
        .unwrap();

    assert_eq!(report.outcomes.len(), 3);
    assert!(matches!(report.outcomes[0], ExecutionOutcome::Ack { .. }));
    assert!(report.outcomes[1].is_failure());
    assert!(matches!(report.outcomes[2], ExecutionOutcome::Ack { .. }));
}

#[tokio::test]
async fn generation_failure_short_circuits_with_backend_class() {
    let coordinator = coordinator_with(Arc::new(FakeClient::default()));

    let err = coordinator
        .create_table_from_text("anything")
        .await
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<PipelineError>(),
        Some(PipelineError::GenerationBackend(_))
    ));
}

#[tokio::test]
async fn empty_description_is_rejected_up_front() {
    let fake = Arc::new(FakeClient::scripted(["CREATE TABLE t (a INTEGER);"]));
    let coordinator = coordinator_with(fake.clone());

    let err = coordinator.create_table_from_text("  ").await.unwrap_err();

    assert!(matches!(
        err.downcast_ref::<PipelineError>(),
        Some(PipelineError::EmptyInput(_))
    ));
    // rejected before the backend was consulted
    assert_eq!(fake.remaining(), 1);
}

#[tokio::test]
async fn csv_round_trip_infers_types_and_null_literal() {
    let coordinator = coordinator_with(Arc::new(FakeClient::default()));
    let data = CsvTable {
        headers: vec!["name".into(), "score".into()],
        rows: vec![
            vec![cell("Alice"), cell("90")],
            vec![cell("Bob"), None],
        ],
    };

    let report = coordinator.ingest("scores", &data).unwrap();

    assert_eq!(report.rows_inserted, 2);
    assert_eq!(report.inserts.len(), 2);
    assert!(report.inserts[1].sql.contains("NULL"));

    let schema = chatdb_core::introspect::describe(&coordinator.store, "scores").unwrap();
    assert_eq!(schema.columns[0].name, "name");
    assert!(schema.columns[0].sql_type.starts_with("VARCHAR"));
    assert_eq!(schema.columns[1].name, "score");
    assert_eq!(schema.columns[1].sql_type, "INTEGER");
    assert!(schema.columns[1].nullable);
}

#[tokio::test]
async fn csv_ingest_escapes_single_quotes() {
    let coordinator = coordinator_with(Arc::new(FakeClient::default()));
    let data = CsvTable {
        headers: vec!["name".into()],
        rows: vec![vec![cell("O'Brien")]],
    };

    let report = coordinator.ingest("names", &data).unwrap();

    assert!(report.inserts[0].sql.contains("'O''Brien'"));
    assert_eq!(report.rows_inserted, 1);
}

#[tokio::test]
async fn csv_ingest_normalizes_column_identifiers() {
    let coordinator = coordinator_with(Arc::new(FakeClient::default()));
    let data = CsvTable {
        headers: vec!["first name".into(), "zip-code".into()],
        rows: vec![vec![cell("Ada"), cell("02139")]],
    };

    coordinator.ingest("contacts", &data).unwrap();

    let schema = chatdb_core::introspect::describe(&coordinator.store, "contacts").unwrap();
    let names: Vec<&str> = schema.columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["first_name", "zip_code"]);
}

#[tokio::test]
async fn csv_ingest_aborts_when_create_fails() {
    let coordinator = coordinator_with(Arc::new(FakeClient::default()));
    coordinator
        .store
        .execute("CREATE TABLE taken (x INTEGER)", false)
        .unwrap();
    let data = CsvTable {
        headers: vec!["x".into()],
        rows: vec![vec![cell("1")], vec![cell("2")]],
    };

    let report = coordinator.ingest("taken", &data).unwrap();

    // CREATE TABLE fails against the existing table; ingestion aborts
    // before any insert.
    assert!(report.create_outcome.is_failure());
    assert!(report.inserts.is_empty());
    assert_eq!(report.rows_inserted, 0);
}

#[tokio::test]
async fn answer_question_runs_query_and_explains() {
    let fake = Arc::new(FakeClient::scripted([
        "```sql\nSELECT name FROM people WHERE score > 80;\n```",
        "Only Alice scored above 80.",
    ]));
    let coordinator = coordinator_with(fake.clone());
    coordinator
        .store
        .execute("CREATE TABLE people (name TEXT, score INTEGER)", false)
        .unwrap();
    coordinator
        .store
        .execute("INSERT INTO people VALUES ('Alice', 90), ('Bob', 60)", false)
        .unwrap();

    let report = coordinator
        .answer_question("people", "who scored above 80?")
        .await
        .unwrap();

    assert_eq!(report.sql, "SELECT name FROM people WHERE score > 80;");
    match &report.outcomes[0] {
        ExecutionOutcome::Rows { rows } => {
            assert_eq!(rows.columns, vec!["name"]);
            assert_eq!(rows.rows, vec![vec![serde_json::json!("Alice")]]);
        }
        other => panic!("expected rows, got {:?}", other),
    }
    assert_eq!(report.explanation.as_deref(), Some("Only Alice scored above 80."));
    assert_eq!(fake.remaining(), 0);
}

#[tokio::test]
async fn answer_question_on_unknown_table_skips_generation() {
    let fake = Arc::new(FakeClient::scripted([
        "SELECT 1;",
        "an explanation",
    ]));
    let coordinator = coordinator_with(fake.clone());

    let err = coordinator
        .answer_question("ghosts", "anything there?")
        .await
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<PipelineError>(),
        Some(PipelineError::UnknownTable(_))
    ));
    // the generator was never invoked
    assert_eq!(fake.remaining(), 2);
}

#[tokio::test]
async fn answer_question_failure_skips_explanation() {
    let fake = Arc::new(FakeClient::scripted([
        "SELECT nope FROM people;",
        "this explanation must not be consumed",
    ]));
    let coordinator = coordinator_with(fake.clone());
    coordinator
        .store
        .execute("CREATE TABLE people (name TEXT)", false)
        .unwrap();

    let report = coordinator
        .answer_question("people", "what is nope?")
        .await
        .unwrap();

    assert_eq!(report.sql, "SELECT nope FROM people;");
    assert!(report.outcomes[0].is_failure());
    assert!(report.explanation.is_none());
    assert_eq!(fake.remaining(), 1);
}
