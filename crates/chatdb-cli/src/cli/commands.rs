use super::args::*;
use std::path::Path;
use std::sync::Arc;

use chatdb_core::engine::Coordinator;
use chatdb_core::errors::PipelineError;
use chatdb_core::generate::StatementGenerator;
use chatdb_core::model::ExecutionReport;
use chatdb_core::providers::llm::fake::FakeClient;
use chatdb_core::providers::llm::openai::OpenAIClient;
use chatdb_core::providers::llm::LlmClient;
use chatdb_core::report::console;
use chatdb_core::storage::Store;

pub mod exit_codes {
    pub const OK: i32 = 0;
    pub const OPERATION_FAILED: i32 = 1;
    pub const CONFIG_ERROR: i32 = 2;
}

pub async fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    match cli.cmd {
        Command::Ingest(args) => cmd_ingest(args).await,
        Command::Create(args) => cmd_create(args).await,
        Command::Insert(args) => cmd_insert(args).await,
        Command::Ask(args) => cmd_ask(args).await,
        Command::Tables(args) => cmd_tables(args).await,
        Command::Schema(args) => cmd_schema(args).await,
        Command::Doctor(args) => cmd_doctor(args).await,
        Command::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(exit_codes::OK)
        }
    }
}

async fn cmd_ingest(args: IngestArgs) -> anyhow::Result<i32> {
    let store = open_store(&args.db.db)?;
    // Ingestion is inference-driven and never consults the backend.
    let coordinator = Coordinator::new(store, StatementGenerator::new(Arc::new(FakeClient::default())));

    let data = chatdb_core::ingest::read_csv(&args.file)?;
    let report = match coordinator.ingest(&args.table, &data) {
        Ok(report) => report,
        Err(e) => return Ok(report_pipeline_error(e)),
    };

    console::print_ingest(&report);
    if report.create_outcome.is_failure() {
        return Ok(exit_codes::OPERATION_FAILED);
    }
    Ok(exit_codes::OK)
}

async fn cmd_create(args: CreateArgs) -> anyhow::Result<i32> {
    let coordinator = build_coordinator(&args.db, &args.backend)?;
    let report = match coordinator.create_table_from_text(&args.description).await {
        Ok(report) => report,
        Err(e) => return Ok(report_pipeline_error(e)),
    };
    console::print_report(&report);
    Ok(decide_exit_code(&report))
}

async fn cmd_insert(args: InsertArgs) -> anyhow::Result<i32> {
    let coordinator = build_coordinator(&args.db, &args.backend)?;
    let report = match coordinator
        .insert_rows_from_text(&args.table, &args.description)
        .await
    {
        Ok(report) => report,
        Err(e) => return Ok(report_pipeline_error(e)),
    };
    console::print_report(&report);
    Ok(decide_exit_code(&report))
}

async fn cmd_ask(args: AskArgs) -> anyhow::Result<i32> {
    let coordinator = build_coordinator(&args.db, &args.backend)?;
    let report = match coordinator.answer_question(&args.table, &args.question).await {
        Ok(report) => report,
        Err(e) => return Ok(report_pipeline_error(e)),
    };
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        console::print_report(&report);
    }
    Ok(decide_exit_code(&report))
}

async fn cmd_tables(args: TablesArgs) -> anyhow::Result<i32> {
    let store = open_store(&args.db.db)?;
    let tables = store.list_tables()?;
    if tables.is_empty() {
        eprintln!("no tables yet");
    } else {
        for table in tables {
            println!("{}", table);
        }
    }
    Ok(exit_codes::OK)
}

async fn cmd_schema(args: SchemaArgs) -> anyhow::Result<i32> {
    let store = open_store(&args.db.db)?;
    match chatdb_core::introspect::describe(&store, &args.table) {
        Ok(schema) => {
            print!("{}", schema.render());
            Ok(exit_codes::OK)
        }
        Err(e) => Ok(report_pipeline_error(e.into())),
    }
}

async fn cmd_doctor(args: DoctorArgs) -> anyhow::Result<i32> {
    let store = open_store(&args.db.db)?;
    let tables = store.list_tables()?;
    println!("db: {} ({} tables)", args.db.db.display(), tables.len());

    if args.ping_backend {
        let client = build_client(&args.backend)?;
        match client.complete("Reply with the single word: pong", 0.0).await {
            Ok(reply) => {
                println!("backend: {} ok ({})", client.provider_name(), reply.trim());
            }
            Err(e) => {
                println!("backend: {} unreachable: {}", client.provider_name(), e);
                return Ok(exit_codes::OPERATION_FAILED);
            }
        }
    }
    Ok(exit_codes::OK)
}

fn build_coordinator(db: &DbArgs, backend: &BackendArgs) -> anyhow::Result<Coordinator> {
    let store = open_store(&db.db)?;
    let client = build_client(backend)?;
    Ok(Coordinator::new(store, StatementGenerator::new(client)))
}

fn build_client(args: &BackendArgs) -> anyhow::Result<Arc<dyn LlmClient>> {
    match args.backend.as_str() {
        "fake" => Ok(Arc::new(FakeClient::default())),
        "openai" => {
            let api_key = args.api_key.clone().ok_or_else(|| {
                anyhow::anyhow!("config error: OPENAI_API_KEY is required for the openai backend")
            })?;
            Ok(Arc::new(OpenAIClient::new(
                args.model.clone(),
                api_key,
                args.max_tokens,
            )))
        }
        other => anyhow::bail!("config error: unknown backend '{}'", other),
    }
}

fn open_store(path: &Path) -> anyhow::Result<Store> {
    ensure_parent_dir(path)?;
    Store::open(path)
}

fn ensure_parent_dir(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// All statements failed means the request failed; mixed outcomes are a
/// degraded success whose failures stay visible in the printed report.
fn decide_exit_code(report: &ExecutionReport) -> i32 {
    if !report.outcomes.is_empty() && report.outcomes.iter().all(|o| o.is_failure()) {
        return exit_codes::OPERATION_FAILED;
    }
    exit_codes::OK
}

fn report_pipeline_error(e: anyhow::Error) -> i32 {
    eprintln!("error: {}", e);
    match e.downcast_ref::<PipelineError>() {
        Some(PipelineError::EmptyInput(_)) => exit_codes::CONFIG_ERROR,
        _ => exit_codes::OPERATION_FAILED,
    }
}
