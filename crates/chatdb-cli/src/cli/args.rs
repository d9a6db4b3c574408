use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "chatdb",
    version,
    about = "Chat-driven SQL database: create, fill, and query tables in natural language"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create a table from a CSV file with inferred column types
    Ingest(IngestArgs),
    /// Create a table from a natural-language description
    Create(CreateArgs),
    /// Insert rows described in natural language
    Insert(InsertArgs),
    /// Ask a question about a table and get SQL, rows, and an explanation
    Ask(AskArgs),
    /// List tables in the database
    Tables(TablesArgs),
    /// Show the schema of one table
    Schema(SchemaArgs),
    /// Check database and generation backend health
    Doctor(DoctorArgs),
    Version,
}

#[derive(clap::Args, Clone)]
pub struct DbArgs {
    /// sqlite database path
    #[arg(long, env = "CHATDB_DB", default_value = ".chatdb/chat.db")]
    pub db: PathBuf,
}

#[derive(clap::Args, Clone)]
pub struct BackendArgs {
    /// generation backend (openai|fake)
    #[arg(long, default_value = "openai", env = "CHATDB_BACKEND")]
    pub backend: String,

    /// chat model identifier
    #[arg(long, default_value = "gpt-4o-mini", env = "CHATDB_MODEL")]
    pub model: String,

    /// max tokens per completion
    #[arg(long, default_value_t = 800)]
    pub max_tokens: u32,

    #[arg(long, hide = true, env = "OPENAI_API_KEY")]
    pub api_key: Option<String>,
}

#[derive(Parser, Clone)]
pub struct IngestArgs {
    #[command(flatten)]
    pub db: DbArgs,

    /// path to the CSV file
    #[arg(long)]
    pub file: PathBuf,

    /// name for the new table
    #[arg(long)]
    pub table: String,
}

#[derive(Parser, Clone)]
pub struct CreateArgs {
    #[command(flatten)]
    pub db: DbArgs,

    #[command(flatten)]
    pub backend: BackendArgs,

    /// natural-language table description
    pub description: String,
}

#[derive(Parser, Clone)]
pub struct InsertArgs {
    #[command(flatten)]
    pub db: DbArgs,

    #[command(flatten)]
    pub backend: BackendArgs,

    /// target table
    #[arg(long)]
    pub table: String,

    /// natural-language row description
    pub description: String,
}

#[derive(Parser, Clone)]
pub struct AskArgs {
    #[command(flatten)]
    pub db: DbArgs,

    #[command(flatten)]
    pub backend: BackendArgs,

    /// table to query
    #[arg(long)]
    pub table: String,

    /// question about the data
    pub question: String,

    /// print the report as JSON instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Clone)]
pub struct TablesArgs {
    #[command(flatten)]
    pub db: DbArgs,
}

#[derive(Parser, Clone)]
pub struct SchemaArgs {
    #[command(flatten)]
    pub db: DbArgs,

    /// table to describe
    #[arg(long)]
    pub table: String,
}

#[derive(Parser, Clone)]
pub struct DoctorArgs {
    #[command(flatten)]
    pub db: DbArgs,

    #[command(flatten)]
    pub backend: BackendArgs,

    /// also send a test completion to the generation backend
    #[arg(long)]
    pub ping_backend: bool,
}
