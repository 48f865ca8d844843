//! Scrapless
//!
//! An MCP server for food waste unit conversion and impact estimation.

use rmcp::ServiceExt;
use tokio::io::{stdin, stdout};
use tracing_subscriber::EnvFilter;

use scrapless::build_info;
use scrapless::config::{Config, DEFAULT_LOG_DIRECTIVE};
use scrapless::db;
use scrapless::mcp::ScraplessService;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (output to stderr to not interfere with MCP stdio)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(DEFAULT_LOG_DIRECTIVE.parse()?))
        .with_writer(std::io::stderr)
        .init();

    // Print startup banner to stderr
    build_info::print_startup_banner();
    eprintln!("Starting MCP server on stdio...");

    let config = Config::from_env();
    let db_path = config.database_path;
    eprintln!("Database path: {}", db_path.display());

    eprintln!("Initializing database...");
    let database = db::Database::open(&db_path)?;
    eprintln!("Database schema version: {}", database.schema_version()?);

    let service = ScraplessService::new(db_path, database);

    // Create stdio transport
    let transport = (stdin(), stdout());

    let server = service.serve(transport).await?;
    tracing::info!("Scrapless MCP server running");

    server.waiting().await?;

    Ok(())
}
