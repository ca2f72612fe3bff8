use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

use askdb::constants;
use askdb::database::Database;
use askdb::llm::SqlService;
use askdb::pipeline::{process_question, OutputSettings};
use askdb::question_log::QuestionLog;
use askdb::web_server::{start_web_server, AppState};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Start the askdb web server.
    Serve {
        #[arg(long, default_value_t = 8900, help = "Port for the web server.")]
        port: u16,
        #[arg(long, help = "Path to the SQLite database (overrides ASKDB_DB).")]
        db: Option<String>,
        #[arg(long, help = "Directory for the question log (overrides ASKDB_LOG_DIR).")]
        log_dir: Option<String>,
    },
    /// Ask a single question from the terminal and print the answer.
    Ask {
        /// The natural-language question.
        question: String,
        #[arg(long, help = "Path to the SQLite database (overrides ASKDB_DB).")]
        db: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (for ASKDB_API_KEY and friends)
    dotenvy::dotenv().ok();

    // Reads log level from RUST_LOG (e.g. RUST_LOG=info,askdb=debug)
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port, db, log_dir } => {
            let db_path = db.unwrap_or_else(|| constants::DB_PATH.clone());
            let log_dir = log_dir.unwrap_or_else(|| constants::LOG_DIR.clone());
            info!(port, %db_path, "Starting askdb");

            let database = Database::connect(&db_path)
                .await
                .with_context(|| format!("Failed to open database {}", db_path))?;
            let log = QuestionLog::new(&log_dir)?;
            let state = AppState::new(SqlService::from_env(), database, log)?;

            let mut server_handle = tokio::spawn(async move {
                if let Err(e) = start_web_server(port, state).await {
                    error!("Web server failed: {:?}", e);
                }
            });

            let ctrl_c = tokio::signal::ctrl_c();
            tokio::pin!(ctrl_c);

            tokio::select! {
                _ = &mut ctrl_c => {
                    info!("Ctrl-C received, shutting down...");
                }
                res = &mut server_handle => {
                    match res {
                        Ok(_) => info!("Web server task completed unexpectedly."),
                        Err(e) if e.is_panic() => error!("Web server task panicked: {:?}", e),
                        Err(e) => error!("Web server task failed: {:?}", e),
                    }
                }
            }

            if !server_handle.is_finished() {
                server_handle.abort();
            }
            info!("Shutdown complete.");
        }
        Commands::Ask { question, db } => {
            let db_path = db.unwrap_or_else(|| constants::DB_PATH.clone());
            let database = Database::connect(&db_path)
                .await
                .with_context(|| format!("Failed to open database {}", db_path))?;
            let log = QuestionLog::new(constants::LOG_DIR.as_str())?;
            let service = SqlService::from_env();

            // Terminal output: show SQL, skip charts.
            let settings = OutputSettings {
                show_sql: true,
                show_chart: false,
                ..OutputSettings::default()
            };
            let turn = process_question(&service, &database, &log, &question, &settings).await;

            if let Some(error) = &turn.error {
                anyhow::bail!("{}", error);
            }
            if let Some(sql) = &turn.sql {
                println!("SQL:\n{}\n", sql);
            }
            if let Some(table) = &turn.table {
                println!("{}", render_table(table));
            }
            if let Some(summary) = &turn.summary {
                println!("{}\n", summary);
            }
            if let Some(followups) = &turn.followup_questions {
                if !followups.is_empty() {
                    println!("Follow-up questions:");
                    for q in followups.iter().take(5) {
                        println!("  - {}", q);
                    }
                }
            }
        }
    }

    Ok(())
}

/// Plain-text rendering of a result table for the terminal.
fn render_table(table: &askdb::history::TableData) -> String {
    let mut out = String::new();
    out.push_str(&table.columns.join(" | "));
    out.push('\n');
    for row in &table.rows {
        let cells: Vec<String> = row
            .iter()
            .map(|v| match v {
                serde_json::Value::String(s) => s.clone(),
                serde_json::Value::Null => String::new(),
                other => other.to_string(),
            })
            .collect();
        out.push_str(&cells.join(" | "));
        out.push('\n');
    }
    if table.total_rows > table.rows.len() {
        out.push_str(&format!(
            "... showing {} of {} rows\n",
            table.rows.len(),
            table.total_rows
        ));
    }
    out
}
