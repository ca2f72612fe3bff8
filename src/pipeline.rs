//! The question pipeline: log, translate, validate, execute, enrich, record.
//!
//! This is the whole application in one sequential pass. Every submitted
//! question produces exactly one [`TurnRecord`], even when a stage fails.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};

use crate::chart::{should_generate_chart, validate_figure};
use crate::database::Database;
use crate::history::TurnRecord;
use crate::llm::SqlService;
use crate::question_log::QuestionLog;
use crate::sql::is_sql_valid;

/// Which response fields the user wants computed and shown. Defaults mirror
/// the sidebar defaults: everything on except raw SQL.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub show_sql: bool,
    pub show_table: bool,
    pub show_chart: bool,
    pub show_summary: bool,
    pub show_followup: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            show_sql: false,
            show_table: true,
            show_chart: true,
            show_summary: true,
            show_followup: true,
        }
    }
}

/// Run one question end to end. Never fails: pipeline errors are folded into
/// the returned turn's `error` field.
#[instrument(skip(service, db, log, settings))]
pub async fn process_question(
    service: &SqlService,
    db: &Database,
    log: &QuestionLog,
    question: &str,
    settings: &OutputSettings,
) -> TurnRecord {
    // The question log comes first and is unconditional.
    if let Err(e) = log.log_question(question) {
        warn!("Failed to append to question log: {:?}", e);
    }

    match run_stages(service, db, question, settings).await {
        Ok(turn) => turn,
        Err(e) => {
            error!(question, "Question pipeline failed: {:?}", e);
            TurnRecord::failed(question, format!("{:#}", e))
        }
    }
}

async fn run_stages(
    service: &SqlService,
    db: &Database,
    question: &str,
    settings: &OutputSettings,
) -> Result<TurnRecord> {
    let mut turn = TurnRecord::new(question);

    let sql = service
        .generate_sql(question)
        .await
        .context("SQL generation failed")?;
    if settings.show_sql {
        turn.sql = Some(sql.clone());
    }

    if !is_sql_valid(&sql) {
        info!(%sql, "Generated SQL rejected by validation");
        turn.error = Some("The generated SQL was not a read-only query and was not executed.".to_string());
        return Ok(turn);
    }

    // Enrichment stages see the full result; only the stored table is
    // truncated for display.
    let table = db.run_sql(&sql).await.context("Query execution failed")?;
    if settings.show_table {
        turn.table = Some(table.clone().truncated());
    }

    if settings.show_chart && should_generate_chart(&table) {
        match service.generate_chart_spec(question, &sql, &table).await {
            Ok(spec) => match validate_figure(&spec) {
                Ok(()) => turn.chart = Some(spec),
                Err(e) => {
                    warn!("Service returned an unrenderable figure: {}", e);
                    turn.chart_error = Some(e.to_string());
                }
            },
            Err(e) => {
                warn!("Chart generation failed: {}", e);
                turn.chart_error = Some(e.to_string());
            }
        }
    }

    if settings.show_summary {
        let summary = service
            .generate_summary(question, &table)
            .await
            .context("Summary generation failed")?;
        turn.summary = Some(summary);
    }

    if settings.show_followup {
        let followups = service
            .generate_followup_questions(question, &sql, &table)
            .await
            .context("Follow-up generation failed")?;
        turn.followup_questions = Some(followups);
    }

    Ok(turn)
}
