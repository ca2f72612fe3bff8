pub mod chart;
pub mod constants;
pub mod database;
pub mod history;
pub mod llm;
pub mod pipeline;
pub mod question_log;
pub mod sql;
pub mod web_server;
