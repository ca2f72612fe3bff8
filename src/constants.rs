// Environment-driven configuration, resolved once at startup.
// CLI flags override these where both exist (see main.rs).

use std::env;

lazy_static::lazy_static! {
    /// Base URL of the text-to-SQL service.
    pub static ref API_URL: String =
        env::var("ASKDB_API_URL").unwrap_or_else(|_| "https://ask.askdb.dev".to_string());
    /// API key sent as a bearer token on every service call.
    pub static ref API_KEY: String = env::var("ASKDB_API_KEY").unwrap_or_default();
    /// Model name passed in the params of every RPC.
    pub static ref MODEL: String =
        env::var("ASKDB_MODEL").unwrap_or_else(|_| "askdb-chat".to_string());
    /// Path to the SQLite database the generated SQL runs against.
    pub static ref DB_PATH: String =
        env::var("ASKDB_DB").unwrap_or_else(|_| "askdb.db".to_string());
    /// Directory holding the append-only question log.
    pub static ref LOG_DIR: String =
        env::var("ASKDB_LOG_DIR").unwrap_or_else(|_| "logs".to_string());
}

/// File name of the question log inside [`LOG_DIR`].
pub const QUESTION_LOG_FILE: &str = "questions_log.txt";
