//! HTTP client for the external text-to-SQL service.
//!
//! Every call is `POST {base}/rpc` with a JSON body
//! `{"method": <name>, "params": {...}}` and a JSON response
//! `{"result": ...}`. The API key travels as a bearer token and the model
//! name inside `params`. No retries; failures surface as [`ServiceError`].

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, error, instrument};

use crate::history::TableData;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("service request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("service returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed service response for {method}: {reason}")]
    Malformed { method: String, reason: String },
}

#[derive(Serialize)]
struct RpcRequest<'a> {
    method: &'a str,
    params: Value,
}

#[derive(Deserialize)]
struct RpcResponse {
    result: Value,
}

/// Handle to the text-to-SQL service, cheap to clone.
#[derive(Debug, Clone)]
pub struct SqlService {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl SqlService {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    /// Build a service handle from the process-wide constants.
    pub fn from_env() -> Self {
        Self::new(
            crate::constants::API_URL.clone(),
            crate::constants::API_KEY.clone(),
            crate::constants::MODEL.clone(),
        )
    }

    async fn rpc(&self, method: &str, mut params: Value) -> Result<Value, ServiceError> {
        params["model"] = json!(self.model);
        let url = format!("{}/rpc", self.base_url.trim_end_matches('/'));
        debug!(method, %url, "Calling text-to-SQL service");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&RpcRequest { method, params })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(method, %status, %body, "Service request failed");
            return Err(ServiceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: RpcResponse = response.json().await.map_err(|e| ServiceError::Malformed {
            method: method.to_string(),
            reason: e.to_string(),
        })?;
        Ok(parsed.result)
    }

    fn expect_string(method: &str, result: Value) -> Result<String, ServiceError> {
        result
            .as_str()
            .map(|s| s.trim().to_string())
            .ok_or_else(|| ServiceError::Malformed {
                method: method.to_string(),
                reason: "expected a string result".to_string(),
            })
    }

    /// Translate a natural-language question into SQL.
    #[instrument(skip(self))]
    pub async fn generate_sql(&self, question: &str) -> Result<String, ServiceError> {
        let result = self
            .rpc("generate_sql", json!({ "question": question }))
            .await?;
        Self::expect_string("generate_sql", result)
    }

    /// Natural-language summary of a query result.
    #[instrument(skip(self, table))]
    pub async fn generate_summary(
        &self,
        question: &str,
        table: &TableData,
    ) -> Result<String, ServiceError> {
        let result = self
            .rpc(
                "generate_summary",
                json!({ "question": question, "table": table }),
            )
            .await?;
        Self::expect_string("generate_summary", result)
    }

    /// Suggested follow-up questions for the last answer.
    #[instrument(skip(self, table))]
    pub async fn generate_followup_questions(
        &self,
        question: &str,
        sql: &str,
        table: &TableData,
    ) -> Result<Vec<String>, ServiceError> {
        let result = self
            .rpc(
                "generate_followup_questions",
                json!({ "question": question, "sql": sql, "table": table }),
            )
            .await?;
        let items = result.as_array().ok_or_else(|| ServiceError::Malformed {
            method: "generate_followup_questions".to_string(),
            reason: "expected an array result".to_string(),
        })?;
        Ok(items
            .iter()
            .filter_map(|v| v.as_str())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect())
    }

    /// Plotly figure spec (JSON object) for charting a query result.
    #[instrument(skip(self, table))]
    pub async fn generate_chart_spec(
        &self,
        question: &str,
        sql: &str,
        table: &TableData,
    ) -> Result<Value, ServiceError> {
        self.rpc(
            "generate_chart_spec",
            json!({ "question": question, "sql": sql, "table": table }),
        )
        .await
    }
}
