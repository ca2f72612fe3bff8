//! Chart heuristics and figure-spec validation.
//!
//! The service returns a ready Plotly figure spec; the browser renders it.
//! Charting is skipped for results that would not plot meaningfully, and any
//! failure here is scoped to the turn's `chart_error` field.

use serde_json::Value;

use crate::history::TableData;

#[derive(Debug, thiserror::Error)]
pub enum ChartError {
    #[error("figure spec is not a JSON object")]
    NotAnObject,
    #[error("figure spec has no traces in its 'data' array")]
    NoTraces,
}

/// Whether a result is worth charting: more than one row and at least one
/// column whose non-null values are all numeric.
pub fn should_generate_chart(table: &TableData) -> bool {
    if table.rows.len() <= 1 {
        return false;
    }
    (0..table.columns.len()).any(|col| {
        let mut saw_number = false;
        for row in &table.rows {
            match row.get(col) {
                Some(Value::Number(_)) => saw_number = true,
                Some(Value::Null) | None => {}
                Some(_) => return false,
            }
        }
        saw_number
    })
}

/// Check that a service-provided figure spec is renderable.
pub fn validate_figure(spec: &Value) -> Result<(), ChartError> {
    let obj = spec.as_object().ok_or(ChartError::NotAnObject)?;
    match obj.get("data").and_then(Value::as_array) {
        Some(traces) if !traces.is_empty() => Ok(()),
        _ => Err(ChartError::NoTraces),
    }
}
