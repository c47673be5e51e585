use axum::{
    extract::{rejection::JsonRejection, State},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info};

use crate::error::{AppError, Result};
use crate::model::Proposal;
use crate::server::AppState;

const PROPOSAL_TABLE: &str = "PROPOSAL";
const INSERT_EVENT: &str = "INSERT";

/// Database change notification.
#[derive(Debug, Deserialize)]
pub struct WebhookPayload {
    #[serde(rename = "type")]
    pub event: String,
    pub table: String,
    #[serde(default)]
    pub record: Option<Proposal>,
    #[serde(default)]
    pub schema: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookResponse {
    pub success: bool,
    pub proposal_id: i64,
    pub link: String,
    pub message: String,
}

pub async fn proposal_webhook(
    State(state): State<AppState>,
    payload: std::result::Result<Json<WebhookPayload>, JsonRejection>,
) -> Result<Response> {
    let Json(payload) = payload.map_err(|e| AppError::InvalidRequest(e.body_text()))?;

    if payload.event != INSERT_EVENT || payload.table != PROPOSAL_TABLE {
        debug!(event = %payload.event, table = %payload.table, "webhook ignored");
        return Ok(Json(json!({ "message": "Ignored: not an INSERT on PROPOSAL" })).into_response());
    }

    let record = payload
        .record
        .ok_or_else(|| AppError::InvalidRequest("INSERT payload has no record".to_string()))?;
    let proposal_id = record.id;
    let created = state.store.upsert(record).await;
    let link = state.config.proposal_link(proposal_id);
    info!(proposal_id, created, schema = ?payload.schema, %link, "proposal link generated");

    Ok(Json(WebhookResponse {
        success: true,
        proposal_id,
        link,
        message: format!("Proposal #{proposal_id} link generated successfully"),
    })
    .into_response())
}
