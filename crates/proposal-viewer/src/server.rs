use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use slide_deck::{Navigator, Page};
use tracing::debug;

use crate::cache::DeckCache;
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::model::{
    DeckResponse, NavigationView, Proposal, ProposalListResponse, ProposalResponse,
    ProposalSummary, SlideResponse, SlideView,
};
use crate::store::ProposalStore;
use crate::webhook;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ProposalStore>,
    pub decks: Arc<DeckCache>,
    pub config: Arc<Config>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/proposals", get(list_proposals))
        .route("/api/proposals/{key}", get(get_proposal))
        .route("/api/proposals/{key}/slides", get(get_slides))
        .route("/api/proposals/{key}/slides/{index}", get(get_slide))
        .route("/webhook/proposal", post(webhook::proposal_webhook))
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn list_proposals(State(state): State<AppState>) -> Json<ProposalListResponse> {
    let mut proposals = Vec::new();
    for proposal in state.store.list().await {
        let page_count = deck_for(&state, &proposal).await.len();
        let share_url = proposal.share_url.or_else(|| {
            proposal
                .share_id
                .as_deref()
                .map(|id| state.config.share_url(id))
        });
        proposals.push(ProposalSummary {
            id: proposal.id,
            created_at: proposal.created_at,
            status: proposal.status,
            client_name: proposal.client_name,
            share_id: proposal.share_id,
            share_url,
            is_published: proposal.is_published,
            page_count,
        });
    }
    Json(ProposalListResponse { proposals })
}

async fn get_proposal(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<ProposalResponse>> {
    let proposal = state.store.get(&key).await?;
    Ok(Json(ProposalResponse { proposal }))
}

async fn get_slides(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DeckResponse>> {
    let proposal = state.store.get(&key).await?;
    let deck = deck_for(&state, &proposal).await;
    debug!(proposal_id = proposal.id, pages = deck.len(), "deck served");

    Ok(Json(DeckResponse {
        proposal_id: proposal.id,
        client_name: proposal.client_name,
        strategy: state.decks.segmenter().strategy().to_string(),
        booking_url: state.config.booking_url.clone(),
        page_count: deck.len(),
        slides: deck.iter().map(SlideView::from).collect(),
    }))
}

async fn get_slide(
    State(state): State<AppState>,
    Path((key, index)): Path<(String, usize)>,
) -> Result<Json<SlideResponse>> {
    let proposal = state.store.get(&key).await?;
    let deck = deck_for(&state, &proposal).await;
    let nav = Navigator::at(deck.len(), index).ok_or(AppError::PageNotFound {
        key: key.clone(),
        index,
    })?;

    Ok(Json(SlideResponse {
        proposal_id: proposal.id,
        slide: SlideView::from(&deck[nav.current()]),
        navigation: NavigationView::from(&nav),
        booking_url: state.config.booking_url.clone(),
    }))
}

async fn deck_for(state: &AppState, proposal: &Proposal) -> Arc<Vec<Page>> {
    state
        .decks
        .deck(proposal.data.as_deref().unwrap_or_default())
        .await
}
