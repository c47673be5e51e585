/// In-memory proposal store backed by the JSON content source.
///
/// Lookups accept either key form the viewer links use:
/// - a UUID share id (matched case-insensitively)
/// - a numeric proposal id
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::info;

use crate::error::AppError;
use crate::model::Proposal;

static SHARE_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$")
        .expect("valid regex")
});

/// Accepted file layouts: a bare array, or the `{"proposals": [...]}` body
/// the listing endpoint itself returns.
#[derive(Deserialize)]
#[serde(untagged)]
enum SourceFile {
    Bare(Vec<Proposal>),
    Wrapped { proposals: Vec<Proposal> },
}

pub fn is_share_id(key: &str) -> bool {
    SHARE_ID_RE.is_match(key)
}

pub struct ProposalStore {
    proposals: RwLock<Vec<Proposal>>,
}

impl ProposalStore {
    pub fn new(proposals: Vec<Proposal>) -> Self {
        Self {
            proposals: RwLock::new(proposals),
        }
    }

    pub fn load(path: &Path) -> Result<Self, AppError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| AppError::Source(format!("failed to read {}: {e}", path.display())))?;
        let store = Self::from_json(&json)
            .map_err(|e| AppError::Source(format!("{e} in {}", path.display())))?;
        info!(path = %path.display(), "proposal source loaded");
        Ok(store)
    }

    pub fn from_json(json: &str) -> Result<Self, AppError> {
        let file: SourceFile = serde_json::from_str(json)
            .map_err(|e| AppError::Source(format!("invalid proposals JSON: {e}")))?;
        let proposals = match file {
            SourceFile::Bare(proposals) | SourceFile::Wrapped { proposals } => proposals,
        };
        Ok(Self::new(proposals))
    }

    /// All proposals, newest first.
    pub async fn list(&self) -> Vec<Proposal> {
        let mut proposals = self.proposals.read().await.clone();
        proposals.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        proposals
    }

    /// Resolve a share id or numeric id to a proposal.
    pub async fn get(&self, key: &str) -> Result<Proposal, AppError> {
        let key = key.trim();
        let proposals = self.proposals.read().await;
        let found = if is_share_id(key) {
            proposals.iter().find(|p| {
                p.share_id
                    .as_deref()
                    .is_some_and(|id| id.eq_ignore_ascii_case(key))
            })
        } else {
            let id: i64 = key.parse().map_err(|_| {
                AppError::InvalidRequest(format!(
                    "proposal key must be a numeric id or share id, got {key:?}"
                ))
            })?;
            proposals.iter().find(|p| p.id == id)
        };
        found
            .cloned()
            .ok_or_else(|| AppError::NotFound(key.to_string()))
    }

    /// Insert a proposal or replace the one with the same id.
    /// Returns `true` when the id was new.
    pub async fn upsert(&self, proposal: Proposal) -> bool {
        let mut proposals = self.proposals.write().await;
        match proposals.iter_mut().find(|p| p.id == proposal.id) {
            Some(existing) => {
                *existing = proposal;
                false
            }
            None => {
                proposals.push(proposal);
                true
            }
        }
    }

    pub async fn len(&self) -> usize {
        self.proposals.read().await.len()
    }
}
