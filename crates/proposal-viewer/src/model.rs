use serde::{Deserialize, Serialize};
use slide_deck::{Navigator, Page, Progress};

/// A proposal row as stored by the content source. Column names are kept
/// verbatim, including the upper-case ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Proposal {
    pub id: i64,
    #[serde(default)]
    pub created_at: String,
    /// Rich-text HTML body.
    #[serde(rename = "PROPOSAL DATA", default)]
    pub data: Option<String>,
    #[serde(rename = "STATUS", default)]
    pub status: Option<String>,
    #[serde(default)]
    pub share_id: Option<String>,
    #[serde(default)]
    pub is_published: bool,
    #[serde(default)]
    pub client_name: Option<String>,
    #[serde(default)]
    pub share_url: Option<String>,
}

/// Dashboard row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProposalSummary {
    pub id: i64,
    pub created_at: String,
    pub status: Option<String>,
    pub client_name: Option<String>,
    pub share_id: Option<String>,
    pub share_url: Option<String>,
    pub is_published: bool,
    pub page_count: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProposalListResponse {
    pub proposals: Vec<ProposalSummary>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProposalResponse {
    pub proposal: Proposal,
}

/// A page as sent to the viewer, with its icon and ready-to-inject markup.
#[derive(Debug, Clone, Serialize)]
pub struct SlideView {
    #[serde(flatten)]
    pub page: Page,
    pub icon: &'static str,
    pub html: String,
}

impl From<&Page> for SlideView {
    fn from(page: &Page) -> Self {
        Self {
            icon: page.category.icon(),
            html: page.html(),
            page: page.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeckResponse {
    pub proposal_id: i64,
    pub client_name: Option<String>,
    pub strategy: String,
    pub booking_url: Option<String>,
    pub page_count: usize,
    pub slides: Vec<SlideView>,
}

#[derive(Debug, Serialize)]
pub struct NavigationView {
    pub previous: Option<usize>,
    pub next: Option<usize>,
    pub progress: Progress,
    /// The booking call to action is shown on the last slide only.
    pub show_booking_cta: bool,
}

impl From<&Navigator> for NavigationView {
    fn from(nav: &Navigator) -> Self {
        Self {
            previous: nav.previous_index(),
            next: nav.next_index(),
            progress: nav.progress(),
            show_booking_cta: nav.is_last(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SlideResponse {
    pub proposal_id: i64,
    pub slide: SlideView,
    pub navigation: NavigationView,
    pub booking_url: Option<String>,
}
