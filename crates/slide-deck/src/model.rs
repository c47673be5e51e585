use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DeckError;

/// Presentation label attached to a page, derived from its title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Introduction,
    Problem,
    Solution,
    Impact,
    Plan,
    Differentiation,
    NextSteps,
    Contact,
    Document,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Category::Introduction,
        Category::Problem,
        Category::Solution,
        Category::Impact,
        Category::Plan,
        Category::Differentiation,
        Category::NextSteps,
        Category::Contact,
        Category::Document,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Introduction => "introduction",
            Category::Problem => "problem",
            Category::Solution => "solution",
            Category::Impact => "impact",
            Category::Plan => "plan",
            Category::Differentiation => "differentiation",
            Category::NextSteps => "next-steps",
            Category::Contact => "contact",
            Category::Document => "document",
        }
    }

    /// Icon name (lucide set) the viewer draws next to the slide title.
    pub fn icon(&self) -> &'static str {
        match self {
            Category::Introduction => "building-2",
            Category::Problem => "target",
            Category::Solution => "lightbulb",
            Category::Impact => "trending-up",
            Category::Plan => "clipboard-list",
            Category::Differentiation => "sparkles",
            Category::NextSteps => "calendar-check",
            Category::Contact => "phone",
            Category::Document => "file-text",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = DeckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| DeckError::UnknownCategory(s.trim().to_string()))
    }
}

/// Which headings open a new page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// `h2` opens a page; `h1` runs are carried forward as preamble.
    #[default]
    Sections,
    /// Both `h1` and `h2` open a page.
    Outline,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Sections => "sections",
            Strategy::Outline => "outline",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = DeckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sections" => Ok(Strategy::Sections),
            "outline" => Ok(Strategy::Outline),
            _ => Err(DeckError::UnknownStrategy(s.trim().to_string())),
        }
    }
}

/// One slide of a segmented proposal.
///
/// All markup fields are byte-exact slices of the source HTML (trimmed of
/// surrounding whitespace), never re-serialised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page {
    /// Zero-based position in the deck.
    pub index: usize,
    /// Plain text of the heading that opened this page, or empty.
    pub title: String,
    /// Markup carried in front of the heading, e.g. the document title.
    pub preamble: String,
    /// Raw markup of the heading element itself.
    pub heading: String,
    /// Body fragment between this heading and the next boundary.
    pub content: String,
    pub is_first: bool,
    pub is_last: bool,
    pub category: Category,
}

impl Page {
    /// Markup to inject into the slide: preamble, heading, then content.
    pub fn html(&self) -> String {
        let mut out =
            String::with_capacity(self.preamble.len() + self.heading.len() + self.content.len());
        out.push_str(&self.preamble);
        out.push_str(&self.heading);
        out.push_str(&self.content);
        out
    }
}
