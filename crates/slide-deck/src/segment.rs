//! Heading-driven slide segmentation.
//!
//! The input is scanned once for element boundaries; pages are then cut as
//! byte ranges between top-level headings. Fragments are slices of the input
//! with surrounding whitespace trimmed, so inner markup is never altered.
use std::ops::Range;

use tracing::{debug, warn};

use crate::category::CategoryRules;
use crate::model::{Page, Strategy};
use crate::scan::{self, Document};

/// Elements descended into when they are the only thing at their level.
const WRAPPERS: &[&str] = &["html", "body", "main", "article", "section", "div"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rank {
    Primary,
    Secondary,
}

/// A top-level heading found in the body.
struct Boundary {
    outer: Range<usize>,
    inner: Range<usize>,
    rank: Rank,
}

/// A page before empty pages are filtered out and the rest numbered.
/// Heading and content are ranges into the input.
struct Draft {
    title: String,
    preamble: String,
    heading: Range<usize>,
    content: Range<usize>,
    /// Opened by a trailing primary heading rather than a secondary one.
    primary: bool,
}

/// Splits proposal HTML into pages. Stateless; share freely across threads.
#[derive(Debug, Clone, Default)]
pub struct Segmenter {
    strategy: Strategy,
    rules: CategoryRules,
}

/// Segment with the default strategy and category rules.
pub fn segment(html: &str) -> Vec<Page> {
    Segmenter::default().segment(html)
}

impl Segmenter {
    pub fn new(strategy: Strategy, rules: CategoryRules) -> Self {
        Self { strategy, rules }
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn rules(&self) -> &CategoryRules {
        &self.rules
    }

    /// Split `html` into pages.
    ///
    /// Blank input gives an empty deck. Any other input gives at least one
    /// page: when no boundary heading survives (or the markup cannot be
    /// scanned) the whole input becomes a single page.
    pub fn segment(&self, html: &str) -> Vec<Page> {
        if html.trim().is_empty() {
            return Vec::new();
        }

        let doc = scan::scan(html)
            .inspect_err(|e| warn!(error = %e, "markup scan failed, keeping proposal as one page"))
            .ok();

        let drafts = doc
            .as_ref()
            .map(|doc| self.split(html, doc))
            .unwrap_or_default();
        let mut drafts = drop_empty(html, drafts);
        if drafts.is_empty() {
            drafts.push(whole_document(html, doc.as_ref()));
        }

        let pages = self.number(html, drafts);
        debug!(strategy = %self.strategy, pages = pages.len(), "segmented proposal");
        pages
    }

    fn rank(&self, name: &str) -> Option<Rank> {
        match (self.strategy, name) {
            (Strategy::Sections, "h1") => Some(Rank::Primary),
            (_, "h1" | "h2") => Some(Rank::Secondary),
            _ => None,
        }
    }

    /// Cut the body at top-level headings. Returns nothing when there is no
    /// page-opening heading, leaving the caller to fall back to one page.
    fn split(&self, html: &str, doc: &Document) -> Vec<Draft> {
        let (body, items) = body(html, doc);
        let boundaries: Vec<Boundary> = items
            .iter()
            .map(|&id| doc.element(id))
            .filter_map(|el| {
                self.rank(&el.name).map(|rank| Boundary {
                    outer: el.outer.clone(),
                    inner: el.inner.clone(),
                    rank,
                })
            })
            .collect();
        if !boundaries.iter().any(|b| b.rank == Rank::Secondary) {
            return Vec::new();
        }

        let mut drafts = Vec::with_capacity(boundaries.len() + 1);
        // Primary runs waiting to be prepended to the next page.
        let mut carry = String::new();
        // The latest primary run: (title, heading range, whole run range).
        let mut pending: Option<(String, Range<usize>, Range<usize>)> = None;

        let leading = body.start..boundaries[0].outer.start;
        if boundaries[0].rank == Rank::Primary {
            carry.push_str(&html[leading]);
        } else {
            drafts.push(Draft {
                title: String::new(),
                preamble: String::new(),
                heading: body.start..body.start,
                content: trimmed(html, leading),
                primary: false,
            });
        }

        for (i, boundary) in boundaries.iter().enumerate() {
            let end = boundaries
                .get(i + 1)
                .map_or(body.end, |next| next.outer.start);
            let title = scan::text_content(&html[boundary.inner.clone()]);

            match boundary.rank {
                Rank::Primary => {
                    let run = boundary.outer.start..end;
                    if let Some((_, _, previous)) = pending.replace((title, boundary.outer.clone(), run)) {
                        carry.push_str(&html[previous]);
                    }
                }
                Rank::Secondary => {
                    if let Some((_, _, run)) = pending.take() {
                        carry.push_str(&html[run]);
                    }
                    drafts.push(Draft {
                        title,
                        preamble: take_trimmed(&mut carry),
                        heading: boundary.outer.clone(),
                        content: trimmed(html, boundary.outer.end..end),
                        primary: false,
                    });
                }
            }
        }

        // A primary run with no page after it stands on its own.
        if let Some((title, heading, run)) = pending {
            drafts.push(Draft {
                title,
                preamble: take_trimmed(&mut carry),
                content: trimmed(html, heading.end..run.end),
                heading,
                primary: true,
            });
        }

        drafts
    }

    fn number(&self, html: &str, drafts: Vec<Draft>) -> Vec<Page> {
        let last = drafts.len().saturating_sub(1);
        drafts
            .into_iter()
            .enumerate()
            .map(|(index, draft)| Page {
                category: self.rules.classify(&draft.title),
                index,
                title: draft.title,
                preamble: draft.preamble,
                heading: html[draft.heading].to_string(),
                content: html[draft.content].to_string(),
                is_first: index == 0,
                is_last: index == last,
            })
            .collect()
    }
}

/// Descend through lone wrapper elements so boundaries are looked for where
/// the content actually lives.
fn body<'d>(html: &str, doc: &'d Document) -> (Range<usize>, &'d [usize]) {
    let mut range = 0..html.len();
    let mut items = doc.roots();
    loop {
        let mut significant = items
            .iter()
            .copied()
            .filter(|&id| doc.element(id).name != "head");
        let (Some(only), None) = (significant.next(), significant.next()) else {
            break;
        };
        let wrapper = doc.element(only);
        if !WRAPPERS.contains(&wrapper.name.as_str()) || !only_markup_between(html, &range, items, doc) {
            break;
        }
        range = wrapper.inner.clone();
        items = wrapper.children.as_slice();
    }
    (range, items)
}

/// True when nothing but whitespace, comments and declarations sits between
/// the elements of one level.
fn only_markup_between(html: &str, range: &Range<usize>, items: &[usize], doc: &Document) -> bool {
    let mut cursor = range.start;
    for &id in items {
        let el = doc.element(id);
        if !scan::is_insignificant(&html[cursor..el.outer.start]) {
            return false;
        }
        cursor = el.outer.end;
    }
    scan::is_insignificant(&html[cursor..range.end])
}

/// Remove pages with blank content. A dropped page's preamble moves on to the
/// next surviving page. Preamble or a standalone primary heading dropped after
/// the last surviving page is folded into that page's content instead, which
/// is contiguous with it in the input.
fn drop_empty(html: &str, drafts: Vec<Draft>) -> Vec<Draft> {
    let mut kept: Vec<Draft> = Vec::with_capacity(drafts.len());
    let mut carried = String::new();
    let mut orphan_end: Option<usize> = None;
    for mut draft in drafts {
        if draft.content.is_empty() {
            if !draft.heading.is_empty() {
                debug!(title = %draft.title, "dropping page without content");
            }
            if draft.primary || !draft.preamble.is_empty() {
                orphan_end = Some(draft.heading.end.max(draft.content.end));
            }
            carried.push_str(&draft.preamble);
            continue;
        }
        if !carried.is_empty() {
            let mut preamble = std::mem::take(&mut carried);
            preamble.push_str(&draft.preamble);
            draft.preamble = preamble;
        }
        orphan_end = None;
        kept.push(draft);
    }

    if let (Some(end), Some(last)) = (orphan_end, kept.last_mut()) {
        debug!(title = %last.title, "trailing markup joins the last page");
        last.content = trimmed(html, last.content.start..end);
    }
    kept
}

fn whole_document(html: &str, doc: Option<&Document>) -> Draft {
    let title = doc
        .and_then(|doc| doc.first_named("h1"))
        .map(|h1| scan::text_content(&html[h1.inner.clone()]))
        .unwrap_or_default();
    Draft {
        title,
        preamble: String::new(),
        heading: 0..0,
        content: trimmed(html, 0..html.len()),
        primary: false,
    }
}

/// `range` narrowed to exclude leading and trailing whitespace.
fn trimmed(html: &str, range: Range<usize>) -> Range<usize> {
    let slice = &html[range.clone()];
    let start = range.start + (slice.len() - slice.trim_start().len());
    let end = range.end - (slice.len() - slice.trim_end().len());
    start..end.max(start)
}

fn take_trimmed(carry: &mut String) -> String {
    let taken = std::mem::take(carry);
    taken.trim().to_string()
}
