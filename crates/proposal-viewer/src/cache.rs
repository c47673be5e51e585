/// Memoised segmentation results.
///
/// Key schema: `deck:v1:{sha256(html)}`. An edited proposal body hashes to a
/// new key, so stale decks are never served; they just stop being hit. The
/// map is bounded and cleared wholesale when full.
use std::collections::HashMap;
use std::sync::Arc;

use sha2::{Digest, Sha256};
use slide_deck::{Page, Segmenter};
use tokio::sync::Mutex;
use tracing::debug;

const KEY_PREFIX: &str = "deck:v1:";

pub struct DeckCache {
    segmenter: Segmenter,
    capacity: usize,
    entries: Mutex<HashMap<String, Arc<Vec<Page>>>>,
}

impl DeckCache {
    pub fn new(segmenter: Segmenter, capacity: usize) -> Self {
        Self {
            segmenter,
            capacity: capacity.max(1),
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn segmenter(&self) -> &Segmenter {
        &self.segmenter
    }

    /// Pages for `html`, segmenting on first sight.
    pub async fn deck(&self, html: &str) -> Arc<Vec<Page>> {
        let key = deck_key(html);
        if let Some(hit) = self.entries.lock().await.get(&key) {
            return Arc::clone(hit);
        }

        let pages = Arc::new(self.segmenter.segment(html));

        let mut entries = self.entries.lock().await;
        if entries.len() >= self.capacity {
            debug!(capacity = self.capacity, "deck cache full, clearing");
            entries.clear();
        }
        entries.insert(key, Arc::clone(&pages));
        pages
    }
}

fn deck_key(html: &str) -> String {
    let hash = Sha256::digest(html.as_bytes());
    format!("{KEY_PREFIX}{:x}", hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_depends_only_on_content() {
        assert_eq!(deck_key("<h2>A</h2>"), deck_key("<h2>A</h2>"));
        assert_ne!(deck_key("<h2>A</h2>"), deck_key("<h2>B</h2>"));
        assert!(deck_key("").starts_with(KEY_PREFIX));
    }

    #[tokio::test]
    async fn repeated_lookups_share_one_deck() {
        let cache = DeckCache::new(Segmenter::default(), 8);
        let html = "<h2>A</h2><p>a</p><h2>B</h2><p>b</p>";
        let first = cache.deck(html).await;
        let second = cache.deck(html).await;
        assert_eq!(first.len(), 2);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.entries.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn full_cache_is_cleared_before_insert() {
        let cache = DeckCache::new(Segmenter::default(), 2);
        cache.deck("<p>one</p>").await;
        cache.deck("<p>two</p>").await;
        assert_eq!(cache.entries.lock().await.len(), 2);
        cache.deck("<p>three</p>").await;
        assert_eq!(cache.entries.lock().await.len(), 1);
    }
}
