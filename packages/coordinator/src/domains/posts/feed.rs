//! Supply-feed presentation logic: search, type filter, pagination, and
//! folding realtime change events into the loaded feed.
//!
//! All pure; the store calls live in [`super::actions`].

use anyhow::Result;
use rowstore::Change;

use super::models::{PostType, SupplyPost};

/// Posts shown per feed page.
pub const POSTS_PER_PAGE: usize = 3;

/// A post joined with its poster's name for display and search.
#[derive(Debug, Clone)]
pub struct FeedPost {
    pub post: SupplyPost,
    pub organization_name: Option<String>,
}

/// Active feed filters: a type tab and a free-text search.
#[derive(Debug, Clone, Default)]
pub struct FeedFilter {
    pub kind: Option<PostType>,
    pub query: Option<String>,
}

impl FeedFilter {
    /// True if the entry passes both the type tab and the search box.
    pub fn admits(&self, entry: &FeedPost) -> bool {
        if let Some(kind) = self.kind {
            if entry.post.post_type != kind {
                return false;
            }
        }
        let Some(query) = self.query.as_deref().filter(|q| !q.is_empty()) else {
            return true;
        };
        let query = query.to_lowercase();
        let matches = |text: Option<&str>| {
            text.map(|t| t.to_lowercase().contains(&query))
                .unwrap_or(false)
        };
        matches(Some(&entry.post.item_name))
            || matches(entry.post.category.as_deref())
            || matches(entry.post.notes.as_deref())
            || matches(entry.organization_name.as_deref())
    }
}

/// Apply a filter, preserving feed order.
pub fn filter_feed<'a>(entries: &'a [FeedPost], filter: &FeedFilter) -> Vec<&'a FeedPost> {
    entries.iter().filter(|entry| filter.admits(entry)).collect()
}

/// One page of a fixed-size pagination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// Index of the first entry on the page.
    pub start: usize,
    /// One past the last entry on the page.
    pub end: usize,
    pub total_pages: usize,
}

/// Page bounds for a 1-based page number, clamped to the valid range.
pub fn paginate(total: usize, page: usize, per_page: usize) -> Page {
    if total == 0 || per_page == 0 {
        return Page {
            start: 0,
            end: 0,
            total_pages: 0,
        };
    }
    let total_pages = total.div_ceil(per_page);
    let page = page.clamp(1, total_pages);
    let start = (page - 1) * per_page;
    Page {
        start,
        end: (start + per_page).min(total),
        total_pages,
    }
}

/// Fold a realtime change into the loaded feed: inserts prepend, updates
/// replace in place. An update for a post not in the feed is ignored.
pub fn apply_change(posts: &mut Vec<SupplyPost>, change: &Change) -> Result<()> {
    let incoming = SupplyPost::from_row(change.row())?;
    match change {
        Change::Inserted(_) => posts.insert(0, incoming),
        Change::Updated(_) => {
            if let Some(existing) = posts.iter_mut().find(|p| p.id == incoming.id) {
                *existing = incoming;
            }
        }
    }
    Ok(())
}
