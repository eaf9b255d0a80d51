//! Document cache — reply-to addresses per page URL.
//!
//! Entries live for the lifetime of the process and are invalidated when the
//! page's validator (`Last-Modified`, falling back to `Date`) changes. The
//! page itself is still fetched on every task; the cache only saves re-parsing.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::reply_to::extract_reply_to;

/// Parsed metadata for one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedDocument {
    /// Validator the hrefs were parsed under
    pub date: String,
    pub hrefs: Vec<String>,
    pub fetched_at: DateTime<Utc>,
}

/// Unbounded in-memory cache keyed by page URL.
#[derive(Debug, Default)]
pub struct DocumentCache {
    entries: HashMap<String, CachedDocument>,
}

impl DocumentCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the reply-to hrefs for `uri`, parsing `html` only when the cached
    /// entry is missing or was stored under a different `page_date`.
    ///
    /// Pages served without a validator are parsed every time and never stored.
    pub fn resolve(&mut self, uri: &str, page_date: Option<&str>, html: &str) -> Vec<String> {
        let Some(page_date) = page_date else {
            tracing::debug!(uri, "Page has no validator, parsing without caching");
            return extract_reply_to(html);
        };

        if let Some(entry) = self.entries.get(uri)
            && entry.date == page_date
        {
            tracing::debug!(uri, page_date, "Document cache hit");
            return entry.hrefs.clone();
        }

        let hrefs = extract_reply_to(html);
        tracing::debug!(
            uri,
            page_date,
            hrefs = hrefs.len(),
            "Document cache miss, parsed page"
        );
        self.entries.insert(
            uri.to_string(),
            CachedDocument {
                date: page_date.to_string(),
                hrefs: hrefs.clone(),
                fetched_at: Utc::now(),
            },
        );
        hrefs
    }

    pub fn get(&self, uri: &str) -> Option<&CachedDocument> {
        self.entries.get(uri)
    }

    /// Drop the entry for `uri`. Returns whether one existed.
    pub fn invalidate(&mut self, uri: &str) -> bool {
        self.entries.remove(uri).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
