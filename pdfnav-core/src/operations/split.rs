//! PDF splitting functionality
//!
//! Splits a document into single-page documents.

use crate::error::Result;
use crate::store::DocumentStore;
use tracing::{debug, info};

/// One copy of `store` per page, each holding only that page.
///
/// Dropped pages are cleared before they are removed, so references left in
/// the copy (named destinations, links) no longer reach their contents. The
/// copies carry no outline: bookmarks of the whole document would point at
/// pages the part no longer has.
pub fn split_pages<S: DocumentStore + Clone>(store: &S) -> Result<Vec<S>> {
    let count = store.page_count();
    let mut parts = Vec::with_capacity(count);

    for keep in 1..=count {
        let mut part = store.clone();
        for number in (1..=count).rev().filter(|&number| number != keep) {
            part.clear_page(number)?;
            part.remove_page(number)?;
        }
        part.write_outline(&[])?;
        debug!(page = keep, "split off page");
        parts.push(part);
    }

    info!(parts = parts.len(), "split document");
    Ok(parts)
}

/// File name of the `index`-th part (1-based): `prefix-001.pdf`
pub fn split_file_name(prefix: &str, index: usize) -> String {
    format!("{prefix}-{index:03}.pdf")
}

#[cfg(test)]
#[path = "split_tests.rs"]
mod tests;
