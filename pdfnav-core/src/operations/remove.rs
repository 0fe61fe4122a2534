//! Removing pages by range

use super::PageRanges;
use crate::error::Result;
use crate::report::Report;
use crate::store::DocumentStore;
use tracing::info;

/// Removes every page in `ranges`.
///
/// All numbers are checked before the first page goes. Pages are removed
/// from the highest number down, so each number still names the page it did
/// in the original document; every page is cleared before it is removed.
///
/// # Example
///
/// ```rust
/// use pdfnav::operations::{remove_pages, PageRanges};
/// use pdfnav::store::{DocumentStore, MemoryDocument};
///
/// let mut doc = MemoryDocument::with_pages(10);
/// let report = remove_pages(&mut doc, &PageRanges::parse("1,3-4,7").unwrap()).unwrap();
/// assert_eq!(doc.page_count(), 6);
/// assert_eq!(report.lines()[0], "Removing page 7");
/// ```
pub fn remove_pages<S: DocumentStore + ?Sized>(store: &mut S, ranges: &PageRanges) -> Result<Report> {
    ranges.validate(store.page_count())?;

    let mut report = Report::new();
    for number in ranges.pages().rev() {
        info!(page = number, "removing page");
        report.push(format!("Removing page {number}"));
        store.clear_page(number)?;
        store.remove_page(number)?;
    }
    Ok(report)
}
