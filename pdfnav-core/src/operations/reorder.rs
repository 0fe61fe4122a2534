//! PDF page reordering functionality
//!
//! This module provides functionality to reorder pages within a PDF document.

use crate::error::{IndexError, Result};
use crate::report::Report;
use crate::store::DocumentStore;
use tracing::{debug, info};

/// Page reorderer
///
/// Collects one report line per operation; call [`PageReorderer::finish`]
/// to take them.
pub struct PageReorderer<'a, S: DocumentStore + ?Sized> {
    store: &'a mut S,
    report: Report,
}

impl<'a, S: DocumentStore + ?Sized> PageReorderer<'a, S> {
    /// Create a new page reorderer
    pub fn new(store: &'a mut S) -> Self {
        Self {
            store,
            report: Report::new(),
        }
    }

    /// Exchange the pages at two 1-based positions
    pub fn swap(&mut self, a: usize, b: usize) -> Result<&mut Self> {
        self.exchange(a, b)?;
        info!(a, b, "swapped pages");
        self.report.push(format!("Swapped page {a} with page {b}"));
        Ok(self)
    }

    /// Move the page at `source` to `target`, keeping the order of the others
    pub fn cut(&mut self, source: usize, target: usize) -> Result<&mut Self> {
        let count = self.store.page_count();
        IndexError::check(source, count)?;
        IndexError::check(target, count)?;

        let mut position = source;
        while position != target {
            let next = if position < target {
                position + 1
            } else {
                position - 1
            };
            self.exchange(position, next)?;
            position = next;
        }

        info!(source, target, "moved page");
        self.report
            .push(format!("Moved page {source} to position {target}"));
        Ok(self)
    }

    /// Report of everything done so far
    pub fn finish(self) -> Report {
        self.report
    }

    fn exchange(&mut self, a: usize, b: usize) -> Result<()> {
        let first = self.store.page(a)?;
        let second = self.store.page(b)?;
        debug!(a, b, "exchanging page handles");
        self.store.set_page(a, second)?;
        self.store.set_page(b, first)?;
        Ok(())
    }
}

/// Swap two pages
pub fn swap_pages<S: DocumentStore + ?Sized>(store: &mut S, a: usize, b: usize) -> Result<Report> {
    let mut reorderer = PageReorderer::new(store);
    reorderer.swap(a, b)?;
    Ok(reorderer.finish())
}

/// Move a page to a new position
pub fn cut_page<S: DocumentStore + ?Sized>(
    store: &mut S,
    source: usize,
    target: usize,
) -> Result<Report> {
    let mut reorderer = PageReorderer::new(store);
    reorderer.cut(source, target)?;
    Ok(reorderer.finish())
}

#[cfg(test)]
#[path = "reorder_tests.rs"]
mod tests;
