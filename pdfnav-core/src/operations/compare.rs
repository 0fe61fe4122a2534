//! Structural comparison of two documents

use crate::annotations::{notes, NotesOptions};
use crate::error::Result;
use crate::report::Report;
use crate::store::DocumentStore;

/// Note and root-level bookmark counts of an original and a modified document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CompareReport {
    pub original_notes: usize,
    pub modified_notes: usize,
    pub original_bookmarks: usize,
    pub modified_bookmarks: usize,
}

impl CompareReport {
    pub fn matches(&self) -> bool {
        self.original_notes == self.modified_notes
            && self.original_bookmarks == self.modified_bookmarks
    }

    pub fn lines(&self) -> Report {
        let mut report = Report::new();
        report.push(count_line(
            "notes",
            self.original_notes,
            self.modified_notes,
        ));
        report.push(count_line(
            "bookmarks",
            self.original_bookmarks,
            self.modified_bookmarks,
        ));
        report
    }
}

fn count_line(what: &str, original: usize, modified: usize) -> String {
    if original == modified {
        format!("Same number of {what}: {original}")
    } else {
        format!("Number of {what} don't match: {original} versus {modified}")
    }
}

/// Counts notes and bookmarks in both documents.
pub fn compare<A, B>(original: &A, modified: &B) -> Result<CompareReport>
where
    A: DocumentStore + ?Sized,
    B: DocumentStore + ?Sized,
{
    let all = NotesOptions::default();
    Ok(CompareReport {
        original_notes: notes(original, &all)?.len(),
        modified_notes: notes(modified, &all)?.len(),
        original_bookmarks: original.read_outline()?.len(),
        modified_bookmarks: modified.read_outline()?.len(),
    })
}
