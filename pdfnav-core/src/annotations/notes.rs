//! Free text annotations ("notes")

use super::{rectangle, selected_pages, subtype};
use crate::error::Result;
use crate::geometry::Rectangle;
use crate::objects::Object;
use crate::store::DocumentStore;
use crate::toc::bookmark_titles;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Default)]
pub struct NotesOptions {
    /// Only this 1-based page
    pub page: Option<usize>,
    /// Put a heading before the first note of every page
    pub headers: bool,
    /// Include the annotation rectangle
    pub detailed: bool,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Note {
    pub page: usize,
    /// Bookmark title of the page, or `Page N`
    pub heading: Option<String>,
    pub rect: Option<Rectangle>,
    pub contents: String,
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(heading) = &self.heading {
            write!(f, "\n{heading}\n")?;
        }
        if let Some(rect) = &self.rect {
            write!(f, "\n{rect} ")?;
        }
        f.write_str(&self.contents)
    }
}

/// Collects the text of every `/FreeText` annotation, page by page.
pub fn notes<S: DocumentStore + ?Sized>(store: &S, options: &NotesOptions) -> Result<Vec<Note>> {
    let titles = if options.headers {
        bookmark_titles(store)?
    } else {
        BTreeMap::new()
    };

    let mut notes = Vec::new();
    for page in selected_pages(store, options.page)? {
        let mut heading = options.headers.then(|| match titles.get(&page) {
            Some(title) => format!("{title} (page {page})"),
            None => format!("Page {page}"),
        });
        for annotation in store.annotations(page)? {
            if subtype(&annotation) != Some("FreeText") {
                continue;
            }
            notes.push(Note {
                page,
                heading: heading.take(),
                rect: if options.detailed {
                    rectangle(&annotation)
                } else {
                    None
                },
                contents: annotation
                    .get("Contents")
                    .and_then(Object::as_text)
                    .unwrap_or_default()
                    .to_string(),
            });
        }
    }
    Ok(notes)
}
