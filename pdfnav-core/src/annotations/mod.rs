//! Reading page annotations according to ISO 32000-1 Chapter 12.5
//!
//! Only two kinds matter here: free text notes, and link rectangles with
//! their actions.

pub mod notes;
pub mod page_links;

pub use notes::{notes, Note, NotesOptions};
pub use page_links::{page_links, LinkKind, PageLink, PageLinkOptions};

use crate::error::Result;
use crate::geometry::Rectangle;
use crate::objects::Dictionary;
use crate::store::DocumentStore;
use std::ops::RangeInclusive;

fn subtype(annotation: &Dictionary) -> Option<&str> {
    annotation.get_name("Subtype")
}

fn rectangle(annotation: &Dictionary) -> Option<Rectangle> {
    annotation
        .get("Rect")
        .and_then(|rect| rect.as_array())
        .and_then(|values| Rectangle::from_array(values))
}

/// One page when given (checked against the document), else all pages
fn selected_pages<S: DocumentStore + ?Sized>(
    store: &S,
    page: Option<usize>,
) -> Result<RangeInclusive<usize>> {
    match page {
        Some(number) => {
            store.page(number)?;
            Ok(number..=number)
        }
        None => Ok(1..=store.page_count()),
    }
}
