//! Capability interface to the document being edited
//!
//! The engine never touches files or byte-level PDF syntax. Everything it
//! needs from a document goes through [`DocumentStore`]: page lookup and
//! placement, the outline, the named destination groups and page
//! annotations. Two stores ship with the crate:
//!
//! - [`PdfFile`] edits a real PDF through `lopdf`
//! - [`MemoryDocument`] keeps everything in plain vectors, for tests and for
//!   callers that assemble documents programmatically
//!
//! Page numbers are 1-based on every method of the trait.

mod convert;
mod memory;
mod pdf_file;

pub use memory::MemoryDocument;
pub use pdf_file::PdfFile;

use crate::error::{IndexError, ResolutionFailure, Result};
use crate::objects::{Dictionary, ObjectId};
use crate::structure::{Destination, DestinationGroup, OutlineItem};
use std::ops::{Deref, DerefMut};
use std::path::Path;
use tracing::error;

/// Opaque handle to a page object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageHandle(ObjectId);

impl PageHandle {
    pub fn new(id: ObjectId) -> Self {
        Self(id)
    }

    pub fn id(&self) -> ObjectId {
        self.0
    }
}

/// Options for writing a document
#[derive(Debug, Clone, Default)]
pub struct SaveOptions {
    /// Ask for a linearized ("fast web view") file
    pub fast_web_view: bool,
}

/// Access to one open document.
pub trait DocumentStore {
    /// Number of pages in the document
    fn page_count(&self) -> usize;

    /// Handle of the page at a 1-based position
    fn page(&self, number: usize) -> std::result::Result<PageHandle, IndexError>;

    /// Current 1-based position of a page, `None` when the handle is not a
    /// page of this document (deleted, or some other object)
    fn page_number(&self, handle: PageHandle) -> Option<usize>;

    /// Places a page at a 1-based position, replacing whatever was there.
    ///
    /// The same page may transiently occupy two positions while a caller
    /// exchanges pages.
    fn set_page(&mut self, number: usize, handle: PageHandle)
        -> std::result::Result<(), IndexError>;

    /// Drops the page's own keyed attributes (contents, annotations, ...)
    /// so nothing in the store keeps pointing back from a page being deleted.
    fn clear_page(&mut self, number: usize) -> std::result::Result<(), IndexError>;

    /// Removes the page at a 1-based position; later pages move up by one.
    fn remove_page(&mut self, number: usize) -> std::result::Result<(), IndexError>;

    /// Root-level outline items, with their subtrees
    ///
    /// # Errors
    ///
    /// Returns an error if the outline exists but cannot be read at all.
    fn read_outline(&self) -> Result<Vec<OutlineItem>>;

    /// Replaces the root's children with `items`. An empty slice deletes the
    /// outline.
    fn write_outline(&mut self, items: &[OutlineItem]) -> Result<()>;

    /// Every leaf of the named destination tree, in document order
    fn destination_groups(&self) -> Result<Vec<DestinationGroup>>;

    /// Stores the (possibly rewritten) values of a group obtained from
    /// [`DocumentStore::destination_groups`].
    fn write_destination_group(&mut self, group: &DestinationGroup) -> Result<()>;

    /// Annotation dictionaries of a page, with the `/A` action resolved
    fn annotations(&self, number: usize) -> Result<Vec<Dictionary>>;

    /// Writes the document to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::NavError::Save`] if the file cannot be written.
    fn save(&mut self, path: &Path, options: &SaveOptions) -> Result<()>;

    /// 1-based page number a destination points at.
    fn resolve_destination(
        &self,
        destination: &Destination,
    ) -> std::result::Result<usize, ResolutionFailure> {
        let handle = destination.page_handle()?;
        self.page_number(handle)
            .ok_or(ResolutionFailure::Dangling(handle.id()))
    }
}

/// Scoped access to the outline root.
///
/// The items are read when the session opens and written back on
/// [`OutlineSession::commit`], or when the session is dropped.
pub struct OutlineSession<'a, S: DocumentStore + ?Sized> {
    store: &'a mut S,
    items: Vec<OutlineItem>,
    flushed: bool,
}

impl<'a, S: DocumentStore + ?Sized> OutlineSession<'a, S> {
    pub fn open(store: &'a mut S) -> Result<Self> {
        let items = store.read_outline()?;
        Ok(Self {
            store,
            items,
            flushed: false,
        })
    }

    /// Read-only view of the store while the session is open
    pub fn store(&self) -> &S {
        &*self.store
    }

    /// Writes the items back and reports failures to the caller.
    pub fn commit(mut self) -> Result<()> {
        self.flushed = true;
        self.store.write_outline(&self.items)
    }
}

impl<S: DocumentStore + ?Sized> Deref for OutlineSession<'_, S> {
    type Target = Vec<OutlineItem>;

    fn deref(&self) -> &Self::Target {
        &self.items
    }
}

impl<S: DocumentStore + ?Sized> DerefMut for OutlineSession<'_, S> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.items
    }
}

impl<S: DocumentStore + ?Sized> Drop for OutlineSession<'_, S> {
    fn drop(&mut self) {
        if !self.flushed {
            if let Err(e) = self.store.write_outline(&self.items) {
                error!("Could not write outline: {e}");
            }
        }
    }
}
