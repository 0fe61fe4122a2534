//! In-memory document store

use super::{DocumentStore, PageHandle, SaveOptions};
use crate::error::{IndexError, NavError, Result};
use crate::objects::{Dictionary, Object, ObjectId};
use crate::structure::{DestinationGroup, GroupId, OutlineItem};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Document held entirely in memory.
///
/// Pages are bare object ids with an attribute dictionary each; annotations
/// live under the page's `/Annots` entry as an array of dictionaries.
/// `save` performs no I/O, it only records the requested path.
///
/// # Example
///
/// ```rust
/// use pdfnav::objects::Object;
/// use pdfnav::store::{DocumentStore, MemoryDocument};
/// use pdfnav::structure::Destination;
///
/// let mut doc = MemoryDocument::with_pages(3);
/// let target = doc.page(2).unwrap();
/// doc.add_named_destination("results", Object::Array(Destination::fit(target).to_array()));
/// assert_eq!(doc.page_count(), 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryDocument {
    pages: Vec<PageHandle>,
    page_dicts: HashMap<ObjectId, Dictionary>,
    outline: Vec<OutlineItem>,
    groups: Vec<DestinationGroup>,
    next_id: u32,
    saved: Vec<PathBuf>,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            ..Default::default()
        }
    }

    /// Document with `count` empty pages
    pub fn with_pages(count: usize) -> Self {
        let mut doc = Self::new();
        for _ in 0..count {
            doc.add_page();
        }
        doc
    }

    fn next_object_id(&mut self) -> ObjectId {
        let id = ObjectId::new(self.next_id.max(1), 0);
        self.next_id = id.number() + 1;
        id
    }

    /// Appends an empty page and returns its handle.
    pub fn add_page(&mut self) -> PageHandle {
        let id = self.next_object_id();
        let handle = PageHandle::new(id);
        self.page_dicts
            .insert(id, Dictionary::new().with("Type", Object::name("Page")));
        self.pages.push(handle);
        handle
    }

    /// Attribute dictionary of a page, if the handle is (or was) a page.
    pub fn page_dict(&self, handle: PageHandle) -> Option<&Dictionary> {
        self.page_dicts.get(&handle.id())
    }

    /// Adds an annotation dictionary to the page at `number`.
    pub fn add_annotation(
        &mut self,
        number: usize,
        annotation: Dictionary,
    ) -> std::result::Result<(), IndexError> {
        let handle = self.page(number)?;
        let dict = self.page_dicts.entry(handle.id()).or_default();
        match dict.get_mut("Annots") {
            Some(Object::Array(annots)) => annots.push(Object::Dictionary(annotation)),
            _ => dict.set("Annots", Object::Array(vec![Object::Dictionary(annotation)])),
        }
        Ok(())
    }

    /// Adds a new, empty destination group.
    pub fn add_destination_group(&mut self) -> GroupId {
        let id = GroupId(self.groups.len());
        self.groups.push(DestinationGroup::new(id, Vec::new()));
        id
    }

    /// Appends a named destination to the last group, creating one if needed.
    pub fn add_named_destination(&mut self, name: impl Into<String>, value: Object) {
        if self.groups.is_empty() {
            self.add_destination_group();
        }
        let last = self.groups.len() - 1;
        let id = self.groups[last].id();
        let mut entries: Vec<(String, Object)> = self.groups[last]
            .iter()
            .map(|(key, value)| (key.to_string(), value.clone()))
            .collect();
        entries.push((name.into(), value));
        self.groups[last] = DestinationGroup::new(id, entries);
    }

    /// Paths passed to `save`, oldest first
    pub fn saved_paths(&self) -> &[PathBuf] {
        &self.saved
    }

    /// Current page order as handles
    pub fn page_handles(&self) -> &[PageHandle] {
        &self.pages
    }
}

impl DocumentStore for MemoryDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page(&self, number: usize) -> std::result::Result<PageHandle, IndexError> {
        IndexError::check(number, self.pages.len())?;
        Ok(self.pages[number - 1])
    }

    fn page_number(&self, handle: PageHandle) -> Option<usize> {
        self.pages
            .iter()
            .position(|page| *page == handle)
            .map(|index| index + 1)
    }

    fn set_page(
        &mut self,
        number: usize,
        handle: PageHandle,
    ) -> std::result::Result<(), IndexError> {
        IndexError::check(number, self.pages.len())?;
        self.pages[number - 1] = handle;
        Ok(())
    }

    fn clear_page(&mut self, number: usize) -> std::result::Result<(), IndexError> {
        let handle = self.page(number)?;
        if let Some(dict) = self.page_dicts.get_mut(&handle.id()) {
            dict.clear();
        }
        Ok(())
    }

    fn remove_page(&mut self, number: usize) -> std::result::Result<(), IndexError> {
        IndexError::check(number, self.pages.len())?;
        self.pages.remove(number - 1);
        Ok(())
    }

    fn read_outline(&self) -> Result<Vec<OutlineItem>> {
        Ok(self.outline.clone())
    }

    fn write_outline(&mut self, items: &[OutlineItem]) -> Result<()> {
        self.outline = items.to_vec();
        Ok(())
    }

    fn destination_groups(&self) -> Result<Vec<DestinationGroup>> {
        Ok(self.groups.clone())
    }

    fn write_destination_group(&mut self, group: &DestinationGroup) -> Result<()> {
        let slot = self.groups.get_mut(group.id().0).ok_or_else(|| {
            NavError::InvalidStructure(format!("unknown destination group {}", group.id().0))
        })?;
        *slot = group.clone();
        Ok(())
    }

    fn annotations(&self, number: usize) -> Result<Vec<Dictionary>> {
        let handle = self.page(number)?;
        let annots = self
            .page_dicts
            .get(&handle.id())
            .and_then(|dict| dict.get("Annots"))
            .and_then(Object::as_array)
            .map(|items| items.iter().filter_map(Object::as_dict).cloned().collect())
            .unwrap_or_default();
        Ok(annots)
    }

    fn save(&mut self, path: &Path, options: &SaveOptions) -> Result<()> {
        debug!(
            "Recording save of {} pages to {} (fast web view: {})",
            self.pages.len(),
            path.display(),
            options.fast_web_view
        );
        self.saved.push(path.to_path_buf());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_pages_assigns_distinct_ids() {
        let doc = MemoryDocument::with_pages(3);
        assert_eq!(doc.page_count(), 3);
        let ids: Vec<_> = doc.page_handles().iter().map(|p| p.id()).collect();
        assert_eq!(
            ids,
            vec![ObjectId::new(1, 0), ObjectId::new(2, 0), ObjectId::new(3, 0)]
        );
    }

    #[test]
    fn test_page_bounds() {
        let doc = MemoryDocument::with_pages(2);
        assert!(doc.page(0).is_err());
        assert!(doc.page(1).is_ok());
        assert!(doc.page(2).is_ok());
        assert_eq!(
            doc.page(3),
            Err(IndexError {
                number: 3,
                page_count: 2
            })
        );
    }

    #[test]
    fn test_remove_page_shifts_numbers() {
        let mut doc = MemoryDocument::with_pages(3);
        let third = doc.page(3).unwrap();
        doc.remove_page(1).unwrap();
        assert_eq!(doc.page_count(), 2);
        assert_eq!(doc.page_number(third), Some(2));
    }

    #[test]
    fn test_clear_page_drops_annotations() {
        let mut doc = MemoryDocument::with_pages(1);
        doc.add_annotation(1, Dictionary::new().with("Subtype", Object::name("FreeText")))
            .unwrap();
        assert_eq!(doc.annotations(1).unwrap().len(), 1);

        doc.clear_page(1).unwrap();
        assert!(doc.annotations(1).unwrap().is_empty());
        assert!(doc.page_dict(doc.page(1).unwrap()).unwrap().is_empty());
    }

    #[test]
    fn test_named_destinations_share_last_group() {
        let mut doc = MemoryDocument::with_pages(1);
        doc.add_named_destination("a", Object::Null);
        doc.add_named_destination("b", Object::Null);
        doc.add_destination_group();
        doc.add_named_destination("c", Object::Null);

        let groups = doc.destination_groups().unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].len(), 2);
        assert_eq!(groups[1].len(), 1);
    }

    #[test]
    fn test_save_records_path() {
        let mut doc = MemoryDocument::with_pages(1);
        doc.save(Path::new("out.pdf"), &SaveOptions::default())
            .unwrap();
        assert_eq!(doc.saved_paths(), &[PathBuf::from("out.pdf")]);
    }
}
