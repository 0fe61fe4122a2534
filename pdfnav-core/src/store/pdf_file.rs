//! Document store backed by a real PDF file, through `lopdf`

use super::convert::{
    decode_text, dict_from_lopdf, encode_text, from_lopdf, id_from_lopdf, id_to_lopdf, to_lopdf,
};
use super::{DocumentStore, PageHandle, SaveOptions};
use crate::error::{IndexError, NavError, OpenError, Result};
use crate::objects::{Dictionary, Object};
use crate::structure::{outline_count, DestinationGroup, GroupId, OutlineItem};
use lopdf::{Document, Object as LoObject, ObjectId as LoObjectId};
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Attributes a page may inherit from its ancestors in the page tree
const INHERITABLE: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

const MAX_TREE_DEPTH: usize = 64;

fn structure(e: lopdf::Error) -> NavError {
    NavError::InvalidStructure(e.to_string())
}

/// Where the `/Names` array of one name tree leaf lives
#[derive(Debug, Clone, Copy)]
enum LeafLocation {
    /// In an indirect node dictionary
    Node(LoObjectId),
    /// In the `/Dests` dictionary held directly by the `/Names` dictionary
    InlineRoot,
    /// The array is an indirect object of its own
    Array(LoObjectId),
}

struct Leaf {
    location: LeafLocation,
    names: Vec<LoObject>,
}

/// An open PDF file.
///
/// Page order changes are kept in a list of page ids and written into the
/// page tree when the document is saved. The tree is flattened at that point:
/// every page becomes a direct kid of the root `/Pages` node and receives its
/// inherited attributes as its own.
#[derive(Debug, Clone)]
pub struct PdfFile {
    document: Document,
    pages: Vec<LoObjectId>,
    pages_dirty: bool,
    path: Option<PathBuf>,
}

impl PdfFile {
    /// Reads and parses the file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let open_error = |reason: String| OpenError {
            path: path.to_path_buf(),
            reason,
        };
        let bytes = fs::read(path).map_err(|e| open_error(e.to_string()))?;
        let document = Document::load_mem(&bytes).map_err(|e| open_error(e.to_string()))?;
        let mut file = Self::from_document(document);
        file.path = Some(path.to_path_buf());
        debug!("Opened {} ({} pages)", path.display(), file.pages.len());
        Ok(file)
    }

    pub fn from_document(document: Document) -> Self {
        let pages = document.get_pages().into_values().collect();
        Self {
            document,
            pages,
            pages_dirty: false,
            path: None,
        }
    }

    /// Path the document was opened from
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn into_document(self) -> Document {
        self.document
    }

    fn catalog_id(&self) -> Result<LoObjectId> {
        self.document
            .trailer
            .get(b"Root")
            .and_then(LoObject::as_reference)
            .map_err(structure)
    }

    fn catalog(&self) -> Result<&lopdf::Dictionary> {
        self.document
            .get_dictionary(self.catalog_id()?)
            .map_err(structure)
    }

    fn deref<'a>(&'a self, object: &'a LoObject) -> &'a LoObject {
        match object {
            LoObject::Reference(id) => self.document.get_object(*id).unwrap_or(object),
            _ => object,
        }
    }

    fn text_of(&self, object: &LoObject) -> String {
        match self.deref(object) {
            LoObject::String(bytes, _) => decode_text(bytes),
            LoObject::Name(name) => String::from_utf8_lossy(name).into_owned(),
            _ => String::new(),
        }
    }

    /// Converts a destination value, following references to the value
    /// itself and to a wrapper's `/D` array.
    fn destination_value(&self, object: &LoObject) -> Object {
        let mut value = from_lopdf(self.deref(object));
        if let LoObject::Dictionary(dict) = self.deref(object) {
            if let Ok(d) = dict.get(b"D") {
                if let (LoObject::Reference(_), Object::Dictionary(converted)) = (d, &mut value) {
                    converted.set("D", from_lopdf(self.deref(d)));
                }
            }
        }
        value
    }

    fn inherited_attribute(&self, page: LoObjectId, key: &[u8]) -> Option<LoObject> {
        let mut current = self
            .document
            .get_dictionary(page)
            .ok()?
            .get(b"Parent")
            .and_then(LoObject::as_reference)
            .ok();
        let mut depth = 0;
        while let Some(id) = current {
            depth += 1;
            if depth > MAX_TREE_DEPTH {
                break;
            }
            let node = self.document.get_dictionary(id).ok()?;
            if let Ok(value) = node.get(key) {
                return Some(value.clone());
            }
            current = node.get(b"Parent").and_then(LoObject::as_reference).ok();
        }
        None
    }

    /// Rewrites the page tree to match the current page order.
    fn sync_page_tree(&mut self) -> Result<()> {
        let root_id = self
            .catalog()?
            .get(b"Pages")
            .and_then(LoObject::as_reference)
            .map_err(structure)?;

        let mut materialized = Vec::new();
        for &page in &self.pages {
            let Ok(dict) = self.document.get_dictionary(page) else {
                continue;
            };
            for key in INHERITABLE {
                if !dict.has(key) {
                    if let Some(value) = self.inherited_attribute(page, key) {
                        materialized.push((page, key, value));
                    }
                }
            }
        }
        for (page, key, value) in materialized {
            self.document
                .get_dictionary_mut(page)
                .map_err(structure)?
                .set(key.to_vec(), value);
        }

        for &page in &self.pages {
            if let Ok(dict) = self.document.get_dictionary_mut(page) {
                dict.set("Parent", root_id);
            }
        }

        let kids: Vec<LoObject> = self.pages.iter().map(|&id| LoObject::Reference(id)).collect();
        let root = self
            .document
            .get_dictionary_mut(root_id)
            .map_err(structure)?;
        root.set("Kids", kids);
        root.set("Count", self.pages.len() as i64);
        debug!("Flattened page tree to {} pages", self.pages.len());
        Ok(())
    }

    /// `/Names` dictionary of the catalog, and its object id when indirect.
    fn names_dictionary(&self) -> Option<(&lopdf::Dictionary, Option<LoObjectId>)> {
        let entry = self.catalog().ok()?.get(b"Names").ok()?;
        let id = entry.as_reference().ok();
        let dict = self.deref(entry).as_dict().ok()?;
        Some((dict, id))
    }

    /// Name tree leaves under `/Root/Names/Dests`, in document order.
    fn destination_leaves(&self) -> Vec<Leaf> {
        let mut leaves = Vec::new();
        let Some((names, _)) = self.names_dictionary() else {
            return leaves;
        };
        let Ok(dests) = names.get(b"Dests") else {
            return leaves;
        };
        let location = match dests.as_reference() {
            Ok(id) => LeafLocation::Node(id),
            Err(_) => LeafLocation::InlineRoot,
        };
        if let Ok(node) = self.deref(dests).as_dict() {
            let mut visited = HashSet::new();
            self.collect_leaves(node, location, 0, &mut visited, &mut leaves);
        }
        leaves
    }

    fn collect_leaves(
        &self,
        node: &lopdf::Dictionary,
        location: LeafLocation,
        depth: usize,
        visited: &mut HashSet<LoObjectId>,
        leaves: &mut Vec<Leaf>,
    ) {
        if depth > MAX_TREE_DEPTH {
            warn!("Name tree deeper than {MAX_TREE_DEPTH} levels, ignoring the rest");
            return;
        }
        if let Ok(names) = node.get(b"Names") {
            let location = match names.as_reference() {
                Ok(id) => LeafLocation::Array(id),
                Err(_) => location,
            };
            if let Ok(array) = self.deref(names).as_array() {
                leaves.push(Leaf {
                    location,
                    names: array.clone(),
                });
            }
        }
        let Ok(kids) = node.get(b"Kids") else {
            return;
        };
        let Ok(kids) = self.deref(kids).as_array() else {
            return;
        };
        for kid in kids {
            match kid.as_reference() {
                Ok(id) if visited.insert(id) => {
                    if let Ok(child) = self.document.get_dictionary(id) {
                        self.collect_leaves(child, LeafLocation::Node(id), depth + 1, visited, leaves);
                    }
                }
                Ok(id) => warn!("Name tree node {} {} visited twice", id.0, id.1),
                Err(_) => debug!("Skipping direct name tree kid"),
            }
        }
    }

    fn names_array_mut(&mut self, location: LeafLocation) -> Result<&mut Vec<LoObject>> {
        let missing = || NavError::InvalidStructure("name tree leaf disappeared".to_string());
        match location {
            LeafLocation::Array(id) => self
                .document
                .get_object_mut(id)
                .and_then(LoObject::as_array_mut)
                .map_err(structure),
            LeafLocation::Node(id) => self
                .document
                .get_dictionary_mut(id)
                .and_then(|node| node.get_mut(b"Names"))
                .and_then(LoObject::as_array_mut)
                .map_err(structure),
            LeafLocation::InlineRoot => {
                let names_id = self.names_dictionary().and_then(|(_, id)| id);
                let names = match names_id {
                    Some(id) => self.document.get_dictionary_mut(id).map_err(structure)?,
                    None => {
                        let catalog_id = self.catalog_id()?;
                        self.document
                            .get_dictionary_mut(catalog_id)
                            .and_then(|catalog| catalog.get_mut(b"Names"))
                            .and_then(LoObject::as_dict_mut)
                            .map_err(structure)?
                    }
                };
                names
                    .get_mut(b"Dests")
                    .and_then(LoObject::as_dict_mut)
                    .and_then(|dests| dests.get_mut(b"Names"))
                    .and_then(LoObject::as_array_mut)
                    .map_err(|_| missing())
            }
        }
    }

    fn outline_target(&self, item: &lopdf::Dictionary) -> Option<Object> {
        if let Ok(dest) = item.get(b"Dest") {
            return Some(self.destination_value(dest));
        }
        let action = self.deref(item.get(b"A").ok()?).as_dict().ok()?;
        let kind = action.get(b"S").and_then(LoObject::as_name).ok()?;
        if kind != b"GoTo" {
            return None;
        }
        Some(self.destination_value(action.get(b"D").ok()?))
    }

    fn read_outline_level(
        &self,
        first: Option<LoObjectId>,
        depth: usize,
        visited: &mut HashSet<LoObjectId>,
    ) -> Vec<OutlineItem> {
        let mut items = Vec::new();
        if depth > MAX_TREE_DEPTH {
            warn!("Outline deeper than {MAX_TREE_DEPTH} levels, ignoring the rest");
            return items;
        }
        let mut current = first;
        while let Some(id) = current {
            if !visited.insert(id) {
                warn!("Outline item {} {} visited twice, stopping", id.0, id.1);
                break;
            }
            let Ok(dict) = self.document.get_dictionary(id) else {
                break;
            };
            let mut item = OutlineItem::new(
                dict.get(b"Title")
                    .map(|title| self.text_of(title))
                    .unwrap_or_default(),
            );
            item.target = self.outline_target(dict);
            item.open = dict
                .get(b"Count")
                .and_then(LoObject::as_i64)
                .map(|count| count >= 0)
                .unwrap_or(true);
            let child = dict.get(b"First").and_then(LoObject::as_reference).ok();
            item.children = self.read_outline_level(child, depth + 1, visited);
            items.push(item);
            current = dict.get(b"Next").and_then(LoObject::as_reference).ok();
        }
        items
    }

    fn write_outline_level(&mut self, items: &[OutlineItem], parent: LoObjectId) -> Vec<LoObjectId> {
        let ids: Vec<LoObjectId> = items.iter().map(|_| self.document.new_object_id()).collect();
        for (i, item) in items.iter().enumerate() {
            let mut dict = lopdf::Dictionary::new();
            dict.set("Title", encode_text(&item.title));
            dict.set("Parent", parent);
            if i > 0 {
                dict.set("Prev", ids[i - 1]);
            }
            if i + 1 < ids.len() {
                dict.set("Next", ids[i + 1]);
            }
            let children = self.write_outline_level(&item.children, ids[i]);
            if let (Some(first), Some(last)) = (children.first(), children.last()) {
                dict.set("First", *first);
                dict.set("Last", *last);
                dict.set("Count", outline_count(&item.children, item.open));
            }
            if let Some(target) = &item.target {
                dict.set("Dest", to_lopdf(target));
            }
            self.document
                .objects
                .insert(ids[i], LoObject::Dictionary(dict));
        }
        ids
    }
}

impl DocumentStore for PdfFile {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page(&self, number: usize) -> std::result::Result<PageHandle, IndexError> {
        IndexError::check(number, self.pages.len())?;
        Ok(PageHandle::new(id_from_lopdf(self.pages[number - 1])))
    }

    fn page_number(&self, handle: PageHandle) -> Option<usize> {
        let id = id_to_lopdf(handle.id());
        self.pages
            .iter()
            .position(|page| *page == id)
            .map(|index| index + 1)
    }

    fn set_page(
        &mut self,
        number: usize,
        handle: PageHandle,
    ) -> std::result::Result<(), IndexError> {
        IndexError::check(number, self.pages.len())?;
        self.pages[number - 1] = id_to_lopdf(handle.id());
        self.pages_dirty = true;
        Ok(())
    }

    fn clear_page(&mut self, number: usize) -> std::result::Result<(), IndexError> {
        let handle = self.page(number)?;
        if let Ok(dict) = self.document.get_dictionary_mut(id_to_lopdf(handle.id())) {
            *dict = lopdf::Dictionary::new();
        }
        Ok(())
    }

    fn remove_page(&mut self, number: usize) -> std::result::Result<(), IndexError> {
        IndexError::check(number, self.pages.len())?;
        self.pages.remove(number - 1);
        self.pages_dirty = true;
        Ok(())
    }

    fn read_outline(&self) -> Result<Vec<OutlineItem>> {
        let catalog = self.catalog()?;
        let Ok(outlines) = catalog.get(b"Outlines") else {
            return Ok(Vec::new());
        };
        let Ok(root) = self.deref(outlines).as_dict() else {
            return Ok(Vec::new());
        };
        let first = root.get(b"First").and_then(LoObject::as_reference).ok();
        let mut visited = HashSet::new();
        Ok(self.read_outline_level(first, 0, &mut visited))
    }

    fn write_outline(&mut self, items: &[OutlineItem]) -> Result<()> {
        let catalog_id = self.catalog_id()?;
        if items.is_empty() {
            self.document
                .get_dictionary_mut(catalog_id)
                .map_err(structure)?
                .remove(b"Outlines");
            return Ok(());
        }

        let root_id = self.document.new_object_id();
        let children = self.write_outline_level(items, root_id);
        let mut root = lopdf::Dictionary::new();
        root.set("Type", LoObject::Name(b"Outlines".to_vec()));
        if let (Some(first), Some(last)) = (children.first(), children.last()) {
            root.set("First", *first);
            root.set("Last", *last);
        }
        root.set("Count", outline_count(items, true));
        self.document
            .objects
            .insert(root_id, LoObject::Dictionary(root));
        self.document
            .get_dictionary_mut(catalog_id)
            .map_err(structure)?
            .set("Outlines", root_id);
        Ok(())
    }

    fn destination_groups(&self) -> Result<Vec<DestinationGroup>> {
        Ok(self
            .destination_leaves()
            .iter()
            .enumerate()
            .map(|(index, leaf)| {
                let names: Vec<Object> = leaf
                    .names
                    .iter()
                    .enumerate()
                    .map(|(i, item)| {
                        if i % 2 == 0 {
                            from_lopdf(self.deref(item))
                        } else {
                            self.destination_value(item)
                        }
                    })
                    .collect();
                DestinationGroup::from_names_array(GroupId(index), &names)
            })
            .collect())
    }

    fn write_destination_group(&mut self, group: &DestinationGroup) -> Result<()> {
        let leaves = self.destination_leaves();
        let leaf = leaves.get(group.id().0).ok_or_else(|| {
            NavError::InvalidStructure(format!("unknown destination group {}", group.id().0))
        })?;

        let mut direct = Vec::new();
        for (pair, new_value) in group.values().enumerate() {
            let slot = 2 * pair + 1;
            let Some(original) = leaf.names.get(slot) else {
                continue;
            };
            if self.destination_value(original) == *new_value {
                continue;
            }
            match original {
                LoObject::Reference(id) if self.document.get_object(*id).is_ok() => {
                    self.document.objects.insert(*id, to_lopdf(new_value));
                }
                _ => direct.push((slot, to_lopdf(new_value))),
            }
        }

        if !direct.is_empty() {
            let names = self.names_array_mut(leaf.location)?;
            for (slot, value) in direct {
                if let Some(entry) = names.get_mut(slot) {
                    *entry = value;
                }
            }
        }
        Ok(())
    }

    fn annotations(&self, number: usize) -> Result<Vec<Dictionary>> {
        let handle = self.page(number)?;
        let page = self
            .document
            .get_dictionary(id_to_lopdf(handle.id()))
            .map_err(structure)?;
        let Ok(annots) = page.get(b"Annots") else {
            return Ok(Vec::new());
        };
        let Ok(list) = self.deref(annots).as_array() else {
            return Ok(Vec::new());
        };

        let mut result = Vec::with_capacity(list.len());
        for entry in list {
            let Ok(dict) = self.deref(entry).as_dict() else {
                continue;
            };
            let mut converted = dict_from_lopdf(dict);
            if let Ok(action) = dict.get(b"A") {
                let raw_action = self.deref(action);
                let mut action_value = from_lopdf(raw_action);
                if let (Object::Dictionary(resolved), LoObject::Dictionary(raw)) =
                    (&mut action_value, raw_action)
                {
                    if let Ok(d) = raw.get(b"D") {
                        resolved.set("D", self.destination_value(d));
                    }
                }
                converted.set("A", action_value);
            }
            if let Ok(rect) = dict.get(b"Rect") {
                converted.set("Rect", from_lopdf(self.deref(rect)));
            }
            result.push(converted);
        }
        Ok(result)
    }

    fn save(&mut self, path: &Path, options: &SaveOptions) -> Result<()> {
        if self.pages_dirty {
            self.sync_page_tree()?;
            let pruned = self.document.prune_objects();
            debug!("Dropped {} unreachable objects", pruned.len());
            self.pages_dirty = false;
        }
        if options.fast_web_view {
            warn!("Linearized output is not supported, writing a regular file");
        }

        let save_error = |reason: String| NavError::Save {
            path: path.to_path_buf(),
            reason,
        };
        let file = File::create(path).map_err(|e| save_error(e.to_string()))?;
        let mut writer = BufWriter::new(file);
        self.document
            .save_to(&mut writer)
            .map_err(|e| save_error(e.to_string()))?;
        writer.flush().map_err(|e| save_error(e.to_string()))?;
        debug!("Saved {} pages to {}", self.pages.len(), path.display());
        Ok(())
    }
}

#[cfg(test)]
#[path = "pdf_file_tests.rs"]
mod tests;
