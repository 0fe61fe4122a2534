//! Turns leveled TOC entries into a nested outline

use super::parser::{ParsedToc, TocEntry};
use crate::error::Result;
use crate::report::Report;
use crate::store::{DocumentStore, OutlineSession};
use crate::structure::{Destination, OutlineItem};
use tracing::{error, info};

/// A TOC entry with the entries nested below it.
#[derive(Debug, Clone, PartialEq)]
pub struct TocNode<'a> {
    pub entry: &'a TocEntry,
    pub children: Vec<TocNode<'a>>,
}

/// Nests entries by level.
///
/// Nodes live in an arena and are addressed by index while a stack holds
/// the chain of open ancestors as `(level, node)`. An entry's parent is the
/// nearest open ancestor with a strictly lower level; entries with no such
/// ancestor are roots.
pub fn nest_entries(entries: &[TocEntry]) -> Vec<TocNode<'_>> {
    let mut children: Vec<Vec<usize>> = Vec::with_capacity(entries.len());
    let mut roots = Vec::new();
    let mut open: Vec<(usize, usize)> = Vec::new();

    for (node, entry) in entries.iter().enumerate() {
        while matches!(open.last(), Some(&(level, _)) if level >= entry.level) {
            open.pop();
        }
        children.push(Vec::new());
        match open.last() {
            Some(&(_, parent)) => children[parent].push(node),
            None => roots.push(node),
        }
        open.push((entry.level, node));
    }

    fn materialize<'a>(node: usize, entries: &'a [TocEntry], children: &[Vec<usize>]) -> TocNode<'a> {
        TocNode {
            entry: &entries[node],
            children: children[node]
                .iter()
                .map(|&child| materialize(child, entries, children))
                .collect(),
        }
    }

    roots
        .into_iter()
        .map(|root| materialize(root, entries, &children))
        .collect()
}

/// Options for importing a table of contents
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    /// Drop the existing outline first instead of appending to it
    pub replace: bool,
}

fn outline_item<S: DocumentStore + ?Sized>(
    store: &S,
    node: &TocNode<'_>,
    report: &mut Report,
) -> OutlineItem {
    let entry = node.entry;
    let mut item = OutlineItem::new(entry.title.as_str());
    match store.page(entry.page as usize) {
        Ok(page) => {
            item = item.with_destination(Destination::fit(page));
            report.push(format!("Added bookmark {} -> {}", entry.title, entry.page));
        }
        Err(e) => {
            error!("Bookmark {:?} has no valid target: {e}", entry.title);
            report.push(format!("Added bookmark {} -> 0", entry.title));
        }
    }
    item.children = node
        .children
        .iter()
        .map(|child| outline_item(store, child, report))
        .collect();
    item
}

/// Attaches the parsed entries to the document outline.
///
/// Entries pointing outside the document are still added, without a
/// destination.
pub fn import_toc<S: DocumentStore + ?Sized>(
    store: &mut S,
    toc: &ParsedToc,
    options: &ImportOptions,
) -> Result<Report> {
    let tree = nest_entries(&toc.entries);
    let mut report = Report::new();

    let mut outline = OutlineSession::open(store)?;
    if options.replace {
        outline.clear();
    }
    let items: Vec<OutlineItem> = tree
        .iter()
        .map(|node| outline_item(outline.store(), node, &mut report))
        .collect();
    outline.extend(items);
    outline.commit()?;

    info!("Imported {} bookmarks", toc.entries.len());
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::Object;
    use crate::store::MemoryDocument;
    use crate::toc::parse_toc;
    use pretty_assertions::assert_eq;

    fn shape(nodes: &[TocNode<'_>]) -> Vec<(String, Vec<String>)> {
        nodes
            .iter()
            .map(|node| {
                (
                    node.entry.title.clone(),
                    node.children.iter().map(|c| c.entry.title.clone()).collect(),
                )
            })
            .collect()
    }

    #[test]
    fn test_siblings_close_back_to_root() {
        let toc = parse_toc("A 1\n B 2\n C 3\nD 4\n");
        let tree = nest_entries(&toc.entries);
        assert_eq!(
            shape(&tree),
            vec![
                ("A".to_string(), vec!["B".to_string(), "C".to_string()]),
                ("D".to_string(), vec![]),
            ]
        );
    }

    #[test]
    fn test_three_levels() {
        let toc = parse_toc("A 1\n B 2\n  C 3\n  D 4\n E 5\nF 6\n G 7\n");
        let tree = nest_entries(&toc.entries);
        assert_eq!(tree.len(), 2);
        let a = &tree[0];
        assert_eq!(a.children.len(), 2);
        assert_eq!(a.children[0].entry.title, "B");
        let grandchildren: Vec<&str> = a.children[0]
            .children
            .iter()
            .map(|c| c.entry.title.as_str())
            .collect();
        assert_eq!(grandchildren, vec!["C", "D"]);
        assert_eq!(a.children[1].entry.title, "E");
        assert!(a.children[1].children.is_empty());
        assert_eq!(tree[1].children[0].entry.title, "G");
    }

    #[test]
    fn test_jump_back_several_levels() {
        let toc = parse_toc("A 1\n B 2\n  C 3\n   D 4\nE 5\n");
        let tree = nest_entries(&toc.entries);
        assert_eq!(tree.len(), 2);
        assert_eq!(tree[1].entry.title, "E");
        assert_eq!(tree[0].children[0].children[0].children[0].entry.title, "D");
    }

    #[test]
    fn test_first_entry_indented_is_root() {
        let entries = vec![TocEntry::new("A", 2, 1), TocEntry::new("B", 0, 2)];
        let tree = nest_entries(&entries);
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn test_empty_input() {
        assert!(nest_entries(&[]).is_empty());
    }

    #[test]
    fn test_import_creates_nested_outline() {
        let mut doc = MemoryDocument::with_pages(5);
        let toc = parse_toc("Intro 1\n Background 2\n Methods 3\nResults 5\n");
        let report = import_toc(&mut doc, &toc, &ImportOptions::default()).unwrap();

        assert_eq!(report.lines()[0], "Added bookmark Intro -> 1");
        let outline = doc.read_outline().unwrap();
        assert_eq!(outline.len(), 2);
        assert_eq!(outline[0].children.len(), 2);
        let target = outline[1].target.as_ref().and_then(Object::as_array).unwrap();
        assert_eq!(target[0], Object::Reference(doc.page(5).unwrap().id()));
    }

    #[test]
    fn test_missing_page_records_zero() {
        let mut doc = MemoryDocument::with_pages(2);
        let toc = parse_toc("Intro 1\nAppendix 9\n");
        let report = import_toc(&mut doc, &toc, &ImportOptions::default()).unwrap();

        assert_eq!(report.lines()[1], "Added bookmark Appendix -> 0");
        let outline = doc.read_outline().unwrap();
        assert_eq!(outline.len(), 2);
        assert!(outline[1].target.is_none());
    }

    #[test]
    fn test_replace_versus_append() {
        let mut doc = MemoryDocument::with_pages(2);
        doc.write_outline(&[OutlineItem::new("Existing")]).unwrap();
        let toc = parse_toc("New 1\n");

        import_toc(&mut doc, &toc, &ImportOptions::default()).unwrap();
        assert_eq!(doc.read_outline().unwrap().len(), 2);

        import_toc(&mut doc, &toc, &ImportOptions { replace: true }).unwrap();
        let outline = doc.read_outline().unwrap();
        assert_eq!(outline.len(), 1);
        assert_eq!(outline[0].title, "New");
    }
}
