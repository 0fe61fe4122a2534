//! Reading the outline back out as table of contents text

use super::parser::TocEntry;
use crate::error::Result;
use crate::links::resolver::{resolve_links, resolve_value};
use crate::objects::Object;
use crate::report::Report;
use crate::store::{DocumentStore, OutlineSession};
use crate::structure::{Destination, OutlineItem};
use std::collections::BTreeMap;
use tracing::debug;

/// Page an outline target points at, `0` when it cannot be resolved.
///
/// Named targets go through the resolved named destination map.
pub(crate) fn target_page<S: DocumentStore + ?Sized>(
    store: &S,
    target: Option<&Object>,
    named: &BTreeMap<String, usize>,
) -> usize {
    let Some(target) = target else {
        return 0;
    };
    if let Some(name) = target.as_text() {
        return named.get(name).copied().unwrap_or(0);
    }
    resolve_value(store, target).unwrap_or_else(|failure| {
        debug!("Outline target {target} does not resolve: {failure}");
        0
    })
}

/// Outline items as leveled entries, depth first. Levels are tree depths.
pub fn outline_entries<S: DocumentStore + ?Sized>(store: &S) -> Result<Vec<TocEntry>> {
    let outline = store.read_outline()?;
    let named = resolve_links(store)?;
    let mut entries = Vec::new();
    for root in &outline {
        root.walk(0, &mut |item: &OutlineItem, depth| {
            let page = target_page(store, item.target.as_ref(), &named);
            entries.push(TocEntry::new(
                item.title.as_str(),
                depth,
                u32::try_from(page).unwrap_or(0),
            ));
        });
    }
    Ok(entries)
}

/// The outline as table of contents text: one line per item, a single
/// leading space per level, then title and page.
pub fn export_toc<S: DocumentStore + ?Sized>(store: &S) -> Result<String> {
    let mut text = String::new();
    for entry in outline_entries(store)? {
        text.push_str(&" ".repeat(entry.level));
        text.push_str(&entry.title);
        text.push(' ');
        text.push_str(&entry.page.to_string());
        text.push('\n');
    }
    Ok(text)
}

/// First bookmark title found for each page, over the whole outline
pub fn bookmark_titles<S: DocumentStore + ?Sized>(store: &S) -> Result<BTreeMap<usize, String>> {
    let mut titles = BTreeMap::new();
    for entry in outline_entries(store)? {
        if entry.page > 0 {
            titles
                .entry(entry.page as usize)
                .or_insert(entry.title);
        }
    }
    Ok(titles)
}

/// Removes every outline item.
pub fn delete_toc<S: DocumentStore + ?Sized>(store: &mut S) -> Result<()> {
    let mut outline = OutlineSession::open(store)?;
    debug!("Deleting {} root bookmarks", outline.len());
    outline.clear();
    outline.commit()
}

/// Appends one root-level bookmark pointing at `page`.
pub fn add_bookmark<S: DocumentStore + ?Sized>(
    store: &mut S,
    title: &str,
    page: usize,
) -> Result<Report> {
    let handle = store.page(page)?;
    let mut outline = OutlineSession::open(store)?;
    outline.push(OutlineItem::new(title).with_destination(Destination::fit(handle)));
    outline.commit()?;

    let mut report = Report::new();
    report.push(format!("Added bookmark {title} -> {page}"));
    Ok(report)
}
