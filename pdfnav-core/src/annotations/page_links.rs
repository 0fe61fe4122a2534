//! Link annotations placed on pages

use super::{rectangle, selected_pages, subtype};
use crate::error::Result;
use crate::geometry::Rectangle;
use crate::links::{resolve_links, resolve_value};
use crate::objects::{Dictionary, Object};
use crate::store::DocumentStore;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Default)]
pub struct PageLinkOptions {
    /// Only this 1-based page
    pub page: Option<usize>,
    /// Look up the page an internal link leads to
    pub resolve: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum LinkKind {
    /// Go to a destination in this document
    Internal,
    /// Open a URI
    External,
}

impl fmt::Display for LinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkKind::Internal => f.write_str("internal"),
            LinkKind::External => f.write_str("external"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PageLink {
    pub page: usize,
    pub rect: Rectangle,
    /// `None` for actions other than GoTo and URI
    pub kind: Option<LinkKind>,
    /// Destination name, explicit destination, or URI
    pub target: String,
    /// Page number or `broken`, when resolving was asked for
    pub resolved: Option<String>,
}

/// `page x1 y1 x2 y2 kind target [resolved]`
impl fmt::Display for PageLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ", self.page, self.rect)?;
        if let Some(kind) = self.kind {
            write!(f, "{kind}")?;
        }
        write!(f, " {}", self.target)?;
        if let Some(resolved) = &self.resolved {
            write!(f, " {resolved}")?;
        }
        Ok(())
    }
}

fn classify<S: DocumentStore + ?Sized>(
    store: &S,
    annotation: &Dictionary,
    named: Option<&BTreeMap<String, usize>>,
) -> (Option<LinkKind>, String, Option<String>) {
    let destination = match annotation.get_dict("A") {
        Some(action) => match action.get_name("S") {
            Some("URI") => {
                let uri = action.get("URI").and_then(Object::as_text).unwrap_or_default();
                return (Some(LinkKind::External), uri.to_string(), None);
            }
            Some("GoTo") => action.get("D"),
            _ => None,
        },
        None => annotation.get("Dest"),
    };
    let Some(destination) = destination else {
        return (None, String::new(), None);
    };

    let resolved = named.map(|named| {
        let page = match destination.as_text() {
            Some(name) => named.get(name).copied(),
            None => resolve_value(store, destination).ok(),
        };
        page.map_or_else(|| "broken".to_string(), |page| page.to_string())
    });
    let target = match destination.as_text() {
        Some(name) => name.to_string(),
        None => destination.to_string(),
    };
    (Some(LinkKind::Internal), target, resolved)
}

/// Lists the `/Link` annotations of one page, or of all pages.
pub fn page_links<S: DocumentStore + ?Sized>(
    store: &S,
    options: &PageLinkOptions,
) -> Result<Vec<PageLink>> {
    let named = if options.resolve {
        Some(resolve_links(store)?)
    } else {
        None
    };

    let mut links = Vec::new();
    for page in selected_pages(store, options.page)? {
        for annotation in store.annotations(page)? {
            if subtype(&annotation) != Some("Link") {
                continue;
            }
            let (kind, target, resolved) = classify(store, &annotation, named.as_ref());
            links.push(PageLink {
                page,
                rect: rectangle(&annotation).unwrap_or_default(),
                kind,
                target,
                resolved,
            });
        }
    }
    Ok(links)
}
