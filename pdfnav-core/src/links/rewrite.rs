//! Retargeting and reporting of named destinations

use super::transformation::TransformationMap;
use crate::error::Result;
use crate::objects::Object;
use crate::report::Report;
use crate::store::{DocumentStore, PageHandle};
use crate::structure::{Destination, DestinationType, StoredDestination};
use crate::toc::ParsedToc;
use std::collections::HashMap;
use tracing::{debug, info};

/// Options for [`LinkRewriter`]
#[derive(Debug, Clone, Default)]
pub struct RewriteOptions {
    /// Replace `XYZ` views with `Fit`. Only applies together with `write_back`.
    pub coerce_to_fit: bool,
    /// Store the changed destinations in the document
    pub write_back: bool,
    /// Report the view type, and the `XYZ` parameters, of every destination
    pub detailed: bool,
    /// Report the table of contents title of a page instead of its number
    pub label_with_titles: bool,
}

/// What happened to one named destination
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "status", rename_all = "lowercase"))]
pub enum LinkStatus {
    /// Pointed at a new page by the transformation
    Rewritten { page: usize },
    /// Left alone; currently points at `page`
    Resolved { page: usize, title: Option<String> },
    Broken,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LinkOutcome {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub status: LinkStatus,
    /// View type, when the destination could be decoded
    pub view: Option<String>,
    /// The view was changed to `Fit`
    pub coerced: bool,
}

impl LinkOutcome {
    /// The report line for this destination
    pub fn summary(&self) -> String {
        match &self.status {
            LinkStatus::Rewritten { page } => format!("{} rewriting {page}", self.name),
            LinkStatus::Resolved {
                title: Some(title), ..
            } => format!("{} \"{title}\"", self.name),
            LinkStatus::Resolved { page, title: None } => format!("{} {page}", self.name),
            LinkStatus::Broken => format!("{} broken", self.name),
        }
    }

    pub fn is_broken(&self) -> bool {
        self.status == LinkStatus::Broken
    }
}

/// Outcome of a rewrite run: one entry per named destination, and the
/// report lines in the order they were produced.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RewriteReport {
    pub outcomes: Vec<LinkOutcome>,
    pub lines: Report,
}

impl RewriteReport {
    pub fn broken(&self) -> impl Iterator<Item = &LinkOutcome> {
        self.outcomes.iter().filter(|outcome| outcome.is_broken())
    }

    pub fn rewritten(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| matches!(outcome.status, LinkStatus::Rewritten { .. }))
            .count()
    }
}

fn view_details(dest_type: &DestinationType) -> Option<String> {
    match dest_type {
        DestinationType::XYZ { left, top, zoom } => {
            let show = |value: &Option<f64>| match value {
                Some(v) => v.to_string(),
                None => "null".to_string(),
            };
            Some(format!("{} {} {}", show(left), show(top), show(zoom)))
        }
        _ => None,
    }
}

/// Walks all named destinations of a document and retargets the ones a
/// [`TransformationMap`] names.
///
/// One destination failing to decode or resolve never stops the others; it
/// is reported as broken, or, when the transformation names it, replaced by
/// a fresh `Fit` destination.
///
/// # Example
///
/// ```rust
/// use pdfnav::links::{LinkRewriter, RewriteOptions, TransformationMap};
/// use pdfnav::objects::Object;
/// use pdfnav::store::{DocumentStore, MemoryDocument};
/// use pdfnav::structure::Destination;
///
/// let mut doc = MemoryDocument::with_pages(5);
/// let second = doc.page(2).unwrap();
/// doc.add_named_destination("Summary", Object::Array(Destination::fit(second).to_array()));
///
/// let map = TransformationMap::parse("Summary 5\n", None, None).unwrap();
/// let options = RewriteOptions { write_back: true, ..Default::default() };
/// let report = LinkRewriter::new(&map, options).run(&mut doc).unwrap();
/// assert_eq!(report.lines.lines(), &["Summary rewriting 5"]);
/// ```
pub struct LinkRewriter<'a> {
    transformation: &'a TransformationMap,
    toc: Option<&'a ParsedToc>,
    options: RewriteOptions,
}

impl<'a> LinkRewriter<'a> {
    pub fn new(transformation: &'a TransformationMap, options: RewriteOptions) -> Self {
        Self {
            transformation,
            toc: None,
            options,
        }
    }

    /// Page titles for `label_with_titles`
    pub fn with_toc(mut self, toc: &'a ParsedToc) -> Self {
        self.toc = Some(toc);
        self
    }

    /// Processes every destination group of `store`.
    ///
    /// # Errors
    ///
    /// Fails before touching the document when a transformation target is
    /// not a page of it.
    pub fn run<S: DocumentStore + ?Sized>(&self, store: &mut S) -> Result<RewriteReport> {
        self.transformation.validate(store.page_count())?;
        let mut targets = HashMap::new();
        for (name, page) in self.transformation.iter() {
            targets.insert(name, (page as usize, store.page(page as usize)?));
        }

        let mut report = RewriteReport::default();
        for mut group in store.destination_groups()? {
            let mut changed = false;
            for (name, value) in group.iter_mut() {
                let outcome = self.rewrite_one(&*store, name, value, &targets, &mut report.lines);
                changed |= outcome.coerced || matches!(outcome.status, LinkStatus::Rewritten { .. });
                report.outcomes.push(outcome);
            }
            if changed && self.options.write_back {
                store.write_destination_group(&group)?;
            }
        }

        info!(
            "Processed {} named destinations, {} rewritten",
            report.outcomes.len(),
            report.rewritten()
        );
        Ok(report)
    }

    fn rewrite_one<S: DocumentStore + ?Sized>(
        &self,
        store: &S,
        name: &str,
        value: &mut Object,
        targets: &HashMap<&str, (usize, PageHandle)>,
        lines: &mut Report,
    ) -> LinkOutcome {
        let mut outcome = LinkOutcome {
            name: name.to_string(),
            status: LinkStatus::Broken,
            view: None,
            coerced: false,
        };

        let mut stored = match StoredDestination::decode(value) {
            Ok(stored) => stored,
            Err(failure) => {
                debug!("{name}: {failure}");
                if let Some(&(page, handle)) = targets.get(name) {
                    *value = Object::Array(Destination::fit(handle).to_array());
                    outcome.status = LinkStatus::Rewritten { page };
                    info!("{name} rewriting {page}");
                }
                lines.push(outcome.summary());
                return outcome;
            }
        };

        let dest_type = &stored.destination.dest_type;
        outcome.view = Some(dest_type.name().to_string());
        if self.options.detailed {
            lines.push(format!("/{}", dest_type.name()));
            if let Some(details) = view_details(dest_type) {
                lines.push(details);
            }
        }
        if self.options.coerce_to_fit
            && self.options.write_back
            && stored.destination.coerce_to_fit()
        {
            lines.push(format!("Changing type of {name} link to 'Fit'"));
            outcome.coerced = true;
        }

        if let Some(&(page, handle)) = targets.get(name) {
            stored.destination.retarget(handle);
            outcome.status = LinkStatus::Rewritten { page };
            info!("{name} rewriting {page}");
        } else {
            match store.resolve_destination(&stored.destination) {
                Ok(page) => {
                    let title = self
                        .toc
                        .filter(|_| self.options.label_with_titles)
                        .and_then(|toc| toc.title_for_page(page as u32))
                        .map(str::to_string);
                    outcome.status = LinkStatus::Resolved { page, title };
                }
                Err(failure) => debug!("{name}: {failure}"),
            }
        }

        if outcome.coerced || matches!(outcome.status, LinkStatus::Rewritten { .. }) {
            *value = stored.encode();
        }
        lines.push(outcome.summary());
        outcome
    }
}

/// Retargets destinations per `transformation`.
pub fn rewrite_links<S: DocumentStore + ?Sized>(
    store: &mut S,
    transformation: &TransformationMap,
    options: RewriteOptions,
) -> Result<RewriteReport> {
    LinkRewriter::new(transformation, options).run(store)
}

/// Reports every destination without changing anything.
pub fn list_links<S: DocumentStore + ?Sized>(store: &mut S, detailed: bool) -> Result<RewriteReport> {
    let empty = TransformationMap::new();
    let options = RewriteOptions {
        detailed,
        ..Default::default()
    };
    LinkRewriter::new(&empty, options).run(store)
}

#[cfg(test)]
#[path = "rewrite_tests.rs"]
mod tests;
