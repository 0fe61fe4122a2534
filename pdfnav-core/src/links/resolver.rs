//! Named destination to page number resolution

use crate::error::{ResolutionFailure, Result};
use crate::objects::Object;
use crate::store::DocumentStore;
use crate::structure::StoredDestination;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// 1-based page a stored destination value points at.
pub fn resolve_value<S: DocumentStore + ?Sized>(
    store: &S,
    value: &Object,
) -> std::result::Result<usize, ResolutionFailure> {
    let stored = StoredDestination::decode(value)?;
    store.resolve_destination(&stored.destination)
}

/// Maps every resolvable named destination to its 1-based page.
///
/// Names whose destination does not lead to a page are left out; a missing
/// key means the link is broken.
pub fn resolve_links<S: DocumentStore + ?Sized>(store: &S) -> Result<BTreeMap<String, usize>> {
    let mut resolved = BTreeMap::new();
    for group in store.destination_groups()? {
        for (name, value) in group.iter() {
            match resolve_value(store, value) {
                Ok(page) => {
                    resolved.insert(name.to_string(), page);
                }
                Err(failure) => debug!("{name} does not resolve: {failure}"),
            }
        }
    }
    Ok(resolved)
}

/// Names of all destinations that do not resolve to a page
pub fn broken_links<S: DocumentStore + ?Sized>(store: &S) -> Result<BTreeSet<String>> {
    let mut broken = BTreeSet::new();
    for group in store.destination_groups()? {
        for (name, value) in group.iter() {
            if resolve_value(store, value).is_err() {
                broken.insert(name.to_string());
            }
        }
    }
    Ok(broken)
}
