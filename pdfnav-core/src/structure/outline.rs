//! Document outline (bookmarks) according to ISO 32000-1 Section 12.3.3

use crate::objects::Object;
use crate::structure::destination::Destination;

/// Outline item (bookmark)
#[derive(Debug, Clone, PartialEq)]
pub struct OutlineItem {
    /// Item title
    pub title: String,
    /// Raw target: a destination array, a `/D` wrapper, or a destination name
    pub target: Option<Object>,
    /// Child items
    pub children: Vec<OutlineItem>,
    /// Whether item is open by default
    pub open: bool,
}

impl OutlineItem {
    /// Create new outline item
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            target: None,
            children: Vec::new(),
            open: true,
        }
    }

    /// Set destination
    pub fn with_destination(mut self, dest: Destination) -> Self {
        self.target = Some(Object::Array(dest.to_array()));
        self
    }

    /// Set a raw target object
    pub fn with_target(mut self, target: Object) -> Self {
        self.target = Some(target);
        self
    }

    /// Add child item
    pub fn add_child(&mut self, child: OutlineItem) {
        self.children.push(child);
    }

    /// Set closed by default
    pub fn closed(mut self) -> Self {
        self.open = false;
        self
    }

    /// Count total items in subtree
    pub fn count_all(&self) -> i64 {
        let mut count = 1; // Self
        for child in &self.children {
            count += child.count_all();
        }
        count
    }

    /// Count visible items (respecting open/closed state)
    pub fn count_visible(&self) -> i64 {
        let mut count = 1; // Self
        if self.open {
            for child in &self.children {
                count += child.count_visible();
            }
        }
        count
    }

    /// Visits the subtree depth-first, parents before children.
    pub fn walk<'a>(&'a self, depth: usize, visit: &mut impl FnMut(&'a OutlineItem, usize)) {
        visit(self, depth);
        for child in &self.children {
            child.walk(depth + 1, visit);
        }
    }
}

/// Value of the `/Count` entry for a list of items: open descendants, negated
/// when the parent is closed.
pub fn outline_count(items: &[OutlineItem], open: bool) -> i64 {
    let count: i64 = items.iter().map(OutlineItem::count_visible).sum();
    if open {
        count
    } else {
        -count
    }
}
