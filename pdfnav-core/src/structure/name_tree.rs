//! Named destination groups according to ISO 32000-1 Section 7.9.6
//!
//! A name tree leaf stores its entries as one flat `/Names` array of
//! alternating keys and values. Stores hand each leaf to the engine as a
//! [`DestinationGroup`] and take it back once its values were rewritten.

use crate::objects::Object;
use tracing::warn;

/// Identifies a group within the store that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupId(pub usize);

/// One name tree leaf: `(name, destination value)` pairs in document order.
#[derive(Debug, Clone, PartialEq)]
pub struct DestinationGroup {
    id: GroupId,
    entries: Vec<(String, Object)>,
}

impl DestinationGroup {
    pub fn new(id: GroupId, entries: Vec<(String, Object)>) -> Self {
        Self { id, entries }
    }

    /// Pairs up a flat `/Names` array: key at `2i`, value at `2i + 1`.
    ///
    /// A trailing key without a value is dropped; the pairs before it are
    /// kept.
    pub fn from_names_array(id: GroupId, names: &[Object]) -> Self {
        if names.len() % 2 != 0 {
            warn!(
                group = id.0,
                length = names.len(),
                "Names array has odd length, dropping trailing key"
            );
        }

        let entries = names
            .chunks_exact(2)
            .map(|pair| {
                let key = match pair[0].as_text() {
                    Some(text) => text.to_string(),
                    None => pair[0].to_string(),
                };
                (key, pair[1].clone())
            })
            .collect();

        Self { id, entries }
    }

    pub fn id(&self) -> GroupId {
        self.id
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Object)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut Object)> {
        self.entries
            .iter_mut()
            .map(|(name, value)| (name.as_str(), value))
    }

    pub fn get(&self, name: &str) -> Option<&Object> {
        self.iter().find(|(key, _)| *key == name).map(|(_, value)| value)
    }

    /// Values only, in pair order
    pub fn values(&self) -> impl Iterator<Item = &Object> {
        self.entries.iter().map(|(_, value)| value)
    }
}
