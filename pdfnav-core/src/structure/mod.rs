//! Document structure elements: destinations, name tree leaves and outlines
//! according to ISO 32000-1

mod destination;
mod name_tree;
mod outline;

pub use destination::{
    Destination, DestinationEncoding, DestinationType, PageDestination, StoredDestination,
};
pub use name_tree::{DestinationGroup, GroupId};
pub use outline::{outline_count, OutlineItem};
