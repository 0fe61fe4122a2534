//! Minimal PDF object model exchanged between the engine and a document store.
//!
//! Stores translate their native representation into these types so that
//! destination values, outline targets and annotations can be inspected
//! without knowing how the document is physically encoded.

mod dictionary;
mod primitive;

pub use dictionary::Dictionary;
pub use primitive::{Object, ObjectId};
