//! Table of contents text and the document outline
//!
//! [`parse_toc`] reads indentation-formatted text into leveled entries,
//! [`import_toc`] nests them into the outline of a document and
//! [`export_toc`] writes an outline back out in the same format.

pub mod builder;
pub mod export;
pub mod parser;

pub use builder::{import_toc, nest_entries, ImportOptions, TocNode};
pub use export::{add_bookmark, bookmark_titles, delete_toc, export_toc, outline_entries};
pub use parser::{parse_toc, ParsedToc, TocEntry};
