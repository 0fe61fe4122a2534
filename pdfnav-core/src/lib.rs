//! # pdfnav
//!
//! Outline and named destination editing for existing PDF documents.
//!
//! ## Features
//!
//! - **Table of contents**: build a nested outline from indentation-formatted
//!   text, export it back, delete it or add single bookmarks
//! - **Named destinations**: resolve every destination to a page, list the
//!   broken ones, retarget them from a link file
//! - **Page operations**: swap, move and remove pages, split into single pages
//! - **Annotations**: list free text notes and link rectangles
//! - **Compare**: check two documents have the same notes and bookmarks
//!
//! Every operation works on a [`store::DocumentStore`]. [`store::PdfFile`]
//! edits real files through `lopdf`; [`store::MemoryDocument`] is a plain
//! in-memory document.
//!
//! ## Quick Start
//!
//! ```rust
//! use pdfnav::store::{DocumentStore, MemoryDocument};
//! use pdfnav::toc::{export_toc, import_toc, parse_toc, ImportOptions};
//!
//! # fn main() -> pdfnav::Result<()> {
//! let mut doc = MemoryDocument::with_pages(5);
//! let toc = parse_toc("Intro 1\n Background 2\n Methods 3\nResults 5\n");
//! import_toc(&mut doc, &toc, &ImportOptions::default())?;
//!
//! assert_eq!(doc.read_outline()?.len(), 2);
//! assert_eq!(export_toc(&doc)?, "Intro 1\n Background 2\n Methods 3\nResults 5\n");
//! # Ok(())
//! # }
//! ```
//!
//! ### Editing a file
//!
//! ```rust,no_run
//! use pdfnav::links::{rewrite_links, RewriteOptions, TransformationMap};
//! use pdfnav::store::{DocumentStore, PdfFile, SaveOptions};
//! use std::path::Path;
//!
//! # fn main() -> pdfnav::Result<()> {
//! let mut doc = PdfFile::open("thesis.pdf")?;
//! let map = TransformationMap::parse("Summary 5\n", None, None)?;
//! let options = RewriteOptions { write_back: true, ..Default::default() };
//! let report = rewrite_links(&mut doc, &map, options)?;
//! print!("{}", report.lines);
//! doc.save(Path::new("thesis-fixed.pdf"), &SaveOptions::default())?;
//! # Ok(())
//! # }
//! ```

pub mod annotations;
pub mod error;
pub mod geometry;
pub mod links;
pub mod objects;
pub mod operations;
pub mod report;
pub mod store;
pub mod structure;
pub mod toc;

pub use error::{NavError, Result};
pub use report::Report;

/// Current version of pdfnav
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
