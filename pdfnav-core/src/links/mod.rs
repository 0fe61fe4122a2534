//! Named destinations: resolution, link files and rewriting

pub mod resolver;
pub mod rewrite;
pub mod transformation;

pub use resolver::{broken_links, resolve_links, resolve_value};
pub use rewrite::{
    list_links, rewrite_links, LinkOutcome, LinkRewriter, LinkStatus, RewriteOptions,
    RewriteReport,
};
pub use transformation::{parse_link_line, AliasDictionary, LinkTarget, TransformationMap};
