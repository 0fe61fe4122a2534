//! Indentation-based table of contents text
//!
//! One entry per line: `<indentation><title> <page>`. The page is the last
//! whitespace-separated token, the title everything between the indentation
//! and that token. Indentation width is the only structural signal.

use crate::error::{Excerpt, InputFormatError};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// One line of a table of contents.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TocEntry {
    pub title: String,
    /// Indentation level; only meaningful relative to neighbouring entries
    pub level: usize,
    /// 1-based page number
    pub page: u32,
}

impl TocEntry {
    pub fn new(title: impl Into<String>, level: usize, page: u32) -> Self {
        Self {
            title: title.into(),
            level,
            page,
        }
    }
}

/// Result of parsing a table of contents.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedToc {
    /// Entries in input order
    pub entries: Vec<TocEntry>,
    /// First title given for each page
    pub pages: BTreeMap<u32, String>,
    /// Lines that could not be used
    pub skipped: Vec<InputFormatError>,
}

impl ParsedToc {
    /// Page of the first entry carrying `title`
    pub fn page_for_title(&self, title: &str) -> Option<u32> {
        self.entries
            .iter()
            .find(|entry| entry.title == title)
            .map(|entry| entry.page)
    }

    pub fn title_for_page(&self, page: u32) -> Option<&str> {
        self.pages.get(&page).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn indentation(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}

fn split_line(line: &str) -> Result<(&str, u32), &'static str> {
    let content = line.trim();
    let (title, token) = content
        .rsplit_once(char::is_whitespace)
        .ok_or("missing page number")?;
    let page: u32 = token
        .parse()
        .map_err(|_| "page number is not an integer")?;
    if page == 0 {
        return Err("page numbers start at 1");
    }
    let title = title.trim_end();
    if title.is_empty() {
        return Err("missing title");
    }
    Ok((title, page))
}

/// Parses table of contents text.
///
/// Malformed lines are logged and collected in [`ParsedToc::skipped`];
/// blank lines are only logged at debug level. Parsing always continues with
/// the next line. When indentation drops to a
/// width that no enclosing entry used, the entry gets the outermost level
/// found while unwinding.
///
/// # Example
///
/// ```rust
/// use pdfnav::toc::parse_toc;
///
/// let toc = parse_toc("Intro 1\n Background 2\nResults 5\n");
/// assert_eq!(toc.entries.len(), 3);
/// assert_eq!(toc.entries[1].level, 1);
/// assert_eq!(toc.page_for_title("Results"), Some(5));
/// ```
pub fn parse_toc(text: &str) -> ParsedToc {
    let mut toc = ParsedToc::default();
    let mut level = 0;
    let mut enclosing: Vec<usize> = Vec::new();

    for (index, raw) in text.lines().enumerate() {
        let line_number = index + 1;
        let line = raw.trim_end();
        if line.is_empty() {
            debug!("Skipping blank line {line_number}");
            continue;
        }

        let (title, page) = match split_line(line) {
            Ok(parts) => parts,
            Err(reason) => {
                warn!("Skipping line {line_number}: {reason} ({})", Excerpt(line));
                toc.skipped
                    .push(InputFormatError::new(line_number, line, reason));
                continue;
            }
        };

        let width = indentation(line);
        if width > level {
            enclosing.push(level);
            level = width;
        } else if width < level {
            let mut last = level;
            while let Some(previous) = enclosing.pop() {
                last = previous;
                if previous == width {
                    break;
                }
            }
            if last != width {
                debug!("Line {line_number}: no enclosing entry at indentation {width}, using {last}");
            }
            level = last;
        }

        toc.pages
            .entry(page)
            .or_insert_with(|| title.to_string());
        toc.entries.push(TocEntry::new(title, level, page));
    }

    toc
}
