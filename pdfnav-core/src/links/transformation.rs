//! Link files: which named destination should point at which page
//!
//! A link file has one `NAME TARGET` line per destination. The name may
//! contain spaces; the target is the last token, or a trailing
//! double-quoted title. Unquoted targets are names from an alias dictionary
//! (`UNIQUE_NAME PAGENUMBER` lines), or else page numbers.

use crate::error::{Excerpt, InputFormatError, NavError, Result};
use crate::toc::ParsedToc;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

lazy_static! {
    static ref QUOTED_LINE: Regex =
        Regex::new(r#"^(?P<name>.+?)\s+"(?P<title>[^"]*)"$"#).expect("quoted link pattern");
    static ref PLAIN_LINE: Regex =
        Regex::new(r"^(?P<name>.+?)\s+(?P<target>\S+)$").expect("plain link pattern");
    static ref ALIAS_LINE: Regex =
        Regex::new(r"^(?P<name>\S+)\s+(?P<page>\S+)$").expect("alias pattern");
}

/// Right-hand side of a link file line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkTarget {
    Page(u32),
    /// Looked up in the table of contents
    Title(String),
    /// Looked up in the alias dictionary
    Alias(String),
}

/// Splits one link file line into name and target.
pub fn parse_link_line(line: &str) -> std::result::Result<(String, LinkTarget), &'static str> {
    let line = line.trim();
    if let Some(caps) = QUOTED_LINE.captures(line) {
        return Ok((caps["name"].to_string(), LinkTarget::Title(caps["title"].to_string())));
    }
    let caps = PLAIN_LINE
        .captures(line)
        .ok_or("expected a name followed by a page, alias or quoted title")?;
    let target = &caps["target"];
    let target = match target.parse::<u32>() {
        Ok(0) => return Err("page numbers start at 1"),
        Ok(page) => LinkTarget::Page(page),
        Err(_) => LinkTarget::Alias(target.to_string()),
    };
    Ok((caps["name"].to_string(), target))
}

/// Page of an unquoted target that names an alias. Aliases win over page
/// numbers, so an alias called `12` is looked up rather than read as page 12.
fn aliased(line: &str, aliases: Option<&AliasDictionary>) -> Option<(String, u32)> {
    let aliases = aliases?;
    let line = line.trim();
    if QUOTED_LINE.is_match(line) {
        return None;
    }
    let caps = PLAIN_LINE.captures(line)?;
    let page = aliases.get(&caps["target"])?;
    Some((caps["name"].to_string(), page))
}

fn skip(skipped: &mut Vec<InputFormatError>, line_number: usize, line: &str, reason: &str) {
    warn!("Skipping line {line_number}: {reason} ({})", Excerpt(line));
    skipped.push(InputFormatError::new(line_number, line, reason));
}

/// Human-readable names for page numbers
#[derive(Debug, Clone, Default)]
pub struct AliasDictionary {
    entries: HashMap<String, u32>,
    skipped: Vec<InputFormatError>,
}

impl AliasDictionary {
    pub fn parse(text: &str) -> Self {
        let mut dictionary = Self::default();
        for (index, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let Some(caps) = ALIAS_LINE.captures(line) else {
                skip(&mut dictionary.skipped, index + 1, line, "expected UNIQUE_NAME PAGENUMBER");
                continue;
            };
            match caps["page"].parse::<u32>() {
                Ok(page) if page > 0 => {
                    dictionary.entries.insert(caps["name"].to_string(), page);
                }
                _ => skip(
                    &mut dictionary.skipped,
                    index + 1,
                    line,
                    "page number is not a positive integer",
                ),
            }
        }
        debug!("Read {} dictionary entries", dictionary.entries.len());
        dictionary
    }

    pub fn get(&self, name: &str) -> Option<u32> {
        self.entries.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn skipped(&self) -> &[InputFormatError] {
        &self.skipped
    }
}

/// Destination name to 1-based target page. Later lines win.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransformationMap {
    targets: BTreeMap<String, u32>,
    skipped: Vec<InputFormatError>,
}

impl TransformationMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a link file.
    ///
    /// # Errors
    ///
    /// A quoted title that the table of contents does not contain is a
    /// [`NavError::Configuration`] error. Unknown aliases and malformed lines
    /// are only skipped.
    pub fn parse(
        text: &str,
        toc: Option<&ParsedToc>,
        aliases: Option<&AliasDictionary>,
    ) -> Result<Self> {
        let mut map = Self::new();
        for (index, line) in text.lines().enumerate() {
            let line_number = index + 1;
            if line.trim().is_empty() {
                continue;
            }
            if let Some((name, page)) = aliased(line, aliases) {
                map.insert(name, page);
                continue;
            }
            let (name, target) = match parse_link_line(line) {
                Ok(parsed) => parsed,
                Err(reason) => {
                    skip(&mut map.skipped, line_number, line, reason);
                    continue;
                }
            };
            let page = match target {
                LinkTarget::Page(page) => page,
                LinkTarget::Title(title) => toc
                    .and_then(|toc| toc.page_for_title(&title))
                    .ok_or_else(|| {
                        NavError::Configuration(format!(
                            "title \"{title}\" (line {line_number}) not found in the table of contents"
                        ))
                    })?,
                LinkTarget::Alias(alias) => match aliases.and_then(|a| a.get(&alias)) {
                    Some(page) => page,
                    None => {
                        skip(
                            &mut map.skipped,
                            line_number,
                            line,
                            "target is neither a page number nor a known alias",
                        );
                        continue;
                    }
                },
            };
            map.insert(name, page);
        }
        debug!("Read {} links", map.len());
        Ok(map)
    }

    pub fn insert(&mut self, name: impl Into<String>, page: u32) {
        self.targets.insert(name.into(), page);
    }

    pub fn get(&self, name: &str) -> Option<u32> {
        self.targets.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.targets.iter().map(|(name, page)| (name.as_str(), *page))
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn skipped(&self) -> &[InputFormatError] {
        &self.skipped
    }

    /// Checks every target against the page count of the document.
    pub fn validate(&self, page_count: usize) -> Result<()> {
        for (name, page) in self.iter() {
            if page == 0 || page as usize > page_count {
                return Err(NavError::Configuration(format!(
                    "link {name} targets page {page}, document has {page_count} pages"
                )));
            }
        }
        Ok(())
    }
}

impl<N: Into<String>> FromIterator<(N, u32)> for TransformationMap {
    fn from_iter<I: IntoIterator<Item = (N, u32)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (name, page) in iter {
            map.insert(name, page);
        }
        map
    }
}
