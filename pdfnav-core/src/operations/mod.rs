//! Page operations
//!
//! This module provides the operations that change the page list of a
//! document (swapping, moving, removing and splitting pages) and the
//! structural comparison of two documents.

pub mod compare;
pub mod remove;
pub mod reorder;
pub mod split;

pub use compare::{compare, CompareReport};
pub use remove::remove_pages;
pub use reorder::{cut_page, swap_pages, PageReorderer};
pub use split::{split_file_name, split_pages};

use crate::error::{IndexError, NavError, Result};
use std::str::FromStr;

/// A set of 1-based page numbers
///
/// Written as a comma-separated list of single pages and inclusive
/// `start-stop` ranges, e.g. `1,3-4,7`. Order and repetition in the text do
/// not matter.
///
/// Kept as sorted, disjoint intervals, so a range is never expanded before
/// it has been checked against a page count.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageRanges {
    spans: Vec<(usize, usize)>,
}

impl PageRanges {
    /// Parse a page range list from a string
    ///
    /// Examples:
    /// - "5" -> page 5
    /// - "2-5" -> pages 2, 3, 4 and 5
    /// - "1,3-4,7" -> pages 1, 3, 4 and 7
    pub fn parse(s: &str) -> Result<Self> {
        let mut spans = Vec::new();

        for segment in s.split(',') {
            let segment = segment.trim();
            if segment.is_empty() {
                return Err(invalid(format!("Empty page range in {s:?}")));
            }

            match segment.split_once('-') {
                Some((start, stop)) => {
                    let start = page_number(start)?;
                    let stop = page_number(stop)?;
                    if stop < start {
                        return Err(invalid(format!(
                            "Start {start} is greater than end {stop}"
                        )));
                    }
                    spans.push((start, stop));
                }
                None => {
                    let page = page_number(segment)?;
                    spans.push((page, page));
                }
            }
        }

        Ok(Self::from_spans(spans))
    }

    /// Sorts and merges overlapping or touching spans.
    fn from_spans(mut spans: Vec<(usize, usize)>) -> Self {
        spans.sort_unstable();
        let mut merged: Vec<(usize, usize)> = Vec::with_capacity(spans.len());
        for (start, stop) in spans {
            match merged.last_mut() {
                Some(last) if start <= last.1.saturating_add(1) => last.1 = last.1.max(stop),
                _ => merged.push((start, stop)),
            }
        }
        Self { spans: merged }
    }

    /// Page numbers in ascending order
    pub fn pages(&self) -> impl DoubleEndedIterator<Item = usize> + '_ {
        self.spans.iter().flat_map(|&(start, stop)| start..=stop)
    }

    pub fn len(&self) -> usize {
        self.spans.iter().map(|&(start, stop)| stop - start + 1).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Fails with the first page beyond `page_count`.
    pub fn validate(&self, page_count: usize) -> std::result::Result<(), IndexError> {
        match self.spans.iter().find(|&&(_, stop)| stop > page_count) {
            Some(&(start, _)) => Err(IndexError {
                number: start.max(page_count.saturating_add(1)),
                page_count,
            }),
            None => Ok(()),
        }
    }
}

impl FromStr for PageRanges {
    type Err = NavError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl FromIterator<usize> for PageRanges {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self::from_spans(iter.into_iter().map(|page| (page, page)).collect())
    }
}

fn page_number(text: &str) -> Result<usize> {
    let text = text.trim();
    let page = text
        .parse::<usize>()
        .map_err(|_| invalid(format!("Invalid page: {text}")))?;
    if page == 0 {
        return Err(invalid("Page numbers start at 1".to_string()));
    }
    Ok(page)
}

fn invalid(message: String) -> NavError {
    NavError::Configuration(message)
}
