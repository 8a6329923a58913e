//! Pattern catalog loading.

use std::fs;
use std::io;
use std::path::Path;

/// Ordered list of candidate MISO pattern descriptors.
///
/// Index `i` of the catalog corresponds to bit `i` of every candidate mask
/// produced during a run. The catalog is loaded once at startup and
/// read-only thereafter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternCatalog {
    patterns: Vec<String>,
}

impl PatternCatalog {
    /// Create a catalog from an in-memory pattern list.
    pub fn new(patterns: Vec<String>) -> Self {
        Self { patterns }
    }

    /// Load a catalog from a text file: one pattern per line, surrounding
    /// whitespace stripped, blank lines dropped.
    pub fn load<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(Self::parse(&text))
    }

    /// Parse catalog text (the same format `load` reads from disk).
    pub fn parse(text: &str) -> Self {
        let patterns = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect();
        Self { patterns }
    }

    /// Number of candidate patterns. This is the search dimension N.
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// True if the catalog holds no patterns.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Pattern descriptor at index `i`.
    pub fn get(&self, i: usize) -> Option<&str> {
        self.patterns.get(i).map(String::as_str)
    }

    /// Iterate over all pattern descriptors in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(String::as_str)
    }
}
