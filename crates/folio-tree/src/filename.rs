//! Filename conventions for titles, URIs and sibling order.
//!
//! A filename (extension already removed) is split on `_`. A leading token
//! that is empty or numeric is an *ordering prefix*: it controls where the
//! entry sorts among its siblings but never shows up in the title or URI.
//! A leading `-` escapes a first token that must be kept:
//!
//! | Filename              | Title             | URI               |
//! |-----------------------|-------------------|-------------------|
//! | `01_Getting_Started`  | `Getting Started` | `Getting_Started` |
//! | `-Setup_Guide`        | `Setup Guide`     | `Setup_Guide`     |
//! | `Setup`               | `Setup`           | `Setup`           |
//! | `42`                  | `` (empty)        | `` (empty)        |
//!
//! Numeric tokens follow the loose numeric grammar: an optional sign,
//! decimals and exponents are accepted, so `-01`, `1.5` and `1e3` are all
//! ordering prefixes.

use std::cmp::Ordering;

/// Name given to index pages created outside a directory scan.
pub(crate) const SYNTHETIC_INDEX_NAME: &str = "_index";

/// Derive a display title from a filename without extension.
///
/// A filename made of a single numeric token yields an empty title.
#[must_use]
pub fn title_from_filename(filename: &str) -> String {
    strip_ordering_prefix(filename).join(" ")
}

/// Derive a URL-safe identifier from a filename without extension.
///
/// Uses the same prefix rule as [`title_from_filename`], joined with `_`.
#[must_use]
pub fn uri_from_filename(filename: &str) -> String {
    strip_ordering_prefix(filename).join("_")
}

/// Split on `_` and apply the ordering-prefix rule to the first token.
fn strip_ordering_prefix(filename: &str) -> Vec<&str> {
    let mut tokens: Vec<&str> = filename.split('_').collect();
    let first = tokens[0];
    if first.is_empty() || is_numeric(first) {
        tokens.remove(0);
    } else if let Some(rest) = first.strip_prefix('-') {
        tokens[0] = rest;
    }
    tokens
}

/// Check whether a string is a numeric literal.
///
/// Accepts surrounding whitespace, an optional sign, digits with an optional
/// fractional part (`1.`, `.5` and `1.5` are all valid) and an optional
/// exponent. Hexadecimal, `inf` and `nan` are rejected.
#[must_use]
pub fn is_numeric(s: &str) -> bool {
    let s = s.trim_matches(|c: char| c.is_ascii_whitespace());
    let bytes = s.as_bytes();
    let mut i = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i += 1;
    }

    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let mut digits = i - int_start;

    if bytes.get(i) == Some(&b'.') {
        i += 1;
        let frac_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        digits += i - frac_start;
    }

    if digits == 0 {
        return false;
    }

    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        let mut j = i + 1;
        if matches!(bytes.get(j), Some(b'+' | b'-')) {
            j += 1;
        }
        let exp_start = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j == exp_start {
            return false;
        }
        i = j;
    }

    i == bytes.len()
}

/// Absolute value of a numeric token, for ordering.
fn numeric_value(token: &str) -> f64 {
    token.trim().parse::<f64>().map_or(0.0, f64::abs)
}

/// Sort bucket, in display order.
#[derive(Clone, Copy, Debug)]
enum Bucket {
    /// The directory's index page.
    Index,
    /// Names with a numeric ordering prefix.
    Numeric(f64),
    /// Everything else.
    Normal,
    /// `-` followed by a numeric prefix.
    DownNumeric(f64),
    /// `-` followed by a plain name.
    Down,
}

impl Bucket {
    fn rank(self) -> u8 {
        match self {
            Self::Index => 0,
            Self::Numeric(_) => 1,
            Self::Normal => 2,
            Self::DownNumeric(_) => 3,
            Self::Down => 4,
        }
    }

    fn compare(self, other: Self) -> Ordering {
        match (self, other) {
            (Self::Numeric(a), Self::Numeric(b))
            | (Self::DownNumeric(a), Self::DownNumeric(b)) => a.total_cmp(&b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

/// Ordering key derived from an entry's raw name.
///
/// Sorting siblings by raw name keeps the ordering prefix meaningful after
/// it has been stripped from the URI: `10_zeta` sorts after `2_alpha`.
///
/// Buckets, in order: the index page, numeric-prefixed names by value,
/// plain names, `-`-prefixed numeric names by value, other `-`-prefixed
/// names. Ties inside a bucket fall back to a case-insensitive name
/// comparison, then to the exact name.
#[derive(Clone, Debug)]
pub struct SortKey {
    bucket: Bucket,
    folded: String,
    name: String,
}

impl SortKey {
    /// Classify `name` (filename without extension).
    #[must_use]
    pub fn new(name: &str, index_key: &str) -> Self {
        let first = name.split('_').next().unwrap_or_default();
        let bucket = if name == index_key || name == SYNTHETIC_INDEX_NAME {
            Bucket::Index
        } else if let Some(rest) = first.strip_prefix('-') {
            if is_numeric(rest) {
                Bucket::DownNumeric(numeric_value(rest))
            } else {
                Bucket::Down
            }
        } else if is_numeric(first) {
            Bucket::Numeric(numeric_value(first))
        } else {
            Bucket::Normal
        };

        Self {
            bucket,
            folded: name.to_lowercase(),
            name: name.to_owned(),
        }
    }
}

impl PartialEq for SortKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SortKey {}

impl PartialOrd for SortKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SortKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.bucket
            .compare(other.bucket)
            .then_with(|| self.folded.cmp(&other.folded))
            .then_with(|| self.name.cmp(&other.name))
    }
}
