//! Keyword matching
//!
//! Case-insensitive substring search over the ASCII range. Letters outside
//! ASCII compare byte for byte, so results do not depend on the locale or on
//! Unicode case tables.

use thiserror::Error;

/// True iff `needle` occurs in `haystack`, ignoring ASCII case.
///
/// An empty needle is contained in every haystack.
///
/// ```
/// use modgrep::contains_ci;
///
/// assert!(contains_ci("Lead Synth", "SYNTH"));
/// assert!(!contains_ci("Lead Synth", "pad"));
/// ```
pub fn contains_ci(haystack: &str, needle: &str) -> bool {
    let (haystack, needle) = (haystack.as_bytes(), needle.as_bytes());
    if needle.is_empty() {
        return true;
    }
    if needle.len() > haystack.len() {
        return false;
    }
    haystack
        .windows(needle.len())
        .any(|window| window.eq_ignore_ascii_case(needle))
}

/// A keyword in the list was the empty string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("keyword {position} is empty")]
pub struct EmptyKeyword {
    /// 1-based position in the list
    pub position: usize,
}

/// Ordered list of non-empty keywords
///
/// Order and duplicates are kept as given; each entry is reported on its own.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordSet {
    keywords: Vec<String>,
}

impl KeywordSet {
    /// Build the set, rejecting empty keywords.
    pub fn new<I, S>(keywords: I) -> Result<Self, EmptyKeyword>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keywords: Vec<String> = keywords.into_iter().map(Into::into).collect();
        if let Some(index) = keywords.iter().position(String::is_empty) {
            return Err(EmptyKeyword {
                position: index + 1,
            });
        }
        Ok(Self { keywords })
    }

    /// Number of keywords.
    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    /// Whether the set holds no keywords.
    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    /// Keywords in list order, as given.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keywords.iter().map(String::as_str)
    }

    /// Keywords contained in `text`, in list order.
    ///
    /// A keyword is yielded once no matter how often it occurs.
    pub fn matches<'a>(&'a self, text: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.iter().filter(move |keyword| contains_ci(text, keyword))
    }
}
