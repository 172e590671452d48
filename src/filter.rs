//! Keyword filtering for release and track names.
//!
//! Filtering works on canonical tags. A tag either expands through the alias
//! table into several literal substrings ("remix" also catches "remixed") or
//! passes through unchanged. Matching is a plain case-insensitive substring
//! test with no word-boundary protection, so "Remixology" is excluded by the
//! "remix" tag just like "Song (Remix)" is.

/// Alias table mapping a canonical tag to the literal substrings it stands
/// for. Tags not listed here expand to themselves.
const ALIASES: &[(&str, &[&str])] = &[
    ("reissue", &["reissue", "re-issue"]),
    ("remix", &["remix", "remixed"]),
    ("remastered", &["remastered", "remaster"]),
];

/// Canonical tags active by default, matching the keyword list the analyzer
/// has always shipped with.
pub const DEFAULT_TAGS: &[&str] = &[
    "live",
    "remastered",
    "reissue",
    "demo",
    "edition",
    "deluxe",
    "compilation",
    "remix",
];

/// A flattened set of lowercase substrings to test item names against.
///
/// Built from canonical tags via [`KeywordFilterSet::expand`]. An empty set
/// means no filtering. Expansion is pure: no I/O, no failure mode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordFilterSet {
    substrings: Vec<String>,
}

impl KeywordFilterSet {
    /// Expand a set of canonical tags into the flattened substring set.
    ///
    /// Aliased tags contribute every literal in their alias entry; unknown
    /// tags contribute themselves. Tags are lowercased, and duplicate
    /// substrings are dropped while preserving first-seen order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use unpop::KeywordFilterSet;
    ///
    /// let filter = KeywordFilterSet::expand(&["remix".to_string()]);
    /// assert_eq!(filter.substrings(), &["remix", "remixed"]);
    ///
    /// let empty = KeywordFilterSet::expand(&[]);
    /// assert!(empty.is_empty());
    /// ```
    pub fn expand(tags: &[String]) -> Self {
        let mut substrings: Vec<String> = Vec::new();
        for tag in tags {
            let tag = tag.trim().to_lowercase();
            if tag.is_empty() {
                continue;
            }
            let expanded: Vec<String> = match ALIASES.iter().find(|(canon, _)| *canon == tag) {
                Some((_, literals)) => literals.iter().map(|s| s.to_string()).collect(),
                None => vec![tag],
            };
            for literal in expanded {
                if !substrings.contains(&literal) {
                    substrings.push(literal);
                }
            }
        }
        Self { substrings }
    }

    /// The default filter set used when the caller does not pick tags.
    pub fn default_set() -> Self {
        let tags: Vec<String> = DEFAULT_TAGS.iter().map(|t| t.to_string()).collect();
        Self::expand(&tags)
    }

    /// True if `name` (lowercased) contains any active substring.
    pub fn matches(&self, name: &str) -> bool {
        let lower = name.to_lowercase();
        self.substrings.iter().any(|kw| lower.contains(kw))
    }

    /// The flattened substring list, in expansion order.
    pub fn substrings(&self) -> &[String] {
        &self.substrings
    }

    /// An empty set performs no filtering at all.
    pub fn is_empty(&self) -> bool {
        self.substrings.is_empty()
    }
}
