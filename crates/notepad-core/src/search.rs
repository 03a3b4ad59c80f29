//! Find/replace over a text snapshot.
//!
//! All public inputs and outputs are **character offsets** (not byte offsets). Needles are
//! matched literally: they are escaped and compiled into a regex. Case-insensitive mode
//! lowercases both haystack and needle character by character before matching and maps every
//! match back to the original text, so offsets always refer to the text that was passed in.
//! The same lowercasing decides whether a selection "is" the needle in [`text_matches`].
//!
//! An empty needle never matches: [`find_next`] returns `None` and [`replace_all`] returns the
//! input unchanged.

use regex::Regex;
use std::borrow::Cow;
use std::ops::Range;

/// Options that control how search is performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    /// If `true`, performs a case-sensitive search.
    pub case_sensitive: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            case_sensitive: true,
        }
    }
}

impl SearchOptions {
    /// Case-insensitive options.
    pub fn ignore_case() -> Self {
        Self {
            case_sensitive: false,
        }
    }
}

/// A match, expressed as a half-open character range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchMatch {
    /// Inclusive start character offset.
    pub start: usize,
    /// Exclusive end character offset.
    pub end: usize,
}

impl SearchMatch {
    /// The match as a range.
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Length of the match in characters.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns `true` if the match is empty.
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

struct CharIndex {
    char_to_byte: Vec<usize>,
    text_len: usize,
}

impl CharIndex {
    fn new(text: &str) -> Self {
        let mut char_to_byte: Vec<usize> = text.char_indices().map(|(b, _)| b).collect();
        char_to_byte.push(text.len());
        Self {
            char_to_byte,
            text_len: text.len(),
        }
    }

    fn char_count(&self) -> usize {
        self.char_to_byte.len().saturating_sub(1)
    }

    fn char_to_byte(&self, char_offset: usize) -> usize {
        let clamped = char_offset.min(self.char_count());
        self.char_to_byte
            .get(clamped)
            .copied()
            .unwrap_or(self.text_len)
    }

    fn byte_to_char(&self, byte_offset: usize) -> usize {
        let clamped = byte_offset.min(self.text_len);
        match self.char_to_byte.binary_search(&clamped) {
            Ok(idx) | Err(idx) => idx,
        }
    }
}

/// Lowercase `text` one character at a time.
///
/// Unlike [`str::to_lowercase`] this never looks at neighbouring characters, so a searched
/// character always maps back to exactly one source character.
fn lowercase(text: &str) -> String {
    text.chars().flat_map(char::to_lowercase).collect()
}

/// The haystack as the regex sees it.
///
/// When ignoring case, `source[i]` is the source character offset that produced searched
/// character `i`, with the source length as a trailing sentinel.
struct SearchText<'a> {
    text: Cow<'a, str>,
    index: CharIndex,
    source: Option<Vec<usize>>,
}

impl<'a> SearchText<'a> {
    fn new(haystack: &'a str, options: SearchOptions) -> Self {
        if options.case_sensitive {
            return Self {
                text: Cow::Borrowed(haystack),
                index: CharIndex::new(haystack),
                source: None,
            };
        }

        let mut text = String::with_capacity(haystack.len());
        let mut source = Vec::with_capacity(haystack.len() + 1);
        let mut count = 0;
        for (offset, ch) in haystack.chars().enumerate() {
            for lower in ch.to_lowercase() {
                text.push(lower);
                source.push(offset);
            }
            count = offset + 1;
        }
        source.push(count);

        Self {
            index: CharIndex::new(&text),
            text: Cow::Owned(text),
            source: Some(source),
        }
    }

    fn as_str(&self) -> &str {
        &self.text
    }

    /// Byte offset in the searched text of the first character at or after source offset
    /// `offset`.
    fn byte_at_source(&self, offset: usize) -> usize {
        let searched = match &self.source {
            None => offset,
            Some(source) => source.partition_point(|&s| s < offset),
        };
        self.index.char_to_byte(searched)
    }

    /// Source range of `m`, or `None` if it starts or ends inside the lowercase form of a
    /// single source character.
    fn to_source(&self, m: regex::Match<'_>) -> Option<SearchMatch> {
        let start = self.index.byte_to_char(m.start());
        let end = self.index.byte_to_char(m.end());
        let Some(source) = &self.source else {
            return Some(SearchMatch { start, end });
        };

        let starts_clean = start == 0 || source.get(start - 1) != source.get(start);
        let ends_clean = end == 0 || source.get(end - 1) != source.get(end);
        if !(starts_clean && ends_clean) {
            return None;
        }
        Some(SearchMatch {
            start: source.get(start).copied()?,
            end: source.get(end).copied()?,
        })
    }

    /// First match of `re` starting at byte `at` or later.
    fn find_from(&self, re: &Regex, mut at: usize) -> Option<SearchMatch> {
        let text = self.as_str();
        while at <= text.len() {
            let m = re.find_at(text, at)?;
            if let Some(hit) = self.to_source(m) {
                return Some(hit);
            }
            at = m.start() + text[m.start()..].chars().next().map_or(1, char::len_utf8);
        }
        None
    }
}

fn compile_needle(needle: &str, options: SearchOptions) -> Option<Regex> {
    if needle.is_empty() {
        return None;
    }

    let needle = if options.case_sensitive {
        Cow::Borrowed(needle)
    } else {
        Cow::Owned(lowercase(needle))
    };
    match Regex::new(&regex::escape(&needle)) {
        Ok(re) => Some(re),
        Err(err) => {
            tracing::warn!(error = %err, "search needle could not be compiled");
            None
        }
    }
}

/// Find the next occurrence of `needle`, searching forward from `from` and wrapping around to
/// the start of `haystack` when nothing is found before the end.
pub fn find_next(
    haystack: &str,
    needle: &str,
    from: usize,
    options: SearchOptions,
) -> Option<SearchMatch> {
    let re = compile_needle(needle, options)?;
    let text = SearchText::new(haystack, options);
    let from_byte = text.byte_at_source(from);

    let hit = text
        .find_from(&re, from_byte)
        .or_else(|| text.find_from(&re, 0));
    tracing::trace!(from, ?hit, "find_next");
    hit
}

/// Replace every non-overlapping occurrence of `needle` with `replacement`.
pub fn replace_all(
    haystack: &str,
    needle: &str,
    replacement: &str,
    options: SearchOptions,
) -> String {
    replace_all_counted(haystack, needle, replacement, options).0
}

/// Like [`replace_all`], also returning how many occurrences were replaced.
///
/// The scan resumes after each matched source span, so replacement text is never re-scanned.
pub fn replace_all_counted(
    haystack: &str,
    needle: &str,
    replacement: &str,
    options: SearchOptions,
) -> (String, usize) {
    let Some(re) = compile_needle(needle, options) else {
        return (haystack.to_string(), 0);
    };

    let text = SearchText::new(haystack, options);
    let source = CharIndex::new(haystack);
    let mut out = String::with_capacity(haystack.len());
    let mut cursor = 0;
    let mut count = 0;
    let mut at = 0;
    while let Some(hit) = text.find_from(&re, at) {
        out.push_str(&haystack[cursor..source.char_to_byte(hit.start)]);
        out.push_str(replacement);
        cursor = source.char_to_byte(hit.end);
        at = text.byte_at_source(hit.end);
        count += 1;
    }
    out.push_str(&haystack[cursor..]);
    (out, count)
}

/// Returns `true` if `text` equals `needle` under `options`' case mode.
///
/// Uses the same lowercasing as [`find_next`], so a match it returns always passes this check.
pub fn text_matches(text: &str, needle: &str, options: SearchOptions) -> bool {
    if needle.is_empty() {
        return false;
    }
    if options.case_sensitive {
        text == needle
    } else {
        lowercase(text) == lowercase(needle)
    }
}

/// State of a find/replace dialog: query, replacement, case mode and where the last match
/// ended.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FindSession {
    /// Text to look for.
    pub query: String,
    /// Replacement text.
    pub replacement: String,
    /// Search options.
    pub options: SearchOptions,
    last_match_end: usize,
}

impl FindSession {
    /// Create a session.
    pub fn new(
        query: impl Into<String>,
        replacement: impl Into<String>,
        options: SearchOptions,
    ) -> Self {
        Self {
            query: query.into(),
            replacement: replacement.into(),
            options,
            last_match_end: 0,
        }
    }

    /// End offset of the last match found by this session.
    pub fn last_match_end(&self) -> usize {
        self.last_match_end
    }

    /// Forget the last match (e.g. after the query changed).
    pub fn reset(&mut self) {
        self.last_match_end = 0;
    }

    /// Continue the next search from `offset` (e.g. the end of a replacement).
    pub fn resume_from(&mut self, offset: usize) {
        self.last_match_end = offset;
    }

    /// Find the next match in `haystack`, starting at the later of `selection_end` and the
    /// previous match end, and wrapping around.
    pub fn find_next(&mut self, haystack: &str, selection_end: usize) -> Option<SearchMatch> {
        let from = selection_end.max(self.last_match_end);
        let hit = find_next(haystack, &self.query, from, self.options)?;
        self.last_match_end = hit.end;
        Some(hit)
    }
}

/// Result of a replace-one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplaceOutcome {
    /// The selection matched and was replaced; the range covers the inserted replacement.
    Replaced(SearchMatch),
    /// The selection did not match; this is the next match to select before replacing.
    Found(SearchMatch),
    /// The needle occurs nowhere in the document.
    NotFound,
}
