//! Lexical tagging.
//!
//! [`LexicalTagger`] classifies the whole buffer into [`TaggedSpan`]s for a
//! [`LanguageProfile`]. Each pass paints a per-character category map in a fixed order
//! (keywords, then comments, then strings, later passes overwriting earlier ones) and then
//! run-length encodes it, so the resulting spans are sorted, disjoint and cover the buffer.
//!
//! Tagging is a full-document recompute, `O(len * keywords)` per change. That is fine at
//! editor scale but is not meant for very large files.

use crate::buffer::TextBuffer;
use crate::notify::{ChangeEvent, ChangeObserver};
use notepad_core_lang::LanguageProfile;
use std::ops::Range;

/// Lexical category of a span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TagCategory {
    /// Untagged text.
    #[default]
    Normal,
    /// A keyword from the profile's keyword set.
    Keyword,
    /// A line comment, opener included, up to (not including) the line break.
    Comment,
    /// A string literal, both delimiters included.
    StringLiteral,
}

/// A half-open character range with one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaggedSpan {
    /// Category of every character in the span.
    pub category: TagCategory,
    /// Inclusive start character offset.
    pub start: usize,
    /// Exclusive end character offset.
    pub end: usize,
}

impl TaggedSpan {
    /// Create a span.
    pub fn new(category: TagCategory, start: usize, end: usize) -> Self {
        Self {
            category,
            start,
            end,
        }
    }

    /// The span as a range.
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Length in characters.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns `true` if the span covers nothing.
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// Whole-buffer tagger for one language profile.
#[derive(Debug, Clone)]
pub struct LexicalTagger {
    profile: LanguageProfile,
    keywords: Vec<Vec<char>>,
    comment: Option<Vec<char>>,
}

impl LexicalTagger {
    /// Create a tagger for `profile`. Empty keywords and comment tokens are ignored.
    pub fn new(profile: LanguageProfile) -> Self {
        let keywords = profile
            .keywords
            .iter()
            .filter(|kw| !kw.is_empty())
            .map(|kw| kw.chars().collect())
            .collect();
        let comment = profile
            .comments
            .line
            .as_deref()
            .filter(|token| !token.is_empty())
            .map(|token| token.chars().collect());
        Self {
            profile,
            keywords,
            comment,
        }
    }

    /// The profile this tagger was built from.
    pub fn profile(&self) -> &LanguageProfile {
        &self.profile
    }

    /// Tag `text`. The result is empty for empty text.
    pub fn tag(&self, text: &str) -> Vec<TaggedSpan> {
        let chars: Vec<char> = text.chars().collect();
        let mut categories = vec![TagCategory::Normal; chars.len()];

        self.tag_keywords(&chars, &mut categories);
        self.tag_comments(&chars, &mut categories);
        self.tag_strings(&chars, &mut categories);

        let spans = collapse(&categories);
        tracing::trace!(
            profile = %self.profile.name,
            len = chars.len(),
            spans = spans.len(),
            "tagged buffer"
        );
        spans
    }

    /// Tag the current content of `buffer`.
    pub fn tag_buffer(&self, buffer: &TextBuffer) -> Vec<TaggedSpan> {
        self.tag(&buffer.snapshot())
    }

    /// Wrap the tagger in an observer that re-tags after every change and hands the spans to
    /// `on_tags`.
    pub fn into_observer<F>(self, on_tags: F) -> TaggingObserver<F>
    where
        F: FnMut(&[TaggedSpan]),
    {
        TaggingObserver {
            tagger: self,
            on_tags,
        }
    }

    fn tag_keywords(&self, chars: &[char], categories: &mut [TagCategory]) {
        for keyword in &self.keywords {
            let mut from = 0;
            while let Some(start) = find_chars(chars, keyword, from) {
                let end = start + keyword.len();
                let before_ok = start == 0 || !chars[start - 1].is_alphanumeric();
                let after_ok = end == chars.len() || !chars[end].is_alphanumeric();
                if before_ok && after_ok {
                    categories[start..end].fill(TagCategory::Keyword);
                }
                from = end;
            }
        }
    }

    fn tag_comments(&self, chars: &[char], categories: &mut [TagCategory]) {
        let Some(opener) = &self.comment else {
            return;
        };

        let mut from = 0;
        while let Some(start) = find_chars(chars, opener, from) {
            let end = chars[start..]
                .iter()
                .position(|&c| c == '\n')
                .map_or(chars.len(), |rel| start + rel);
            categories[start..end].fill(TagCategory::Comment);
            from = end.max(start + opener.len());
        }
    }

    fn tag_strings(&self, chars: &[char], categories: &mut [TagCategory]) {
        let Some(strings) = self.profile.strings else {
            return;
        };

        let mut from = 0;
        while let Some(open) = find_char(chars, strings.delimiter, from) {
            let Some(close) = find_closing(chars, strings.delimiter, strings.escape, open + 1)
            else {
                // Unterminated literal: leave it untagged.
                break;
            };
            categories[open..=close].fill(TagCategory::StringLiteral);
            from = close + 1;
        }
    }
}

/// A [`ChangeObserver`] that re-tags the buffer on every change.
pub struct TaggingObserver<F> {
    tagger: LexicalTagger,
    on_tags: F,
}

impl<F> TaggingObserver<F> {
    /// The wrapped tagger.
    pub fn tagger(&self) -> &LexicalTagger {
        &self.tagger
    }
}

impl<F> ChangeObserver for TaggingObserver<F>
where
    F: FnMut(&[TaggedSpan]),
{
    fn on_change(&mut self, _event: &ChangeEvent, buffer: &TextBuffer) {
        let spans = self.tagger.tag_buffer(buffer);
        (self.on_tags)(&spans);
    }
}

fn find_chars(haystack: &[char], needle: &[char], from: usize) -> Option<usize> {
    if needle.is_empty() || from >= haystack.len() {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|rel| from + rel)
}

fn find_char(haystack: &[char], needle: char, from: usize) -> Option<usize> {
    haystack
        .get(from..)?
        .iter()
        .position(|&c| c == needle)
        .map(|rel| from + rel)
}

fn find_closing(
    chars: &[char],
    delimiter: char,
    escape: Option<char>,
    from: usize,
) -> Option<usize> {
    let mut at = from;
    loop {
        let candidate = find_char(chars, delimiter, at)?;
        if !is_escaped(chars, candidate, from, escape) {
            return Some(candidate);
        }
        at = candidate + 1;
    }
}

/// Returns `true` if `chars[index]` is preceded by an odd run of `escape` characters that starts
/// no earlier than `floor`.
fn is_escaped(chars: &[char], index: usize, floor: usize, escape: Option<char>) -> bool {
    let Some(escape) = escape else {
        return false;
    };
    let run = chars[floor..index]
        .iter()
        .rev()
        .take_while(|&&c| c == escape)
        .count();
    run % 2 == 1
}

fn collapse(categories: &[TagCategory]) -> Vec<TaggedSpan> {
    let mut spans: Vec<TaggedSpan> = Vec::new();
    for (offset, &category) in categories.iter().enumerate() {
        match spans.last_mut() {
            Some(last) if last.category == category => last.end = offset + 1,
            _ => spans.push(TaggedSpan::new(category, offset, offset + 1)),
        }
    }
    spans
}
