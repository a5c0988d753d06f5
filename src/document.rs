//! The flat, globally indexed word sequence produced by extraction.

use serde::Serialize;

/// Title used when the container carries no title metadata.
pub const UNTITLED: &str = "Untitled";

/// Longest accepted chapter title, in chars.
pub const MAX_CHAPTER_TITLE_CHARS: usize = 99;

/// First word of a detected chapter.
///
/// A chapter owns `[word_index, next.word_index)`, or through the end of the
/// document for the last one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChapterMark {
    pub title: String,
    pub word_index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverImage {
    pub bytes: Vec<u8>,
    pub media_type: String,
}

/// Immutable result of one successful extraction.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedDocument {
    pub title: String,
    pub author: Option<String>,
    pub cover_image: Option<CoverImage>,
    pub words: Vec<String>,
    pub chapters: Vec<ChapterMark>,
}

impl ParsedDocument {
    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn word(&self, index: usize) -> Option<&str> {
        self.words.get(index).map(String::as_str)
    }

    /// Last valid word index, or `None` for an empty document.
    pub fn last_index(&self) -> Option<usize> {
        self.words.len().checked_sub(1)
    }

    /// The chapter whose range contains `word_index`.
    ///
    /// Returns `None` when there are no chapters or when `word_index` falls
    /// before the first detected chapter.
    pub fn locate_chapter(&self, word_index: usize) -> Option<&ChapterMark> {
        let position = self
            .chapters
            .partition_point(|chapter| chapter.word_index <= word_index);
        position
            .checked_sub(1)
            .and_then(|idx| self.chapters.get(idx))
    }

    pub(crate) fn push_section(&mut self, title: Option<String>, words: Vec<String>) {
        if words.is_empty() {
            return;
        }
        if let Some(title) = title {
            self.chapters.push(ChapterMark {
                title,
                word_index: self.words.len(),
            });
        }
        self.words.extend(words);
    }
}
