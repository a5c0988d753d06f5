//! Chapter-title detection.
//!
//! E-book markup has no dependable chapter API, so titles come from an ordered
//! cascade of strategies of decreasing confidence. The first strategy whose
//! predicate matches the section shape produces the title; later strategies
//! are not consulted even if that title is then rejected for length.

use super::markup::SectionShape;
use super::text::{char_len, collapse_whitespace, is_numeric};
use crate::document::MAX_CHAPTER_TITLE_CHARS;
use std::ops::RangeInclusive;

/// Below this many chars a heading or first line is treated as a bare label
/// ("7", "PART ONE") worth pairing with a subtitle.
const SHORT_LABEL_CHARS: usize = 15;
/// First-line fallback only accepts lines shorter than this.
const FIRST_LINE_MAX_CHARS: usize = 80;
const SUBTITLE_CHARS: RangeInclusive<usize> = 3..=79;
/// Lines after the first that may hold a subtitle.
const SUBTITLE_SCAN_LINES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleStrategy {
    HeadingWithSubtitle,
    Heading,
    FirstLineWithSubtitle,
    FirstLine,
}

/// Strategies in priority order.
pub const CASCADE: [TitleStrategy; 4] = [
    TitleStrategy::HeadingWithSubtitle,
    TitleStrategy::Heading,
    TitleStrategy::FirstLineWithSubtitle,
    TitleStrategy::FirstLine,
];

impl TitleStrategy {
    pub fn label(self) -> &'static str {
        match self {
            Self::HeadingWithSubtitle => "heading+subtitle",
            Self::Heading => "heading",
            Self::FirstLineWithSubtitle => "first-line+subtitle",
            Self::FirstLine => "first-line",
        }
    }

    fn applies(self, shape: &SectionShape) -> bool {
        match self {
            Self::HeadingWithSubtitle => {
                shape.heading.as_deref().is_some_and(is_short_label)
                    && shape.subtitle.as_deref().is_some_and(is_subtitle)
            }
            Self::Heading => shape.has_heading(),
            Self::FirstLineWithSubtitle => {
                !shape.has_heading()
                    && first_line(shape).is_some_and(is_short_label)
                    && line_subtitle(shape).is_some()
            }
            Self::FirstLine => !shape.has_heading() && first_line(shape).is_some(),
        }
    }

    fn extract(self, shape: &SectionShape) -> Option<String> {
        match self {
            Self::HeadingWithSubtitle => Some(format!(
                "{} {}",
                shape.heading.as_deref()?,
                shape.subtitle.as_deref()?
            )),
            Self::Heading => shape.heading.clone(),
            Self::FirstLineWithSubtitle => Some(format!(
                "{} {}",
                first_line(shape)?,
                line_subtitle(shape)?
            )),
            Self::FirstLine => first_line(shape).map(str::to_string),
        }
    }
}

/// Detect the chapter title of a section, if any.
///
/// Sections without words never get a title.
pub fn detect_title(shape: &SectionShape) -> Option<(TitleStrategy, String)> {
    if shape.words.is_empty() {
        return None;
    }
    let strategy = CASCADE
        .iter()
        .copied()
        .find(|strategy| strategy.applies(shape))?;
    let title = collapse_whitespace(&strategy.extract(shape)?);
    let len = char_len(&title);
    if len == 0 || len > MAX_CHAPTER_TITLE_CHARS {
        return None;
    }
    Some((strategy, title))
}

fn is_short_label(text: &str) -> bool {
    char_len(text.trim()) < SHORT_LABEL_CHARS
}

fn is_subtitle(text: &str) -> bool {
    SUBTITLE_CHARS.contains(&char_len(text)) && !text.ends_with('.')
}

/// First text line, when it looks like a label rather than prose.
fn first_line(shape: &SectionShape) -> Option<&str> {
    shape
        .lines
        .first()
        .map(String::as_str)
        .filter(|line| char_len(line) < FIRST_LINE_MAX_CHARS && !line.contains('.'))
}

fn line_subtitle(shape: &SectionShape) -> Option<&str> {
    shape
        .lines
        .iter()
        .skip(1)
        .take(SUBTITLE_SCAN_LINES)
        .map(String::as_str)
        .find(|line| is_subtitle(line) && !is_numeric(line))
}

#[cfg(test)]
mod tests {
    use super::{TitleStrategy, detect_title};
    use crate::extractor::markup::SectionShape;

    fn shape(heading: Option<&str>, subtitle: Option<&str>, lines: &[&str]) -> SectionShape {
        SectionShape {
            words: vec!["word".to_string()],
            heading: heading.map(str::to_string),
            subtitle: subtitle.map(str::to_string),
            lines: lines.iter().map(|line| line.to_string()).collect(),
        }
    }

    #[test]
    fn short_heading_merges_with_subtitle() {
        let detected = detect_title(&shape(Some("PART ONE"), Some("The Storm"), &[]));
        assert_eq!(
            detected,
            Some((
                TitleStrategy::HeadingWithSubtitle,
                "PART ONE The Storm".to_string()
            ))
        );
    }

    #[test]
    fn long_heading_ignores_subtitle() {
        let detected = detect_title(&shape(Some("The Long Goodbye Begins"), Some("Later"), &[]));
        assert_eq!(
            detected,
            Some((TitleStrategy::Heading, "The Long Goodbye Begins".to_string()))
        );
    }

    #[test]
    fn subtitle_ending_in_period_is_rejected() {
        let detected = detect_title(&shape(Some("3"), Some("It was dark."), &[]));
        assert_eq!(detected, Some((TitleStrategy::Heading, "3".to_string())));
    }

    #[test]
    fn subtitle_too_short_is_rejected() {
        let detected = detect_title(&shape(Some("IV"), Some("ok"), &[]));
        assert_eq!(detected.map(|(_, title)| title), Some("IV".to_string()));
    }

    #[test]
    fn first_line_fallback_without_heading() {
        let detected = detect_title(&shape(None, None, &["Chapter the Last", "It began."]));
        assert_eq!(
            detected,
            Some((TitleStrategy::FirstLine, "Chapter the Last".to_string()))
        );
    }

    #[test]
    fn first_line_with_period_is_prose() {
        assert_eq!(detect_title(&shape(None, None, &["It was a dark night."])), None);
    }

    #[test]
    fn long_first_line_is_prose() {
        let line = "word ".repeat(20);
        assert_eq!(detect_title(&shape(None, None, &[line.trim()])), None);
    }

    #[test]
    fn short_first_line_picks_subtitle_skipping_numerals() {
        let detected = detect_title(&shape(
            None,
            None,
            &["CHAPTER", "12", "The Return", "It was late."],
        ));
        assert_eq!(
            detected,
            Some((
                TitleStrategy::FirstLineWithSubtitle,
                "CHAPTER The Return".to_string()
            ))
        );
    }

    #[test]
    fn subtitle_scan_stops_after_three_lines() {
        let detected = detect_title(&shape(
            None,
            None,
            &["CHAPTER", "1", "2", "3", "Too Far Down"],
        ));
        assert_eq!(detected, Some((TitleStrategy::FirstLine, "CHAPTER".to_string())));
    }

    #[test]
    fn short_unpunctuated_dialogue_is_taken_as_a_title() {
        let detected = detect_title(&shape(None, None, &["\u{201C}Run!\u{201D}", "She ran."]));
        assert_eq!(
            detected.map(|(_, title)| title),
            Some("\u{201C}Run!\u{201D}".to_string())
        );
    }

    #[test]
    fn over_long_merged_title_is_rejected() {
        let heading = "x".repeat(99);
        assert_eq!(detect_title(&shape(Some(&heading), None, &[])).map(|t| t.1.len()), Some(99));
        let heading = "x".repeat(100);
        assert_eq!(detect_title(&shape(Some(&heading), None, &["Fallback"])), None);
    }

    #[test]
    fn empty_section_has_no_title() {
        let mut empty = shape(Some("Title"), None, &[]);
        empty.words.clear();
        assert_eq!(detect_title(&empty), None);
    }
}
