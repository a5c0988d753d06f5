//! Rapid serial visual presentation for EPUB books.
//!
//! [`extractor`] turns an EPUB into one flat word sequence with a chapter
//! index, [`focal`] picks the fixation character of each word, and
//! [`playback`] steps through the words at a configurable speed while
//! checkpointing progress.

pub mod cache;
pub mod config;
pub mod controls;
pub mod document;
pub mod extractor;
pub mod focal;
pub mod playback;

pub use document::{ChapterMark, CoverImage, ParsedDocument};
pub use extractor::{ExtractError, extract, extract_in_background};
pub use playback::{PlaybackCommand, PlaybackEffect, PlaybackScheduler};
