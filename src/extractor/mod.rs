//! EPUB extraction.
//!
//! Opens a container from raw bytes, walks its spine in reading order and
//! folds every section into one flat word sequence plus a best-effort chapter
//! index. A section that cannot be read is recorded and skipped; only an
//! unopenable container or an empty spine fails the whole extraction.

pub mod markup;
pub mod text;
pub mod title;

#[cfg(test)]
pub(crate) mod fixture;

use crate::document::{CoverImage, ParsedDocument, UNTITLED};
use epub::doc::EpubDoc;
use std::io::Cursor;
use std::sync::mpsc;
use std::thread;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Fatal extraction failures. No partial document is returned.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("container could not be opened: {0}")]
    Container(String),
    #[error("container has no reading-order sections")]
    NoContent,
}

/// A section that contributed nothing because it could not be loaded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("section {index} skipped: {reason}")]
pub struct SectionLoadError {
    pub index: usize,
    pub reason: SectionFailure,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SectionFailure {
    #[error("resource missing or not valid UTF-8")]
    Unreadable,
    #[error("not a markup document ({0})")]
    NotMarkup(String),
}

/// Extraction result with the sections that were skipped along the way.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub document: ParsedDocument,
    pub skipped: Vec<SectionLoadError>,
    /// Spine positions marked `linear="no"` (notes, covers); never read.
    pub non_linear: Vec<usize>,
}

/// Extract the word sequence and chapter index from EPUB bytes.
pub fn extract(container: &[u8]) -> Result<ParsedDocument, ExtractError> {
    extract_report(container).map(|extraction| extraction.document)
}

/// Run [`extract`] on a worker thread. Dropping the receiver discards the
/// result; the worker finishes regardless.
pub fn extract_in_background(
    container: Vec<u8>,
) -> mpsc::Receiver<Result<ParsedDocument, ExtractError>> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let result = extract(&container);
        if tx.send(result).is_err() {
            debug!("Extraction finished after its receiver was dropped");
        }
    });
    rx
}

/// Like [`extract`], but also reports every skipped section.
pub fn extract_report(container: &[u8]) -> Result<Extraction, ExtractError> {
    info!(bytes = container.len(), "Opening EPUB container");
    let mut doc = EpubDoc::from_reader(Cursor::new(container.to_vec()))
        .map_err(|err| ExtractError::Container(err.to_string()))?;

    let title = doc
        .mdata("title")
        .map(|item| text::normalize(&item.value))
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| UNTITLED.to_string());
    let author = doc
        .mdata("creator")
        .map(|item| text::normalize(&item.value))
        .filter(|author| !author.is_empty());

    let cover_image = match doc.get_cover() {
        Some((bytes, media_type)) => Some(CoverImage { bytes, media_type }),
        None => {
            debug!("No cover image resolved");
            None
        }
    };

    if doc.spine.is_empty() {
        warn!(%title, "EPUB spine is empty");
        return Err(ExtractError::NoContent);
    }
    let section_count = doc.spine.len();

    let mut document = ParsedDocument {
        title,
        author,
        cover_image,
        ..ParsedDocument::default()
    };
    let mut skipped = Vec::new();
    let mut non_linear = Vec::new();
    let mut index = 0usize;

    loop {
        let linear = doc.spine.get(index).is_none_or(|item| item.linear);
        if !linear {
            debug!(section = index, "Skipping non-linear section");
            non_linear.push(index);
        } else {
            match load_section(&mut doc, index) {
                Ok(markup) => {
                    let shape = markup::analyze(&markup);
                    let detected = title::detect_title(&shape);
                    debug!(
                        section = index,
                        words = shape.words.len(),
                        strategy = detected.as_ref().map(|(strategy, _)| strategy.label()),
                        "Parsed section"
                    );
                    if let Some((_, chapter)) = &detected {
                        debug!(
                            section = index,
                            word_index = document.word_count(),
                            %chapter,
                            "Detected chapter"
                        );
                    }
                    document.push_section(detected.map(|(_, chapter)| chapter), shape.words);
                }
                Err(err) => {
                    warn!(section = index, "Skipping section: {err}");
                    skipped.push(err);
                }
            }
        }

        index += 1;
        if index >= section_count || !doc.go_next() {
            break;
        }
    }

    info!(
        title = %document.title,
        sections = section_count,
        skipped = skipped.len(),
        non_linear = non_linear.len(),
        words = document.word_count(),
        chapters = document.chapters.len(),
        "Finished extracting EPUB"
    );
    Ok(Extraction {
        document,
        skipped,
        non_linear,
    })
}

fn load_section<R>(doc: &mut EpubDoc<R>, index: usize) -> Result<String, SectionLoadError>
where
    R: std::io::Read + std::io::Seek,
{
    let (markup, media_type) = doc.get_current_str().ok_or(SectionLoadError {
        index,
        reason: SectionFailure::Unreadable,
    })?;
    if !(media_type.contains("html") || media_type.contains("xml")) {
        return Err(SectionLoadError {
            index,
            reason: SectionFailure::NotMarkup(media_type),
        });
    }
    Ok(markup)
}
