//! Text extraction from résumé documents and text files

use crate::error::{CoverLetterError, Result};
use log::{debug, info};
use pulldown_cmark::{Event, Parser, Tag};
use std::path::Path;
use tokio::fs;

/// Splits a paged document into per-page text.
pub trait PageExtractor {
    /// Page text in document order. `None` marks a page that yielded nothing.
    /// Fails with [`CoverLetterError::DocumentParse`] when the bytes are not a
    /// readable document at all.
    fn extract_pages(&self, bytes: &[u8]) -> Result<Vec<Option<String>>>;
}

pub struct PdfPageExtractor;

impl PageExtractor for PdfPageExtractor {
    fn extract_pages(&self, bytes: &[u8]) -> Result<Vec<Option<String>>> {
        let document = lopdf::Document::load_mem(bytes)?;

        // get_pages is keyed by page number, so iteration is document order
        let pages = document
            .get_pages()
            .keys()
            .map(|&number| match document.extract_text(&[number]) {
                Ok(text) => Some(text),
                Err(e) => {
                    debug!("No text on page {}: {}", number, e);
                    None
                }
            })
            .collect();

        Ok(pages)
    }
}

/// Concatenate the text of every page, each followed by a newline.
///
/// Missed or empty pages are skipped. Any other page text is kept as-is,
/// whitespace included. An empty result is not an error; callers
/// should treat it as a failed extraction and ask for the text manually.
pub fn extract_text<E: PageExtractor + ?Sized>(extractor: &E, bytes: &[u8]) -> Result<String> {
    let pages = extractor.extract_pages(bytes)?;
    let total = pages.len();

    let mut text = String::new();
    let mut skipped = 0;
    for page in pages {
        match page {
            Some(page_text) if !page_text.is_empty() => {
                text.push_str(&page_text);
                text.push('\n');
            }
            _ => skipped += 1,
        }
    }

    info!(
        "Extracted {} characters from {} pages ({} without text)",
        text.chars().count(),
        total,
        skipped
    );
    Ok(text)
}

/// Advisory classification of an extraction result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionOutcome {
    Extracted { characters: usize },
    /// Nothing could be read; the user should paste the text instead.
    Empty,
}

impl ExtractionOutcome {
    pub fn of(text: &str) -> Self {
        if text.trim().is_empty() {
            ExtractionOutcome::Empty
        } else {
            ExtractionOutcome::Extracted {
                characters: text.chars().count(),
            }
        }
    }

    pub fn warning(&self) -> Option<&'static str> {
        match self {
            ExtractionOutcome::Empty => Some(
                "Kunne ikke udtrække tekst fra PDF'en. Prøv venligst at indsætte teksten manuelt.",
            ),
            ExtractionOutcome::Extracted { .. } => None,
        }
    }
}

pub trait TextExtractor {
    fn extract(&self, path: &Path) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let content = fs::read_to_string(path).await.map_err(CoverLetterError::Io)?;
        Ok(content)
    }
}

pub struct MarkdownExtractor;

impl TextExtractor for MarkdownExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let markdown_content = fs::read_to_string(path).await.map_err(CoverLetterError::Io)?;
        Ok(self.markdown_to_text(&markdown_content))
    }
}

impl MarkdownExtractor {
    pub fn markdown_to_text(&self, markdown: &str) -> String {
        let mut raw = String::new();
        for event in Parser::new(markdown) {
            match event {
                Event::Text(text) | Event::Code(text) => raw.push_str(&text),
                Event::SoftBreak | Event::HardBreak => raw.push('\n'),
                Event::End(Tag::Paragraph | Tag::Heading(..) | Tag::Item | Tag::CodeBlock(_)) => {
                    raw.push('\n')
                }
                _ => {}
            }
        }

        raw.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
