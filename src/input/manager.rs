//! Input manager for turning files on disk into form input

use crate::error::{CoverLetterError, Result};
use crate::input::file_detector::FileType;
use crate::input::text_extractor::{
    extract_text, MarkdownExtractor, PdfPageExtractor, PlainTextExtractor, TextExtractor,
};
use log::info;
use std::path::Path;
use tokio::fs;

/// A résumé read from disk, before it is staged in the form.
#[derive(Debug, Clone, PartialEq)]
pub enum ResumeFile {
    /// Raw bytes of a paged document, extracted when staged.
    Document(Vec<u8>),
    Text(String),
}

#[derive(Debug, Default)]
pub struct InputManager;

impl InputManager {
    pub fn new() -> Self {
        Self
    }

    pub async fn load_resume(&self, path: &Path) -> Result<ResumeFile> {
        if self.detect_file_type(path)?.is_document() {
            info!("Reading résumé document: {}", path.display());
            Ok(ResumeFile::Document(fs::read(path).await?))
        } else {
            self.load_text(path).await.map(ResumeFile::Text)
        }
    }

    /// Read a file as plain text; documents are run through page extraction.
    pub async fn load_text(&self, path: &Path) -> Result<String> {
        let text = match self.detect_file_type(path)? {
            FileType::Pdf => {
                info!("Extracting text from PDF: {}", path.display());
                let bytes = fs::read(path).await?;
                extract_text(&PdfPageExtractor, &bytes)?
            }
            FileType::Text => {
                info!("Reading plain text file: {}", path.display());
                PlainTextExtractor.extract(path).await?
            }
            FileType::Markdown => {
                info!("Processing markdown file: {}", path.display());
                MarkdownExtractor.extract(path).await?
            }
            FileType::Unknown => return Err(unsupported(path)),
        };
        Ok(text)
    }

    fn detect_file_type(&self, path: &Path) -> Result<FileType> {
        if !path.exists() {
            return Err(CoverLetterError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        match FileType::from_path(path) {
            FileType::Unknown => Err(unsupported(path)),
            file_type => Ok(file_type),
        }
    }
}

fn unsupported(path: &Path) -> CoverLetterError {
    CoverLetterError::UnsupportedFormat(format!(
        "Unsupported file type for: {} (expected pdf, txt or md)",
        path.display()
    ))
}
