//! Downloadable plain-text artifact for a generated letter

use crate::error::Result;
use log::info;
use std::path::{Path, PathBuf};

pub const CONTENT_TYPE: &str = "text/plain";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverLetterArtifact {
    pub file_name: String,
    pub content_type: &'static str,
    /// UTF-8 encoded letter text.
    pub bytes: Vec<u8>,
}

impl CoverLetterArtifact {
    pub fn new(text: &str, name: &str, company: &str) -> Self {
        Self {
            file_name: artifact_file_name(name, company),
            content_type: CONTENT_TYPE,
            bytes: text.as_bytes().to_vec(),
        }
    }

    pub fn save_in(&self, directory: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(directory)?;
        let path = directory.join(&self.file_name);
        std::fs::write(&path, &self.bytes)?;
        info!("Saved cover letter to {}", path.display());
        Ok(path)
    }
}

/// `ansoegning_<name>_<company>.txt`, whitespace turned into underscores.
pub fn artifact_file_name(name: &str, company: &str) -> String {
    format!("ansoegning_{}_{}.txt", underscored(name), underscored(company))
}

// Path separators are flattened too so the artifact always lands in the target directory
fn underscored(value: &str) -> String {
    value
        .chars()
        .map(|c| if c.is_whitespace() || c == '/' || c == '\\' { '_' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_replaces_whitespace() {
        assert_eq!(
            artifact_file_name("Alice Jensen", "Acme A/S"),
            "ansoegning_Alice_Jensen_Acme_A_S.txt"
        );
        assert_eq!(artifact_file_name("Bo\tØ", "Ærø"), "ansoegning_Bo_Ø_Ærø.txt");
    }

    #[test]
    fn test_artifact_is_utf8_plain_text() {
        let artifact = CoverLetterArtifact::new("Kære Bob,\nMed venlig hilsen", "Alice", "Acme");
        assert_eq!(artifact.content_type, "text/plain");
        assert_eq!(String::from_utf8(artifact.bytes.clone()).unwrap(), "Kære Bob,\nMed venlig hilsen");
    }

    #[test]
    fn test_save_in_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = CoverLetterArtifact::new("brev", "Alice", "Acme");
        let path = artifact.save_in(&dir.path().join("out")).unwrap();
        assert_eq!(path.file_name().unwrap(), "ansoegning_Alice_Acme.txt");
        assert_eq!(std::fs::read_to_string(path).unwrap(), "brev");
    }
}
