//! Document Model
//!
//! A stored article: identifier, title, sections and the raw text.

use std::fs;
use std::path::Path;
use std::time::SystemTime;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::parser::{self, Section};

/// Title used when neither a heading nor a file stem is available
const UNTITLED: &str = "Untitled";

/// A Markdown article held by the content store
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    /// Path relative to the content root, `/`-separated
    pub id: String,
    pub title: String,
    pub sections: Vec<Section>,
    /// Raw file content
    pub content: String,
    /// Source file modification time
    #[serde(skip)]
    pub modified: Option<SystemTime>,
    /// Invalid UTF-8 was replaced while reading
    pub lossy: bool,
    /// Title came from a level-1 heading rather than the file name
    #[serde(skip)]
    has_heading_title: bool,
}

impl Document {
    /// Build a document from text already in memory
    pub fn parse(id: impl Into<String>, content: impl Into<String>) -> Self {
        let id = id.into();
        let content = content.into();
        let outline = parser::parse_markdown(&content);

        let has_heading_title = outline.title.is_some();
        let title = outline
            .title
            .unwrap_or_else(|| fallback_title(&id));

        Self {
            id,
            title,
            sections: outline.sections,
            content,
            modified: None,
            lossy: false,
            has_heading_title,
        }
    }

    /// Read and parse a document from disk
    ///
    /// Bytes that are not valid UTF-8 are replaced rather than rejected.
    pub fn read(id: impl Into<String>, path: &Path) -> Result<Self> {
        let bytes = fs::read(path).map_err(|e| Error::io(path, e))?;
        let modified = fs::metadata(path).ok().and_then(|m| m.modified().ok());

        let (content, lossy) = match String::from_utf8(bytes) {
            Ok(text) => (text, false),
            Err(e) => (String::from_utf8_lossy(e.as_bytes()).into_owned(), true),
        };

        let mut document = Self::parse(id, content);
        document.modified = modified;
        document.lossy = lossy;
        Ok(document)
    }

    /// Whether the title was taken from a level-1 heading
    pub fn has_heading_title(&self) -> bool {
        self.has_heading_title
    }

    /// File name without extension, taken from the identifier
    pub fn stem(&self) -> &str {
        Path::new(&self.id)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("")
    }

    /// Find a section by exact heading text
    pub fn section(&self, heading: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.heading == heading)
    }

    /// Section headings in document order, lead section excluded
    pub fn headings(&self) -> Vec<&str> {
        self.sections
            .iter()
            .filter(|s| !s.is_lead())
            .map(|s| s.heading.as_str())
            .collect()
    }
}

fn fallback_title(id: &str) -> String {
    Path::new(id)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| UNTITLED.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_title_from_leading_heading() {
        let doc = Document::parse(
            "blog/post.md",
            "# Navigating the AI Bubble: What to Expect in 2027\n\n## Intro\n\nText.\n",
        );

        assert_eq!(doc.title, "Navigating the AI Bubble: What to Expect in 2027");
        assert!(doc.has_heading_title());
        assert_eq!(doc.headings(), vec!["Intro"]);
        assert!(doc.section("Intro").is_some());
        assert!(doc.section("Missing").is_none());
    }

    #[test]
    fn test_title_falls_back_to_file_stem() {
        let doc = Document::parse("blog/no_heading_here.md", "Just a paragraph.\n");

        assert_eq!(doc.title, "no_heading_here");
        assert!(!doc.has_heading_title());
        assert_eq!(doc.stem(), "no_heading_here");
    }

    #[test]
    fn test_empty_heading_falls_back_to_file_stem() {
        let doc = Document::parse("blog/real_name.md", "# \n\nBody text.\n");

        assert_eq!(doc.title, "real_name");
        assert!(!doc.has_heading_title());
    }

    #[test]
    fn test_quoted_heading_is_not_the_title() {
        let doc = Document::parse("blog/x.md", "> # Someone Else Said\n\n# Real Title\n");
        assert_eq!(doc.title, "Real Title");

        let doc = Document::parse("blog/y.md", "- # Listed\n\n# Real Title\n");
        assert_eq!(doc.title, "Real Title");
    }

    #[test]
    fn test_title_falls_back_to_untitled() {
        let doc = Document::parse("", "");
        assert_eq!(doc.title, "Untitled");
    }

    #[test]
    fn test_read_from_disk() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, "# On Disk\n\nBody\n").expect("write");

        let doc = Document::read("notes/on_disk.md", file.path()).expect("read document");
        assert_eq!(doc.id, "notes/on_disk.md");
        assert_eq!(doc.title, "On Disk");
        assert!(doc.modified.is_some());
        assert!(!doc.lossy);
    }

    #[test]
    fn test_read_replaces_invalid_utf8() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(b"# Caf\xe9\n\nbody\n").expect("write");

        let doc = Document::read("cafe.md", file.path()).expect("read document");
        assert!(doc.lossy);
        assert_eq!(doc.title, "Caf\u{FFFD}");
    }

    #[test]
    fn test_read_missing_file() {
        let err = Document::read("gone.md", Path::new("/definitely/not/here.md"))
            .expect_err("missing file should fail");
        assert!(matches!(err, Error::Io { .. }));
    }
}
