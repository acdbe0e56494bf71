//! Uploaded PDF handling: text extraction and excerpts.

use serde::{Deserialize, Serialize};

use crate::error::DocumentError;

/// Default number of characters of a document fed into the chat.
pub const DEFAULT_EXCERPT_CHARS: usize = 3000;

/// A PDF the user uploaded, with its full extracted text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedDocument {
    pub name: String,
    pub text: String,
}

impl UploadedDocument {
    /// Extract text from raw PDF bytes.
    pub fn from_pdf(name: impl Into<String>, bytes: &[u8]) -> Result<Self, DocumentError> {
        let name = name.into();
        let text = extract_pdf_text(&name, bytes)?;
        Ok(Self { name, text })
    }

    /// The chat message announcing this document to the model.
    pub fn chat_message(&self, limit: usize) -> String {
        format!(
            "Extracted from uploaded PDF '{}':\n{}",
            self.name,
            excerpt(&self.text, limit)
        )
    }

    pub fn preview(&self, limit: usize) -> DocumentPreview {
        DocumentPreview {
            name: self.name.clone(),
            excerpt: excerpt(&self.text, limit).to_string(),
        }
    }
}

/// What the document panel shows for one upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentPreview {
    pub name: String,
    pub excerpt: String,
}

/// Extract the text of every page, skipping pages with no text.
pub fn extract_pdf_text(name: &str, bytes: &[u8]) -> Result<String, DocumentError> {
    let raw = pdf_extract::extract_text_from_mem(bytes).map_err(|e| DocumentError::Extraction {
        name: name.to_string(),
        reason: e.to_string(),
    })?;
    let text = join_pages(&raw);
    if text.is_empty() {
        return Err(DocumentError::Empty {
            name: name.to_string(),
        });
    }
    Ok(text)
}

/// pdf-extract separates pages with form feeds.
fn join_pages(raw: &str) -> String {
    raw.split('\x0c')
        .map(str::trim)
        .filter(|page| !page.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// The first `limit` characters of `text`, never splitting a character.
pub fn excerpt(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn excerpt_truncates_by_chars() {
        assert_eq!(excerpt("hello world", 5), "hello");
        assert_eq!(excerpt("short", 100), "short");
        assert_eq!(excerpt("", 3), "");
        // Multi-byte characters are kept whole.
        assert_eq!(excerpt("héllo", 2), "hé");
    }

    #[test]
    fn join_pages_drops_blank_pages() {
        let raw = "page one\x0c   \x0cpage three\n";
        assert_eq!(join_pages(raw), "page one\n\npage three");
    }

    #[test]
    fn chat_message_names_the_file() {
        let doc = UploadedDocument {
            name: "policy.pdf".into(),
            text: "x".repeat(5000),
        };
        let msg = doc.chat_message(DEFAULT_EXCERPT_CHARS);
        assert!(msg.starts_with("Extracted from uploaded PDF 'policy.pdf':\n"));
        assert_eq!(
            msg.len(),
            "Extracted from uploaded PDF 'policy.pdf':\n".len() + DEFAULT_EXCERPT_CHARS
        );
    }

    #[test]
    fn preview_is_limited() {
        let doc = UploadedDocument {
            name: "a.pdf".into(),
            text: "abcdef".into(),
        };
        let preview = doc.preview(3);
        assert_eq!(preview.name, "a.pdf");
        assert_eq!(preview.excerpt, "abc");
    }

    #[test]
    fn non_pdf_bytes_fail_extraction() {
        let err = UploadedDocument::from_pdf("notes.pdf", b"definitely not a pdf").unwrap_err();
        assert!(matches!(err, DocumentError::Extraction { .. }));
    }

    #[test]
    fn extracts_text_from_pdf() {
        let bytes = include_bytes!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/tests/fixtures/retention_policy.pdf"
        ));
        let doc = UploadedDocument::from_pdf("retention_policy.pdf", bytes).unwrap();
        assert_eq!(doc.name, "retention_policy.pdf");
        assert!(doc.text.contains("Retention"));
        assert!(doc.text.contains("seven years"));
        assert_eq!(doc.text, doc.text.trim());
    }
}
