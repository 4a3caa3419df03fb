//! Text Extractor
//!
//! Raw text out of uploaded files.

use buddy_utils::{file_extension, BuddyError, BuddyResult};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::fmt::Display;
use std::io::{Cursor, Read};
use tracing::debug;

/// Main body part inside a `.docx` container.
const DOCX_BODY: &str = "word/document.xml";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Pdf,
    Docx,
    Text,
}

impl FileKind {
    /// Anything that is not a PDF or Word file is read as text.
    pub fn from_name(file_name: &str) -> Self {
        match file_extension(file_name).as_str() {
            "pdf" => Self::Pdf,
            "docx" => Self::Docx,
            _ => Self::Text,
        }
    }
}

pub struct TextExtractor;

impl TextExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Trimmed text of `data`; empty when nothing could be read.
    pub fn extract(&self, file_name: &str, data: &[u8]) -> BuddyResult<String> {
        let text = match FileKind::from_name(file_name) {
            FileKind::Pdf => pdf_extract::extract_text_from_mem(data).map_err(|e| {
                BuddyError::document_processing(format!("Failed to extract text from {}: {}", file_name, e))
            })?,
            FileKind::Docx => extract_docx(file_name, data)?,
            FileKind::Text => String::from_utf8_lossy(data).into_owned(),
        };

        let text = text.trim().to_string();
        debug!(file_name, chars = text.len(), "Text extracted");
        Ok(text)
    }
}

/// Paragraph texts of a Word document joined by newlines.
fn extract_docx(file_name: &str, data: &[u8]) -> BuddyResult<String> {
    let fail = |e: &dyn Display| BuddyError::document_processing(format!("Failed to read {}: {}", file_name, e));

    let mut archive = zip::ZipArchive::new(Cursor::new(data)).map_err(|e| fail(&e))?;
    let mut xml = String::new();
    archive
        .by_name(DOCX_BODY)
        .map_err(|e| fail(&e))?
        .read_to_string(&mut xml)
        .map_err(|e| fail(&e))?;

    let paragraphs = docx_paragraphs(&xml).map_err(|e| fail(&e))?;
    Ok(paragraphs.join("\n"))
}

/// Concatenated `w:t` runs of every `w:p`, empty paragraphs included.
fn docx_paragraphs(xml: &str) -> Result<Vec<String>, quick_xml::Error> {
    let mut reader = Reader::from_reader(xml.as_bytes());
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut in_text = false;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.name().as_ref() {
                b"w:p" => current.clear(),
                b"w:t" => in_text = true,
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"w:p" => paragraphs.push(String::new()),
                b"w:tab" => current.push('\t'),
                _ => {}
            },
            Event::Text(e) if in_text => current.push_str(&e.unescape()?),
            Event::End(e) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:p" => paragraphs.push(std::mem::take(&mut current)),
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(paragraphs)
}

impl Default for TextExtractor {
    fn default() -> Self {
        Self::new()
    }
}
