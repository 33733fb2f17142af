//! Plain-text extraction from corpus files

use std::path::Path;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crate::error::{Error, Result};

/// Upper bound on a single pdf-extract run; some malformed PDFs hang it
const PDF_EXTRACT_TIMEOUT: Duration = Duration::from_secs(60);

/// Extracts the full plain text of a corpus file
pub struct FileParser;

impl FileParser {
    /// Read `path` and return its text
    pub fn extract_text(path: &Path) -> Result<String> {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        let text = match extension_of(path).as_deref() {
            Some("pdf") => {
                let data = std::fs::read(path)?;
                Self::parse_pdf(&filename, data)?
            }
            Some("txt" | "md" | "markdown") => {
                let data = std::fs::read(path)?;
                String::from_utf8(data)
                    .map_err(|e| Error::file_parse(&filename, format!("Invalid UTF-8: {}", e)))?
            }
            other => {
                return Err(Error::UnsupportedFileType(
                    other.unwrap_or("<none>").to_string(),
                ))
            }
        };

        if text.trim().is_empty() {
            return Err(Error::file_parse(&filename, "No text could be extracted"));
        }

        Ok(text)
    }

    fn parse_pdf(filename: &str, data: Vec<u8>) -> Result<String> {
        let content = Self::extract_pdf_with_timeout(filename, data)?;

        Ok(cleanup_pdf_text(&content)
            .replace('\0', "")
            .lines()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>()
            .join("\n"))
    }

    /// Run pdf-extract on a worker thread, falling back to lopdf on error
    fn extract_pdf_with_timeout(filename: &str, data: Vec<u8>) -> Result<String> {
        let (tx, rx) = mpsc::channel();
        let worker_data = data.clone();

        let handle = thread::spawn(move || {
            let result = pdf_extract::extract_text_from_mem(&worker_data);
            let _ = tx.send(result);
        });

        match rx.recv_timeout(PDF_EXTRACT_TIMEOUT) {
            Ok(Ok(text)) => {
                let _ = handle.join();
                Ok(text)
            }
            Ok(Err(e)) => {
                let _ = handle.join();
                tracing::warn!("pdf-extract failed on {}: {}, trying fallback", filename, e);
                Self::extract_pdf_text_fallback(filename, &data)
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {
                tracing::warn!(
                    "pdf-extract timed out on {} after {:?}, trying fallback",
                    filename,
                    PDF_EXTRACT_TIMEOUT
                );
                Self::extract_pdf_text_fallback(filename, &data)
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                let _ = handle.join();
                tracing::warn!("pdf-extract panicked on {}, trying fallback", filename);
                Self::extract_pdf_text_fallback(filename, &data)
            }
        }
    }

    /// Fallback PDF text extraction using lopdf directly
    fn extract_pdf_text_fallback(filename: &str, data: &[u8]) -> Result<String> {
        let doc = lopdf::Document::load_mem(data)
            .map_err(|e| Error::file_parse(filename, format!("Failed to load PDF: {}", e)))?;

        let pages: Vec<u32> = doc.get_pages().keys().copied().collect();
        doc.extract_text(&pages)
            .map_err(|e| Error::file_parse(filename, format!("Failed to extract text: {}", e)))
    }
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

/// Replace typographic characters pdf-extract emits with plain equivalents
fn cleanup_pdf_text(text: &str) -> String {
    text.replace('\u{2010}', "-")
        .replace('\u{2011}', "-")
        .replace('\u{2013}', "-")
        .replace('\u{2018}', "'")
        .replace('\u{2019}', "'")
        .replace('\u{201C}', "\"")
        .replace('\u{201D}', "\"")
        .replace('\u{00A0}', " ")
        .replace('\u{FB01}', "fi")
        .replace('\u{FB02}', "fl")
        .replace('\u{FB00}', "ff")
}
