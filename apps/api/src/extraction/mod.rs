//! Document text extraction: uploaded file bytes to a plain text blob.
//!
//! The declared format comes from the upload filename's extension. Each format
//! fails with its own typed error so callers can tell an unsupported upload
//! from a corrupt one.

mod docx;

use std::fmt;

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("unsupported file type '{0}' (expected pdf, docx or txt)")]
    UnsupportedType(String),

    #[error("could not read {format} content: {reason}")]
    Corrupt {
        format: DocumentFormat,
        reason: String,
    },
}

impl ExtractionError {
    fn corrupt(format: DocumentFormat, reason: impl fmt::Display) -> Self {
        ExtractionError::Corrupt {
            format,
            reason: reason.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
    Txt,
}

impl DocumentFormat {
    /// Format from the text after the last `.` of `filename`, case-insensitive.
    pub fn from_filename(filename: &str) -> Result<Self, ExtractionError> {
        let extension = filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "pdf" => Ok(DocumentFormat::Pdf),
            "docx" => Ok(DocumentFormat::Docx),
            "txt" => Ok(DocumentFormat::Txt),
            _ => Err(ExtractionError::UnsupportedType(extension)),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "pdf",
            DocumentFormat::Docx => "docx",
            DocumentFormat::Txt => "txt",
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Extracts text from `bytes` parsed as `format`. CPU-bound for PDF and DOCX;
/// call from a blocking context.
pub fn extract_text(bytes: &[u8], format: DocumentFormat) -> Result<String, ExtractionError> {
    let text = match format {
        DocumentFormat::Pdf => pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| ExtractionError::corrupt(format, e))?,
        DocumentFormat::Docx => {
            docx::extract_text(bytes).map_err(|reason| ExtractionError::corrupt(format, reason))?
        }
        DocumentFormat::Txt => {
            let text = std::str::from_utf8(bytes)
                .map_err(|e| ExtractionError::corrupt(format, e))?;
            text.strip_prefix('\u{FEFF}').unwrap_or(text).to_string()
        }
    };

    debug!(%format, bytes = bytes.len(), chars = text.chars().count(), "text extracted");
    Ok(text)
}
