// src/core/extractor.rs
//! Plain-text extraction from resume documents (PDF, DOCX, plain text)

use regex::Regex;
use std::io::{Cursor, Read};
use std::path::Path;
use std::sync::OnceLock;
use tracing::{debug, info};

use crate::error::{AnalysisError, Result};

const PDF_MAGIC: &[u8] = b"%PDF";
const ZIP_MAGIC: &[u8] = &[0x50, 0x4B, 0x03, 0x04];
const DOCX_BODY_ENTRY: &str = "word/document.xml";

/// Extensions the resolver will hand to the extractor
pub const SUPPORTED_EXTENSIONS: &[&str] = &["pdf", "docx", "txt", "md"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
    PlainText,
}

impl DocumentFormat {
    /// Detect by magic bytes first, then fall back to the file extension
    pub fn detect(bytes: &[u8], path_hint: Option<&Path>) -> Option<Self> {
        if bytes.starts_with(PDF_MAGIC) {
            return Some(Self::Pdf);
        }
        if bytes.starts_with(ZIP_MAGIC) {
            return Some(Self::Docx);
        }

        match path_hint.and_then(extension_of).as_deref() {
            Some("pdf") => Some(Self::Pdf),
            Some("docx") => Some(Self::Docx),
            Some("txt") | Some("md") => Some(Self::PlainText),
            _ => None,
        }
    }
}

pub fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

pub fn is_supported_extension(path: &Path) -> bool {
    extension_of(path).is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
}

/// Decode a document buffer into a single text string.
///
/// Decoding runs on the blocking pool; a panicking decoder surfaces as
/// `UnreadableDocument` rather than tearing down the request.
pub async fn extract_text(bytes: Vec<u8>, path_hint: Option<&Path>) -> Result<String> {
    let format = DocumentFormat::detect(&bytes, path_hint).ok_or_else(|| {
        AnalysisError::UnreadableDocument(match path_hint {
            Some(p) => format!("unrecognized document format: {}", p.display()),
            None => "unrecognized document format".to_string(),
        })
    })?;

    debug!("Extracting {:?} document ({} bytes)", format, bytes.len());

    let text = tokio::task::spawn_blocking(move || decode(format, &bytes))
        .await
        .map_err(|e| AnalysisError::UnreadableDocument(format!("decoder aborted: {}", e)))??;

    info!("Extracted {} characters of text", text.chars().count());
    Ok(text)
}

fn decode(format: DocumentFormat, bytes: &[u8]) -> Result<String> {
    match format {
        DocumentFormat::Pdf => pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| AnalysisError::UnreadableDocument(format!("PDF decoding failed: {}", e))),
        DocumentFormat::Docx => decode_docx(bytes),
        DocumentFormat::PlainText => String::from_utf8(bytes.to_vec())
            .map_err(|_| AnalysisError::UnreadableDocument("text file is not valid UTF-8".into())),
    }
}

fn decode_docx(bytes: &[u8]) -> Result<String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| AnalysisError::UnreadableDocument(format!("invalid DOCX archive: {}", e)))?;

    let mut xml = String::new();
    archive
        .by_name(DOCX_BODY_ENTRY)
        .map_err(|e| AnalysisError::UnreadableDocument(format!("DOCX has no body: {}", e)))?
        .read_to_string(&mut xml)
        .map_err(|e| AnalysisError::UnreadableDocument(format!("DOCX body unreadable: {}", e)))?;

    Ok(docx_xml_to_text(&xml))
}

fn paragraph_end() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"</w:p>|<w:br\s*/>|<w:cr\s*/>").expect("valid regex"))
}

fn text_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<w:t(?:\s[^>]*)?>([^<]*)</w:t>|<w:tab\s*/>").expect("valid regex"))
}

/// Flatten WordprocessingML into one line per paragraph
fn docx_xml_to_text(xml: &str) -> String {
    paragraph_end()
        .split(xml)
        .map(|paragraph| {
            text_run()
                .captures_iter(paragraph)
                .map(|cap| match cap.get(1) {
                    Some(run) => unescape_xml(run.as_str()),
                    None => "\t".to_string(),
                })
                .collect::<String>()
        })
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn char_reference() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"&#(?:x([0-9A-Fa-f]{1,6})|([0-9]{1,7}));").expect("valid regex"))
}

/// `&amp;` is replaced last so `&amp;lt;` stays a literal `&lt;`
fn unescape_xml(text: &str) -> String {
    char_reference()
        .replace_all(text, |cap: &regex::Captures| {
            let code = match (cap.get(1), cap.get(2)) {
                (Some(hex), _) => u32::from_str_radix(hex.as_str(), 16).ok(),
                (_, Some(dec)) => dec.as_str().parse::<u32>().ok(),
                _ => None,
            };
            code.and_then(char::from_u32)
                .map(String::from)
                .unwrap_or_else(|| cap[0].to_string())
        })
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn build_docx(document_xml: &str) -> Vec<u8> {
        let mut buffer = Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut buffer);
            writer
                .start_file(DOCX_BODY_ENTRY, zip::write::SimpleFileOptions::default())
                .unwrap();
            writer.write_all(document_xml.as_bytes()).unwrap();
            writer.finish().unwrap();
        }
        buffer.into_inner()
    }

    #[test]
    fn test_detect_prefers_magic_bytes_over_extension() {
        let hint = Path::new("resume.txt");
        assert_eq!(
            DocumentFormat::detect(b"%PDF-1.7 ...", Some(hint)),
            Some(DocumentFormat::Pdf)
        );
        assert_eq!(
            DocumentFormat::detect(b"plain", Some(hint)),
            Some(DocumentFormat::PlainText)
        );
        assert_eq!(DocumentFormat::detect(b"plain", Some(Path::new("cv.odt"))), None);
        assert_eq!(DocumentFormat::detect(b"plain", None), None);
    }

    #[test]
    fn test_supported_extension_is_case_insensitive() {
        assert!(is_supported_extension(Path::new("/uploads/CV.PDF")));
        assert!(is_supported_extension(Path::new("cv.docx")));
        assert!(!is_supported_extension(Path::new("cv.doc")));
        assert!(!is_supported_extension(Path::new("cv")));
    }

    #[tokio::test]
    async fn test_extract_plain_text() {
        let text = extract_text(b"SKILLS\nRust".to_vec(), Some(Path::new("cv.txt")))
            .await
            .unwrap();
        assert_eq!(text, "SKILLS\nRust");
    }

    #[tokio::test]
    async fn test_unknown_format_is_unreadable() {
        let err = extract_text(vec![0, 1, 2, 3], Some(Path::new("cv.bin")))
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::UnreadableDocument(_)));
    }

    /// Single-page PDF with one Helvetica text line per entry in `lines`
    fn build_pdf(lines: &[&str]) -> Vec<u8> {
        let mut content = String::from("BT /F1 12 Tf 72 720 Td 14 TL");
        for line in lines {
            content.push_str(&format!(" ({}) Tj T*", line));
        }
        content.push_str(" ET");

        let objects = [
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Contents 4 0 R \
             /Resources << /Font << /F1 5 0 R >> >> >>"
                .to_string(),
            format!(
                "<< /Length {} >>\nstream\n{}\nendstream",
                content.len(),
                content
            ),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
                .to_string(),
        ];

        let mut pdf = String::from("%PDF-1.4\n");
        let mut offsets = Vec::new();
        for (i, body) in objects.iter().enumerate() {
            offsets.push(pdf.len());
            pdf.push_str(&format!("{} 0 obj\n{}\nendobj\n", i + 1, body));
        }
        let xref_at = pdf.len();
        pdf.push_str(&format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1));
        for offset in offsets {
            pdf.push_str(&format!("{:010} 00000 n \n", offset));
        }
        pdf.push_str(&format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            xref_at
        ));
        pdf.into_bytes()
    }

    #[tokio::test]
    async fn test_extract_pdf_text() {
        let bytes = build_pdf(&["Jane Doe", "Skills", "Rust and Kubernetes"]);
        let text = extract_text(bytes, Some(Path::new("resume.pdf")))
            .await
            .unwrap();

        assert!(text.contains("Jane Doe"), "{:?}", text);
        assert!(text.contains("Rust and Kubernetes"), "{:?}", text);
    }

    #[tokio::test]
    async fn test_corrupt_pdf_is_unreadable() {
        let err = extract_text(b"%PDF-garbage".to_vec(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::UnreadableDocument(_)));
    }

    #[tokio::test]
    async fn test_extract_docx_paragraphs() {
        let xml = r#"<w:document><w:body>
            <w:p><w:r><w:t>SKILLS</w:t></w:r></w:p>
            <w:p><w:r><w:t xml:space="preserve">Rust, </w:t></w:r><w:r><w:t>Go &amp; SQL</w:t></w:r></w:p>
            </w:body></w:document>"#;
        let text = extract_text(build_docx(xml), Some(Path::new("cv.docx")))
            .await
            .unwrap();
        assert_eq!(text, "SKILLS\nRust, Go & SQL");
    }

    #[test]
    fn test_docx_character_references_are_decoded() {
        let text = docx_xml_to_text(
            "<w:p><w:r><w:t>Jane&#8217;s caf&#233; &#x2013; R&amp;D &amp;#65;</w:t></w:r></w:p>",
        );
        assert_eq!(text, "Jane\u{2019}s caf\u{e9} \u{2013} R&D &#65;");
        assert_eq!(unescape_xml("&#1114112; &#xD800;"), "&#1114112; &#xD800;");
    }

    #[tokio::test]
    async fn test_zip_without_docx_body_is_unreadable() {
        let mut buffer = Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut buffer);
            writer
                .start_file("other.txt", zip::write::SimpleFileOptions::default())
                .unwrap();
            writer.write_all(b"x").unwrap();
            writer.finish().unwrap();
        }
        let err = extract_text(buffer.into_inner(), None).await.unwrap_err();
        assert!(matches!(err, AnalysisError::UnreadableDocument(_)));
    }
}
