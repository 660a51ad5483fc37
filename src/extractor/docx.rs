use std::io::{Cursor, Read};
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::ExtractError;

const DOCUMENT_PART: &str = "word/document.xml";

/// Extracts paragraph text from a DOCX package.
///
/// Opens the zip container, streams `word/document.xml` with quick-xml and
/// joins paragraphs with `\n`. Run-level tabs and breaks are kept.
pub struct DocxExtractor;

impl DocxExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl super::Extractor for DocxExtractor {
    fn extract(&self, path: &Path) -> Result<String, ExtractError> {
        let bytes = super::read_bytes(path)?;
        let docx_err = |reason: String| ExtractError::Docx {
            path: path.to_path_buf(),
            reason,
        };

        let mut archive =
            zip::ZipArchive::new(Cursor::new(bytes)).map_err(|e| docx_err(e.to_string()))?;
        let mut xml = String::new();
        archive
            .by_name(DOCUMENT_PART)
            .map_err(|e| docx_err(format!("{}: {}", DOCUMENT_PART, e)))?
            .read_to_string(&mut xml)
            .map_err(|e| docx_err(e.to_string()))?;

        parse_document_xml(&xml).map_err(docx_err)
    }
}

/// Collect the text of every `w:p` in a WordprocessingML body.
///
/// Paragraphs are emitted in the order they open, so a text box nested in a
/// paragraph follows it. `mc:Fallback` subtrees duplicate their `mc:Choice`
/// sibling and are skipped.
fn parse_document_xml(xml: &str) -> Result<String, String> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();

    let mut paragraphs: Vec<String> = Vec::new();
    // Indices into `paragraphs` of the currently open `w:p` elements
    let mut open: Vec<usize> = Vec::new();
    let mut run_depth = 0usize;
    let mut in_text = false;
    let mut skip_depth = 0usize;

    loop {
        let event = match reader.read_event_into(&mut buf) {
            Ok(event) => event,
            Err(e) => {
                return Err(format!(
                    "malformed XML at position {}: {}",
                    reader.buffer_position(),
                    e
                ))
            }
        };

        if skip_depth > 0 {
            match event {
                Event::Start(_) => skip_depth += 1,
                Event::End(_) => skip_depth -= 1,
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
            continue;
        }

        match event {
            Event::Start(ref e) => match e.name().local_name().as_ref() {
                b"Fallback" => skip_depth = 1,
                b"p" => {
                    paragraphs.push(String::new());
                    open.push(paragraphs.len() - 1);
                }
                b"r" => run_depth += 1,
                b"t" => in_text = true,
                _ => {}
            },
            Event::Empty(ref e) => {
                let current = open.last().copied();
                match (e.name().local_name().as_ref(), current) {
                    (b"p", _) => paragraphs.push(String::new()),
                    (b"tab", Some(i)) if run_depth > 0 => paragraphs[i].push('\t'),
                    (b"br" | b"cr", Some(i)) if run_depth > 0 => paragraphs[i].push('\n'),
                    _ => {}
                }
            }
            Event::End(ref e) => match e.name().local_name().as_ref() {
                b"p" => {
                    open.pop();
                }
                b"r" => run_depth = run_depth.saturating_sub(1),
                b"t" => in_text = false,
                _ => {}
            },
            Event::Text(ref e) if in_text => {
                if let Some(&i) = open.last() {
                    let text = e.unescape().map_err(|e| e.to_string())?;
                    paragraphs[i].push_str(&text);
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(paragraphs.join("\n"))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::super::Extractor;
    use super::*;

    const BODY: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p>
      <w:pPr><w:tabs><w:tab w:val="left" w:pos="720"/></w:tabs></w:pPr>
      <w:r><w:t xml:space="preserve">This Agreement </w:t></w:r>
      <w:r><w:t>has no indemnity &amp; no cap.</w:t></w:r>
    </w:p>
    <w:p/>
    <w:p>
      <w:r><w:t>Section</w:t><w:tab/><w:t>Termination</w:t></w:r>
    </w:p>
  </w:body>
</w:document>"#;

    fn write_docx(dir: &Path, name: &str, document_xml: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        let file = std::fs::File::create(&path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        zip.start_file(DOCUMENT_PART, zip::write::SimpleFileOptions::default())
            .unwrap();
        zip.write_all(document_xml.as_bytes()).unwrap();
        zip.finish().unwrap();
        path
    }

    #[test]
    fn test_parse_paragraphs() {
        let text = parse_document_xml(BODY).unwrap();
        assert_eq!(
            text,
            "This Agreement has no indemnity & no cap.\n\nSection\tTermination"
        );
    }

    #[test]
    fn test_extract_from_package() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_docx(dir.path(), "lease.docx", BODY);

        let text = DocxExtractor::new().extract(&path).unwrap();
        assert!(text.starts_with("This Agreement has no indemnity"));
    }

    #[test]
    fn test_not_a_zip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fake.docx");
        std::fs::write(&path, b"plain text pretending to be docx").unwrap();

        let err = DocxExtractor::new().extract(&path).unwrap_err();
        assert!(matches!(err, ExtractError::Docx { .. }));
    }

    #[test]
    fn test_missing_document_part() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.docx");
        let file = std::fs::File::create(&path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        zip.start_file("word/styles.xml", zip::write::SimpleFileOptions::default())
            .unwrap();
        zip.write_all(b"<styles/>").unwrap();
        zip.finish().unwrap();

        let err = DocxExtractor::new().extract(&path).unwrap_err();
        assert!(err.to_string().contains(DOCUMENT_PART));
    }

    #[test]
    fn test_text_box_keeps_outer_paragraph_and_skips_fallback() {
        let xml = r#"<w:document xmlns:w="w" xmlns:mc="mc" xmlns:wps="wps" xmlns:v="v"><w:body><w:p><w:r><w:t>Outer paragraph text before the box.</w:t></w:r><w:r><mc:AlternateContent><mc:Choice Requires="wps"><w:drawing><wps:txbx><w:txbxContent><w:p><w:r><w:t>Boxed text.</w:t></w:r></w:p></w:txbxContent></wps:txbx></w:drawing></mc:Choice><mc:Fallback><w:pict><v:textbox><w:txbxContent><w:p><w:r><w:t>Boxed text.</w:t></w:r></w:p></w:txbxContent></v:textbox></w:pict></mc:Fallback></mc:AlternateContent></w:r><w:r><w:t xml:space="preserve"> Trailing.</w:t></w:r></w:p></w:body></w:document>"#;

        let text = parse_document_xml(xml).unwrap();
        assert_eq!(
            text,
            "Outer paragraph text before the box. Trailing.\nBoxed text."
        );
        assert_eq!(text.matches("Boxed text.").count(), 1);
    }

    #[test]
    fn test_tab_inside_nested_run() {
        let xml = r#"<w:document xmlns:w="w" xmlns:mc="mc"><w:body><w:p><w:r><mc:AlternateContent><mc:Choice><w:txbxContent><w:p><w:r><w:t>Inner</w:t></w:r></w:p></w:txbxContent></mc:Choice></mc:AlternateContent><w:tab/><w:t>after</w:t></w:r></w:p></w:body></w:document>"#;
        assert_eq!(parse_document_xml(xml).unwrap(), "\tafter\nInner");
    }

    #[test]
    fn test_empty_body_yields_blank_text() {
        let xml = r#"<w:document xmlns:w="x"><w:body><w:p/><w:p></w:p></w:body></w:document>"#;
        let text = parse_document_xml(xml).unwrap();
        assert!(text.trim().is_empty());
    }
}
