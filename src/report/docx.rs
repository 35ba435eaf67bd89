// src/report/docx.rs
//
// Minimal WordprocessingML writer. Only the parts Word needs to open the file
// are emitted; styles are defined inline in word/styles.xml.

use crate::report::assembler::Report;
use crate::report::blocks::{ParagraphStyle, RenderedBlock};
use crate::utils::error::StorageError;
use quick_xml::escape::escape;
use std::io::{Seek, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;

const MAX_HEADING_LEVEL: usize = 9;

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/><Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/></Types>"#;

const PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/></Relationships>"#;

const DOCUMENT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#;

const SECTION_PROPERTIES: &str = r#"<w:sectPr><w:pgSz w:w="12240" w:h="15840"/><w:pgMar w:top="1440" w:right="1440" w:bottom="1440" w:left="1440" w:header="720" w:footer="720" w:gutter="0"/></w:sectPr>"#;

/// Writes the report as a `.docx` file at `path`.
pub fn write_docx(report: &Report, path: &Path) -> Result<(), StorageError> {
    let file = std::fs::File::create(path)?;
    write_docx_to(report, file)?;
    Ok(())
}

/// Writes the report as a `.docx` package into any seekable sink.
pub fn write_docx_to<W: Write + Seek>(report: &Report, sink: W) -> Result<W, StorageError> {
    let mut zip = zip::ZipWriter::new(sink);

    let parts = [
        ("[Content_Types].xml", CONTENT_TYPES.to_string()),
        ("_rels/.rels", PACKAGE_RELS.to_string()),
        ("word/_rels/document.xml.rels", DOCUMENT_RELS.to_string()),
        ("word/document.xml", document_xml(&report.blocks)),
        ("word/styles.xml", styles_xml()),
        ("docProps/core.xml", core_xml(&report.title)),
    ];
    for (name, content) in parts {
        zip.start_file(name, SimpleFileOptions::default())?;
        zip.write_all(content.as_bytes())?;
    }

    Ok(zip.finish()?)
}

/// Drops characters XML 1.0 cannot carry (form feeds from pdftotext, stray controls), then escapes.
fn xml_text(text: &str) -> String {
    let allowed: String = text
        .chars()
        .filter(|c| {
            matches!(c, '\t' | '\n' | '\r') || (*c >= ' ' && *c != '\u{FFFE}' && *c != '\u{FFFF}')
        })
        .collect();
    escape(allowed.as_str()).into_owned()
}

/// Text runs for one paragraph; embedded newlines become line breaks.
fn runs(text: &str, bold: bool, italic: bool) -> String {
    let mut props = String::new();
    if bold {
        props.push_str("<w:b/>");
    }
    if italic {
        props.push_str("<w:i/>");
    }
    let run_props = if props.is_empty() {
        String::new()
    } else {
        format!("<w:rPr>{}</w:rPr>", props)
    };

    let lines: Vec<String> = text
        .lines()
        .map(|line| format!(r#"<w:t xml:space="preserve">{}</w:t>"#, xml_text(line)))
        .collect();
    format!("<w:r>{}{}</w:r>", run_props, lines.join("<w:br/>"))
}

fn paragraph(style: Option<&str>, body: &str) -> String {
    match style {
        Some(style) => {
            format!(r#"<w:p><w:pPr><w:pStyle w:val="{}"/></w:pPr>{}</w:p>"#, style, body)
        }
        None => format!("<w:p>{}</w:p>", body),
    }
}

fn heading_style(level: usize) -> String {
    match level {
        0 => "Title".to_string(),
        n => format!("Heading{}", n.min(MAX_HEADING_LEVEL)),
    }
}

fn block_xml(block: &RenderedBlock) -> String {
    match block {
        RenderedBlock::Heading { level, text } => {
            paragraph(Some(heading_style(*level).as_str()), &runs(text, false, false))
        }
        RenderedBlock::Paragraph { text, bold, italic, style } => {
            let style = match style {
                ParagraphStyle::Normal => None,
                ParagraphStyle::IntenseQuote => Some("IntenseQuote"),
            };
            paragraph(style, &runs(text, *bold, *italic))
        }
        RenderedBlock::PageBreak => r#"<w:p><w:r><w:br w:type="page"/></w:r></w:p>"#.to_string(),
    }
}

fn document_xml(blocks: &[RenderedBlock]) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>"#,
    );
    for block in blocks {
        xml.push_str(&block_xml(block));
    }
    xml.push_str(SECTION_PROPERTIES);
    xml.push_str("</w:body></w:document>");
    xml
}

fn styles_xml() -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/><w:qFormat/><w:pPr><w:spacing w:after="160"/></w:pPr><w:rPr><w:sz w:val="22"/></w:rPr></w:style><w:style w:type="paragraph" w:styleId="Title"><w:name w:val="Title"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:qFormat/><w:rPr><w:b/><w:sz w:val="56"/></w:rPr></w:style>"#,
    );
    for level in 1..=MAX_HEADING_LEVEL {
        // 16pt for Heading1 down to 11pt.
        let half_points = 32usize.saturating_sub(2 * (level - 1)).max(22);
        xml.push_str(&format!(
            r#"<w:style w:type="paragraph" w:styleId="Heading{level}"><w:name w:val="heading {level}"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:qFormat/><w:pPr><w:keepNext/><w:spacing w:before="240" w:after="80"/><w:outlineLvl w:val="{outline}"/></w:pPr><w:rPr><w:b/><w:color w:val="2F5496"/><w:sz w:val="{half_points}"/></w:rPr></w:style>"#,
            level = level,
            outline = level - 1,
            half_points = half_points,
        ));
    }
    xml.push_str(
        r#"<w:style w:type="paragraph" w:styleId="IntenseQuote"><w:name w:val="Intense Quote"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:qFormat/><w:pPr><w:pBdr><w:top w:val="single" w:sz="4" w:space="10" w:color="4472C4"/><w:bottom w:val="single" w:sz="4" w:space="10" w:color="4472C4"/></w:pBdr><w:ind w:left="864" w:right="864"/><w:jc w:val="center"/></w:pPr><w:rPr><w:i/><w:color w:val="4472C4"/></w:rPr></w:style></w:styles>"#,
    );
    xml
}

fn core_xml(title: &str) -> String {
    let created = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"><dc:title>{}</dc:title><dcterms:created xsi:type="dcterms:W3CDTF">{}</dcterms:created></cp:coreProperties>"#,
        xml_text(title),
        created
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::word::read_paragraphs;
    use std::io::{Cursor, Read};

    fn sample_report() -> Report {
        Report {
            title: "Review <Q3> & more".to_string(),
            blocks: vec![
                RenderedBlock::heading(0, "Review <Q3> & more"),
                RenderedBlock::heading(1, "ACME"),
                RenderedBlock::bold("Identified."),
                RenderedBlock::heading(12, "Deep"),
                RenderedBlock::italic("Line one\nLine \u{000c}two"),
                RenderedBlock::intense_quote("No matching content found."),
                RenderedBlock::PageBreak,
            ],
        }
    }

    fn package(report: &Report) -> Vec<u8> {
        write_docx_to(report, Cursor::new(Vec::new())).unwrap().into_inner()
    }

    fn part(bytes: &[u8], name: &str) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut xml = String::new();
        archive.by_name(name).unwrap().read_to_string(&mut xml).unwrap();
        xml
    }

    #[test]
    fn test_package_parts_are_well_formed() {
        let bytes = package(&sample_report());
        for name in [
            "[Content_Types].xml",
            "_rels/.rels",
            "word/_rels/document.xml.rels",
            "word/document.xml",
            "word/styles.xml",
            "docProps/core.xml",
        ] {
            let xml = part(&bytes, name);
            assert!(roxmltree::Document::parse(&xml).is_ok(), "{} is not well-formed XML", name);
        }
    }

    #[test]
    fn test_text_survives_round_trip() {
        let bytes = package(&sample_report());
        let text = read_paragraphs(&bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Review <Q3> & more",
                "ACME",
                "Identified.",
                "Deep",
                "Line one",
                "Line two",
                "No matching content found.",
                "",
            ]
        );
    }

    #[test]
    fn test_styles_and_run_properties() {
        let xml = part(&package(&sample_report()), "word/document.xml");
        assert!(xml.contains(r#"<w:pStyle w:val="Title"/>"#));
        assert!(xml.contains(r#"<w:pStyle w:val="Heading1"/>"#));
        assert!(xml.contains(r#"<w:pStyle w:val="Heading9"/>"#), "Levels past 9 clamp to Heading9");
        assert!(xml.contains(r#"<w:pStyle w:val="IntenseQuote"/>"#));
        assert!(xml.contains("<w:rPr><w:b/></w:rPr>"));
        assert!(xml.contains("<w:rPr><w:i/></w:rPr>"));
        assert!(xml.contains(r#"<w:br w:type="page"/>"#));

        let styles = part(&package(&sample_report()), "word/styles.xml");
        for id in ["Title", "Heading1", "Heading3", "Heading9", "IntenseQuote"] {
            assert!(styles.contains(&format!(r#"w:styleId="{}""#, id)), "missing style {}", id);
        }
    }

    #[test]
    fn test_write_docx_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.docx");
        write_docx(&sample_report(), &path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert!(part(&bytes, "docProps/core.xml").contains("Review &lt;Q3&gt; &amp; more"));
    }
}
