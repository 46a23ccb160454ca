use super::layout::{Block, Inline, ParagraphStyle, ReportLayout, Span};
use super::RenderError;
use docx_rs::{BreakType, Docx, Paragraph, Run};
use std::io::Cursor;

// Run sizes are in half-points.
const TITLE_SIZE: usize = 48;
const HEADING_SIZE: usize = 32;
const BODY_SIZE: usize = 22;
const NOTE_SIZE: usize = 20;
const MARKER_SIZE: usize = 24;

/// Renders the layout to a WordprocessingML package.
pub fn render(layout: &ReportLayout) -> Result<Vec<u8>, RenderError> {
    let mut document = Docx::new();

    for block in &layout.blocks {
        document = match block {
            Block::Title { text, .. } => document.add_paragraph(
                Paragraph::new().add_run(Run::new().add_text(text).bold().size(TITLE_SIZE)),
            ),
            Block::Heading { text, color, .. } => {
                let mut run = Run::new().add_text(text).bold().size(HEADING_SIZE);
                if let Some(color) = color {
                    run = run.color(color.hex());
                }
                document.add_paragraph(Paragraph::new().add_run(run))
            }
            Block::Paragraph { inlines, style } => {
                let size = match style {
                    ParagraphStyle::Body => BODY_SIZE,
                    ParagraphStyle::Note => NOTE_SIZE,
                };
                document.add_paragraph(paragraph(inlines, size))
            }
            Block::Rule => document.add_paragraph(Paragraph::new()),
            Block::PageBreak => document
                .add_paragraph(Paragraph::new().add_run(Run::new().add_break(BreakType::Page))),
        };
    }

    let mut buffer = Cursor::new(Vec::new());
    document
        .build()
        .pack(&mut buffer)
        .map_err(|err| RenderError::Docx(err.to_string()))?;
    Ok(buffer.into_inner())
}

fn paragraph(inlines: &[Inline], size: usize) -> Paragraph {
    inlines
        .iter()
        .fold(Paragraph::new(), |paragraph, inline| match inline {
            Inline::Text(span) => paragraph.add_run(text_run(span, size)),
            Inline::Marker { glyph, color } => paragraph.add_run(
                Run::new()
                    .add_text(glyph.symbol())
                    .bold()
                    .size(MARKER_SIZE)
                    .color(color.hex()),
            ),
        })
}

fn text_run(span: &Span, size: usize) -> Run {
    let mut run = Run::new().add_text(&span.text).size(size);
    if span.bold {
        run = run.bold();
    }
    if span.italic {
        run = run.italic();
    }
    run
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::analysis::domain::{Category, ClassifiedStatement};
    use crate::workflows::analysis::report::ReportConfig;
    use crate::workflows::analysis::scoring::{GradeScale, ScoreAggregator};
    use std::io::Read;

    fn document_xml(bytes: Vec<u8>) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("zip package");
        let mut xml = String::new();
        archive
            .by_name("word/document.xml")
            .expect("main document part")
            .read_to_string(&mut xml)
            .expect("utf-8 xml");
        xml
    }

    /// Run properties of the run whose text contains `needle`.
    fn run_properties<'a>(xml: &'a str, needle: &str) -> &'a str {
        let at = xml.find(needle).expect("text present");
        let start = xml[..at].rfind("<w:r>").expect("enclosing run");
        &xml[start..at]
    }

    fn has_flag(properties: &str, element: &str) -> bool {
        properties.contains(&format!("<{element}/>"))
            || properties.contains(&format!("<{element} "))
    }

    #[test]
    fn statements_are_bold_and_descriptions_italic() {
        let records = vec![
            ClassifiedStatement::new("Der Mond ist aus Käse.", Category::Falsch, "widerlegt", 5),
            ClassifiedStatement::new("Die Erde ist rund.", Category::Wahr, "belegt", 0),
        ];
        let summary = ScoreAggregator::default().summarize(&records);
        let config = ReportConfig::standard();
        let layout = ReportLayout::build(&summary, &records, &config, &GradeScale::standard());
        let xml = document_xml(render(&layout).expect("docx renders"));

        let statement = run_properties(&xml, "Der Mond ist aus Käse.");
        assert!(has_flag(statement, "w:b"));
        assert!(!has_flag(statement, "w:i"));

        let description = run_properties(&xml, "Objektiv widerlegte Behauptungen.");
        assert!(has_flag(description, "w:i"));
        assert!(!has_flag(description, "w:b"));

        let page_break = xml.find("w:type=\"page\"").expect("page break");
        let detail_title = xml.find(config.detail_title.as_str()).expect("detail title");
        let first_detail = xml.find("FALSCH (1)").expect("first detail heading");
        assert!(page_break < detail_title);
        assert!(detail_title < first_detail);
    }

    #[test]
    fn produces_a_zip_package() {
        let layout = ReportLayout {
            blocks: vec![
                Block::Title {
                    text: "Vollständige Auswertung".to_string(),
                    anchor: "auswertung".to_string(),
                },
                Block::Paragraph {
                    inlines: vec![Inline::Text(Span::italic("Beschreibung"))],
                    style: ParagraphStyle::Body,
                },
                Block::PageBreak,
                Block::Paragraph {
                    inlines: vec![Inline::Text(Span::plain("– Begründung"))],
                    style: ParagraphStyle::Note,
                },
            ],
        };
        let bytes = render(&layout).expect("docx renders");
        assert!(bytes.starts_with(b"PK"));
    }
}
