//! Target-neutral report structure.
//!
//! Every output format walks the same [`ReportLayout`], so section order,
//! wording, and numbers cannot drift between PDF, DOCX, and HTML.

use super::super::domain::{Category, ClassifiedStatement, MarkerGlyph};
use super::super::scoring::{GradeScale, Summary};
use super::config::{ReportConfig, Rgb};

#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
}

impl Span {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
            italic: false,
        }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            bold: true,
            ..Self::plain(text)
        }
    }

    pub fn italic(text: impl Into<String>) -> Self {
        Self {
            italic: true,
            ..Self::plain(text)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Inline {
    Text(Span),
    Marker { glyph: MarkerGlyph, color: Rgb },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParagraphStyle {
    Body,
    /// Smaller type for justifications.
    Note,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Title { text: String, anchor: String },
    Heading {
        text: String,
        anchor: String,
        color: Option<Rgb>,
    },
    Paragraph {
        inlines: Vec<Inline>,
        style: ParagraphStyle,
    },
    Rule,
    PageBreak,
}

impl Block {
    fn paragraph(inlines: Vec<Inline>) -> Self {
        Self::Paragraph {
            inlines,
            style: ParagraphStyle::Body,
        }
    }

    fn text(span: Span) -> Self {
        Self::paragraph(vec![Inline::Text(span)])
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportLayout {
    pub blocks: Vec<Block>,
}

impl ReportLayout {
    /// Lays out the overview page, a page break, then the per-category detail.
    /// Callers must have checked `summary` against `statements` beforehand.
    pub fn build(
        summary: &Summary,
        statements: &[ClassifiedStatement],
        config: &ReportConfig,
        grades: &GradeScale,
    ) -> Self {
        let mut blocks = Vec::new();

        blocks.push(Block::Title {
            text: config.title.clone(),
            anchor: "auswertung".to_string(),
        });
        blocks.push(Block::Rule);

        blocks.push(heading("Zusammenfassung", "zusammenfassung", None));
        blocks.push(Block::text(Span::plain(summary_sentence(summary))));

        blocks.push(heading("Quantifizierung", "quantifizierung", None));
        blocks.push(Block::text(Span::plain(format!(
            "Anzahl Aussagen gesamt: {}",
            summary.total
        ))));
        for category in Category::ordered() {
            blocks.push(Block::paragraph(vec![
                Inline::Marker {
                    glyph: MarkerGlyph::Square,
                    color: config.color(category),
                },
                Inline::Text(Span::plain(format!(
                    " {}: {} ({} %)",
                    category,
                    summary.count(category),
                    summary.percentage(category)
                ))),
            ]));
        }
        if summary.unrecognized > 0 {
            blocks.push(Block::paragraph(vec![
                Inline::Marker {
                    glyph: MarkerGlyph::Square,
                    color: config.neutral,
                },
                Inline::Text(Span::plain(format!(
                    " Nicht zuordenbare Aussagen: {}",
                    summary.unrecognized
                ))),
            ]));
        }
        blocks.push(Block::Rule);

        blocks.push(heading("Scoring", "scoring", None));
        blocks.push(Block::text(Span::bold(format!(
            "Desinfo-Score: {}",
            summary.score_display()
        ))));
        blocks.push(Block::text(Span::plain(format!(
            "{}: {}",
            summary.grade, summary.grade_label
        ))));
        blocks.push(Block::text(Span::plain(summary.grade_description.clone())));
        blocks.push(Block::Rule);

        blocks.push(heading("Einteilung", "einteilung", None));
        for band in grades.bands() {
            blocks.push(Block::text(Span::plain(format!(
                "{}: {:.1} bis {:.1}: {}",
                band.grade, band.min, band.max, band.label
            ))));
        }

        blocks.push(Block::PageBreak);

        blocks.push(Block::Title {
            text: config.detail_title.clone(),
            anchor: "details".to_string(),
        });
        blocks.push(Block::Rule);

        for (category, members) in category_groups(statements) {
            let color = config.color(category);
            blocks.push(heading(
                &format!("{} ({})", category, members.len()),
                &category.label().to_lowercase(),
                Some(color),
            ));
            blocks.push(Block::text(Span::italic(config.description(category))));

            for (index, statement) in members.iter().enumerate() {
                blocks.push(Block::paragraph(vec![
                    Inline::Text(Span::plain(format!("{}. ", index + 1))),
                    Inline::Marker {
                        glyph: category.marker(),
                        color,
                    },
                    Inline::Text(Span::bold(format!(" \"{}\"", statement.text))),
                ]));
                blocks.push(Block::Paragraph {
                    inlines: vec![Inline::Text(Span::plain(format!(
                        "– {}",
                        statement.justification
                    )))],
                    style: ParagraphStyle::Note,
                });
            }
        }

        Self { blocks }
    }

    /// Anchors and labels of every title and heading, in order.
    pub fn outline(&self) -> Vec<(&str, &str)> {
        self.blocks
            .iter()
            .filter_map(|block| match block {
                Block::Title { text, anchor } | Block::Heading { text, anchor, .. } => {
                    Some((anchor.as_str(), text.as_str()))
                }
                _ => None,
            })
            .collect()
    }
}

fn heading(text: &str, anchor: &str, color: Option<Rgb>) -> Block {
    Block::Heading {
        text: text.to_string(),
        anchor: anchor.to_string(),
        color,
    }
}

/// Members of each known category in fixed category order; empty
/// categories are left out.
pub(super) fn category_groups(
    statements: &[ClassifiedStatement],
) -> Vec<(Category, Vec<&ClassifiedStatement>)> {
    Category::ordered()
        .into_iter()
        .filter_map(|category| {
            let members: Vec<&ClassifiedStatement> = statements
                .iter()
                .filter(|statement| statement.category.known() == Some(category))
                .collect();
            (!members.is_empty()).then_some((category, members))
        })
        .collect()
}

pub(super) fn summary_sentence(summary: &Summary) -> String {
    format!(
        "Die vorliegende Analyse untersucht {} Aussagen nach ihrer faktischen Richtigkeit und kommunikativen Qualität. Das Ergebnis zeigt eine ausgeprägte Tendenz zu {}en Darstellungen.",
        summary.total, summary.grade_label
    )
}

/// Concatenated text of a paragraph, with marker glyphs inlined.
pub fn plain_text(inlines: &[Inline]) -> String {
    inlines
        .iter()
        .map(|inline| match inline {
            Inline::Text(span) => span.text.as_str(),
            Inline::Marker { glyph, .. } => glyph.symbol(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::analysis::domain::CategoryLabel;
    use crate::workflows::analysis::scoring::ScoreAggregator;

    fn layout_for(categories: &[&str]) -> ReportLayout {
        let statements: Vec<ClassifiedStatement> = categories
            .iter()
            .enumerate()
            .map(|(index, category)| {
                ClassifiedStatement::new(
                    format!("Aussage {index}"),
                    CategoryLabel::parse(category),
                    format!("Grund {index}"),
                    0,
                )
            })
            .collect();
        let summary = ScoreAggregator::default().summarize(&statements);
        ReportLayout::build(
            &summary,
            &statements,
            &ReportConfig::standard(),
            &GradeScale::standard(),
        )
    }

    fn paragraphs(layout: &ReportLayout) -> Vec<String> {
        layout
            .blocks
            .iter()
            .filter_map(|block| match block {
                Block::Paragraph { inlines, .. } => Some(plain_text(inlines)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn overview_sections_come_in_fixed_order() {
        let layout = layout_for(&["FALSCH", "WAHR"]);
        let outline: Vec<&str> = layout.outline().into_iter().map(|(_, text)| text).collect();
        assert_eq!(
            outline,
            vec![
                "Vollständige Auswertung",
                "Zusammenfassung",
                "Quantifizierung",
                "Scoring",
                "Einteilung",
                "Vollständige Auswertung des Textes",
                "FALSCH (1)",
                "WAHR (1)",
            ]
        );

        let breaks = layout
            .blocks
            .iter()
            .position(|block| matches!(block, Block::PageBreak))
            .expect("page break");
        let detail = layout
            .blocks
            .iter()
            .position(|block| matches!(block, Block::Title { anchor, .. } if anchor == "details"))
            .expect("detail title");
        assert!(breaks < detail);
    }

    #[test]
    fn detail_markers_distinguish_true_statements() {
        let layout = layout_for(&["WAHR", "FALSCH"]);
        let lines = paragraphs(&layout);
        let falsch = lines
            .iter()
            .position(|line| line == "1. ■ \"Aussage 1\"")
            .expect("FALSCH item");
        let wahr = lines
            .iter()
            .position(|line| line == "1. ✓ \"Aussage 0\"")
            .expect("WAHR item");
        assert!(falsch < wahr);
        assert!(lines.contains(&"– Grund 0".to_string()));
    }

    #[test]
    fn quantification_lists_every_category_even_when_empty() {
        let lines = paragraphs(&layout_for(&["FRAME", "FRAME", "WAHR"]));
        assert!(lines.contains(&"Anzahl Aussagen gesamt: 3".to_string()));
        assert!(lines.contains(&"■ FALSCH: 0 (0 %)".to_string()));
        assert!(lines.contains(&"■ FRAME: 2 (67 %)".to_string()));
        assert!(lines.contains(&"■ WAHR: 1 (33 %)".to_string()));
        assert!(lines.contains(&"A: 0.0 bis 0.4: wahr".to_string()));
        assert!(lines.contains(&"Desinfo-Score: 0.7".to_string()));
        assert!(!lines.iter().any(|line| line.starts_with("■ Nicht zuordenbare")));
    }

    #[test]
    fn empty_categories_are_skipped_in_detail() {
        let layout = layout_for(&["VERZERRUNG"]);
        let headings: Vec<&str> = layout
            .outline()
            .into_iter()
            .skip(6)
            .map(|(_, text)| text)
            .collect();
        assert_eq!(headings, vec!["VERZERRUNG (1)"]);
    }

    #[test]
    fn unrecognized_records_are_reported_but_not_detailed() {
        let layout = layout_for(&["SATIRE", "FALSCH"]);
        let lines = paragraphs(&layout);
        assert!(lines.contains(&"■ Nicht zuordenbare Aussagen: 1".to_string()));
        assert!(!lines.iter().any(|line| line.contains("Aussage 0\"")));
    }
}
