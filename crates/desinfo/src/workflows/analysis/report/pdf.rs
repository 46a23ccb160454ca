//! Paginated output: A4 pages, Helvetica, the overview on page one and the
//! detail section starting on a fresh page.

use super::super::domain::MarkerGlyph;
use super::config::Rgb;
use super::layout::{Block, Inline, ParagraphStyle, ReportLayout, Span};
use super::RenderError;
use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point, Polygon,
};

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN_TOP: f32 = 20.0;
const MARGIN_BOTTOM: f32 = 20.0;
const MARGIN_LEFT: f32 = 25.0;
const MARGIN_RIGHT: f32 = 25.0;
const PT_TO_MM: f32 = 0.352_778;

const BLACK: Rgb = Rgb::new(0, 0, 0);
const GREY: Rgb = Rgb::new(128, 128, 128);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Face {
    Regular,
    Bold,
    Italic,
    BoldItalic,
}

impl Face {
    fn of(span: &Span) -> Self {
        match (span.bold, span.italic) {
            (false, false) => Self::Regular,
            (true, false) => Self::Bold,
            (false, true) => Self::Italic,
            (true, true) => Self::BoldItalic,
        }
    }

    fn builtin(self) -> BuiltinFont {
        match self {
            Self::Regular => BuiltinFont::Helvetica,
            Self::Bold => BuiltinFont::HelveticaBold,
            Self::Italic => BuiltinFont::HelveticaOblique,
            Self::BoldItalic => BuiltinFont::HelveticaBoldOblique,
        }
    }

    fn is_bold(self) -> bool {
        matches!(self, Self::Bold | Self::BoldItalic)
    }
}

#[derive(Debug, Clone, Copy)]
struct TextStyle {
    size: f32,
    leading: f32,
    space_before: f32,
    space_after: f32,
}

const TITLE: TextStyle = TextStyle {
    size: 24.0,
    leading: 28.0,
    space_before: 0.0,
    space_after: 12.0,
};
const HEADING: TextStyle = TextStyle {
    size: 16.0,
    leading: 20.0,
    space_before: 15.0,
    space_after: 6.0,
};
const BODY: TextStyle = TextStyle {
    size: 11.0,
    leading: 15.0,
    space_before: 0.0,
    space_after: 3.0,
};
const NOTE: TextStyle = TextStyle {
    size: 10.0,
    leading: 13.0,
    space_before: 0.0,
    space_after: 8.0,
};
const RULE_SPACING: f32 = 10.0;

/// Something drawn at an absolute position on a page. Coordinates are
/// millimetres from the bottom-left corner; `y` is the text baseline.
#[derive(Debug, Clone, PartialEq)]
pub enum Placed {
    Text {
        x: f32,
        y: f32,
        text: String,
        face: Face,
        size: f32,
        color: Rgb,
    },
    Marker {
        x: f32,
        y: f32,
        side: f32,
        glyph: MarkerGlyph,
        color: Rgb,
    },
    Rule {
        y: f32,
        color: Rgb,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub items: Vec<Placed>,
}

struct Cursor {
    pages: Vec<Page>,
    y: f32,
}

impl Cursor {
    fn new() -> Self {
        Self {
            pages: vec![Page::default()],
            y: PAGE_HEIGHT - MARGIN_TOP,
        }
    }

    fn at_top(&self) -> bool {
        self.y >= PAGE_HEIGHT - MARGIN_TOP
    }

    fn new_page(&mut self) {
        self.pages.push(Page::default());
        self.y = PAGE_HEIGHT - MARGIN_TOP;
    }

    fn advance(&mut self, points: f32) {
        if !self.at_top() {
            self.y -= points * PT_TO_MM;
        }
    }

    /// Reserves one line of `leading` points, breaking the page if needed,
    /// and returns the baseline for text of `size` points.
    fn line(&mut self, size: f32, leading: f32) -> f32 {
        let height = leading * PT_TO_MM;
        if self.y - height < MARGIN_BOTTOM {
            self.new_page();
        }
        let baseline = self.y - size * PT_TO_MM;
        self.y -= height;
        baseline
    }

    fn push(&mut self, item: Placed) {
        if let Some(page) = self.pages.last_mut() {
            page.items.push(item);
        }
    }
}

enum Piece {
    Word { text: String, face: Face, color: Rgb },
    Marker { glyph: MarkerGlyph, color: Rgb },
}

/// Places every block of `layout` onto A4 pages.
pub fn paginate(layout: &ReportLayout) -> Vec<Page> {
    let mut cursor = Cursor::new();

    for block in &layout.blocks {
        match block {
            Block::Title { text, .. } => {
                let span = Span::bold(text.clone());
                place_paragraph(&mut cursor, &[Inline::Text(span)], TITLE, BLACK);
            }
            Block::Heading { text, color, .. } => {
                let span = Span::bold(text.clone());
                place_paragraph(
                    &mut cursor,
                    &[Inline::Text(span)],
                    HEADING,
                    color.unwrap_or(BLACK),
                );
            }
            Block::Paragraph { inlines, style } => {
                let style = match style {
                    ParagraphStyle::Body => BODY,
                    ParagraphStyle::Note => NOTE,
                };
                place_paragraph(&mut cursor, inlines, style, BLACK);
            }
            Block::Rule => {
                cursor.advance(RULE_SPACING / 2.0);
                if cursor.y - RULE_SPACING * PT_TO_MM < MARGIN_BOTTOM {
                    cursor.new_page();
                    continue;
                }
                let y = cursor.y;
                cursor.push(Placed::Rule { y, color: GREY });
                cursor.y -= RULE_SPACING * PT_TO_MM;
            }
            Block::PageBreak => cursor.new_page(),
        }
    }

    cursor.pages
}

fn place_paragraph(cursor: &mut Cursor, inlines: &[Inline], style: TextStyle, color: Rgb) {
    cursor.advance(style.space_before);

    let pieces = split_pieces(inlines, color);
    let max_width = PAGE_WIDTH - MARGIN_LEFT - MARGIN_RIGHT;

    let mut lines: Vec<Vec<(&Piece, f32)>> = vec![Vec::new()];
    let mut width = 0.0;
    for piece in &pieces {
        let piece_width = piece_width(piece, style.size);
        let starts_line = lines.last().map_or(true, Vec::is_empty);
        if !starts_line && width + piece_width > max_width {
            lines.push(Vec::new());
            width = 0.0;
        }
        if let Some(line) = lines.last_mut() {
            line.push((piece, width));
        }
        width += piece_width;
    }

    for line in lines {
        let baseline = cursor.line(style.size, style.leading);
        for (piece, offset) in line {
            let x = MARGIN_LEFT + offset;
            match piece {
                Piece::Word { text, face, color } => cursor.push(Placed::Text {
                    x,
                    y: baseline,
                    text: text.clone(),
                    face: *face,
                    size: style.size,
                    color: *color,
                }),
                Piece::Marker { glyph, color } => cursor.push(Placed::Marker {
                    x,
                    y: baseline,
                    side: style.size * 0.65 * PT_TO_MM,
                    glyph: *glyph,
                    color: *color,
                }),
            }
        }
    }

    cursor.y -= style.space_after * PT_TO_MM;
}

fn split_pieces(inlines: &[Inline], color: Rgb) -> Vec<Piece> {
    let mut pieces = Vec::new();
    for inline in inlines {
        match inline {
            Inline::Text(span) => {
                let face = Face::of(span);
                for word in span.text.split_inclusive(' ') {
                    pieces.push(Piece::Word {
                        text: encodable(word),
                        face,
                        color,
                    });
                }
            }
            Inline::Marker { glyph, color } => pieces.push(Piece::Marker {
                glyph: *glyph,
                color: *color,
            }),
        }
    }
    pieces
}

fn piece_width(piece: &Piece, size: f32) -> f32 {
    match piece {
        Piece::Word { text, face, .. } => text_width(text, *face, size),
        Piece::Marker { .. } => size * 0.8 * PT_TO_MM,
    }
}

/// Approximate Helvetica advance width in millimetres.
fn text_width(text: &str, face: Face, size: f32) -> f32 {
    let em: f32 = text
        .chars()
        .map(|c| match c {
            'i' | 'j' | 'l' | '.' | ',' | ';' | ':' | '\'' | '!' | '|' => 0.25,
            ' ' | 'f' | 't' | 'r' | 'I' | '(' | ')' | '-' => 0.33,
            'm' | 'w' | 'M' | 'W' => 0.85,
            'A'..='Z' | 'Ä' | 'Ö' | 'Ü' => 0.68,
            '0'..='9' => 0.56,
            _ => 0.53,
        })
        .sum();
    let weight = if face.is_bold() { 1.06 } else { 1.0 };
    em * weight * size * PT_TO_MM
}

/// Characters WinAnsiEncoding places in 0x80..=0x9F.
const WIN_ANSI_EXTRAS: &[char] = &[
    '€', '‚', 'ƒ', '„', '…', '†', '‡', 'ˆ', '‰', 'Š', '‹', 'Œ', 'Ž', '‘', '’', '“', '”', '•', '–',
    '—', '˜', '™', 'š', '›', 'œ', 'ž', 'Ÿ',
];

/// Replaces characters the built-in fonts' WinAnsiEncoding cannot carry.
fn encodable(text: &str) -> String {
    text.chars()
        .map(|c| match c as u32 {
            0x20..=0x7E | 0xA0..=0xFF => c,
            _ if WIN_ANSI_EXTRAS.contains(&c) => c,
            _ => '?',
        })
        .collect()
}

/// Renders the layout to PDF bytes.
pub fn render(layout: &ReportLayout, title: &str) -> Result<Vec<u8>, RenderError> {
    let pages = paginate(layout);

    let (document, first_page, first_layer) =
        PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Inhalt");

    let fonts = Fonts {
        regular: add_font(&document, Face::Regular)?,
        bold: add_font(&document, Face::Bold)?,
        italic: add_font(&document, Face::Italic)?,
        bold_italic: add_font(&document, Face::BoldItalic)?,
    };

    for (index, page) in pages.iter().enumerate() {
        let layer = if index == 0 {
            document.get_page(first_page).get_layer(first_layer)
        } else {
            let (page_index, layer_index) =
                document.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Inhalt");
            document.get_page(page_index).get_layer(layer_index)
        };
        draw_page(&layer, page, &fonts);
    }

    document
        .save_to_bytes()
        .map_err(|err| RenderError::Pdf(err.to_string()))
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    italic: IndirectFontRef,
    bold_italic: IndirectFontRef,
}

impl Fonts {
    fn get(&self, face: Face) -> &IndirectFontRef {
        match face {
            Face::Regular => &self.regular,
            Face::Bold => &self.bold,
            Face::Italic => &self.italic,
            Face::BoldItalic => &self.bold_italic,
        }
    }
}

fn add_font(
    document: &printpdf::PdfDocumentReference,
    face: Face,
) -> Result<IndirectFontRef, RenderError> {
    document
        .add_builtin_font(face.builtin())
        .map_err(|err| RenderError::Pdf(err.to_string()))
}

fn draw_page(layer: &PdfLayerReference, page: &Page, fonts: &Fonts) {
    for item in &page.items {
        match item {
            Placed::Text {
                x,
                y,
                text,
                face,
                size,
                color,
            } => {
                layer.set_fill_color(pdf_color(*color));
                layer.use_text(text.as_str(), *size, Mm(*x), Mm(*y), fonts.get(*face));
            }
            Placed::Marker {
                x,
                y,
                side,
                glyph,
                color,
            } => draw_marker(layer, *x, *y, *side, *glyph, *color),
            Placed::Rule { y, color } => {
                layer.set_outline_color(pdf_color(*color));
                layer.set_outline_thickness(0.8);
                layer.add_line(Line {
                    points: vec![
                        (Point::new(Mm(MARGIN_LEFT), Mm(*y)), false),
                        (Point::new(Mm(PAGE_WIDTH - MARGIN_RIGHT), Mm(*y)), false),
                    ],
                    is_closed: false,
                });
            }
        }
    }
}

fn draw_marker(layer: &PdfLayerReference, x: f32, y: f32, side: f32, glyph: MarkerGlyph, color: Rgb) {
    match glyph {
        MarkerGlyph::Square => {
            let corners = [(x, y), (x + side, y), (x + side, y + side), (x, y + side)];
            layer.set_fill_color(pdf_color(color));
            layer.add_polygon(Polygon {
                rings: vec![corners
                    .iter()
                    .map(|(px, py)| (Point::new(Mm(*px), Mm(*py)), false))
                    .collect()],
                mode: PaintMode::Fill,
                winding_order: WindingOrder::NonZero,
            });
        }
        MarkerGlyph::Check => {
            layer.set_outline_color(pdf_color(color));
            layer.set_outline_thickness(1.6);
            layer.add_line(Line {
                points: vec![
                    (Point::new(Mm(x), Mm(y + side * 0.5)), false),
                    (Point::new(Mm(x + side * 0.35), Mm(y + side * 0.1)), false),
                    (Point::new(Mm(x + side), Mm(y + side)), false),
                ],
                is_closed: false,
            });
        }
    }
}

fn pdf_color(color: Rgb) -> Color {
    let (r, g, b) = color.unit();
    Color::Rgb(printpdf::Rgb::new(r, g, b, None))
}
