use super::layout::{Block, Inline, ParagraphStyle, ReportLayout, Span};
use super::RenderError;
use std::fmt::Write as _;

const STYLE: &str = "body{font-family:Helvetica,Arial,sans-serif;max-width:48rem;margin:2rem auto;line-height:1.4}\
nav ul{list-style:none;padding:0;display:flex;flex-wrap:wrap;gap:1rem}\
hr.rule{border:0;border-top:1px solid #808080}\
hr.page-break{border:0;border-top:2px dashed #c0c0c0;margin:3rem 0;page-break-after:always}\
p.note{font-size:0.9rem;color:#444}\
.marker{font-weight:bold}";

/// Renders the layout as a self-contained HTML page with a section index.
pub fn render(layout: &ReportLayout, title: &str) -> Result<String, RenderError> {
    let mut html = String::new();
    writeln!(html, "<!DOCTYPE html>")?;
    writeln!(html, "<html lang=\"de\">")?;
    writeln!(
        html,
        "<head><meta charset=\"utf-8\"><title>{}</title><style>{}</style></head>",
        escape_html(title),
        STYLE
    )?;
    writeln!(html, "<body>")?;

    html.push_str("<nav><ul>");
    for (anchor, text) in layout.outline() {
        write!(
            html,
            "<li><a href=\"#{}\">{}</a></li>",
            escape_html(anchor),
            escape_html(text)
        )?;
    }
    writeln!(html, "</ul></nav>")?;

    for block in &layout.blocks {
        match block {
            Block::Title { text, anchor } => writeln!(
                html,
                "<h1 id=\"{}\">{}</h1>",
                escape_html(anchor),
                escape_html(text)
            )?,
            Block::Heading {
                text,
                anchor,
                color,
            } => match color {
                Some(color) => writeln!(
                    html,
                    "<h2 id=\"{}\" style=\"color:{}\">{}</h2>",
                    escape_html(anchor),
                    color.css(),
                    escape_html(text)
                )?,
                None => writeln!(
                    html,
                    "<h2 id=\"{}\">{}</h2>",
                    escape_html(anchor),
                    escape_html(text)
                )?,
            },
            Block::Paragraph { inlines, style } => {
                match style {
                    ParagraphStyle::Body => html.push_str("<p>"),
                    ParagraphStyle::Note => html.push_str("<p class=\"note\">"),
                }
                for inline in inlines {
                    write_inline(&mut html, inline)?;
                }
                writeln!(html, "</p>")?;
            }
            Block::Rule => writeln!(html, "<hr class=\"rule\">")?,
            Block::PageBreak => writeln!(html, "<hr class=\"page-break\">")?,
        }
    }

    writeln!(html, "</body>")?;
    writeln!(html, "</html>")?;
    Ok(html)
}

fn write_inline(html: &mut String, inline: &Inline) -> std::fmt::Result {
    match inline {
        Inline::Marker { glyph, color } => write!(
            html,
            "<span class=\"marker\" style=\"color:{}\">{}</span>",
            color.css(),
            glyph.symbol()
        ),
        Inline::Text(Span { text, bold, italic }) => {
            let text = escape_html(text);
            match (bold, italic) {
                (true, true) => write!(html, "<strong><em>{text}</em></strong>"),
                (true, false) => write!(html, "<strong>{text}</strong>"),
                (false, true) => write!(html, "<em>{text}</em>"),
                (false, false) => html.write_str(&text),
            }
        }
    }
}

pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
