//! Markup helpers shared by the preview templates and the suggestion lists

use scraper::{Html, Selector};

use crate::errors::{ResumeError, Result};

/// Escape text for interpolation into preview or suggestion markup
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Kind of a line extracted from preview markup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    Heading,
    Body,
}

/// One displayable line of a rendered preview
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewLine {
    pub kind: LineKind,
    pub text: String,
}

/// Flatten preview markup into terminal lines.
///
/// Headings and paragraphs become one line each, in document order, with inner
/// whitespace collapsed. Empty markup yields no lines.
pub fn preview_lines(markup: &str) -> Result<Vec<PreviewLine>> {
    if markup.trim().is_empty() {
        return Ok(Vec::new());
    }

    let fragment = Html::parse_fragment(markup);
    let block_selector = Selector::parse("h1, h2, h3, h4, p, li")
        .map_err(|e| ResumeError::Markup(e.to_string()))?;

    let mut lines = Vec::new();
    for element in fragment.select(&block_selector) {
        let text = element
            .text()
            .flat_map(str::split_whitespace)
            .collect::<Vec<_>>()
            .join(" ");
        if text.is_empty() {
            continue;
        }
        let kind = match element.value().name() {
            "h1" | "h2" | "h3" | "h4" => LineKind::Heading,
            _ => LineKind::Body,
        };
        lines.push(PreviewLine { kind, text });
    }

    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a < b && c > \"d\""), "a &lt; b &amp;&amp; c &gt; &quot;d&quot;");
        assert_eq!(escape_html("O'Neil"), "O&#39;Neil");
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_preview_lines() {
        let markup = "<div><h3>Preview</h3><p><strong>full_name:</strong>  Ada\n Lovelace</p><p></p></div>";
        let lines = preview_lines(markup).unwrap();
        assert_eq!(
            lines,
            vec![
                PreviewLine { kind: LineKind::Heading, text: "Preview".to_string() },
                PreviewLine { kind: LineKind::Body, text: "full_name: Ada Lovelace".to_string() },
            ]
        );
    }

    #[test]
    fn test_preview_lines_unescape_entities() {
        let lines = preview_lines("<p>R&amp;D &lt;team&gt;</p>").unwrap();
        assert_eq!(lines[0].text, "R&D <team>");
    }

    #[test]
    fn test_empty_markup_has_no_lines() {
        assert!(preview_lines("").unwrap().is_empty());
        assert!(preview_lines("   \n").unwrap().is_empty());
    }
}
