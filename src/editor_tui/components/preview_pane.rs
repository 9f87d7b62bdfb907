//! Read-only preview pane fed by the pipeline's preview markup

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use tracing::warn;
use unicode_width::UnicodeWidthStr;

use crate::{
    markup::{preview_lines, LineKind},
    pipeline::PageState,
    editor_tui::{traits::Scrollable, ui::Styles},
};

#[derive(Debug, Default)]
pub struct PreviewPane {
    scroll_offset: usize,
    line_count: usize,
    page_size: usize,
}

impl PreviewPane {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines to draw for the current preview markup
    pub fn build_lines(state: &PageState) -> Vec<Line<'static>> {
        match preview_lines(&state.preview) {
            Ok(lines) => lines
                .into_iter()
                .map(|line| match line.kind {
                    LineKind::Heading => Line::from(Span::styled(line.text, Styles::title())),
                    LineKind::Body => Line::from(line.text),
                })
                .collect(),
            Err(e) => {
                warn!("Could not read preview markup: {}", e);
                vec![Line::from(Span::styled(format!("Preview unavailable: {}", e), Styles::error()))]
            }
        }
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect, state: &PageState) {
        let mut lines = Self::build_lines(state);
        if lines.is_empty() {
            lines.push(Line::from(Span::styled(
                format!("Nothing to preview for '{}'", state.active_template),
                Styles::inactive(),
            )));
        }

        let inner_width = area.width.saturating_sub(2) as usize;
        self.line_count = lines.iter().map(|line| wrapped_rows(line, inner_width)).sum();
        self.page_size = area.height.saturating_sub(2) as usize;
        self.scroll_offset = self.scroll_offset.min(self.calculate_max_scroll());

        let title = format!(
            "Preview - {} ({})",
            state.active_template.display_name(),
            state.active_template
        );
        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .title(title)
                    .borders(Borders::ALL)
                    .border_style(Styles::inactive_border()),
            )
            .wrap(Wrap { trim: true })
            .scroll((self.scroll_offset as u16, 0));

        f.render_widget(paragraph, area);
    }
}

/// Rows `line` takes once word-wrapped to `width` columns
fn wrapped_rows(line: &Line, width: usize) -> usize {
    if width == 0 {
        return 1;
    }

    let text: String = line.spans.iter().map(|span| span.content.as_ref()).collect();
    let mut rows = 1;
    let mut used = 0;
    for word in text.split_whitespace() {
        let word_width = word.width();
        let needed = if used == 0 { word_width } else { used + 1 + word_width };
        if needed <= width {
            used = needed;
            continue;
        }
        if used > 0 {
            rows += 1;
        }
        // Words longer than a row are broken across rows
        rows += word_width.saturating_sub(1) / width;
        used = match word_width % width {
            0 => width,
            rest => rest,
        };
    }
    rows
}

impl Scrollable for PreviewPane {
    fn get_scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    fn set_scroll_offset(&mut self, offset: usize) {
        self.scroll_offset = offset.min(self.calculate_max_scroll());
    }

    fn calculate_max_scroll(&self) -> usize {
        self.line_count.saturating_sub(self.page_size.max(1))
    }

    fn get_page_size(&self) -> usize {
        self.page_size.max(1)
    }
}
