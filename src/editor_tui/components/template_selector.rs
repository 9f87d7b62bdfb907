//! Single-choice template selector shown as a popup list

use ratatui::{
    layout::Rect,
    widgets::{Block, Borders, Clear, List, ListItem, ListState},
    Frame,
};

use crate::{models::TemplateVariant, editor_tui::ui::Styles};

pub struct TemplateSelector {
    pub options: Vec<TemplateVariant>,
    pub state: ListState,
    pub is_open: bool,
}

impl TemplateSelector {
    pub fn new() -> Self {
        Self {
            options: TemplateVariant::defined().to_vec(),
            state: ListState::default(),
            is_open: false,
        }
    }

    /// Open with the active variant highlighted
    pub fn open(&mut self, active: &TemplateVariant) {
        let index = self.options.iter().position(|v| v == active).unwrap_or(0);
        self.state.select(Some(index));
        self.is_open = true;
    }

    pub fn close(&mut self) {
        self.is_open = false;
    }

    pub fn next(&mut self) {
        if self.options.is_empty() {
            return;
        }
        let i = self.state.selected().map_or(0, |i| (i + 1) % self.options.len());
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        if self.options.is_empty() {
            return;
        }
        let i = match self.state.selected() {
            Some(0) | None => self.options.len() - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    pub fn selected(&self) -> Option<&TemplateVariant> {
        self.state.selected().and_then(|i| self.options.get(i))
    }

    /// Variant after `active` in selector order, wrapping around
    pub fn cycle_from(&self, active: &TemplateVariant) -> TemplateVariant {
        let next = self
            .options
            .iter()
            .position(|v| v == active)
            .map_or(0, |i| (i + 1) % self.options.len());
        self.options
            .get(next)
            .cloned()
            .unwrap_or_else(|| active.clone())
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect) {
        if !self.is_open {
            return;
        }

        let items: Vec<ListItem> = self
            .options
            .iter()
            .map(|variant| ListItem::new(format!("{:<10} {}", variant.as_str(), variant.display_name())))
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .title("Template")
                    .borders(Borders::ALL)
                    .border_style(Styles::active_border()),
            )
            .highlight_style(Styles::selected());

        f.render_widget(Clear, area);
        f.render_stateful_widget(list, area, &mut self.state);
    }
}

impl Default for TemplateSelector {
    fn default() -> Self {
        Self::new()
    }
}
