//! Main TUI application state and logic

use anyhow::Result;
use chrono::{DateTime, Local};
use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame, Terminal,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::components::{
    form_field::suggestion_click_target, Form, FormField, PreviewPane, TemplateSelector,
};
use super::traits::{FormHandler, Scrollable};
use super::ui::{below, centered_rect};
use crate::config::Config;
use crate::models::{TemplateVariant, RESUME_FIELDS};
use crate::pipeline::{FormPreviewPipeline, PageState, SnapshotSource};
use crate::storage::SlotStore;
use crate::suggest::ClickTarget;

const FIELD_HEIGHT: u16 = 3;

/// Page controller: owns the form, the preview state and the pipeline
pub struct App {
    pub config: Config,
    pub state: PageState,
    pub pipeline: FormPreviewPipeline,
    pub form: Form,
    pub template_selector: TemplateSelector,
    pub preview_pane: PreviewPane,
    /// False when the editor fell back to a session-only store
    pub persistence_enabled: bool,

    pub should_quit: bool,
    pub show_help_popup: bool,
    pub status_message: Option<String>,
    pub error_message: Option<String>,
    pub last_saved: Option<DateTime<Local>>,

    /// First field drawn in the form column
    form_offset: usize,
    /// Where the focused field's suggestion list was last drawn
    suggestion_area: Option<Rect>,
}

impl App {
    pub fn new(config: Config, store: Arc<dyn SlotStore>, persistence_enabled: bool) -> Self {
        let state = PageState::new(config.default_template.clone());
        Self {
            config,
            state,
            pipeline: FormPreviewPipeline::new(store),
            form: Form::from_specs(RESUME_FIELDS),
            template_selector: TemplateSelector::new(),
            preview_pane: PreviewPane::new(),
            persistence_enabled,

            should_quit: false,
            show_help_popup: false,
            status_message: None,
            error_message: None,
            last_saved: None,

            form_offset: 0,
            suggestion_area: None,
        }
    }

    /// Run the main application loop
    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        self.restore_saved().await;

        loop {
            terminal.draw(|f| self.draw(f))?;

            match crossterm::event::read()? {
                Event::Key(key) => self.handle_key_event(key).await?,
                Event::Mouse(mouse) => self.handle_mouse_event(mouse).await?,
                _ => {}
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Load the autosaved snapshot into the form and render the first preview
    pub async fn restore_saved(&mut self) {
        match self.pipeline.restore().await {
            Ok(Some(snapshot)) => {
                let filled = self.form.populate(&snapshot);
                self.set_status(format!("Restored {} fields from autosave", filled));
            }
            Ok(None) => {
                debug!("No autosaved resume found");
            }
            Err(e) => {
                warn!("Ignoring unreadable autosave: {}", e);
                self.set_error(format!("Could not restore autosave: {}", e));
            }
        }

        self.state.last_snapshot = self.form.snapshot();
        let active = self.state.active_template.clone();
        self.pipeline.on_template_change(&mut self.state, active);
    }

    /// Handle keyboard input events
    pub async fn handle_key_event(&mut self, key: KeyEvent) -> Result<()> {
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        // Global shortcuts
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('c') if ctrl => {
                self.should_quit = true;
                return Ok(());
            }
            KeyCode::F(1) => {
                self.show_help_popup = !self.show_help_popup;
                return Ok(());
            }
            _ => {}
        }

        if self.show_help_popup {
            if key.code == KeyCode::Esc {
                self.show_help_popup = false;
            }
            return Ok(());
        }

        if self.template_selector.is_open {
            self.handle_selector_event(key);
            return Ok(());
        }

        match key.code {
            KeyCode::F(2) => {
                self.template_selector.open(&self.state.active_template);
            }
            KeyCode::Char('t') if ctrl => {
                let next = self.template_selector.cycle_from(&self.state.active_template);
                self.change_template(next);
            }
            KeyCode::Char('s') if ctrl => {
                self.save_now().await;
            }
            KeyCode::Tab => {
                self.form.next_field();
                self.announce_focus();
            }
            KeyCode::BackTab => {
                self.form.previous_field();
                self.announce_focus();
            }
            KeyCode::Down => {
                if self.current_has_suggestions() {
                    if let Some(field) = self.form.get_current_field_mut() {
                        field.suggestion_down();
                    }
                } else {
                    self.form.next_field();
                    self.announce_focus();
                }
            }
            KeyCode::Up => {
                if self.current_has_suggestions() {
                    if let Some(field) = self.form.get_current_field_mut() {
                        field.suggestion_up();
                    }
                } else {
                    self.form.previous_field();
                    self.announce_focus();
                }
            }
            KeyCode::Enter => {
                let committed = self
                    .form
                    .get_current_field_mut()
                    .is_some_and(|field| field.commit_selected_suggestion());
                if committed {
                    self.on_form_input().await;
                } else {
                    self.form.next_field();
                    self.announce_focus();
                }
            }
            KeyCode::Esc => {
                if self.current_has_suggestions() {
                    if let Some(field) = self.form.get_current_field_mut() {
                        field.hide_suggestions();
                    }
                } else {
                    self.clear_messages();
                }
            }
            KeyCode::PageUp => self.preview_pane.page_up(),
            KeyCode::PageDown => self.preview_pane.page_down(),
            KeyCode::Char(c) if !ctrl => {
                self.apply_edit(|form| form.handle_char_input(c)).await;
            }
            KeyCode::Backspace => {
                self.apply_edit(|form| form.handle_backspace()).await;
            }
            KeyCode::Delete => {
                self.apply_edit(|form| form.handle_delete()).await;
            }
            KeyCode::Left => self.with_current_field(|field| field.move_cursor_left()),
            KeyCode::Right => self.with_current_field(|field| field.move_cursor_right()),
            KeyCode::Home => self.with_current_field(|field| field.move_cursor_to_start()),
            KeyCode::End => self.with_current_field(|field| field.move_cursor_to_end()),
            _ => {}
        }

        Ok(())
    }

    /// Handle mouse clicks on the visible suggestion list
    pub async fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<()> {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return Ok(());
        }
        // Nothing under a popup is clickable
        if self.show_help_popup || self.template_selector.is_open {
            return Ok(());
        }
        let Some(area) = self.suggestion_area else {
            return Ok(());
        };
        let Some(field) = self.form.get_current_field_mut() else {
            return Ok(());
        };

        let offset = field.suggestion_state.offset();
        let visible = field.suggestion_count().saturating_sub(offset);
        let committed = match suggestion_click_target(area, visible, mouse.column, mouse.row) {
            Some(ClickTarget::Entry(i)) => field.click_suggestion(ClickTarget::Entry(i + offset)),
            Some(target) => field.click_suggestion(target),
            None => false,
        };

        if committed {
            self.on_form_input().await;
        }
        Ok(())
    }

    fn handle_selector_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up => self.template_selector.previous(),
            KeyCode::Down => self.template_selector.next(),
            KeyCode::Enter => {
                if let Some(variant) = self.template_selector.selected().cloned() {
                    self.change_template(variant);
                }
                self.template_selector.close();
            }
            KeyCode::Esc | KeyCode::F(2) => self.template_selector.close(),
            _ => {}
        }
    }

    fn current_has_suggestions(&self) -> bool {
        self.form
            .get_current_field()
            .is_some_and(|field| field.has_suggestions())
    }

    fn with_current_field(&mut self, f: impl FnOnce(&mut FormField)) {
        if let Some(field) = self.form.get_current_field_mut() {
            f(field);
        }
    }

    /// Apply an edit to the focused field and run the pipeline if its value changed
    async fn apply_edit(&mut self, edit: impl FnOnce(&mut Form)) {
        let before = self.form.get_current_field().map(|field| field.value.clone());
        edit(&mut self.form);
        let after = self.form.get_current_field().map(|field| field.value.as_str());
        if before.as_deref() != after {
            self.on_form_input().await;
        }
    }

    /// Capture, preview and autosave the whole form
    async fn on_form_input(&mut self) {
        let outcome = self.pipeline.on_form_input(&mut self.state, &self.form).await;
        match outcome.persist_error {
            Some(e) => self.set_error(format!("Autosave failed: {}", e)),
            None => {
                self.last_saved = Some(Local::now());
                self.error_message = None;
            }
        }
    }

    async fn save_now(&mut self) {
        self.on_form_input().await;
        if self.error_message.is_none() {
            info!("Resume saved on request");
            self.set_status("Resume saved".to_string());
        }
    }

    fn change_template(&mut self, variant: TemplateVariant) {
        self.pipeline.on_template_change(&mut self.state, variant);
        self.preview_pane.scroll_to_top();
        self.set_status(format!(
            "Template: {} ({})",
            self.state.active_template.display_name(),
            self.state.active_template
        ));
    }

    fn announce_focus(&mut self) {
        if let Some(field) = self.form.get_current_field() {
            let message = format!(
                "Field {}/{}: {}",
                self.form.current_field + 1,
                self.form.get_field_count(),
                field.label
            );
            self.set_status(message);
        }
    }

    /// Draw the UI
    pub fn draw(&mut self, f: &mut Frame) {
        let size = f.size();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(chunks[0]);

        self.draw_form(f, body[0]);
        self.preview_pane.render(f, body[1], &self.state);
        self.draw_status_bar(f, chunks[1]);

        if self.template_selector.is_open {
            let height = self.template_selector.options.len() as u16 + 2;
            let popup = centered_rect(40, 50, size);
            let popup = Rect::new(popup.x, popup.y, popup.width, height.min(popup.height));
            self.template_selector.render(f, popup);
        }

        if self.show_help_popup {
            self.draw_help_popup(f, size);
        }
    }

    fn draw_form(&mut self, f: &mut Frame, area: Rect) {
        let visible = ((area.height / FIELD_HEIGHT) as usize).max(1);
        let current = self.form.current_field;
        if current < self.form_offset {
            self.form_offset = current;
        } else if current >= self.form_offset + visible {
            self.form_offset = current + 1 - visible;
        }

        let mut focused_rect = None;
        for (row, index) in (self.form_offset..self.form.fields.len()).take(visible).enumerate() {
            let rect = Rect::new(area.x, area.y + row as u16 * FIELD_HEIGHT, area.width, FIELD_HEIGHT)
                .intersection(area);
            self.form.fields[index].render(f, rect);
            if index == current {
                focused_rect = Some(rect);
            }
        }

        self.suggestion_area = None;
        let limit = self.config.suggestion_limit;
        if let (Some(anchor), Some(field)) = (focused_rect, self.form.get_current_field_mut()) {
            if field.has_suggestions() {
                let rows = field.suggestion_count().min(limit) as u16 + 2;
                let list_area = below(anchor, rows, area);
                if list_area.height >= 3 {
                    field.render_suggestions(f, list_area);
                    self.suggestion_area = Some(list_area);
                }
            }
        }
    }

    /// Draw status bar with save state and shortcuts
    fn draw_status_bar(&self, f: &mut Frame, area: Rect) {
        let status_text = if let Some(ref msg) = self.status_message {
            format!("Status: {}", msg)
        } else if let Some(ref err) = self.error_message {
            format!("Error: {}", err)
        } else {
            let saved = match (self.persistence_enabled, self.last_saved) {
                (false, _) => "Autosave off (session only)".to_string(),
                (true, Some(at)) => format!("Saved {}", at.format("%H:%M:%S")),
                (true, None) => "Not saved yet".to_string(),
            };
            format!("Resume Builder - {} | F2: Template | Ctrl+Q: Quit | F1: Help", saved)
        };

        let style = if self.error_message.is_some() {
            Style::default().fg(Color::Red)
        } else if self.status_message.is_some() {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::Gray)
        };

        let status_bar = Paragraph::new(status_text)
            .style(style)
            .block(Block::default().borders(Borders::ALL));

        f.render_widget(status_bar, area);
    }

    fn draw_help_popup(&self, f: &mut Frame, area: Rect) {
        let popup_area = centered_rect(70, 70, area);

        f.render_widget(Clear, popup_area);

        let help_popup = Paragraph::new(HELP_TEXT)
            .block(
                Block::default()
                    .title("Help - Shortcuts")
                    .borders(Borders::ALL)
                    .style(Style::default().fg(Color::Yellow)),
            )
            .style(Style::default().fg(Color::White));

        f.render_widget(help_popup, popup_area);
    }

    /// Set status message
    pub fn set_status(&mut self, message: String) {
        self.status_message = Some(message);
        self.error_message = None;
    }

    /// Set error message
    pub fn set_error(&mut self, message: String) {
        self.error_message = Some(message);
        self.status_message = None;
    }

    /// Clear status and error messages
    pub fn clear_messages(&mut self) {
        self.status_message = None;
        self.error_message = None;
    }
}

const HELP_TEXT: &str = "Editing:\n\
    Tab / Shift+Tab - Next / previous field\n\
    Type, Backspace, Delete - Edit the focused field\n\
    Left/Right/Home/End - Move the cursor\n\n\
    Suggestions:\n\
    Up/Down - Highlight a suggestion\n\
    Enter or click - Use the highlighted suggestion\n\
    Esc - Hide suggestions\n\n\
    Preview:\n\
    F2 - Choose template\n\
    Ctrl+T - Next template\n\
    PageUp/PageDown - Scroll preview\n\n\
    Ctrl+S - Save now\n\
    F1 - Toggle this help\n\
    Ctrl+Q - Quit";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FormSnapshot;
    use crate::storage::MemoryStore;
    use ratatui::backend::TestBackend;

    fn app_with_store(store: Arc<MemoryStore>) -> App {
        let config = Config {
            default_template: TemplateVariant::Template3,
            ..Config::default()
        };
        App::new(config, store, true)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    async fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key_event(key(KeyCode::Char(c))).await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_typing_updates_preview_and_autosave() {
        let store = Arc::new(MemoryStore::new());
        let mut app = app_with_store(store.clone());
        app.restore_saved().await;

        type_text(&mut app, "Ada").await;
        assert!(app.state.preview.contains("Full Name: Ada"));

        let saved = store.read("resumeData").await.unwrap().unwrap();
        let snapshot = FormSnapshot::from_json(&saved).unwrap();
        assert_eq!(snapshot.get("full_name"), Some("Ada"));
        assert_eq!(snapshot.len(), RESUME_FIELDS.len());
        assert!(app.last_saved.is_some());
    }

    #[tokio::test]
    async fn test_restore_repopulates_form() {
        let store = Arc::new(MemoryStore::new());
        store
            .write("resumeData", r#"{"full_name":"Grace","education":"Yale","retired_field":"x"}"#)
            .await
            .unwrap();

        let mut app = app_with_store(store);
        app.restore_saved().await;

        assert_eq!(app.form.get_field("full_name").unwrap().value, "Grace");
        assert!(app.state.preview.contains("Education: Yale"));
        assert_eq!(app.status_message.as_deref(), Some("Restored 2 fields from autosave"));
    }

    #[tokio::test]
    async fn test_corrupt_autosave_is_ignored() {
        let store = Arc::new(MemoryStore::new());
        store.write("resumeData", "not json").await.unwrap();

        let mut app = app_with_store(store);
        app.restore_saved().await;

        assert!(app.error_message.is_some());
        assert!(app.state.preview.contains("Full Name: "));
    }

    #[tokio::test]
    async fn test_suggestion_commit_with_enter() {
        let store = Arc::new(MemoryStore::new());
        let mut app = app_with_store(store.clone());
        app.restore_saved().await;

        let school = app
            .form
            .fields
            .iter()
            .position(|field| field.name == "education_school")
            .unwrap();
        app.form.set_current_field(school);

        type_text(&mut app, "harv").await;
        assert!(app.current_has_suggestions());

        app.handle_key_event(key(KeyCode::Down)).await.unwrap();
        app.handle_key_event(key(KeyCode::Enter)).await.unwrap();
        let field = app.form.get_current_field().unwrap();
        assert_eq!(field.value, "Harvard University");
        assert!(!field.has_suggestions());

        let saved = FormSnapshot::from_json(&store.read("resumeData").await.unwrap().unwrap()).unwrap();
        assert_eq!(saved.get("education_school"), Some("Harvard University"));
    }

    #[tokio::test]
    async fn test_enter_without_highlight_keeps_typed_text() {
        let store = Arc::new(MemoryStore::new());
        let mut app = app_with_store(store.clone());
        app.restore_saved().await;

        let school = app
            .form
            .fields
            .iter()
            .position(|field| field.name == "education_school")
            .unwrap();
        app.form.set_current_field(school);

        type_text(&mut app, "Harvard").await;
        assert!(app.current_has_suggestions());
        app.handle_key_event(key(KeyCode::Enter)).await.unwrap();

        assert_eq!(app.form.current_field, school + 1);
        assert_eq!(app.form.get_field("education_school").unwrap().value, "Harvard");
        let saved = FormSnapshot::from_json(&store.read("resumeData").await.unwrap().unwrap()).unwrap();
        assert_eq!(saved.get("education_school"), Some("Harvard"));
    }

    #[tokio::test]
    async fn test_template_cycle_keeps_snapshot() {
        let mut app = app_with_store(Arc::new(MemoryStore::new()));
        app.restore_saved().await;
        type_text(&mut app, "Ada").await;
        let snapshot = app.state.last_snapshot.clone();

        app.handle_key_event(KeyEvent::new(KeyCode::Char('t'), KeyModifiers::CONTROL))
            .await
            .unwrap();
        assert_eq!(app.state.active_template, TemplateVariant::Template1);
        assert_eq!(app.state.last_snapshot, snapshot);
        assert!(app.state.preview.contains("Ada"));
        assert_eq!(app.form.get_field("full_name").unwrap().value, "Ada");
    }

    #[tokio::test]
    async fn test_template_selector_popup() {
        let mut app = app_with_store(Arc::new(MemoryStore::new()));
        app.restore_saved().await;

        app.handle_key_event(key(KeyCode::F(2))).await.unwrap();
        assert!(app.template_selector.is_open);
        app.handle_key_event(key(KeyCode::Up)).await.unwrap();
        app.handle_key_event(key(KeyCode::Enter)).await.unwrap();

        assert!(!app.template_selector.is_open);
        assert_eq!(app.state.active_template, TemplateVariant::Template2);
        assert!(app.state.preview.contains("class=\"template2\""));
    }

    #[tokio::test]
    async fn test_noop_backspace_does_not_save() {
        let store = Arc::new(MemoryStore::new());
        let mut app = app_with_store(store.clone());
        app.restore_saved().await;

        app.handle_key_event(key(KeyCode::Backspace)).await.unwrap();
        assert_eq!(store.read("resumeData").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_mouse_click_commits_suggestion() {
        let mut app = app_with_store(Arc::new(MemoryStore::new()));
        app.restore_saved().await;
        let degree = app
            .form
            .fields
            .iter()
            .position(|field| field.name == "education_degree")
            .unwrap();
        app.form.set_current_field(degree);
        type_text(&mut app, "of").await;

        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal.draw(|f| app.draw(f)).unwrap();
        let area = app.suggestion_area.expect("suggestions drawn");

        let click = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: area.x + 2,
            row: area.y + 2,
            modifiers: KeyModifiers::NONE,
        };
        app.handle_mouse_event(click).await.unwrap();

        assert_eq!(app.form.get_current_field().unwrap().value, "Master of Arts");
        assert!(app.state.last_snapshot.get("education_degree") == Some("Master of Arts"));
    }

    #[tokio::test]
    async fn test_mouse_click_ignored_under_popups() {
        let store = Arc::new(MemoryStore::new());
        let mut app = app_with_store(store.clone());
        app.restore_saved().await;
        let degree = app
            .form
            .fields
            .iter()
            .position(|field| field.name == "education_degree")
            .unwrap();
        app.form.set_current_field(degree);
        type_text(&mut app, "of").await;
        let saved_before = store.read("resumeData").await.unwrap();

        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        let click = |area: Rect| MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: area.x + 2,
            row: area.y + 2,
            modifiers: KeyModifiers::NONE,
        };

        app.handle_key_event(key(KeyCode::F(1))).await.unwrap();
        terminal.draw(|f| app.draw(f)).unwrap();
        let area = app.suggestion_area.expect("suggestions drawn under the help popup");
        app.handle_mouse_event(click(area)).await.unwrap();
        assert_eq!(app.form.get_current_field().unwrap().value, "of");

        app.handle_key_event(key(KeyCode::Esc)).await.unwrap();
        app.handle_key_event(key(KeyCode::F(2))).await.unwrap();
        terminal.draw(|f| app.draw(f)).unwrap();
        let area = app.suggestion_area.expect("suggestions drawn under the selector");
        app.handle_mouse_event(click(area)).await.unwrap();

        let field = app.form.get_current_field().unwrap();
        assert_eq!(field.value, "of");
        assert!(field.has_suggestions());
        assert_eq!(store.read("resumeData").await.unwrap(), saved_before);
    }

    #[tokio::test]
    async fn test_ctrl_q_quits() {
        let mut app = app_with_store(Arc::new(MemoryStore::new()));
        app.handle_key_event(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL))
            .await
            .unwrap();
        assert!(app.should_quit);
    }
}
