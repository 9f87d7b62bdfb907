//! Form field component for user input

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::{
    models::{FieldSpec, FormSnapshot},
    pipeline::SnapshotSource,
    editor_tui::{traits::FormHandler, ui::Styles},
    suggest::{BoundInput, ClickTarget, TypeaheadSuggester},
};

/// Individual named form field, optionally bound to a suggestion list
#[derive(Debug, Clone)]
pub struct FormField {
    pub name: String,
    pub label: String,
    pub value: String,
    pub placeholder: String,
    pub is_focused: bool,
    /// Cursor position in characters, not bytes
    pub cursor_position: usize,
    pub suggester: Option<TypeaheadSuggester>,
    pub suggestion_state: ListState,
}

impl FormField {
    pub fn new(name: &str, label: &str) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            value: String::new(),
            placeholder: String::new(),
            is_focused: false,
            cursor_position: 0,
            suggester: None,
            suggestion_state: ListState::default(),
        }
    }

    pub fn from_spec(spec: &FieldSpec) -> Self {
        let field = Self::new(spec.name, spec.label).with_placeholder(spec.placeholder);
        if spec.candidates.is_empty() {
            field
        } else {
            field.with_suggestions(TypeaheadSuggester::new(spec.candidates.iter().copied()))
        }
    }

    pub fn with_placeholder(mut self, placeholder: &str) -> Self {
        self.placeholder = placeholder.to_string();
        self
    }

    pub fn with_suggestions(mut self, suggester: TypeaheadSuggester) -> Self {
        self.suggester = Some(suggester);
        self
    }

    pub fn set_focus(&mut self, focused: bool) {
        self.is_focused = focused;
    }

    fn char_count(&self) -> usize {
        self.value.chars().count()
    }

    fn byte_index(&self) -> usize {
        self.value
            .char_indices()
            .nth(self.cursor_position)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }

    pub fn insert_char(&mut self, c: char) {
        let idx = self.byte_index();
        self.value.insert(idx, c);
        self.cursor_position += 1;
        self.refresh_suggestions();
    }

    pub fn delete_char(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
            let idx = self.byte_index();
            self.value.remove(idx);
            self.refresh_suggestions();
        }
    }

    pub fn delete_char_forward(&mut self) {
        if self.cursor_position < self.char_count() {
            let idx = self.byte_index();
            self.value.remove(idx);
            self.refresh_suggestions();
        }
    }

    pub fn move_cursor_left(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
        }
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor_position < self.char_count() {
            self.cursor_position += 1;
        }
    }

    pub fn move_cursor_to_start(&mut self) {
        self.cursor_position = 0;
    }

    pub fn move_cursor_to_end(&mut self) {
        self.cursor_position = self.char_count();
    }

    /// Re-run the suggester against the current value.
    ///
    /// Nothing is highlighted until the user moves into the list.
    pub fn refresh_suggestions(&mut self) {
        if let Some(suggester) = self.suggester.as_mut() {
            suggester.on_input(&self.value);
            self.suggestion_state = ListState::default();
        }
    }

    pub fn has_suggestions(&self) -> bool {
        self.suggester.as_ref().is_some_and(|s| !s.is_empty())
    }

    pub fn suggestion_count(&self) -> usize {
        self.suggester.as_ref().map_or(0, |s| s.entries().len())
    }

    pub fn hide_suggestions(&mut self) {
        if let Some(suggester) = self.suggester.as_mut() {
            suggester.clear();
        }
        self.suggestion_state.select(None);
    }

    pub fn suggestion_down(&mut self) {
        let count = self.suggestion_count();
        if count == 0 {
            return;
        }
        let selected = self.suggestion_state.selected().map_or(0, |i| (i + 1) % count);
        self.suggestion_state.select(Some(selected));
    }

    pub fn suggestion_up(&mut self) {
        let count = self.suggestion_count();
        if count == 0 {
            return;
        }
        let selected = match self.suggestion_state.selected() {
            Some(0) | None => count - 1,
            Some(i) => i - 1,
        };
        self.suggestion_state.select(Some(selected));
    }

    /// Deliver a click to the suggestion list; returns whether a value was committed
    pub fn click_suggestion(&mut self, target: ClickTarget) -> bool {
        let Some(suggester) = self.suggester.as_mut() else {
            return false;
        };
        let committed = suggester.on_suggestion_click(target, &mut self.value);
        if committed {
            self.cursor_position = self.value.chars().count();
            self.suggestion_state.select(None);
        }
        committed
    }

    /// Commit the highlighted suggestion, as if it had been clicked
    pub fn commit_selected_suggestion(&mut self) -> bool {
        match self.suggestion_state.selected() {
            Some(index) => self.click_suggestion(ClickTarget::Entry(index)),
            None => false,
        }
    }

    /// Render the form field
    pub fn render(&self, f: &mut Frame, area: Rect) {
        let show_placeholder = self.value.is_empty() && !self.placeholder.is_empty();
        let display_text = if show_placeholder { &self.placeholder } else { &self.value };

        let border_style = if self.is_focused {
            Styles::active_border()
        } else {
            Styles::inactive_border()
        };

        let block = Block::default()
            .title(self.label.as_str())
            .borders(Borders::ALL)
            .border_style(border_style);

        let text_style = if show_placeholder { Styles::inactive() } else { Styles::default() };

        let paragraph = Paragraph::new(display_text.as_str())
            .style(text_style)
            .block(block);

        f.render_widget(paragraph, area);

        if self.is_focused {
            let before_cursor: String = self.value.chars().take(self.cursor_position).collect();
            let cursor_x = area.x + 1 + before_cursor.width() as u16;
            let cursor_y = area.y + 1;
            if cursor_x < area.x + area.width.saturating_sub(1) {
                f.set_cursor(cursor_x, cursor_y);
            }
        }
    }

    /// Render the suggestion list into `area`, if there is one to show
    pub fn render_suggestions(&mut self, f: &mut Frame, area: Rect) {
        let Some(suggester) = self.suggester.as_ref() else {
            return;
        };
        if suggester.is_empty() || area.height < 3 {
            return;
        }

        let items: Vec<ListItem> = suggester
            .entries()
            .iter()
            .map(|entry| {
                ListItem::new(Line::from(vec![
                    Span::raw(entry.before().to_string()),
                    Span::styled(entry.highlighted().to_string(), Styles::emphasis()),
                    Span::raw(entry.after().to_string()),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .title("Suggestions")
                    .borders(Borders::ALL)
                    .border_style(Styles::active_border()),
            )
            .highlight_style(Styles::selected());

        f.render_widget(Clear, area);
        f.render_stateful_widget(list, area, &mut self.suggestion_state);
    }
}

impl BoundInput for FormField {
    fn set_value(&mut self, value: &str) {
        self.value = value.to_string();
        self.cursor_position = self.value.chars().count();
    }
}

/// Map a mouse position to a suggestion list drawn in `area` with a border.
///
/// Returns `None` outside the list, `Background` on the border or empty rows.
pub fn suggestion_click_target(area: Rect, entry_count: usize, column: u16, row: u16) -> Option<ClickTarget> {
    let inside = column >= area.x
        && column < area.x + area.width
        && row >= area.y
        && row < area.y + area.height;
    if !inside {
        return None;
    }

    let on_border = column == area.x
        || column + 1 == area.x + area.width
        || row == area.y
        || row + 1 == area.y + area.height;
    if on_border {
        return Some(ClickTarget::Background);
    }

    let index = (row - area.y - 1) as usize;
    if index < entry_count {
        Some(ClickTarget::Entry(index))
    } else {
        Some(ClickTarget::Background)
    }
}

/// Form container that manages multiple fields
pub struct Form {
    pub fields: Vec<FormField>,
    pub current_field: usize,
}

impl Form {
    pub fn new(fields: Vec<FormField>) -> Self {
        let mut form = Self {
            fields,
            current_field: 0,
        };
        form.update_focus();
        form
    }

    pub fn from_specs(specs: &[FieldSpec]) -> Self {
        Self::new(specs.iter().map(FormField::from_spec).collect())
    }

    fn update_focus(&mut self) {
        for (i, field) in self.fields.iter_mut().enumerate() {
            field.set_focus(i == self.current_field);
        }
    }

    pub fn get_field(&self, name: &str) -> Option<&FormField> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn get_field_mut(&mut self, name: &str) -> Option<&mut FormField> {
        self.fields.iter_mut().find(|field| field.name == name)
    }

    pub fn get_current_field(&self) -> Option<&FormField> {
        self.fields.get(self.current_field)
    }

    pub fn get_current_field_mut(&mut self) -> Option<&mut FormField> {
        self.fields.get_mut(self.current_field)
    }

    /// Fill fields from a restored snapshot. Unknown names are ignored and
    /// fields absent from the snapshot are left untouched.
    pub fn populate(&mut self, snapshot: &FormSnapshot) -> usize {
        let mut filled = 0;
        for (name, value) in snapshot.iter() {
            if let Some(field) = self.get_field_mut(name) {
                field.set_value(value);
                filled += 1;
            }
        }
        filled
    }
}

impl SnapshotSource for Form {
    fn snapshot(&self) -> FormSnapshot {
        self.fields
            .iter()
            .map(|field| (field.name.as_str(), field.value.as_str()))
            .collect()
    }
}

impl FormHandler for Form {
    fn get_current_field(&self) -> usize {
        self.current_field
    }

    fn set_current_field(&mut self, field: usize) {
        if field < self.fields.len() {
            self.current_field = field;
            self.update_focus();
        }
    }

    fn get_field_count(&self) -> usize {
        self.fields.len()
    }

    fn handle_char_input(&mut self, c: char) {
        if let Some(field) = self.get_current_field_mut() {
            field.insert_char(c);
        }
    }

    fn handle_backspace(&mut self) {
        if let Some(field) = self.get_current_field_mut() {
            field.delete_char();
        }
    }

    fn handle_delete(&mut self) {
        if let Some(field) = self.get_current_field_mut() {
            field.delete_char_forward();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RESUME_FIELDS;

    fn school() -> FormField {
        FormField::new("education_school", "School").with_suggestions(TypeaheadSuggester::new([
            "Harvard University",
            "Stanford University",
        ]))
    }

    #[test]
    fn test_editing_multibyte_text() {
        let mut field = FormField::new("full_name", "Full Name");
        field.set_value("Zoë");
        field.move_cursor_left();
        field.delete_char();
        field.insert_char('e');
        assert_eq!(field.value, "Zeë");
        field.move_cursor_to_end();
        field.delete_char();
        assert_eq!(field.value, "Ze");
        field.move_cursor_to_start();
        field.delete_char_forward();
        assert_eq!(field.value, "e");
    }

    #[test]
    fn test_typing_refreshes_suggestions() {
        let mut field = school();
        for c in "univ".chars() {
            field.insert_char(c);
        }
        assert_eq!(field.suggestion_count(), 2);
        assert_eq!(field.suggestion_state.selected(), None);

        field.suggestion_down();
        field.insert_char('e');
        assert_eq!(field.suggestion_count(), 2);
        assert_eq!(field.suggestion_state.selected(), None);

        for c in "rsity h".chars() {
            field.insert_char(c);
        }
        assert!(!field.has_suggestions());
    }

    #[test]
    fn test_commit_selected_suggestion() {
        let mut field = school();
        for c in "stan".chars() {
            field.insert_char(c);
        }
        assert!(!field.commit_selected_suggestion());
        assert_eq!(field.value, "stan");

        field.suggestion_down();
        assert!(field.commit_selected_suggestion());
        assert_eq!(field.value, "Stanford University");
        assert_eq!(field.cursor_position, "Stanford University".len());
        assert!(!field.has_suggestions());
        assert!(!field.commit_selected_suggestion());
    }

    #[test]
    fn test_suggestion_navigation_wraps() {
        let mut field = school();
        for c in "uni".chars() {
            field.insert_char(c);
        }
        field.suggestion_up();
        assert_eq!(field.suggestion_state.selected(), Some(1));
        field.suggestion_down();
        assert_eq!(field.suggestion_state.selected(), Some(0));
    }

    #[test]
    fn test_field_without_suggester() {
        let mut field = FormField::new("email", "Email");
        field.insert_char('a');
        assert!(!field.has_suggestions());
        assert!(!field.click_suggestion(ClickTarget::Entry(0)));
    }

    #[test]
    fn test_suggestion_click_target() {
        let area = Rect::new(10, 5, 20, 5);
        assert_eq!(suggestion_click_target(area, 2, 0, 0), None);
        assert_eq!(suggestion_click_target(area, 2, 10, 6), Some(ClickTarget::Background));
        assert_eq!(suggestion_click_target(area, 2, 15, 6), Some(ClickTarget::Entry(0)));
        assert_eq!(suggestion_click_target(area, 2, 15, 7), Some(ClickTarget::Entry(1)));
        assert_eq!(suggestion_click_target(area, 2, 15, 8), Some(ClickTarget::Background));
        assert_eq!(suggestion_click_target(area, 2, 15, 9), Some(ClickTarget::Background));
    }

    #[test]
    fn test_form_snapshot_follows_document_order() {
        let mut form = Form::from_specs(RESUME_FIELDS);
        form.handle_char_input('A');
        form.next_field();
        form.handle_char_input('b');

        let snapshot = form.snapshot();
        assert_eq!(snapshot.len(), RESUME_FIELDS.len());
        let names: Vec<_> = snapshot.iter().map(|(k, _)| k).collect();
        let expected: Vec<_> = RESUME_FIELDS.iter().map(|s| s.name).collect();
        assert_eq!(names, expected);
        assert_eq!(snapshot.get("full_name"), Some("A"));
        assert_eq!(snapshot.get("email"), Some("b"));
        assert_eq!(snapshot.get("phone"), Some(""));
    }

    #[test]
    fn test_populate_from_snapshot() {
        let mut form = Form::from_specs(RESUME_FIELDS);
        let saved: FormSnapshot = [("full_name", "Ada"), ("unknown_field", "x"), ("skill2", "Python")]
            .into_iter()
            .collect();

        assert_eq!(form.populate(&saved), 2);
        assert_eq!(form.get_field("full_name").unwrap().value, "Ada");
        assert_eq!(form.get_field("skill2").unwrap().cursor_position, 6);
        assert!(form.get_field("unknown_field").is_none());
        assert_eq!(form.get_field("email").unwrap().value, "");
    }
}
