//! Core traits shared by the editor components

/// Trait for form handling
pub trait FormHandler {
    /// Get current field index
    fn get_current_field(&self) -> usize;

    /// Set current field
    fn set_current_field(&mut self, field: usize);

    /// Get total number of fields
    fn get_field_count(&self) -> usize;

    /// Move to next field
    fn next_field(&mut self) {
        let total = self.get_field_count();
        if total == 0 {
            return;
        }
        let current = self.get_current_field();
        self.set_current_field((current + 1) % total);
    }

    /// Move to previous field
    fn previous_field(&mut self) {
        let total = self.get_field_count();
        if total == 0 {
            return;
        }
        let current = self.get_current_field();
        self.set_current_field(if current == 0 { total - 1 } else { current - 1 });
    }

    /// Handle character input for current field
    fn handle_char_input(&mut self, c: char);

    /// Handle backspace for current field
    fn handle_backspace(&mut self);

    /// Handle delete for current field
    fn handle_delete(&mut self);
}

/// Trait for components with scrollable content
pub trait Scrollable {
    /// Get current scroll offset
    fn get_scroll_offset(&self) -> usize;

    /// Set scroll offset with bounds checking
    fn set_scroll_offset(&mut self, offset: usize);

    /// Calculate maximum scroll offset
    fn calculate_max_scroll(&self) -> usize;

    /// Get page size for scrolling
    fn get_page_size(&self) -> usize {
        10
    }

    fn scroll_up(&mut self, amount: usize) {
        let current = self.get_scroll_offset();
        self.set_scroll_offset(current.saturating_sub(amount));
    }

    fn scroll_down(&mut self, amount: usize) {
        let current = self.get_scroll_offset();
        self.set_scroll_offset(current.saturating_add(amount));
    }

    /// Scroll to top
    fn scroll_to_top(&mut self) {
        self.set_scroll_offset(0);
    }

    /// Page up (scroll up by page size)
    fn page_up(&mut self) {
        self.scroll_up(self.get_page_size());
    }

    /// Page down (scroll down by page size)
    fn page_down(&mut self) {
        self.scroll_down(self.get_page_size());
    }
}
