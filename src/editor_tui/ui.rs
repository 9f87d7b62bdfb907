//! Common UI styles and layout helpers for the resume editor

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
};

/// Common UI styles
pub struct Styles;

impl Styles {
    pub fn default() -> Style {
        Style::default()
    }

    pub fn selected() -> Style {
        Style::default()
            .bg(Color::Blue)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    }

    pub fn title() -> Style {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    }

    /// Matched part of a suggestion entry
    pub fn emphasis() -> Style {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    }

    pub fn error() -> Style {
        Style::default().fg(Color::Red)
    }

    pub fn inactive() -> Style {
        Style::default().fg(Color::Gray)
    }

    pub fn active_border() -> Style {
        Style::default().fg(Color::Yellow)
    }

    pub fn inactive_border() -> Style {
        Style::default().fg(Color::Gray)
    }
}

/// Helper function to create a centered rect using up certain percentage of the available rect
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Rect of `height` rows directly below `anchor`, clipped to `bounds`
pub fn below(anchor: Rect, height: u16, bounds: Rect) -> Rect {
    let y = anchor.y.saturating_add(anchor.height);
    let bottom = bounds.y.saturating_add(bounds.height);
    let height = height.min(bottom.saturating_sub(y));
    Rect::new(anchor.x, y, anchor.width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_below_clips_to_bounds() {
        let bounds = Rect::new(0, 0, 40, 20);
        let anchor = Rect::new(2, 14, 30, 3);
        assert_eq!(below(anchor, 10, bounds), Rect::new(2, 17, 30, 3));
        assert_eq!(below(anchor, 2, bounds), Rect::new(2, 17, 30, 2));
    }
}
