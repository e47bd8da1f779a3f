use crate::app::{AppMode, AppState};
use crate::ui::constants::{CURSOR_INDICATOR, STATUS_SEARCH_PREFIX};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::Paragraph,
    Frame,
};

// Status line renderer
pub struct StatusLineRenderer;

impl StatusLineRenderer {
    pub fn render(frame: &mut Frame, app: &AppState, area: Rect) {
        let (content, style) = Self::get_content_and_style(app);
        frame.render_widget(Paragraph::new(content).style(style), area);
    }

    pub fn get_content_and_style(app: &AppState) -> (String, Style) {
        match &app.mode {
            AppMode::Normal => Self::render_normal_mode(app),
            AppMode::Search { query } => (
                format!("{}{}{}", STATUS_SEARCH_PREFIX, query, CURSOR_INDICATOR),
                Self::prompt_style(),
            ),
            AppMode::Menu { .. } => ("↑/↓ choose · Enter run · Esc close".to_string(), Self::prompt_style()),
            AppMode::Form(_) => ("Editing grouping".to_string(), Self::prompt_style()),
            AppMode::Confirm(_) => ("y confirm · n cancel".to_string(), Self::prompt_style()),
            AppMode::AccountPicker { .. } => {
                ("↑/↓ choose · Enter attach · Esc cancel".to_string(), Self::prompt_style())
            }
            AppMode::Help => ("Press ESC or q to close help".to_string(), Self::prompt_style()),
        }
    }

    fn render_normal_mode(app: &AppState) -> (String, Style) {
        if let Some(ref msg) = app.message {
            let style = Style::default()
                .fg(Color::Black)
                .bg(Color::Magenta)
                .add_modifier(Modifier::BOLD);
            return (msg.clone(), style);
        }

        let mut content = format!("gldef | {} groupings", app.tree.len());
        if !app.outbox.is_empty() {
            content.push_str(&format!(" | {} pending", app.outbox.len()));
        }
        if app.drag.is_some() {
            content.push_str(" | Enter drop · Esc cancel");
        } else {
            content.push_str(" | ? help");
        }
        (content, Style::default().fg(Color::Gray).bg(Color::Black))
    }

    fn prompt_style() -> Style {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    }
}
