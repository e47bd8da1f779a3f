use crate::app::AppState;
use crate::ui::constants::{
    ACCOUNT_BULLET, COLLAPSED, EXPANDED, HANDLE, INDENT_WIDTH, LEAF, MENU_GLYPH, MENU_WIDTH,
};
use crate::ui::text;
use crate::view::{Row, RowKind};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tracing::debug;
use unicode_width::UnicodeWidthStr;

/// Moves the viewport so the cursor is visible.
///
/// A pending scroll target wins over the cursor: the cursor jumps to it and
/// the target is cleared. A target without a visible row (its ancestors were
/// collapsed again, or it is gone) is cleared without moving the cursor.
pub fn scroll_into_view(app: &mut AppState, height: usize) {
    if let Some(target) = app.expansion.target_node_id().cloned() {
        if !app.select_grouping(&target) {
            debug!(%target, "scroll target not visible, dropping it");
        }
        app.expansion.clear_target_node_id_after_scroll(&target);
    }
    app.clamp_cursor();

    if height == 0 {
        return;
    }
    if app.cursor < app.viewport_top {
        app.viewport_top = app.cursor;
    } else if app.cursor >= app.viewport_top + height {
        app.viewport_top = app.cursor + 1 - height;
    }
    let max_top = app.rows().len().saturating_sub(height);
    app.viewport_top = app.viewport_top.min(max_top);
}

pub struct TreeRenderer;

impl TreeRenderer {
    pub fn render(frame: &mut Frame, app: &mut AppState, area: Rect) {
        let title = match &app.drag {
            Some(_) => " GL Definitions (moving) ",
            None => " GL Definitions ",
        };
        let block = Block::default().borders(Borders::ALL).title(title);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        app.tree_area = crate::app::TreeArea {
            x: inner.x,
            y: inner.y,
            width: inner.width,
            height: inner.height,
        };
        scroll_into_view(app, inner.height as usize);

        let app = &*app;
        let rows = app.rows();
        if rows.is_empty() {
            let hint = Paragraph::new("No groupings yet. Press o to add one.")
                .style(Style::default().fg(Color::DarkGray));
            frame.render_widget(hint, inner);
            return;
        }

        let lines: Vec<Line> = rows
            .iter()
            .enumerate()
            .skip(app.viewport_top)
            .take(inner.height as usize)
            .map(|(index, row)| Self::render_row(app, row, index, inner.width as usize))
            .collect();
        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn render_row(app: &AppState, row: &Row, index: usize, width: usize) -> Line<'static> {
        let indent = " ".repeat(row.depth * INDENT_WIDTH);
        let mut prefix = indent;
        let mut label = row.label.clone();

        match &row.kind {
            RowKind::Grouping(_) => {
                prefix.push_str(HANDLE);
                prefix.push_str(match (row.expandable, row.expanded) {
                    (false, _) => LEAF,
                    (true, false) => COLLAPSED,
                    (true, true) => EXPANDED,
                });
                if app.config.show_summary && !row.summary.is_empty() {
                    label = format!("{} ({})", label, row.summary);
                }
            }
            RowKind::Account { .. } => {
                prefix.push_str(LEAF);
                prefix.push_str(ACCOUNT_BULLET);
                if let Some(icon) = &row.icon {
                    label = format!("{} {}", icon, label);
                }
            }
        }

        let body_width = width
            .saturating_sub(UnicodeWidthStr::width(prefix.as_str()))
            .saturating_sub(MENU_WIDTH);
        let body = text::fit(&label, body_width);

        let style = Self::row_style(app, row, index);
        Line::from(vec![
            Span::styled(prefix, style),
            Span::styled(body, style),
            Span::styled(MENU_GLYPH, style.fg(Color::DarkGray)),
        ])
    }

    fn row_style(app: &AppState, row: &Row, index: usize) -> Style {
        let mut style = match row.kind {
            RowKind::Grouping(_) => Style::default(),
            RowKind::Account { .. } => Style::default().fg(Color::Gray),
        };

        if let (Some(drag), Some(id)) = (&app.drag, row.grouping_id()) {
            if drag.source() == id {
                style = style.fg(Color::Yellow).add_modifier(Modifier::BOLD);
            } else if drag.accepts(&app.tree, id) {
                style = style.fg(Color::Cyan).add_modifier(Modifier::UNDERLINED);
            }
        }

        if index == app.cursor {
            style = style.add_modifier(Modifier::REVERSED);
        }
        style
    }
}
