use crate::app::{AppState, ConfirmTarget, FormField, FormKind, FormState};
use crate::model::{AccountRef, GroupingId};
use crate::ui::constants::CURSOR_INDICATOR;
use crate::view::MenuEntry;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

/// Rectangle of `width` x `height` cells centred in `area`, clipped to it.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((area.height - height) / 2),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length((area.width - width) / 2),
            Constraint::Length(width),
            Constraint::Min(0),
        ])
        .split(vertical[1])[1]
}

fn selected_style() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

pub struct PopupRenderer;

impl PopupRenderer {
    pub fn render_menu(
        frame: &mut Frame,
        title: &str,
        entries: &[MenuEntry],
        selected: usize,
        area: Rect,
    ) {
        let popup = centered_rect(30, entries.len() as u16 + 2, area);
        let items: Vec<ListItem> = entries
            .iter()
            .map(|entry| {
                let style = if entry.enabled {
                    Style::default()
                } else {
                    Style::default().fg(Color::DarkGray)
                };
                ListItem::new(entry.action.label()).style(style)
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(format!(" {} ", title)))
            .highlight_style(selected_style());
        let mut state = ListState::default().with_selected(Some(selected));

        frame.render_widget(Clear, popup);
        frame.render_stateful_widget(list, popup, &mut state);
    }

    pub fn render_form(frame: &mut Frame, app: &AppState, form: &FormState, area: Rect) {
        let title = match form.kind {
            FormKind::Create => match form.target.as_ref().and_then(|id| app.tree.get(id)) {
                Some(parent) => format!(" New grouping under {} ", parent.name),
                None => " New root grouping ".to_string(),
            },
            FormKind::Edit => " Edit grouping ".to_string(),
            FormKind::View => " View grouping ".to_string(),
        };
        let popup = centered_rect(60, 9, area);

        let field_line = |label: &str, value: String, field: FormField| {
            let focused = form.field == field && !form.is_read_only();
            let mut text = value;
            if focused && field != FormField::GeneralLedgerType {
                text.push(CURSOR_INDICATOR);
            }
            let style = if focused {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Line::from(vec![
                Span::styled(format!("{:<13}", label), style),
                Span::styled(text, style),
            ])
        };

        let mut lines = vec![
            field_line("Name", form.name.clone(), FormField::Name),
            field_line("Description", form.description.clone(), FormField::Description),
            field_line(
                "Type",
                format!("< {} >", form.general_ledger_type.label()),
                FormField::GeneralLedgerType,
            ),
            Line::from(""),
        ];
        lines.push(Line::from(Span::styled(
            if form.is_read_only() {
                "Esc close"
            } else {
                "Tab next field · Enter save · Esc cancel"
            },
            Style::default().fg(Color::DarkGray),
        )));

        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title(title))
            .wrap(Wrap { trim: false });
        frame.render_widget(Clear, popup);
        frame.render_widget(paragraph, popup);
    }

    pub fn render_confirm(frame: &mut Frame, app: &AppState, target: &ConfirmTarget, area: Rect) {
        let name_of = |id: &GroupingId| app.tree.get(id).map(|n| n.name.clone()).unwrap_or_default();
        let question = match target {
            ConfirmTarget::Grouping(id) => format!("Remove grouping '{}'?", name_of(id)),
            ConfirmTarget::Account { grouping, account } => {
                let account_name = app
                    .tree
                    .get(grouping)
                    .and_then(|n| n.accounts.iter().find(|a| &a.id == account))
                    .map(|a| a.name.clone())
                    .unwrap_or_else(|| account.to_string());
                format!("Detach account '{}' from '{}'?", account_name, name_of(grouping))
            }
        };
        let popup = centered_rect(50, 5, area);
        let paragraph = Paragraph::new(vec![Line::from(question), Line::from("(y)es / (n)o")])
            .block(Block::default().borders(Borders::ALL).title(" Confirm "))
            .wrap(Wrap { trim: true });
        frame.render_widget(Clear, popup);
        frame.render_widget(paragraph, popup);
    }

    pub fn render_picker(frame: &mut Frame, accounts: &[AccountRef], selected: usize, area: Rect) {
        let popup = centered_rect(40, accounts.len().min(12) as u16 + 2, area);
        let items: Vec<ListItem> = accounts
            .iter()
            .map(|account| match &account.icon {
                Some(icon) => ListItem::new(format!("{} {}", icon, account.name)),
                None => ListItem::new(account.name.clone()),
            })
            .collect();
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(" Add account "))
            .highlight_style(selected_style());
        let mut state = ListState::default().with_selected(Some(selected));

        frame.render_widget(Clear, popup);
        frame.render_stateful_widget(list, popup, &mut state);
    }
}
