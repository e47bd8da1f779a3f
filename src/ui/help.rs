use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

// Help section structure
pub struct HelpSection {
    pub title: &'static str,
    pub items: &'static [(&'static str, &'static str)],
}

// Help section definitions
pub const SECTIONS: &[HelpSection] = &[
    HelpSection {
        title: "Navigation:",
        items: &[
            ("j/↓", "Move down"),
            ("k/↑", "Move up"),
            ("g  ", "Go to top"),
            ("G  ", "Go to bottom"),
            ("␣/⏎", "Expand or collapse"),
            ("b  ", "Expand all"),
            ("z  ", "Collapse all"),
        ],
    },
    HelpSection {
        title: "Groupings:",
        items: &[
            ("m/⇥", "Action menu"),
            ("o  ", "Add root grouping"),
            ("c  ", "Add GL definition (child)"),
            ("a  ", "Add account"),
            ("e  ", "Edit"),
            ("v  ", "View"),
            ("d  ", "Remove / detach account"),
        ],
    },
    HelpSection {
        title: "Reorder:",
        items: &[
            ("M  ", "Pick up grouping"),
            ("⏎  ", "Drop onto sibling"),
            ("Esc", "Cancel move"),
            ("⠿  ", "Drag handle (mouse)"),
        ],
    },
    HelpSection {
        title: "Other:",
        items: &[
            ("/  ", "Search by name"),
            ("n  ", "Next match"),
            ("r  ", "Reload from service"),
            ("q  ", "Quit"),
        ],
    },
];

// Help renderer
pub struct HelpRenderer;

impl HelpRenderer {
    pub fn render(frame: &mut Frame, area: Rect) {
        let help_text = Self::build_help_text();
        let block = Block::default().borders(Borders::ALL).title(" Help ");
        let paragraph = Paragraph::new(help_text)
            .block(block)
            .wrap(Wrap { trim: false });

        frame.render_widget(paragraph, area);
    }

    fn build_help_text() -> Vec<Line<'static>> {
        let mut lines = vec![
            Line::from(vec![Span::styled(
                "gldef-rs Help",
                Style::default().add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
        ];

        for section in SECTIONS {
            lines.push(Line::from(vec![Span::styled(
                section.title,
                Style::default().add_modifier(Modifier::BOLD),
            )]));

            for (key, desc) in section.items {
                lines.push(Line::from(format!("  {}  {}", key, desc)));
            }

            lines.push(Line::from(""));
        }

        lines.push(Line::from("Press ESC or q to close help"));
        lines
    }
}
