// Row glyphs
pub const HANDLE: &str = "⠿ ";
pub const MENU_GLYPH: &str = " ⋮";
pub const EXPANDED: &str = "▾ ";
pub const COLLAPSED: &str = "▸ ";
pub const LEAF: &str = "  ";
pub const ACCOUNT_BULLET: &str = "• ";

// Row geometry, shared with mouse hit testing
pub const INDENT_WIDTH: usize = 2;
pub const HANDLE_WIDTH: usize = 2;
pub const MENU_WIDTH: usize = 2;

pub const CURSOR_INDICATOR: char = '▌';
pub const STATUS_SEARCH_PREFIX: &str = "Search: ";
pub const ELLIPSIS: char = '…';
