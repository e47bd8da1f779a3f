use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::ui::constants::ELLIPSIS;

/// Cuts `text` to at most `max_width` columns, marking the cut with an ellipsis.
pub fn truncate(text: &str, max_width: usize) -> String {
    if UnicodeWidthStr::width(text) <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut width = 0;
    for ch in text.chars() {
        let w = UnicodeWidthChar::width(ch).unwrap_or(0);
        if width + w > max_width - 1 {
            break;
        }
        out.push(ch);
        width += w;
    }
    out.push(ELLIPSIS);
    out
}

/// Right-pads `text` with spaces to exactly `width` columns, truncating if needed.
pub fn fit(text: &str, width: usize) -> String {
    let mut out = truncate(text, width);
    let used = UnicodeWidthStr::width(out.as_str());
    out.extend(std::iter::repeat(' ').take(width.saturating_sub(used)));
    out
}
