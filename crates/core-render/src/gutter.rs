//! Line number gutter.
//!
//! Width is `max(digits(line_count) + 2, min_width)`. Numbers are 1-based
//! and right-aligned with one trailing space; the cursor line's number is
//! shifted one column left (two trailing spaces) so it stands out.

pub const DEFAULT_MIN_WIDTH: u16 = 5;

fn digits(mut n: usize) -> u16 {
    let mut d = 1;
    while n >= 10 {
        n /= 10;
        d += 1;
    }
    d
}

pub fn gutter_width(line_count: usize, min_width: u16) -> u16 {
    (digits(line_count.max(1)) + 2).max(min_width)
}

/// Gutter text for buffer line `line_idx` (0-based). Always `width` chars.
pub fn format_line_number(line_idx: usize, width: u16, is_cursor_line: bool) -> String {
    let padding: usize = if is_cursor_line { 2 } else { 1 };
    let field = (width as usize).saturating_sub(padding);
    format!("{:>field$}{:padding$}", line_idx + 1, "")
}
