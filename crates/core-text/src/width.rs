//! Display width helpers used by the renderer to map char columns to terminal cells.

use unicode_width::UnicodeWidthChar;

/// Cell width of a single char. Control chars (including tab) occupy one cell
/// since the renderer prints them as a blank.
#[inline]
pub fn char_width(ch: char) -> usize {
    if ch.is_control() {
        return 1;
    }
    ch.width().unwrap_or(1)
}

/// Visual column (terminal cells) before char column `col`.
pub fn display_col(line: &str, col: usize) -> usize {
    line.chars().take(col).map(char_width).sum()
}

/// Total cell width of a line.
pub fn display_width(line: &str) -> usize {
    line.chars().map(char_width).sum()
}
