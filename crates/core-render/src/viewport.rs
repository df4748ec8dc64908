//! Viewport: the visible window into the buffer.
//!
//! * `first_line` is the topmost buffer line rendered; `height` is the number
//!   of text rows (status row excluded).
//! * `first_col` is the horizontal offset in display columns; `text_width` is
//!   the number of columns available right of the gutter.
//!
//! Scrolling is lazy: the window only moves when the cursor would leave it
//! (or enter the vertical margin band).

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub first_line: usize,
    pub height: usize,
    pub first_col: usize,
    pub text_width: usize,
}

impl Viewport {
    pub fn new(height: usize, text_width: usize) -> Self {
        Self {
            first_line: 0,
            height,
            first_col: 0,
            text_width,
        }
    }

    pub fn resize(&mut self, height: usize, text_width: usize) {
        self.height = height;
        self.text_width = text_width;
    }

    /// One past the last visible buffer line.
    pub fn end_line(&self) -> usize {
        self.first_line + self.height
    }

    pub fn contains_line(&self, line: usize) -> bool {
        line >= self.first_line && line < self.end_line()
    }

    /// Keep `cursor_line` inside `[first_line + margin, end_line - 1 - margin]`.
    /// The margin shrinks near the document edges and never exceeds half the
    /// window. Returns true when `first_line` changed.
    pub fn scroll_to(&mut self, cursor_line: usize, margin: usize, line_count: usize) -> bool {
        if self.height == 0 {
            return false;
        }
        let before = self.first_line;
        let margin = margin.min((self.height - 1) / 2);
        let below = line_count.saturating_sub(cursor_line + 1);
        let top = cursor_line.saturating_sub(margin);
        if top < self.first_line {
            self.first_line = top;
        }
        let bottom = cursor_line + margin.min(below);
        if bottom >= self.end_line() {
            self.first_line = bottom + 1 - self.height;
        }
        if self.first_line != before {
            tracing::trace!(target: "render.viewport", from = before, to = self.first_line, cursor_line, margin, "scroll");
        }
        self.first_line != before
    }

    /// Keep the cursor cell `[display_col, display_col + cell_width)` inside
    /// the horizontal window. Returns true when `first_col` changed.
    pub fn scroll_to_col(&mut self, display_col: usize, cell_width: usize) -> bool {
        if self.text_width == 0 {
            return false;
        }
        let before = self.first_col;
        let cell_width = cell_width.clamp(1, self.text_width);
        if display_col < self.first_col {
            self.first_col = display_col;
        } else if display_col + cell_width > self.first_col + self.text_width {
            self.first_col = display_col + cell_width - self.text_width;
        }
        self.first_col != before
    }
}
