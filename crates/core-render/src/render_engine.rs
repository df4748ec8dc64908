//! RenderEngine: owns the viewport, builds full frames from editor state and
//! emits them through a batched `Writer`.
//!
//! Each redraw runs `layout` (scroll the viewport so the cursor stays visible)
//! followed by `build_frame`. Content painting and cursor/status decoration
//! are separate steps so tests can inspect the frame without a terminal.

use crate::gutter::{self, DEFAULT_MIN_WIDTH};
use crate::status::{StatusContext, build_status};
use crate::viewport::Viewport;
use crate::writer::Writer;
use crate::{CellFlags, Frame};
use anyhow::Result;
use core_state::EditorState;
use core_text::width::{char_width, display_col};
use std::io::Write;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub gutter_min_width: u16,
    /// Rows of context kept above and below the cursor when scrolling.
    pub vertical_margin: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            gutter_min_width: DEFAULT_MIN_WIDTH,
            vertical_margin: 0,
        }
    }
}

/// Cursor position on screen: (x, y, width in columns).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorSpan {
    pub x: u16,
    pub y: u16,
    pub width: u16,
}

#[derive(Debug, Default)]
pub struct RenderEngine {
    options: RenderOptions,
    viewport: Viewport,
    last_size: Option<(u16, u16)>,
}

impl RenderEngine {
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options,
            viewport: Viewport::default(),
            last_size: None,
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn options(&self) -> RenderOptions {
        self.options
    }

    /// Called after a resize once the effective margin has been recomputed.
    pub fn set_vertical_margin(&mut self, margin: usize) {
        self.options.vertical_margin = margin;
    }

    /// Force a full clear on the next emitted frame.
    pub fn invalidate(&mut self) {
        self.last_size = None;
    }

    fn gutter_width(&self, state: &EditorState, w: u16) -> u16 {
        gutter::gutter_width(state.buffer.line_count(), self.options.gutter_min_width).min(w)
    }

    /// Size the viewport for a `w` x `h` terminal and scroll it so the
    /// cursor is visible.
    pub fn layout(&mut self, state: &EditorState, w: u16, h: u16) {
        let text_rows = h.saturating_sub(1) as usize;
        let text_width = (w - self.gutter_width(state, w)) as usize;
        self.viewport.resize(text_rows, text_width);

        let line_count = state.buffer.line_count();
        self.viewport
            .scroll_to(state.cursor.line, self.options.vertical_margin, line_count);

        let line = state.buffer.line(state.cursor.line).unwrap_or("");
        let col = display_col(line, state.cursor.col);
        let cell = state
            .buffer
            .char_at(state.cursor.line, state.cursor.col)
            .map_or(1, char_width);
        if self.viewport.scroll_to_col(col, cell) {
            trace!(target: "render.viewport", first_col = self.viewport.first_col, "hscroll");
        }
    }

    /// Build a frame from the current viewport. Call `layout` first.
    pub fn build_frame(&self, state: &EditorState, w: u16, h: u16) -> Frame {
        let mut frame = build_content_frame(state, &self.viewport, self.gutter_width(state, w), w, h);
        if let Some(span) = self.cursor_span(state, w) {
            frame.apply_flags_span(
                span.x,
                span.y,
                span.width,
                CellFlags::REVERSE | CellFlags::CURSOR,
            );
        }
        apply_status_line(state, &mut frame, w, h);
        frame
    }

    /// `layout` followed by `build_frame`.
    pub fn frame(&mut self, state: &EditorState, w: u16, h: u16) -> Frame {
        self.layout(state, w, h);
        self.build_frame(state, w, h)
    }

    /// Where the cursor lands on screen, if it is inside the text area.
    /// In Insert mode the slot past the last char is a blank cell.
    pub fn cursor_span(&self, state: &EditorState, w: u16) -> Option<CursorSpan> {
        let vp = &self.viewport;
        if !vp.contains_line(state.cursor.line) {
            return None;
        }
        let line = state.buffer.line(state.cursor.line)?;
        let col = display_col(line, state.cursor.col);
        if col < vp.first_col || col - vp.first_col >= vp.text_width {
            return None;
        }
        let width = state
            .buffer
            .char_at(state.cursor.line, state.cursor.col)
            .map_or(1, char_width);
        Some(CursorSpan {
            x: self.gutter_width(state, w) + (col - vp.first_col) as u16,
            y: (state.cursor.line - vp.first_line) as u16,
            width: width as u16,
        })
    }

    fn compose(&mut self, state: &EditorState, w: u16, h: u16) -> Writer {
        let frame = self.frame(state, w, h);
        let mut writer = Writer::new();
        if self.last_size != Some((w, h)) {
            writer.clear_all();
            self.last_size = Some((w, h));
        }
        emit_frame(&frame, &mut writer);
        trace!(
            target: "render.engine",
            w,
            h,
            first_line = self.viewport.first_line,
            commands = writer.commands().len(),
            "frame"
        );
        writer
    }

    /// Render a full frame to stdout.
    pub fn render(&mut self, state: &EditorState, w: u16, h: u16) -> Result<()> {
        self.compose(state, w, h).flush()
    }

    pub fn render_to<W: Write>(
        &mut self,
        state: &EditorState,
        w: u16,
        h: u16,
        out: &mut W,
    ) -> Result<()> {
        self.compose(state, w, h).flush_to(out)
    }
}

/// Gutter + text for every visible line, `~` for rows past the document.
pub fn build_content_frame(
    state: &EditorState,
    vp: &Viewport,
    gutter_w: u16,
    w: u16,
    h: u16,
) -> Frame {
    let mut frame = Frame::new(w, h);
    let text_rows = (h.saturating_sub(1) as usize).min(vp.height);
    for row in 0..text_rows {
        let y = row as u16;
        let line_idx = vp.first_line + row;
        match state.buffer.line(line_idx) {
            Some(text) => {
                let number =
                    gutter::format_line_number(line_idx, gutter_w, line_idx == state.cursor.line);
                frame.put_str(0, y, &number, CellFlags::empty());
                paint_line(&mut frame, y, gutter_w, text, vp.first_col);
            }
            None => {
                frame.put_str(0, y, "~", CellFlags::empty());
            }
        }
    }
    frame
}

/// Paint `text` from display column `first_col` onward, starting at screen
/// column `x0`. A wide char cut by the left edge shows as blanks.
fn paint_line(frame: &mut Frame, y: u16, x0: u16, text: &str, first_col: usize) {
    let mut col = 0usize;
    for ch in text.chars() {
        let width = char_width(ch);
        let end = col + width;
        if end > first_col {
            if col < first_col {
                for dx in 0..(end - first_col) {
                    frame.set_char(x0 + dx as u16, y, ' ', 1, CellFlags::empty());
                }
            } else {
                let x = usize::from(x0) + (col - first_col);
                if x >= usize::from(frame.width) {
                    break;
                }
                frame.set_char(x as u16, y, crate::printable(ch), width as u16, CellFlags::empty());
            }
        }
        col = end;
    }
}

fn apply_status_line(state: &EditorState, frame: &mut Frame, w: u16, h: u16) {
    if h == 0 {
        return;
    }
    let line = state.buffer.line(state.cursor.line).unwrap_or("");
    let ctx = StatusContext {
        mode: state.mode,
        line: state.cursor.line,
        col: display_col(line, state.cursor.col),
        file_name: state.file_name.as_deref(),
        dirty: state.dirty,
        pending: state.pending.map(|p| p.keys()),
        message: state.ephemeral_status.as_ref().map(|m| m.text.as_str()),
    };
    let status = build_status(&ctx, w);
    frame.put_str(0, h - 1, &status, CellFlags::empty());
}

/// Emit leader cells row by row, toggling reverse video around flagged runs.
fn emit_frame(frame: &Frame, writer: &mut Writer) {
    for y in 0..frame.height {
        writer.move_to(0, y);
        let mut reversed = false;
        for (ch, flags, _x) in frame.row_leaders(y) {
            let want = flags.contains(CellFlags::REVERSE);
            if want != reversed {
                if want {
                    writer.reverse();
                } else {
                    writer.reset_style();
                }
                reversed = want;
            }
            writer.print(ch.to_string());
        }
        if reversed {
            writer.reset_style();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_state::Mode;
    use pretty_assertions::assert_eq;

    fn engine() -> RenderEngine {
        RenderEngine::new(RenderOptions::default())
    }

    #[test]
    fn gutter_text_and_filler_rows() {
        let state = EditorState::from_lines(["hello", "world"]);
        let frame = engine().frame(&state, 40, 4);
        assert_eq!(frame.row_text(0), format!("{:<40}", "  1  hello"));
        assert_eq!(frame.row_text(1), format!("{:<40}", "   2 world"));
        assert_eq!(frame.row_text(2), format!("{:<40}", "~"));
        assert!(frame.row_text(3).starts_with("-- NORMAL -- [No Name]"));
        assert!(frame.row_text(3).ends_with("Ln 1, Col 1"));
    }

    #[test]
    fn cursor_cell_is_reversed() {
        let mut state = EditorState::from_lines(["hello"]);
        state.cursor.col = 1;
        let frame = engine().frame(&state, 20, 3);
        let cell = frame.cell(6, 0).unwrap();
        assert_eq!(cell.ch, 'e');
        assert!(cell.flags.contains(CellFlags::REVERSE));
        assert!(!frame.cell(5, 0).unwrap().flags.contains(CellFlags::REVERSE));
    }

    #[test]
    fn insert_mode_cursor_past_end() {
        let mut state = EditorState::from_lines(["hello"]);
        state.set_mode(Mode::Insert);
        state.cursor.col = 5;
        let frame = engine().frame(&state, 20, 3);
        let cell = frame.cell(10, 0).unwrap();
        assert_eq!(cell.ch, ' ');
        assert!(cell.flags.contains(CellFlags::CURSOR));
        assert!(frame.row_text(2).starts_with("-- INSERT --"));
    }

    #[test]
    fn scrolls_to_cursor_line() {
        let lines: Vec<String> = (1..=30).map(|i| format!("line {i}")).collect();
        let mut state = EditorState::from_lines(lines);
        state.cursor.line = 20;
        let mut eng = engine();
        let frame = eng.frame(&state, 30, 6);
        assert_eq!(eng.viewport().first_line, 16);
        assert!(frame.row_text(4).starts_with(" 21  line 21"));
        assert!(frame.row_text(0).starts_with("  17 line 17"));
    }

    #[test]
    fn vertical_margin_keeps_context() {
        let lines: Vec<String> = (1..=30).map(|i| format!("{i}")).collect();
        let mut state = EditorState::from_lines(lines);
        state.cursor.line = 20;
        let mut eng = RenderEngine::new(RenderOptions {
            vertical_margin: 1,
            ..RenderOptions::default()
        });
        eng.layout(&state, 30, 6);
        assert_eq!(eng.viewport().first_line, 17);
    }

    #[test]
    fn horizontal_scroll_shows_cursor_column() {
        let line = format!("{}END", "x".repeat(50));
        let mut state = EditorState::from_lines([line]);
        state.cursor.col = 52;
        let mut eng = engine();
        let frame = eng.frame(&state, 20, 3);
        assert_eq!(eng.viewport().first_col, 38);
        assert_eq!(frame.row_text(0), format!("  1  {}END", "x".repeat(12)));
        assert!(frame.cell(19, 0).unwrap().flags.contains(CellFlags::REVERSE));
    }

    #[test]
    fn wide_char_cursor_spans_two_cells() {
        let mut state = EditorState::from_lines(["日本"]);
        state.cursor.col = 1;
        let frame = engine().frame(&state, 30, 3);
        assert!(frame.cell(7, 0).unwrap().flags.contains(CellFlags::REVERSE));
        assert!(frame.cell(8, 0).unwrap().flags.contains(CellFlags::REVERSE));
        assert!(!frame.cell(6, 0).unwrap().flags.contains(CellFlags::REVERSE));
        assert!(frame.row_text(2).ends_with("Ln 1, Col 3"));
    }

    #[test]
    fn wide_file_name_keeps_status_within_row() {
        let mut state = EditorState::from_lines(["a"]);
        state.file_name = Some("/tmp/日本語日本語.txt".into());
        let frame = engine().frame(&state, 30, 3);
        let status = frame.row_text(2);
        assert!(status.starts_with("-- NORMAL -- 日"), "{status}");
        assert!(status.ends_with("Ln 1, Col 1"), "{status}");
    }

    #[test]
    fn gutter_grows_with_line_count() {
        let lines: Vec<String> = (0..1000).map(|_| "a".to_string()).collect();
        let state = EditorState::from_lines(lines);
        let frame = engine().frame(&state, 20, 3);
        assert!(frame.row_text(0).starts_with("   1  a"));
    }

    #[test]
    fn status_reflects_dirty_and_pending() {
        let mut state = EditorState::from_lines(["abc"]);
        state.dirty = true;
        state.file_name = Some("/tmp/a.txt".into());
        state.pending = Some(core_state::PendingCommand::DeleteLine);
        let frame = engine().frame(&state, 50, 2);
        assert!(frame.row_text(1).starts_with("-- NORMAL -- a.txt [+]  d"));
    }

    #[test]
    fn first_render_clears_screen_once() {
        let state = EditorState::from_lines(["hello"]);
        let mut eng = engine();
        let mut first = Vec::new();
        eng.render_to(&state, 20, 3, &mut first).unwrap();
        let first = String::from_utf8(first).unwrap();
        assert!(first.contains("\x1b[2J"));
        // The cursor attribute splits the first char from the rest.
        assert!(first.contains("ello"));

        let mut second = Vec::new();
        eng.render_to(&state, 20, 3, &mut second).unwrap();
        assert!(!String::from_utf8(second).unwrap().contains("\x1b[2J"));

        let mut resized = Vec::new();
        eng.render_to(&state, 30, 3, &mut resized).unwrap();
        assert!(String::from_utf8(resized).unwrap().contains("\x1b[2J"));
    }
}
