//! Cursor motions.
//!
//! Every motion is a pure function of a `Buffer` and a `Position` returning a
//! new, clamped `Position`. None of them mutate text. `past_end` selects the
//! column bound of the caller's mode (Insert allows the slot after the last
//! char; Normal does not).
//!
//! Word motions walk the document as a stream of cells: each char of a line,
//! followed by a virtual line-break cell at `col == len` on every line. Break
//! cells classify as [`CharClass::Space`], so a run never continues across a
//! line boundary and empty lines are skipped like any other blank.

use crate::{Buffer, CharClass, Position, clamp, classify, max_col};

pub fn left(buf: &Buffer, pos: Position, past_end: bool) -> Position {
    let pos = clamp(buf, pos, past_end);
    Position::new(pos.line, pos.col.saturating_sub(1))
}

pub fn right(buf: &Buffer, pos: Position, past_end: bool) -> Position {
    clamp(buf, Position::new(pos.line, pos.col + 1), past_end)
}

/// Move up one line. The column is re-clamped against the target line only;
/// no preferred column is remembered.
pub fn up(buf: &Buffer, pos: Position, past_end: bool) -> Position {
    clamp(
        buf,
        Position::new(pos.line.saturating_sub(1), pos.col),
        past_end,
    )
}

pub fn down(buf: &Buffer, pos: Position, past_end: bool) -> Position {
    clamp(buf, Position::new(pos.line + 1, pos.col), past_end)
}

pub fn line_start(buf: &Buffer, pos: Position, past_end: bool) -> Position {
    clamp(buf, Position::new(pos.line, 0), past_end)
}

pub fn line_end(buf: &Buffer, pos: Position, past_end: bool) -> Position {
    let line = clamp(buf, pos, past_end).line;
    Position::new(line, max_col(buf.line_len(line), past_end))
}

/// Start of the next word or punctuation run, crossing lines when needed.
/// Stops at the last valid position of the document when nothing follows.
pub fn word_forward(buf: &Buffer, pos: Position, past_end: bool) -> Position {
    let mut cur = clamp(buf, pos, past_end);
    let start = class_at(buf, cur);
    if start != CharClass::Space {
        loop {
            match step_forward(buf, cur) {
                Some(next) => {
                    cur = next;
                    if class_at(buf, cur) != start {
                        break;
                    }
                }
                None => return document_end(buf, past_end),
            }
        }
    }
    while class_at(buf, cur) == CharClass::Space {
        match step_forward(buf, cur) {
            Some(next) => cur = next,
            None => return document_end(buf, past_end),
        }
    }
    clamp(buf, cur, past_end)
}

/// Start of the previous run (or of the current one when the cursor sits
/// inside it). Stops at the document start.
pub fn word_backward(buf: &Buffer, pos: Position, past_end: bool) -> Position {
    let Some(mut cur) = step_backward(buf, clamp(buf, pos, past_end)) else {
        return Position::origin();
    };
    while class_at(buf, cur) == CharClass::Space {
        match step_backward(buf, cur) {
            Some(prev) => cur = prev,
            None => return Position::origin(),
        }
    }
    let class = class_at(buf, cur);
    while cur.col > 0 {
        let prev = Position::new(cur.line, cur.col - 1);
        if class_at(buf, prev) != class {
            break;
        }
        cur = prev;
    }
    clamp(buf, cur, past_end)
}

/// Last char of the current or next run, skipping leading blanks.
pub fn word_end(buf: &Buffer, pos: Position, past_end: bool) -> Position {
    let Some(mut cur) = step_forward(buf, clamp(buf, pos, past_end)) else {
        return document_end(buf, past_end);
    };
    while class_at(buf, cur) == CharClass::Space {
        match step_forward(buf, cur) {
            Some(next) => cur = next,
            None => return document_end(buf, past_end),
        }
    }
    let class = class_at(buf, cur);
    while buf.char_at(cur.line, cur.col + 1).map(classify) == Some(class) {
        cur.col += 1;
    }
    clamp(buf, cur, past_end)
}

/// First line of the next blank-line run, or the end of the last line.
pub fn paragraph_forward(buf: &Buffer, pos: Position, past_end: bool) -> Position {
    let from = clamp(buf, pos, past_end).line;
    (from + 1..buf.line_count())
        .find(|&k| buf.is_blank(k) && !buf.is_blank(k - 1))
        .map_or_else(|| document_end(buf, past_end), |k| Position::new(k, 0))
}

/// Blank line bordering the previous paragraph, or the document start.
pub fn paragraph_backward(buf: &Buffer, pos: Position, past_end: bool) -> Position {
    let from = clamp(buf, pos, past_end).line;
    (0..from)
        .rev()
        .find(|&k| buf.is_blank(k) && !buf.is_blank(k + 1))
        .map_or_else(Position::origin, |k| Position::new(k, 0))
}

fn class_at(buf: &Buffer, pos: Position) -> CharClass {
    buf.char_at(pos.line, pos.col)
        .map_or(CharClass::Space, classify)
}

/// Next cell in document order (a char or a line-break cell).
fn step_forward(buf: &Buffer, pos: Position) -> Option<Position> {
    if pos.col < buf.line_len(pos.line) {
        return Some(Position::new(pos.line, pos.col + 1));
    }
    (pos.line + 1 < buf.line_count()).then(|| Position::new(pos.line + 1, 0))
}

/// Previous cell in document order. Moving off column 0 lands on the
/// previous line's break cell.
fn step_backward(buf: &Buffer, pos: Position) -> Option<Position> {
    if pos.col > 0 {
        return Some(Position::new(pos.line, pos.col - 1));
    }
    let line = pos.line.checked_sub(1)?;
    Some(Position::new(line, buf.line_len(line)))
}

fn document_end(buf: &Buffer, past_end: bool) -> Position {
    let line = buf.line_count() - 1;
    Position::new(line, max_col(buf.line_len(line), past_end))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buf(lines: &[&str]) -> Buffer {
        Buffer::from_lines(lines.iter().copied())
    }

    #[test]
    fn horizontal_motions_stay_on_line() {
        let b = buf(&["abc", "de"]);
        let p = left(&b, Position::origin(), false);
        assert_eq!(p, Position::origin());
        let p = right(&b, Position::new(0, 2), false);
        assert_eq!(p, Position::new(0, 2), "normal mode stops on last char");
        let p = right(&b, Position::new(0, 2), true);
        assert_eq!(p, Position::new(0, 3), "insert mode may rest after last char");
        let p = right(&b, p, true);
        assert_eq!(p, Position::new(0, 3));
    }

    #[test]
    fn vertical_motion_reclamps_without_sticky_column() {
        let b = buf(&["abcdef", "ab", "abcdef"]);
        let p = down(&b, Position::new(0, 5), false);
        assert_eq!(p, Position::new(1, 1));
        let p = down(&b, p, false);
        assert_eq!(p, Position::new(2, 1), "column is not remembered");
        let p = down(&b, p, false);
        assert_eq!(p, Position::new(2, 1), "last line is a boundary");
        let p = up(&b, Position::new(0, 3), false);
        assert_eq!(p, Position::new(0, 3));
    }

    #[test]
    fn line_start_and_end_follow_mode_bound() {
        let b = buf(&["hello", ""]);
        assert_eq!(line_end(&b, Position::origin(), false), Position::new(0, 4));
        assert_eq!(line_end(&b, Position::origin(), true), Position::new(0, 5));
        assert_eq!(line_end(&b, Position::new(1, 0), false), Position::new(1, 0));
        assert_eq!(line_start(&b, Position::new(0, 3), false), Position::origin());
    }

    #[test]
    fn word_forward_separates_word_and_punct_runs() {
        let b = buf(&["foo  bar.baz"]);
        let p = word_forward(&b, Position::origin(), false);
        assert_eq!(p, Position::new(0, 5));
        let p = word_forward(&b, p, false);
        assert_eq!(p, Position::new(0, 8));
        let p = word_forward(&b, p, false);
        assert_eq!(p, Position::new(0, 9));
        let p = word_forward(&b, p, false);
        assert_eq!(p, Position::new(0, 11), "no further run: stop at document end");
        assert_eq!(word_forward(&b, p, false), p);
    }

    #[test]
    fn word_forward_crosses_blank_lines() {
        let b = buf(&["alpha", "", "  beta gamma", "", "zzz"]);
        let p = word_forward(&b, Position::origin(), false);
        assert_eq!(p, Position::new(2, 2));
        let p = word_forward(&b, p, false);
        assert_eq!(p, Position::new(2, 7));
        let p = word_forward(&b, p, false);
        assert_eq!(p, Position::new(4, 0));
    }

    #[test]
    fn word_forward_treats_line_break_as_boundary() {
        let b = buf(&["ab", "cd"]);
        assert_eq!(word_forward(&b, Position::origin(), false), Position::new(1, 0));
    }

    #[test]
    fn word_forward_on_trailing_blank_line_stops_at_end() {
        let b = buf(&["abc", "   "]);
        assert_eq!(word_forward(&b, Position::new(0, 1), false), Position::new(1, 2));
    }

    #[test]
    fn word_backward_mirrors_forward() {
        let b = buf(&["foo, bar baz", "qux!! zip"]);
        let mut p = Position::new(1, 0);
        p = word_backward(&b, p, false);
        assert_eq!(p, Position::new(0, 9));
        p = word_backward(&b, p, false);
        assert_eq!(p, Position::new(0, 5));
        p = word_backward(&b, p, false);
        assert_eq!(p, Position::new(0, 3), "comma is its own run");
        p = word_backward(&b, p, false);
        assert_eq!(p, Position::origin());
        assert_eq!(word_backward(&b, p, false), Position::origin());
    }

    #[test]
    fn word_backward_from_inside_word_goes_to_its_start() {
        let b = buf(&["hello world"]);
        assert_eq!(word_backward(&b, Position::new(0, 9), false), Position::new(0, 6));
    }

    #[test]
    fn word_backward_over_leading_blanks_reaches_origin() {
        let b = buf(&["   foo"]);
        assert_eq!(word_backward(&b, Position::new(0, 3), false), Position::origin());
    }

    #[test]
    fn word_end_moves_to_run_end() {
        let b = buf(&["foo  bar.baz", "x"]);
        let p = word_end(&b, Position::origin(), false);
        assert_eq!(p, Position::new(0, 2));
        let p = word_end(&b, p, false);
        assert_eq!(p, Position::new(0, 7));
        let p = word_end(&b, p, false);
        assert_eq!(p, Position::new(0, 8), "single char punct run");
        let p = word_end(&b, p, false);
        assert_eq!(p, Position::new(0, 11));
        let p = word_end(&b, p, false);
        assert_eq!(p, Position::new(1, 0));
        assert_eq!(word_end(&b, p, false), p, "document end");
    }

    #[test]
    fn paragraph_forward_lands_on_blank_run() {
        let b = buf(&["a", "b", "", "c", "d"]);
        let p = paragraph_forward(&b, Position::origin(), false);
        assert_eq!(p, Position::new(2, 0));
        let p = paragraph_forward(&b, p, false);
        assert_eq!(p, Position::new(4, 0), "no more blank lines: last line");
    }

    #[test]
    fn paragraph_forward_skips_current_blank_run() {
        let b = buf(&["a", "", "", "b", "", "c"]);
        let p = paragraph_forward(&b, Position::new(1, 0), false);
        assert_eq!(p, Position::new(4, 0));
    }

    #[test]
    fn paragraph_backward_mirrors_forward() {
        let b = buf(&["a", "", "", "b", "c", "", "d"]);
        let p = paragraph_backward(&b, Position::new(6, 0), false);
        assert_eq!(p, Position::new(5, 0));
        let p = paragraph_backward(&b, p, false);
        assert_eq!(p, Position::new(2, 0));
        let p = paragraph_backward(&b, p, false);
        assert_eq!(p, Position::origin());
    }

    #[test]
    fn paragraph_forward_end_uses_line_end() {
        let b = buf(&["abc", "def"]);
        assert_eq!(paragraph_forward(&b, Position::origin(), false), Position::new(1, 2));
        assert_eq!(paragraph_forward(&b, Position::origin(), true), Position::new(1, 3));
    }
}
