//! Batched terminal writer.
//!
//! A short-lived object per frame: callers push primitive commands, then
//! `flush` queues them through crossterm and flushes the sink once.
//!
//! * Commands preserve ordering; nothing is written mid-frame.
//! * Positions are absolute with a (0,0) origin; the caller ensures bounds.

use anyhow::Result;
use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Attribute, Print, SetAttribute},
    terminal::{Clear, ClearType},
};
use std::io::{Write, stdout};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    MoveTo(u16, u16),
    ClearAll,
    Print(String),
    Reverse,
    ResetStyle,
}

#[derive(Debug, Default)]
pub struct Writer {
    cmds: Vec<Command>,
}

impl Writer {
    pub fn new() -> Self {
        Self { cmds: Vec::new() }
    }

    pub fn move_to(&mut self, x: u16, y: u16) {
        self.cmds.push(Command::MoveTo(x, y));
    }

    pub fn clear_all(&mut self) {
        self.cmds.push(Command::ClearAll);
    }

    /// Adjacent prints are merged; empty strings are dropped.
    pub fn print<S: Into<String>>(&mut self, s: S) {
        let s: String = s.into();
        if s.is_empty() {
            return;
        }
        if let Some(Command::Print(prev)) = self.cmds.last_mut() {
            prev.push_str(&s);
        } else {
            self.cmds.push(Command::Print(s));
        }
    }

    pub fn reverse(&mut self) {
        self.cmds.push(Command::Reverse);
    }

    pub fn reset_style(&mut self) {
        self.cmds.push(Command::ResetStyle);
    }

    pub fn commands(&self) -> &[Command] {
        &self.cmds
    }

    pub fn flush_to<W: Write>(self, out: &mut W) -> Result<()> {
        for c in self.cmds {
            match c {
                Command::MoveTo(x, y) => queue!(out, MoveTo(x, y))?,
                Command::ClearAll => queue!(out, Clear(ClearType::All))?,
                Command::Print(s) => queue!(out, Print(s))?,
                Command::Reverse => queue!(out, SetAttribute(Attribute::Reverse))?,
                Command::ResetStyle => queue!(out, SetAttribute(Attribute::Reset))?,
            }
        }
        out.flush()?;
        Ok(())
    }

    pub fn flush(self) -> Result<()> {
        let mut out = stdout();
        self.flush_to(&mut out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjacent_prints_merge() {
        let mut w = Writer::new();
        w.move_to(0, 0);
        w.print("ab");
        w.print("");
        w.print("c");
        w.reverse();
        w.print("d");
        assert_eq!(
            w.commands(),
            &[
                Command::MoveTo(0, 0),
                Command::Print("abc".into()),
                Command::Reverse,
                Command::Print("d".into()),
            ]
        );
    }

    #[test]
    fn flush_emits_text_in_order() {
        let mut w = Writer::new();
        w.move_to(2, 1);
        w.print("hi");
        w.reverse();
        w.print("x");
        w.reset_style();
        let mut sink: Vec<u8> = Vec::new();
        w.flush_to(&mut sink).unwrap();
        let out = String::from_utf8(sink).unwrap();
        let hi = out.find("hi").unwrap();
        let x = out.find('x').unwrap();
        assert!(hi < x);
        // MoveTo is 1-based in ANSI: row 2, col 3.
        assert!(out.starts_with("\x1b[2;3H"), "{out:?}");
        assert!(out.contains("\x1b[7m"));
    }
}
