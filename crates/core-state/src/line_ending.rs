//! Line ending detection and normalization for loaded files.
//!
//! Internally every line is stored without its terminator; the style seen on
//! load is remembered so the writer can reproduce it.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    #[default]
    Lf,
    Cr,
    Crlf,
}

impl LineEnding {
    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::Cr => "\r",
            LineEnding::Crlf => "\r\n",
        }
    }
}

/// LF-only text plus what was observed in the original.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedText {
    pub normalized: String,
    /// Majority style; ties resolve CRLF > LF > CR.
    pub original: LineEnding,
    pub had_trailing_newline: bool,
    /// More than one style was present.
    pub mixed: bool,
}

/// Rewrite CRLF and lone CR terminators to LF.
pub fn normalize_line_endings(input: &str) -> NormalizedText {
    let (mut crlf, mut lf, mut cr) = (0usize, 0usize, 0usize);
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\r' if chars.peek() == Some(&'\n') => {
                chars.next();
                crlf += 1;
                out.push('\n');
            }
            '\r' => {
                cr += 1;
                out.push('\n');
            }
            '\n' => {
                lf += 1;
                out.push('\n');
            }
            other => out.push(other),
        }
    }

    let counts = [
        (LineEnding::Crlf, crlf),
        (LineEnding::Lf, lf),
        (LineEnding::Cr, cr),
    ];
    let mut original = LineEnding::Lf;
    let mut best = 0usize;
    for (style, count) in counts {
        if count > best {
            best = count;
            original = style;
        }
    }
    let mixed = counts.iter().filter(|(_, c)| *c > 0).count() > 1;

    NormalizedText {
        had_trailing_newline: out.ends_with('\n'),
        normalized: out,
        original,
        mixed,
    }
}
