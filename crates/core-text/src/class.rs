//! Character classification shared by every word motion.

/// Class of a single char for word boundary detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    /// Letters, digits, underscore.
    Word,
    /// Any other non-blank char.
    Punct,
    /// Whitespace. Line breaks are treated as this class by the motions.
    Space,
}

pub fn classify(ch: char) -> CharClass {
    if ch.is_whitespace() {
        CharClass::Space
    } else if ch.is_alphanumeric() || ch == '_' {
        CharClass::Word
    } else {
        CharClass::Punct
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classes_are_disjoint() {
        assert_eq!(classify('a'), CharClass::Word);
        assert_eq!(classify('Z'), CharClass::Word);
        assert_eq!(classify('7'), CharClass::Word);
        assert_eq!(classify('_'), CharClass::Word);
        assert_eq!(classify('é'), CharClass::Word);
        assert_eq!(classify('.'), CharClass::Punct);
        assert_eq!(classify('{'), CharClass::Punct);
        assert_eq!(classify(' '), CharClass::Space);
        assert_eq!(classify('\t'), CharClass::Space);
    }
}
