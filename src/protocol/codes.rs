//! Clacks code extraction.
//!
//! # Responsibilities
//! - Find the code prefix of an overhead message ("GNU Terry Pratchett" → "GNU")
//! - Map single letters to the directives they carry
//!
//! # Design Decisions
//! - Codes go at the start of the message and are followed by a single space
//! - Every code is one uppercase ASCII letter
//! - Naked messages (no valid prefix) carry no directives and are not errors
//! - A message starting with a space has an empty prefix, i.e. no codes

use std::fmt;

/// A single-letter clacks code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Code {
    /// `G`: send the message on.
    SendOn,
    /// `N`: do not log the message.
    NoLogs,
    /// `U`: turn the message around at the end of the line and send it back again.
    TurnAround,
    /// Any other uppercase letter. Kept verbatim, carries no behaviour.
    Other(char),
}

impl Code {
    /// Parse a code letter. Returns `None` for anything outside `'A'..='Z'`.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'G' => Some(Code::SendOn),
            'N' => Some(Code::NoLogs),
            'U' => Some(Code::TurnAround),
            'A'..='Z' => Some(Code::Other(c)),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Code::SendOn => 'G',
            Code::NoLogs => 'N',
            Code::TurnAround => 'U',
            Code::Other(c) => c,
        }
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Extract the clacks codes from an overhead message.
///
/// Returns the run of characters before the first space when every one of
/// them is an uppercase ASCII letter, and the empty string otherwise.
pub fn extract_codes(message: &str) -> &str {
    Codes::from_bytes(message.as_bytes()).as_str()
}

/// The prefix before the first space, when it is all uppercase ASCII.
fn code_prefix(message: &[u8]) -> &[u8] {
    let candidate = match message.iter().position(|&b| b == b' ') {
        Some(end) => &message[..end],
        None => message,
    };

    if candidate.iter().all(u8::is_ascii_uppercase) {
        candidate
    } else {
        &[]
    }
}

/// The code prefix of a single message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Codes<'a>(&'a str);

impl<'a> Codes<'a> {
    pub fn parse(message: &'a str) -> Self {
        Self::from_bytes(message.as_bytes())
    }

    /// Codes of a raw header value. The value itself need not be UTF-8.
    pub fn from_bytes(message: &'a [u8]) -> Self {
        // The prefix is ASCII, so this never falls back.
        Self(std::str::from_utf8(code_prefix(message)).unwrap_or_default())
    }

    pub fn as_str(&self) -> &'a str {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, code: Code) -> bool {
        self.0.contains(code.as_char())
    }

    /// Iterate the codes in prefix order, duplicates included.
    pub fn iter(&self) -> impl Iterator<Item = Code> + 'a {
        self.0.chars().filter_map(Code::from_char)
    }
}

impl fmt::Display for Codes<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_message_has_no_codes() {
        assert_eq!(extract_codes(""), "");
    }

    #[test]
    fn naked_message_has_no_codes() {
        assert_eq!(extract_codes("Terry Pratchett"), "");
        assert_eq!(extract_codes("K. A. Applegate"), "");
    }

    #[test]
    fn single_and_multiple_codes() {
        assert_eq!(extract_codes("A Terry Pratchett"), "A");
        assert_eq!(extract_codes("ABC Terry Pratchett"), "ABC");
        assert_eq!(extract_codes("GNU Terry Pratchett"), "GNU");
    }

    #[test]
    fn message_without_space_is_its_own_prefix() {
        assert_eq!(extract_codes("ABC"), "ABC");
        assert_eq!(extract_codes("ABc"), "");
    }

    #[test]
    fn leading_space_means_no_codes() {
        assert_eq!(extract_codes(" ABC Terry Pratchett"), "");
    }

    #[test]
    fn only_space_splits_the_prefix() {
        assert_eq!(extract_codes("GNU\tTerry"), "");
        assert_eq!(extract_codes("GNU  Terry"), "GNU");
    }

    #[test]
    fn codes_of_values_that_are_not_utf8() {
        assert_eq!(Codes::from_bytes(b"U \xff").as_str(), "U");
        assert_eq!(Codes::from_bytes(b"\xffU rest").as_str(), "");
        assert!(Codes::from_bytes(b"GU\xfe").is_empty());
    }

    #[test]
    fn non_ascii_letters_are_rejected() {
        assert_eq!(extract_codes("ÉU Terry"), "");
    }

    #[test]
    fn codes_view_answers_directives() {
        let codes = Codes::parse("GNU Terry Pratchett");
        assert!(codes.contains(Code::SendOn));
        assert!(codes.contains(Code::NoLogs));
        assert!(codes.contains(Code::TurnAround));
        assert_eq!(
            codes.iter().collect::<Vec<_>>(),
            vec![Code::SendOn, Code::NoLogs, Code::TurnAround]
        );

        let other = Codes::parse("XYZ message");
        assert!(!other.contains(Code::SendOn));
        assert_eq!(other.iter().next(), Some(Code::Other('X')));
        assert_eq!(other.to_string(), "XYZ");

        assert!(Codes::parse("naked").is_empty());
    }

    #[test]
    fn code_letters_round_trip() {
        for c in 'A'..='Z' {
            assert_eq!(Code::from_char(c).map(Code::as_char), Some(c));
        }
        assert_eq!(Code::from_char('a'), None);
        assert_eq!(Code::from_char(' '), None);
    }
}
