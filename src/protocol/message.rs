//! Overhead message values.
//!
//! # Design Decisions
//! - A message is the exact bytes of one header value; nothing is decoded
//!   on the way through, so turned-around values go back byte for byte
//! - Text views are lossy and only used for logs and the side channel

use std::borrow::{Borrow, Cow};
use std::fmt;

/// One overhead header value, kept as received.
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OverheadMessage(Vec<u8>);

impl OverheadMessage {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// The message as text, with invalid UTF-8 replaced.
    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.0)
    }
}

impl From<&[u8]> for OverheadMessage {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl From<Vec<u8>> for OverheadMessage {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&str> for OverheadMessage {
    fn from(message: &str) -> Self {
        Self(message.as_bytes().to_vec())
    }
}

impl From<String> for OverheadMessage {
    fn from(message: String) -> Self {
        Self(message.into_bytes())
    }
}

impl AsRef<[u8]> for OverheadMessage {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Borrow<[u8]> for OverheadMessage {
    fn borrow(&self) -> &[u8] {
        &self.0
    }
}

impl PartialEq<str> for OverheadMessage {
    fn eq(&self, other: &str) -> bool {
        self.0 == other.as_bytes()
    }
}

impl PartialEq<&str> for OverheadMessage {
    fn eq(&self, other: &&str) -> bool {
        self.0 == other.as_bytes()
    }
}

impl fmt::Debug for OverheadMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.0.escape_ascii())
    }
}

impl fmt::Display for OverheadMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_lossy())
    }
}
