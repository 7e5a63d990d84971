//! Overhead header reading and writing.
//!
//! # Responsibilities
//! - Read every value of the overhead header, in received order
//! - Append messages as separate header values
//!
//! # Design Decisions
//! - Values are read one header line each; commas inside a value are message text
//! - The middleware works on raw values; `read_messages` decodes lossily for display
//! - Writes accept any bytes a header value allows (visible ASCII and obs-text)

use axum::http::header::InvalidHeaderValue;
use axum::http::{HeaderMap, HeaderName, HeaderValue};

use crate::protocol::OverheadMessage;

/// Every value of `name` in `headers`, byte for byte.
pub fn read_values(headers: &HeaderMap, name: &HeaderName) -> Vec<OverheadMessage> {
    headers
        .get_all(name)
        .iter()
        .map(|value| OverheadMessage::from(value.as_bytes()))
        .collect()
}

/// Every value of `name` in `headers`, as text.
pub fn read_messages(headers: &HeaderMap, name: &HeaderName) -> Vec<String> {
    headers
        .get_all(name)
        .iter()
        .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
        .collect()
}

/// Convert a message to a header value.
pub fn encode_message(message: &str) -> Result<HeaderValue, InvalidHeaderValue> {
    HeaderValue::from_bytes(message.as_bytes())
}

/// Append each message as a separate value of `name`.
///
/// Messages that are not valid header values are skipped and returned.
pub fn append_messages<'a, M, I>(
    headers: &mut HeaderMap,
    name: &HeaderName,
    messages: I,
) -> Vec<&'a M>
where
    M: AsRef<[u8]> + ?Sized + 'a,
    I: IntoIterator<Item = &'a M>,
{
    let mut rejected = Vec::new();
    for message in messages {
        match HeaderValue::from_bytes(message.as_ref()) {
            Ok(value) => {
                headers.append(name.clone(), value);
            }
            Err(_) => rejected.push(message),
        }
    }
    rejected
}
