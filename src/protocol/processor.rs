//! Per-request overhead decision logic.
//!
//! # Responsibilities
//! - Decide which incoming messages may be logged (everything without `N`)
//! - Turn around incoming messages coded `U`
//! - Collect incoming messages coded `G` for the side-channel handler
//! - Merge the local outgoing messages and dedupe by exact bytes
//!
//! # Design Decisions
//! - Pure single-pass computation; the http adapters own logging, dispatch
//!   and header writes
//! - Logging is per occurrence, turn-around is per distinct value

use std::collections::BTreeSet;

use crate::protocol::codes::{Code, Codes};
use crate::protocol::message::OverheadMessage;

/// Outcome of processing one request's overhead messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessingResult {
    /// Distinct messages to write on the outgoing header.
    pub outgoing: BTreeSet<OverheadMessage>,
    /// Incoming messages coded `G`, in received order.
    pub send_on: Vec<OverheadMessage>,
    /// Incoming messages eligible for logging, in received order.
    pub log: Vec<OverheadMessage>,
    /// Incoming messages coded `U`, counted per occurrence.
    pub turned_around: usize,
}

/// Process the incoming overhead messages of a request against the messages
/// the local side wants to send.
///
/// Messages are compared and echoed as raw bytes.
pub fn process<O, I>(outgoing: &[O], incoming: &[I]) -> ProcessingResult
where
    O: AsRef<[u8]>,
    I: AsRef<[u8]>,
{
    let mut result = ProcessingResult::default();

    for message in incoming.iter().map(AsRef::as_ref) {
        let codes = Codes::from_bytes(message);

        if !codes.contains(Code::NoLogs) {
            result.log.push(message.into());
        }

        if codes.contains(Code::TurnAround) {
            result.turned_around += 1;
            result.outgoing.insert(message.into());
        }

        if codes.contains(Code::SendOn) {
            result.send_on.push(message.into());
        }
    }

    for message in outgoing.iter().map(AsRef::as_ref) {
        result.outgoing.insert(message.into());
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::DEFAULT_MESSAGE;

    const NONE: [&str; 0] = [];

    fn set(values: &[&str]) -> BTreeSet<OverheadMessage> {
        values.iter().map(|v| OverheadMessage::from(*v)).collect()
    }

    #[test]
    fn default_message_without_incoming() {
        let result = process(&[DEFAULT_MESSAGE], &NONE);
        assert_eq!(result.outgoing, set(&[DEFAULT_MESSAGE]));
        assert!(result.send_on.is_empty());
        assert!(result.log.is_empty());
    }

    #[test]
    fn turns_around_with_no_outgoing() {
        let result = process(&NONE, &["U Test Incoming"]);
        assert_eq!(result.outgoing, set(&["U Test Incoming"]));
    }

    #[test]
    fn turned_around_duplicate_of_default_appears_once() {
        let result = process(&[DEFAULT_MESSAGE], &["U Test Incoming", DEFAULT_MESSAGE]);
        assert_eq!(result.outgoing, set(&[DEFAULT_MESSAGE, "U Test Incoming"]));
        assert_eq!(result.send_on, vec![DEFAULT_MESSAGE]);
        // GNU carries N, so only the U message is logged
        assert_eq!(result.log, vec!["U Test Incoming"]);
        // Both carry U, including the one equal to the default.
        assert_eq!(result.turned_around, 2);
    }

    #[test]
    fn no_logs_code_suppresses_logging() {
        let result = process(&[DEFAULT_MESSAGE], &["N Ursula Le Guin", "K. A. Applegate"]);
        assert_eq!(result.log, vec!["K. A. Applegate"]);
        assert_eq!(result.outgoing, set(&[DEFAULT_MESSAGE]));
    }

    #[test]
    fn logging_is_per_occurrence() {
        let result = process(&NONE, &["incoming msg", "incoming msg"]);
        assert_eq!(result.log.len(), 2);
        assert!(result.outgoing.is_empty());
    }

    #[test]
    fn send_on_keeps_received_order() {
        let result = process(
            &["GNU outgoing msg"],
            &[
                "GNU incoming msg 1",
                "G incoming msg 2",
                "NU incoming msg 3",
                "incoming msg 4",
            ],
        );
        assert_eq!(
            result.send_on,
            vec!["GNU incoming msg 1", "G incoming msg 2"]
        );
        assert_eq!(
            result.outgoing,
            set(&["GNU outgoing msg", "GNU incoming msg 1", "NU incoming msg 3"])
        );
        assert_eq!(
            result.log,
            vec!["G incoming msg 2", "incoming msg 4"]
        );
    }

    #[test]
    fn naked_messages_are_never_turned_around() {
        let result = process(&NONE, &["Terry Pratchett", " U leading space"]);
        assert!(result.outgoing.is_empty());
        assert!(result.send_on.is_empty());
        assert_eq!(result.log.len(), 2);
    }

    #[test]
    fn duplicate_outgoing_messages_collapse() {
        let result = process(&["a", "b", "a"], &NONE);
        assert_eq!(result.outgoing, set(&["a", "b"]));
    }

    #[test]
    fn raw_values_are_echoed_unchanged() {
        let incoming: [&[u8]; 3] = [b"U \xff", b"U \xfe", b"U \xff"];
        let result = process(&NONE, &incoming);

        let echoed: Vec<&[u8]> = result.outgoing.iter().map(OverheadMessage::as_bytes).collect();
        assert_eq!(echoed, vec![&b"U \xfe"[..], &b"U \xff"[..]]);
        assert_eq!(result.turned_around, 3);
    }

    #[test]
    fn processing_is_idempotent() {
        let outgoing = ["GNU Terry Pratchett", "M. John Harrison"];
        let incoming = ["GNU Terry Pratchett", "NU Ursula Le Guin", "K. A. Applegate"];
        assert_eq!(process(&outgoing, &incoming), process(&outgoing, &incoming));
    }
}
