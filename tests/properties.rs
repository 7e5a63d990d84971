//! Property tests for code extraction and message processing.

use std::collections::HashSet;
use std::convert::Infallible;

use axum::body::Body;
use axum::http::{Request, Response};
use proptest::prelude::*;
use tower::{service_fn, Layer, ServiceExt};

use clacks_overhead::{extract_codes, process, ClacksLayer, OVERHEAD_HEADER};

/// Send `incoming` through a middleware configured with `defaults` and
/// return the overhead values of the response.
fn run_middleware(defaults: &[String], incoming: &[String]) -> Vec<String> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap();

    let svc = ClacksLayer::new()
        .with_messages(defaults.to_vec())
        .layer(service_fn(|_req: Request<Body>| async {
            Ok::<_, Infallible>(Response::new(Body::empty()))
        }));

    let mut builder = Request::builder().uri("/");
    for value in incoming {
        builder = builder.header(OVERHEAD_HEADER, value.as_str());
    }
    let request = builder.body(Body::empty()).unwrap();

    let response = runtime.block_on(svc.oneshot(request)).unwrap();
    response
        .headers()
        .get_all(OVERHEAD_HEADER)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect()
}

proptest! {
    #[test]
    fn uppercase_word_without_space_is_all_codes(message in "[A-Z]{1,12}") {
        prop_assert_eq!(extract_codes(&message), message.as_str());
    }

    #[test]
    fn codes_are_the_leading_uppercase_word(codes in "[A-Z]{1,6}", rest in "[ -~]{0,24}") {
        let message = format!("{} {}", codes, rest);
        prop_assert_eq!(extract_codes(&message), codes.as_str());
    }

    #[test]
    fn non_uppercase_before_space_means_no_codes(
        head in "[A-Z]{0,4}",
        odd in "[a-z0-9.\\-]",
        tail in "[A-Z]{0,4}",
        rest in "[ -~]{0,24}",
    ) {
        let message = format!("{}{}{} {}", head, odd, tail, rest);
        prop_assert_eq!(extract_codes(&message), "");
    }

    #[test]
    fn response_never_repeats_values(
        defaults in prop::collection::vec("[A-Z]{0,3} ?[a-z]{1,6}", 0..6),
        incoming in prop::collection::vec("[A-Z]{0,3} ?[a-z]{1,6}", 0..6),
    ) {
        let values = run_middleware(&defaults, &incoming);

        let distinct: HashSet<&String> = values.iter().collect();
        prop_assert_eq!(distinct.len(), values.len());
        for message in &defaults {
            prop_assert!(values.contains(message));
        }
        for message in incoming.iter().filter(|m| extract_codes(m).contains('U')) {
            prop_assert!(values.contains(message));
        }
    }

    #[test]
    fn every_incoming_value_is_accounted_for(
        incoming in prop::collection::vec("[GNUX]{0,3} [a-z]{1,6}", 0..8),
    ) {
        let none: [&str; 0] = [];
        let result = process(&none, &incoming);
        for message in &incoming {
            let codes = extract_codes(message);
            prop_assert_eq!(result.log.iter().any(|m| m == message.as_str()), !codes.contains('N'));
            prop_assert_eq!(result.send_on.iter().any(|m| m == message.as_str()), codes.contains('G'));
            prop_assert_eq!(result.outgoing.contains(message.as_bytes()), codes.contains('U'));
        }
    }

    #[test]
    fn processing_is_idempotent(
        outgoing in prop::collection::vec("[GNU]{0,2} [a-z]{1,4}", 0..4),
        incoming in prop::collection::vec("[GNU]{0,2} [a-z]{1,4}", 0..4),
    ) {
        let first = process(&outgoing, &incoming);
        let second = process(&outgoing, &incoming);
        prop_assert_eq!(first, second);
    }
}
