//! Property tests for the wire codecs and the context carrier.

use http::{HeaderMap, HeaderValue};
use proptest::prelude::*;
use request_data::{attach, retrieve, Ctx, RequestData};

// Header-safe text: printable, no control characters.
fn arb_text() -> impl Strategy<Value = String> {
    prop::string::string_regex("[ -~]{0,24}").unwrap()
}

fn arb_request_data() -> impl Strategy<Value = RequestData> {
    (
        (arb_text(), arb_text(), arb_text(), arb_text(), arb_text()),
        (arb_text(), any::<i64>(), arb_text(), arb_text()),
        (any::<i64>(), arb_text(), arb_text(), arb_text(), arb_text()),
        arb_text(),
    )
        .prop_map(
            |(
                (session_id, request_id, user_agent, ip_address, client_name),
                (client_schema, client_id, client_status, client_time_zone),
                (user_id, user_email, user_role, user_status, user_language),
                from_service,
            )| RequestData {
                session_id,
                request_id,
                user_agent,
                ip_address,
                client_name,
                client_schema,
                client_id,
                client_status,
                client_time_zone,
                user_id,
                user_email,
                user_role,
                user_status,
                user_language,
                from_service,
            },
        )
}

proptest! {
    /// Property: headers reproduce every field of the record.
    #[test]
    fn proptest_header_round_trip(rd in arb_request_data()) {
        let decoded = RequestData::from_headers(&rd.to_headers(HeaderMap::new()));
        prop_assert_eq!(decoded, rd);
    }

    /// Property: encoding only touches the propagated keys.
    #[test]
    fn proptest_unrelated_headers_survive(
        rd in arb_request_data(),
        accept in prop::string::string_regex("[a-z/*+.-]{1,20}").unwrap(),
    ) {
        let mut headers = HeaderMap::new();
        headers.insert("Accept", HeaderValue::from_str(&accept).unwrap());

        let headers = rd.to_headers(headers);

        prop_assert_eq!(headers["accept"].to_str().unwrap(), accept.as_str());
        prop_assert_eq!(headers.len(), 16);
    }

    /// Property: decoding never fails, whatever the identifier headers hold.
    #[test]
    fn proptest_lenient_id_decode(raw in "[ -~]{0,24}") {
        let mut headers = HeaderMap::new();
        headers.insert("X-User-Id", HeaderValue::from_str(&raw).unwrap());

        let rd = RequestData::from_headers(&headers);

        let expected = raw.parse::<i64>().unwrap_or(0);
        prop_assert_eq!(rd.user_id, expected);
        prop_assert_eq!(rd.client_id, 0);
    }

    /// Property: a context returns exactly the record attached to it.
    #[test]
    fn proptest_attach_then_retrieve(rd in arb_request_data()) {
        let ctx = attach(&Ctx::new(), rd.clone());
        prop_assert_eq!(retrieve(Some(&ctx)), Some(&rd));
        prop_assert_eq!(ctx.outgoing_metadata().unwrap().len(), 13);
    }
}
