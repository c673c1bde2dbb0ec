//! End-to-end scenarios exercised across the message, URI, and header
//! layers together.

use sip_core::headers::method::Method;
use sip_core::uri::Uri;
use sip_core::{parse_request, parse_response, parse_uri, serialize_request, serialize_response, validate_request};

#[test]
fn scenario_a_invite_parse() {
    let raw = b"INVITE sip:bob@example.com SIP/2.0\r\nVia: SIP/2.0/UDP 10.0.0.1:5060;branch=z9hG4bK-abc\r\nFrom: <sip:alice@example.com>;tag=1928301774\r\nTo: <sip:bob@example.com>\r\nCall-ID: a84b4c76e66710\r\nCSeq: 314159 INVITE\r\nMax-Forwards: 70\r\nContent-Length: 0\r\n\r\n";
    let request = parse_request(raw).unwrap();

    assert_eq!(request.method, Method::Invite);
    assert_eq!(request.uri.to_string(), "sip:bob@example.com");
    assert_eq!(request.headers.via.top().unwrap().branch(), Some("z9hG4bK-abc"));
    let cseq = request.headers.cseq.as_ref().unwrap();
    assert_eq!(cseq.sequence, 314159);
    assert_eq!(cseq.method, Method::Invite);
    assert_eq!(request.headers.max_forwards, Some(70));
    assert!(validate_request(&request).is_ok());
}

#[test]
fn scenario_b_ipv6_uri_with_transport() {
    let text = "sip:alice@[2001:db8::1]:5062;transport=tcp";
    let uri = parse_uri(text).unwrap();

    assert_eq!(uri.scheme.to_string(), "sip");
    assert_eq!(uri.user.as_deref(), Some("alice"));
    assert_eq!(uri.host.to_string(), "[2001:db8::1]");
    assert_eq!(uri.port, Some(5062));
    assert_eq!(uri.parameters.get("transport"), Some(Some("tcp")));
    assert_eq!(uri.effective_protocol(), sip_core::transport::Protocol::Tcp);

    let reparsed = Uri::parse(text).unwrap();
    assert_eq!(uri, reparsed);
    assert_eq!(uri.to_string(), text);
}

#[test]
fn scenario_c_contact_list_serialization() {
    use sip_core::headers::contact::ContactList;

    let list = ContactList::parse_header_value(r#""Alice" <sip:a@h>,<sip:b@h>;expires=60"#).unwrap();
    assert_eq!(format!("Contact: {list}\r\n"), "Contact: \"Alice\" <sip:a@h>,<sip:b@h>;expires=60\r\n");
}

#[test]
fn scenario_f_request_serialize_reparse_round_trip() {
    let raw = b"INVITE sip:bob@example.com SIP/2.0\r\nVia: SIP/2.0/UDP 10.0.0.1:5060;branch=z9hG4bK-abc\r\nFrom: <sip:alice@example.com>;tag=1928301774\r\nTo: <sip:bob@example.com>\r\nCall-ID: a84b4c76e66710\r\nCSeq: 314159 INVITE\r\nMax-Forwards: 70\r\nExpires: 3600\r\nContent-Length: 5\r\n\r\nhello";
    let request = parse_request(raw).unwrap();
    let serialized = serialize_request(&request);
    let reparsed = parse_request(&serialized).unwrap();

    assert_eq!(request, reparsed);
    assert_eq!(reparsed.headers.expires, Some(3600));
    assert_eq!(reparsed.body.as_deref(), Some("hello"));
}

#[test]
fn scenario_g_response_serialize_reparse_round_trip() {
    let raw = b"SIP/2.0 200 OK\r\nVia: SIP/2.0/UDP 10.0.0.1:5060;branch=z9hG4bK-abc\r\nTo: <sip:bob@example.com>;tag=456\r\nFrom: <sip:alice@example.com>;tag=123\r\nCall-ID: a84b4c76e66710\r\nCSeq: 1 INVITE\r\nContent-Length: 0\r\n\r\n";
    let response = parse_response(raw).unwrap();
    let serialized = serialize_response(&response);
    let reparsed = parse_response(&serialized).unwrap();

    assert_eq!(response, reparsed);
}

#[test]
fn rejects_non_numeric_expires() {
    let raw = b"INVITE sip:bob@example.com SIP/2.0\r\nVia: SIP/2.0/UDP host\r\nExpires: soon\r\nContent-Length: 0\r\n\r\n";
    assert!(parse_request(raw).is_err());
}
