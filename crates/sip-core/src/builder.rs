//! Message builder helpers (spec §4.8): branch/call-ID/tag generation
//! and dialog-aware request construction. Randomness is injected as
//! `&mut dyn RngCore` rather than drawn from a process-global generator,
//! so these functions stay pure given a handle.

use rand::Rng;

use crate::headers::contact::UriWithParams;
use crate::headers::cseq::CSeq;
use crate::headers::from_to::FromTo;
use crate::headers::method::Method;
use crate::headers::route::RouteSet;
use crate::headers::via::Via;
use crate::request::Request;
use crate::response::Response;

const BRANCH_MAGIC_COOKIE: &str = "z9hG4bK";
const ALPHANUMERIC_LOWER: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

fn random_hex(rng: &mut dyn rand::RngCore, bytes: usize) -> String {
    let mut buf = vec![0u8; bytes];
    rng.fill_bytes(&mut buf);
    buf.iter().map(|b| format!("{b:02x}")).collect()
}

/// `z9hG4bK` + a UUID-derived hex string (spec §4.8).
pub fn new_branch(rng: &mut dyn rand::RngCore) -> String {
    format!("{BRANCH_MAGIC_COOKIE}{}", random_hex(rng, 16))
}

/// A UUID-derived hex string used as Call-ID (spec §4.8).
pub fn new_call_id(rng: &mut dyn rand::RngCore) -> String {
    random_hex(rng, 16)
}

/// Ten random lowercase alphanumeric characters (spec §4.8).
pub fn new_tag(rng: &mut dyn rand::RngCore) -> String {
    (0..10).map(|_| ALPHANUMERIC_LOWER[rng.gen_range(0..ALPHANUMERIC_LOWER.len())] as char).collect()
}

/// Build a fresh out-of-dialog request: a new branch, Call-ID, From tag,
/// and CSeq 1, ready for the caller to fill in any remaining headers.
pub fn build_basic_request(
    method: Method,
    request_uri: crate::uri::Uri,
    from: FromTo,
    to: FromTo,
    via_host: impl Into<String>,
    rng: &mut dyn rand::RngCore,
) -> Request {
    let mut request = Request::new(method.clone(), request_uri);
    request.headers.call_id = Some(new_call_id(rng));
    let mut from = from;
    if from.tag().is_none() {
        from.set_tag(new_tag(rng));
    }
    request.headers.from = Some(from);
    request.headers.to = Some(to);
    request.headers.max_forwards = Some(70);
    let mut via = Via::new(crate::transport::Protocol::Udp, via_host);
    via.set_branch(new_branch(rng));
    request.headers.via.push_top(via);
    request.headers.cseq = Some(CSeq::new(1, method));
    request
}

/// Build the ACK for a final response. A 2xx response gets a fresh
/// branch on a new Via (the ACK is itself a new transaction); any other
/// final response reuses the INVITE's top Via branch (spec §4.8).
pub fn build_ack(invite: &Request, response: &Response, rng: &mut dyn rand::RngCore) -> Request {
    let mut ack = Request::new(Method::Ack, invite.uri.copy_of());
    ack.headers.call_id = invite.headers.call_id.clone();
    ack.headers.from = invite.headers.from.clone();
    ack.headers.to = response_to_or_invite_to(invite, response);
    ack.headers.max_forwards = Some(70);

    let mut via = invite
        .headers
        .via
        .top()
        .cloned()
        .unwrap_or_else(|| Via::new(crate::transport::Protocol::Udp, "unknown"));
    if response.is_success() {
        via.set_branch(new_branch(rng));
    }
    ack.headers.via.push_top(via);

    let sequence = invite.headers.cseq.as_ref().map(|c| c.sequence).unwrap_or(1);
    ack.headers.cseq = Some(CSeq::new(sequence, Method::Ack));
    ack
}

fn response_to_or_invite_to(invite: &Request, response: &Response) -> Option<FromTo> {
    response.headers.to.clone().or_else(|| invite.headers.to.clone())
}

/// Build a CANCEL for a pending INVITE: same branch and CSeq number as
/// the INVITE, with the CSeq method changed to CANCEL (spec §4.8).
pub fn build_cancel(invite: &Request) -> Request {
    let mut cancel = Request::new(Method::Cancel, invite.uri.copy_of());
    cancel.headers.call_id = invite.headers.call_id.clone();
    cancel.headers.from = invite.headers.from.clone();
    cancel.headers.to = invite.headers.to.clone();
    cancel.headers.max_forwards = Some(70);
    if let Some(top) = invite.headers.via.top() {
        cancel.headers.via.push_top(top.clone());
    }
    let sequence = invite.headers.cseq.as_ref().map(|c| c.sequence).unwrap_or(1);
    cancel.headers.cseq = Some(CSeq::new(sequence, Method::Cancel));
    cancel
}

/// Build the 200 OK to an INVITE, setting a fresh To tag (spec §4.8).
pub fn build_ok_to_invite(invite: &Request, contact: UriWithParams, rng: &mut dyn rand::RngCore) -> Response {
    let mut ok = Response::new(200, "OK");
    ok.headers.call_id = invite.headers.call_id.clone();
    ok.headers.from = invite.headers.from.clone();
    let mut to = invite.headers.to.clone().unwrap_or_else(|| FromTo::new(invite.uri.copy_of()));
    if to.tag().is_none() {
        to.set_tag(new_tag(rng));
    }
    ok.headers.to = Some(to);
    ok.headers.cseq = invite.headers.cseq.clone();
    for via in invite.headers.via.iter().cloned().collect::<Vec<_>>().into_iter().rev() {
        ok.headers.via.push_top(via);
    }
    ok.headers.contact = Some(crate::headers::contact::ContactList {
        entries: Some(vec![crate::headers::contact::ContactEntry { display_name: None, uri: contact.uri, params: contact.params }]),
    });
    ok
}

/// Build the 200 OK to a BYE or CANCEL: no body, preserving dialog
/// identifiers and Via set verbatim (spec §4.8).
pub fn build_ok_to_bye_or_cancel(request: &Request) -> Response {
    let mut ok = Response::new(200, "OK");
    ok.headers.call_id = request.headers.call_id.clone();
    ok.headers.from = request.headers.from.clone();
    ok.headers.to = request.headers.to.clone();
    ok.headers.cseq = request.headers.cseq.clone();
    for via in request.headers.via.iter().cloned().collect::<Vec<_>>().into_iter().rev() {
        ok.headers.via.push_top(via);
    }
    ok
}

/// Build BYE for an established dialog. `incoming` is true when the
/// original INVITE arrived (rather than was sent) at this endpoint, in
/// which case the dialog's To/From are swapped to reflect the new
/// request's direction (spec §4.8).
pub fn build_bye(
    dialog_local: &FromTo,
    dialog_remote: &FromTo,
    call_id: &str,
    record_route: &RouteSet,
    remote_target: crate::uri::Uri,
    cseq_number: u32,
    incoming: bool,
    rng: &mut dyn rand::RngCore,
) -> Request {
    let mut bye = Request::new(Method::Bye, remote_target);
    bye.headers.call_id = Some(call_id.to_string());
    if incoming {
        bye.headers.from = Some(dialog_remote.clone());
        bye.headers.to = Some(dialog_local.clone());
    } else {
        bye.headers.from = Some(dialog_local.clone());
        bye.headers.to = Some(dialog_remote.clone());
    }
    bye.headers.max_forwards = Some(70);
    let mut via = Via::new(crate::transport::Protocol::Udp, "unknown");
    via.set_branch(new_branch(rng));
    bye.headers.via.push_top(via);
    bye.headers.cseq = Some(CSeq::new(cseq_number, Method::Bye));
    if !record_route.is_empty() {
        bye.headers.route = Some(RouteSet::reversed_from_record_route(record_route));
    }
    bye
}

/// Resolve the remote target URI for an in-dialog request: top
/// Record-Route if it is a strict router (no `lr` parameter), else top
/// Contact, else the From URI (spec §4.8).
pub fn resolve_remote_target(
    record_route: &RouteSet,
    contact: Option<&UriWithParams>,
    from: &FromTo,
) -> crate::uri::Uri {
    if let Some(top) = record_route.top() {
        if !top.params.contains("lr") {
            return top.uri.copy_of();
        }
    }
    if let Some(contact) = contact {
        return contact.uri.copy_of();
    }
    from.uri.copy_of()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn rng() -> rand::rngs::StdRng {
        rand::rngs::StdRng::seed_from_u64(42)
    }

    #[test]
    fn branch_carries_magic_cookie() {
        let branch = new_branch(&mut rng());
        assert!(branch.starts_with("z9hG4bK"));
    }

    #[test]
    fn tag_is_ten_lowercase_alphanumeric_chars() {
        let tag = new_tag(&mut rng());
        assert_eq!(tag.len(), 10);
        assert!(tag.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }

    #[test]
    fn cancel_reuses_invite_branch_and_number_but_changes_method() {
        let raw = b"INVITE sip:bob@biloxi.com SIP/2.0\r\nVia: SIP/2.0/UDP pc33.atlanta.com;branch=z9hG4bK776asdhds\r\nMax-Forwards: 70\r\nTo: Bob <sip:bob@biloxi.com>\r\nFrom: Alice <sip:alice@atlanta.com>;tag=1928301774\r\nCall-ID: a84b4c76e66710@pc33.atlanta.com\r\nCSeq: 314159 INVITE\r\nContent-Length: 0\r\n\r\n";
        let invite = Request::parse(raw).unwrap();
        let cancel = build_cancel(&invite);
        assert_eq!(cancel.headers.via.top().unwrap().branch(), invite.headers.via.top().unwrap().branch());
        assert_eq!(cancel.headers.cseq.as_ref().unwrap().sequence, 314159);
        assert_eq!(cancel.headers.cseq.as_ref().unwrap().method, Method::Cancel);
    }

    #[test]
    fn strict_router_record_route_wins_over_contact() {
        let rr = RouteSet::parse_header_value("<sip:p1@h1>").unwrap();
        let contact = UriWithParams::parse("<sip:bob@biloxi.com>").unwrap();
        let from = FromTo::new(crate::uri::parse_uri("sip:alice@atlanta.com").unwrap());
        let target = resolve_remote_target(&rr, Some(&contact), &from);
        assert_eq!(target.host.to_string(), "h1");
    }

    #[test]
    fn loose_router_record_route_defers_to_contact() {
        let rr = RouteSet::parse_header_value("<sip:p1@h1>;lr").unwrap();
        let contact = UriWithParams::parse("<sip:bob@biloxi.com>").unwrap();
        let from = FromTo::new(crate::uri::parse_uri("sip:alice@atlanta.com").unwrap());
        let target = resolve_remote_target(&rr, Some(&contact), &from);
        assert_eq!(target.host.to_string(), "biloxi.com");
    }
}
