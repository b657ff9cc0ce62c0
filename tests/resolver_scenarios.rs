//! End-to-end exercises of the six concrete scenarios from the spec,
//! driven through the real `loader -> zone -> resolver` pipeline rather
//! than hand-built `ZoneRecord`s, so the loader's parsing and the
//! resolver's projection rules are both on the hook at once.

use std::sync::Arc;

use hickory_proto::op::ResponseCode;
use hickory_proto::rr::{Name, RData, RecordType};

use envdns::loader::load_records;
use envdns::resolver::Resolver;
use envdns::zone::Zone;

fn build_resolver(env: &[(&str, &str)]) -> Resolver {
    let pairs: Vec<(String, String)> = env
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    let records = load_records(pairs);
    let zone = Arc::new(Zone::from_records(records));
    Resolver::new(zone, None, None)
}

fn name(s: &str) -> Name {
    Name::from_ascii(s).unwrap()
}

#[tokio::test]
async fn scenario_1_exact_a_with_custom_ttl() {
    let r = build_resolver(&[("A_1", "example.com|192.168.1.1|300")]);
    let outcome = r
        .resolve_question(&name("example.com."), RecordType::A, 1)
        .await;
    assert_eq!(outcome.rcode, ResponseCode::NoError);
    assert!(outcome.authoritative);
    assert_eq!(outcome.answers.len(), 1);
    assert_eq!(outcome.answers[0].ttl(), 300);
    match outcome.answers[0].data() {
        Some(RData::A(ip)) => assert_eq!(ip.0.to_string(), "192.168.1.1"),
        other => panic!("expected an A answer, got {other:?}"),
    }
}

#[tokio::test]
async fn scenario_2_nodata_on_type_mismatch() {
    let r = build_resolver(&[("A_1", "example.com|192.168.1.1|300")]);
    let outcome = r
        .resolve_question(&name("example.com."), RecordType::AAAA, 1)
        .await;
    assert_eq!(outcome.rcode, ResponseCode::NoError);
    assert!(outcome.authoritative);
    assert!(outcome.answers.is_empty());
}

#[tokio::test]
async fn scenario_3_cname_chain_to_a() {
    let r = build_resolver(&[
        ("CNAME_1", "www.example.com|example.com"),
        ("A_1", "example.com|192.168.1.1"),
    ]);
    let outcome = r
        .resolve_question(&name("www.example.com."), RecordType::A, 1)
        .await;
    assert_eq!(outcome.answers.len(), 2);
    assert_eq!(outcome.answers[0].record_type(), RecordType::CNAME);
    assert_eq!(outcome.answers[0].name(), &name("www.example.com."));
    assert_eq!(outcome.answers[1].record_type(), RecordType::A);
    assert_eq!(outcome.answers[1].name(), &name("www.example.com."));
}

#[tokio::test]
async fn scenario_4_wildcard_is_single_level() {
    let r = build_resolver(&[("A_1", "*.example.com|192.168.1.2")]);

    let hit = r
        .resolve_question(&name("anything.example.com."), RecordType::A, 1)
        .await;
    assert_eq!(hit.answers.len(), 1);
    match hit.answers[0].data() {
        Some(RData::A(ip)) => assert_eq!(ip.0.to_string(), "192.168.1.2"),
        other => panic!("expected an A answer, got {other:?}"),
    }

    let miss = r
        .resolve_question(&name("deeper.anything.example.com."), RecordType::A, 1)
        .await;
    assert_eq!(miss.rcode, ResponseCode::NXDomain);
}

#[tokio::test]
async fn scenario_5_mx_with_answer_section_glue() {
    let r = build_resolver(&[
        ("MX_1", "example.com|10|mail.example.com"),
        ("A_1", "mail.example.com|10.0.0.5"),
    ]);
    let outcome = r
        .resolve_question(&name("example.com."), RecordType::MX, 1)
        .await;
    assert_eq!(outcome.answers.len(), 2);
    match outcome.answers[0].data() {
        Some(RData::MX(mx)) => {
            assert_eq!(mx.preference(), 10);
            assert_eq!(mx.exchange(), &name("mail.example.com."));
        }
        other => panic!("expected an MX answer, got {other:?}"),
    }
    assert_eq!(outcome.answers[1].record_type(), RecordType::A);
    assert_eq!(outcome.answers[1].name(), &name("mail.example.com."));
}

#[tokio::test]
async fn scenario_6_relay_unreachable_is_nxdomain_without_relay_configured() {
    // No DNS_RELAY_SERVERS declared at all: the miss path has nowhere to
    // forward to, so it's NXDOMAIN without ever touching the network.
    let r = build_resolver(&[]);
    let outcome = r.resolve_question(&name("foo.test."), RecordType::A, 1).await;
    assert_eq!(outcome.rcode, ResponseCode::NXDomain);
    assert!(outcome.authoritative);
}

#[tokio::test]
async fn malformed_mx_priority_leaves_owner_with_no_records() {
    let r = build_resolver(&[("MX_1", "example.com|not-a-number|mail.example.com")]);
    let outcome = r
        .resolve_question(&name("example.com."), RecordType::MX, 1)
        .await;
    assert_eq!(outcome.rcode, ResponseCode::NXDomain);
}

#[tokio::test]
async fn service_backed_a_record_without_a_service_resolver_is_dropped() {
    // A service-label A record with no ServiceResolver configured (the
    // resolver built here passes `None`) drops silently rather than
    // panicking or emitting a bogus answer.
    let r = build_resolver(&[("A_1", "app.example.com|service:web")]);
    let outcome = r
        .resolve_question(&name("app.example.com."), RecordType::A, 1)
        .await;
    assert_eq!(outcome.rcode, ResponseCode::NoError);
    assert!(outcome.answers.is_empty());
}
