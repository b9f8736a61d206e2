//! Contract Test: Existing Records Are Left Alone
//!
//! Constraints verified:
//! - A record whose normalized name and type match is reported as existing
//! - Matching is trailing-dot insensitive
//! - An existing record never triggers provisioning or a create call
//! - Exactly one start-key lookup (max 1 item) is made per invocation

mod common;

use common::*;
use zonewarden_core::traits::{DnsRecord, LogLevel, RecordType};
use zonewarden_core::{ReconcileOutcome, ReconciliationRequest};

#[tokio::test]
async fn fully_qualified_match_reports_already_exists() {
    let dns = MockDnsProvider::returning(vec![cname_record(
        "foo.example.com.",
        "foo.herokudns.com",
    )]);
    let sink = RecordingLogSink::new();

    let outcome = reconciler(&dns, None, &sink)
        .reconcile("foo.example.com")
        .await
        .expect("reconcile succeeds");

    assert_eq!(outcome, ReconcileOutcome::AlreadyExists);
    assert_eq!(dns.create_call_count(), 0, "existing record must not be created");
    assert_eq!(
        sink.lines(),
        vec![(LogLevel::Info, "Record foo.example.com already exists.".to_string())]
    );
}

#[tokio::test]
async fn request_with_trailing_dot_matches_bare_record() {
    let dns = MockDnsProvider::returning(vec![cname_record("foo.example.com", "x.herokudns.com")]);
    let sink = RecordingLogSink::new();

    let outcome = reconciler(&dns, None, &sink)
        .reconcile("foo.example.com.")
        .await
        .unwrap();

    assert_eq!(outcome, ReconcileOutcome::AlreadyExists);
}

#[tokio::test]
async fn existing_record_skips_provisioning_even_when_enabled() {
    let dns = MockDnsProvider::returning(vec![cname_record(
        "foo.example.com.",
        "foo.herokudns.com",
    )]);
    let provisioner = MockProvisioner::succeeding("new.herokudns.com");
    let sink = RecordingLogSink::new();

    let outcome = reconciler(&dns, Some(&provisioner), &sink)
        .reconcile("foo.example.com")
        .await
        .unwrap();

    assert_eq!(outcome, ReconcileOutcome::AlreadyExists);
    assert_eq!(provisioner.call_count(), 0);
    assert_eq!(dns.create_call_count(), 0);
}

#[tokio::test]
async fn lookup_is_a_single_start_key_query() {
    let dns = MockDnsProvider::returning(Vec::new());
    let sink = RecordingLogSink::new();

    reconciler(&dns, None, &sink)
        .reconcile("foo.example.com")
        .await
        .unwrap();

    assert_eq!(dns.lookup_call_count(), 1);
    assert_eq!(
        dns.lookups(),
        vec![(
            ZONE_ID.to_string(),
            "foo.example.com".to_string(),
            RecordType::Cname,
            1
        )]
    );
}

#[tokio::test]
async fn same_name_with_other_type_is_not_a_match() {
    let dns = MockDnsProvider::returning(vec![DnsRecord {
        name: "foo.example.com.".to_string(),
        record_type: RecordType::A,
        ttl: Some(300),
        value: Some("192.0.2.10".to_string()),
    }]);
    let sink = RecordingLogSink::new();

    let outcome = reconciler(&dns, None, &sink)
        .reconcile("foo.example.com")
        .await
        .unwrap();

    assert_ne!(outcome, ReconcileOutcome::AlreadyExists);
}

#[tokio::test]
async fn handler_returns_200_with_message_body() {
    let dns = MockDnsProvider::returning(vec![cname_record(
        "foo.example.com.",
        "foo.herokudns.com",
    )]);
    let sink = RecordingLogSink::new();

    let response = reconciler(&dns, None, &sink)
        .handle(&ReconciliationRequest::new("foo.example.com"))
        .await;

    assert_eq!(response.status_code, 200);
    let body: String = serde_json::from_str(&response.body).unwrap();
    assert_eq!(body, "Record foo.example.com already exists.");
    assert!(sink.errors().is_empty());
}
