// tests/messages.rs

//! End-to-end message construction, rendering and evolution tests.

use herald_messages::{
    Build, Error, Message, MessageKind, Severity, BUILDS_SUMMARY_MAX_LEN, TRUNCATION_MARKER,
};
use serde_json::{json, Value};
use strum::IntoEnumIterator;

/// An update body fragment owned by `owner` with the given build NVRs
fn update_value(owner: &str, nvrs: &[&str]) -> Value {
    json!({
        "alias": "FEDORA-2024-abcde",
        "builds": nvrs.iter().map(|nvr| json!({"nvr": nvr})).collect::<Vec<_>>(),
        "user": {"name": owner},
        "status": "testing",
        "request": "testing",
        "release": {"name": "F40"},
    })
}

fn ready_for_testing_v1_value() -> Value {
    json!({
        "contact": {
            "name": "Release Engineering",
            "team": "Release Engineering",
            "docs": "https://docs.example.com/gating",
            "email": "releng@lists.example.com",
        },
        "artifact": {
            "id": "FEDORA-2024-abcde",
            "type": "rpm-build-group",
            "builds": [
                {
                    "type": "koji-build",
                    "id": 442562,
                    "task_id": null,
                    "component": "httpd",
                    "issuer": "bob",
                    "scratch": false,
                    "nvr": "httpd-2.4.37-3.fc30",
                },
                {
                    "type": "koji-build",
                    "id": 442563,
                    "task_id": 9954,
                    "component": "zsh",
                    "issuer": "adam",
                    "scratch": false,
                    "nvr": "zsh-5.9-1.fc40",
                },
            ],
            "repository": "https://repos.example.com/side-tags/f40-build",
            "release": "f40",
        },
        "generated_at": "2024-05-01T12:00:00Z",
        "version": "0.2.2",
        "agent": "alice",
    })
}

fn ready_for_testing_v2_value() -> Value {
    let mut body = ready_for_testing_v1_value();
    body["update"] = update_value("bob", &["httpd-2.4.37-3.fc30", "zsh-5.9-1.fc40"]);
    body
}

/// A valid payload for every message kind
fn payload_for(kind: MessageKind) -> Value {
    let update = update_value("bob", &["httpd-2.4.37-3.fc30"]);
    match kind {
        MessageKind::CommentAdded => json!({
            "comment": {
                "karma": 1,
                "text": "works great",
                "timestamp": "2024-05-01T12:00:00+00:00",
                "update": update,
                "user": {"name": "carol"},
            }
        }),
        MessageKind::PushCompleteTesting
        | MessageKind::PushCompleteStable
        | MessageKind::RequirementsMetStable => json!({"update": update}),
        MessageKind::EditV1 => json!({
            "agent": "alice",
            "new_bugs": [2224460, 2224461],
            "update": update,
        }),
        MessageKind::EditV2 => json!({
            "agent": "alice",
            "new_bugs": [2224460],
            "new_builds": ["httpd-2.4.37-3.fc30"],
            "removed_builds": [],
            "update": update,
        }),
        MessageKind::Ejected => json!({
            "reason": "broken dependency",
            "repo": "f40-updates",
            "update": update,
        }),
        MessageKind::KarmaThresholdReached => json!({"status": "stable", "update": update}),
        MessageKind::RequestTesting
        | MessageKind::RequestStable
        | MessageKind::RequestUnpush
        | MessageKind::RequestObsolete
        | MessageKind::RequestRevoke => json!({"agent": "alice", "update": update}),
        MessageKind::ReadyForTestingV1 => ready_for_testing_v1_value(),
        MessageKind::ReadyForTestingV2 => ready_for_testing_v2_value(),
    }
}

#[test]
fn test_every_kind_constructs_from_a_valid_payload() {
    for kind in MessageKind::iter() {
        let body = payload_for(kind);
        let message = Message::new(kind, body.clone())
            .unwrap_or_else(|err| panic!("{kind:?} rejected a valid payload: {err}"));
        assert_eq!(message.body(), &body, "{kind:?} mutated its payload");
        assert!(!message.summary().is_empty(), "{kind:?} has an empty summary");
        assert!(
            !message.render_body().is_empty(),
            "{kind:?} has an empty body text"
        );
        assert!(message.url().starts_with("https://"), "{kind:?} url malformed");
    }
}

#[test]
fn test_every_kind_rejects_an_empty_payload() {
    for kind in MessageKind::iter() {
        let result = Message::new(kind, json!({}));
        assert!(
            matches!(result, Err(Error::SchemaViolation { .. })),
            "{kind:?} accepted an empty payload"
        );
    }
}

#[test]
fn test_usernames_are_sorted_and_deduplicated() {
    for kind in MessageKind::iter() {
        let message = Message::new(kind, payload_for(kind)).unwrap();
        let usernames = message.usernames();
        let mut sorted = usernames.to_vec();
        sorted.sort();
        sorted.dedup();
        assert_eq!(usernames, sorted.as_slice(), "{kind:?} usernames not sorted/unique");
    }
}

#[test]
fn test_comment_usernames_include_commenter_and_owner() {
    let message = Message::new(
        MessageKind::CommentAdded,
        payload_for(MessageKind::CommentAdded),
    )
    .unwrap();
    assert_eq!(message.usernames(), ["bob", "carol"]);
    assert_eq!(message.agent_name(), Some("carol"));
}

#[test]
fn test_packages_derived_from_nvrs() {
    let body = json!({
        "agent": "alice",
        "update": update_value(
            "bob",
            &["zsh-5.9-1.fc40", "httpd-2.4.37-3.fc30", "httpd-2.4.38-1.fc30"],
        ),
    });
    let message = Message::new(MessageKind::RequestStable, body).unwrap();
    assert_eq!(message.packages(), ["httpd", "zsh"]);
}

#[test]
fn test_ready_for_testing_packages_and_usernames() {
    let message = Message::new(MessageKind::ReadyForTestingV1, ready_for_testing_v1_value())
        .unwrap();
    assert_eq!(message.packages(), ["httpd", "zsh"]);
    // build issuers plus the agent
    assert_eq!(message.usernames(), ["adam", "alice", "bob"]);
    assert_eq!(message.severity(), Severity::Debug);
    assert_eq!(
        message.url(),
        "https://herald.example.com/updates/FEDORA-2024-abcde"
    );
}

#[test]
fn test_request_testing_summary_phrasing() {
    let body = json!({
        "agent": "alice",
        "update": update_value("bob", &["httpd-2.4.37-3.fc30"]),
    });
    let message = Message::new(MessageKind::RequestTesting, body).unwrap();
    assert_eq!(
        message.summary(),
        "alice submitted bob's update FEDORA-2024-abcde (httpd-2.4.37-3.fc30) to testing"
    );
}

#[test]
fn test_request_revoke_by_owner_uses_their_and_past_tense() {
    let body = json!({
        "agent": "bob",
        "update": update_value("bob", &["httpd-2.4.37-3.fc30"]),
    });
    let message = Message::new(MessageKind::RequestRevoke, body).unwrap();
    assert_eq!(
        message.summary(),
        "bob revoked their update FEDORA-2024-abcde (httpd-2.4.37-3.fc30)"
    );
}

#[test]
fn test_summary_build_list_is_truncated() {
    let nvrs = [
        "httpd-2.4.37-3.fc30",
        "kernel-6.8.9-300.fc40",
        "zsh-5.9-1.fc40",
        "vim-9.1.158-1.fc40",
    ];
    let body = json!({"agent": "alice", "update": update_value("bob", &nvrs)});
    let message = Message::new(MessageKind::RequestStable, body).unwrap();
    let summary = message.summary();
    let start = summary.find('(').expect("summary has a build list") + 1;
    let end = summary.rfind(')').expect("summary has a build list");
    let fragment = &summary[start..end];
    assert!(fragment.chars().count() <= BUILDS_SUMMARY_MAX_LEN);
    assert!(fragment.ends_with(TRUNCATION_MARKER));
}

#[test]
fn test_edit_v1_payload_fails_the_v2_schema() {
    // v1 payloads lack the builds fields v2 requires
    let body = payload_for(MessageKind::EditV1);
    assert!(MessageKind::EditV1.schema().validate(&body).is_ok());
    assert!(MessageKind::EditV2.schema().validate(&body).is_err());
}

#[test]
fn test_additive_evolution_edit() {
    // a consumer built against v1 parses a v2 payload's common fields
    let body = payload_for(MessageKind::EditV2);
    assert!(MessageKind::EditV2.schema().validate(&body).is_ok());
    assert!(MessageKind::EditV1.schema().validate(&body).is_ok());
}

#[test]
fn test_additive_evolution_ready_for_testing() {
    let body = ready_for_testing_v2_value();
    assert!(MessageKind::ReadyForTestingV2.schema().validate(&body).is_ok());
    assert!(MessageKind::ReadyForTestingV1.schema().validate(&body).is_ok());
}

#[test]
fn test_comment_rendering() {
    let message = Message::new(
        MessageKind::CommentAdded,
        payload_for(MessageKind::CommentAdded),
    )
    .unwrap();
    assert_eq!(
        message.summary(),
        "carol commented on update httpd-2.4.37-3.fc30 (karma: 1)"
    );
    let text = message.render_body();
    assert!(text.starts_with("carol commented on bob's update FEDORA-2024-abcde with karma 1:"));
    assert!(text.contains("works great"));
    assert!(text.ends_with("Builds:\nhttpd-2.4.37-3.fc30"));
    // Display mirrors the body text
    assert_eq!(message.to_string(), text);
    assert!(message.comment_timestamp().is_some());
}

#[test]
fn test_push_complete_summary() {
    let message = Message::new(
        MessageKind::PushCompleteTesting,
        payload_for(MessageKind::PushCompleteTesting),
    )
    .unwrap();
    assert_eq!(
        message.summary(),
        "bob's httpd-2.4.37-3.fc30 update completed push to testing"
    );
}

#[test]
fn test_eject_summary_carries_repo_and_reason() {
    let message =
        Message::new(MessageKind::Ejected, payload_for(MessageKind::Ejected)).unwrap();
    assert_eq!(
        message.summary(),
        "bob's httpd-2.4.37-3.fc30 update was ejected from the f40-updates compose. \
         Reason: \"broken dependency\""
    );
    assert_eq!(message.eject_repo(), Some("f40-updates"));
    assert_eq!(message.eject_reason(), Some("broken dependency"));
}

#[test]
fn test_edit_v2_body_counts_builds() {
    let message = Message::new(MessageKind::EditV2, payload_for(MessageKind::EditV2)).unwrap();
    assert_eq!(
        message.render_body(),
        "alice edited FEDORA-2024-abcde adding 1 new bug(s), adding 1 build(s), \
         and removing 0 build(s)"
    );
}

#[test]
fn test_malformed_nvr_fails_construction() {
    let body = json!({"agent": "alice", "update": update_value("bob", &["httpd"])});
    assert_eq!(
        Message::new(MessageKind::RequestTesting, body).unwrap_err(),
        Error::MalformedNvr("httpd".to_string())
    );
}

#[test]
fn test_build_nvr_scenario() {
    let build = Build::new("httpd-2.4.37-3.fc30");
    assert_eq!(build.package_name().unwrap(), "httpd");
    assert_eq!(build.version().unwrap(), "2.4.37");
    assert_eq!(build.release().unwrap(), "3.fc30");
}
