// src/message/mod.rs

//! The message model: one immutable value per emitted event
//!
//! A [`Message`] is constructed once from a kind and a JSON body, validated
//! against the kind's schema contract before anything else happens, and
//! never mutated afterwards. Failed validation never yields a partially
//! constructed message, so a transport that only publishes constructed
//! messages can never publish an invalid body.
//!
//! All projections (summary, body text, usernames, packages, url) are pure
//! reads over the validated body; the update view and the derived name
//! sets are computed eagerly in the constructor. Messages hold no shared
//! or interior-mutable state and are freely usable across threads.

mod kind;
mod render;
mod schemas;

pub use kind::{MessageKind, TOPIC_PREFIX};
pub use schemas::SCHEMA_URL;

use crate::error::{Error, Result};
use crate::schema::Schema;
use crate::views::Update;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt;
use strum_macros::Display;
use tracing::debug;

/// Base URL updates are browsable under; [`Message::url`] links here
pub const UPDATES_URL: &str = "https://herald.example.com/updates";

/// Priority classification attached to a message
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Severity {
    Debug,
    #[default]
    Info,
    Warning,
    Error,
}

/// A validated, immutable notification message
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    kind: MessageKind,
    body: Value,
    update: Option<Update>,
    usernames: Vec<String>,
    packages: Vec<String>,
}

impl Message {
    /// Construct a message of `kind` from an inbound payload
    ///
    /// Fails fast: the body must satisfy the kind's schema contract and
    /// every referenced build NVR must decompose into name, version and
    /// release. The payload is stored as given and never mutated.
    pub fn new(kind: MessageKind, body: Value) -> Result<Self> {
        kind.schema().validate(&body)?;

        let update = if kind.carries_update() {
            let path = kind.update_path();
            let raw = value_at(&body, path);
            let update: Update =
                serde_json::from_value(raw.clone()).map_err(|err| Error::SchemaViolation {
                    path: format!("$.{}", path.join(".")),
                    reason: err.to_string(),
                })?;
            // Reject malformed build identifiers here rather than from an
            // accessor later.
            update.packages()?;
            Some(update)
        } else {
            None
        };

        let usernames = derive_usernames(kind, &body, update.as_ref());
        let packages = derive_packages(kind, &body, update.as_ref())?;

        debug!(topic = kind.topic(), "message payload validated");
        Ok(Self {
            kind,
            body,
            update,
            usernames,
            packages,
        })
    }

    /// The event type of this message
    pub fn kind(&self) -> MessageKind {
        self.kind
    }

    /// The dotted topic this message is published under
    pub fn topic(&self) -> &'static str {
        self.kind.topic()
    }

    /// The severity of this message
    pub fn severity(&self) -> Severity {
        self.kind.severity()
    }

    /// The schema contract this message's body satisfies
    pub fn schema(&self) -> Schema {
        self.kind.schema()
    }

    /// The validated payload, exactly as it was handed in
    pub fn body(&self) -> &Value {
        &self.body
    }

    /// The update referenced by this message, when its kind carries one
    pub fn update(&self) -> Option<&Update> {
        self.update.as_ref()
    }

    /// A deep link to the update this message is about
    pub fn url(&self) -> String {
        let alias = match self.kind {
            MessageKind::ReadyForTestingV1 | MessageKind::ReadyForTestingV2 => {
                value_at(&self.body, &["artifact", "id"]).as_str()
            }
            _ => self.update.as_ref().map(|update| update.alias.as_str()),
        };
        format!("{}/{}", UPDATES_URL, alias.unwrap_or_default())
    }

    /// The user whose action caused this message, when determinable
    pub fn agent_name(&self) -> Option<&str> {
        match self.kind {
            MessageKind::CommentAdded => {
                value_at(&self.body, &["comment", "user", "name"]).as_str()
            }
            _ => self.body["agent"].as_str(),
        }
    }

    /// Every user implicated by this message, deduplicated and ascending
    pub fn usernames(&self) -> &[String] {
        &self.usernames
    }

    /// Every distinct package name implicated, ascending
    pub fn packages(&self) -> &[String] {
        &self.packages
    }

    /// One-line human-readable digest, like an email subject
    pub fn summary(&self) -> String {
        render::summary(self)
    }

    /// Multi-line human-readable digest, like an email body
    pub fn render_body(&self) -> String {
        render::body_text(self)
    }

    /// The karma of the comment, for comment messages
    pub fn karma(&self) -> Option<i64> {
        value_at(&self.body, &["comment", "karma"]).as_i64()
    }

    /// The text of the comment, for comment messages
    pub fn comment_text(&self) -> Option<&str> {
        value_at(&self.body, &["comment", "text"]).as_str()
    }

    /// When the comment was left, for comment messages with a parseable
    /// RFC 3339 timestamp
    pub fn comment_timestamp(&self) -> Option<DateTime<FixedOffset>> {
        value_at(&self.body, &["comment", "timestamp"])
            .as_str()
            .and_then(|text| DateTime::parse_from_rfc3339(text).ok())
    }

    /// Bug ids added by the edit, for edit messages
    pub fn new_bugs(&self) -> Option<Vec<i64>> {
        self.body["new_bugs"]
            .as_array()
            .map(|bugs| bugs.iter().filter_map(Value::as_i64).collect())
    }

    /// Why the update was ejected, for eject messages
    pub fn eject_reason(&self) -> Option<&str> {
        match self.kind {
            MessageKind::Ejected => self.body["reason"].as_str(),
            _ => None,
        }
    }

    /// The repo the update was ejected from, for eject messages
    pub fn eject_repo(&self) -> Option<&str> {
        match self.kind {
            MessageKind::Ejected => self.body["repo"].as_str(),
            _ => None,
        }
    }

    /// Which karma threshold was reached, for karma-threshold messages
    pub fn karma_status(&self) -> Option<&str> {
        match self.kind {
            MessageKind::KarmaThresholdReached => self.body["status"].as_str(),
            _ => None,
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render_body())
    }
}

/// Walk `path` through the body; missing segments yield `Null`
fn value_at<'a>(body: &'a Value, path: &[&str]) -> &'a Value {
    let mut current = body;
    for segment in path {
        current = &current[*segment];
    }
    current
}

fn artifact_builds(body: &Value) -> &[Value] {
    value_at(body, &["artifact", "builds"])
        .as_array()
        .map(Vec::as_slice)
        .unwrap_or_default()
}

fn derive_usernames(kind: MessageKind, body: &Value, update: Option<&Update>) -> Vec<String> {
    let mut names = BTreeSet::new();
    match kind {
        MessageKind::ReadyForTestingV1 | MessageKind::ReadyForTestingV2 => {
            for build in artifact_builds(body) {
                if let Some(issuer) = build["issuer"].as_str() {
                    names.insert(issuer.to_string());
                }
            }
            if let Some(agent) = body["agent"].as_str() {
                names.insert(agent.to_string());
            }
        }
        MessageKind::CommentAdded => {
            if let Some(author) = value_at(body, &["comment", "user", "name"]).as_str() {
                names.insert(author.to_string());
            }
            if let Some(update) = update {
                names.insert(update.user.name.clone());
            }
        }
        _ => {
            if let Some(agent) = body["agent"].as_str() {
                names.insert(agent.to_string());
            }
            if let Some(update) = update {
                names.insert(update.user.name.clone());
            }
        }
    }
    names.into_iter().collect()
}

fn derive_packages(kind: MessageKind, body: &Value, update: Option<&Update>) -> Result<Vec<String>> {
    match kind {
        MessageKind::ReadyForTestingV1 | MessageKind::ReadyForTestingV2 => {
            let mut components = BTreeSet::new();
            for build in artifact_builds(body) {
                if let Some(component) = build["component"].as_str() {
                    components.insert(component.to_string());
                }
            }
            Ok(components.into_iter().collect())
        }
        _ => match update {
            Some(update) => update.packages(),
            None => Ok(Vec::new()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn update_value(owner: &str, nvrs: &[&str]) -> Value {
        json!({
            "alias": "HERALD-2024-abcde",
            "builds": nvrs.iter().map(|nvr| json!({"nvr": nvr})).collect::<Vec<_>>(),
            "user": {"name": owner},
            "status": "testing",
            "request": "testing",
            "release": {"name": "F40"},
        })
    }

    #[test]
    fn test_construction_rejects_missing_required_field() {
        let err = Message::new(MessageKind::RequestTesting, json!({"agent": "alice"})).unwrap_err();
        assert!(matches!(err, Error::SchemaViolation { .. }));
    }

    #[test]
    fn test_construction_rejects_malformed_nvr() {
        let body = json!({"agent": "alice", "update": update_value("bob", &["not-an-nvr"])});
        // no separators at all
        let body_bad = json!({"agent": "alice", "update": update_value("bob", &["justname"])});
        assert!(Message::new(MessageKind::RequestTesting, body).is_ok());
        assert_eq!(
            Message::new(MessageKind::RequestTesting, body_bad).unwrap_err(),
            Error::MalformedNvr("justname".to_string())
        );
    }

    #[test]
    fn test_body_is_not_mutated() {
        let body = json!({"agent": "alice", "update": update_value("bob", &["httpd-2.4.37-3.fc30"])});
        let message = Message::new(MessageKind::RequestStable, body.clone()).unwrap();
        assert_eq!(message.body(), &body);
    }

    #[test]
    fn test_usernames_sorted_and_deduplicated() {
        let body = json!({"agent": "bob", "update": update_value("bob", &["httpd-2.4.37-3.fc30"])});
        let message = Message::new(MessageKind::RequestRevoke, body).unwrap();
        assert_eq!(message.usernames(), ["bob"]);

        let body = json!({"agent": "zoe", "update": update_value("adam", &["httpd-2.4.37-3.fc30"])});
        let message = Message::new(MessageKind::RequestRevoke, body).unwrap();
        assert_eq!(message.usernames(), ["adam", "zoe"]);
    }

    #[test]
    fn test_url_links_to_alias() {
        let body = json!({"agent": "alice", "update": update_value("bob", &["httpd-2.4.37-3.fc30"])});
        let message = Message::new(MessageKind::RequestTesting, body).unwrap();
        assert_eq!(
            message.url(),
            "https://herald.example.com/updates/HERALD-2024-abcde"
        );
    }

    #[test]
    fn test_severity_display() {
        assert_eq!(Severity::Debug.to_string(), "DEBUG");
        assert_eq!(Severity::default(), Severity::Info);
    }

    #[test]
    fn test_message_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Message>();
        assert_send_sync::<Severity>();
        assert_send_sync::<MessageKind>();
    }
}
