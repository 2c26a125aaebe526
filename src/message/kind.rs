// src/message/kind.rs

//! The closed set of message kinds
//!
//! One tag per distinct business event. Each kind binds exactly one topic
//! and one schema contract; two kinds may share a topic when they are two
//! wire versions of the same logical event (edit, ready-for-testing), in
//! which case they are distinguished by body shape alone.

use super::schemas;
use super::Severity;
use crate::schema::Schema;
use strum_macros::EnumIter;

/// Topic prefix shared by every message the update tracker emits
pub const TOPIC_PREFIX: &str = "herald.update";

/// Every event type the update tracker can emit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum MessageKind {
    /// A comment was added to an update
    CommentAdded,
    /// An update finished its push to the testing repository
    PushCompleteTesting,
    /// An update finished its push to the stable repository
    PushCompleteStable,
    /// An update was edited
    EditV1,
    /// An update was edited; also carries the added and removed builds
    EditV2,
    /// An update was ejected from a compose
    Ejected,
    /// An update reached one of its karma thresholds
    KarmaThresholdReached,
    /// An update was submitted to testing
    RequestTesting,
    /// An update was submitted to stable
    RequestStable,
    /// An update was requested to be unpushed
    RequestUnpush,
    /// An update was requested to be obsoleted
    RequestObsolete,
    /// An update's push request was revoked
    RequestRevoke,
    /// An update met the testing requirements for stable
    RequirementsMetStable,
    /// An update's builds are ready to be tested
    ReadyForTestingV1,
    /// An update's builds are ready to be tested; also carries the update
    ReadyForTestingV2,
}

impl MessageKind {
    /// The stable dotted topic this kind is published under
    ///
    /// Stable across wire versions of the same logical event: both edit
    /// versions share one topic, as do both ready-for-testing versions.
    pub fn topic(&self) -> &'static str {
        match self {
            MessageKind::CommentAdded => "herald.update.comment",
            MessageKind::PushCompleteTesting => "herald.update.complete.testing",
            MessageKind::PushCompleteStable => "herald.update.complete.stable",
            MessageKind::EditV1 | MessageKind::EditV2 => "herald.update.edit",
            MessageKind::Ejected => "herald.update.eject",
            MessageKind::KarmaThresholdReached => "herald.update.karma.threshold.reach",
            MessageKind::RequestTesting => "herald.update.request.testing",
            MessageKind::RequestStable => "herald.update.request.stable",
            MessageKind::RequestUnpush => "herald.update.request.unpush",
            MessageKind::RequestObsolete => "herald.update.request.obsolete",
            MessageKind::RequestRevoke => "herald.update.request.revoke",
            MessageKind::RequirementsMetStable => "herald.update.requirements_met.stable",
            MessageKind::ReadyForTestingV1 | MessageKind::ReadyForTestingV2 => {
                "herald.update.status.testing.koji-build-group.build.complete"
            }
        }
    }

    /// The severity messages of this kind carry
    pub fn severity(&self) -> Severity {
        match self {
            MessageKind::ReadyForTestingV1 | MessageKind::ReadyForTestingV2 => Severity::Debug,
            _ => Severity::Info,
        }
    }

    /// The schema contract bodies of this kind must satisfy
    pub fn schema(&self) -> Schema {
        match self {
            MessageKind::CommentAdded => schemas::comment_added(),
            MessageKind::PushCompleteTesting => schemas::push_complete_testing(),
            MessageKind::PushCompleteStable => schemas::push_complete_stable(),
            MessageKind::EditV1 => schemas::edit_v1(),
            MessageKind::EditV2 => schemas::edit_v2(),
            MessageKind::Ejected => schemas::ejected(),
            MessageKind::KarmaThresholdReached => schemas::karma_threshold_reached(),
            MessageKind::RequestTesting => schemas::request(MessageKind::RequestTesting, "tested"),
            MessageKind::RequestStable => schemas::request(MessageKind::RequestStable, "stable"),
            MessageKind::RequestUnpush => schemas::request(MessageKind::RequestUnpush, "unpushed"),
            MessageKind::RequestObsolete => {
                schemas::request(MessageKind::RequestObsolete, "obsoleted")
            }
            MessageKind::RequestRevoke => schemas::request(MessageKind::RequestRevoke, "revoked"),
            MessageKind::RequirementsMetStable => schemas::requirements_met_stable(),
            MessageKind::ReadyForTestingV1 => schemas::ready_for_testing_v1(),
            MessageKind::ReadyForTestingV2 => schemas::ready_for_testing_v2(),
        }
    }

    /// Whether bodies of this kind carry an update object
    pub(crate) fn carries_update(&self) -> bool {
        !matches!(self, MessageKind::ReadyForTestingV1)
    }

    /// Where the update object lives inside the body
    pub(crate) fn update_path(&self) -> &'static [&'static str] {
        match self {
            MessageKind::CommentAdded => &["comment", "update"],
            _ => &["update"],
        }
    }

    /// The final segment of the topic, used by the request renderers
    pub(crate) fn action(&self) -> &'static str {
        let topic = self.topic();
        topic.rsplit('.').next().unwrap_or(topic)
    }
}
