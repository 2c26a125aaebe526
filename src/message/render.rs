// src/message/render.rs

//! Human-readable digests for each message kind
//!
//! Renderers are pure functions over an already-validated body: a field a
//! template references is guaranteed present by the schema contract, so a
//! missing field here is a defect in the variant definition, not a runtime
//! condition. The request kinds share one template selected by the final
//! topic segment: unpush/obsolete/revoke phrase as a past-tense verb, the
//! rest as a submission to a target repository.

use super::kind::MessageKind;
use super::{artifact_builds, value_at, Message};
use crate::text::{past_tense, truncate};
use crate::views::Update;
use serde_json::Value;

pub(crate) fn summary(message: &Message) -> String {
    let body = message.body();
    match message.kind() {
        MessageKind::ReadyForTestingV1 => format!(
            "{}'s {} update is ready for testing",
            value_at(body, &["contact", "name"]).as_str().unwrap_or_default(),
            artifact_builds_summary(body),
        ),
        MessageKind::ReadyForTestingV2 => format!(
            "{}'s {} update is ready for testing",
            value_at(body, &["update", "user", "name"]).as_str().unwrap_or_default(),
            artifact_builds_summary(body),
        ),
        kind => {
            let Some(update) = message.update() else {
                return String::new();
            };
            let builds = builds_summary(update);
            let owner = update.user.name.as_str();
            let agent = message.agent_name().unwrap_or_default();
            match kind {
                MessageKind::CommentAdded => format!(
                    "{} commented on update {} (karma: {})",
                    agent,
                    builds,
                    message.karma().unwrap_or_default(),
                ),
                MessageKind::PushCompleteTesting | MessageKind::PushCompleteStable => format!(
                    "{}'s {} update completed push to {}",
                    owner, builds, update.status,
                ),
                MessageKind::EditV1 | MessageKind::EditV2 => format!(
                    "{} edited {} update {} ({})",
                    agent,
                    owner_qual(agent, owner),
                    update.alias,
                    builds,
                ),
                MessageKind::Ejected => format!(
                    "{}'s {} update was ejected from the {} compose. Reason: \"{}\"",
                    owner,
                    builds,
                    message.eject_repo().unwrap_or_default(),
                    message.eject_reason().unwrap_or_default(),
                ),
                MessageKind::KarmaThresholdReached => format!(
                    "{}'s {} update has reached the {} karma threshold",
                    owner,
                    builds,
                    message.karma_status().unwrap_or_default(),
                ),
                MessageKind::RequestTesting
                | MessageKind::RequestStable
                | MessageKind::RequestUnpush
                | MessageKind::RequestObsolete
                | MessageKind::RequestRevoke => {
                    request_summary(kind, agent, owner, &update.alias, &builds)
                }
                MessageKind::RequirementsMetStable => format!(
                    "{}'s {} update has met stable testing requirements",
                    owner, builds,
                ),
                _ => String::new(),
            }
        }
    }
}

pub(crate) fn body_text(message: &Message) -> String {
    let body = message.body();
    match message.kind() {
        MessageKind::ReadyForTestingV1 => format!(
            "{}'s update is ready for testing\nBuilds:\n{}",
            value_at(body, &["contact", "name"]).as_str().unwrap_or_default(),
            artifact_build_lines(body),
        ),
        MessageKind::ReadyForTestingV2 => format!(
            "{}'s update is ready for testing\nBuilds:\n{}",
            value_at(body, &["update", "user", "name"]).as_str().unwrap_or_default(),
            artifact_build_lines(body),
        ),
        kind => {
            let Some(update) = message.update() else {
                return String::new();
            };
            let owner = update.user.name.as_str();
            let agent = message.agent_name().unwrap_or_default();
            match kind {
                MessageKind::CommentAdded => format!(
                    "{} commented on {}'s update {} with karma {}:\n\n{}\n\nBuilds:\n{}",
                    agent,
                    owner,
                    update.alias,
                    message.karma().unwrap_or_default(),
                    message.comment_text().unwrap_or_default(),
                    build_lines(update),
                ),
                MessageKind::PushCompleteTesting | MessageKind::PushCompleteStable => format!(
                    "{}'s update {} completed push to {}\nBuilds:\n{}",
                    owner,
                    update.alias,
                    update.status,
                    build_lines(update),
                ),
                MessageKind::EditV1 => format!(
                    "{} edited {} adding {} new bugs",
                    agent,
                    update.alias,
                    message.new_bugs().unwrap_or_default().len(),
                ),
                MessageKind::EditV2 => format!(
                    "{} edited {} adding {} new bug(s), adding {} build(s), and removing {} build(s)",
                    agent,
                    update.alias,
                    message.new_bugs().unwrap_or_default().len(),
                    nvr_list_len(body, "new_builds"),
                    nvr_list_len(body, "removed_builds"),
                ),
                MessageKind::KarmaThresholdReached => format!(
                    "{}'s update {} has reached the {} karma threshold.\nBuilds:\n{}",
                    owner,
                    update.alias,
                    message.karma_status().unwrap_or_default(),
                    build_lines(update),
                ),
                MessageKind::RequestTesting
                | MessageKind::RequestStable
                | MessageKind::RequestUnpush
                | MessageKind::RequestObsolete
                | MessageKind::RequestRevoke => request_body(kind, agent, owner, update),
                MessageKind::RequirementsMetStable => format!(
                    "{}'s update {} has met stable testing requirements.\nBuilds:\n{}",
                    owner,
                    update.alias,
                    build_lines(update),
                ),
                // The eject body has no long form beyond its summary.
                _ => summary(message),
            }
        }
    }
}

/// "their" when the agent owns the update, else "<owner>'s"
fn owner_qual(agent: &str, owner: &str) -> String {
    if agent == owner {
        "their".to_string()
    } else {
        format!("{}'s", owner)
    }
}

/// Bounded space-joined build list for summaries
fn builds_summary(update: &Update) -> String {
    let nvrs: Vec<&str> = update.builds.iter().map(|build| build.nvr.as_str()).collect();
    truncate(&nvrs.join(" "))
}

/// One build NVR per line for body text
fn build_lines(update: &Update) -> String {
    let nvrs: Vec<&str> = update.builds.iter().map(|build| build.nvr.as_str()).collect();
    nvrs.join("\n")
}

fn artifact_nvrs(body: &Value) -> Vec<&str> {
    artifact_builds(body)
        .iter()
        .filter_map(|build| build["nvr"].as_str())
        .collect()
}

fn artifact_builds_summary(body: &Value) -> String {
    truncate(&artifact_nvrs(body).join(" "))
}

fn artifact_build_lines(body: &Value) -> String {
    artifact_nvrs(body).join("\n")
}

fn nvr_list_len(body: &Value, key: &str) -> usize {
    body[key].as_array().map(Vec::len).unwrap_or_default()
}

fn request_summary(
    kind: MessageKind,
    agent: &str,
    owner: &str,
    alias: &str,
    builds: &str,
) -> String {
    let action = kind.action();
    match action {
        "unpush" | "obsolete" | "revoke" => format!(
            "{} {} {} update {} ({})",
            agent,
            past_tense(action),
            owner_qual(agent, owner),
            alias,
            builds,
        ),
        target => format!(
            "{} submitted {} update {} ({}) to {}",
            agent,
            owner_qual(agent, owner),
            alias,
            builds,
            target,
        ),
    }
}

fn request_body(kind: MessageKind, agent: &str, owner: &str, update: &Update) -> String {
    let action = kind.action();
    let mut text = match action {
        "unpush" | "obsolete" | "revoke" => format!(
            "{} {} {} update {}",
            agent,
            past_tense(action),
            owner_qual(agent, owner),
            update.alias,
        ),
        target => format!(
            "{} submitted {} update {} to {}",
            agent,
            owner_qual(agent, owner),
            update.alias,
            target,
        ),
    };
    text.push_str(".\nBuilds:\n");
    text.push_str(&build_lines(update));
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_qual_their_when_agent_owns() {
        assert_eq!(owner_qual("bob", "bob"), "their");
        assert_eq!(owner_qual("alice", "bob"), "bob's");
    }
}
