// src/message/schemas.rs

//! Schema contracts, one per message kind
//!
//! Each constructor returns a fresh root schema. Newer wire versions are
//! composed from the older version's contract with the pure helpers in
//! [`crate::schema`]: additive extension only, so consumers built against
//! the older shape keep parsing the common fields.

use super::kind::MessageKind;
use crate::schema::{extend_schema, rename_definition, Schema, SchemaExtension};
use crate::views::{Build, Update, User};

/// Base URL schema identifiers are published under
pub const SCHEMA_URL: &str = "https://herald.example.com/schemas";

/// A root schema for `topic` with the shared `build` definition
fn message_root(topic: &str, description: &str) -> Schema {
    Schema::object(description)
        .with_id(format!("{}/v1/{}#", SCHEMA_URL, topic))
        .definition("build", Build::schema())
}

/// A string property describing the acting user
fn agent_property(description: &str) -> Schema {
    Schema::string(description)
}

pub(crate) fn comment_added() -> Schema {
    message_root(
        MessageKind::CommentAdded.topic(),
        "Schema for the message sent when a comment is added to an update",
    )
    .property(
        "comment",
        Schema::object("The comment added to an update")
            .property(
                "karma",
                Schema::integer("The karma associated with the comment"),
            )
            .property("text", Schema::string("The text of the comment"))
            .property(
                "timestamp",
                Schema::string("The timestamp that the comment was left on"),
            )
            .property("update", Update::schema())
            .property("user", User::schema())
            .require(&["karma", "text", "timestamp", "update", "user"]),
    )
    .require(&["comment"])
}

fn push_complete(kind: MessageKind, repository: &str) -> Schema {
    message_root(
        kind.topic(),
        &format!(
            "Schema for the message sent when an update completes its push to {}",
            repository
        ),
    )
    .property("update", Update::schema())
    .require(&["update"])
}

pub(crate) fn push_complete_testing() -> Schema {
    push_complete(MessageKind::PushCompleteTesting, "testing")
}

pub(crate) fn push_complete_stable() -> Schema {
    push_complete(MessageKind::PushCompleteStable, "stable")
}

pub(crate) fn edit_v1() -> Schema {
    message_root(
        MessageKind::EditV1.topic(),
        "Schema for the message sent when an update is edited",
    )
    .property("agent", agent_property("The user who edited the update"))
    .property(
        "new_bugs",
        Schema::array(
            "An array of bug ids that have been added to the update",
            Schema::integer("A bug ID"),
        ),
    )
    .property("update", Update::schema())
    .require(&["agent", "new_bugs", "update"])
}

pub(crate) fn edit_v2() -> Schema {
    extend_schema(
        &edit_v1(),
        SchemaExtension::new()
            .property(
                "new_builds",
                Schema::array(
                    "An array of build NVRs that have been added to the update",
                    Schema::string("A build NVR"),
                ),
            )
            .property(
                "removed_builds",
                Schema::array(
                    "An array of build NVRs that have been removed from the update",
                    Schema::string("A build NVR"),
                ),
            )
            .require(&["new_builds", "removed_builds"]),
    )
}

pub(crate) fn ejected() -> Schema {
    message_root(
        MessageKind::Ejected.topic(),
        "Schema for the message sent when an update is ejected from a compose",
    )
    .property("reason", Schema::string("The reason the update was ejected"))
    .property(
        "repo",
        Schema::string("The name of the repo that the update is associated with"),
    )
    .property("update", Update::schema())
    .require(&["reason", "repo", "update"])
}

pub(crate) fn karma_threshold_reached() -> Schema {
    message_root(
        MessageKind::KarmaThresholdReached.topic(),
        "Schema for the message sent when an update reaches its karma threshold",
    )
    .property(
        "status",
        Schema::string("Which karma threshold was reached").enum_values(["stable", "unstable"]),
    )
    .property("update", Update::schema())
    .require(&["status", "update"])
}

pub(crate) fn request(kind: MessageKind, verb: &str) -> Schema {
    message_root(
        kind.topic(),
        &format!(
            "Schema for the message sent when an update is requested to be {}",
            verb
        ),
    )
    .property(
        "agent",
        agent_property(&format!(
            "The user who requested the update to be {}",
            verb
        )),
    )
    .property("update", Update::schema())
    .require(&["agent", "update"])
}

pub(crate) fn requirements_met_stable() -> Schema {
    message_root(
        MessageKind::RequirementsMetStable.topic(),
        "Schema for the message sent when an update meets stable requirements",
    )
    .property("update", Update::schema())
    .require(&["update"])
}

/// The shape of one artifact build in a ready-for-testing body
fn artifact_build_schema() -> Schema {
    Schema::object("Details about a build to test")
        .property(
            "type",
            Schema::string("Artifact type, in this case \"koji-build\""),
        )
        .property("id", Schema::integer("Build ID of the koji build"))
        .property(
            "task_id",
            Schema::integer("Task ID of the koji build").nullable(),
        )
        .property("component", Schema::string("Name of the component tested"))
        .property("issuer", Schema::string("Build issuer of the artifact"))
        .property(
            "scratch",
            Schema::boolean("Indication if the build is a scratch build"),
        )
        .property("nvr", Schema::string("Name-version-release of the artifact"))
        .require(&["type", "id", "issuer", "component", "nvr", "scratch"])
}

pub(crate) fn ready_for_testing_v1() -> Schema {
    Schema::object("Schema for the message sent when an update is ready for testing")
        .with_id(format!(
            "{}/v1/{}#",
            SCHEMA_URL,
            MessageKind::ReadyForTestingV1.topic()
        ))
        .property(
            "contact",
            Schema::object("The team responsible for the testing or gating")
                .property(
                    "name",
                    Schema::string("A human readable name of the team running the testing"),
                )
                .property(
                    "team",
                    Schema::string("A human readable name of the team running the testing"),
                )
                .property(
                    "docs",
                    Schema::string("Link to documentation with details about the system"),
                )
                .property("email", Schema::string("Contact email address"))
                .require(&["name", "team", "docs", "email"]),
        )
        .property(
            "artifact",
            Schema::object("Details about the builds to test")
                .property(
                    "id",
                    Schema::string("The update tracker's identifier for this update"),
                )
                .property(
                    "type",
                    Schema::string("Artifact type, in this case \"rpm-build-group\""),
                )
                .property(
                    "builds",
                    Schema::array(
                        "A list of builds included in this group",
                        Schema::reference("build"),
                    ),
                )
                .property(
                    "repository",
                    Schema::string("Url of the repository with packages from the side-tag")
                        .format("uri"),
                )
                .property(
                    "release",
                    Schema::string("The release targeted by this group of builds"),
                )
                .require(&["id", "type", "builds", "repository", "release"]),
        )
        .property(
            "generated_at",
            Schema::string("Time when the request was generated, in UTC and ISO 8601 format"),
        )
        .property("version", Schema::string("Version of the specification"))
        .property(
            "agent",
            Schema::string("Name of the requester on a re-trigger, the tracker's own name on push"),
        )
        .require(&["contact", "artifact", "generated_at", "version", "agent"])
        .definition("build", artifact_build_schema())
}

pub(crate) fn ready_for_testing_v2() -> Schema {
    // The v1 'build' definition describes an artifact build, which collides
    // with the definition name the update schema references. Rename it and
    // re-point the artifact items before installing the update build shape.
    let mut schema = rename_definition(&ready_for_testing_v1(), "build", "artifactbuild");
    if let Some(artifact) = schema.properties.get_mut("artifact")
        && let Some(builds) = artifact.properties.get_mut("builds")
    {
        builds.items = Some(Box::new(Schema::reference("artifactbuild")));
    }
    schema = schema.definition("build", Build::schema());
    extend_schema(
        &schema,
        SchemaExtension::new()
            .property("update", Update::schema())
            .require(&["update"]),
    )
}
