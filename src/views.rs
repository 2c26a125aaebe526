// src/views.rs

//! Read-only value objects over validated message bodies
//!
//! These are immutable projections of the deserialized payload: a build, a
//! user, a release and the update that ties them together. Construction
//! never validates beyond key presence; structural validation is the
//! schema contract's job (see [`crate::schema`]). The one exception is NVR
//! decomposition, which is checked eagerly during message construction so
//! that accessors on a constructed message cannot fail.

use crate::error::{Error, Result};
use crate::schema::Schema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

/// A build identified by its NVR (name-version-release)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Build {
    /// The '-'-joined name-version-release identifier
    pub nvr: String,
}

impl Build {
    pub fn new(nvr: impl Into<String>) -> Self {
        Self { nvr: nvr.into() }
    }

    /// The package name: everything before the trailing version and
    /// release components
    ///
    /// An NVR with fewer than three '-'-separated components (or an empty
    /// component) is rejected with [`Error::MalformedNvr`] rather than
    /// best-effort split.
    pub fn package_name(&self) -> Result<&str> {
        let (name, _, _) = self.split()?;
        Ok(name)
    }

    /// The version component (second to last)
    pub fn version(&self) -> Result<&str> {
        let (_, version, _) = self.split()?;
        Ok(version)
    }

    /// The release component (last)
    pub fn release(&self) -> Result<&str> {
        let (_, _, release) = self.split()?;
        Ok(release)
    }

    fn split(&self) -> Result<(&str, &str, &str)> {
        let malformed = || Error::MalformedNvr(self.nvr.clone());
        let release_sep = self.nvr.rfind('-').ok_or_else(malformed)?;
        let version_sep = self.nvr[..release_sep].rfind('-').ok_or_else(malformed)?;
        let name = &self.nvr[..version_sep];
        let version = &self.nvr[version_sep + 1..release_sep];
        let release = &self.nvr[release_sep + 1..];
        if name.is_empty() || version.is_empty() || release.is_empty() {
            return Err(malformed());
        }
        Ok((name, version, release))
    }

    /// The wire shape of a build
    pub fn schema() -> Schema {
        Schema::object("A build")
            .property(
                "nvr",
                Schema::string("The nvr that identifies the build"),
            )
            .require(&["nvr"])
    }
}

/// A user known to the update tracker
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct User {
    pub name: String,
}

impl User {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// The wire shape of a user
    pub fn schema() -> Schema {
        Schema::object("The user that is associated with this message")
            .property("name", Schema::string("The user's account name"))
            .require(&["name"])
    }
}

/// A release that updates are published against
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Release {
    pub name: String,
}

impl Release {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// The wire shape of a release
    pub fn schema() -> Schema {
        Schema::object("The release of the update")
            .property("name", Schema::string("The release's name"))
            .require(&["name"])
    }
}

/// The lifecycle state of an update
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum UpdateStatus {
    Pending,
    Testing,
    Stable,
    Unpushed,
    Obsolete,
    SideTagActive,
    SideTagExpired,
}

/// The repository an update has been requested into
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum UpdateRequest {
    Testing,
    Stable,
    Unpush,
    Obsolete,
    Revoke,
}

/// An update as referenced by a message body
///
/// Constructed once per message, eagerly, from the body's update object and
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Update {
    /// Stable external identifier of the update
    pub alias: String,
    /// The builds in the update, in body order
    pub builds: Vec<Build>,
    /// The update's owner
    pub user: User,
    /// Current lifecycle state
    pub status: UpdateStatus,
    /// Pending request, if any
    #[serde(default)]
    pub request: Option<UpdateRequest>,
    /// The release the update targets
    pub release: Release,
}

impl Update {
    /// The distinct package names of this update's builds, ascending
    ///
    /// Fails with [`Error::MalformedNvr`] if any build identifier does not
    /// decompose.
    pub fn packages(&self) -> Result<Vec<String>> {
        let mut names = BTreeSet::new();
        for build in &self.builds {
            names.insert(build.package_name()?.to_string());
        }
        Ok(names.into_iter().collect())
    }

    /// The wire shape of an update; builds reference `#/definitions/build`
    /// on the enclosing root schema
    pub fn schema() -> Schema {
        Schema::object("The update that this message relates to")
            .property("alias", Schema::string("The update's alias"))
            .property(
                "builds",
                Schema::array(
                    "A list of builds that are in this update",
                    Schema::reference("build"),
                ),
            )
            .property("release", Release::schema())
            .property(
                "request",
                Schema::string("The update's request")
                    .nullable()
                    .enum_values(UpdateRequest::iter().map(|r| r.to_string())),
            )
            .property(
                "status",
                Schema::string("The update's status")
                    .enum_values(UpdateStatus::iter().map(|s| s.to_string())),
            )
            .property("user", User::schema())
            .require(&["alias", "builds", "release", "request", "status", "user"])
    }
}
