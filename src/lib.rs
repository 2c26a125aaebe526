// src/lib.rs

//! Herald message schemas
//!
//! Typed, versioned definitions of the messages emitted by Herald, a
//! package-update tracking service, when updates change state.
//!
//! # Architecture
//!
//! - Messages are immutable: validated against their schema contract at
//!   construction, never mutated, never reused
//! - One closed kind per business event; wire versions of the same logical
//!   event share a topic and differ only in body shape
//! - Schema evolution is additive only: newer contracts extend older ones
//!   without removing or redefining required properties
//! - No I/O: this crate only produces the values a bus client publishes
//!   (topic, body, severity, summary, rendered body)

mod error;
pub mod message;
pub mod schema;
pub mod text;
pub mod views;

pub use error::{Error, Result};
pub use message::{Message, MessageKind, Severity, SCHEMA_URL, TOPIC_PREFIX, UPDATES_URL};
pub use schema::{extend_schema, rename_definition, Schema, SchemaExtension, SchemaType};
pub use text::{past_tense, truncate, BUILDS_SUMMARY_MAX_LEN, TRUNCATION_MARKER};
pub use views::{Build, Release, Update, UpdateRequest, UpdateStatus, User};
