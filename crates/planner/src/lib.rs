//! Timetable planner core.
//!
//! A hierarchical timetable model (subject → class → stream → session), a
//! generator that fills it with random but structurally valid data, and a
//! canonical JSON serializer. Storage, configuration and the HTTP API are thin
//! layers on top.

pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod generator;
pub mod model;
pub mod serializer;
pub mod server;
pub mod time;

pub use error::{Error, Result};
pub use generator::{generate_offering, generate_subject};
pub use serializer::{serialize_offering, serialize_semester, serialize_subject};
