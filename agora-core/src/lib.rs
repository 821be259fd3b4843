//! Core types for the agora event client.
//!
//! - `event`: the `Event` record and its natural key
//! - `local`: the SQLite-backed event cache
//! - `remote`: the remote document store and the provider protocol
//! - `reconciler`: merges remote events into the cache and keeps the feed views
//! - `auth`: sign-in flows reduced to a three-way outcome

pub mod auth;
pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod feed;
pub mod local;
pub mod reconciler;
pub mod remote;
pub mod session;

pub use error::{AgoraError, AgoraResult};
pub use event::{Event, NaturalKey};
