//! Upstream version watcher
//!
//! Polls a page per tracked library, pulls a version token out of it with a
//! named-capture pattern, and records changes in a local JSON registry.
//!
//! # Modules
//!
//! - [`library`]: The persisted registry entry
//! - [`store`]: Loading and saving the registry file
//! - [`extractor`]: Fetching pages and extracting version tokens
//! - [`notifier`]: Reporting detected updates to the user
//! - [`hook`]: Running post-update hook scripts
//! - [`checker`]: Concurrent check run over the whole registry
//! - [`add`]: Interactive creation of a new registry entry
//! - [`config`]: Paths, timeouts and environment overrides
//! - [`logging`]: File-backed tracing setup
//! - [`error`]: Error types for every layer

pub mod add;
pub mod checker;
pub mod config;
pub mod error;
pub mod extractor;
pub mod hook;
pub mod library;
pub mod logging;
pub mod notifier;
pub mod store;
