//! # Stacks Architecture
//!
//! Stacks is a **UI-agnostic library catalog manager**. The CLI that ships
//! with it is one client of the library; nothing below the binary knows
//! about terminals, exit codes, or output formatting.
//!
//! ## Layers
//!
//! ```text
//! CLI (main.rs, args.rs)         argument parsing, rendering, exit codes
//!         │
//! API facade (api.rs)            normalizes selectors (position/id/prefix)
//!         │                      to book ids, dispatches to the catalog
//! Catalog (catalog.rs)           owns the book collection; every mutation
//!         │                      persists wholesale and yields a Notice
//! Storage port (store/)          KeyValueStore trait; FileStore for
//!                                production, InMemoryStore for tests
//! ```
//!
//! Alongside the catalog sit two pure modules the UI calls directly:
//! [`validate`] (field-level form validation, run by the client before it
//! submits a draft) and [`search`] (free-text filtering over any book
//! slice). [`backup`] round-trips the collection through tar.gz archives.
//!
//! ## Key principle
//!
//! From `api.rs` inward, code takes plain Rust arguments, returns
//! `Result`, and performs no terminal I/O. The same core could sit behind
//! a TUI or an HTTP handler unchanged.
//!
//! ## Module overview
//!
//! - [`api`]: the facade UI clients talk to
//! - [`catalog`]: collection ownership, mutations, stats, overdue sweep
//! - [`model`]: `Book`, `Lending`/`Loan`, `Category`, drafts and patches
//! - [`validate`]: form validation returning field-level errors
//! - [`search`]: case-insensitive catalog filter
//! - [`store`]: storage abstraction and implementations
//! - [`backup`]: catalog export/import archives
//! - [`config`]: configuration management
//! - [`error`]: error types

pub mod api;
pub mod backup;
pub mod catalog;
pub mod config;
pub mod error;
pub mod model;
pub mod search;
pub mod store;
pub mod validate;
