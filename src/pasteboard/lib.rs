//! # Pasteboard Architecture
//!
//! Pasteboard is the **storage and thread-addressing core** of a paste-sharing
//! service. It knows how pastes are numbered, stored, threaded, listed and
//! diffed. It knows nothing about HTTP, HTML or templates: a web front end
//! calls into it and renders what it returns.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Parses caller strings (ids, browse path segments)        │
//! │  - Returns structured Result types                          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - create, view, list, diff                                 │
//! │  - Absent pastes named by the caller become PasteNotFound   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Components                                                 │
//! │  - ids.rs: public/private id allocation                     │
//! │  - thread.rs: annotation ordinals, aggregates               │
//! │  - browse.rs: filters, pagination, navigation window        │
//! │  - diff.rs: LCS line diff                                   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - Abstract DataStore trait                                 │
//! │  - SqliteStore (production), InMemoryStore (testing)        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ids
//!
//! Public pastes are numbered `1, 2, 3, ...` so the feed reads in order.
//! Private pastes get a random id from `[2^62, 2^63)`, which keeps them
//! unguessable and out of the way of the public sequence.
//!
//! ## Threads
//!
//! An annotation always points at its thread root, never at another
//! annotation. Replying to an annotation files the reply under the same root.
//! An annotation's ordinal is its 1-based position in the thread by id. New
//! annotations, private ones included, are always given an id above the rest
//! of their thread, so id order is insertion order.
//!
//! ## No I/O Assumptions in Core
//!
//! Everything here:
//! - Takes regular Rust arguments and returns regular Rust types
//! - **Never** logs or swallows errors; it returns them
//! - Emits `tracing` events for diagnostics, without installing a subscriber
//!
//! ## Testing Strategy
//!
//! 1. **Components and commands**: unit tests against `InMemoryStore`,
//!    usually built with `StoreFixture`.
//! 2. **SQLite store**: unit tests on in-memory databases, plus integration
//!    tests in `tests/` on files in temp directories.
//! 3. **Properties**: `proptest` checks over id allocation, page windows and
//!    diff output in `tests/`.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: One submodule per operation
//! - [`store`]: Storage abstraction and implementations
//! - [`model`]: Core data types (`Paste`, `PasteId`, `PasteAggregate`)
//! - [`ids`]: Id allocation
//! - [`thread`]: Annotation ordinals and aggregates
//! - [`browse`]: Listing, filtering and pagination
//! - [`diff`]: Line diff
//! - [`config`]: Configuration
//! - [`init`]: Startup wiring
//! - [`error`]: Error types

pub mod api;
pub mod browse;
pub mod commands;
pub mod config;
pub mod diff;
pub mod error;
pub mod ids;
pub mod init;
pub mod model;
pub mod store;
pub mod thread;
