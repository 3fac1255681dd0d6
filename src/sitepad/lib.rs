//! # Sitepad Architecture
//!
//! Sitepad is a **UI-agnostic content pipeline library**. The admin HTTP
//! gateway and the CLI are thin clients over the same core; neither owns
//! any business logic.
//!
//! ## The Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Clients (server.rs gateway, cli wired by main.rs)          │
//! │  - Map HTTP routes / argv onto API calls, format output     │
//! │  - The ONLY place that knows about sockets/stdout/exit codes│
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands                                │
//! │  - Wires store + renderer + rebuild notifier together       │
//! │  - Returns structured Result types                          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - The pipeline: validate → load → merge → persist →        │
//! │    regenerate → notify, one module per content domain       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                ┌─────────────┴─────────────┐
//!                ▼                           ▼
//! ┌──────────────────────────┐  ┌──────────────────────────────┐
//! │  Storage Layer (store/)  │  │  Page Renderer (render/)     │
//! │  - DocumentStore trait   │  │  - Anchored grid replacement │
//! │  - FileStore, InMemory   │  │  - Global substitutions      │
//! └──────────────────────────┘  │  - Timestamped page backups  │
//!                               └──────────────────────────────┘
//! ```
//!
//! ## Failure Policy
//!
//! Only validation, not-found, and persistence failures abort an
//! operation. Once the domain document is saved it is the source of
//! truth: page regeneration and the external rebuild signal degrade to
//! warnings on the operation result, never to errors.
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `api.rs` inward, code takes regular Rust arguments, returns
//! `Result<OpResult>`, never writes to stdout/stderr, and never assumes a
//! terminal or a socket. The same core serves the HTTP gateway, the CLI,
//! and the test suite (via `InMemoryStore`).
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade — entry point for all operations
//! - [`commands`]: Pipeline logic per content domain
//! - [`store`]: Storage abstraction and implementations
//! - [`render`]: Page regeneration and backups
//! - [`model`]: Domain documents (`Project`, `MediaItem`, …)
//! - [`auth`]: Credential verification and admin sessions
//! - [`server`]: The admin HTTP gateway
//! - [`config`]: Site paths and gateway configuration
//! - [`error`]: Error types

pub mod api;
pub mod auth;
pub mod commands;
pub mod config;
pub mod error;
pub mod model;
pub mod render;
pub mod server;
pub mod store;
