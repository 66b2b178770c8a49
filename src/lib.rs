//! # srcview
//!
//! A single-binary web service for searching and browsing a local source
//! tree. Point it at a root directory and it serves two things over HTTP:
//! substring search across every text file under the root, and a browsable
//! tree view with syntax-highlighted, line-numbered file rendering.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌─────────────┐   ┌─────────────┐
//! │   HTTP    │──▶│  Resolve /   │──▶│ Walk + Grep │
//! │  (axum)   │   │  Dispatch   │   │  Highlight  │
//! └──────────┘   └─────────────┘   └─────────────┘
//! ```
//!
//! Everything is request-scoped: there is no index, no cache, and no shared
//! mutable state. Each request runs an independent pass over the read-only
//! filesystem.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`resolve`] | Maps user paths into the root, rejecting escapes |
//! | [`walk`] | Deterministic depth-first tree traversal |
//! | [`grep`] | Line matching and whole-tree search |
//! | [`highlight`] | Tokenization and HTML rendering of source text |
//! | [`listing`] | Directory listing for browse views |
//! | [`server`] | HTTP routes and view rendering |
//! | [`error`] | Typed error taxonomy shared by the core |

pub mod error;
pub mod grep;
pub mod highlight;
pub mod listing;
pub mod resolve;
pub mod server;
pub mod walk;
