//! discourse-gatekeeper
//!
//! Three-way reconciles a Markdown documentation tree in Git with the
//! topics of a Discourse server: the local working tree, the Discourse
//! topics, and the Git commit tagged as the last synchronized base are
//! diffed and merged into a typed action stream, which is then executed
//! against Discourse. The reverse flow (migrate) reconstructs a local
//! docs tree from an existing Discourse index topic and opens a pull
//! request.
//!
//! # Pipeline (reconcile)
//!
//! ```text
//! reader + contents_index -> sorter -> planner -> checker -> executor -> orchestrator (index + tag move)
//! ```
//!
//! See [`orchestrator::run`] for the entry point that ties the above
//! together, choosing reconcile or migrate based on [`Config::docs_present`].

pub mod checker;
pub mod client;
pub mod config;
pub mod contents_index;
pub mod error;
pub mod executor;
pub mod merge;
pub mod metadata;
pub mod migration;
pub mod model;
pub mod navigation;
pub mod orchestrator;
pub mod planner;
pub mod reader;
pub mod slug;
pub mod sorter;

pub use config::Config;
pub use error::{Error, Result};
pub use orchestrator::{run, RunOutputs};
