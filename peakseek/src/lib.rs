//! Peakseek - hill-climb search control for a mobile agent
//!
//! Drives an agent to a local maximum of a remotely sampled elevation
//! field. The agent's world is reached through three trait seams: a pose
//! source resolving the agent in the world frame, an elevation service
//! answering point sample requests, and a navigation host executing
//! cancellable moves. Everything in between - the bounded cancellable
//! waits, the candidate ring, the hill-climb controller and the goal
//! lifecycle - lives here.
//!
//! # High-Level API
//!
//! The [`goal`] module provides the submission surface:
//!
//! ```ignore
//! use peakseek::goal::{SearchRequest, SearchServer};
//! use peakseek::search::SearchConfig;
//!
//! let server = SearchServer::new(pose, elevation, navigation, SearchConfig::default());
//! let mut handle = server.submit(SearchRequest);
//!
//! let terminal = handle.wait_terminal().await;
//! ```
//!
//! The [`sim`] module supplies in-process collaborators for running the
//! stack without a robot.

pub mod coord;
pub mod goal;
pub mod logging;
pub mod nav;
pub mod pose;
pub mod sampler;
pub mod search;
pub mod sim;
pub mod wait;

/// Version of the peakseek library and CLI.
///
/// Synchronized across the workspace; defined in `Cargo.toml` and injected
/// at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
