//! # Rillet
//!
//! A command-line client for a feed-aggregation and media-download manager
//! that exposes a REST web interface.
//!
//! ## Architecture
//!
//! ```text
//! CLI → session → ApiClient → Transport → server
//!        └──────→ PluginRegistry → PluginInstance → ExtractionPlugin → PageFetcher
//! ```
//!
//! - [`transport`]: JSON-over-HTTP with Basic auth and status checking
//! - [`api`]: One typed method per REST operation
//! - [`plugins`]: Site extraction plugins with a cancellable request lifecycle
//! - [`session`]: Selection state, update monitoring and the downloads list
//!
//! ## Quick Start
//!
//! ```bash
//! # List subscriptions on the default server (http://localhost:8093)
//! rillet subscriptions list
//!
//! # Queue a download
//! rillet downloads add https://example.com/episode.mp3
//!
//! # Resolve a video page locally
//! rillet extract enclosure auto https://www.dailymotion.com/video/x5abc -s videoFormat=720
//! ```

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together the API client,
/// the plugin registry and the page fetcher.
pub mod app;

/// Configuration management.
///
/// Loads from `~/.config/rillet/config.toml`: server address and
/// credentials, per-plugin default settings, and the monitor poll interval.
pub mod config;

/// Command-line interface using clap.
pub mod cli;

/// Wire models of the REST resources.
///
/// - [`Subscription`](domain::Subscription), [`Article`](domain::Article)
/// - [`Transfer`](domain::Transfer) with its status and priority
/// - [`UpdateStatus`](domain::UpdateStatus) of a running subscription update
pub mod domain;

/// JSON request/response transport.
///
/// - [`Transport`](transport::Transport): Async trait for one request
/// - [`HttpTransport`](transport::HttpTransport): reqwest-based implementation
pub mod transport;

/// Typed REST facade over a [`Transport`](transport::Transport).
pub mod api;

/// Site extraction plugins.
pub mod plugins;

/// Client-side view state.
pub mod session;
