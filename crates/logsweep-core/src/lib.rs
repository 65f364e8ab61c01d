//! Diagnostic error-log acquisition and aggregation for BACnet field
//! controllers.
//!
//! The pipeline discovers the controller fleet through a host object tree,
//! reads each device's fixed-format error-log file with bounded
//! concurrency, parses the files into structured records, and merges
//! everything into one globally time-ordered log published as immutable
//! state snapshots.
//!
//! - [`LogService`] owns the store and the injected
//!   [`HostApi`](logsweep_api::HostApi) capability; `load()` runs one
//!   discovery, fetch and merge cycle.
//! - [`Store`] is the minimal reducer/subscriber container behind the
//!   published [`AppState`] snapshots.
//! - [`parse_error_log`] turns one raw log file into an [`ErrorLog`].
//! - [`merge_records`] folds a device's records into the global log,
//!   keeping it sorted by `(timestamp, device)`.

pub mod config;
pub mod discovery;
pub mod error;
pub mod merge;
pub mod model;
pub mod parse;
pub mod service;
pub mod state;
pub mod store;
pub mod stream;

mod fetch;

// ── Primary re-exports ──────────────────────────────────────────────

pub use config::ServiceConfig;
pub use error::CoreError;
pub use merge::merge_records;
pub use model::{Controller, ControllerInfo, ErrorLog, LogRecord};
pub use parse::parse_error_log;
pub use service::{LoadPhase, LogService};
pub use state::{Action, AppState, AppStore, Progress, app_store};
pub use store::{Store, Subscription};
pub use stream::{StateStream, StateWatchStream};
