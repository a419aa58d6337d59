//! Reactive CRUD layer between `enerctl-api` and consumers (CLI/TUI).
//!
//! - **[`ResourceController<T>`]**: owns the list, draft, editor and status
//!   state for one entity type and runs the fetch / edit / validate /
//!   submit / refresh cycle against the backend. State is published through
//!   a `watch` channel; every network operation is single-flight and
//!   cancellable.
//!
//! - **[`Console`]**: facade that builds the API client and one controller
//!   per resource ([`User`], [`Device`]) under a shared cancellation token.
//!
//! - **[`normalize`]**: unwraps list responses that arrive either as a bare
//!   array or as a HAL-style `_embedded` collection.
//!
//! - **[`report`]**: the fixed consumption datasets shown on the reports tab.

pub mod config;
pub mod console;
pub mod controller;
pub mod error;
pub mod model;
pub mod normalize;
pub mod report;
pub mod resource;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{ConsoleConfig, DEFAULT_API_URL, TlsVerification};
pub use console::Console;
pub use controller::{Outcome, ResourceController, ResourceState, StatusKind, StatusMessage};
pub use error::{CoreError, ErrorKind};
pub use model::{AccountType, Device, DeviceField, EntityId, PowerStatus, User, UserField};
pub use report::Report;
pub use resource::Resource;
