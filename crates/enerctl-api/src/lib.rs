// enerctl-api: Async Rust client for the energy management REST backend

pub mod client;
pub mod error;
pub mod transport;

pub use client::ApiClient;
pub use error::Error;
pub use transport::{TlsMode, TransportConfig};
