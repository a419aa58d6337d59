// ── Domain model ──
//
// Wire-compatible records for the two backend collections. Field names
// follow the backend's JSON on the wire and English in Rust.

pub mod device;
pub mod entity_id;
pub mod user;
mod wire;

pub use device::{Device, DeviceField, PowerStatus};
pub use entity_id::EntityId;
pub use user::{AccountType, User, UserField};
