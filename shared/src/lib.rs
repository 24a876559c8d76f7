//! Shared types for the VoltMart marketplace
//!
//! Wire-level request/response types and the unified API envelope, used by
//! the server and by any client crate talking to it.

pub mod client;
pub mod response;
pub mod util;

// Re-exported so consumers write `shared::ApiResponse` and derive
// serde traits without naming the crates themselves.
pub use response::ApiResponse;
pub use serde::{Deserialize, Serialize};
