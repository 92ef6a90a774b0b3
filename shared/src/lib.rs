//! Shared types for the gym front-desk system
//!
//! Domain models, request payloads and utility helpers used by the server
//! (and by any client that wants typed access to the HTTP API).

pub mod client;
pub mod models;
pub mod util;

pub use serde::{Deserialize, Serialize};
