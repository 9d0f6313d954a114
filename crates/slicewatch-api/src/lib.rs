//! Async client for the slice manager REST API.
//!
//! This crate is the dashboard's **remote gateway**: stateless typed
//! request/response functions against the slice manager, nothing more.
//! No retry, no caching, no local state — failure and staleness policy
//! belong to `slicewatch-core`'s synchronizers.
//!
//! - [`GatewayClient`] — one method per endpoint, rooted at `{base}/api`
//! - [`models`] — permissive wire records (string enums, `extra` capture)
//! - [`TransportConfig`] — TLS / timeout settings shared with consumers

pub mod client;
pub mod error;
pub mod models;
pub mod transport;

pub use client::GatewayClient;
pub use error::Error;
pub use transport::{TlsMode, TransportConfig};
