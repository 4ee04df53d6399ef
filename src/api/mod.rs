//! Management API interaction module
//!
//! Core plumbing for talking to a HAL-style management API: the session and
//! its bearer token, the HTTP transport, and the self-reauthenticating client.
//!
//! # Module Structure
//!
//! - [`auth`] - Session state and token exchange
//! - [`client`] - Main client and request executor
//! - [`error`] - Typed API errors
//! - [`http`] - Single-shot HTTP transport
//!
//! # Example
//!
//! ```ignore
//! use halctl::api::{ClientSettings, Credentials, HalClient};
//!
//! async fn example() -> halctl::api::Result<()> {
//!     let base = url::Url::parse("https://cmp.example.com:8443").unwrap();
//!     let client = HalClient::new(ClientSettings::new(base, Credentials::new("admin", "pw")))?;
//!     let groups: serde_json::Value = client.get_json("/api/v3/cmp/groups/").await?;
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod error;
pub mod http;

pub use auth::{Credentials, Session};
pub use client::{api_path, ClientSettings, HalClient};
pub use error::{ApiError, Result};
pub use http::RawResponse;
