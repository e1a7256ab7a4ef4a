#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]
#![forbid(unsafe_code)]

//! Wire types and HTTP client for the MesseCall scheduling API.

#[cfg(feature = "client")]
pub mod client;
pub mod objects;
