//! HTTP clients for the Coin Space site API
//!
//! Implements the auth gateway, the fee service and the history provider on
//! top of one `reqwest` client rooted at the configured site URL.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod fees;
pub mod history;

pub use auth::HttpAuthGateway;
pub use client::ApiClient;
pub use config::{HttpConfig, DEFAULT_TIMEOUT};
pub use error::{Error, Result};
pub use fees::HttpFeeService;
pub use history::HttpHistoryProvider;
