//! REST client for the Frappe/ERPNext site.
//!
//! This module provides the `FrappeClient` for reading Campaign and Campaign
//! Recipient documents and for invoking the Zoho sync method exposed by the
//! integration app.
//!
//! Requests authenticate with a Frappe API key/secret pair
//! (`Authorization: token <key>:<secret>`).

pub mod client;
pub mod error;

pub use client::FrappeClient;
pub use error::ApiError;
