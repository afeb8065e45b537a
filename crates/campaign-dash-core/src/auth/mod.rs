//! Credentials for the Frappe REST API.
//!
//! This module provides:
//! - `ApiCredentials`: the API key/secret pair sent with each request
//! - `CredentialStore`: secure OS-level storage of the API secret via keyring

pub mod credentials;

pub use credentials::{ApiCredentials, CredentialStore};
