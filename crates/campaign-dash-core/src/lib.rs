//! Core library for campaign-dash.
//!
//! Reads Zoho-synced Campaign records from a Frappe/ERPNext site and turns
//! their analytics into a small dashboard of clickable metric tiles:
//!
//! - `api`: REST client for the Frappe site (records, recipients, sync method)
//! - `dashboard`: metric catalog, pure dashboard renderer, mount point
//! - `navigation`: recipient filter state and routing
//! - `sync`: the "Sync from Zoho" action and its outcomes
//! - `config`, `auth`, `i18n`: configuration, credentials, translations

pub mod api;
pub mod auth;
pub mod config;
pub mod dashboard;
pub mod i18n;
pub mod models;
pub mod navigation;
pub mod sync;
pub mod utils;
