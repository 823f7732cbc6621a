#![doc = include_str!("../README.md")]
#![deny(unused_crate_dependencies)]

mod client;
mod config;
mod error;
mod http;
mod models;
mod port;
mod url;

// ============================================================================
// Public API
// ============================================================================

// Client
pub use client::{ApiClient, DefaultApiClient};

// Configuration
pub use config::ApiClientConfig;

// Errors surfaced while building a client
pub use error::HttpError;

// Backend seam
pub use http::{FilePart, HttpBackend, ReqwestBackend, UploadForm};
