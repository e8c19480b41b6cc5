//! Google Drive download client.
//!
//! This module owns everything specific to the remote service: turning file
//! IDs and sharing links into download URLs (`resolve`), getting past the
//! interstitial pages Drive serves for large files (`confirm`), and the
//! blocking HTTP client itself (`client`).

pub mod client;
pub mod confirm;
pub mod resolve;

use std::time::Duration;

pub use client::DriveClient;

/// Base URL of the Drive web frontend.
pub const DEFAULT_BASE_URL: &str = "https://drive.google.com/";

/// Default global timeout for a single request, body included.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Settings for [`DriveClient`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DriveConfig {
    /// Base URL that `uc?id=...` download URLs are built against.
    pub base_url: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("samplefetch/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}
