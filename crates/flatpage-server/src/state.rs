//! Application state.
//!
//! Shared state for all request handlers.

use std::path::PathBuf;

use flatpage_site::Site;

/// Application state shared across all handlers.
pub(crate) struct AppState {
    /// Page resolver.
    pub(crate) site: Site,
    /// Directory holding static assets.
    pub(crate) public_dir: PathBuf,
    /// Application version (reported by the health endpoint).
    pub(crate) version: String,
}
