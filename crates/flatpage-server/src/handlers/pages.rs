//! Page dispatch and static assets.
//!
//! Fallback handler for everything that is not an API route: the root
//! path maps to the page `index`, paths made of alphanumerics and
//! slashes map to page names, and anything else is tried as a static
//! asset under the public directory.

use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Request, State};
use axum::response::IntoResponse;
use tower::ServiceExt;
use tower_http::services::ServeDir;

use crate::handlers::is_valid_page_name;
use crate::state::AppState;

/// Handle any non-API request.
pub(crate) async fn serve(
    State(state): State<Arc<AppState>>,
    req: Request,
) -> axum::response::Response {
    let name = req.uri().path().trim_matches('/');
    if name.is_empty() {
        return state.site.resolve("index").into_response();
    }
    if is_valid_page_name(name) {
        return state.site.resolve(name).into_response();
    }
    serve_public(&state.public_dir, req).await
}

/// Serve a static asset from the public directory.
async fn serve_public(dir: &Path, req: Request) -> axum::response::Response {
    match ServeDir::new(dir).oneshot(req).await {
        Ok(response) => response.map(Body::new),
        Err(err) => match err {},
    }
}
