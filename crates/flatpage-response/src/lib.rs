//! HTTP response abstraction.
//!
//! A [`Response`] is the outcome of a render attempt: either a raw byte
//! payload or a deferred layout render. Both variants carry a status
//! code and an owned header map with fluent setters. The template
//! variant resolves and executes its layout only when the response is
//! written to the transport ([`IntoResponse`]); construction never
//! touches the filesystem.
//!
//! Two canonical responses are built once per process and cloned per
//! use: [`NOT_FOUND`] (404 through the `404.html` layout, so the error
//! page shares the site chrome) and [`SERVER_ERROR`] (500 with an empty
//! body, so no internal detail leaks to the client). Every instance
//! owns its header map, so fluent chaining on a clone never mutates the
//! canonical value.

use std::sync::LazyLock;

use axum::body::Body;
use axum::http::{HeaderMap, HeaderName, HeaderValue, header};
use axum::response::IntoResponse;
use flatpage_templates::Engine;
use minijinja::value::Value;
use serde::Serialize;

pub use axum::http::StatusCode;

/// Canonical 404 response: the `404.html` layout with no data.
pub static NOT_FOUND: LazyLock<Response> =
    LazyLock::new(|| Response::template(StatusCode::NOT_FOUND, "404.html", Value::UNDEFINED));

/// Canonical 500 response: empty body.
pub static SERVER_ERROR: LazyLock<Response> =
    LazyLock::new(|| Response::empty(StatusCode::INTERNAL_SERVER_ERROR));

/// Outcome of a render attempt, written exactly once to the transport.
#[derive(Clone, Debug)]
pub struct Response(Inner);

#[derive(Clone, Debug)]
enum Inner {
    /// Fully materialized payload.
    Raw {
        status: StatusCode,
        body: Vec<u8>,
        headers: HeaderMap,
    },
    /// Layout to execute at write time.
    Template {
        status: StatusCode,
        layout: String,
        context: Value,
        headers: HeaderMap,
        engine: Engine,
    },
}

impl Response {
    /// Raw response from a byte payload.
    #[must_use]
    pub fn raw(status: StatusCode, body: Vec<u8>) -> Self {
        Self(Inner::Raw {
            status,
            body,
            headers: HeaderMap::new(),
        })
    }

    /// Raw response with an empty body.
    #[must_use]
    pub fn empty(status: StatusCode) -> Self {
        Self::raw(status, Vec::new())
    }

    /// Plain-text response.
    #[must_use]
    pub fn text(status: StatusCode, body: &str) -> Self {
        Self::raw(status, body.as_bytes().to_vec()).header("Content-Type", "text/plain")
    }

    /// JSON response. A serialization failure is logged and degrades to
    /// [`SERVER_ERROR`].
    #[must_use]
    pub fn json<T: Serialize>(status: StatusCode, body: &T) -> Self {
        match serde_json::to_vec(body) {
            Ok(bytes) => Self::raw(status, bytes).header("Content-Type", "application/json"),
            Err(err) => Self::error("body json marshal", &err),
        }
    }

    /// Deferred response: the layout is resolved and executed against
    /// `context` when the response is written, using the default
    /// [`Engine`] roots.
    #[must_use]
    pub fn template(status: StatusCode, layout: impl Into<String>, context: Value) -> Self {
        Self::template_with_engine(Engine::default(), status, layout, context)
    }

    /// Deferred response rendered through an explicit engine.
    #[must_use]
    pub fn template_with_engine(
        engine: Engine,
        status: StatusCode,
        layout: impl Into<String>,
        context: Value,
    ) -> Self {
        Self(Inner::Template {
            status,
            layout: layout.into(),
            context,
            headers: HeaderMap::new(),
            engine,
        })
    }

    /// Replace the engine the template variant renders through at write
    /// time. No-op for raw responses. Lets a canonical value like
    /// [`NOT_FOUND`] follow non-default directory roots.
    #[must_use]
    pub fn with_engine(mut self, engine: Engine) -> Self {
        if let Inner::Template { engine: slot, .. } = &mut self.0 {
            *slot = engine;
        }
        self
    }

    /// Log an error and return the canonical [`SERVER_ERROR`].
    #[must_use]
    pub fn error(message: &str, err: &dyn std::error::Error) -> Self {
        tracing::error!(error = %err, "{}", message);
        SERVER_ERROR.clone()
    }

    /// Set a header. Last write for a given key wins; an invalid header
    /// name or value is dropped rather than raised.
    #[must_use]
    pub fn header(mut self, key: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (HeaderName::try_from(key), HeaderValue::try_from(value)) {
            self.headers_mut().insert(name, value);
        }
        self
    }

    /// Set `Cache-Control: public,max-age=<ttl>`.
    #[must_use]
    pub fn cache(self, ttl: &str) -> Self {
        self.header("Cache-Control", &format!("public,max-age={ttl}"))
    }

    /// Response status code.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            Inner::Raw { status, .. } | Inner::Template { status, .. } => *status,
        }
    }

    /// Accumulated headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        match &self.0 {
            Inner::Raw { headers, .. } | Inner::Template { headers, .. } => headers,
        }
    }

    /// Layout name for the template variant.
    #[must_use]
    pub fn layout(&self) -> Option<&str> {
        match &self.0 {
            Inner::Template { layout, .. } => Some(layout),
            Inner::Raw { .. } => None,
        }
    }

    /// Render context for the template variant.
    #[must_use]
    pub fn context(&self) -> Option<&Value> {
        match &self.0 {
            Inner::Template { context, .. } => Some(context),
            Inner::Raw { .. } => None,
        }
    }

    fn headers_mut(&mut self) -> &mut HeaderMap {
        match &mut self.0 {
            Inner::Raw { headers, .. } | Inner::Template { headers, .. } => headers,
        }
    }
}

impl IntoResponse for Response {
    fn into_response(self) -> axum::response::Response {
        match self.0 {
            Inner::Raw {
                status,
                body,
                headers,
            } => write_out(status, headers, body),
            Inner::Template {
                status,
                layout,
                context,
                mut headers,
                engine,
            } => match engine.render(&layout, &context) {
                Ok(html) => {
                    headers
                        .entry(header::CONTENT_TYPE)
                        .or_insert(HeaderValue::from_static("text/html; charset=utf-8"));
                    write_out(status, headers, html.into_bytes())
                }
                Err(err) => {
                    // Request-scoped failure: log and answer 500 without
                    // involving another layout.
                    tracing::error!(layout = %layout, error = %err, "layout render failed");
                    write_out(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        HeaderMap::new(),
                        Vec::new(),
                    )
                }
            },
        }
    }
}

/// Headers first, then status, then body.
fn write_out(status: StatusCode, headers: HeaderMap, body: Vec<u8>) -> axum::response::Response {
    let mut out = axum::response::Response::new(Body::from(body));
    *out.headers_mut() = headers;
    *out.status_mut() = status;
    out
}

#[cfg(test)]
mod tests {
    use std::fs;

    use axum::body::to_bytes;
    use minijinja::value::Value;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    async fn body_string(response: axum::response::Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn engine_with_layout(name: &str, source: &str) -> (TempDir, Engine) {
        let tmp = TempDir::new().unwrap();
        let layout_dir = tmp.path().join("layout");
        fs::create_dir_all(&layout_dir).unwrap();
        fs::write(layout_dir.join(name), source).unwrap();
        let engine = Engine::new(layout_dir, tmp.path().join("page"));
        (tmp, engine)
    }

    #[tokio::test]
    async fn text_sets_content_type_and_body() {
        let written = Response::text(StatusCode::OK, "hello").into_response();
        assert_eq!(written.status(), StatusCode::OK);
        assert_eq!(
            written.headers().get("content-type").unwrap(),
            "text/plain"
        );
        assert_eq!(body_string(written).await, "hello");
    }

    #[tokio::test]
    async fn json_sets_content_type_and_payload() {
        let written =
            Response::json(StatusCode::OK, &serde_json::json!({"x": 1})).into_response();
        assert_eq!(written.status(), StatusCode::OK);
        assert_eq!(
            written.headers().get("content-type").unwrap(),
            "application/json"
        );
        assert_eq!(body_string(written).await, "{\"x\":1}");
    }

    #[test]
    fn empty_has_no_body_or_headers() {
        let response = Response::empty(StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.headers().is_empty());
    }

    #[tokio::test]
    async fn cache_header_on_raw_variant() {
        let written = Response::text(StatusCode::OK, "x").cache("3600").into_response();
        assert_eq!(
            written.headers().get("cache-control").unwrap(),
            "public,max-age=3600"
        );
    }

    #[tokio::test]
    async fn cache_header_on_template_variant() {
        let (_tmp, engine) = engine_with_layout("default.html", "body");
        let written =
            Response::template_with_engine(engine, StatusCode::OK, "default.html", Value::UNDEFINED)
                .cache("3600")
                .into_response();
        assert_eq!(
            written.headers().get("cache-control").unwrap(),
            "public,max-age=3600"
        );
        assert_eq!(body_string(written).await, "body");
    }

    #[test]
    fn last_header_write_wins() {
        let response = Response::empty(StatusCode::OK)
            .header("X-Test", "one")
            .header("X-Test", "two");
        assert_eq!(response.headers().get("x-test").unwrap(), "two");
    }

    #[test]
    fn template_construction_never_touches_the_filesystem() {
        let response = Response::template(StatusCode::OK, "no-such-layout.html", Value::UNDEFINED);
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.layout(), Some("no-such-layout.html"));
    }

    #[tokio::test]
    async fn template_write_executes_layout_with_status_and_headers() {
        let (_tmp, engine) = engine_with_layout("page.html", "<p>{{ msg }}</p>");
        let context = Value::from_iter([("msg", "hi")]);
        let written =
            Response::template_with_engine(engine, StatusCode::OK, "page.html", context)
                .header("X-Served-By", "flatpage")
                .into_response();
        assert_eq!(written.status(), StatusCode::OK);
        assert_eq!(
            written.headers().get("content-type").unwrap(),
            "text/html; charset=utf-8"
        );
        assert_eq!(written.headers().get("x-served-by").unwrap(), "flatpage");
        assert_eq!(body_string(written).await, "<p>hi</p>");
    }

    #[tokio::test]
    async fn missing_layout_degrades_to_request_scoped_500() {
        let tmp = TempDir::new().unwrap();
        let engine = Engine::new(tmp.path().join("layout"), tmp.path().join("page"));
        let written =
            Response::template_with_engine(engine, StatusCode::OK, "gone.html", Value::UNDEFINED)
                .into_response();
        assert_eq!(written.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_string(written).await, "");
    }

    #[test]
    fn canonical_values_are_isolated_from_clones() {
        let customized = NOT_FOUND.clone().header("X-Test", "1");
        assert_eq!(customized.headers().get("x-test").unwrap(), "1");
        assert!(NOT_FOUND.headers().get("x-test").is_none());
        assert_eq!(NOT_FOUND.status(), StatusCode::NOT_FOUND);
        assert_eq!(NOT_FOUND.layout(), Some("404.html"));
        assert_eq!(SERVER_ERROR.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn canonical_not_found_renders_through_bound_engine() {
        let (_tmp, engine) = engine_with_layout("404.html", "<h1>Not Found</h1>");
        let written = NOT_FOUND.clone().with_engine(engine).into_response();
        assert_eq!(written.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_string(written).await, "<h1>Not Found</h1>");
    }

    #[test]
    fn invalid_header_is_dropped_not_raised() {
        let response = Response::empty(StatusCode::OK).header("bad header", "x");
        assert!(response.headers().is_empty());
    }
}
