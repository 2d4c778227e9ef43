//! Page name to response resolution.

use std::fs;
use std::io;
use std::path::PathBuf;

use flatpage_response::{NOT_FOUND, Response, StatusCode};
use flatpage_templates::{Engine, LAYOUT_DIR, PAGE_DIR};
use minijinja::value::Value;

use crate::sidecar::{self, Sidecar};

/// Reserved context key holding the page's converted markdown.
const BODY_KEY: &str = "Body";

/// Configuration for [`Site`].
#[derive(Clone, Debug)]
pub struct SiteConfig {
    /// Directory holding `<name>.md` and `<name>.json` sources.
    pub page_dir: PathBuf,
    /// Directory holding layout templates.
    pub layout_dir: PathBuf,
    /// Treat a present-but-malformed sidecar as a server error instead
    /// of silently rendering with empty data.
    pub strict_sidecar: bool,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            page_dir: PathBuf::from(PAGE_DIR),
            layout_dir: PathBuf::from(LAYOUT_DIR),
            strict_sidecar: false,
        }
    }
}

/// Resolves page names to responses.
///
/// Holds only configuration; every resolution reads its own files and
/// builds its own context, so a single `Site` is safe to share across
/// concurrent requests without locking.
#[derive(Clone, Debug)]
pub struct Site {
    config: SiteConfig,
}

impl Site {
    #[must_use]
    pub fn new(config: SiteConfig) -> Self {
        Self { config }
    }

    /// Resolve a page name to a response.
    ///
    /// Missing markdown source yields the canonical 404; any other read
    /// failure is logged and yields the canonical 500. The sidecar is
    /// optional: absent or (in the default mode) malformed, it
    /// contributes empty settings and data.
    ///
    /// Callers are expected to have restricted `name` to alphanumerics
    /// and slashes; nothing here depends on that, but un-vetted names
    /// simply fall out as 404 or 500.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Response {
        let engine = Engine::new(
            self.config.layout_dir.clone(),
            self.config.page_dir.clone(),
        );

        let markdown = match fs::read_to_string(self.source_path(name, "md")) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return NOT_FOUND.clone().with_engine(engine);
            }
            Err(err) => return Response::error("reading page source", &err),
        };
        let body = flatpage_renderer::render_markdown(&markdown);

        let sidecar = match sidecar::load(&self.source_path(name, "json")) {
            Ok(sidecar) => sidecar,
            Err(err) if self.config.strict_sidecar => {
                return Response::error("loading page sidecar", &err);
            }
            Err(err) => {
                tracing::debug!(page = name, error = %err, "ignoring unusable sidecar");
                Sidecar::default()
            }
        };

        let layout = sidecar.settings.layout().to_owned();
        let context = build_context(sidecar, body);
        Response::template_with_engine(engine, StatusCode::OK, layout, context)
    }

    fn source_path(&self, name: &str, ext: &str) -> PathBuf {
        self.config.page_dir.join(format!("{name}.{ext}"))
    }
}

/// Sidecar data plus the converted markdown under [`BODY_KEY`], which
/// always overwrites a colliding sidecar key. The HTML is marked safe so
/// layouts render it verbatim.
fn build_context(sidecar: Sidecar, body: String) -> Value {
    let mut entries: Vec<(String, Value)> = sidecar
        .data
        .into_iter()
        .filter(|(key, _)| key != BODY_KEY)
        .map(|(key, value)| (key, Value::from_serialize(value)))
        .collect();
    entries.push((BODY_KEY.to_owned(), Value::from_safe_string(body)));
    Value::from_iter(entries)
}
