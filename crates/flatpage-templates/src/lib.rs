//! Layout resolution and execution.
//!
//! Layouts are minijinja templates resolved by file name under a fixed
//! layout directory. Every render reads and parses the layout fresh, so
//! editing a layout file takes effect without a process restart. That
//! trades per-request work for authoring convenience, which is the right
//! trade for a low-traffic content site.
//!
//! Two helper functions are registered for every layout and are part of
//! the contract any layout file may rely on:
//!
//! - `label(s)` - title-case a slug for display (`"my-page"` -> `"My-Page"`)
//! - `menu(section)` - filename-to-label map for the immediate files of
//!   `page/<section>/`
//!
//! Helper and layout failures surface as [`TemplateError`] so the caller
//! can turn them into a request-scoped error response instead of taking
//! the whole process down.

use std::fs;
use std::path::{Path, PathBuf};

use minijinja::value::Value;
use minijinja::{Environment, ErrorKind};

/// Default layout directory, relative to the working directory.
pub const LAYOUT_DIR: &str = "layout";

/// Default page content directory, listed by the `menu` helper.
pub const PAGE_DIR: &str = "page";

/// Error returned when a layout cannot be rendered.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    /// Layout file missing or unreadable.
    #[error("layout not found: {}", .0.display())]
    Resolve(PathBuf),
    /// Layout failed to parse or execute (including helper failures).
    #[error("layout render failed: {0}")]
    Render(#[from] minijinja::Error),
}

/// Template engine bound to a layout directory and a page directory.
///
/// Holds only the two paths; cheap to clone. Parsing happens per render
/// call, never at construction.
#[derive(Clone, Debug)]
pub struct Engine {
    layout_dir: PathBuf,
    page_dir: PathBuf,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(LAYOUT_DIR, PAGE_DIR)
    }
}

impl Engine {
    /// Create an engine with explicit layout and page directories.
    pub fn new(layout_dir: impl Into<PathBuf>, page_dir: impl Into<PathBuf>) -> Self {
        Self {
            layout_dir: layout_dir.into(),
            page_dir: page_dir.into(),
        }
    }

    /// Render `layout_name` against `context`.
    ///
    /// The layout file is read and parsed on every call. Values in the
    /// context are HTML-escaped on output unless marked safe.
    ///
    /// # Errors
    ///
    /// [`TemplateError::Resolve`] if the layout file cannot be read,
    /// [`TemplateError::Render`] if it fails to parse or execute.
    pub fn render(&self, layout_name: &str, context: &Value) -> Result<String, TemplateError> {
        let path = self.layout_dir.join(layout_name);
        let source =
            fs::read_to_string(&path).map_err(|_| TemplateError::Resolve(path.clone()))?;

        let mut env = Environment::new();
        env.add_function("label", |slug: String| label(&slug));
        let page_dir = self.page_dir.clone();
        env.add_function("menu", move |section: String| menu(&page_dir, &section));

        env.add_template_owned(layout_name.to_owned(), source)?;
        let template = env.get_template(layout_name)?;
        Ok(template.render(context)?)
    }
}

/// Title-case a slug for display.
///
/// The first letter of every letter run is uppercased; delimiters pass
/// through unchanged: `"my-page"` becomes `"My-Page"`.
#[must_use]
pub fn label(slug: &str) -> String {
    let mut out = String::with_capacity(slug.len());
    let mut prev_is_letter = false;
    for c in slug.chars() {
        if c.is_alphabetic() && !prev_is_letter {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        prev_is_letter = c.is_alphabetic();
    }
    out
}

/// Build the menu map for a section: the immediate files of
/// `<page_dir>/<section>`, keyed by file name without extension, with a
/// title-cased display label as the value. Subdirectories are skipped.
///
/// # Errors
///
/// Returns a minijinja error if the section directory cannot be read,
/// which fails the enclosing render rather than the process.
pub fn menu(page_dir: &Path, section: &str) -> Result<Value, minijinja::Error> {
    let dir = page_dir.join(section);
    let entries = fs::read_dir(&dir).map_err(|err| {
        minijinja::Error::new(
            ErrorKind::InvalidOperation,
            format!("menu: cannot read {}: {err}", dir.display()),
        )
    })?;

    let mut links: Vec<(String, String)> = Vec::new();
    for entry in entries.flatten() {
        if entry.file_type().is_ok_and(|t| t.is_dir()) {
            continue;
        }
        let path = entry.path();
        if let Some(stem) = path.file_stem() {
            let name = stem.to_string_lossy().into_owned();
            let display = label(&name);
            links.push((name, display));
        }
    }
    Ok(Value::from_iter(links))
}
