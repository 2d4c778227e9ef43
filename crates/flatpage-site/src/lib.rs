//! Page resolution pipeline.
//!
//! A page name maps to two candidate files under the content root:
//! `<root>/<name>.md` (required markdown source) and `<root>/<name>.json`
//! (optional sidecar with layout selection and template data). [`Site`]
//! resolves a name to a [`Response`](flatpage_response::Response):
//! markdown becomes HTML, sidecar data becomes the render context, and
//! the converted HTML is injected under the reserved `Body` key.
//!
//! Everything is constructed fresh per request and discarded after the
//! response is written; there are no caches and no shared mutable state,
//! so concurrent resolutions of the same page are fully independent.

mod page;
mod sidecar;

pub use page::{Site, SiteConfig};
pub use sidecar::PageSettings;
