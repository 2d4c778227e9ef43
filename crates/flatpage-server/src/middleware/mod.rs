//! Router middleware.

pub(crate) mod security;
