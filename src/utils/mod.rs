//! Internal helpers.

pub(crate) mod http;
