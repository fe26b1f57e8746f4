//! Shared constant tables.

pub(crate) mod constants;
