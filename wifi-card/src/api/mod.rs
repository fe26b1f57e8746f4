//! Public API module.
//!
//! This module contains the data types shared by every part of the
//! `wifi-card` crate.

pub mod models;
