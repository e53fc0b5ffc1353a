//! Common utilities for h4r.
//!
//! This crate provides foundational types and utilities used across the h4r crates:
//!
//! - [`BinaryReader`] - Zero-copy little-endian reading from byte slices
//! - [`format_bytes`] - Human-readable byte counts
//! - [`scan`] - Byte-signature scanning

mod error;
mod format;
mod reader;

pub mod scan;

pub use error::{Error, Result};
pub use format::format_bytes;
pub use reader::BinaryReader;
