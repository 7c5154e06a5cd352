//! Common utilities for Stribog.
//!
//! This crate provides the foundational types used across the Stribog crates:
//!
//! - [`BinaryReader`] - Zero-copy binary reading from byte slices
//! - [`Error`] - The common error type

mod error;
mod reader;

pub use error::{Error, Result};
pub use reader::BinaryReader;

/// Re-export zerocopy traits for convenience
pub use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};
