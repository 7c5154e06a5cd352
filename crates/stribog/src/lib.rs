//! Stribog - zero-copy texture container parsing.
//!
//! This crate provides a unified interface to the Stribog library ecosystem
//! for reading GPU texture containers.
//!
//! # Crates
//!
//! - [`stribog_common`] - Common utilities (binary reading)
//! - [`stribog_texture`] - DDS/KTX container parsing and sub-image location
//!
//! # Example
//!
//! ```no_run
//! use stribog::prelude::*;
//!
//! let data = std::fs::read("skybox.ktx")?;
//! let info = parse(&data)?;
//!
//! if info.is_cubemap() {
//!     for face in 0..6 {
//!         let sub = info.sub_image(&data, 0, face, 0);
//!         println!("face {}: {} bytes", face, sub.size_bytes());
//!     }
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Re-export all sub-crates
pub use stribog_common as common;
pub use stribog_texture as texture;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use stribog_common::BinaryReader;
    pub use stribog_texture::{
        parse, SubImage, TextureFlags, TextureFormat, TextureInfo,
    };
}

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
