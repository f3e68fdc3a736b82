//! Utility functions and helpers.
//!
//! # Submodules
//!
//! - [`permissions`]: Cross-platform file permissions

/// Unix permission handling
pub mod permissions;
