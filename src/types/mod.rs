//! This module defines the core, strongly-typed data representations used
//! throughout the buffer layer.
//!
//! It currently holds the canonical `ElementKind` enum, the two complex pair
//! records (`Complex16`, `Complex32`) that the complex buffers store, and the
//! raw `Byte` element.

pub mod byte;
pub mod complex;
pub mod element_kind;

// Re-export the main type(s) for easier access.
pub use byte::Byte;
pub use complex::{Complex16, Complex32};
pub use element_kind::ElementKind;
