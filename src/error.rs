// In: src/error.rs

//! This module defines the single, unified error type for the entire kzbuf library.
//! It uses the `thiserror` crate to provide ergonomic, context-aware error handling.
//!
//! Every condition that would otherwise bring the runtime down (missing files,
//! allocation failure, malformed bit text) is surfaced here so that the driver
//! decides whether to abort. Running out of data is *not* an error: `input`
//! reports it as `Ok(None)`.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::ElementKind;

#[derive(Error, Debug)]
pub enum KzError {
    // =========================================================================
    // === Device / File Errors
    // =========================================================================
    /// A configured source or destination file could not be opened, read or written.
    #[error("Cannot open file {}: {source}", .path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The destination device is `File` but no destination path was configured.
    #[error("Destination device is a file but no destination path was given")]
    MissingDestination,

    // =========================================================================
    // === Text Decoding Errors
    // =========================================================================
    #[error("Input file contains no samples")]
    EmptyInput,

    #[error("Illegal bit value: {0}")]
    IllegalBitValue(String),

    // =========================================================================
    // === Layout / Resource Errors
    // =========================================================================
    #[error(
        "Complex layout mismatch for {kind}: record is {complex_size} bytes, expected 2 x {scalar_size}"
    )]
    ComplexLayout {
        kind: ElementKind,
        complex_size: usize,
        scalar_size: usize,
    },

    #[error("Failed to grow {kind} buffer to {requested} elements")]
    AllocationFailed { kind: ElementKind, requested: usize },

    #[error("Buffer length mismatch: expected a multiple of {0}, got {1}")]
    BufferMismatch(usize, usize),

    #[error("Output data too short: need {needed} units, got {got}")]
    ShortInput { needed: usize, got: usize },

    #[error("Bit range {offset}..{offset}+{len} is outside an array of {available} bits")]
    BitRange {
        offset: usize,
        len: usize,
        available: usize,
    },

    #[error("Unknown element kind: {0}")]
    UnknownKind(String),

    #[error("Element kind mismatch: buffer holds {got}, caller expected {expected}")]
    KindMismatch {
        expected: ElementKind,
        got: ElementKind,
    },

    // =========================================================================
    // === External Error Wrappers
    // =========================================================================
    /// An error from a safe byte-casting operation failing.
    #[error("Byte slice casting error: {0}")]
    PodCast(String), // Manual `From` impl is needed as bytemuck::PodCastError doesn't impl Error

    /// An error from the Serde JSON library, raised while loading `IoParams`.
    #[error("Serde JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),
}

// =============================================================================
// === Manual `From` Implementations ===
// =============================================================================

impl From<bytemuck::PodCastError> for KzError {
    fn from(err: bytemuck::PodCastError) -> Self {
        KzError::PodCast(err.to_string())
    }
}

impl KzError {
    /// Wraps an I/O failure together with the path that caused it.
    pub(crate) fn file_access(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        KzError::FileAccess {
            path: path.into(),
            source,
        }
    }
}
