//! This file is the root of the `kzbuf` Rust crate: the typed I/O buffer layer
//! of the kz streaming-program runtime.
//!
//! Its responsibilities are strictly limited to:
//! 1.  Declaring all the top-level modules of the library (`buffer`, `kernels`, etc.)
//!     so the Rust compiler knows they exist.
//! 2.  Re-exporting the handful of types a runtime driver needs.

//==================================================================================
// 0. Constants
//==================================================================================
/// The crate version, automatically set from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[doc(hidden)]
pub use log as __log;
#[doc(hidden)]
pub use observability::METRIC_LEVEL as __METRIC_LEVEL;

//==================================================================================
// 1. Module Declarations
//==================================================================================
#[macro_use]
mod observability; // Make macros available throughout the crate

pub mod buffer;
pub mod config;
pub mod error;
pub mod kernels;
pub mod lifecycle;
pub mod logging;
pub mod traits;
pub mod types;
pub mod utils;

//==================================================================================
// 2. Public Surface
//==================================================================================
pub use buffer::{BitBuffer, Buffer, ComplexBuffer};
pub use config::{Device, Encoding, IoParams, DEFAULT_BUFSIZE};
pub use error::KzError;
pub use lifecycle::{AnyBuffer, BufferState, Direction};
pub use logging::enable_verbose_logging;
pub use traits::{ComplexElement, Element, StreamBuffer};
pub use types::{Byte, Complex16, Complex32, ElementKind};
