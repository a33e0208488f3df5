//! Stateless kernels shared by every buffer instantiation.
//!
//! - `bitarray`: bit-granular read, write and copy over packed byte storage.
//! - `text`: the comma-separated decimal codec and its scalar parsers/printers.

pub mod bitarray;
pub mod text;
