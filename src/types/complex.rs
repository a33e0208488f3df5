//! Complex sample records.
//!
//! The runtime treats these as opaque pairs of integers; the buffer layer only
//! needs their layout, which is pinned by `#[repr(C)]` and checked at compile time.

use bytemuck::{Pod, Zeroable};

/// A pair of 16-bit integers, real part first.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct Complex16 {
    pub re: i16,
    pub im: i16,
}

/// A pair of 32-bit integers, real part first.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct Complex32 {
    pub re: i32,
    pub im: i32,
}

const _: () = assert!(std::mem::size_of::<Complex16>() == 2 * std::mem::size_of::<i16>());
const _: () = assert!(std::mem::size_of::<Complex32>() == 2 * std::mem::size_of::<i32>());
const _: () = assert!(std::mem::align_of::<Complex16>() == std::mem::align_of::<i16>());
const _: () = assert!(std::mem::align_of::<Complex32>() == std::mem::align_of::<i32>());

impl Complex16 {
    pub const fn new(re: i16, im: i16) -> Self {
        Self { re, im }
    }
}

impl Complex32 {
    pub const fn new(re: i32, im: i32) -> Self {
        Self { re, im }
    }
}
