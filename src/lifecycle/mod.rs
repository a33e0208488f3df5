//! The per-kind entry points the runtime links against.
//!
//! Each element kind gets a named buffer type below. A code generator that
//! knows its types statically uses those directly through `StreamBuffer`; an
//! interpreter that only learns the kind at run time goes through `AnyBuffer`,
//! which speaks raw bytes and dispatches to the right instantiation.

pub mod any_buffer;

#[cfg(test)]
mod tests;

pub use any_buffer::AnyBuffer;
pub use crate::buffer::BitBuffer;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::buffer::{Buffer, ComplexBuffer};
use crate::config::Device;
use crate::traits::StreamBuffer;
use crate::types::{Byte, Complex16, Complex32};

//==================================================================================
// 1. Named Instantiations
//==================================================================================

pub type Int8Buffer = Buffer<i8>;
pub type Int16Buffer = Buffer<i16>;
pub type Int32Buffer = Buffer<i32>;
pub type UInt8Buffer = Buffer<u8>;
pub type UInt16Buffer = Buffer<u16>;
pub type UInt32Buffer = Buffer<u32>;
pub type FloatBuffer = Buffer<f32>;
pub type DoubleBuffer = Buffer<f64>;
pub type Complex16Buffer = ComplexBuffer<Complex16>;
pub type Complex32Buffer = ComplexBuffer<Complex32>;
pub type ByteBuffer = Buffer<Byte>;

//==================================================================================
// 2. State Reporting
//==================================================================================

/// Which side of a stream a buffer was initialized for.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Input,
    Output,
}

/// Where a buffer is in its lifecycle.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BufferState {
    /// A file-backed input with elements left to hand out.
    Loaded,
    /// A file-backed input that has handed out every element.
    Exhausted,
    /// A file-backed output collecting elements until cleanup.
    Accumulating,
    /// A null output: everything written is dropped.
    Discarding,
    /// A null input: every read yields zeroes.
    Synthesizing,
}

impl BufferState {
    pub fn of<B: StreamBuffer>(buffer: &B, direction: Direction) -> Self {
        match (direction, buffer.device()) {
            (Direction::Input, Device::Null) => Self::Synthesizing,
            (Direction::Input, Device::File) if buffer.is_exhausted() => Self::Exhausted,
            (Direction::Input, Device::File) => Self::Loaded,
            (Direction::Output, Device::Null) => Self::Discarding,
            (Direction::Output, Device::File) => Self::Accumulating,
        }
    }
}

impl fmt::Display for BufferState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Loaded => "loaded",
            Self::Exhausted => "exhausted",
            Self::Accumulating => "accumulating",
            Self::Discarding => "discarding",
            Self::Synthesizing => "synthesizing",
        };
        f.write_str(name)
    }
}
