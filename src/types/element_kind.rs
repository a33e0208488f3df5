//! This module defines the canonical, type-safe representation of the element
//! kinds a kzbuf buffer can be instantiated over.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::KzError;

/// The closed set of element encodings understood by the buffer layer.
///
/// `Bit` is stored packed eight to a byte, and the two complex kinds are stored
/// as interleaved pairs of their scalar integer kind. `Bytes` is raw `u8`
/// storage with no numeric interpretation beyond the text codec.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Int8,
    Int16,
    Int32,
    UInt8,
    UInt16,
    UInt32,
    Float32,
    Float64,
    Bit,
    Complex16,
    Complex32,
    Bytes,
}

impl ElementKind {
    /// Every kind, in declaration order.
    pub const ALL: [ElementKind; 12] = [
        Self::Int8,
        Self::Int16,
        Self::Int32,
        Self::UInt8,
        Self::UInt16,
        Self::UInt32,
        Self::Float32,
        Self::Float64,
        Self::Bit,
        Self::Complex16,
        Self::Complex32,
        Self::Bytes,
    ];

    /// Size in bytes of one storage unit. For `Bit` this is the byte that
    /// holds eight packed bits.
    pub fn byte_width(&self) -> usize {
        match self {
            Self::Int8 | Self::UInt8 | Self::Bytes | Self::Bit => 1,
            Self::Int16 | Self::UInt16 => 2,
            Self::Int32 | Self::UInt32 | Self::Float32 | Self::Complex16 => 4,
            Self::Float64 | Self::Complex32 => 8,
        }
    }

    /// Returns `true` if the kind is a signed integer.
    pub fn is_signed_int(&self) -> bool {
        matches!(self, Self::Int8 | Self::Int16 | Self::Int32)
    }

    /// Returns `true` if the kind is a floating-point number.
    pub fn is_float(&self) -> bool {
        matches!(self, Self::Float32 | Self::Float64)
    }

    pub fn is_complex(&self) -> bool {
        matches!(self, Self::Complex16 | Self::Complex32)
    }

    /// The name the runtime's code generator uses for this kind.
    pub fn runtime_name(&self) -> &'static str {
        match self {
            Self::Int8 => "int8",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::UInt8 => "uint8",
            Self::UInt16 => "uint16",
            Self::UInt32 => "uint32",
            Self::Float32 => "float",
            Self::Float64 => "double",
            Self::Bit => "bit",
            Self::Complex16 => "complex16",
            Self::Complex32 => "complex32",
            Self::Bytes => "bytes",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.runtime_name())
    }
}

impl FromStr for ElementKind {
    type Err = KzError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.runtime_name() == s)
            .ok_or_else(|| KzError::UnknownKind(s.to_string()))
    }
}
