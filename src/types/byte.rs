//! The raw byte element.

use bytemuck::{Pod, Zeroable};

/// One uninterpreted byte. Shares `u8`'s layout and text form but reports
/// `ElementKind::Bytes`, so byte streams stay distinct from `uint8` samples.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Pod, Zeroable)]
pub struct Byte(pub u8);

impl From<u8> for Byte {
    fn from(value: u8) -> Self {
        Byte(value)
    }
}

impl From<Byte> for u8 {
    fn from(value: Byte) -> Self {
        value.0
    }
}
