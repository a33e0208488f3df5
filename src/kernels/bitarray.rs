//! This module contains the pure, stateless kernels for bit-granular addressing
//! of packed bit arrays.
//!
//! Bits are packed eight per byte in little-endian bit order: logical bit `i`
//! lives in byte `i / 8` at bit position `i % 8`. All kernels are built on
//! `bitvec`'s `BitSlice<u8, Lsb0>` views, which express exactly that layout.

use bitvec::prelude::*;

use crate::error::KzError;

/// Width in bits of one storage unit.
pub const BIT_ARRAY_ELEM_BITS: usize = u8::BITS as usize;

/// Number of storage bytes needed to hold `bits` packed bits.
#[inline]
pub fn packed_len(bits: usize) -> usize {
    bits.div_ceil(BIT_ARRAY_ELEM_BITS)
}

/// Returns `true` iff bit `i` is set.
///
/// # Panics
/// Panics if `i` is not addressable within `units`, like slice indexing.
#[inline]
pub fn read_bit(units: &[u8], i: usize) -> bool {
    units.view_bits::<Lsb0>()[i]
}

/// Sets or clears bit `i`, leaving every other bit of its byte untouched.
///
/// # Panics
/// Panics if `i` is not addressable within `units`, like slice indexing.
#[inline]
pub fn write_bit(units: &mut [u8], i: usize, value: bool) {
    units.view_bits_mut::<Lsb0>().set(i, value);
}

/// Copies `n` bits from `src` starting at bit `src_offset` into `dst` starting
/// at bit `dst_offset`. Neither offset needs to be byte aligned, and bits of
/// `dst` outside the target range are preserved.
pub fn bitarray_copy(
    dst: &mut [u8],
    dst_offset: usize,
    src: &[u8],
    src_offset: usize,
    n: usize,
) -> Result<(), KzError> {
    let src_bits = src.view_bits::<Lsb0>();
    let dst_bits = dst.view_bits_mut::<Lsb0>();

    check_range(src_offset, n, src_bits.len())?;
    check_range(dst_offset, n, dst_bits.len())?;

    dst_bits[dst_offset..dst_offset + n].copy_from_bitslice(&src_bits[src_offset..src_offset + n]);
    Ok(())
}

/// Zeroes every bit at or beyond `bits` in the final partially used byte.
pub fn clear_tail(units: &mut [u8], bits: usize) {
    let end = packed_len(bits) * BIT_ARRAY_ELEM_BITS;
    let view = units.view_bits_mut::<Lsb0>();
    if bits < end && end <= view.len() {
        view[bits..end].fill(false);
    }
}

fn check_range(offset: usize, len: usize, available: usize) -> Result<(), KzError> {
    match offset.checked_add(len) {
        Some(end) if end <= available => Ok(()),
        _ => Err(KzError::BitRange {
            offset,
            len,
            available,
        }),
    }
}

//==================================================================================
// Unit Tests
//==================================================================================
