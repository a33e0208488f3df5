//! This module defines the shared traits the buffer layer is generic over.
//!
//! - `Element`: a fixed-width scalar sample with a text form.
//! - `ComplexElement`: a pair of `Element` scalars stored contiguously.
//! - `StreamBuffer`: the init / input / output / cleanup lifecycle every
//!   buffer instantiation exposes to the runtime.

use std::fmt;

use bytemuck::Pod;

use crate::config::{Device, IoParams};
use crate::error::KzError;
use crate::kernels::text;
use crate::types::{Byte, Complex16, Complex32, ElementKind};

//==================================================================================
// 1. Scalar Elements
//==================================================================================

/// A fixed-width sample type that can live in a `Buffer`.
pub trait Element: Pod + PartialEq + fmt::Debug + Send + Sync + 'static {
    const KIND: ElementKind;

    /// Size of one element in bytes.
    fn byte_width() -> usize {
        std::mem::size_of::<Self>()
    }

    /// Parses one text token. `None` means the token is unparseable.
    fn parse_token(token: &str) -> Option<Self>;

    /// Appends the decimal text form of `self` to `out`.
    fn write_token(&self, out: &mut String);
}

macro_rules! impl_signed_element {
    ($T:ty, $kind:ident) => {
        impl Element for $T {
            const KIND: ElementKind = ElementKind::$kind;

            fn parse_token(token: &str) -> Option<Self> {
                text::parse_signed::<$T>(token)
            }

            fn write_token(&self, out: &mut String) {
                text::print_integer(out, *self)
            }
        }
    };
}

macro_rules! impl_unsigned_element {
    ($T:ty, $kind:ident) => {
        impl Element for $T {
            const KIND: ElementKind = ElementKind::$kind;

            fn parse_token(token: &str) -> Option<Self> {
                text::parse_unsigned::<$T>(token)
            }

            fn write_token(&self, out: &mut String) {
                text::print_integer(out, *self)
            }
        }
    };
}

macro_rules! impl_float_element {
    ($T:ty, $kind:ident) => {
        impl Element for $T {
            const KIND: ElementKind = ElementKind::$kind;

            fn parse_token(token: &str) -> Option<Self> {
                text::parse_float::<$T>(token)
            }

            fn write_token(&self, out: &mut String) {
                text::print_float(out, f64::from(*self))
            }
        }
    };
}

impl_signed_element!(i8, Int8);
impl_signed_element!(i16, Int16);
impl_signed_element!(i32, Int32);
impl_unsigned_element!(u8, UInt8);
impl_unsigned_element!(u16, UInt16);
impl_unsigned_element!(u32, UInt32);
impl_float_element!(f32, Float32);
impl_float_element!(f64, Float64);

impl Element for Byte {
    const KIND: ElementKind = ElementKind::Bytes;

    fn parse_token(token: &str) -> Option<Self> {
        text::parse_unsigned::<u8>(token).map(Byte)
    }

    fn write_token(&self, out: &mut String) {
        text::print_integer(out, self.0)
    }
}

//==================================================================================
// 2. Complex Elements
//==================================================================================

/// A complex sample stored as two contiguous scalars, real part first.
///
/// Implementors must be exactly twice the size of `Scalar` with the same
/// alignment; `check_layout` verifies this before any buffer is built.
pub trait ComplexElement: Pod + PartialEq + fmt::Debug + Send + Sync + 'static {
    type Scalar: Element;
    const KIND: ElementKind;

    fn new(re: Self::Scalar, im: Self::Scalar) -> Self;
    fn re(&self) -> Self::Scalar;
    fn im(&self) -> Self::Scalar;

    fn check_layout() -> Result<(), KzError> {
        let complex_size = std::mem::size_of::<Self>();
        let scalar_size = std::mem::size_of::<Self::Scalar>();
        if complex_size != 2 * scalar_size
            || std::mem::align_of::<Self>() != std::mem::align_of::<Self::Scalar>()
        {
            return Err(KzError::ComplexLayout {
                kind: Self::KIND,
                complex_size,
                scalar_size,
            });
        }
        Ok(())
    }
}

macro_rules! impl_complex_element {
    ($C:ty, $S:ty, $kind:ident) => {
        impl ComplexElement for $C {
            type Scalar = $S;
            const KIND: ElementKind = ElementKind::$kind;

            fn new(re: $S, im: $S) -> Self {
                Self { re, im }
            }

            fn re(&self) -> $S {
                self.re
            }

            fn im(&self) -> $S {
                self.im
            }
        }
    };
}

impl_complex_element!(Complex16, i16, Complex16);
impl_complex_element!(Complex32, i32, Complex32);

//==================================================================================
// 3. Buffer Lifecycle
//==================================================================================

/// The lifecycle every buffer instantiation exposes to the runtime.
///
/// `Unit` is what the runtime hands in and gets back: the element itself for
/// scalar and complex buffers, packed bytes for bit buffers. Counts (`n`,
/// `cursor`, `capacity`) are always in logical elements, i.e. in bits for a
/// bit buffer and in pairs for a complex buffer.
pub trait StreamBuffer: Sized {
    type Unit: Pod;

    const KIND: ElementKind;

    /// Binds a buffer to the configured source, loading a whole file if there is one.
    fn init_input(params: &IoParams) -> Result<Self, KzError>;

    /// Allocates an empty buffer that accumulates data for the configured destination.
    fn init_output(params: &IoParams) -> Result<Self, KzError>;

    /// Returns the next `n` elements, or `None` once fewer than `n` remain.
    ///
    /// The returned slice is only valid until the next call on this buffer.
    fn input(&mut self, n: usize) -> Result<Option<&[Self::Unit]>, KzError>;

    /// Appends the first `n` elements of `data`, growing storage as needed.
    fn output(&mut self, data: &[Self::Unit], n: usize) -> Result<(), KzError>;

    /// Releases an input buffer.
    fn cleanup_input(self, params: &IoParams);

    /// Flushes an output buffer to its destination, then releases it.
    fn cleanup_output(self, params: &IoParams) -> Result<(), KzError>;

    fn kind(&self) -> ElementKind {
        Self::KIND
    }

    fn device(&self) -> Device;

    fn cursor(&self) -> usize;

    fn capacity(&self) -> usize;

    /// `true` when a file-backed input buffer has handed out every element.
    fn is_exhausted(&self) -> bool {
        self.device() == Device::File && self.cursor() >= self.capacity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_widths_and_kinds() {
        assert_eq!(<i8 as Element>::byte_width(), 1);
        assert_eq!(<u16 as Element>::byte_width(), 2);
        assert_eq!(<f64 as Element>::byte_width(), 8);
        assert_eq!(<f32 as Element>::KIND, ElementKind::Float32);
        assert_eq!(<u8 as Element>::KIND, ElementKind::UInt8);
        assert_eq!(<Byte as Element>::KIND, ElementKind::Bytes);
        assert_eq!(<Byte as Element>::byte_width(), 1);
    }

    #[test]
    fn test_element_text_forms() {
        let mut out = String::new();
        (-5i8).write_token(&mut out);
        out.push('|');
        2.25f32.write_token(&mut out);
        assert_eq!(out, "-5|2.250000");
        assert_eq!(u16::parse_token("65535"), Some(u16::MAX));
        assert_eq!(u16::parse_token("65536"), None);
        assert_eq!(f32::parse_token("x"), None);
        assert_eq!(Byte::parse_token("255"), Some(Byte(255)));
    }

    #[test]
    fn test_complex_layouts_hold() {
        Complex16::check_layout().unwrap();
        Complex32::check_layout().unwrap();
        let c = Complex16::new(3, -4);
        assert_eq!((c.re(), c.im()), (3, -4));
    }
}
