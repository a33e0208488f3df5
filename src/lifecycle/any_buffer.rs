//! A type-erased buffer chosen from an `ElementKind` at run time.
//!
//! Data crosses this boundary as native-endian bytes. Counts stay in logical
//! elements: bits for `Bit`, pairs for the complex kinds.

use crate::config::{Device, IoParams};
use crate::error::KzError;
use crate::lifecycle::{
    BitBuffer, BufferState, ByteBuffer, Complex16Buffer, Complex32Buffer, Direction, DoubleBuffer,
    FloatBuffer, Int16Buffer, Int32Buffer, Int8Buffer, UInt16Buffer, UInt32Buffer, UInt8Buffer,
};
use crate::traits::StreamBuffer;
use crate::types::ElementKind;
use crate::utils;

#[derive(Debug)]
pub enum AnyBuffer {
    Int8(Int8Buffer),
    Int16(Int16Buffer),
    Int32(Int32Buffer),
    UInt8(UInt8Buffer),
    UInt16(UInt16Buffer),
    UInt32(UInt32Buffer),
    Float32(FloatBuffer),
    Float64(DoubleBuffer),
    Bit(BitBuffer),
    Complex16(Complex16Buffer),
    Complex32(Complex32Buffer),
    Bytes(ByteBuffer),
}

/// Builds the variant matching `$kind` by calling `$init` on its buffer type.
macro_rules! build_for_kind {
    ($kind:expr, $init:ident, $params:expr) => {
        match $kind {
            ElementKind::Int8 => AnyBuffer::Int8(Int8Buffer::$init($params)?),
            ElementKind::Int16 => AnyBuffer::Int16(Int16Buffer::$init($params)?),
            ElementKind::Int32 => AnyBuffer::Int32(Int32Buffer::$init($params)?),
            ElementKind::UInt8 => AnyBuffer::UInt8(UInt8Buffer::$init($params)?),
            ElementKind::UInt16 => AnyBuffer::UInt16(UInt16Buffer::$init($params)?),
            ElementKind::UInt32 => AnyBuffer::UInt32(UInt32Buffer::$init($params)?),
            ElementKind::Float32 => AnyBuffer::Float32(FloatBuffer::$init($params)?),
            ElementKind::Float64 => AnyBuffer::Float64(DoubleBuffer::$init($params)?),
            ElementKind::Bit => AnyBuffer::Bit(BitBuffer::$init($params)?),
            ElementKind::Complex16 => AnyBuffer::Complex16(Complex16Buffer::$init($params)?),
            ElementKind::Complex32 => AnyBuffer::Complex32(Complex32Buffer::$init($params)?),
            ElementKind::Bytes => AnyBuffer::Bytes(ByteBuffer::$init($params)?),
        }
    };
}

/// Evaluates `$body` with `$buf` bound to whichever concrete buffer `$any` holds.
macro_rules! dispatch {
    ($any:expr, $buf:ident => $body:expr) => {
        match $any {
            AnyBuffer::Int8($buf) => $body,
            AnyBuffer::Int16($buf) => $body,
            AnyBuffer::Int32($buf) => $body,
            AnyBuffer::UInt8($buf) => $body,
            AnyBuffer::UInt16($buf) => $body,
            AnyBuffer::UInt32($buf) => $body,
            AnyBuffer::Float32($buf) => $body,
            AnyBuffer::Float64($buf) => $body,
            AnyBuffer::Bit($buf) => $body,
            AnyBuffer::Complex16($buf) => $body,
            AnyBuffer::Complex32($buf) => $body,
            AnyBuffer::Bytes($buf) => $body,
        }
    };
}

fn input_bytes<B: StreamBuffer>(buffer: &mut B, n: usize) -> Result<Option<&[u8]>, KzError> {
    Ok(buffer.input(n)?.map(bytemuck::cast_slice::<B::Unit, u8>))
}

fn output_bytes<B: StreamBuffer>(buffer: &mut B, data: &[u8], n: usize) -> Result<(), KzError> {
    let typed = utils::bytes_as_typed::<B::Unit>(data)?;
    buffer.output(&typed, n)
}

impl AnyBuffer {
    pub fn init_input(kind: ElementKind, params: &IoParams) -> Result<Self, KzError> {
        let buffer = build_for_kind!(kind, init_input, params);
        log::debug!(
            "Initialized {} input buffer on {:?} device",
            kind,
            params.source_device
        );
        Ok(buffer)
    }

    pub fn init_output(kind: ElementKind, params: &IoParams) -> Result<Self, KzError> {
        let buffer = build_for_kind!(kind, init_output, params);
        log::debug!(
            "Initialized {} output buffer on {:?} device",
            kind,
            params.destination_device
        );
        Ok(buffer)
    }

    pub fn kind(&self) -> ElementKind {
        dispatch!(self, buf => buf.kind())
    }

    /// Fails with `KindMismatch` unless this buffer holds `expected`.
    pub fn expect_kind(&self, expected: ElementKind) -> Result<(), KzError> {
        let got = self.kind();
        if got != expected {
            return Err(KzError::KindMismatch { expected, got });
        }
        Ok(())
    }

    /// The next `n` elements as raw bytes, or `None` at end of data.
    ///
    /// For `Bit` the slice holds `ceil(n / 8)` packed bytes; otherwise it holds
    /// `n * kind().byte_width()` bytes.
    pub fn input(&mut self, n: usize) -> Result<Option<&[u8]>, KzError> {
        dispatch!(self, buf => input_bytes(buf, n))
    }

    /// Appends `n` elements decoded from `data`, which must hold a whole
    /// number of storage units.
    pub fn output(&mut self, data: &[u8], n: usize) -> Result<(), KzError> {
        dispatch!(self, buf => output_bytes(buf, data, n))
    }

    pub fn cleanup_input(self, params: &IoParams) {
        dispatch!(self, buf => buf.cleanup_input(params))
    }

    pub fn cleanup_output(self, params: &IoParams) -> Result<(), KzError> {
        dispatch!(self, buf => buf.cleanup_output(params))
    }

    pub fn device(&self) -> Device {
        dispatch!(self, buf => buf.device())
    }

    pub fn cursor(&self) -> usize {
        dispatch!(self, buf => buf.cursor())
    }

    pub fn capacity(&self) -> usize {
        dispatch!(self, buf => buf.capacity())
    }

    pub fn is_exhausted(&self) -> bool {
        dispatch!(self, buf => buf.is_exhausted())
    }

    pub fn state(&self, direction: Direction) -> BufferState {
        dispatch!(self, buf => BufferState::of(buf, direction))
    }
}
