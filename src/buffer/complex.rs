//! Complex buffers: a buffer of pairs wrapping a buffer of scalars.
//!
//! All storage, parsing and flushing is delegated to `Buffer<C::Scalar>`,
//! which holds twice as many scalars as there are complex values. Counts are
//! doubled on the way in and halved on the way out, and slices are converted
//! with `bytemuck` casts rather than raw pointer reinterpretation.

use std::marker::PhantomData;

use crate::buffer::Buffer;
use crate::config::{Device, IoParams};
use crate::error::KzError;
use crate::traits::{ComplexElement, StreamBuffer};
use crate::types::ElementKind;

/// A growable buffer of complex pairs bound to a source or destination.
#[derive(Debug)]
pub struct ComplexBuffer<C: ComplexElement> {
    inner: Buffer<C::Scalar>,
    _pair: PhantomData<C>,
}

impl<C: ComplexElement> ComplexBuffer<C> {
    fn wrap(inner: Buffer<C::Scalar>) -> Self {
        Self {
            inner,
            _pair: PhantomData,
        }
    }

    /// The underlying interleaved scalar buffer.
    pub fn scalars(&self) -> &Buffer<C::Scalar> {
        &self.inner
    }

    /// Complex values already consumed (input) or written (output).
    pub fn as_slice(&self) -> Result<&[C], KzError> {
        Ok(bytemuck::try_cast_slice(self.inner.as_slice())?)
    }
}

impl<C: ComplexElement> StreamBuffer for ComplexBuffer<C> {
    type Unit = C;

    const KIND: ElementKind = C::KIND;

    fn init_input(params: &IoParams) -> Result<Self, KzError> {
        C::check_layout()?;
        Ok(Self::wrap(Buffer::init_input(params)?))
    }

    fn init_output(params: &IoParams) -> Result<Self, KzError> {
        C::check_layout()?;
        Ok(Self::wrap(Buffer::init_output(params)?))
    }

    fn input(&mut self, n: usize) -> Result<Option<&[C]>, KzError> {
        let scalars = n.checked_mul(2).ok_or(KzError::BufferMismatch(2, n))?;
        match self.inner.input(scalars)? {
            Some(slice) => Ok(Some(bytemuck::try_cast_slice(slice)?)),
            None => Ok(None),
        }
    }

    fn output(&mut self, data: &[C], n: usize) -> Result<(), KzError> {
        let data = data.get(..n).ok_or(KzError::ShortInput {
            needed: n,
            got: data.len(),
        })?;
        let scalars: &[C::Scalar] = bytemuck::try_cast_slice(data)?;
        self.inner.output(scalars, scalars.len())
    }

    fn cleanup_input(self, params: &IoParams) {
        self.inner.cleanup_input(params)
    }

    fn cleanup_output(self, params: &IoParams) -> Result<(), KzError> {
        self.inner.cleanup_output(params)
    }

    fn device(&self) -> Device {
        self.inner.device()
    }

    fn cursor(&self) -> usize {
        self.inner.cursor() / 2
    }

    fn capacity(&self) -> usize {
        self.inner.capacity() / 2
    }
}
