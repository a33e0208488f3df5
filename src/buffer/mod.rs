//! The growable, cursor-tracked buffers behind every element kind.
//!
//! `Buffer<T>` is the generic engine: one instantiation per scalar kind. The
//! bit and complex kinds adapt it:
//!
//! - `BitBuffer` keeps the same discipline over packed bytes, counting capacity
//!   and cursor in bits.
//! - `ComplexBuffer<C>` wraps a `Buffer<C::Scalar>` holding twice as many
//!   scalars, converting counts at its public boundary only.
//!
//! Storage grows by repeated doubling, so appends cost amortized O(1).

pub mod bit;
pub mod complex;


pub use bit::BitBuffer;
pub use complex::ComplexBuffer;

use std::path::Path;

use crate::config::{Device, Encoding, IoParams};
use crate::error::KzError;
use crate::kernels::text;
use crate::traits::{Element, StreamBuffer};
use crate::types::ElementKind;
use crate::utils;

//==================================================================================
// 1. Shared Helpers
//==================================================================================

/// Doubles `current` until it can hold `required` elements.
pub(crate) fn grown_capacity(current: usize, required: usize) -> usize {
    let mut capacity = current.max(1);
    while capacity < required {
        capacity = capacity.saturating_mul(2);
    }
    capacity
}

/// Resizes `storage` to exactly `len` units, reporting allocation failure
/// instead of aborting.
pub(crate) fn resize_storage<U: Copy>(
    storage: &mut Vec<U>,
    len: usize,
    fill: U,
    kind: ElementKind,
) -> Result<(), KzError> {
    if len > storage.len() {
        storage
            .try_reserve_exact(len - storage.len())
            .map_err(|_| KzError::AllocationFailed {
                kind,
                requested: len,
            })?;
    }
    storage.resize(len, fill);
    Ok(())
}

/// Where a flush should go, or `None` when the destination discards.
pub(crate) fn flush_target(params: &IoParams) -> Result<Option<(&Path, Encoding)>, KzError> {
    match params.destination_device {
        Device::Null => Ok(None),
        Device::File => {
            let path = params
                .destination_path
                .as_deref()
                .ok_or(KzError::MissingDestination)?;
            Ok(Some((path, params.destination_encoding)))
        }
    }
}

//==================================================================================
// 2. The Generic Buffer
//==================================================================================

/// A growable buffer of fixed-width elements bound to a source or destination.
///
/// The storage length *is* the capacity: an input buffer holds exactly what was
/// loaded, and an output buffer is zero-filled up to its current capacity.
#[derive(Debug)]
pub struct Buffer<T: Element> {
    device: Device,
    storage: Vec<T>,
    cursor: usize,
    /// Zeroed region handed out by a `Null` input device. Grows, never shrinks.
    scratch: Vec<T>,
}

impl<T: Element> Buffer<T> {
    fn empty(device: Device) -> Self {
        Self {
            device,
            storage: Vec::new(),
            cursor: 0,
            scratch: Vec::new(),
        }
    }

    fn with_elements(device: Device, storage: Vec<T>) -> Self {
        Self {
            device,
            storage,
            cursor: 0,
            scratch: Vec::new(),
        }
    }

    /// Loads every element of a source file.
    pub(crate) fn load(path: &Path, encoding: Encoding) -> Result<Vec<T>, KzError> {
        match encoding {
            Encoding::Binary => Ok(utils::bytes_to_typed_vec(&utils::read_file(path)?)),
            Encoding::Text => {
                let contents = utils::read_text_file(path)?;
                text::parse_list(&contents, |token| Ok(T::parse_token(token)))
            }
        }
    }

    /// Elements already consumed (input) or written (output).
    pub fn as_slice(&self) -> &[T] {
        &self.storage[..self.cursor]
    }

    /// Elements not yet consumed by `input`.
    pub fn remaining(&self) -> usize {
        self.storage.len() - self.cursor
    }

    fn ensure_capacity(&mut self, required: usize) -> Result<(), KzError> {
        if required <= self.storage.len() {
            return Ok(());
        }
        let capacity = grown_capacity(self.storage.len(), required);
        resize_storage(&mut self.storage, capacity, T::zeroed(), T::KIND)?;
        log::trace!("Grew {} buffer to {} elements", T::KIND, capacity);
        log_metric!("event" = "grow", "kind" = T::KIND, "capacity" = capacity);
        Ok(())
    }

    fn synthesize(&mut self, n: usize) -> Result<&[T], KzError> {
        if self.scratch.len() < n {
            resize_storage(&mut self.scratch, n, T::zeroed(), T::KIND)?;
        }
        Ok(&self.scratch[..n])
    }

    fn flush(&self, path: &Path, encoding: Encoding) -> Result<(), KzError> {
        let written = self.as_slice();
        match encoding {
            Encoding::Binary => utils::write_file(path, utils::typed_slice_to_bytes(written))?,
            Encoding::Text => {
                let rendered =
                    text::format_list(written.iter(), |out, value| value.write_token(out));
                utils::write_file(path, rendered.as_bytes())?
            }
        }
        log::info!(
            "Flushed {} {} element(s) to {}",
            written.len(),
            T::KIND,
            path.display()
        );
        log_metric!("event" = "flush", "kind" = T::KIND, "elements" = written.len());
        Ok(())
    }
}

impl<T: Element> StreamBuffer for Buffer<T> {
    type Unit = T;

    const KIND: ElementKind = T::KIND;

    fn init_input(params: &IoParams) -> Result<Self, KzError> {
        let device = params.source_device;
        let path = match (device, params.source_path.as_deref()) {
            (Device::File, Some(path)) => path,
            _ => return Ok(Self::empty(device)),
        };

        let elements = Self::load(path, params.source_encoding)?;
        log::debug!(
            "Loaded {} {} element(s) from {}",
            elements.len(),
            T::KIND,
            path.display()
        );
        Ok(Self::with_elements(device, elements))
    }

    fn init_output(params: &IoParams) -> Result<Self, KzError> {
        let device = params.destination_device;
        let mut buffer = Self::empty(device);
        if device == Device::File {
            resize_storage(
                &mut buffer.storage,
                params.output_capacity,
                T::zeroed(),
                T::KIND,
            )?;
        }
        Ok(buffer)
    }

    fn input(&mut self, n: usize) -> Result<Option<&[T]>, KzError> {
        if self.device == Device::Null {
            return self.synthesize(n).map(Some);
        }
        match self.cursor.checked_add(n) {
            Some(end) if end <= self.storage.len() => {
                let start = self.cursor;
                self.cursor = end;
                Ok(Some(&self.storage[start..end]))
            }
            _ => Ok(None),
        }
    }

    fn output(&mut self, data: &[T], n: usize) -> Result<(), KzError> {
        if self.device == Device::Null {
            return Ok(());
        }
        let data = data.get(..n).ok_or(KzError::ShortInput {
            needed: n,
            got: data.len(),
        })?;
        let end = self.cursor + n;
        self.ensure_capacity(end)?;
        self.storage[self.cursor..end].copy_from_slice(data);
        self.cursor = end;
        Ok(())
    }

    fn cleanup_input(self, _params: &IoParams) {
        log::debug!(
            "Released {} input buffer at {}/{}",
            T::KIND,
            self.cursor,
            self.storage.len()
        );
    }

    fn cleanup_output(self, params: &IoParams) -> Result<(), KzError> {
        if let Some((path, encoding)) = flush_target(params)? {
            self.flush(path, encoding)?;
        }
        Ok(())
    }

    fn device(&self) -> Device {
        self.device
    }

    fn cursor(&self) -> usize {
        self.cursor
    }

    fn capacity(&self) -> usize {
        self.storage.len()
    }
}
