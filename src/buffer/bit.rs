//! The bit buffer: the generic buffer discipline over packed bytes.
//!
//! Capacity and cursor are counted in bits. A read that starts on a byte
//! boundary borrows storage directly; any other read is copied into a scratch
//! area owned by this buffer, which stays valid until the next call.

use std::path::Path;

use crate::buffer::{flush_target, grown_capacity, resize_storage};
use crate::config::{Device, Encoding, IoParams};
use crate::error::KzError;
use crate::kernels::bitarray::{self, packed_len, BIT_ARRAY_ELEM_BITS};
use crate::kernels::text;
use crate::traits::StreamBuffer;
use crate::types::ElementKind;
use crate::utils;

/// A growable array of packed bits bound to a source or destination.
#[derive(Debug, Default)]
pub struct BitBuffer {
    device: Device,
    /// Packed storage; always `packed_len(capacity)` bytes long.
    storage: Vec<u8>,
    capacity: usize,
    cursor: usize,
    /// Unaligned-read and null-device region. Grows, never shrinks.
    scratch: Vec<u8>,
}

impl BitBuffer {
    fn empty(device: Device) -> Self {
        Self {
            device,
            ..Self::default()
        }
    }

    fn load(path: &Path, encoding: Encoding) -> Result<(Vec<u8>, usize), KzError> {
        match encoding {
            Encoding::Binary => {
                let bytes = utils::read_file(path)?;
                let bits = bytes.len() * BIT_ARRAY_ELEM_BITS;
                Ok((bytes, bits))
            }
            Encoding::Text => {
                let contents = utils::read_text_file(path)?;
                let values = text::parse_list(&contents, text::parse_bit)?;
                let mut bytes = vec![0u8; packed_len(values.len())];
                for (i, &bit) in values.iter().enumerate() {
                    bitarray::write_bit(&mut bytes, i, bit);
                }
                Ok((bytes, values.len()))
            }
        }
    }

    /// Returns bit `i`, or `None` past the end of capacity.
    pub fn read_bit(&self, i: usize) -> Option<bool> {
        (i < self.capacity).then(|| bitarray::read_bit(&self.storage, i))
    }

    /// Sets or clears bit `i` in place without moving the cursor.
    pub fn write_bit(&mut self, i: usize, value: bool) -> Result<(), KzError> {
        if i >= self.capacity {
            return Err(KzError::BitRange {
                offset: i,
                len: 1,
                available: self.capacity,
            });
        }
        bitarray::write_bit(&mut self.storage, i, value);
        Ok(())
    }

    /// Bits already consumed (input) or written (output), as booleans.
    pub fn to_bools(&self) -> Vec<bool> {
        (0..self.cursor)
            .map(|i| bitarray::read_bit(&self.storage, i))
            .collect()
    }

    fn ensure_capacity(&mut self, required: usize) -> Result<(), KzError> {
        if required <= self.capacity {
            return Ok(());
        }
        let capacity = grown_capacity(self.capacity, required);
        resize_storage(&mut self.storage, packed_len(capacity), 0, ElementKind::Bit)?;
        self.capacity = capacity;
        log::trace!("Grew bit buffer to {} bits", capacity);
        log_metric!("event" = "grow", "kind" = ElementKind::Bit, "capacity" = capacity);
        Ok(())
    }

    fn scratch_for(&mut self, n: usize) -> Result<&mut [u8], KzError> {
        let bytes = packed_len(n);
        if self.scratch.len() < bytes {
            resize_storage(&mut self.scratch, bytes, 0, ElementKind::Bit)?;
        }
        Ok(&mut self.scratch[..bytes])
    }

    fn flush(&self, path: &Path, encoding: Encoding) -> Result<(), KzError> {
        match encoding {
            Encoding::Binary => {
                let mut bytes = self.storage[..packed_len(self.cursor)].to_vec();
                bitarray::clear_tail(&mut bytes, self.cursor);
                utils::write_file(path, &bytes)?;
            }
            Encoding::Text => {
                let rendered = text::format_list(self.to_bools(), text::print_bit);
                utils::write_file(path, rendered.as_bytes())?;
            }
        }
        log::info!("Flushed {} bit(s) to {}", self.cursor, path.display());
        log_metric!("event" = "flush", "kind" = ElementKind::Bit, "elements" = self.cursor);
        Ok(())
    }
}

impl StreamBuffer for BitBuffer {
    type Unit = u8;

    const KIND: ElementKind = ElementKind::Bit;

    fn init_input(params: &IoParams) -> Result<Self, KzError> {
        let device = params.source_device;
        let path = match (device, params.source_path.as_deref()) {
            (Device::File, Some(path)) => path,
            _ => return Ok(Self::empty(device)),
        };

        let (storage, capacity) = Self::load(path, params.source_encoding)?;
        log::debug!("Loaded {} bit(s) from {}", capacity, path.display());
        Ok(Self {
            device,
            storage,
            capacity,
            ..Self::default()
        })
    }

    fn init_output(params: &IoParams) -> Result<Self, KzError> {
        let device = params.destination_device;
        let mut buffer = Self::empty(device);
        if device == Device::File {
            resize_storage(&mut buffer.storage, params.output_capacity, 0, ElementKind::Bit)?;
            buffer.capacity = params.output_capacity * BIT_ARRAY_ELEM_BITS;
        }
        Ok(buffer)
    }

    /// Returns `packed_len(n)` bytes holding the next `n` bits, least
    /// significant bit first. Bits of the last byte beyond `n` are unspecified.
    fn input(&mut self, n: usize) -> Result<Option<&[u8]>, KzError> {
        if self.device == Device::Null {
            let region = self.scratch_for(n)?;
            region.fill(0);
            return Ok(Some(&*region));
        }

        let start = self.cursor;
        let end = match start.checked_add(n) {
            Some(end) if end <= self.capacity => end,
            _ => return Ok(None),
        };

        if start % BIT_ARRAY_ELEM_BITS == 0 {
            let first = start / BIT_ARRAY_ELEM_BITS;
            self.cursor = end;
            return Ok(Some(&self.storage[first..first + packed_len(n)]));
        }

        // Unaligned: copy the span so the caller sees it starting at bit 0.
        let bytes = packed_len(n);
        if self.scratch.len() < bytes {
            resize_storage(&mut self.scratch, bytes, 0, ElementKind::Bit)?;
        }
        bitarray::bitarray_copy(&mut self.scratch, 0, &self.storage, start, n)?;
        self.cursor = end;
        Ok(Some(&self.scratch[..bytes]))
    }

    /// Appends the first `n` bits of `data`, which must hold `packed_len(n)` bytes.
    fn output(&mut self, data: &[u8], n: usize) -> Result<(), KzError> {
        if self.device == Device::Null {
            return Ok(());
        }
        let needed = packed_len(n);
        if data.len() < needed {
            return Err(KzError::ShortInput {
                needed,
                got: data.len(),
            });
        }
        let end = self.cursor + n;
        self.ensure_capacity(end)?;
        bitarray::bitarray_copy(&mut self.storage, self.cursor, data, 0, n)?;
        self.cursor = end;
        Ok(())
    }

    fn cleanup_input(self, _params: &IoParams) {
        log::debug!(
            "Released bit input buffer at {}/{}",
            self.cursor,
            self.capacity
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
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tempfile::tempdir;

    fn output_params(capacity: usize) -> IoParams {
        IoParams::default().with_output_capacity(capacity)
    }

    fn pack(bits: &[bool]) -> Vec<u8> {
        let mut packed = vec![0u8; packed_len(bits.len())];
        for (i, &b) in bits.iter().enumerate() {
            bitarray::write_bit(&mut packed, i, b);
        }
        packed
    }

    #[test]
    fn test_aligned_and_unaligned_reads() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bits.bin");
        std::fs::write(&path, [0b1010_1100u8, 0b0000_1111]).unwrap();
        let params = IoParams::default().with_source(&path, Encoding::Binary);

        let mut buf = BitBuffer::init_input(&params).unwrap();
        assert_eq!(buf.capacity(), 16);

        // Aligned: borrowed straight from storage.
        let first = buf.input(4).unwrap().unwrap().to_vec();
        assert_eq!(first[0] & 0x0F, 0b1100);

        // Unaligned: bits 4..12 are 0,1,0,1,1,1,1,1
        let second = buf.input(8).unwrap().unwrap().to_vec();
        assert_eq!(second, vec![0b1111_1010]);

        assert_eq!(buf.cursor(), 12);
        assert!(buf.input(5).unwrap().is_none());
        assert_eq!(buf.input(4).unwrap().unwrap()[0] & 0x0F, 0b0000);
        assert!(buf.is_exhausted());
    }

    #[test]
    fn test_text_source_packs_bits() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bits.txt");
        std::fs::write(&path, "1,0,x,1,1").unwrap();
        let params = IoParams::default().with_source(&path, Encoding::Text);

        let mut buf = BitBuffer::init_input(&params).unwrap();
        assert_eq!(buf.capacity(), 4);
        assert_eq!(buf.read_bit(3), Some(true));
        assert_eq!(buf.read_bit(4), None);
        assert_eq!(buf.input(4).unwrap().unwrap()[0] & 0x0F, 0b1101);
    }

    #[test]
    fn test_illegal_bit_text_is_fatal() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bits.txt");
        std::fs::write(&path, "1,0,2").unwrap();
        let params = IoParams::default().with_source(&path, Encoding::Text);
        assert!(matches!(
            BitBuffer::init_input(&params),
            Err(KzError::IllegalBitValue(_))
        ));
    }

    #[test]
    fn test_unaligned_output_advances_and_pads_on_flush() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.bin");
        let params = output_params(1).with_destination(&path, Encoding::Binary);

        let mut buf = BitBuffer::init_output(&params).unwrap();
        assert_eq!(buf.capacity(), 8);
        buf.output(&[0b1111_1101], 3).unwrap();
        buf.output(&[0xFF, 0xFF], 9).unwrap();
        assert_eq!(buf.cursor(), 12);
        assert_eq!(buf.capacity(), 16);
        buf.cleanup_output(&params).unwrap();

        // 101 followed by nine ones, then four zero padding bits.
        assert_eq!(std::fs::read(&path).unwrap(), vec![0b1111_1101, 0b0000_1111]);
    }

    #[test]
    fn test_text_flush_prints_each_bit() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let params = output_params(1).with_destination(&path, Encoding::Text);

        let mut buf = BitBuffer::init_output(&params).unwrap();
        buf.output(&[0b0000_0101], 4).unwrap();
        buf.cleanup_output(&params).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "1,0,1,0");
    }

    #[test]
    fn test_null_source_synthesizes_zeros() {
        let params = IoParams::default().with_null_source();
        let mut buf = BitBuffer::init_input(&params).unwrap();
        assert_eq!(buf.input(20).unwrap().unwrap(), &[0u8, 0, 0]);
        assert_eq!(buf.cursor(), 0);
        assert!(!buf.is_exhausted());
    }

    #[test]
    fn test_write_bit_out_of_range() {
        let params = output_params(1);
        let mut buf = BitBuffer::init_output(&params).unwrap();
        buf.write_bit(7, true).unwrap();
        assert_eq!(buf.read_bit(7), Some(true));
        assert!(matches!(buf.write_bit(8, true), Err(KzError::BitRange { .. })));
    }

    proptest! {
        #[test]
        fn prop_binary_roundtrip_through_file(
            bits in proptest::collection::vec(any::<bool>(), 1..200),
            chunk in 1usize..13,
        ) {
            let dir = tempdir().unwrap();
            let path = dir.path().join("bits.bin");
            let params = output_params(1)
                .with_destination(&path, Encoding::Binary)
                .with_source(&path, Encoding::Binary);

            let mut out = BitBuffer::init_output(&params).unwrap();
            for piece in bits.chunks(chunk) {
                out.output(&pack(piece), piece.len()).unwrap();
            }
            out.cleanup_output(&params).unwrap();

            let mut input = BitBuffer::init_input(&params).unwrap();
            prop_assert_eq!(input.capacity(), packed_len(bits.len()) * 8);
            let mut read_back = Vec::new();
            for _ in 0..bits.len() {
                let unit = input.input(1).unwrap().unwrap();
                read_back.push(bitarray::read_bit(unit, 0));
            }
            prop_assert_eq!(read_back, bits);
        }

        #[test]
        fn prop_text_roundtrip_through_file(
            bits in proptest::collection::vec(any::<bool>(), 1..200),
            chunk in 1usize..13,
        ) {
            let dir = tempdir().unwrap();
            let path = dir.path().join("bits.txt");
            let params = output_params(1)
                .with_destination(&path, Encoding::Text)
                .with_source(&path, Encoding::Text);

            let mut out = BitBuffer::init_output(&params).unwrap();
            for piece in bits.chunks(chunk) {
                out.output(&pack(piece), piece.len()).unwrap();
            }
            out.cleanup_output(&params).unwrap();

            let mut input = BitBuffer::init_input(&params).unwrap();
            prop_assert_eq!(input.capacity(), bits.len());
            let packed = input.input(bits.len()).unwrap().unwrap().to_vec();
            let read_back: Vec<bool> = (0..bits.len()).map(|i| bitarray::read_bit(&packed, i)).collect();
            prop_assert_eq!(&read_back, &bits);
            prop_assert_eq!(input.to_bools(), bits);
        }
    }
}
