//! This module provides a set of shared, low-level utility functions used
//! throughout the buffer layer.
//!
//! Its primary responsibilities include:
//! 1.  Providing safe, validated conversions between raw byte slices and typed slices.
//! 2.  Reading and writing whole files with the offending path attached to any error.

use std::borrow::Cow;
use std::fs;
use std::path::Path;

use bytemuck::{Pod, PodCastError};

use crate::error::KzError;

//==================================================================================
// 1. Byte <-> Typed Conversions
//==================================================================================

/// Copies the whole elements contained in `bytes` into a freshly allocated,
/// correctly aligned `Vec<T>`. Trailing bytes that do not form a whole element
/// are ignored.
pub fn bytes_to_typed_vec<T: Pod>(bytes: &[u8]) -> Vec<T> {
    let count = bytes.len() / std::mem::size_of::<T>();
    let mut out = vec![T::zeroed(); count];
    bytemuck::cast_slice_mut::<T, u8>(&mut out)
        .copy_from_slice(&bytes[..count * std::mem::size_of::<T>()]);
    out
}

/// Views `bytes` as a typed slice, borrowing when the alignment allows it and
/// copying otherwise.
///
/// # Errors
/// Returns a `KzError::BufferMismatch` if the byte slice length is not
/// perfectly divisible by the size of the target type `T`.
pub fn bytes_as_typed<T: Pod>(bytes: &[u8]) -> Result<Cow<'_, [T]>, KzError> {
    let size = std::mem::size_of::<T>();
    if bytes.len() % size != 0 {
        return Err(KzError::BufferMismatch(size, bytes.len()));
    }
    match bytemuck::try_cast_slice(bytes) {
        Ok(slice) => Ok(Cow::Borrowed(slice)),
        Err(PodCastError::TargetAlignmentGreaterAndInputNotAligned) => {
            Ok(Cow::Owned(bytes_to_typed_vec(bytes)))
        }
        Err(e) => Err(e.into()),
    }
}

/// Converts a slice of plain-old-data values into its native-endian bytes.
pub fn typed_slice_to_bytes<T: Pod>(data: &[T]) -> &[u8] {
    bytemuck::cast_slice(data)
}

//==================================================================================
// 2. Whole-File I/O
//==================================================================================

pub fn read_file(path: &Path) -> Result<Vec<u8>, KzError> {
    fs::read(path).map_err(|e| KzError::file_access(path, e))
}

/// Reads a text source. Bytes that are not valid UTF-8 are replaced rather than
/// rejected; they can only ever land in tokens that fail to parse.
pub fn read_text_file(path: &Path) -> Result<String, KzError> {
    let bytes = read_file(path)?;
    Ok(match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    })
}

/// Writes `bytes` to `path` in one pass, replacing any existing file.
pub fn write_file(path: &Path, bytes: &[u8]) -> Result<(), KzError> {
    fs::write(path, bytes).map_err(|e| KzError::file_access(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes_to_typed_vec_drops_partial_element() {
        let values: Vec<i16> = vec![1, -2, 300];
        let mut bytes = typed_slice_to_bytes(&values).to_vec();
        bytes.push(0xAB);
        assert_eq!(bytes_to_typed_vec::<i16>(&bytes), values);
    }

    #[test]
    fn test_bytes_as_typed_handles_misalignment() {
        let values: Vec<u32> = vec![7, 8, 9];
        let mut padded = vec![0u8];
        padded.extend_from_slice(typed_slice_to_bytes(&values));
        let typed = bytes_as_typed::<u32>(&padded[1..]).unwrap();
        assert_eq!(&*typed, values.as_slice());
    }

    #[test]
    fn test_bytes_as_typed_rejects_ragged_length() {
        let result = bytes_as_typed::<u32>(&[0u8; 6]);
        assert!(matches!(result, Err(KzError::BufferMismatch(4, 6))));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.bin");
        match read_file(&path) {
            Err(KzError::FileAccess { path: p, .. }) => assert_eq!(p, path),
            other => panic!("Expected FileAccess, got {:?}", other),
        }
    }
}
